//! Positioned draw primitives: the engine's output.
//!
//! Coordinates are points with the origin at the top-left corner of the page and y
//! growing downward. Serializers that need a bottom-left origin flip y themselves.

use serde::{Deserialize, Serialize};

use crate::layout::config::Rgb;
use crate::layout::font_metrics::FontStyle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// One line of text, already wrapped and positioned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    /// Resolved left edge, after alignment.
    pub x: f32,
    /// Top of the line box.
    pub y: f32,
    pub baseline: f32,
    pub width: f32,
    pub line_height: f32,
    pub font_size: f32,
    pub style: FontStyle,
    pub color: Rgb,
    pub align: TextAlign,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub thickness: f32,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawOp {
    Text(TextRun),
    Line(LineSegment),
}

#[cfg(test)]
impl DrawOp {
    pub fn as_text(&self) -> Option<&TextRun> {
        match self {
            DrawOp::Text(run) => Some(run),
            DrawOp::Line(_) => None,
        }
    }

    /// Vertical extent `(top, bottom)` occupied on the page.
    pub fn vertical_extent(&self) -> (f32, f32) {
        match self {
            DrawOp::Text(run) => (run.y, run.y + run.line_height),
            DrawOp::Line(line) => (line.y1.min(line.y2), line.y1.max(line.y2) + line.thickness),
        }
    }
}

/// A fixed-size page and everything drawn on it, in paint order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// 1-based.
    pub number: usize,
    pub width: f32,
    pub height: f32,
    pub elements: Vec<DrawOp>,
}

impl Page {
    pub fn new(number: usize, width: f32, height: f32) -> Self {
        Self {
            number,
            width,
            height,
            elements: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn text_runs(&self) -> impl Iterator<Item = &TextRun> {
        self.elements.iter().filter_map(DrawOp::as_text)
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
