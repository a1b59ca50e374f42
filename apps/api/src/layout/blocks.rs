//! Paints paragraphs, headings and dividers as unsplittable blocks.
//!
//! Each operation measures its whole block first, asks the pager for that much room,
//! then paints at the cursor the pager leaves it at. The returned `Placement.bottom`
//! is the authoritative cursor for whatever comes next.

use tracing::warn;

use crate::errors::LayoutError;
use crate::layout::config::{LayoutConfig, Rgb, COLOR_GRAY, COLOR_LIGHT_GRAY, COLOR_TEXT};
use crate::layout::font_metrics::{FontSpec, FontStyle, TextMeasure};
use crate::layout::page::{DrawOp, LineSegment, Page, TextAlign, TextRun};
use crate::layout::pager::LayoutState;

/// How a run of text is painted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font_size: f32,
    pub font_style: FontStyle,
    pub color: Rgb,
    pub line_height_factor: f32,
    pub align: TextAlign,
}

impl TextStyle {
    /// Body text: normal weight, normal line height.
    pub fn body(config: &LayoutConfig) -> Self {
        Self {
            font_size: config.font_size_body,
            font_style: FontStyle::Normal,
            color: COLOR_TEXT,
            line_height_factor: config.line_height_normal,
            align: TextAlign::Left,
        }
    }

    /// Small gray text with tight line height (subtitles, contact line).
    pub fn secondary(config: &LayoutConfig) -> Self {
        Self {
            font_size: config.font_size_small,
            font_style: FontStyle::Normal,
            color: COLOR_GRAY,
            line_height_factor: config.line_height_tight,
            align: TextAlign::Left,
        }
    }

    pub fn bold(mut self) -> Self {
        self.font_style = FontStyle::Bold;
        self
    }

    pub fn size(mut self, font_size: f32) -> Self {
        self.font_size = font_size;
        self
    }

    pub fn color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    pub fn line_height(mut self, factor: f32) -> Self {
        self.line_height_factor = factor;
        self
    }

    pub fn align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    fn font(&self) -> FontSpec {
        FontSpec::new(self.font_size, self.font_style)
    }
}

/// Where a block landed.
///
/// `page` and `top` reflect any page break taken for the block; `bottom` is the new
/// cursor. An empty placement (`top == bottom`) means nothing was drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub page: usize,
    pub top: f32,
    pub bottom: f32,
    /// The pager started a new page to fit this block.
    pub page_broke: bool,
}

impl Placement {
    pub fn is_empty(&self) -> bool {
        self.bottom <= self.top
    }
}

pub struct BlockRenderer<'a, M: TextMeasure> {
    state: LayoutState<'a>,
    measure: &'a M,
}

impl<'a, M: TextMeasure> BlockRenderer<'a, M> {
    pub fn new(config: &'a LayoutConfig, measure: &'a M) -> Self {
        Self {
            state: LayoutState::new(config),
            measure,
        }
    }

    pub fn config(&self) -> &'a LayoutConfig {
        self.state.config()
    }

    pub fn measure(&self) -> &'a M {
        self.measure
    }

    pub fn cursor_y(&self) -> f32 {
        self.state.cursor_y()
    }

    pub fn page_index(&self) -> usize {
        self.state.page_index()
    }

    #[cfg(test)]
    pub fn pages(&self) -> &[Page] {
        self.state.pages()
    }

    /// Adds vertical space before the next block.
    pub fn advance(&mut self, amount: f32) -> f32 {
        self.state.advance(amount);
        self.state.cursor_y()
    }

    pub fn into_pages(self) -> Vec<Page> {
        self.state.into_pages()
    }

    /// Wrapped paragraph at `x`, at most `max_width` wide. Blank text is a no-op.
    pub fn draw_paragraph(
        &mut self,
        text: &str,
        x: f32,
        max_width: f32,
        style: TextStyle,
    ) -> Result<Placement, LayoutError> {
        let lines = self
            .measure
            .wrap_to_width(text, style.font(), max_width)?;
        if lines.is_empty() {
            return Ok(self.empty_placement());
        }
        let line_height = self
            .measure
            .line_height(style.font_size, style.line_height_factor);
        let block_height = lines.len() as f32 * line_height;
        self.paint_lines(&lines, x, max_width, style, line_height, block_height)
    }

    /// Section heading across the content width: bold, section-title size, with the
    /// title bottom margin reserved as part of the block. Callers upper-case `text`.
    pub fn draw_heading(&mut self, text: &str) -> Result<Placement, LayoutError> {
        let config = self.config();
        let style = TextStyle::body(config)
            .bold()
            .size(config.font_size_h3)
            .line_height(1.0);
        let lines = self
            .measure
            .wrap_to_width(text, style.font(), config.content_width())?;
        if lines.is_empty() {
            return Ok(self.empty_placement());
        }
        let line_height = self.measure.line_height(style.font_size, 1.0);
        let block_height = lines.len() as f32 * line_height + config.title_bottom_margin;
        self.paint_lines(
            &lines,
            config.margin,
            config.content_width(),
            style,
            line_height,
            block_height,
        )
    }

    /// Makes room for `height` at the cursor without painting, for content drawn
    /// beside the next block. Returns whether a new page was started.
    pub fn reserve(&mut self, height: f32) -> Result<bool, LayoutError> {
        self.state.ensure_space(height)
    }

    /// Horizontal rule across the content width at the cursor.
    pub fn draw_divider(&mut self) -> Result<Placement, LayoutError> {
        let config = self.config();
        let page_broke = self
            .state
            .ensure_space(config.line_thickness + config.divider_buffer)?;

        let page = self.state.page_index();
        let y = self.state.cursor_y();
        self.state.push(DrawOp::Line(LineSegment {
            x1: config.margin,
            y1: y,
            x2: config.page_width - config.margin,
            y2: y,
            thickness: config.line_thickness,
            color: COLOR_LIGHT_GRAY,
        }));
        self.state.advance(config.line_thickness);

        Ok(Placement {
            page,
            top: y,
            bottom: self.state.cursor_y(),
            page_broke,
        })
    }

    /// Lines of `text` wrapped to `max_width`, with the widest line's width and the
    /// stacked height. This is exactly what `draw_pinned` paints for the same input.
    pub fn measure_pinned(
        &self,
        text: &str,
        max_width: f32,
        style: TextStyle,
    ) -> Result<(f32, f32), LayoutError> {
        let lines = self.measure.wrap_to_width(text, style.font(), max_width)?;
        let mut widest = 0.0f32;
        for line in &lines {
            widest = widest.max(self.measure.text_width(line, style.font())?);
        }
        let line_height = self
            .measure
            .line_height(style.font_size, style.line_height_factor);
        Ok((widest, lines.len() as f32 * line_height))
    }

    /// Text wrapped to `max_width` and right-aligned to the content edge, its first
    /// line box top at `top` on page `page`. Leaves the cursor alone; the returned
    /// placement tells the caller where the stack ends.
    pub fn draw_pinned(
        &mut self,
        text: &str,
        page: usize,
        top: f32,
        max_width: f32,
        style: TextStyle,
    ) -> Result<Placement, LayoutError> {
        let lines = self.measure.wrap_to_width(text, style.font(), max_width)?;
        let config = self.config();
        let line_height = self
            .measure
            .line_height(style.font_size, style.line_height_factor);
        let style = style.align(TextAlign::Right);

        let mut y = top;
        for line in &lines {
            let run = self.text_run(
                line,
                config.margin,
                config.content_width(),
                y,
                line_height,
                style,
            )?;
            self.state.push_to(page, DrawOp::Text(run));
            y += line_height;
        }
        Ok(Placement {
            page,
            top,
            bottom: y,
            page_broke: false,
        })
    }

    fn empty_placement(&self) -> Placement {
        let y = self.state.cursor_y();
        Placement {
            page: self.state.page_index(),
            top: y,
            bottom: y,
            page_broke: false,
        }
    }

    /// Reserves `block_height`, then paints `lines` one line box apart and leaves the
    /// cursor at the block's bottom (including any trailing reserve).
    fn paint_lines(
        &mut self,
        lines: &[String],
        x: f32,
        max_width: f32,
        style: TextStyle,
        line_height: f32,
        block_height: f32,
    ) -> Result<Placement, LayoutError> {
        let config = self.config();
        let mut page_broke = self.state.ensure_space(block_height)?;

        // Only a block taller than a whole page may continue onto the next one.
        let oversized = block_height > config.usable_height();
        if oversized {
            warn!(
                lines = lines.len(),
                block_height, "Block taller than a page; continuing across pages"
            );
        }

        let page = self.state.page_index();
        let top = self.state.cursor_y();
        for (i, line) in lines.iter().enumerate() {
            if oversized && i > 0 {
                page_broke |= self.state.ensure_space(line_height)?;
            }
            let y = self.state.cursor_y();
            let run = self.text_run(line, x, max_width, y, line_height, style)?;
            self.state.push(DrawOp::Text(run));
            self.state.advance(line_height);
        }

        let painted = lines.len() as f32 * line_height;
        self.state.advance(block_height - painted);

        Ok(Placement {
            page,
            top,
            bottom: self.state.cursor_y(),
            page_broke,
        })
    }

    fn text_run(
        &self,
        line: &str,
        x: f32,
        max_width: f32,
        y: f32,
        line_height: f32,
        style: TextStyle,
    ) -> Result<TextRun, LayoutError> {
        let width = self.measure.text_width(line, style.font())?;
        let left = match style.align {
            TextAlign::Left => x,
            TextAlign::Center => x + (max_width - width) / 2.0,
            TextAlign::Right => x + max_width - width,
        };
        Ok(TextRun {
            text: line.to_string(),
            x: left,
            y,
            baseline: y + self.measure.baseline_offset(style.font_size, line_height),
            width,
            line_height,
            font_size: style.font_size,
            style: style.font_style,
            color: style.color,
            align: style.align,
        })
    }
}
