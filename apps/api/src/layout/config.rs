//! Fixed layout constants for one export run.
//!
//! Every size, spacing and colour the engine uses lives here. The composer builds a
//! `LayoutConfig` once per run and hands it down by reference; nothing below it
//! carries its own numeric literals. These values are compiled in and are not
//! accepted from requests.

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Colour
// ────────────────────────────────────────────────────────────────────────────

/// 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Components scaled to 0.0–1.0, as PDF colour operators expect.
    pub fn unit(&self) -> (f32, f32, f32) {
        (
            self.0 as f32 / 255.0,
            self.1 as f32 / 255.0,
            self.2 as f32 / 255.0,
        )
    }
}

/// Body text (gray-900).
pub const COLOR_TEXT: Rgb = Rgb(0x11, 0x18, 0x27);
/// Job title under the name (indigo-600).
pub const COLOR_PRIMARY: Rgb = Rgb(0x4f, 0x46, 0xe5);
/// Secondary lines, dates, contact line (gray-500).
pub const COLOR_GRAY: Rgb = Rgb(0x6b, 0x72, 0x80);
/// Divider rules (gray-300).
pub const COLOR_LIGHT_GRAY: Rgb = Rgb(0xd1, 0xd5, 0xdb);

// ────────────────────────────────────────────────────────────────────────────
// Layout configuration
// ────────────────────────────────────────────────────────────────────────────

/// All layout constants, in points unless noted otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutConfig {
    pub page_width: f32,
    pub page_height: f32,
    /// Applied on all four sides.
    pub margin: f32,

    pub font_size_h1: f32,
    pub font_size_h2: f32,
    /// Section headings.
    pub font_size_h3: f32,
    pub font_size_body: f32,
    pub font_size_small: f32,
    pub font_size_xsmall: f32,

    /// Line-height factors (multiplied by font size).
    pub line_height_normal: f32,
    pub line_height_tight: f32,

    /// Space before every section divider. The profile block uses half of it.
    pub section_spacing: f32,
    /// Space between consecutive items of an itemized section.
    pub item_spacing: f32,
    /// Space between the elements of a single item.
    pub sub_item_spacing: f32,
    /// Space reserved below a section heading's text.
    pub title_bottom_margin: f32,

    pub line_thickness: f32,
    /// Extra height a divider reserves on top of its thickness.
    pub divider_buffer: f32,
    /// Gap between a divider and the heading below it.
    pub divider_title_gap: f32,

    /// Horizontal gap between the left column and a right-aligned date.
    pub date_gutter: f32,
    /// Share of the content width a date may take before it wraps.
    pub date_column_ratio: f32,

    pub gap_after_name: f32,
    pub gap_after_job_title: f32,
    pub gap_after_contact: f32,

    /// Joins contact fields and inline-list entries.
    pub list_separator: &'static str,

    /// Hard ceiling on pages produced by one run.
    pub max_pages: usize,
}

impl LayoutConfig {
    /// A4 portrait, 40pt margins, Helvetica sizes.
    pub fn a4() -> Self {
        Self {
            page_width: 595.28,
            page_height: 841.89,
            margin: 40.0,

            font_size_h1: 20.0,
            font_size_h2: 14.0,
            font_size_h3: 12.0,
            font_size_body: 10.0,
            font_size_small: 9.0,
            font_size_xsmall: 8.0,

            line_height_normal: 1.3,
            line_height_tight: 1.1,

            section_spacing: 18.0,
            item_spacing: 10.0,
            sub_item_spacing: 3.0,
            title_bottom_margin: 6.0,

            line_thickness: 0.75,
            divider_buffer: 4.0,
            divider_title_gap: 4.0,

            date_gutter: 10.0,
            date_column_ratio: 0.5,

            gap_after_name: 5.0,
            gap_after_job_title: 8.0,
            gap_after_contact: 15.0,

            list_separator: " \u{2022} ",

            max_pages: 100,
        }
    }

    /// Width between the left and right margins.
    pub fn content_width(&self) -> f32 {
        self.page_width - self.margin * 2.0
    }

    /// Y below which no block may extend.
    pub fn bottom_limit(&self) -> f32 {
        self.page_height - self.margin
    }

    /// Widest a right-aligned date column may grow.
    pub fn max_date_width(&self) -> f32 {
        self.content_width() * self.date_column_ratio
    }

    /// Height a single page can hold between its margins.
    pub fn usable_height(&self) -> f32 {
        self.bottom_limit() - self.margin
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::a4()
    }
}
