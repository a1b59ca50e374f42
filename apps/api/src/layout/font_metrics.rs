//! Static font-metric tables for the Helvetica family, and the word-wrap built on them.
//!
//! Widths are the standard Type1 advance widths in 1/1000 em, so what the engine
//! measures is exactly what a PDF viewer paints with the base-14 Helvetica fonts.
//! Tables cover ASCII 0x20..=0x7E (95 printable characters), index = `(char as usize) - 32`.
//! The bullet separator has its own entry; every other character falls back to
//! `average_char_width`.

use serde::{Deserialize, Serialize};

use crate::errors::LayoutError;

// ────────────────────────────────────────────────────────────────────────────
// Font selection
// ────────────────────────────────────────────────────────────────────────────

/// Weight of the Helvetica face used for a run of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontStyle {
    #[default]
    Normal,
    Bold,
}

impl FontStyle {
    /// Base-14 PDF font name.
    pub fn pdf_name(&self) -> &'static str {
        match self {
            FontStyle::Normal => "Helvetica",
            FontStyle::Bold => "Helvetica-Bold",
        }
    }
}

/// Font size (pt) and style: everything the provider needs to measure a string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSpec {
    pub size: f32,
    pub style: FontStyle,
}

impl FontSpec {
    pub fn new(size: f32, style: FontStyle) -> Self {
        Self { size, style }
    }
}

/// Helvetica ascender / descender in em.
const ASCENT: f32 = 0.718;
const DESCENT: f32 = 0.207;

// ────────────────────────────────────────────────────────────────────────────
// Measurement provider
// ────────────────────────────────────────────────────────────────────────────

/// Text measurement and wrapping.
///
/// Callers must measure with the same `FontSpec` they paint with; wrap points
/// depend on glyph widths.
pub trait TextMeasure {
    /// Rendered width of `text` on one line, in points.
    fn text_width(&self, text: &str, font: FontSpec) -> Result<f32, LayoutError>;

    /// Splits `text` into lines no wider than `max_width`.
    ///
    /// Blank input yields no lines at all.
    fn wrap_to_width(
        &self,
        text: &str,
        font: FontSpec,
        max_width: f32,
    ) -> Result<Vec<String>, LayoutError>;

    /// Height of one line box.
    fn line_height(&self, font_size: f32, line_height_factor: f32) -> f32 {
        font_size * line_height_factor
    }

    /// Distance from the top of a line box to the text baseline.
    fn baseline_offset(&self, font_size: f32, line_height: f32) -> f32 {
        (line_height - (ASCENT + DESCENT) * font_size) / 2.0 + ASCENT * font_size
    }
}

/// `TextMeasure` backed by the static Helvetica tables below.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardFontMetrics;

impl TextMeasure for StandardFontMetrics {
    fn text_width(&self, text: &str, font: FontSpec) -> Result<f32, LayoutError> {
        check_dimension("font size", font.size)?;
        Ok(get_metrics(font.style).measure_str(text) * font.size)
    }

    fn wrap_to_width(
        &self,
        text: &str,
        font: FontSpec,
        max_width: f32,
    ) -> Result<Vec<String>, LayoutError> {
        check_dimension("font size", font.size)?;
        check_dimension("wrap width", max_width)?;

        let text = text.trim();
        if text.is_empty() {
            return Ok(vec![]);
        }

        let metrics = get_metrics(font.style);
        // Work in em so the table is consulted without per-char scaling.
        let max_em = max_width / font.size;
        let mut lines = Vec::new();
        for paragraph in text.lines() {
            metrics.wrap_paragraph(paragraph, max_em, &mut lines);
        }
        Ok(lines)
    }
}

fn check_dimension(what: &str, value: f32) -> Result<(), LayoutError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(LayoutError::Measurement(format!(
            "{what} must be a positive finite number, got {value}"
        )))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Font metric table
// ────────────────────────────────────────────────────────────────────────────

/// Static character-width table for one Helvetica face.
///
/// `widths[i]` = advance of ASCII character `(i + 32)` in 1/1000 em.
///
/// Width array slot layout:
/// ```text
/// [0]=sp  [1]=!   [2]="   [3]=#   [4]=$   [5]=%   [6]=&   [7]='
/// [8]=(   [9]=)   [10]=*  [11]=+  [12]=,  [13]=-  [14]=.  [15]=/
/// [16..25]=0-9
/// [26]=:  [27]=;  [28]=<  [29]==  [30]=>  [31]=?  [32]=@
/// [33..58]=A-Z
/// [59]=[  [60]=\  [61]=]  [62]=^  [63]=_  [64]=`
/// [65..90]=a-z
/// [91]={  [92]=|  [93]=}  [94]=~
/// ```
pub struct FontMetricTable {
    widths: [u16; 95],
    bullet_width: u16,
    /// Fallback for characters outside the table.
    pub average_char_width: u16,
}

impl FontMetricTable {
    /// Advance of one character in em.
    pub fn char_width(&self, c: char) -> f32 {
        let code = c as usize;
        let units = if (32..=126).contains(&code) {
            self.widths[code - 32]
        } else if c == '\u{2022}' {
            self.bullet_width
        } else {
            self.average_char_width
        };
        units as f32 / 1000.0
    }

    /// Measures the rendered width of a string in em units.
    pub fn measure_str(&self, s: &str) -> f32 {
        s.chars().map(|c| self.char_width(c)).sum()
    }

    /// Greedy word-wrap of one newline-free paragraph into `out`.
    ///
    /// A word wider than the line on its own is broken between characters.
    /// An empty paragraph contributes one empty line.
    fn wrap_paragraph(&self, paragraph: &str, max_em: f32, out: &mut Vec<String>) {
        let space = self.char_width(' ');
        let mut current = String::new();
        let mut current_width = 0.0_f32;

        for word in paragraph.split_whitespace() {
            let word_w = self.measure_str(word);

            if !current.is_empty() && current_width + space + word_w <= max_em {
                current.push(' ');
                current.push_str(word);
                current_width += space + word_w;
                continue;
            }

            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }

            if word_w <= max_em {
                current.push_str(word);
                current_width = word_w;
            } else {
                let (last, last_w) = self.break_word(word, max_em, out);
                current = last;
                current_width = last_w;
            }
        }

        out.push(current);
    }

    /// Splits an over-long word into full-width chunks pushed to `out`, returning the
    /// trailing partial chunk and its width.
    fn break_word(&self, word: &str, max_em: f32, out: &mut Vec<String>) -> (String, f32) {
        let mut chunk = String::new();
        let mut chunk_w = 0.0_f32;
        for c in word.chars() {
            let w = self.char_width(c);
            if !chunk.is_empty() && chunk_w + w > max_em {
                out.push(std::mem::take(&mut chunk));
                chunk_w = 0.0;
            }
            chunk.push(c);
            chunk_w += w;
        }
        (chunk, chunk_w)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Static width tables  (95 ASCII printable characters each)
// ────────────────────────────────────────────────────────────────────────────

static HELVETICA_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
        278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
        // 0    1    2    3    4    5    6    7    8    9
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
        // :    ;    <    =    >    ?    @
        278, 278, 584, 584, 584, 556, 1015,
        // A    B    C    D    E    F    G    H    I    J    K    L    M
        667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
        // N    O    P    Q    R    S    T    U    V    W    X    Y    Z
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
        // [    \    ]    ^    _    `
        278, 278, 278, 469, 556, 333,
        // a    b    c    d    e    f    g    h    i    j    k    l    m
        556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
        // n    o    p    q    r    s    t    u    v    w    x    y    z
        556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
        // {    |    }    ~
        334, 260, 334, 584,
    ],
    bullet_width: 350,
    average_char_width: 556,
};

static HELVETICA_BOLD_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
        278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
        // 0    1    2    3    4    5    6    7    8    9
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
        // :    ;    <    =    >    ?    @
        333, 333, 584, 584, 584, 611, 975,
        // A    B    C    D    E    F    G    H    I    J    K    L    M
        722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
        // N    O    P    Q    R    S    T    U    V    W    X    Y    Z
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
        // [    \    ]    ^    _    `
        333, 278, 333, 584, 556, 333,
        // a    b    c    d    e    f    g    h    i    j    k    l    m
        556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
        // n    o    p    q    r    s    t    u    v    w    x    y    z
        611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
        // {    |    }    ~
        389, 280, 389, 584,
    ],
    bullet_width: 350,
    average_char_width: 611,
};

/// Returns the static metric table for a given style.
pub fn get_metrics(style: FontStyle) -> &'static FontMetricTable {
    match style {
        FontStyle::Normal => &HELVETICA_TABLE,
        FontStyle::Bold => &HELVETICA_BOLD_TABLE,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn body() -> FontSpec {
        FontSpec::new(10.0, FontStyle::Normal)
    }

    #[test]
    fn test_measure_str_empty_returns_zero() {
        let metrics = get_metrics(FontStyle::Normal);
        assert_eq!(metrics.measure_str(""), 0.0);
    }

    #[test]
    fn test_measure_str_ascii_characters() {
        let metrics = get_metrics(FontStyle::Normal);
        // "Rust" = R(722) + u(556) + s(500) + t(278) = 2056
        let width = metrics.measure_str("Rust");
        assert!((width - 2.056).abs() < 1e-4, "got {width}");
    }

    #[test]
    fn test_bold_is_wider_than_regular() {
        let text = "Analytical Engine";
        assert!(
            get_metrics(FontStyle::Bold).measure_str(text)
                > get_metrics(FontStyle::Normal).measure_str(text)
        );
    }

    #[test]
    fn test_non_ascii_falls_back_to_average() {
        let metrics = get_metrics(FontStyle::Normal);
        assert!((metrics.measure_str("é") - 0.556).abs() < 1e-4);
        assert!((metrics.measure_str("\u{2022}") - 0.350).abs() < 1e-4);
    }

    #[test]
    fn test_text_width_scales_with_font_size() {
        let provider = StandardFontMetrics;
        let w10 = provider.text_width("Math", body()).unwrap();
        let w20 = provider
            .text_width("Math", FontSpec::new(20.0, FontStyle::Normal))
            .unwrap();
        assert!((w20 - 2.0 * w10).abs() < 1e-3);
    }

    #[test]
    fn test_wrap_blank_input_yields_no_lines() {
        let provider = StandardFontMetrics;
        assert!(provider.wrap_to_width("", body(), 200.0).unwrap().is_empty());
        assert!(provider
            .wrap_to_width("   \n\t ", body(), 200.0)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_wrap_short_text_single_line() {
        let provider = StandardFontMetrics;
        let lines = provider.wrap_to_width("Built things", body(), 200.0).unwrap();
        assert_eq!(lines, vec!["Built things".to_string()]);
    }

    #[test]
    fn test_wrap_lines_fit_max_width() {
        let provider = StandardFontMetrics;
        let text = "Architected a distributed caching layer using consistent hashing, \
                    reducing p99 latency by forty percent under peak load";
        let lines = provider.wrap_to_width(text, body(), 150.0).unwrap();
        assert!(lines.len() > 1);
        for line in &lines {
            let w = provider.text_width(line, body()).unwrap();
            assert!(w <= 150.0 + 1e-3, "line {line:?} is {w}pt wide");
        }
        // Wrapping only moves whitespace around.
        let rejoined = lines.join(" ");
        assert_eq!(
            rejoined.split_whitespace().collect::<Vec<_>>(),
            text.split_whitespace().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_wrap_keeps_explicit_newlines() {
        let provider = StandardFontMetrics;
        let lines = provider
            .wrap_to_width("first\n\nthird", body(), 300.0)
            .unwrap();
        assert_eq!(lines, vec!["first", "", "third"]);
    }

    #[test]
    fn test_wrap_breaks_overlong_word() {
        let provider = StandardFontMetrics;
        let word = "x".repeat(40); // 40 × 5pt = 200pt at 10pt
        let lines = provider.wrap_to_width(&word, body(), 50.0).unwrap();
        assert_eq!(lines.len(), 4);
        assert!(lines.iter().all(|l| l.len() == 10));
    }

    #[test]
    fn test_wrap_rejects_non_positive_width() {
        let provider = StandardFontMetrics;
        let err = provider.wrap_to_width("text", body(), 0.0).unwrap_err();
        assert!(matches!(err, LayoutError::Measurement(_)));
        assert!(provider
            .wrap_to_width("text", body(), f32::NAN)
            .is_err());
    }

    #[test]
    fn test_baseline_sits_inside_line_box() {
        let provider = StandardFontMetrics;
        let line_height = provider.line_height(10.0, 1.3);
        let offset = provider.baseline_offset(10.0, line_height);
        assert!((line_height - 13.0).abs() < 1e-4);
        assert!(offset > 7.0 && offset < line_height);
    }
}
