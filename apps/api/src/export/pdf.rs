//! # PDF Serializer
//!
//! Writes laid-out pages as a PDF 1.7 file. Only the subset the résumé layout
//! needs is produced: base-14 Helvetica and Helvetica-Bold with WinAnsi encoding,
//! filled text runs, and stroked lines.
//!
//! ```text
//! %PDF-1.7
//! 1 0 obj  Catalog
//! 2 0 obj  Pages
//! 3 0 obj  Helvetica        (/F0)
//! 4 0 obj  Helvetica-Bold   (/F1)
//! ...      content stream + page object per page
//! ...      Info
//! xref / trailer / startxref / %%EOF
//! ```
//!
//! Layout coordinates have a top-left origin; PDF user space is bottom-left, so
//! every y is flipped against the page height here.

use std::fmt::Write as FmtWrite; // for write! on String
use std::io::Write as IoWrite; // for write! on Vec<u8>

use miniz_oxide::deflate::compress_to_vec_zlib;

use crate::layout::{DrawOp, FontStyle, LineSegment, Page, TextRun};

const PRODUCER: &str = concat!("cvpress ", env!("CARGO_PKG_VERSION"));

/// Fonts registered in every document, in resource order (`/F0`, `/F1`).
const FONTS: [FontStyle; 2] = [FontStyle::Normal, FontStyle::Bold];

/// Document information dictionary entries.
#[derive(Debug, Clone, Default)]
pub struct DocumentInfo {
    pub title: Option<String>,
    pub author: Option<String>,
}

pub struct PdfWriter;

impl PdfWriter {
    pub fn new() -> Self {
        Self
    }

    /// Serializes `pages` into a complete PDF byte vector.
    pub fn write(&self, pages: &[Page], info: &DocumentInfo) -> Vec<u8> {
        let mut table = ObjectTable::new();
        // The page tree refers to its kids and they refer back, so both ids exist
        // before anything is written.
        let catalog_id = table.reserve();
        let tree_id = table.reserve();

        let font_resources = FONTS
            .iter()
            .enumerate()
            .map(|(index, style)| {
                let id = table.add(format!(
                    "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
                    style.pdf_name()
                ));
                format!("/F{index} {id} 0 R")
            })
            .collect::<Vec<_>>()
            .join(" ");

        let kids: Vec<String> = pages
            .iter()
            .map(|page| {
                let compressed = compress_to_vec_zlib(self.content_stream(page).as_bytes(), 6);
                let mut stream = format!(
                    "<< /Length {} /Filter /FlateDecode >>\nstream\n",
                    compressed.len()
                )
                .into_bytes();
                stream.extend_from_slice(&compressed);
                stream.extend_from_slice(b"\nendstream");
                let content_id = table.add(stream);

                let page_id = table.add(format!(
                    "<< /Type /Page /Parent {tree_id} 0 R /MediaBox [0 0 {:.2} {:.2}] \
                     /Contents {content_id} 0 R /Resources << /Font << {font_resources} >> >> >>",
                    page.width, page.height
                ));
                format!("{page_id} 0 R")
            })
            .collect();

        table.emit(
            tree_id,
            format!(
                "<< /Type /Pages /Kids [{}] /Count {} >>",
                kids.join(" "),
                kids.len()
            ),
        );
        table.emit(catalog_id, format!("<< /Type /Catalog /Pages {tree_id} 0 R >>"));
        let info_id = table.add(info_dictionary(info));

        table.finish(catalog_id, info_id)
    }

    fn content_stream(&self, page: &Page) -> String {
        let mut stream = String::new();
        for op in &page.elements {
            match op {
                DrawOp::Text(run) => write_text(&mut stream, run, page.height),
                DrawOp::Line(line) => write_line(&mut stream, line, page.height),
            }
        }
        stream
    }
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn write_text(stream: &mut String, run: &TextRun, page_height: f32) {
    let (r, g, b) = run.color.unit();
    let font = FONTS.iter().position(|s| *s == run.style).unwrap_or(0);
    let _ = write!(
        stream,
        "BT\n{:.3} {:.3} {:.3} rg\n/F{} {:.1} Tf\n{:.2} {:.2} Td\n({}) Tj\nET\n",
        r,
        g,
        b,
        font,
        run.font_size,
        run.x,
        page_height - run.baseline,
        encode_text(&run.text)
    );
}

/// The stroke is centered inside the band `[y, y + thickness]` the layout reserved.
fn write_line(stream: &mut String, line: &LineSegment, page_height: f32) {
    let (r, g, b) = line.color.unit();
    let half = line.thickness / 2.0;
    let _ = write!(
        stream,
        "q\n{:.3} {:.3} {:.3} RG\n{:.2} w\n{:.2} {:.2} m\n{:.2} {:.2} l\nS\nQ\n",
        r,
        g,
        b,
        line.thickness,
        line.x1,
        page_height - (line.y1 + half),
        line.x2,
        page_height - (line.y2 + half)
    );
}

/// Encodes `text` as the body of a PDF literal string in WinAnsi.
///
/// Characters WinAnsi cannot represent become `?`. Bytes outside printable ASCII
/// are written as octal escapes so the content stream stays ASCII.
fn encode_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match unicode_to_winansi(ch).unwrap_or(b'?') {
            b'\\' => out.push_str("\\\\"),
            b'(' => out.push_str("\\("),
            b')' => out.push_str("\\)"),
            b @ 0x20..=0x7E => out.push(b as char),
            b => {
                let _ = write!(out, "\\{:03o}", b);
            }
        }
    }
    out
}

/// Unicode characters Windows-1252 places in 0x80..=0x9F, indexed by `byte - 0x80`.
/// The five unassigned codes are `None`.
#[rustfmt::skip]
const CP1252_C1: [Option<char>; 32] = [
    Some('\u{20ac}'), None, Some('\u{201a}'), Some('\u{0192}'),
    Some('\u{201e}'), Some('\u{2026}'), Some('\u{2020}'), Some('\u{2021}'),
    Some('\u{02c6}'), Some('\u{2030}'), Some('\u{0160}'), Some('\u{2039}'),
    Some('\u{0152}'), None, Some('\u{017d}'), None,
    None, Some('\u{2018}'), Some('\u{2019}'), Some('\u{201c}'),
    Some('\u{201d}'), Some('\u{2022}'), Some('\u{2013}'), Some('\u{2014}'),
    Some('\u{02dc}'), Some('\u{2122}'), Some('\u{0161}'), Some('\u{203a}'),
    Some('\u{0153}'), None, Some('\u{017e}'), Some('\u{0178}'),
];

/// Windows-1252 code for `ch`, if it has one.
fn unicode_to_winansi(ch: char) -> Option<u8> {
    match u8::try_from(u32::from(ch)) {
        // Latin-1 is shared with Windows-1252 outside the C0 and C1 control ranges.
        Ok(byte @ (0x20..=0x7e | 0xa0..=0xff)) => Some(byte),
        Ok(_) => None,
        Err(_) => CP1252_C1
            .iter()
            .position(|mapped| *mapped == Some(ch))
            .map(|index| 0x80 + index as u8),
    }
}

fn info_dictionary(info: &DocumentInfo) -> String {
    let mut dict = String::from("<< ");
    if let Some(title) = info.title.as_deref() {
        let _ = write!(dict, "/Title ({}) ", encode_text(title));
    }
    if let Some(author) = info.author.as_deref() {
        let _ = write!(dict, "/Author ({}) ", encode_text(author));
    }
    let _ = write!(dict, "/Producer ({}) >>", PRODUCER);
    dict
}

// ────────────────────────────────────────────────────────────────────────────
// Object table
// ────────────────────────────────────────────────────────────────────────────

/// Numbers indirect objects and writes them straight into the file body.
///
/// Objects land in the body in the order they are emitted, which need not match
/// their ids; the cross-reference table is built from the recorded offsets in id
/// order when the file is finished.
struct ObjectTable {
    body: Vec<u8>,
    /// Byte offset per object id, `None` until emitted. Index 0 is unused.
    offsets: Vec<Option<usize>>,
}

impl ObjectTable {
    fn new() -> Self {
        let mut body = Vec::new();
        body.extend_from_slice(b"%PDF-1.7\n");
        // Binary marker so transfer tools keep the file 8-bit clean.
        body.extend_from_slice(b"%\xe2\xe3\xcf\xd3\n");
        Self {
            body,
            offsets: vec![None],
        }
    }

    /// Allocates an id whose object is emitted later.
    fn reserve(&mut self) -> usize {
        self.offsets.push(None);
        self.offsets.len() - 1
    }

    fn add(&mut self, object: impl AsRef<[u8]>) -> usize {
        let id = self.reserve();
        self.emit(id, object);
        id
    }

    fn emit(&mut self, id: usize, object: impl AsRef<[u8]>) {
        self.offsets[id] = Some(self.body.len());
        let _ = write!(self.body, "{id} 0 obj\n");
        self.body.extend_from_slice(object.as_ref());
        self.body.extend_from_slice(b"\nendobj\n\n");
    }

    /// Appends the cross-reference table and trailer.
    fn finish(mut self, root_id: usize, info_id: usize) -> Vec<u8> {
        let size = self.offsets.len();
        let xref_offset = self.body.len();
        let _ = write!(self.body, "xref\n0 {size}\n");
        for offset in &self.offsets {
            let _ = match offset {
                Some(offset) => write!(self.body, "{offset:010} 00000 n \n"),
                None => write!(self.body, "0000000000 65535 f \n"),
            };
        }
        let _ = write!(
            self.body,
            "trailer\n<< /Size {size} /Root {root_id} 0 R /Info {info_id} 0 R >>\n\
             startxref\n{xref_offset}\n%%EOF\n"
        );
        self.body
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
