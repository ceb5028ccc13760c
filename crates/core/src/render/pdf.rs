//! Minimal deterministic PDF writer.
//!
//! Produces A4 pages using the two standard Helvetica faces, so no font
//! embedding is needed. Text is restricted to printable ASCII; anything else
//! is transliterated or replaced with `?`. No timestamps or random ids are
//! written, so the same document always yields the same bytes.

use std::fmt::Write as _;

use crate::error::CoreError;
use crate::render::{format_inr, Block, LetterDocument, LetterRenderer};

const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 56.0;
const BODY_SIZE: f32 = 11.0;
const HEADING_SIZE: f32 = 14.0;
const LETTERHEAD_SIZE: f32 = 16.0;
const SMALL_SIZE: f32 = 9.0;
const LINE_GAP: f32 = 1.45;
/// Average Helvetica glyph width as a fraction of the font size.
const AVG_GLYPH_WIDTH: f32 = 0.52;
/// Helvetica digit and comma widths, exact.
const DIGIT_WIDTH: f32 = 0.556;
const COMMA_WIDTH: f32 = 0.278;

const ANNUAL_COLUMN_RIGHT: f32 = 420.0;
const MONTHLY_COLUMN_RIGHT: f32 = PAGE_WIDTH - MARGIN;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource(self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }
}

#[derive(Debug, Clone)]
enum Op {
    Text { x: f32, y: f32, font: Font, size: f32, text: String },
    Rule { y: f32 },
}

/// Renders letters as PDF with a company letterhead on the first page.
#[derive(Debug, Clone)]
pub struct PdfRenderer {
    company_name: String,
    company_address: String,
}

impl PdfRenderer {
    pub fn new(company_name: impl Into<String>, company_address: impl Into<String>) -> Self {
        Self {
            company_name: company_name.into(),
            company_address: company_address.into(),
        }
    }
}

impl LetterRenderer for PdfRenderer {
    fn render(&self, document: &LetterDocument) -> Result<Vec<u8>, CoreError> {
        let mut layout = Layout::new();
        layout.letterhead(&self.company_name, &self.company_address);
        for block in &document.blocks {
            layout.block(block);
        }
        Ok(write_pdf(&document.title, layout.finish()))
    }

    fn content_type(&self) -> &'static str {
        "application/pdf"
    }

    fn file_extension(&self) -> &'static str {
        "pdf"
    }
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

struct Layout {
    pages: Vec<Vec<Op>>,
    y: f32,
}

impl Layout {
    fn new() -> Self {
        Self {
            pages: vec![Vec::new()],
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    fn ops(&mut self) -> &mut Vec<Op> {
        self.pages.last_mut().expect("layout always has a page")
    }

    /// Reserve `height` points, starting a new page if needed; returns the
    /// baseline to draw at.
    fn advance(&mut self, height: f32) -> f32 {
        if self.y - height < MARGIN + SMALL_SIZE * 2.0 {
            self.pages.push(Vec::new());
            self.y = PAGE_HEIGHT - MARGIN;
        }
        self.y -= height;
        self.y
    }

    fn text(&mut self, x: f32, font: Font, size: f32, text: &str) {
        let y = self.advance(size * LINE_GAP);
        self.ops().push(Op::Text {
            x,
            y,
            font,
            size,
            text: sanitize(text),
        });
    }

    fn wrapped(&mut self, font: Font, size: f32, text: &str) {
        let width = PAGE_WIDTH - 2.0 * MARGIN;
        for line in wrap(&sanitize(text), width, size) {
            self.text(MARGIN, font, size, &line);
        }
    }

    fn rule(&mut self) {
        let y = self.advance(BODY_SIZE * 0.6);
        self.ops().push(Op::Rule { y });
    }

    fn letterhead(&mut self, name: &str, address: &str) {
        if !name.trim().is_empty() {
            self.text(MARGIN, Font::Bold, LETTERHEAD_SIZE, name);
        }
        if !address.trim().is_empty() {
            self.wrapped(Font::Regular, SMALL_SIZE, address);
        }
        self.rule();
        self.advance(BODY_SIZE);
    }

    fn block(&mut self, block: &Block) {
        match block {
            Block::Heading(text) => {
                self.advance(BODY_SIZE * 0.5);
                self.wrapped(Font::Bold, HEADING_SIZE, text);
            }
            Block::Paragraph(text) => {
                self.wrapped(Font::Regular, BODY_SIZE, text);
                self.advance(BODY_SIZE * 0.5);
            }
            Block::KeyValue(rows) => {
                for (label, value) in rows {
                    let y = self.advance(BODY_SIZE * LINE_GAP);
                    self.ops().push(Op::Text {
                        x: MARGIN,
                        y,
                        font: Font::Bold,
                        size: BODY_SIZE,
                        text: sanitize(label),
                    });
                    self.ops().push(Op::Text {
                        x: MARGIN + 160.0,
                        y,
                        font: Font::Regular,
                        size: BODY_SIZE,
                        text: sanitize(value),
                    });
                }
                self.advance(BODY_SIZE * 0.5);
            }
            Block::SalaryTable(rows) => self.salary_table(rows),
            Block::Signature { name, title } => {
                self.advance(BODY_SIZE * 3.0);
                self.text(MARGIN, Font::Bold, BODY_SIZE, name);
                self.text(MARGIN, Font::Regular, BODY_SIZE, title);
            }
            Block::Spacer => {
                self.advance(BODY_SIZE);
            }
        }
    }

    fn salary_table(&mut self, rows: &[crate::salary::SalaryComponent]) {
        self.table_row(Font::Bold, "Component", "Annual (INR)", "Monthly (INR)");
        self.rule();
        for (idx, row) in rows.iter().enumerate() {
            let font = if idx + 1 == rows.len() {
                self.rule();
                Font::Bold
            } else {
                Font::Regular
            };
            self.table_row(
                font,
                &row.name,
                &format_inr(row.annual_amount),
                &format_inr(row.monthly_amount),
            );
        }
        self.advance(BODY_SIZE * 0.5);
    }

    fn table_row(&mut self, font: Font, name: &str, annual: &str, monthly: &str) {
        let y = self.advance(BODY_SIZE * LINE_GAP);
        let cells = [
            (MARGIN, name),
            (ANNUAL_COLUMN_RIGHT - text_width(annual, BODY_SIZE), annual),
            (MONTHLY_COLUMN_RIGHT - text_width(monthly, BODY_SIZE), monthly),
        ];
        for (x, text) in cells {
            self.ops().push(Op::Text {
                x,
                y,
                font,
                size: BODY_SIZE,
                text: sanitize(text),
            });
        }
    }

    /// Add page footers and return the finished pages.
    fn finish(mut self) -> Vec<Vec<Op>> {
        let total = self.pages.len();
        for (idx, page) in self.pages.iter_mut().enumerate() {
            let label = format!("Page {} of {}", idx + 1, total);
            page.push(Op::Text {
                x: PAGE_WIDTH - MARGIN - text_width(&label, SMALL_SIZE),
                y: MARGIN / 2.0,
                font: Font::Regular,
                size: SMALL_SIZE,
                text: label,
            });
        }
        self.pages
    }
}

fn text_width(text: &str, size: f32) -> f32 {
    text.chars()
        .map(|c| match c {
            '0'..='9' => DIGIT_WIDTH,
            ',' | '.' => COMMA_WIDTH,
            _ => AVG_GLYPH_WIDTH,
        })
        .sum::<f32>()
        * size
}

/// Greedy word wrap using the average glyph width.
fn wrap(text: &str, width: f32, size: f32) -> Vec<String> {
    let max_chars = ((width / (size * AVG_GLYPH_WIDTH)) as usize).max(1);
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            if !line.is_empty() && line.len() + 1 + word.len() > max_chars {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
        }
        lines.push(line);
    }
    lines
}

/// Restrict to printable ASCII; the rupee sign becomes `INR`.
fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\u{20B9}' => out.push_str("INR "),
            '\u{2018}' | '\u{2019}' => out.push('\''),
            '\u{201C}' | '\u{201D}' => out.push('"'),
            '\u{2013}' | '\u{2014}' => out.push('-'),
            '\n' => out.push('\n'),
            c if c == ' ' || c.is_ascii_graphic() => out.push(c),
            c if c.is_whitespace() => out.push(' '),
            _ => out.push('?'),
        }
    }
    out
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '(' | ')' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

// ---------------------------------------------------------------------------
// Serialisation
// ---------------------------------------------------------------------------

fn content_stream(ops: &[Op]) -> String {
    let mut s = String::new();
    for op in ops {
        match op {
            Op::Text { x, y, font, size, text } => {
                let _ = writeln!(
                    s,
                    "BT /{} {size:.1} Tf {x:.2} {y:.2} Td ({}) Tj ET",
                    font.resource(),
                    escape(text)
                );
            }
            Op::Rule { y } => {
                let _ = writeln!(
                    s,
                    "0.5 w {MARGIN:.2} {y:.2} m {:.2} {y:.2} l S",
                    PAGE_WIDTH - MARGIN
                );
            }
        }
    }
    s
}

fn write_pdf(title: &str, pages: Vec<Vec<Op>>) -> Vec<u8> {
    // 1 catalog, 2 pages, 3 info, 4-5 fonts, then (page, content) pairs.
    const FIRST_PAGE_OBJ: usize = 6;
    let page_ids: Vec<usize> = (0..pages.len()).map(|i| FIRST_PAGE_OBJ + i * 2).collect();

    let mut objects: Vec<String> = vec![
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            page_ids
                .iter()
                .map(|id| format!("{id} 0 R"))
                .collect::<Vec<_>>()
                .join(" "),
            pages.len()
        ),
        format!("<< /Title ({}) >>", escape(&sanitize(title))),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_string(),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>"
            .to_string(),
    ];

    for (page, id) in pages.iter().zip(&page_ids) {
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH:.0} {PAGE_HEIGHT:.0}] \
             /Resources << /Font << /F1 4 0 R /F2 5 0 R >> >> /Contents {} 0 R >>",
            id + 1
        ));
        let stream = content_stream(page);
        objects.push(format!(
            "<< /Length {} >>\nstream\n{stream}endstream",
            stream.len()
        ));
    }

    let mut out: Vec<u8> = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (idx, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", idx + 1).as_bytes());
    }

    let xref_at = out.len();
    let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in offsets {
        let _ = write!(xref, "{offset:010} 00000 n \n");
    }
    let _ = write!(
        xref,
        "trailer\n<< /Size {} /Root 1 0 R /Info 3 0 R >>\nstartxref\n{xref_at}\n%%EOF\n",
        objects.len() + 1
    );
    out.extend_from_slice(xref.as_bytes());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::salary::{compute_breakdown, SalaryStructure};

    fn document(paragraphs: usize) -> LetterDocument {
        let mut blocks = vec![Block::Heading("Offer of Employment".into())];
        for i in 0..paragraphs {
            blocks.push(Block::Paragraph(format!(
                "Paragraph {i}: we are pleased (very) to offer you the role at \u{20B9} 6,00,000 per annum."
            )));
        }
        blocks.push(Block::SalaryTable(
            compute_breakdown(600_000.0, &SalaryStructure::default()).unwrap(),
        ));
        blocks.push(Block::Signature {
            name: "Meera Iyer".into(),
            title: "HR Manager".into(),
        });
        LetterDocument {
            title: "Offer Letter".into(),
            file_stem: "offer".into(),
            blocks,
        }
    }

    fn renderer() -> PdfRenderer {
        PdfRenderer::new("Acme Pvt Ltd", "1 Residency Road, Bengaluru")
    }

    #[test]
    fn output_is_a_pdf() {
        let bytes = renderer().render(&document(2)).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.4"));
        assert!(bytes.ends_with(b"%%EOF\n"));
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("(Fixed CTC) Tj"));
        assert!(text.contains("(6,00,000) Tj"));
        assert!(text.contains("\\(very\\)"));
        assert!(text.contains("INR 6,00,000"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let doc = document(3);
        assert_eq!(renderer().render(&doc).unwrap(), renderer().render(&doc).unwrap());
    }

    #[test]
    fn long_documents_paginate() {
        let bytes = renderer().render(&document(80)).unwrap();
        let text = String::from_utf8_lossy(&bytes);
        assert!(!text.contains("/Count 1 "));
        assert!(text.contains("(Page 2 of"));
    }

    #[test]
    fn xref_offsets_point_at_objects() {
        let bytes = renderer().render(&document(1)).unwrap();
        let text = String::from_utf8_lossy(&bytes).into_owned();
        let xref = text.find("xref\n").unwrap();
        let first_entry = text[xref..].lines().nth(3).unwrap();
        let offset: usize = first_entry[..10].parse().unwrap();
        assert!(text[offset..].starts_with("1 0 obj"));
    }

    #[test]
    fn wrap_respects_width() {
        let lines = wrap(&"word ".repeat(100), 200.0, 10.0);
        assert!(lines.len() > 1);
        let max = (200.0 / (10.0 * AVG_GLYPH_WIDTH)) as usize;
        assert!(lines.iter().all(|l| l.len() <= max));
    }
}
