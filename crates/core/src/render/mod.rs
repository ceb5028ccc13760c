//! Letter rendering.
//!
//! Letters are first described as a [`LetterDocument`] (a flat list of
//! layout blocks) and then handed to a [`LetterRenderer`]. Identical input
//! documents always produce identical bytes.

pub mod documents;
pub mod pdf;

use crate::error::CoreError;
use crate::salary::SalaryComponent;

pub use pdf::PdfRenderer;

/// One layout element of a letter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading(String),
    Paragraph(String),
    /// Label/value rows, label in bold.
    KeyValue(Vec<(String, String)>),
    SalaryTable(Vec<SalaryComponent>),
    Signature { name: String, title: String },
    Spacer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LetterDocument {
    pub title: String,
    /// Download file name without extension.
    pub file_stem: String,
    pub blocks: Vec<Block>,
}

/// Turns a [`LetterDocument`] into a downloadable byte stream.
pub trait LetterRenderer: Send + Sync {
    fn render(&self, document: &LetterDocument) -> Result<Vec<u8>, CoreError>;

    fn content_type(&self) -> &'static str;

    fn file_extension(&self) -> &'static str;
}

/// Format a rupee amount with Indian digit grouping: `600000` -> `6,00,000`.
pub fn format_inr(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let grouped = if digits.len() <= 3 {
        digits
    } else {
        let (head, tail) = digits.split_at(digits.len() - 3);
        let mut parts: Vec<String> = Vec::new();
        let mut end = head.len();
        while end > 0 {
            let start = end.saturating_sub(2);
            parts.push(head[start..end].to_string());
            end = start;
        }
        parts.reverse();
        format!("{},{}", parts.join(","), tail)
    };
    if amount < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Make a string safe for use as a download file name.
pub fn file_stem(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|p| {
            p.chars()
                .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
                .collect::<String>()
        })
        .filter(|p| !p.trim_matches('_').is_empty())
        .collect::<Vec<_>>()
        .join("_")
}
