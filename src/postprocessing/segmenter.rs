//! Splits a sanitized reply into the four numbered answer sections and
//! re-renders them as labeled Markdown blocks.
//!
//! A marker is a run of ASCII digits immediately followed by a period ("1.",
//! "2."). Each marker owns the text up to the next marker or the end of the
//! input. Text before the first marker is discarded, as are markers other
//! than exactly "1" to "4". Sections keep the order in which they appear.

use super::interpreter::CodeSpanNormalizer;
use super::sanitizer::sanitize;
use super::traits::SectionRewriter;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Section {
    Explanation,
    MathFormula,
    ExcelFormula,
    NumericExample,
}

impl Section {
    /// Only the exact digit strings "1" to "4" are recognized; "01" is not.
    pub fn from_marker(marker: &str) -> Option<Self> {
        match marker {
            "1" => Some(Section::Explanation),
            "2" => Some(Section::MathFormula),
            "3" => Some(Section::ExcelFormula),
            "4" => Some(Section::NumericExample),
            _ => None,
        }
    }

    pub fn ordinal(&self) -> u8 {
        match self {
            Section::Explanation => 1,
            Section::MathFormula => 2,
            Section::ExcelFormula => 3,
            Section::NumericExample => 4,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Section::Explanation => "1. Explicação técnica breve",
            Section::MathFormula => "2. Fórmula matemática clara",
            Section::ExcelFormula => "3. Fórmula Excel aplicável",
            Section::NumericExample => "4. Exemplo numérico completo",
        }
    }
}

/// One rendered block of a reply. Derived per response, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedSection {
    pub ordinal: u8,
    pub label: &'static str,
    pub body: String,
}

impl FormattedSection {
    pub fn to_markdown(&self) -> String {
        format!("**{}**\n\n{}\n\n", self.label, self.body)
    }
}

pub struct Segmenter {
    formula_rewriter: Box<dyn SectionRewriter>,
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Segmenter {
    pub fn new() -> Self {
        Self {
            formula_rewriter: Box::new(CodeSpanNormalizer),
        }
    }

    /// Swap the rewriter applied to the Excel-formula section.
    pub fn with_formula_rewriter(mut self, rewriter: Box<dyn SectionRewriter>) -> Self {
        self.formula_rewriter = rewriter;
        self
    }

    /// Recognized sections in source order. Never fails.
    pub fn segment(&self, text: &str) -> Vec<FormattedSection> {
        let cleaned = sanitize(text);

        split_at_markers(&cleaned)
            .into_iter()
            .filter_map(|(marker, content)| {
                let section = Section::from_marker(marker)?;
                let body = content.trim();
                let body = match section {
                    Section::ExcelFormula => self.formula_rewriter.rewrite(body),
                    _ => body.to_string(),
                };
                Some(FormattedSection {
                    ordinal: section.ordinal(),
                    label: section.label(),
                    body,
                })
            })
            .collect()
    }

    /// Markdown rendering of [`Segmenter::segment`]; empty when no marker is recognized.
    pub fn render(&self, text: &str) -> String {
        let rendered: String = self
            .segment(text)
            .iter()
            .map(FormattedSection::to_markdown)
            .collect();
        rendered.trim().to_string()
    }
}

/// Single pass over the text pairing each marker with the content after it.
/// Only ASCII digits form markers, so every slice boundary falls on a char
/// boundary and other Unicode digits are ordinary body text.
fn split_at_markers(text: &str) -> Vec<(&str, &str)> {
    let bytes = text.as_bytes();
    let mut pairs = Vec::new();
    let mut current: Option<(&str, usize)> = None;
    let mut i = 0;

    while i < bytes.len() {
        if !bytes[i].is_ascii_digit() {
            i += 1;
            continue;
        }

        let start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }

        if i < bytes.len() && bytes[i] == b'.' {
            if let Some((marker, content_start)) = current.take() {
                pairs.push((marker, &text[content_start..start]));
            }
            current = Some((&text[start..i], i + 1));
            i += 1;
        }
    }

    if let Some((marker, content_start)) = current {
        pairs.push((marker, &text[content_start..]));
    }

    pairs
}
