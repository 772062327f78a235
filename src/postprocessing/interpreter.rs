//! Excel-formula section interpreter.
//!
//! Re-wraps every inline code span of the formula section. Today the span is
//! emitted unchanged; formula-specific rewriting plugs in here.

use super::traits::SectionRewriter;
use regex::Regex;
use std::sync::LazyLock;

static CODE_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`(.*?)`").expect("code span pattern is valid"));

#[derive(Debug, Default, Clone, Copy)]
pub struct CodeSpanNormalizer;

impl SectionRewriter for CodeSpanNormalizer {
    fn rewrite(&self, body: &str) -> String {
        CODE_SPAN.replace_all(body, "`${1}`").into_owned()
    }
}
