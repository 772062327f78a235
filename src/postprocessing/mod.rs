//! Final polish of the model reply before it reaches the user: strip the
//! forbidden markup, then split and relabel the four answer sections.

pub mod interpreter;
pub mod sanitizer;
pub mod segmenter;
pub mod traits;

pub use interpreter::CodeSpanNormalizer;
pub use sanitizer::sanitize;
pub use segmenter::{FormattedSection, Section, Segmenter};
pub use traits::SectionRewriter;

use tracing::debug;

#[derive(Default)]
pub struct PostProcessor {
    segmenter: Segmenter,
}

impl PostProcessor {
    pub fn new(segmenter: Segmenter) -> Self {
        Self { segmenter }
    }

    /// Raw completion in, displayable Markdown out. The segmenter sanitizes
    /// again at its own entry point; the second pass is a no-op.
    pub fn process(&self, raw: &str) -> String {
        let cleaned = sanitize(raw);
        let formatted = self.segmenter.render(&cleaned);

        debug!(
            raw_length = raw.len(),
            sanitized_length = cleaned.len(),
            formatted_length = formatted.len(),
            "Completion post-processed"
        );

        formatted
    }
}

#[cfg(test)]
mod tests;
