//! Pluggable post-processing traits.

/// Rewrites the body of one section after the segmenter has split it out.
pub trait SectionRewriter: Send + Sync {
    fn rewrite(&self, body: &str) -> String;
}
