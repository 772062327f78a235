//! Paragraph-by-paragraph reveal of a formatted answer.
//!
//! Purely cosmetic: a zero delay renders the same snapshots without waiting.

use super::traits::Presenter;
use std::time::Duration;

pub const CURSOR: &str = "▌";

#[derive(Debug, Clone, Copy)]
pub struct IncrementalRenderer {
    delay: Duration,
}

impl Default for IncrementalRenderer {
    fn default() -> Self {
        Self::new(Duration::from_millis(200))
    }
}

impl IncrementalRenderer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn immediate() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Cumulative snapshots, one per non-blank paragraph, each with the cursor.
    pub fn snapshots(formatted: &str) -> Vec<String> {
        let mut shown = String::new();
        formatted
            .split("\n\n")
            .filter(|paragraph| !paragraph.trim().is_empty())
            .map(|paragraph| {
                shown.push_str(paragraph);
                shown.push_str("\n\n");
                format!("{shown}{CURSOR}")
            })
            .collect()
    }

    pub async fn render<P: Presenter + ?Sized>(&self, formatted: &str, presenter: &mut P) {
        for snapshot in Self::snapshots(formatted) {
            presenter.show_partial(&snapshot);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
        }
        presenter.show_final(formatted);
    }
}
