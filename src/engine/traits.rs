//! Shared traits.

/// Presentation layer for one session. Receives, in order, the echoed
/// question, then either incremental snapshots ending with the final text,
/// or the fallback error message.
pub trait Presenter: Send {
    fn echo_user(&mut self, text: &str);

    /// Everything revealed so far, followed by a typing cursor.
    fn show_partial(&mut self, snapshot: &str);

    fn show_final(&mut self, text: &str);

    fn show_error(&mut self, message: &str);
}
