//! Removes the markup fragments the model is instructed never to emit.
//!
//! Two classes of text are dropped:
//! - a `{` up to the nearest following `}` on the same line, delimiters included;
//! - a backslash followed by one or more lowercase ASCII letters (`\frac`, `\text`).
//!
//! Everything else passes through untouched. An unmatched `{` stays in place.
//! Sanitizing is idempotent, so callers may run it more than once.

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

static BRACE_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{.*?\}").expect("brace span pattern is valid"));

static ESCAPE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\[a-z]+").expect("escape token pattern is valid"));

pub fn sanitize(raw: &str) -> String {
    let without_braces: Cow<'_, str> = BRACE_SPAN.replace_all(raw, "");
    ESCAPE_TOKEN.replace_all(&without_braces, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_brace_spans_non_greedy() {
        assert_eq!(sanitize("a{x}b{y}c"), "abc");
        assert_eq!(sanitize("Área {discard} = 20"), "Área  = 20");
    }

    #[test]
    fn removes_escape_tokens() {
        assert_eq!(sanitize(r"\frac 1 2"), " 1 2");
        assert_eq!(sanitize(r"\text(m²)"), "(m²)");
        // Uppercase letters are not part of the token.
        assert_eq!(sanitize(r"\Delta"), r"\Delta");
    }

    #[test]
    fn unmatched_brace_is_kept() {
        assert_eq!(sanitize("valor { sem fim"), "valor { sem fim");
        assert_eq!(sanitize("fim } solto"), "fim } solto");
    }

    #[test]
    fn braces_do_not_span_lines() {
        assert_eq!(sanitize("a{\n}b"), "a{\n}b");
    }

    #[test]
    fn escape_revealed_by_brace_removal_is_removed() {
        assert_eq!(sanitize(r"\{x}frac"), "");
    }

    #[test]
    fn sanitize_is_idempotent() {
        let samples = [
            r"1. A {b} \frac{1}{2} 2. C",
            r"\\abc{d}\e",
            "{{a}}}",
            "plain text, nothing to strip",
            "x {y\n} z \\",
            r"\{x}\frac{y}",
        ];
        for sample in samples {
            let once = sanitize(sample);
            assert_eq!(sanitize(&once), once, "sample: {sample:?}");
        }
    }
}
