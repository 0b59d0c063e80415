//! Whitespace cleanup, run after every other rule

use super::{Rule, Stage};
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::LazyLock;

// `R`: `$` also matches before `\r\n`
static TRAILING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?mR)[ \t]+$").expect("trailing pattern is valid"));

static BLANK_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\r?\n){3,}").expect("blank run pattern is valid"));

/// Strip spaces and tabs at the end of every line.
pub struct TrailingWhitespace;

impl Rule for TrailingWhitespace {
    fn name(&self) -> &'static str {
        "trailing-whitespace"
    }

    fn stage(&self) -> Stage {
        Stage::Cleanup
    }

    fn apply<'a>(&self, source: &'a str) -> Cow<'a, str> {
        TRAILING.replace_all(source, "")
    }
}

/// Collapse runs of blank lines into a single blank line.
pub struct BlankLines;

impl Rule for BlankLines {
    fn name(&self) -> &'static str {
        "blank-lines"
    }

    fn stage(&self) -> Stage {
        Stage::Cleanup
    }

    fn apply<'a>(&self, source: &'a str) -> Cow<'a, str> {
        // Keep the run's own line ending
        BLANK_RUN.replace_all(source, |caps: &Captures| {
            if caps[0].starts_with('\r') {
                "\r\n\r\n"
            } else {
                "\n\n"
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clean(source: &str) -> String {
        let trimmed = TrailingWhitespace.apply(source);
        BlankLines.apply(&trimmed).into_owned()
    }

    #[test]
    fn test_trailing_whitespace() {
        assert_eq!(clean("int x;   \nint y;\t\n"), "int x;\nint y;\n");
    }

    #[test]
    fn test_blank_runs_collapse() {
        assert_eq!(clean("a\n\n\n\n\nb"), "a\n\nb");
        assert_eq!(clean("a\n  \n\t\n\nb"), "a\n\nb");
    }

    #[test]
    fn test_single_blank_line_kept() {
        let source = "a\n\nb\n";
        assert!(matches!(TrailingWhitespace.apply(source), Cow::Borrowed(_)));
        assert!(matches!(BlankLines.apply(source), Cow::Borrowed(_)));
    }

    #[test]
    fn test_cleanup_is_idempotent() {
        let source = "x  \n\n\n\n  y \t\n\n\n";
        let once = clean(source);
        assert_eq!(clean(&once), once);

        let crlf = "int a;  \r\n\r\n\r\n\r\n\r\nint b;\t\r\n";
        let once = clean(crlf);
        assert_eq!(once, "int a;\r\n\r\nint b;\r\n");
        assert_eq!(clean(&once), once);
    }

    #[test]
    fn test_crlf_single_blank_line_kept() {
        let source = "a\r\n\r\nb\r\n";
        assert!(matches!(TrailingWhitespace.apply(source), Cow::Borrowed(_)));
        assert!(matches!(BlankLines.apply(source), Cow::Borrowed(_)));
    }
}
