//! `NULL` → `nullptr`

use super::{replace_in_code, Rule, Stage};
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

static NULL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bNULL\b").expect("NULL pattern is valid"));

/// Replaces the identifier `NULL`, never a substring of a longer identifier
/// and never inside literals or comments.
pub struct NullToNullptr;

impl Rule for NullToNullptr {
    fn name(&self) -> &'static str {
        "null-to-nullptr"
    }

    fn stage(&self) -> Stage {
        Stage::Idioms
    }

    fn apply<'a>(&self, source: &'a str) -> Cow<'a, str> {
        replace_in_code(source, &NULL, |_| Some("nullptr".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standalone_null() {
        assert_eq!(
            NullToNullptr.apply("if (p == NULL) p = NULL;"),
            "if (p == nullptr) p = nullptr;"
        );
    }

    #[test]
    fn test_identifier_boundaries() {
        let source = "int NULLPTR_VAR = 1; int MY_NULL = 2; int NULL_X;";
        assert!(matches!(NullToNullptr.apply(source), Cow::Borrowed(_)));
    }

    #[test]
    fn test_literals_and_comments_untouched() {
        let source = "puts(\"NULL\"); // NULL\n/* NULL */";
        assert!(matches!(NullToNullptr.apply(source), Cow::Borrowed(_)));
    }
}
