//! `using namespace std;` insertion

use super::{CodeMask, Rule, Stage};
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

static IOSTREAM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"#[ \t]*include[ \t]*<iostream>").expect("iostream pattern is valid")
});

static USING_STD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\busing\s+namespace\s+std\s*;").expect("using pattern is valid")
});

static INCLUDE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*#[ \t]*include\b.*$").expect("include line pattern is valid")
});

/// Once `<iostream>` is included, add `using namespace std;` after the last
/// include line. Never inserts a second directive.
pub struct NamespaceInsertion;

impl Rule for NamespaceInsertion {
    fn name(&self) -> &'static str {
        "namespace-std"
    }

    fn stage(&self) -> Stage {
        Stage::Directives
    }

    fn apply<'a>(&self, source: &'a str) -> Cow<'a, str> {
        if USING_STD.is_match(source) {
            return Cow::Borrowed(source);
        }

        let mask = CodeMask::new(source);
        if !IOSTREAM
            .find_iter(source)
            .any(|m| mask.is_code(m.start()))
        {
            return Cow::Borrowed(source);
        }

        let Some(last) = INCLUDE_LINE
            .find_iter(source)
            .filter(|m| mask.is_code(m.start() + m.as_str().find('#').unwrap_or(0)))
            .last()
        else {
            return Cow::Borrowed(source);
        };

        let mut out = String::with_capacity(source.len() + 24);
        out.push_str(&source[..last.end()]);
        out.push_str("\n\nusing namespace std;");
        out.push_str(&source[last.end()..]);
        Cow::Owned(out)
    }
}
