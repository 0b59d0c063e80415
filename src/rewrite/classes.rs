//! `struct Name { ... };` → `class Name { public: ... };`

use super::{CodeMask, Rule, Stage};
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

static STRUCT_HEAD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bstruct\s+\w+\s*\{").expect("struct pattern is valid"));

static ACCESS_SPECIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:public|private|protected)\s*:").expect("access pattern is valid")
});

/// Turns struct definitions closed by `};` into classes with an explicit
/// `public:` section. Definitions that already carry an access specifier,
/// `typedef struct`, and `struct T { ... } var;` are left alone.
pub struct StructToClass;

impl Rule for StructToClass {
    fn name(&self) -> &'static str {
        "struct-to-class"
    }

    fn stage(&self) -> Stage {
        Stage::Idioms
    }

    fn apply<'a>(&self, source: &'a str) -> Cow<'a, str> {
        let mask = CodeMask::new(source);
        // (start, end, replacement), non-overlapping
        let mut edits: Vec<(usize, usize, &'static str)> = Vec::new();

        for head in STRUCT_HEAD.find_iter(source) {
            if !mask.is_code(head.start()) || source[..head.start()].trim_end().ends_with("typedef")
            {
                continue;
            }
            let open = head.end() - 1;
            let Some(close) = matching_brace(source, &mask, open) else {
                continue;
            };
            if !source[close + 1..].trim_start().starts_with(';') {
                continue;
            }
            let body = &source[open + 1..close];
            if ACCESS_SPECIFIER.is_match(body) {
                continue;
            }

            let keyword_end = head.start() + "struct".len();
            let label = if body.starts_with('\n') || body.starts_with("\r\n") {
                "\npublic:"
            } else {
                " public:"
            };
            edits.push((head.start(), keyword_end, "class"));
            edits.push((open + 1, open + 1, label));
        }

        if edits.is_empty() {
            return Cow::Borrowed(source);
        }

        edits.sort_by_key(|&(start, _, _)| start);
        let mut out = String::with_capacity(source.len() + edits.len() * 8);
        let mut last = 0;
        for (start, end, replacement) in edits {
            out.push_str(&source[last..start]);
            out.push_str(replacement);
            last = end;
        }
        out.push_str(&source[last..]);
        Cow::Owned(out)
    }
}

/// Byte offset of the `}` matching the `{` at `open`, ignoring braces in
/// literals and comments.
fn matching_brace(source: &str, mask: &CodeMask, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, c) in source[open..].char_indices() {
        let idx = open + idx;
        if !mask.is_code(idx) {
            continue;
        }
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }
    None
}
