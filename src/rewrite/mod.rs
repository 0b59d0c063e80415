//! Direct text rewriting from C idioms to C++ idioms
//!
//! A [`Pipeline`] is an ordered list of independent [`Rule`]s applied to raw
//! source text. Each rule belongs to a [`Stage`]; the pipeline keeps rules
//! sorted by stage no matter in which order they were added, which is what
//! guarantees that header mapping runs before namespace insertion, stream
//! rewriting before memory rewriting, and cleanup last.
//!
//! # Rule catalog
//!
//! | Rule | Stage | Module |
//! |---|---|---|
//! | `header-mapping` | Headers | [`headers`] |
//! | `namespace-std` | Directives | [`namespace`] |
//! | `printf-to-cout`, `scanf-to-cin` | StreamIo | [`stream_io`] |
//! | `malloc-to-new`, `free-to-delete` | Memory | [`memory`] |
//! | `null-to-nullptr`, `struct-to-class` | Idioms | [`nullptr`], [`classes`] |
//! | `trailing-whitespace`, `blank-lines` | Cleanup | [`cleanup`] |
//!
//! Rules never fail. A rule whose pattern does not match leaves the text
//! untouched, and applying any rule a second time has no further effect.

pub mod classes;
pub mod cleanup;
pub mod headers;
pub mod memory;
pub mod namespace;
pub mod nullptr;
pub mod stream_io;

use regex::{Captures, Regex};
use rustc_hash::FxHashSet;
use std::borrow::Cow;

/// Ordering groups for rules. Earlier stages always run first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    Headers,
    Directives,
    StreamIo,
    Memory,
    Idioms,
    Cleanup,
}

/// A single text-to-text rewrite.
pub trait Rule: Send + Sync {
    /// Stable kebab-case identifier, used to disable rules and in reports.
    fn name(&self) -> &'static str;

    fn stage(&self) -> Stage;

    /// Rewrite `source`, borrowing it unchanged when nothing matched.
    fn apply<'a>(&self, source: &'a str) -> Cow<'a, str>;
}

/// Which rules changed the text during one [`Pipeline::run`].
#[derive(Debug, Clone, Default)]
pub struct RewriteReport {
    changed: FxHashSet<&'static str>,
}

impl RewriteReport {
    pub fn changed(&self, rule: &str) -> bool {
        self.changed.contains(rule)
    }

    pub fn changed_count(&self) -> usize {
        self.changed.len()
    }
}

/// Ordered rule list.
#[derive(Default)]
pub struct Pipeline {
    rules: Vec<Box<dyn Rule>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// The full C to C++ rule catalog.
    pub fn standard() -> Self {
        Self::new()
            .with(headers::HeaderMapping)
            .with(namespace::NamespaceInsertion)
            .with(stream_io::PrintfToCout)
            .with(stream_io::ScanfToCin)
            .with(memory::MallocToNew)
            .with(memory::FreeToDelete)
            .with(nullptr::NullToNullptr)
            .with(classes::StructToClass)
            .with(cleanup::TrailingWhitespace)
            .with(cleanup::BlankLines)
    }

    /// Add a rule after every rule of the same or an earlier stage.
    pub fn push(&mut self, rule: impl Rule + 'static) {
        let stage = rule.stage();
        let idx = self
            .rules
            .iter()
            .position(|existing| existing.stage() > stage)
            .unwrap_or(self.rules.len());
        self.rules.insert(idx, Box::new(rule));
    }

    pub fn with(mut self, rule: impl Rule + 'static) -> Self {
        self.push(rule);
        self
    }

    /// Drop the rule with the given name; returns whether it was present.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.rules.len();
        self.rules.retain(|rule| rule.name() != name);
        self.rules.len() != before
    }

    pub fn without(mut self, name: &str) -> Self {
        self.remove(name);
        self
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn apply(&self, source: &str) -> String {
        self.run(source).0
    }

    /// Apply every rule in order, recording which ones changed the text.
    pub fn run(&self, source: &str) -> (String, RewriteReport) {
        let mut report = RewriteReport::default();
        let mut text = source.to_string();

        for rule in &self.rules {
            let rewritten = match rule.apply(&text) {
                Cow::Owned(rewritten) if rewritten != text => rewritten,
                _ => continue,
            };
            tracing::debug!(rule = rule.name(), "rule rewrote source");
            report.changed.insert(rule.name());
            text = rewritten;
        }

        (text, report)
    }
}

/// Per-byte flags telling whether a position is code, as opposed to the
/// inside of a string/char literal or a comment.
pub(crate) struct CodeMask {
    code: Vec<bool>,
}

impl CodeMask {
    pub(crate) fn new(source: &str) -> Self {
        #[derive(Clone, Copy, PartialEq)]
        enum State {
            Code,
            Str(char),
            Escape(char),
            LineComment,
            BlockComment,
        }

        let mut code = vec![true; source.len()];
        let mut state = State::Code;
        let mut iter = source.char_indices().peekable();

        while let Some((idx, c)) = iter.next() {
            let next = iter.peek().map(|&(_, n)| n);
            let in_code = match state {
                State::Code => match (c, next) {
                    ('/', Some('/')) => {
                        state = State::LineComment;
                        false
                    }
                    ('/', Some('*')) => {
                        state = State::BlockComment;
                        iter.next();
                        code[idx + 1] = false;
                        false
                    }
                    ('"' | '\'', _) => {
                        state = State::Str(c);
                        false
                    }
                    _ => true,
                },
                State::Str(quote) => {
                    if c == '\\' {
                        state = State::Escape(quote);
                    } else if c == quote || c == '\n' {
                        state = State::Code;
                    }
                    false
                }
                State::Escape(quote) => {
                    state = State::Str(quote);
                    false
                }
                State::LineComment => {
                    if c == '\n' {
                        state = State::Code;
                        true
                    } else {
                        false
                    }
                }
                State::BlockComment => {
                    if c == '*' && next == Some('/') {
                        state = State::Code;
                        iter.next();
                        code[idx + 1] = false;
                    }
                    false
                }
            };
            for flag in &mut code[idx..idx + c.len_utf8()] {
                *flag = in_code;
            }
        }

        Self { code }
    }

    pub(crate) fn is_code(&self, idx: usize) -> bool {
        self.code.get(idx).copied().unwrap_or(false)
    }
}

/// Replace regex matches that start in code; `rewrite` returning `None`
/// leaves that match as it is.
pub(crate) fn replace_in_code<'a>(
    source: &'a str,
    pattern: &Regex,
    mut rewrite: impl FnMut(&Captures) -> Option<String>,
) -> Cow<'a, str> {
    let mask = CodeMask::new(source);
    let mut out = String::new();
    let mut last = 0;
    let mut changed = false;

    for caps in pattern.captures_iter(source) {
        let Some(whole) = caps.get(0) else { continue };
        if !mask.is_code(whole.start()) {
            continue;
        }
        if let Some(replacement) = rewrite(&caps) {
            out.push_str(&source[last..whole.start()]);
            out.push_str(&replacement);
            last = whole.end();
            changed = true;
        }
    }

    if !changed {
        return Cow::Borrowed(source);
    }
    out.push_str(&source[last..]);
    Cow::Owned(out)
}

/// A function call found in source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Call {
    /// Byte offset of the function name
    pub start: usize,
    /// Byte offset just past the closing parenthesis
    pub end: usize,
    /// Trimmed top-level arguments
    pub args: Vec<String>,
}

/// Find calls whose opening `name (` is matched by `opener`, pairing
/// parentheses and splitting arguments at top-level commas. Calls without a
/// closing parenthesis are skipped.
pub(crate) fn find_calls(source: &str, opener: &Regex) -> Vec<Call> {
    let mask = CodeMask::new(source);
    let mut calls = Vec::new();
    let mut resume = 0;

    for found in opener.find_iter(source) {
        if found.start() < resume || !mask.is_code(found.start()) {
            continue;
        }
        if let Some((end, args)) = scan_arguments(source, found.end()) {
            calls.push(Call {
                start: found.start(),
                end,
                args,
            });
            resume = end;
        }
    }

    calls
}

/// Scan from just after an opening parenthesis to its match.
fn scan_arguments(source: &str, from: usize) -> Option<(usize, Vec<String>)> {
    let mut depth = 1usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut args = Vec::new();
    let mut arg_start = from;

    for (offset, c) in source[from..].char_indices() {
        let idx = from + offset;
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => {
                depth -= 1;
                if depth == 0 {
                    let last = source[arg_start..idx].trim();
                    if !last.is_empty() || !args.is_empty() {
                        args.push(last.to_string());
                    }
                    return Some((idx + 1, args));
                }
            }
            ',' if depth == 1 => {
                args.push(source[arg_start..idx].trim().to_string());
                arg_start = idx + 1;
            }
            _ => {}
        }
    }

    None
}

/// Rebuild `source` with the given calls replaced; `rewrite` returning `None`
/// keeps the original call text.
pub(crate) fn replace_calls<'a>(
    source: &'a str,
    opener: &Regex,
    mut rewrite: impl FnMut(&[String]) -> Option<String>,
) -> Cow<'a, str> {
    let mut out = String::new();
    let mut last = 0;
    let mut changed = false;

    for call in find_calls(source, opener) {
        if let Some(replacement) = rewrite(&call.args) {
            out.push_str(&source[last..call.start]);
            out.push_str(&replacement);
            last = call.end;
            changed = true;
        }
    }

    if !changed {
        return Cow::Borrowed(source);
    }
    out.push_str(&source[last..]);
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Upper;

    impl Rule for Upper {
        fn name(&self) -> &'static str {
            "upper"
        }

        fn stage(&self) -> Stage {
            Stage::Cleanup
        }

        fn apply<'a>(&self, source: &'a str) -> Cow<'a, str> {
            Cow::Owned(source.to_uppercase())
        }
    }

    #[test]
    fn test_standard_order_is_by_stage() {
        let names = Pipeline::standard().rule_names();
        assert_eq!(
            names,
            [
                "header-mapping",
                "namespace-std",
                "printf-to-cout",
                "scanf-to-cin",
                "malloc-to-new",
                "free-to-delete",
                "null-to-nullptr",
                "struct-to-class",
                "trailing-whitespace",
                "blank-lines",
            ]
        );
    }

    #[test]
    fn test_push_order_does_not_matter() {
        let pipeline = Pipeline::new()
            .with(cleanup::BlankLines)
            .with(memory::FreeToDelete)
            .with(namespace::NamespaceInsertion)
            .with(stream_io::PrintfToCout)
            .with(headers::HeaderMapping);

        assert_eq!(
            pipeline.rule_names(),
            [
                "header-mapping",
                "namespace-std",
                "printf-to-cout",
                "free-to-delete",
                "blank-lines",
            ]
        );
    }

    #[test]
    fn test_header_mapping_feeds_namespace_insertion() {
        // Registered backwards on purpose: the stage order still applies.
        let pipeline = Pipeline::new()
            .with(namespace::NamespaceInsertion)
            .with(headers::HeaderMapping);

        let out = pipeline.apply("#include <stdio.h>\nint main() {}\n");
        assert!(out.contains("#include <iostream>"));
        assert!(out.contains("using namespace std;"));
    }

    #[test]
    fn test_same_stage_keeps_insertion_order() {
        let pipeline = Pipeline::new()
            .with(cleanup::TrailingWhitespace)
            .with(Upper)
            .with(cleanup::BlankLines);

        assert_eq!(
            pipeline.rule_names(),
            ["trailing-whitespace", "upper", "blank-lines"]
        );
    }

    #[test]
    fn test_without_removes_rule() {
        let pipeline = Pipeline::standard().without("null-to-nullptr");

        assert!(!pipeline.rule_names().contains(&"null-to-nullptr"));
        assert_eq!(pipeline.apply("p = NULL;"), "p = NULL;");
    }

    #[test]
    fn test_report_lists_changed_rules() {
        let (out, report) = Pipeline::standard().run("int *p = NULL;   \n");

        assert_eq!(out, "int *p = nullptr;\n");
        assert!(report.changed("null-to-nullptr"));
        assert!(report.changed("trailing-whitespace"));
        assert!(!report.changed("printf-to-cout"));
        assert_eq!(report.changed_count(), 2);
    }

    #[test]
    fn test_code_mask() {
        let source = r#"a "b" 'c' /* d */ e // f
g"#;
        let mask = CodeMask::new(source);
        let at = |needle: char| source.find(needle).unwrap();

        assert!(mask.is_code(at('a')));
        assert!(!mask.is_code(at('b')));
        assert!(!mask.is_code(at('c')));
        assert!(!mask.is_code(at('d')));
        assert!(mask.is_code(at('e')));
        assert!(!mask.is_code(at('f')));
        assert!(mask.is_code(at('g')));
    }

    #[test]
    fn test_find_calls_splits_top_level_arguments() {
        let opener = Regex::new(r"\bf\s*\(").unwrap();
        let calls = find_calls(r#"x = f("a, b", g(1, 2), 'c'); f ( );"#, &opener);

        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].args, [r#""a, b""#, "g(1, 2)", "'c'"]);
        assert!(calls[1].args.is_empty());
    }

    #[test]
    fn test_unclosed_call_is_skipped() {
        let opener = Regex::new(r"\bf\s*\(").unwrap();
        assert!(find_calls("f(1, 2", &opener).is_empty());
    }
}
