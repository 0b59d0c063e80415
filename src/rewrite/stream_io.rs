//! `printf` / `scanf` → `cout` / `cin` stream chains
//!
//! The format string of a `printf` call is split on its conversion
//! specifiers. Literal segments and arguments are interleaved left to right,
//! one argument per specifier; every `\n` escape inside a literal closes the
//! current segment and appends `endl`:
//!
//! ```text
//! printf("Sum = %d\n", sum)   →   cout << "Sum = " << sum << endl
//! printf("a\nb %d\n", x)      →   cout << "a" << endl << "b " << x << endl
//! ```
//!
//! A specifier with no argument left stays in the literal text, and surplus
//! arguments are dropped. Calls whose format is not a string literal are left
//! alone.

use super::{replace_calls, Rule, Stage};
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

static PRINTF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bprintf\s*\(").expect("printf pattern is valid"));

static SCANF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bscanf\s*\(").expect("scanf pattern is valid"));

/// Conversion specifier with optional flags, width, precision and length.
static SPECIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^%[-+ #0]*(?:\d+|\*)?(?:\.(?:\d+|\*))?(?:hh|h|ll|l|L|z|j|t)?[diouxXfFeEgGaAcsp]")
        .expect("specifier pattern is valid")
});

static STRING_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""((?:\\.|[^"\\])*)""#).expect("string literal pattern is valid")
});

static LITERAL_SEQUENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(?:"(?:\\.|[^"\\])*"\s*)+$"#).expect("literal sequence pattern is valid")
});

/// Contents of a format argument made of one or more adjacent string
/// literals, concatenated; `None` for anything else.
fn format_contents(arg: &str) -> Option<String> {
    if !LITERAL_SEQUENCE.is_match(arg) {
        return None;
    }
    Some(
        STRING_LITERAL
            .captures_iter(arg)
            .map(|caps| caps[1].to_string())
            .collect(),
    )
}

/// Build a `cout` chain from format contents (without quotes) and arguments.
pub fn cout_chain(format: &str, args: &[String]) -> String {
    let mut chain: Vec<String> = Vec::new();
    let mut literal = String::new();
    let mut args = args.iter();
    let mut rest = format;

    fn flush(literal: &mut String, chain: &mut Vec<String>) {
        if !literal.is_empty() {
            chain.push(format!("\"{}\"", literal));
            literal.clear();
        }
    }

    while let Some(c) = rest.chars().next() {
        if rest.starts_with("\\n") {
            flush(&mut literal, &mut chain);
            chain.push("endl".to_string());
            rest = &rest[2..];
        } else if c == '\\' {
            let escape: String = rest.chars().take(2).collect();
            literal.push_str(&escape);
            rest = &rest[escape.len()..];
        } else if rest.starts_with("%%") {
            literal.push('%');
            rest = &rest[2..];
        } else if let Some(spec) = SPECIFIER.find(rest) {
            // `*` width and precision consume an argument of their own
            let stars = spec.as_str().matches('*').count();
            if args.len() > stars {
                for _ in 0..stars {
                    args.next();
                }
                if let Some(arg) = args.next() {
                    flush(&mut literal, &mut chain);
                    chain.push(arg.clone());
                }
            } else {
                literal.push_str(spec.as_str());
            }
            rest = &rest[spec.end()..];
        } else {
            literal.push(c);
            rest = &rest[c.len_utf8()..];
        }
    }
    flush(&mut literal, &mut chain);

    if chain.is_empty() {
        return "cout << \"\"".to_string();
    }
    format!("cout << {}", chain.join(" << "))
}

/// Build a `cin` chain, dropping the address-of operator from each target.
pub fn cin_chain(targets: &[String]) -> String {
    let targets: Vec<&str> = targets
        .iter()
        .map(|t| t.strip_prefix('&').map(str::trim_start).unwrap_or(t))
        .collect();
    format!("cin >> {}", targets.join(" >> "))
}

/// `printf("fmt", args...)` → `cout << ...`
pub struct PrintfToCout;

impl Rule for PrintfToCout {
    fn name(&self) -> &'static str {
        "printf-to-cout"
    }

    fn stage(&self) -> Stage {
        Stage::StreamIo
    }

    fn apply<'a>(&self, source: &'a str) -> Cow<'a, str> {
        replace_calls(source, &PRINTF, |args| {
            let (format, rest) = args.split_first()?;
            let format = format_contents(format)?;
            Some(cout_chain(&format, rest))
        })
    }
}

/// `scanf("fmt", &a, &b)` → `cin >> a >> b`; the format itself is ignored.
pub struct ScanfToCin;

impl Rule for ScanfToCin {
    fn name(&self) -> &'static str {
        "scanf-to-cin"
    }

    fn stage(&self) -> Stage {
        Stage::StreamIo
    }

    fn apply<'a>(&self, source: &'a str) -> Cow<'a, str> {
        replace_calls(source, &SCANF, |args| match args {
            [_, targets @ ..] if !targets.is_empty() && targets.iter().all(|t| !t.is_empty()) => {
                Some(cin_chain(targets))
            }
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn printf(source: &str) -> String {
        PrintfToCout.apply(source).into_owned()
    }

    #[test]
    fn test_sum_example() {
        assert_eq!(
            printf(r#"printf("Sum = %d\n", sum);"#),
            r#"cout << "Sum = " << sum << endl;"#
        );
    }

    #[test]
    fn test_plain_string() {
        assert_eq!(
            printf(r#"printf("Enter first number: ");"#),
            r#"cout << "Enter first number: ";"#
        );
        assert_eq!(
            printf(r#"printf("Hello, World!\n");"#),
            r#"cout << "Hello, World!" << endl;"#
        );
    }

    #[test]
    fn test_multiple_specifiers_in_order() {
        assert_eq!(
            printf(r#"printf("%s is %d years and %.2f m\n", name, age, height);"#),
            r#"cout << name << " is " << age << " years and " << height << " m" << endl;"#
        );
    }

    #[test]
    fn test_multiple_newlines_between_specifiers() {
        assert_eq!(
            printf(r#"printf("a\nb %d\n\nc %x", x, y);"#),
            r#"cout << "a" << endl << "b " << x << endl << endl << "c " << y;"#
        );
    }

    #[test]
    fn test_missing_arguments_leave_specifier() {
        assert_eq!(
            printf(r#"printf("%d and %d\n", a);"#),
            r#"cout << a << " and %d" << endl;"#
        );
    }

    #[test]
    fn test_extra_arguments_ignored() {
        assert_eq!(printf(r#"printf("x=%d", a, b, c);"#), r#"cout << "x=" << a;"#);
    }

    #[test]
    fn test_argument_expressions_with_commas() {
        assert_eq!(
            printf(r#"printf("%d %s\n", max(a, b), "x, y");"#),
            r#"cout << max(a, b) << " " << "x, y" << endl;"#
        );
    }

    #[test]
    fn test_percent_literal_and_other_escapes() {
        assert_eq!(
            printf(r#"printf("100%%\t%c\n", ch);"#),
            r#"cout << "100%\t" << ch << endl;"#
        );
    }

    #[test]
    fn test_star_width_consumes_argument() {
        assert_eq!(printf(r#"printf("%*d", w, n);"#), "cout << n;");
    }

    #[test]
    fn test_length_modifiers() {
        assert_eq!(printf(r#"printf("%ld|%5u", big, small);"#), r#"cout << big << "|" << small;"#);
    }

    #[test]
    fn test_escaped_backslash_before_n_is_not_newline() {
        assert_eq!(printf(r#"printf("a\\n");"#), r#"cout << "a\\n";"#);
    }

    #[test]
    fn test_non_literal_format_untouched() {
        let source = "printf(fmt, x);";
        assert!(matches!(PrintfToCout.apply(source), Cow::Borrowed(_)));
    }

    #[test]
    fn test_fprintf_and_sprintf_untouched() {
        let source = r#"fprintf(stderr, "x"); sprintf(buf, "%d", n);"#;
        assert!(matches!(PrintfToCout.apply(source), Cow::Borrowed(_)));
    }

    #[test]
    fn test_printf_inside_string_untouched() {
        let source = r#"puts("call printf(\"x\") here");"#;
        assert!(matches!(PrintfToCout.apply(source), Cow::Borrowed(_)));
    }

    #[test]
    fn test_scanf_single() {
        assert_eq!(ScanfToCin.apply(r#"scanf("%d", &num);"#), "cin >> num;");
    }

    #[test]
    fn test_scanf_multiple_targets() {
        assert_eq!(
            ScanfToCin.apply(r#"scanf("%d %f %s", &a, & b, name);"#),
            "cin >> a >> b >> name;"
        );
    }

    #[test]
    fn test_scanf_without_targets_untouched() {
        let source = r#"scanf("%d");"#;
        assert!(matches!(ScanfToCin.apply(source), Cow::Borrowed(_)));
    }

    #[test]
    fn test_rules_are_idempotent() {
        let once = printf(r#"printf("%d\n", x); scanf("%d", &x);"#);
        assert_eq!(printf(&once), once);
        let scanned = ScanfToCin.apply(&once).into_owned();
        assert_eq!(ScanfToCin.apply(&scanned), scanned);
    }
}
