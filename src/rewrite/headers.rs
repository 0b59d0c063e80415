//! Legacy C header → C++ header mapping

use super::{replace_in_code, Rule, Stage};
use regex::Regex;
use rustc_hash::FxHashMap;
use std::borrow::Cow;
use std::sync::LazyLock;

/// C standard headers and their C++ counterparts, in output order.
pub const HEADER_TABLE: &[(&str, &[&str])] = &[
    ("stdio.h", &["iostream", "cstdio"]),
    ("stdlib.h", &["cstdlib"]),
    ("string.h", &["cstring", "string"]),
    ("math.h", &["cmath"]),
    ("time.h", &["ctime"]),
    ("assert.h", &["cassert"]),
    ("ctype.h", &["cctype"]),
    ("errno.h", &["cerrno"]),
    ("float.h", &["cfloat"]),
    ("limits.h", &["climits"]),
    ("locale.h", &["clocale"]),
    ("setjmp.h", &["csetjmp"]),
    ("signal.h", &["csignal"]),
    ("stdarg.h", &["cstdarg"]),
    ("stddef.h", &["cstddef"]),
];

static HEADERS: LazyLock<FxHashMap<&'static str, &'static [&'static str]>> =
    LazyLock::new(|| HEADER_TABLE.iter().copied().collect());

static INCLUDE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"#[ \t]*include[ \t]*<([^<>\s]+)>").expect("include pattern is valid")
});

/// C++ counterparts of a C header name such as `stdio.h`.
pub fn cpp_headers(c_header: &str) -> Option<&'static [&'static str]> {
    HEADERS.get(c_header).copied()
}

/// Replacement `#include` lines for a C header, one per counterpart.
pub fn mapped_includes(c_header: &str) -> Option<String> {
    cpp_headers(c_header).map(|headers| {
        headers
            .iter()
            .map(|h| format!("#include <{}>", h))
            .collect::<Vec<_>>()
            .join("\n")
    })
}

/// `#include <stdio.h>` → `#include <iostream>` + `#include <cstdio>`, and so
/// on for every header in [`HEADER_TABLE`]. Other headers are not touched.
pub struct HeaderMapping;

impl Rule for HeaderMapping {
    fn name(&self) -> &'static str {
        "header-mapping"
    }

    fn stage(&self) -> Stage {
        Stage::Headers
    }

    fn apply<'a>(&self, source: &'a str) -> Cow<'a, str> {
        replace_in_code(source, &INCLUDE, |caps| mapped_includes(&caps[1]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_table_entry_maps() {
        for (c_header, cpp) in HEADER_TABLE {
            let source = format!("#include <{}>\n", c_header);
            let out = HeaderMapping.apply(&source);

            for header in *cpp {
                assert!(
                    out.contains(&format!("#include <{}>", header)),
                    "{} should map to {}",
                    c_header,
                    header
                );
            }
            assert!(!out.contains(c_header), "{} left in output", c_header);
        }
    }

    #[test]
    fn test_stdio_maps_to_iostream_and_cstdio() {
        assert_eq!(
            HeaderMapping.apply("#include <stdio.h>\nint x;"),
            "#include <iostream>\n#include <cstdio>\nint x;"
        );
    }

    #[test]
    fn test_unknown_and_quoted_headers_untouched() {
        let source = "#include <stdbool.h>\n#include \"stdio.h\"\n#include <vector>\n";
        assert!(matches!(HeaderMapping.apply(source), Cow::Borrowed(_)));
    }

    #[test]
    fn test_spacing_variants() {
        assert_eq!(
            HeaderMapping.apply("#  include<math.h>"),
            "#include <cmath>"
        );
    }

    #[test]
    fn test_mapping_is_idempotent() {
        let once = HeaderMapping.apply("#include <string.h>\n").into_owned();
        assert_eq!(HeaderMapping.apply(&once), once);
    }

    #[test]
    fn test_include_inside_comment_untouched() {
        let source = "// #include <stdio.h>\n";
        assert_eq!(HeaderMapping.apply(source), source);
    }
}
