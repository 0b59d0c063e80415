//! `malloc` / `free` → `new[]` / `delete[]`

use super::{replace_in_code, Rule, Stage};
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

static MALLOC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        (?P<lhs>\b\w+)\s*=\s*
        \(\s*(?P<cast>\w+)\s*\*\s*\)\s*
        malloc\s*\(\s*
        (?:
            (?P<count>\w+)\s*\*\s*sizeof\s*\(\s*(?P<size>\w+)\s*\)
          | sizeof\s*\(\s*(?P<size_first>\w+)\s*\)\s*\*\s*(?P<count_last>\w+)
        )
        \s*\)",
    )
    .expect("malloc pattern is valid")
});

static FREE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bfree\s*\(\s*(\w+)\s*\)").expect("free pattern is valid"));

/// `p = (T*) malloc(N * sizeof(T))` → `p = new T[N]`.
///
/// Only fires when the cast type and the `sizeof` type are the same.
pub struct MallocToNew;

impl Rule for MallocToNew {
    fn name(&self) -> &'static str {
        "malloc-to-new"
    }

    fn stage(&self) -> Stage {
        Stage::Memory
    }

    fn apply<'a>(&self, source: &'a str) -> Cow<'a, str> {
        replace_in_code(source, &MALLOC, |caps| {
            let size = caps.name("size").or_else(|| caps.name("size_first"))?;
            let count = caps.name("count").or_else(|| caps.name("count_last"))?;
            if size.as_str() != &caps["cast"] {
                return None;
            }
            Some(format!(
                "{} = new {}[{}]",
                &caps["lhs"],
                size.as_str(),
                count.as_str()
            ))
        })
    }
}

/// `free(p)` → `delete[] p`
pub struct FreeToDelete;

impl Rule for FreeToDelete {
    fn name(&self) -> &'static str {
        "free-to-delete"
    }

    fn stage(&self) -> Stage {
        Stage::Memory
    }

    fn apply<'a>(&self, source: &'a str) -> Cow<'a, str> {
        replace_in_code(source, &FREE, |caps| Some(format!("delete[] {}", &caps[1])))
    }
}
