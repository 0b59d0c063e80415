//! # Introduction
//!
//! c2cpp translates C source text into equivalent, more idiomatic C++ source
//! text. Output can be produced two ways: emitted from a partial syntax tree,
//! or rewritten directly from the original text by an ordered set of
//! pattern rules. A side-by-side terminal viewer is built on
//! [ratatui](https://docs.rs/ratatui).
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer → Parser → Program → Emitter ─┐
//!    └──────────────────────────────────────────┴→ Rewrite rules → C++
//! ```
//!
//! 1. [`parser`]: tokenises the source and builds a best-effort [`parser::Program`].
//! 2. [`emit`]: writes C++ from a parsed program.
//! 3. [`rewrite`]: the rule catalog (headers, `using namespace std`,
//!    `printf`/`scanf` streams, `malloc`/`free`, `NULL`, `struct`, cleanup).
//! 4. [`transpiler`]: chooses structural emission or direct rewrite and runs
//!    the pipeline; the only failure is [`transpiler::TranspileError::InvalidInput`].
//! 5. [`ui`] and [`cli`]: host side, not part of the stable library API.
//!
//! ```
//! let cpp = c2cpp::transpile("#include <stdio.h>\nint main() { printf(\"%d\\n\", 1); }").unwrap();
//! assert!(cpp.contains("cout << 1 << endl;"));
//! ```

pub mod cli;
pub mod emit;
pub mod parser;
pub mod rewrite;
pub mod transpiler;
pub mod ui;

pub use transpiler::{transpile, transpile_bytes, Options, Strategy, TranspileError, Transpiler};
