//! C source code front end
//!
//! This module turns C source text into a partial Abstract Syntax Tree (AST):
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`parser`]: Best-effort structural parsing (tokens → AST)
//! - [`ast`]: AST node definitions
//!
//! # Recognized Shapes
//!
//! - `#include <...>` / `#include "..."` and raw `#define` lines
//! - Functions returning `int`, `void`, `float`, `char` or `double`
//! - Inside bodies: `<type> <name>;`, `<type> <name> = <expr>;`, `return <expr>;`
//!
//! Everything else is carried as verbatim text. Both stages are pure and
//! infallible: any input, including an empty one, yields a result.

pub mod ast;
pub mod lexer;
pub mod parser;

pub use ast::Program;
pub use lexer::{tokenize, Token, TokenKind};
pub use parser::{parse, parse_source, Parser};
