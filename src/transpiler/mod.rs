//! Transpiler driver
//!
//! Ties the front end, the structural emitter and the rewrite pipeline
//! together:
//!
//! ```text
//! source ─┬─ tokenize → parse → emit ─┐
//!         │   (structural)            ├─ rewrite pipeline → C++
//!         └───────── (direct) ────────┘
//! ```
//!
//! With [`Strategy::Auto`] the source is parsed first and structural emission
//! is used only when nothing had to be kept verbatim and the source has no
//! comments; otherwise the original text is rewritten so nothing is lost.
//! Both paths end in the same pipeline, whose rules are idempotent, so
//! statements inside emitted function bodies get the same idiom rewrites as
//! direct output.

pub mod errors;
pub mod options;

pub use errors::{Result, TranspileError};
pub use options::{Options, Strategy, UnknownStrategy};

use crate::emit::emit_program;
use crate::parser::ast::Coverage;
use crate::parser::lexer::strip_comments;
use crate::parser::parse_source;
use crate::rewrite::{Pipeline, RewriteReport};

/// Result of one transpilation with the decisions that produced it.
#[derive(Debug, Clone)]
pub struct Transpilation {
    pub output: String,
    /// Path actually taken; never [`Strategy::Auto`]
    pub strategy: Strategy,
    /// Parser coverage; default when the source was not parsed
    pub coverage: Coverage,
    pub report: RewriteReport,
}

pub struct Transpiler {
    options: Options,
    pipeline: Pipeline,
}

impl Default for Transpiler {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

impl Transpiler {
    pub fn new(options: Options) -> Self {
        let mut pipeline = Pipeline::standard();
        for name in &options.disabled_rules {
            if !pipeline.remove(name) {
                tracing::warn!(rule = %name, "cannot disable unknown rule");
            }
        }
        Self { options, pipeline }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn transpile(&self, source: &str) -> Result<String> {
        self.transpile_with_report(source).map(|t| t.output)
    }

    pub fn transpile_bytes(&self, bytes: &[u8]) -> Result<String> {
        let source = std::str::from_utf8(bytes)
            .map_err(|e| TranspileError::invalid(format!("not UTF-8 text ({})", e)))?;
        self.transpile(source)
    }

    /// Transpile and report which path was taken and which rules fired.
    pub fn transpile_with_report(&self, source: &str) -> Result<Transpilation> {
        validate(source)?;

        let (strategy, coverage, text) = match self.options.strategy {
            Strategy::Direct => (Strategy::Direct, Coverage::default(), None),
            requested => {
                let program = parse_source(source);
                let coverage = program.coverage();
                tracing::debug!(
                    structured = coverage.structured,
                    verbatim = coverage.verbatim,
                    "parsed source"
                );
                // Comments are not part of the tree, so emission would drop them
                let lossless = coverage.is_complete() && !has_comments(source);
                if requested == Strategy::Structural || lossless {
                    (Strategy::Structural, coverage, Some(emit_program(&program)))
                } else {
                    (Strategy::Direct, coverage, None)
                }
            }
        };
        tracing::debug!(requested = %self.options.strategy, chosen = %strategy, "strategy");

        let (output, report) = self.pipeline.run(text.as_deref().unwrap_or(source));
        Ok(Transpilation {
            output,
            strategy,
            coverage,
            report,
        })
    }
}

/// Transpile with default options.
pub fn transpile(source: &str) -> Result<String> {
    Transpiler::default().transpile(source)
}

/// Transpile raw bytes with default options; non-UTF-8 input is rejected.
pub fn transpile_bytes(bytes: &[u8]) -> Result<String> {
    Transpiler::default().transpile_bytes(bytes)
}

/// True if the lexer's comment pre-pass would blank anything out.
fn has_comments(source: &str) -> bool {
    strip_comments(source) != source
}

fn validate(source: &str) -> Result<()> {
    if source.trim().is_empty() {
        return Err(TranspileError::invalid("source is empty"));
    }
    if source.contains('\0') {
        return Err(TranspileError::invalid("source contains NUL bytes"));
    }
    Ok(())
}
