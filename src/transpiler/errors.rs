//! Error type for the transpiler core
//!
//! The core is total over textual input: malformed C never fails, it just
//! passes through with fewer rewrites. The one hard failure is input that is
//! not source text at all.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranspileError {
    /// Input is empty, whitespace only, or not text
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },
}

impl TranspileError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        TranspileError::InvalidInput {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TranspileError>;
