//! Errors raised while building expressions.

use thiserror::Error;

/// The library could not build an expression for the given operands.
///
/// Every variant means "this input combination is not supported"; callers
/// that sample operands at random treat it as a rejected draw.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConstructError {
    /// The operator rejects these operands.
    #[error("unsupported construction: {0}")]
    Unsupported(String),

    /// The operator has no unevaluated form.
    #[error("{0} has no unevaluated form")]
    UnevaluatedUnsupported(&'static str),

    /// A float literal was requested with a precision outside the supported range.
    #[error("precision {0} is outside 1..={max}", max = crate::Float::MAX_PRECISION)]
    Precision(u32),

    /// A float literal was requested from NaN or an infinity.
    #[error("float value is not finite")]
    NonFinite,
}

impl ConstructError {
    pub(crate) fn unsupported(reason: impl Into<String>) -> Self {
        Self::Unsupported(reason.into())
    }
}
