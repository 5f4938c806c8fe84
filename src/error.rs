use thiserror::Error;

use crate::types::error::{BuildError, EvalError};

/// Unified error type covering rule building, evaluation, and I/O.
///
/// Returned by convenience methods like
/// [`GroupConfig::from_file()`](crate::GroupConfig::from_file); most APIs
/// return the narrower [`BuildError`] or [`EvalError`] directly.
#[derive(Debug, Error)]
pub enum SiftError {
    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Eval(#[from] EvalError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
