use thiserror::Error;

use crate::layout::Size;

/// Everything that can go wrong addressing or configuring windows.
///
/// None of these are fatal: the non-`try_` APIs log them and degrade to a
/// "not found" result or a documented default.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WmError {
    #[error("{what} not found: {key}")]
    NotFound { what: &'static str, key: String },
    #[error("invalid {field}: {value:?}")]
    InvalidConfig { field: &'static str, value: String },
    #[error("max size {max} is smaller than min size {min}")]
    ConstraintConflict { min: Size, max: Size },
}

impl WmError {
    pub(crate) fn not_found(what: &'static str, key: impl ToString) -> Self {
        WmError::NotFound {
            what,
            key: key.to_string(),
        }
    }

    pub(crate) fn invalid(field: &'static str, value: impl Into<String>) -> Self {
        WmError::InvalidConfig {
            field,
            value: value.into(),
        }
    }
}
