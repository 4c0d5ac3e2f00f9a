use std::fmt::{self, Display};

/// Errors produced by model constructors and validation routines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    EmptyField(&'static str),
    InvalidParty(String),
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
    },
    InvalidValue {
        field: &'static str,
        reason: &'static str,
    },
}

impl Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::EmptyField(field) => {
                write!(f, "{field} must not be empty")
            }
            ModelError::InvalidParty(msg) => write!(f, "invalid party: {msg}"),
            ModelError::OutOfRange { field, min, max } => {
                write!(f, "{field} must be between {min} and {max}")
            }
            ModelError::InvalidValue { field, reason } => {
                write!(f, "{field} {reason}")
            }
        }
    }
}

impl std::error::Error for ModelError {}

pub type Result<T> = std::result::Result<T, ModelError>;
