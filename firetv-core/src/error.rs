use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Cache entry failed integrity check: {0}")]
    Corrupt(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
