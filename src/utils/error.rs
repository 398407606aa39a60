use thiserror::Error;

// Error
//------------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum QRError {
    #[error("Empty data")]
    EmptyData,

    #[error("Data too long for the requested version and error correction level")]
    DataTooLong,

    #[error("Invalid character {0:?} for the selected encoding mode")]
    InvalidCharacter(char),

    #[error("Invalid render configuration: {0}")]
    InvalidConfig(String),

    #[error("Internal invariant violated: {0}")]
    InvariantViolation(String),
}

pub type QRResult<T> = Result<T, QRError>;
