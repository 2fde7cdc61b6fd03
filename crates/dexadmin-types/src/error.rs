use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum TypesError {
    #[error("{0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("account id has incorrect length: expected {expected} bytes, got {got}")]
    AccountIdLength { expected: usize, got: usize },

    #[error("unknown rule code: {0}")]
    UnknownRule(u8),
}

pub type Result<T> = std::result::Result<T, TypesError>;
