use dexadmin_types::AccountId;
use thiserror::Error;

/// Errors reported by the exchange core
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("account {0} not found")]
    AccountNotFound(AccountId),

    #[error("market {0} not found")]
    MarketNotFound(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
