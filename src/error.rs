use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArbitrageError {
    #[error("Division by zero")]
    DivisionByZero,

    #[error("Quote provider error: {0}")]
    QuoteProvider(String),

    #[error(
        "Balance of {coin_type} did not reach {expected} after {attempts} attempts (last seen {observed})"
    )]
    BalanceTimeout {
        coin_type: String,
        expected: u64,
        observed: u64,
        attempts: u32,
    },

    #[error("Submission failed: {0}")]
    Submission(String),

    #[error("Transaction {digest} not confirmed: {reason}")]
    Confirmation { digest: String, reason: String },

    #[error("RPC error: {0}")]
    Rpc(String),
}

impl ArbitrageError {
    pub fn quote(message: impl Into<String>) -> Self {
        ArbitrageError::QuoteProvider(message.into())
    }

    pub fn submission(message: impl Into<String>) -> Self {
        ArbitrageError::Submission(message.into())
    }

    pub fn rpc(message: impl Into<String>) -> Self {
        ArbitrageError::Rpc(message.into())
    }
}

pub type ArbResult<T> = std::result::Result<T, ArbitrageError>;
