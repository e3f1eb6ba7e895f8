use diesel::result::Error as DieselError;
use thiserror::Error;

use crate::holdings::HoldingsError;
use crate::prices::PriceError;
use crate::transactions::TransactionError;

pub type Result<T> = std::result::Result<T, ValuationError>;

/// Custom error type for valuation operations
#[derive(Debug, Error)]
pub enum ValuationError {
    #[error("Calculation error: {0}")]
    Calculation(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Ledger error: {0}")]
    Ledger(String),

    #[error("Price table error: {0}")]
    Prices(String),
}

impl From<DieselError> for ValuationError {
    fn from(err: DieselError) -> Self {
        ValuationError::DatabaseError(err.to_string())
    }
}

impl From<TransactionError> for ValuationError {
    fn from(err: TransactionError) -> Self {
        ValuationError::Ledger(err.to_string())
    }
}

impl From<PriceError> for ValuationError {
    fn from(err: PriceError) -> Self {
        ValuationError::Prices(err.to_string())
    }
}

impl From<HoldingsError> for ValuationError {
    fn from(err: HoldingsError) -> Self {
        ValuationError::Calculation(err.to_string())
    }
}
