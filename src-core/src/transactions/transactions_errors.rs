use diesel::result::Error as DieselError;
use thiserror::Error;

use crate::holdings::HoldingsError;
use crate::products::ProductError;

pub type Result<T> = std::result::Result<T, TransactionError>;

/// Custom error type for ledger operations
#[derive(Debug, Error)]
pub enum TransactionError {
    #[error("Unknown product: {0}")]
    UnknownProduct(String),

    #[error("Quantity must be positive, got {0}")]
    InvalidQuantity(i64),

    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    #[error("Insufficient inventory: requested {requested}, available {available}")]
    InsufficientInventory { requested: i64, available: i64 },

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Dependency unavailable: {0}")]
    DependencyUnavailable(String),
}

impl From<DieselError> for TransactionError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => TransactionError::NotFound("record not found".to_string()),
            _ => TransactionError::DatabaseError(err.to_string()),
        }
    }
}

impl From<ProductError> for TransactionError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound(id) => TransactionError::UnknownProduct(id),
            ProductError::InvalidData(msg) => TransactionError::InvalidData(msg),
            ProductError::DatabaseError(msg) => TransactionError::DependencyUnavailable(msg),
        }
    }
}

impl From<HoldingsError> for TransactionError {
    fn from(err: HoldingsError) -> Self {
        match err {
            HoldingsError::InsufficientInventory {
                requested,
                available,
            } => TransactionError::InsufficientInventory {
                requested,
                available,
            },
            HoldingsError::InvalidQuantity(quantity) => {
                TransactionError::InvalidQuantity(quantity)
            }
            HoldingsError::InvalidOperation(msg) => TransactionError::InvalidData(msg),
        }
    }
}
