use thiserror::Error;

pub type Result<T> = std::result::Result<T, HoldingsError>;

/// Custom error type for lot-store operations
#[derive(Debug, Error)]
pub enum HoldingsError {
    #[error("Insufficient inventory: requested {requested}, available {available}")]
    InsufficientInventory { requested: i64, available: i64 },

    #[error("Quantity must be positive, got {0}")]
    InvalidQuantity(i64),

    #[error("Invalid lot operation: {0}")]
    InvalidOperation(String),
}
