use diesel::result::Error as DieselError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PriceError>;

/// Custom error type for price-table operations
#[derive(Debug, Error)]
pub enum PriceError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Price provider unavailable: {0}")]
    Unavailable(String),
}

impl From<DieselError> for PriceError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => PriceError::NotFound("record not found".to_string()),
            _ => PriceError::DatabaseError(err.to_string()),
        }
    }
}
