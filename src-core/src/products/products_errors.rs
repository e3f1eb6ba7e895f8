use diesel::result::Error as DieselError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProductError>;

/// Custom error type for catalog operations
#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<DieselError> for ProductError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => ProductError::NotFound("record not found".to_string()),
            _ => ProductError::DatabaseError(err.to_string()),
        }
    }
}
