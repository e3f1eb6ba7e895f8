pub mod db;

pub mod constants;
pub mod errors;
pub mod holdings;
pub mod prices;
pub mod products;
pub mod schema;
pub mod transactions;
pub mod utils;
pub mod valuation;

pub use errors::{Error, Result};
pub use transactions::*;
pub use valuation::*;
