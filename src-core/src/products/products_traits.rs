use chrono::NaiveDate;

use super::products_errors::Result;
use super::products_model::{NewProduct, Product};

/// Trait defining the contract for catalog repository operations.
pub trait ProductRepositoryTrait: Send + Sync {
    fn get_by_id(&self, product_id: &str) -> Result<Product>;
    fn list(&self) -> Result<Vec<Product>>;
    fn search_by_name(&self, term: &str, limit: i64) -> Result<Vec<Product>>;
    fn upsert(&self, new_product: NewProduct) -> Result<Product>;
}

/// Trait defining the contract for catalog service operations.
pub trait ProductServiceTrait: Send + Sync {
    fn get_product(&self, product_id: &str) -> Result<Product>;
    fn get_products(&self) -> Result<Vec<Product>>;
    fn search_products(&self, term: &str, limit: i64) -> Result<Vec<Product>>;
    fn upsert_product(&self, new_product: NewProduct) -> Result<Product>;

    /// Validates a requested transaction date against the product's
    /// first-available date. Returns the effective date and whether it was
    /// adjusted forward.
    fn validate_transaction_date(
        &self,
        product_id: &str,
        requested_date: NaiveDate,
    ) -> Result<(NaiveDate, bool)>;
}
