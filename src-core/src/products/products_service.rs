use chrono::NaiveDate;
use log::debug;
use std::sync::Arc;

use super::products_errors::Result;
use super::products_model::{NewProduct, Product};
use super::products_traits::{ProductRepositoryTrait, ProductServiceTrait};

/// Service for catalog lookups and transaction-date validation
pub struct ProductService {
    product_repository: Arc<dyn ProductRepositoryTrait>,
}

impl ProductService {
    /// Creates a new ProductService instance with injected dependencies
    pub fn new(product_repository: Arc<dyn ProductRepositoryTrait>) -> Self {
        Self { product_repository }
    }
}

impl ProductServiceTrait for ProductService {
    fn get_product(&self, product_id: &str) -> Result<Product> {
        self.product_repository.get_by_id(product_id)
    }

    fn get_products(&self) -> Result<Vec<Product>> {
        self.product_repository.list()
    }

    fn search_products(&self, term: &str, limit: i64) -> Result<Vec<Product>> {
        self.product_repository.search_by_name(term, limit)
    }

    fn upsert_product(&self, new_product: NewProduct) -> Result<Product> {
        self.product_repository.upsert(new_product)
    }

    fn validate_transaction_date(
        &self,
        product_id: &str,
        requested_date: NaiveDate,
    ) -> Result<(NaiveDate, bool)> {
        let product = self.product_repository.get_by_id(product_id)?;

        if requested_date < product.first_available_date {
            debug!(
                "Adjusting transaction date for product {} from {} to first available {}",
                product_id, requested_date, product.first_available_date
            );
            return Ok((product.first_available_date, true));
        }
        Ok((requested_date, false))
    }
}
