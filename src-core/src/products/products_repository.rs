use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use crate::db::get_connection;
use crate::products::products_errors::{ProductError, Result};
use crate::products::products_model::{NewProduct, Product, ProductDB};
use crate::products::products_traits::ProductRepositoryTrait;
use crate::schema::products;

/// Repository for managing catalog data in the database
pub struct ProductRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
}

impl ProductRepository {
    /// Creates a new ProductRepository instance
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }
}

impl ProductRepositoryTrait for ProductRepository {
    fn get_by_id(&self, product_id: &str) -> Result<Product> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| ProductError::DatabaseError(e.to_string()))?;

        products::table
            .find(product_id)
            .select(ProductDB::as_select())
            .first::<ProductDB>(&mut conn)
            .optional()?
            .map(Product::from)
            .ok_or_else(|| ProductError::NotFound(product_id.to_string()))
    }

    fn list(&self) -> Result<Vec<Product>> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| ProductError::DatabaseError(e.to_string()))?;

        products::table
            .select(ProductDB::as_select())
            .order(products::name.asc())
            .load::<ProductDB>(&mut conn)
            .map(|rows| rows.into_iter().map(Product::from).collect())
            .map_err(ProductError::from)
    }

    fn search_by_name(&self, term: &str, limit: i64) -> Result<Vec<Product>> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| ProductError::DatabaseError(e.to_string()))?;

        let mut query = products::table
            .select(ProductDB::as_select())
            .order(products::name.asc())
            .into_boxed();

        if !term.trim().is_empty() {
            query = query.filter(products::name.like(format!("%{}%", term.trim())));
        }

        query
            .limit(limit)
            .load::<ProductDB>(&mut conn)
            .map(|rows| rows.into_iter().map(Product::from).collect())
            .map_err(ProductError::from)
    }

    fn upsert(&self, new_product: NewProduct) -> Result<Product> {
        new_product.validate()?;
        let mut conn = get_connection(&self.pool)
            .map_err(|e| ProductError::DatabaseError(e.to_string()))?;

        let now = Utc::now().naive_utc();
        let existing = products::table
            .find(&new_product.id)
            .select(ProductDB::as_select())
            .first::<ProductDB>(&mut conn)
            .optional()?;

        let row = ProductDB {
            id: new_product.id,
            name: new_product.name,
            first_available_date: new_product.first_available_date,
            created_at: existing.as_ref().map(|p| p.created_at).unwrap_or(now),
            updated_at: now,
        };

        diesel::replace_into(products::table)
            .values(&row)
            .execute(&mut conn)?;

        Ok(Product::from(row))
    }
}
