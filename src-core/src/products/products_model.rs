use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use super::products_errors::{ProductError, Result};

/// Domain model representing a catalog product
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    /// Earliest date the product had a market listing; transactions dated
    /// before this are pulled forward to it.
    pub first_available_date: NaiveDate,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Database model for products
#[derive(
    Queryable, Selectable, Identifiable, Insertable, AsChangeset, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::products)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ProductDB {
    pub id: String,
    pub name: String,
    pub first_available_date: NaiveDate,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input model for creating or refreshing a catalog entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub id: String,
    pub name: String,
    pub first_available_date: NaiveDate,
}

impl NewProduct {
    /// Validates the new product data
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(ProductError::InvalidData(
                "Product ID cannot be empty".to_string(),
            ));
        }
        if self.name.trim().is_empty() {
            return Err(ProductError::InvalidData(
                "Product name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl From<ProductDB> for Product {
    fn from(db: ProductDB) -> Self {
        Product {
            id: db.id,
            name: db.name,
            first_available_date: db.first_available_date,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<Product> for ProductDB {
    fn from(product: Product) -> Self {
        ProductDB {
            id: product.id,
            name: product.name,
            first_available_date: product.first_available_date,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_new_product_validate() {
        let product = NewProduct {
            id: "42".to_string(),
            name: "Booster Box".to_string(),
            first_available_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        };
        assert!(product.validate().is_ok());

        let blank_id = NewProduct {
            id: "  ".to_string(),
            ..product.clone()
        };
        assert!(matches!(
            blank_id.validate(),
            Err(ProductError::InvalidData(_))
        ));

        let blank_name = NewProduct {
            name: String::new(),
            ..product
        };
        assert!(blank_name.validate().is_err());
    }
}
