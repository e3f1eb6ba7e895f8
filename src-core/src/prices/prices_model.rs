use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::constants::PRICE_DECIMAL_PRECISION;
use crate::utils::decimal_serde::decimal_serde;

use super::prices_constants::{DATA_SOURCE_IMPORT, DATA_SOURCE_MANUAL};
use super::prices_errors::PriceError;

/// Per-product price history ordered by observation date. The ordering is
/// what makes the last-observation-carried-forward lookup a range scan.
pub type PriceSeries = BTreeMap<NaiveDate, Decimal>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DataSource {
    Manual,
    Import,
}

impl DataSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSource::Manual => DATA_SOURCE_MANUAL,
            DataSource::Import => DATA_SOURCE_IMPORT,
        }
    }
}

impl FromStr for DataSource {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            DATA_SOURCE_MANUAL => Ok(DataSource::Manual),
            DATA_SOURCE_IMPORT => Ok(DataSource::Import),
            other => Err(PriceError::InvalidData(format!(
                "Unknown data source: {}",
                other
            ))),
        }
    }
}

/// Domain model representing one market-price observation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    pub id: String,
    pub product_id: String,
    pub price_date: NaiveDate,
    #[serde(with = "decimal_serde")]
    pub market_price: Decimal,
    pub data_source: DataSource,
    pub created_at: NaiveDateTime,
}

/// Database model for price observations
#[derive(
    Queryable, Selectable, Identifiable, Insertable, AsChangeset, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::daily_prices)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PriceQuoteDB {
    pub id: String,
    pub product_id: String,
    pub price_date: NaiveDate,
    pub market_price: String,
    pub data_source: String,
    pub created_at: NaiveDateTime,
}

/// Input model for upserting a price observation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceUpdate {
    pub product_id: String,
    pub price_date: NaiveDate,
    #[serde(with = "decimal_serde")]
    pub market_price: Decimal,
    pub data_source: DataSource,
}

impl PriceQuote {
    /// Stable quote id, one observation per product per day.
    pub fn quote_id(product_id: &str, price_date: NaiveDate) -> String {
        format!("{}_{}", product_id, price_date.format("%Y-%m-%d"))
    }
}

impl From<PriceQuoteDB> for PriceQuote {
    fn from(db: PriceQuoteDB) -> Self {
        PriceQuote {
            id: db.id,
            product_id: db.product_id,
            price_date: db.price_date,
            market_price: Decimal::from_str(&db.market_price).unwrap_or_default(),
            data_source: DataSource::from_str(&db.data_source).unwrap_or(DataSource::Manual),
            created_at: db.created_at,
        }
    }
}

impl From<PriceQuote> for PriceQuoteDB {
    fn from(quote: PriceQuote) -> Self {
        PriceQuoteDB {
            id: quote.id,
            product_id: quote.product_id,
            price_date: quote.price_date,
            market_price: quote
                .market_price
                .round_dp(PRICE_DECIMAL_PRECISION)
                .to_string(),
            data_source: quote.data_source.as_str().to_string(),
            created_at: quote.created_at,
        }
    }
}
