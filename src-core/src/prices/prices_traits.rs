use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;

use super::prices_errors::Result;
use super::prices_model::{PriceQuote, PriceSeries, PriceUpdate};

/// Trait defining the contract for price repository operations.
pub trait PriceRepositoryTrait: Send + Sync {
    fn save_quotes(&self, quotes: &[PriceQuote]) -> Result<()>;
    fn get_quotes_for_product(&self, product_id: &str) -> Result<Vec<PriceQuote>>;
    fn get_quotes_in_range(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<PriceQuote>>;
    fn get_price_dates(&self) -> Result<Vec<NaiveDate>>;
    fn get_latest_quote(&self, product_id: &str) -> Result<Option<PriceQuote>>;
}

/// Trait defining the contract for price service operations.
pub trait PriceServiceTrait: Send + Sync {
    /// Price observed exactly on `date`, if any.
    fn price_on(&self, product_id: &str, date: NaiveDate) -> Result<Option<Decimal>>;

    /// Most recent observation on or before `date` (last observation carried
    /// forward), if any exists.
    fn price_on_or_before(
        &self,
        product_id: &str,
        date: NaiveDate,
    ) -> Result<Option<(NaiveDate, Decimal)>>;

    fn series_for(&self, product_id: &str) -> Result<Arc<PriceSeries>>;

    /// Full per-product price table up to an optional end date, for the
    /// valuation replay.
    fn price_table(&self, end_date: Option<NaiveDate>) -> Result<HashMap<String, PriceSeries>>;

    /// Distinct dates carrying at least one observation, ascending.
    fn price_dates(&self) -> Result<Vec<NaiveDate>>;

    fn upsert_prices(&self, updates: Vec<PriceUpdate>) -> Result<Vec<PriceQuote>>;
}
