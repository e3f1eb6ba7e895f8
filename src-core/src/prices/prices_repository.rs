use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use crate::db::get_connection;
use crate::prices::prices_errors::{PriceError, Result};
use crate::prices::prices_model::{PriceQuote, PriceQuoteDB};
use crate::prices::prices_traits::PriceRepositoryTrait;
use crate::schema::daily_prices;

/// Repository for managing price observations in the database
pub struct PriceRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
}

impl PriceRepository {
    /// Creates a new PriceRepository instance
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }
}

impl PriceRepositoryTrait for PriceRepository {
    fn save_quotes(&self, quotes: &[PriceQuote]) -> Result<()> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| PriceError::DatabaseError(e.to_string()))?;

        conn.transaction(|conn| {
            for chunk in quotes.chunks(1000) {
                let rows: Vec<PriceQuoteDB> = chunk
                    .iter()
                    .cloned()
                    .map(PriceQuoteDB::from)
                    .collect();

                diesel::replace_into(daily_prices::table)
                    .values(&rows)
                    .execute(conn)?;
            }
            Ok::<(), diesel::result::Error>(())
        })
        .map_err(PriceError::from)
    }

    fn get_quotes_for_product(&self, product_id: &str) -> Result<Vec<PriceQuote>> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| PriceError::DatabaseError(e.to_string()))?;

        daily_prices::table
            .filter(daily_prices::product_id.eq(product_id))
            .select(PriceQuoteDB::as_select())
            .order(daily_prices::price_date.asc())
            .load::<PriceQuoteDB>(&mut conn)
            .map(|rows| rows.into_iter().map(PriceQuote::from).collect())
            .map_err(PriceError::from)
    }

    fn get_quotes_in_range(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<PriceQuote>> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| PriceError::DatabaseError(e.to_string()))?;

        let mut query = daily_prices::table
            .select(PriceQuoteDB::as_select())
            .order((daily_prices::price_date.asc(), daily_prices::product_id.asc()))
            .into_boxed();

        if let Some(start) = start_date {
            query = query.filter(daily_prices::price_date.ge(start));
        }
        if let Some(end) = end_date {
            query = query.filter(daily_prices::price_date.le(end));
        }

        query
            .load::<PriceQuoteDB>(&mut conn)
            .map(|rows| rows.into_iter().map(PriceQuote::from).collect())
            .map_err(PriceError::from)
    }

    fn get_price_dates(&self) -> Result<Vec<NaiveDate>> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| PriceError::DatabaseError(e.to_string()))?;

        daily_prices::table
            .select(daily_prices::price_date)
            .distinct()
            .order(daily_prices::price_date.asc())
            .load::<NaiveDate>(&mut conn)
            .map_err(PriceError::from)
    }

    fn get_latest_quote(&self, product_id: &str) -> Result<Option<PriceQuote>> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| PriceError::DatabaseError(e.to_string()))?;

        daily_prices::table
            .filter(daily_prices::product_id.eq(product_id))
            .select(PriceQuoteDB::as_select())
            .order(daily_prices::price_date.desc())
            .first::<PriceQuoteDB>(&mut conn)
            .optional()
            .map(|row| row.map(PriceQuote::from))
            .map_err(PriceError::from)
    }
}
