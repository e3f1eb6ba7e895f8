use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use crate::db::get_connection;
use crate::schema::daily_valuation;
use crate::valuation::valuation_errors::{Result, ValuationError};
use crate::valuation::valuation_model::{DailyValuationDB, ValuationPoint};
use crate::valuation::valuation_traits::ValuationRepositoryTrait;

/// Repository for the cached daily valuation curve
pub struct ValuationRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
}

impl ValuationRepository {
    /// Creates a new ValuationRepository instance
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }
}

impl ValuationRepositoryTrait for ValuationRepository {
    fn save_valuations(&self, points: &[ValuationPoint]) -> Result<()> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| ValuationError::DatabaseError(e.to_string()))?;

        conn.transaction(|conn| {
            for chunk in points.chunks(1000) {
                let rows: Vec<DailyValuationDB> = chunk
                    .iter()
                    .cloned()
                    .map(DailyValuationDB::from)
                    .collect();

                diesel::replace_into(daily_valuation::table)
                    .values(&rows)
                    .execute(conn)?;
            }
            Ok::<(), diesel::result::Error>(())
        })
        .map_err(ValuationError::from)
    }

    fn get_historical_valuations(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<ValuationPoint>> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| ValuationError::DatabaseError(e.to_string()))?;

        let mut query = daily_valuation::table
            .select(DailyValuationDB::as_select())
            .order(daily_valuation::valuation_date.asc())
            .into_boxed();

        if let Some(start) = start_date {
            query = query.filter(daily_valuation::valuation_date.ge(start));
        }
        if let Some(end) = end_date {
            query = query.filter(daily_valuation::valuation_date.le(end));
        }

        query
            .load::<DailyValuationDB>(&mut conn)
            .map(|rows| rows.into_iter().map(ValuationPoint::from).collect())
            .map_err(ValuationError::from)
    }

    fn get_latest_valuation(&self) -> Result<Option<ValuationPoint>> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| ValuationError::DatabaseError(e.to_string()))?;

        daily_valuation::table
            .select(DailyValuationDB::as_select())
            .order(daily_valuation::valuation_date.desc())
            .first::<DailyValuationDB>(&mut conn)
            .optional()
            .map(|row| row.map(ValuationPoint::from))
            .map_err(ValuationError::from)
    }

    fn load_latest_valuation_date(&self) -> Result<Option<NaiveDate>> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| ValuationError::DatabaseError(e.to_string()))?;

        daily_valuation::table
            .select(diesel::dsl::max(daily_valuation::valuation_date))
            .first::<Option<NaiveDate>>(&mut conn)
            .map_err(ValuationError::from)
    }

    fn delete_valuations_from(&self, date: NaiveDate) -> Result<()> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| ValuationError::DatabaseError(e.to_string()))?;

        diesel::delete(daily_valuation::table.filter(daily_valuation::valuation_date.ge(date)))
            .execute(&mut conn)
            .map(|_| ())
            .map_err(ValuationError::from)
    }
}
