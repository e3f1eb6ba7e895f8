use chrono::{NaiveDate, Utc};
use log::{debug, info};
use std::sync::Arc;

use crate::prices::PriceServiceTrait;
use crate::transactions::TransactionRepositoryTrait;

use super::valuation_calculator::calculate_valuation_series;
use super::valuation_errors::Result;
use super::valuation_model::ValuationPoint;
use super::valuation_traits::{ValuationRepositoryTrait, ValuationServiceTrait};

/// Service producing and caching the daily valuation curve.
///
/// The curve itself is always recomputed from the ledger and the price table;
/// the repository rows only memoize past points so a query does not replay
/// the whole history when nothing changed.
pub struct ValuationService {
    transaction_repository: Arc<dyn TransactionRepositoryTrait>,
    price_service: Arc<dyn PriceServiceTrait>,
    valuation_repository: Arc<dyn ValuationRepositoryTrait>,
}

impl ValuationService {
    /// Creates a new ValuationService instance with injected dependencies
    pub fn new(
        transaction_repository: Arc<dyn TransactionRepositoryTrait>,
        price_service: Arc<dyn PriceServiceTrait>,
        valuation_repository: Arc<dyn ValuationRepositoryTrait>,
    ) -> Self {
        Self {
            transaction_repository,
            price_service,
            valuation_repository,
        }
    }

    fn compute_series(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<ValuationPoint>> {
        let transactions = self.transaction_repository.get_transactions()?;
        let price_table = self.price_service.price_table(end_date)?;
        let price_dates = self.price_service.price_dates()?;

        calculate_valuation_series(
            &transactions,
            &price_table,
            &price_dates,
            start_date,
            end_date,
            Utc::now().naive_utc(),
        )
    }
}

impl ValuationServiceTrait for ValuationService {
    fn recalculate(&self) -> Result<Vec<ValuationPoint>> {
        let points = self.compute_series(None, None)?;
        self.valuation_repository.save_valuations(&points)?;
        info!("Recalculated {} valuation points", points.len());
        Ok(points)
    }

    fn recalculate_from(&self, date: NaiveDate) -> Result<Vec<ValuationPoint>> {
        self.valuation_repository.delete_valuations_from(date)?;
        // Replay still starts at the first transaction; only the emitted and
        // stored points are restricted to the tail.
        let points = self.compute_series(Some(date), None)?;
        self.valuation_repository.save_valuations(&points)?;
        debug!(
            "Recalculated {} valuation points from {} forward",
            points.len(),
            date
        );
        Ok(points)
    }

    fn get_historical_valuations(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<ValuationPoint>> {
        let cached = self
            .valuation_repository
            .get_historical_valuations(start_date, end_date)?;
        if !cached.is_empty() {
            return Ok(cached);
        }

        // Cold cache: compute the full curve once, then serve the slice.
        let points = self.compute_series(None, None)?;
        if points.is_empty() {
            return Ok(points);
        }
        self.valuation_repository.save_valuations(&points)?;
        self.valuation_repository
            .get_historical_valuations(start_date, end_date)
    }

    fn get_latest_valuation(&self) -> Result<Option<ValuationPoint>> {
        self.valuation_repository.get_latest_valuation()
    }
}
