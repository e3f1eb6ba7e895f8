use chrono::NaiveDate;

use super::valuation_errors::Result;
use super::valuation_model::ValuationPoint;

/// Trait defining the contract for the valuation cache repository.
pub trait ValuationRepositoryTrait: Send + Sync {
    fn save_valuations(&self, points: &[ValuationPoint]) -> Result<()>;
    fn get_historical_valuations(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<ValuationPoint>>;
    fn get_latest_valuation(&self) -> Result<Option<ValuationPoint>>;
    fn load_latest_valuation_date(&self) -> Result<Option<NaiveDate>>;
    /// Drops cached points on or after `date` so the tail can be recomputed.
    fn delete_valuations_from(&self, date: NaiveDate) -> Result<()>;
}

/// Trait defining the contract for valuation service operations.
pub trait ValuationServiceTrait: Send + Sync {
    /// Recomputes the whole curve from the ledger and price table, caches it
    /// and returns it.
    fn recalculate(&self) -> Result<Vec<ValuationPoint>>;

    /// Recomputes only the points on or after `date`, e.g. after a
    /// late-dated transaction or a price backfill.
    fn recalculate_from(&self, date: NaiveDate) -> Result<Vec<ValuationPoint>>;

    /// Serves the cached curve, computing it first if the cache is empty.
    fn get_historical_valuations(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<ValuationPoint>>;

    fn get_latest_valuation(&self) -> Result<Option<ValuationPoint>>;
}
