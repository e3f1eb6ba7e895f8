use chrono::{NaiveDate, Utc};
use dashmap::DashMap;
use log::debug;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;

use super::prices_errors::{PriceError, Result};
use super::prices_model::{PriceQuote, PriceSeries, PriceUpdate};
use super::prices_traits::{PriceRepositoryTrait, PriceServiceTrait};

/// Service for price lookups over the daily price table.
///
/// Per-product series are cached so repeated valuation replays do not reload
/// the same history; the cache entry is dropped whenever a product receives
/// new observations.
pub struct PriceService {
    price_repository: Arc<dyn PriceRepositoryTrait>,
    series_cache: DashMap<String, Arc<PriceSeries>>,
}

impl PriceService {
    /// Creates a new PriceService instance with injected dependencies
    pub fn new(price_repository: Arc<dyn PriceRepositoryTrait>) -> Self {
        Self {
            price_repository,
            series_cache: DashMap::new(),
        }
    }
}

impl PriceServiceTrait for PriceService {
    fn price_on(&self, product_id: &str, date: NaiveDate) -> Result<Option<Decimal>> {
        let series = self.series_for(product_id)?;
        Ok(series.get(&date).copied())
    }

    fn price_on_or_before(
        &self,
        product_id: &str,
        date: NaiveDate,
    ) -> Result<Option<(NaiveDate, Decimal)>> {
        let series = self.series_for(product_id)?;
        Ok(series
            .range(..=date)
            .next_back()
            .map(|(observed, price)| (*observed, *price)))
    }

    fn series_for(&self, product_id: &str) -> Result<Arc<PriceSeries>> {
        if let Some(cached) = self.series_cache.get(product_id) {
            return Ok(Arc::clone(cached.value()));
        }

        let quotes = self.price_repository.get_quotes_for_product(product_id)?;
        let series: PriceSeries = quotes
            .into_iter()
            .map(|q| (q.price_date, q.market_price))
            .collect();
        let series = Arc::new(series);
        self.series_cache
            .insert(product_id.to_string(), Arc::clone(&series));
        Ok(series)
    }

    fn price_table(&self, end_date: Option<NaiveDate>) -> Result<HashMap<String, PriceSeries>> {
        let quotes = self.price_repository.get_quotes_in_range(None, end_date)?;

        let mut table: HashMap<String, PriceSeries> = HashMap::new();
        for quote in quotes {
            table
                .entry(quote.product_id)
                .or_default()
                .insert(quote.price_date, quote.market_price);
        }
        Ok(table)
    }

    fn price_dates(&self) -> Result<Vec<NaiveDate>> {
        self.price_repository.get_price_dates()
    }

    fn upsert_prices(&self, updates: Vec<PriceUpdate>) -> Result<Vec<PriceQuote>> {
        let now = Utc::now().naive_utc();
        let mut quotes = Vec::with_capacity(updates.len());

        for update in updates {
            if update.product_id.trim().is_empty() {
                return Err(PriceError::InvalidData(
                    "Product ID cannot be empty".to_string(),
                ));
            }
            if update.market_price < Decimal::ZERO {
                return Err(PriceError::InvalidData(format!(
                    "Negative market price {} for product {} on {}",
                    update.market_price, update.product_id, update.price_date
                )));
            }

            quotes.push(PriceQuote {
                id: PriceQuote::quote_id(&update.product_id, update.price_date),
                product_id: update.product_id,
                price_date: update.price_date,
                market_price: update.market_price,
                data_source: update.data_source,
                created_at: now,
            });
        }

        self.price_repository.save_quotes(&quotes)?;

        for quote in &quotes {
            self.series_cache.remove(&quote.product_id);
        }
        debug!("Upserted {} price observations", quotes.len());

        Ok(quotes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prices::prices_model::DataSource;
    use rust_decimal_macros::dec;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockPriceRepository {
        quotes: Mutex<Vec<PriceQuote>>,
    }

    impl MockPriceRepository {
        fn with_quotes(quotes: Vec<PriceQuote>) -> Self {
            MockPriceRepository {
                quotes: Mutex::new(quotes),
            }
        }
    }

    impl PriceRepositoryTrait for MockPriceRepository {
        fn save_quotes(&self, quotes: &[PriceQuote]) -> Result<()> {
            let mut stored = self.quotes.lock().unwrap();
            for quote in quotes {
                stored.retain(|q| q.id != quote.id);
                stored.push(quote.clone());
            }
            Ok(())
        }

        fn get_quotes_for_product(&self, product_id: &str) -> Result<Vec<PriceQuote>> {
            let mut quotes: Vec<PriceQuote> = self
                .quotes
                .lock()
                .unwrap()
                .iter()
                .filter(|q| q.product_id == product_id)
                .cloned()
                .collect();
            quotes.sort_by_key(|q| q.price_date);
            Ok(quotes)
        }

        fn get_quotes_in_range(
            &self,
            start_date: Option<NaiveDate>,
            end_date: Option<NaiveDate>,
        ) -> Result<Vec<PriceQuote>> {
            Ok(self
                .quotes
                .lock()
                .unwrap()
                .iter()
                .filter(|q| start_date.map_or(true, |s| q.price_date >= s))
                .filter(|q| end_date.map_or(true, |e| q.price_date <= e))
                .cloned()
                .collect())
        }

        fn get_price_dates(&self) -> Result<Vec<NaiveDate>> {
            let mut dates: Vec<NaiveDate> = self
                .quotes
                .lock()
                .unwrap()
                .iter()
                .map(|q| q.price_date)
                .collect();
            dates.sort();
            dates.dedup();
            Ok(dates)
        }

        fn get_latest_quote(&self, product_id: &str) -> Result<Option<PriceQuote>> {
            Ok(self
                .get_quotes_for_product(product_id)?
                .into_iter()
                .last())
        }
    }

    fn quote(product_id: &str, date: NaiveDate, price: Decimal) -> PriceQuote {
        PriceQuote {
            id: PriceQuote::quote_id(product_id, date),
            product_id: product_id.to_string(),
            price_date: date,
            market_price: price,
            data_source: DataSource::Import,
            created_at: Utc::now().naive_utc(),
        }
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_price_on_or_before_carries_last_observation_forward() {
        let repo = MockPriceRepository::with_quotes(vec![
            quote("7", d(2024, 1, 2), dec!(100.00)),
            quote("7", d(2024, 1, 10), dec!(110.00)),
        ]);
        let service = PriceService::new(Arc::new(repo));

        // Exact hit
        assert_eq!(
            service.price_on_or_before("7", d(2024, 1, 2)).unwrap(),
            Some((d(2024, 1, 2), dec!(100.00)))
        );
        // Gap falls back to the prior observation
        assert_eq!(
            service.price_on_or_before("7", d(2024, 1, 5)).unwrap(),
            Some((d(2024, 1, 2), dec!(100.00)))
        );
        // No observation at or before the date
        assert_eq!(service.price_on_or_before("7", d(2024, 1, 1)).unwrap(), None);
        // price_on only matches the exact date
        assert_eq!(service.price_on("7", d(2024, 1, 5)).unwrap(), None);
        assert_eq!(
            service.price_on("7", d(2024, 1, 10)).unwrap(),
            Some(dec!(110.00))
        );
    }

    #[test]
    fn test_upsert_invalidates_series_cache() {
        let repo = MockPriceRepository::with_quotes(vec![quote("7", d(2024, 1, 2), dec!(50.00))]);
        let service = PriceService::new(Arc::new(repo));

        // Warm the cache, then upsert a newer observation.
        assert_eq!(
            service.price_on("7", d(2024, 1, 2)).unwrap(),
            Some(dec!(50.00))
        );
        service
            .upsert_prices(vec![PriceUpdate {
                product_id: "7".to_string(),
                price_date: d(2024, 1, 3),
                market_price: dec!(55.00),
                data_source: DataSource::Manual,
            }])
            .unwrap();

        assert_eq!(
            service.price_on("7", d(2024, 1, 3)).unwrap(),
            Some(dec!(55.00))
        );
    }

    #[test]
    fn test_upsert_rejects_negative_price() {
        let service = PriceService::new(Arc::new(MockPriceRepository::default()));
        let result = service.upsert_prices(vec![PriceUpdate {
            product_id: "7".to_string(),
            price_date: d(2024, 1, 3),
            market_price: dec!(-1.00),
            data_source: DataSource::Manual,
        }]);
        assert!(matches!(result, Err(PriceError::InvalidData(_))));
    }
}
