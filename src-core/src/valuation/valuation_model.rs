use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::constants::DECIMAL_PRECISION;
use crate::utils::decimal_serde::{decimal_serde, decimal_serde_option};

/// One day of the valuation curve. Derived from the ledger and the price
/// table; the stored rows are a cache, never the source of truth.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ValuationPoint {
    pub valuation_date: NaiveDate,
    /// Acquisition cost of everything still held (sealed + opened).
    #[serde(with = "decimal_serde")]
    pub cost_basis: Decimal,
    #[serde(with = "decimal_serde")]
    pub sealed_cost_basis: Decimal,
    /// Sunk cost of opened inventory; carried at cost, no market value.
    #[serde(with = "decimal_serde")]
    pub opened_cost_basis: Decimal,
    /// Sealed quantity × price, per product, summed.
    #[serde(with = "decimal_serde")]
    pub market_value: Decimal,
    #[serde(with = "decimal_serde")]
    pub cumulative_spent: Decimal,
    #[serde(with = "decimal_serde")]
    pub cumulative_revenue: Decimal,
    /// `cumulative_spent − cumulative_revenue`.
    #[serde(with = "decimal_serde")]
    pub net_investment: Decimal,
    /// `market_value − sealed_cost_basis`.
    #[serde(with = "decimal_serde")]
    pub unrealized_gain: Decimal,
    /// `(market_value + cumulative_revenue − cumulative_spent) /
    /// cumulative_spent`; absent before the first purchase.
    #[serde(with = "decimal_serde_option")]
    pub roi: Option<Decimal>,
    /// Products holding sealed units with no price observation on or before
    /// this date; they contribute zero to market value.
    pub missing_price_products: Vec<String>,
    pub calculated_at: NaiveDateTime,
}

impl ValuationPoint {
    /// Collection value plus everything already realized through sales.
    pub fn total_value(&self) -> Decimal {
        self.market_value + self.cumulative_revenue
    }

    /// ROI as a percentage for display layers.
    pub fn roi_percent(&self) -> Option<f64> {
        self.roi
            .and_then(|r| (r * Decimal::ONE_HUNDRED).to_f64())
    }
}

/// Database model for cached valuation points
#[derive(
    Queryable, Selectable, Identifiable, Insertable, AsChangeset, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::daily_valuation)]
#[diesel(primary_key(valuation_date))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DailyValuationDB {
    pub valuation_date: NaiveDate,
    pub cost_basis: String,
    pub sealed_cost_basis: String,
    pub opened_cost_basis: String,
    pub market_value: String,
    pub cumulative_spent: String,
    pub cumulative_revenue: String,
    pub net_investment: String,
    pub unrealized_gain: String,
    pub roi: Option<String>,
    pub missing_price_products: String,
    pub calculated_at: NaiveDateTime,
}

impl From<ValuationPoint> for DailyValuationDB {
    fn from(point: ValuationPoint) -> Self {
        let round = |d: Decimal| d.round_dp(DECIMAL_PRECISION).to_string();
        DailyValuationDB {
            valuation_date: point.valuation_date,
            cost_basis: round(point.cost_basis),
            sealed_cost_basis: round(point.sealed_cost_basis),
            opened_cost_basis: round(point.opened_cost_basis),
            market_value: round(point.market_value),
            cumulative_spent: round(point.cumulative_spent),
            cumulative_revenue: round(point.cumulative_revenue),
            net_investment: round(point.net_investment),
            unrealized_gain: round(point.unrealized_gain),
            roi: point.roi.map(round),
            missing_price_products: serde_json::to_string(&point.missing_price_products)
                .unwrap_or_else(|_| "[]".to_string()),
            calculated_at: point.calculated_at,
        }
    }
}

impl From<DailyValuationDB> for ValuationPoint {
    fn from(db: DailyValuationDB) -> Self {
        let parse = |s: &str| Decimal::from_str(s).unwrap_or_default();
        ValuationPoint {
            valuation_date: db.valuation_date,
            cost_basis: parse(&db.cost_basis),
            sealed_cost_basis: parse(&db.sealed_cost_basis),
            opened_cost_basis: parse(&db.opened_cost_basis),
            market_value: parse(&db.market_value),
            cumulative_spent: parse(&db.cumulative_spent),
            cumulative_revenue: parse(&db.cumulative_revenue),
            net_investment: parse(&db.net_investment),
            unrealized_gain: parse(&db.unrealized_gain),
            roi: db.roi.as_deref().map(parse),
            missing_price_products: serde_json::from_str(&db.missing_price_products)
                .unwrap_or_default(),
            calculated_at: db.calculated_at,
        }
    }
}
