use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::utils::decimal_serde::{decimal_serde, decimal_serde_option};

/// Lifecycle state of a lot. Every unit of inventory is in exactly one of
/// these states at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LotStatus {
    Sealed,
    Opened,
    Sold,
}

/// A quantity of one product acquired at one cost on one date, tracked
/// independently for FIFO disposal.
///
/// `quantity` stays positive for the lot's whole life: partial consumption
/// splits off a new lot for the consumed portion instead of mutating history,
/// so the quantities of all lots descended from one purchase always sum to
/// the purchased quantity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Lot {
    pub id: i64,
    pub product_id: String,
    pub quantity: i64,
    #[serde(with = "decimal_serde")]
    pub unit_cost: Decimal,
    pub acquired_date: NaiveDate,
    pub status: LotStatus,
    /// Sale price per unit; set only when `status` is Sold.
    #[serde(with = "decimal_serde_option")]
    pub disposed_price: Option<Decimal>,
    /// Set when `status` is Opened or Sold.
    pub disposed_date: Option<NaiveDate>,
}

impl Lot {
    /// Total acquisition cost of this lot.
    pub fn cost_basis(&self) -> Decimal {
        self.unit_cost * Decimal::from(self.quantity)
    }
}

/// One slice taken from a lot during a consumption pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsumedLot {
    pub lot_id: i64,
    pub quantity: i64,
    pub unit_cost: Decimal,
}

/// Per-product summary across lot statuses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductHolding {
    pub product_id: String,
    pub sealed_quantity: i64,
    pub opened_quantity: i64,
    pub sold_quantity: i64,
    /// Acquisition cost of everything still held (sealed + opened).
    #[serde(with = "decimal_serde")]
    pub cost_basis: Decimal,
    #[serde(with = "decimal_serde")]
    pub sealed_cost_basis: Decimal,
    /// Sunk cost of opened inventory; held at cost, excluded from market
    /// value.
    #[serde(with = "decimal_serde")]
    pub opened_cost_basis: Decimal,
    /// Average unit cost of held (sealed + opened) inventory.
    #[serde(with = "decimal_serde")]
    pub average_cost: Decimal,
}
