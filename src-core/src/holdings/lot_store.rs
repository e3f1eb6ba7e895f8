use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeSet;

use super::holdings_errors::{HoldingsError, Result};
use super::holdings_model::{ConsumedLot, Lot, LotStatus, ProductHolding};

/// Arena of lots addressed by `lot_id`, the single owner of all lot records.
///
/// Lots are only ever appended or reduced-and-split; nothing is deleted, so
/// the store doubles as the audit trail of how every purchase was disposed.
#[derive(Debug, Clone)]
pub struct LotStore {
    lots: Vec<Lot>,
    next_lot_id: i64,
}

impl Default for LotStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LotStore {
    pub fn new() -> Self {
        LotStore {
            lots: Vec::new(),
            next_lot_id: 1,
        }
    }

    /// Records a fresh sealed lot and returns its id.
    pub fn add_lot(
        &mut self,
        product_id: &str,
        quantity: i64,
        unit_cost: Decimal,
        acquired_date: NaiveDate,
    ) -> Result<i64> {
        if quantity <= 0 {
            return Err(HoldingsError::InvalidQuantity(quantity));
        }
        if unit_cost < Decimal::ZERO {
            return Err(HoldingsError::InvalidOperation(format!(
                "Negative unit cost {} for product {}",
                unit_cost, product_id
            )));
        }

        let id = self.next_lot_id;
        self.next_lot_id += 1;
        self.lots.push(Lot {
            id,
            product_id: product_id.to_string(),
            quantity,
            unit_cost,
            acquired_date,
            status: LotStatus::Sealed,
            disposed_price: None,
            disposed_date: None,
        });
        Ok(id)
    }

    /// Units available for disposal: sealed lots, plus opened lots when
    /// `include_opened` is set.
    pub fn available_quantity(&self, product_id: &str, include_opened: bool) -> i64 {
        self.lots
            .iter()
            .filter(|lot| lot.product_id == product_id)
            .filter(|lot| {
                lot.status == LotStatus::Sealed
                    || (include_opened && lot.status == LotStatus::Opened)
            })
            .map(|lot| lot.quantity)
            .sum()
    }

    /// Consumes `quantity` units of a product into `target_status` under FIFO
    /// discipline: candidates ordered by acquisition date, ties by lot id.
    ///
    /// Opening draws from sealed lots only; selling draws from sealed and
    /// opened lots and requires the caller's explicit price. The availability
    /// check runs before any mutation, so the pass either applies in full or
    /// not at all. A fully consumed lot flips status in place; a partially
    /// consumed lot keeps its id with the remainder and a new lot records the
    /// consumed slice.
    pub fn consume(
        &mut self,
        product_id: &str,
        quantity: i64,
        target_status: LotStatus,
        price: Option<Decimal>,
        date: NaiveDate,
    ) -> Result<Vec<ConsumedLot>> {
        if quantity <= 0 {
            return Err(HoldingsError::InvalidQuantity(quantity));
        }
        let include_opened = match target_status {
            LotStatus::Opened => false,
            LotStatus::Sold => true,
            LotStatus::Sealed => {
                return Err(HoldingsError::InvalidOperation(
                    "Cannot consume lots into the Sealed status".to_string(),
                ))
            }
        };
        if target_status == LotStatus::Sold && price.is_none() {
            return Err(HoldingsError::InvalidOperation(
                "Selling requires an explicit price".to_string(),
            ));
        }
        if target_status == LotStatus::Opened && price.is_some() {
            return Err(HoldingsError::InvalidOperation(
                "Opening does not take a price".to_string(),
            ));
        }

        let available = self.available_quantity(product_id, include_opened);
        if available < quantity {
            return Err(HoldingsError::InsufficientInventory {
                requested: quantity,
                available,
            });
        }

        let mut candidates: Vec<usize> = self
            .lots
            .iter()
            .enumerate()
            .filter(|(_, lot)| lot.product_id == product_id)
            .filter(|(_, lot)| {
                lot.status == LotStatus::Sealed
                    || (include_opened && lot.status == LotStatus::Opened)
            })
            .map(|(index, _)| index)
            .collect();
        candidates.sort_by_key(|&index| (self.lots[index].acquired_date, self.lots[index].id));

        let mut remaining = quantity;
        let mut consumed = Vec::new();
        let mut splits = Vec::new();

        for index in candidates {
            if remaining == 0 {
                break;
            }
            let take = remaining.min(self.lots[index].quantity);

            if take == self.lots[index].quantity {
                let lot = &mut self.lots[index];
                lot.status = target_status;
                lot.disposed_price = price;
                lot.disposed_date = Some(date);
                consumed.push(ConsumedLot {
                    lot_id: lot.id,
                    quantity: take,
                    unit_cost: lot.unit_cost,
                });
            } else {
                let new_id = self.next_lot_id;
                self.next_lot_id += 1;

                let lot = &mut self.lots[index];
                lot.quantity -= take;
                splits.push(Lot {
                    id: new_id,
                    product_id: lot.product_id.clone(),
                    quantity: take,
                    unit_cost: lot.unit_cost,
                    acquired_date: lot.acquired_date,
                    status: target_status,
                    disposed_price: price,
                    disposed_date: Some(date),
                });
                consumed.push(ConsumedLot {
                    lot_id: new_id,
                    quantity: take,
                    unit_cost: lot.unit_cost,
                });
            }
            remaining -= take;
        }
        self.lots.extend(splits);

        Ok(consumed)
    }

    /// Summarizes one product's lots across the three statuses.
    pub fn holding_for(&self, product_id: &str) -> ProductHolding {
        let mut holding = ProductHolding {
            product_id: product_id.to_string(),
            sealed_quantity: 0,
            opened_quantity: 0,
            sold_quantity: 0,
            cost_basis: Decimal::ZERO,
            sealed_cost_basis: Decimal::ZERO,
            opened_cost_basis: Decimal::ZERO,
            average_cost: Decimal::ZERO,
        };

        for lot in self.lots.iter().filter(|lot| lot.product_id == product_id) {
            match lot.status {
                LotStatus::Sealed => {
                    holding.sealed_quantity += lot.quantity;
                    holding.sealed_cost_basis += lot.cost_basis();
                }
                LotStatus::Opened => {
                    holding.opened_quantity += lot.quantity;
                    holding.opened_cost_basis += lot.cost_basis();
                }
                LotStatus::Sold => {
                    holding.sold_quantity += lot.quantity;
                }
            }
        }

        holding.cost_basis = holding.sealed_cost_basis + holding.opened_cost_basis;
        let held_quantity = holding.sealed_quantity + holding.opened_quantity;
        if held_quantity > 0 {
            holding.average_cost = holding.cost_basis / Decimal::from(held_quantity);
        }
        holding
    }

    /// Summaries for every product with at least one lot, ordered by id.
    pub fn holdings(&self) -> Vec<ProductHolding> {
        let product_ids: BTreeSet<&str> =
            self.lots.iter().map(|lot| lot.product_id.as_str()).collect();
        product_ids
            .into_iter()
            .map(|product_id| self.holding_for(product_id))
            .collect()
    }

    pub fn lots(&self) -> &[Lot] {
        &self.lots
    }

    pub fn lots_for_product(&self, product_id: &str) -> Vec<&Lot> {
        self.lots
            .iter()
            .filter(|lot| lot.product_id == product_id)
            .collect()
    }
}
