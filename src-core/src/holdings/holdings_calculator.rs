use rust_decimal::Decimal;

use crate::transactions::{Transaction, TransactionType};

use super::holdings_errors::{HoldingsError, Result};
use super::holdings_model::{ConsumedLot, LotStatus, ProductHolding};
use super::lot_store::LotStore;

/// Effect of applying one ledger transaction to the lot store.
#[derive(Debug, Clone)]
pub struct AppliedTransaction {
    pub consumed: Vec<ConsumedLot>,
    /// Sum of per-lot gains for a sale; `None` for buys and opens.
    pub realized_gain: Option<Decimal>,
}

/// Lot-store state derived from the ledger. Replaying the same transactions
/// in ledger order always reconstructs the same state.
#[derive(Debug, Clone)]
pub struct HoldingsState {
    store: LotStore,
}

impl Default for HoldingsState {
    fn default() -> Self {
        Self::new()
    }
}

impl HoldingsState {
    pub fn new() -> Self {
        HoldingsState {
            store: LotStore::new(),
        }
    }

    /// Rebuilds the state from transactions ordered by effective date and id.
    pub fn replay(transactions: &[Transaction]) -> Result<Self> {
        let mut state = HoldingsState::new();
        for transaction in transactions {
            state.apply(transaction)?;
        }
        Ok(state)
    }

    /// Applies a single transaction, mutating the lot store.
    pub fn apply(&mut self, transaction: &Transaction) -> Result<AppliedTransaction> {
        match transaction.transaction_type {
            TransactionType::Buy => {
                let unit_price = transaction.unit_price.ok_or_else(|| {
                    HoldingsError::InvalidOperation(format!(
                        "Buy transaction {} has no unit price",
                        transaction.id
                    ))
                })?;
                self.store.add_lot(
                    &transaction.product_id,
                    transaction.quantity,
                    unit_price,
                    transaction.effective_date,
                )?;
                Ok(AppliedTransaction {
                    consumed: Vec::new(),
                    realized_gain: None,
                })
            }
            TransactionType::Open => {
                let consumed = self.store.consume(
                    &transaction.product_id,
                    transaction.quantity,
                    LotStatus::Opened,
                    None,
                    transaction.effective_date,
                )?;
                Ok(AppliedTransaction {
                    consumed,
                    realized_gain: None,
                })
            }
            TransactionType::Sell => {
                let unit_price = transaction.unit_price.ok_or_else(|| {
                    HoldingsError::InvalidOperation(format!(
                        "Sell transaction {} has no unit price",
                        transaction.id
                    ))
                })?;
                let consumed = self.store.consume(
                    &transaction.product_id,
                    transaction.quantity,
                    LotStatus::Sold,
                    Some(unit_price),
                    transaction.effective_date,
                )?;
                let realized_gain = consumed
                    .iter()
                    .map(|slice| (unit_price - slice.unit_cost) * Decimal::from(slice.quantity))
                    .sum();
                Ok(AppliedTransaction {
                    consumed,
                    realized_gain: Some(realized_gain),
                })
            }
        }
    }

    pub fn store(&self) -> &LotStore {
        &self.store
    }

    pub fn available_quantity(&self, product_id: &str, include_opened: bool) -> i64 {
        self.store.available_quantity(product_id, include_opened)
    }

    pub fn holding_for(&self, product_id: &str) -> ProductHolding {
        self.store.holding_for(product_id)
    }

    pub fn holdings(&self) -> Vec<ProductHolding> {
        self.store.holdings()
    }
}
