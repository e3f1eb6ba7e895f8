use chrono::{NaiveDate, Utc};
use log::{debug, info};
use std::sync::{Arc, RwLock};

use crate::holdings::{HoldingsState, Lot, ProductHolding};
use crate::products::ProductServiceTrait;

use super::transactions_errors::Result;
use super::transactions_model::{NewTransaction, PendingTransaction, Transaction};
use super::transactions_traits::{TransactionRepositoryTrait, TransactionServiceTrait};

/// Service owning the append-only ledger and the lot state derived from it.
///
/// All mutation goes through `submit_transaction`, which holds the write half
/// of the state lock across validate + consume + append: appends serialize,
/// and readers only ever observe the state before or after a whole
/// transaction.
pub struct TransactionService {
    transaction_repository: Arc<dyn TransactionRepositoryTrait>,
    product_service: Arc<dyn ProductServiceTrait>,
    state: RwLock<HoldingsState>,
}

impl TransactionService {
    /// Creates the service, rebuilding lot state by replaying the stored
    /// ledger.
    pub fn new(
        transaction_repository: Arc<dyn TransactionRepositoryTrait>,
        product_service: Arc<dyn ProductServiceTrait>,
    ) -> Result<Self> {
        let transactions = transaction_repository.get_transactions()?;
        let state = HoldingsState::replay(&transactions)?;
        debug!(
            "Replayed {} ledger transactions into {} lots",
            transactions.len(),
            state.store().lots().len()
        );

        Ok(Self {
            transaction_repository,
            product_service,
            state: RwLock::new(state),
        })
    }
}

impl TransactionServiceTrait for TransactionService {
    fn submit_transaction(&self, new_transaction: NewTransaction) -> Result<Transaction> {
        new_transaction.validate()?;

        // Catalog lookup doubles as the UnknownProduct check.
        let product = self
            .product_service
            .get_product(&new_transaction.product_id)?;
        let (effective_date, date_adjusted) = self.product_service.validate_transaction_date(
            &new_transaction.product_id,
            new_transaction.transaction_date,
        )?;

        let mut state = self.state.write().unwrap();

        // Apply against a scratch copy first: if the consumption or the
        // append fails, the published state is untouched.
        let mut scratch = state.clone();
        let draft = Transaction {
            id: 0,
            product_id: new_transaction.product_id.clone(),
            transaction_type: new_transaction.transaction_type,
            quantity: new_transaction.quantity,
            unit_price: new_transaction.unit_price,
            requested_date: new_transaction.transaction_date,
            effective_date,
            date_adjusted,
            realized_gain: None,
            created_at: Utc::now().naive_utc(),
        };
        let applied = scratch.apply(&draft)?;

        let stored = self.transaction_repository.append(PendingTransaction {
            product_id: draft.product_id,
            transaction_type: draft.transaction_type,
            quantity: draft.quantity,
            unit_price: draft.unit_price,
            requested_date: draft.requested_date,
            effective_date: draft.effective_date,
            date_adjusted: draft.date_adjusted,
            realized_gain: applied.realized_gain,
        })?;

        *state = scratch;

        info!(
            "Appended {} transaction {} for product {} ({} units, effective {}{})",
            stored.transaction_type,
            stored.id,
            product.id,
            stored.quantity,
            stored.effective_date,
            if stored.date_adjusted {
                ", date adjusted"
            } else {
                ""
            }
        );
        Ok(stored)
    }

    fn get_transactions(&self) -> Result<Vec<Transaction>> {
        self.transaction_repository.get_transactions()
    }

    fn transactions_up_to(&self, date: NaiveDate) -> Result<Vec<Transaction>> {
        self.transaction_repository.get_transactions_up_to(date)
    }

    fn holdings_for(&self, product_id: &str) -> Result<ProductHolding> {
        let state = self.state.read().unwrap();
        Ok(state.holding_for(product_id))
    }

    fn get_holdings(&self) -> Result<Vec<ProductHolding>> {
        let state = self.state.read().unwrap();
        Ok(state.holdings())
    }

    fn available_quantity(&self, product_id: &str, include_opened: bool) -> Result<i64> {
        let state = self.state.read().unwrap();
        Ok(state.available_quantity(product_id, include_opened))
    }

    fn get_lots(&self, product_id: &str) -> Result<Vec<Lot>> {
        let state = self.state.read().unwrap();
        Ok(state
            .store()
            .lots_for_product(product_id)
            .into_iter()
            .cloned()
            .collect())
    }
}
