use chrono::NaiveDate;

use crate::holdings::{Lot, ProductHolding};

use super::transactions_errors::Result;
use super::transactions_model::{NewTransaction, PendingTransaction, Transaction};

/// Trait defining the contract for ledger repository operations.
pub trait TransactionRepositoryTrait: Send + Sync {
    /// Persists a validated transaction and returns it with its ledger id.
    fn append(&self, pending: PendingTransaction) -> Result<Transaction>;
    /// All transactions in ledger order (effective date, then id).
    fn get_transactions(&self) -> Result<Vec<Transaction>>;
    /// Ledger-ordered transactions with `effective_date <= date`.
    fn get_transactions_up_to(&self, date: NaiveDate) -> Result<Vec<Transaction>>;
    fn get_transactions_for_product(&self, product_id: &str) -> Result<Vec<Transaction>>;
    fn earliest_transaction_date(&self) -> Result<Option<NaiveDate>>;
}

/// Trait defining the contract for ledger service operations.
pub trait TransactionServiceTrait: Send + Sync {
    /// Validates and appends a transaction atomically; on failure no state
    /// changes. The returned record carries the effective date and the
    /// date-adjusted flag.
    fn submit_transaction(&self, new_transaction: NewTransaction) -> Result<Transaction>;

    fn get_transactions(&self) -> Result<Vec<Transaction>>;
    fn transactions_up_to(&self, date: NaiveDate) -> Result<Vec<Transaction>>;

    /// Current per-product summary (sealed/opened/sold quantities and cost).
    fn holdings_for(&self, product_id: &str) -> Result<ProductHolding>;
    fn get_holdings(&self) -> Result<Vec<ProductHolding>>;
    fn available_quantity(&self, product_id: &str, include_opened: bool) -> Result<i64>;

    /// Audit view of a product's lots.
    fn get_lots(&self, product_id: &str) -> Result<Vec<Lot>>;
}
