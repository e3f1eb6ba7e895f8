use chrono::{NaiveDate, Utc};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use crate::constants::DECIMAL_PRECISION;
use crate::db::get_connection;
use crate::schema::transactions;
use crate::transactions::transactions_errors::{Result, TransactionError};
use crate::transactions::transactions_model::{
    InsertTransactionDB, PendingTransaction, Transaction, TransactionDB,
};
use crate::transactions::transactions_traits::TransactionRepositoryTrait;

/// Repository for the append-only transaction ledger
pub struct TransactionRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
}

impl TransactionRepository {
    /// Creates a new TransactionRepository instance
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }

    fn load_ordered(
        &self,
        up_to: Option<NaiveDate>,
        product_id: Option<&str>,
    ) -> Result<Vec<Transaction>> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| TransactionError::DatabaseError(e.to_string()))?;

        let mut query = transactions::table
            .select(TransactionDB::as_select())
            .order((transactions::effective_date.asc(), transactions::id.asc()))
            .into_boxed();

        if let Some(date) = up_to {
            query = query.filter(transactions::effective_date.le(date));
        }
        if let Some(product) = product_id {
            query = query.filter(transactions::product_id.eq(product.to_string()));
        }

        query
            .load::<TransactionDB>(&mut conn)?
            .into_iter()
            .map(Transaction::try_from)
            .collect()
    }
}

impl TransactionRepositoryTrait for TransactionRepository {
    fn append(&self, pending: PendingTransaction) -> Result<Transaction> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| TransactionError::DatabaseError(e.to_string()))?;

        let row = InsertTransactionDB {
            product_id: pending.product_id,
            transaction_type: pending.transaction_type.as_str().to_string(),
            quantity: pending.quantity,
            unit_price: pending
                .unit_price
                .map(|p| p.round_dp(DECIMAL_PRECISION).to_string()),
            requested_date: pending.requested_date,
            effective_date: pending.effective_date,
            date_adjusted: pending.date_adjusted,
            realized_gain: pending
                .realized_gain
                .map(|g| g.round_dp(DECIMAL_PRECISION).to_string()),
            created_at: Utc::now().naive_utc(),
        };

        let stored = diesel::insert_into(transactions::table)
            .values(&row)
            .returning(TransactionDB::as_returning())
            .get_result::<TransactionDB>(&mut conn)?;

        Transaction::try_from(stored)
    }

    fn get_transactions(&self) -> Result<Vec<Transaction>> {
        self.load_ordered(None, None)
    }

    fn get_transactions_up_to(&self, date: NaiveDate) -> Result<Vec<Transaction>> {
        self.load_ordered(Some(date), None)
    }

    fn get_transactions_for_product(&self, product_id: &str) -> Result<Vec<Transaction>> {
        self.load_ordered(None, Some(product_id))
    }

    fn earliest_transaction_date(&self) -> Result<Option<NaiveDate>> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| TransactionError::DatabaseError(e.to_string()))?;

        transactions::table
            .select(diesel::dsl::min(transactions::effective_date))
            .first::<Option<NaiveDate>>(&mut conn)
            .map_err(TransactionError::from)
    }
}
