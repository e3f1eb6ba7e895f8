use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::decimal_serde::decimal_serde_option;

use super::transactions_constants::{
    TRANSACTION_TYPE_BUY, TRANSACTION_TYPE_OPEN, TRANSACTION_TYPE_SELL,
};
use super::transactions_errors::{Result, TransactionError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Buy,
    Sell,
    Open,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Buy => TRANSACTION_TYPE_BUY,
            TransactionType::Sell => TRANSACTION_TYPE_SELL,
            TransactionType::Open => TRANSACTION_TYPE_OPEN,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = TransactionError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            TRANSACTION_TYPE_BUY => Ok(TransactionType::Buy),
            TRANSACTION_TYPE_SELL => Ok(TransactionType::Sell),
            TRANSACTION_TYPE_OPEN => Ok(TransactionType::Open),
            other => Err(TransactionError::InvalidData(format!(
                "Unknown transaction type: {}",
                other
            ))),
        }
    }
}

/// Domain model representing a ledger entry. Immutable once appended;
/// corrections are modeled as new, reversing transactions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i64,
    pub product_id: String,
    pub transaction_type: TransactionType,
    pub quantity: i64,
    /// Required for Buy/Sell, absent for Open.
    #[serde(with = "decimal_serde_option")]
    pub unit_price: Option<Decimal>,
    /// The date the caller asked for.
    pub requested_date: NaiveDate,
    /// The date the ledger recorded, never before the product's
    /// first-available date.
    pub effective_date: NaiveDate,
    pub date_adjusted: bool,
    /// Sum of per-lot gains for a sale, `(sell price − lot cost) × qty`.
    #[serde(with = "decimal_serde_option")]
    pub realized_gain: Option<Decimal>,
    pub created_at: NaiveDateTime,
}

impl Transaction {
    /// Cash moved by this transaction, when it carries a price.
    pub fn total_amount(&self) -> Option<Decimal> {
        self.unit_price
            .map(|price| price * Decimal::from(self.quantity))
    }
}

/// Database model for ledger entries
#[derive(Queryable, Selectable, Identifiable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TransactionDB {
    pub id: i64,
    pub product_id: String,
    pub transaction_type: String,
    pub quantity: i64,
    pub unit_price: Option<String>,
    pub requested_date: NaiveDate,
    pub effective_date: NaiveDate,
    pub date_adjusted: bool,
    pub realized_gain: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Insertable row; the ledger id is assigned by the database.
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::transactions)]
pub struct InsertTransactionDB {
    pub product_id: String,
    pub transaction_type: String,
    pub quantity: i64,
    pub unit_price: Option<String>,
    pub requested_date: NaiveDate,
    pub effective_date: NaiveDate,
    pub date_adjusted: bool,
    pub realized_gain: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Input model for submitting a transaction to the ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub product_id: String,
    pub transaction_type: TransactionType,
    pub quantity: i64,
    #[serde(with = "decimal_serde_option")]
    pub unit_price: Option<Decimal>,
    pub transaction_date: NaiveDate,
}

impl NewTransaction {
    /// Validates the payload before any catalog or inventory checks run.
    pub fn validate(&self) -> Result<()> {
        if self.product_id.trim().is_empty() {
            return Err(TransactionError::InvalidData(
                "Product ID cannot be empty".to_string(),
            ));
        }
        if self.quantity <= 0 {
            return Err(TransactionError::InvalidQuantity(self.quantity));
        }
        match self.transaction_type {
            TransactionType::Buy | TransactionType::Sell => match self.unit_price {
                None => {
                    return Err(TransactionError::InvalidPrice(format!(
                        "Unit price is required for {} transactions",
                        self.transaction_type
                    )))
                }
                Some(price) if price < Decimal::ZERO => {
                    return Err(TransactionError::InvalidPrice(format!(
                        "Unit price cannot be negative, got {}",
                        price
                    )))
                }
                Some(_) => {}
            },
            TransactionType::Open => {
                if self.unit_price.is_some() {
                    return Err(TransactionError::InvalidPrice(
                        "Open transactions do not take a price".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Fully validated transaction awaiting its ledger id.
#[derive(Debug, Clone)]
pub struct PendingTransaction {
    pub product_id: String,
    pub transaction_type: TransactionType,
    pub quantity: i64,
    pub unit_price: Option<Decimal>,
    pub requested_date: NaiveDate,
    pub effective_date: NaiveDate,
    pub date_adjusted: bool,
    pub realized_gain: Option<Decimal>,
}

impl TryFrom<TransactionDB> for Transaction {
    type Error = TransactionError;

    fn try_from(db: TransactionDB) -> Result<Self> {
        let transaction_type = TransactionType::from_str(&db.transaction_type)?;
        let unit_price = db
            .unit_price
            .as_deref()
            .map(Decimal::from_str)
            .transpose()
            .map_err(|e| TransactionError::InvalidData(e.to_string()))?;
        let realized_gain = db
            .realized_gain
            .as_deref()
            .map(Decimal::from_str)
            .transpose()
            .map_err(|e| TransactionError::InvalidData(e.to_string()))?;

        Ok(Transaction {
            id: db.id,
            product_id: db.product_id,
            transaction_type,
            quantity: db.quantity,
            unit_price,
            requested_date: db.requested_date,
            effective_date: db.effective_date,
            date_adjusted: db.date_adjusted,
            realized_gain,
            created_at: db.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn new_transaction(transaction_type: TransactionType, price: Option<Decimal>) -> NewTransaction {
        NewTransaction {
            product_id: "55".to_string(),
            transaction_type,
            quantity: 2,
            unit_price: price,
            transaction_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        }
    }

    #[test]
    fn test_validate_requires_positive_quantity() {
        let mut tx = new_transaction(TransactionType::Buy, Some(dec!(10.00)));
        tx.quantity = 0;
        assert!(matches!(
            tx.validate(),
            Err(TransactionError::InvalidQuantity(0))
        ));
    }

    #[test]
    fn test_validate_price_rules_per_type() {
        // Buy and Sell need a non-negative price.
        assert!(new_transaction(TransactionType::Buy, Some(dec!(10.00)))
            .validate()
            .is_ok());
        assert!(matches!(
            new_transaction(TransactionType::Buy, None).validate(),
            Err(TransactionError::InvalidPrice(_))
        ));
        assert!(matches!(
            new_transaction(TransactionType::Sell, Some(dec!(-0.01))).validate(),
            Err(TransactionError::InvalidPrice(_))
        ));

        // Open must not carry one.
        assert!(new_transaction(TransactionType::Open, None).validate().is_ok());
        assert!(matches!(
            new_transaction(TransactionType::Open, Some(dec!(5.00))).validate(),
            Err(TransactionError::InvalidPrice(_))
        ));
    }

    #[test]
    fn test_transaction_type_round_trip() {
        for tx_type in [
            TransactionType::Buy,
            TransactionType::Sell,
            TransactionType::Open,
        ] {
            assert_eq!(
                TransactionType::from_str(tx_type.as_str()).unwrap(),
                tx_type
            );
        }
        assert!(TransactionType::from_str("TRADE").is_err());
    }
}
