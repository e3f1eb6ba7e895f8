use chrono::{NaiveDate, NaiveDateTime};
use log::debug;
use rust_decimal::Decimal;
use std::collections::{BTreeSet, HashMap};

use crate::holdings::HoldingsState;
use crate::prices::PriceSeries;
use crate::transactions::{Transaction, TransactionType};

use super::valuation_errors::Result;
use super::valuation_model::ValuationPoint;

/// Computes the valuation curve by replaying the ledger against the price
/// table.
///
/// The date axis is the union of price-observation dates and transaction
/// effective dates (plus the requested end date), never starting before the
/// first transaction. Holdings on each date come from replaying every
/// transaction with `effective_date <= date`; sealed quantities join against
/// the most recent price observation on or before the date. A product holding
/// sealed units with no prior observation contributes zero and is flagged on
/// the point.
///
/// Pure function of its inputs: the same ledger, price table, and range
/// always produce the same series, which is what makes the stored curve a
/// cache instead of state.
///
/// # Arguments
///
/// * `transactions` - The ledger in order (effective date, then id).
/// * `price_table` - Per-product price history.
/// * `price_dates` - Distinct dates carrying at least one observation.
/// * `start_date` / `end_date` - Optional bounds on the emitted points.
/// * `calculated_at` - Timestamp stamped on every emitted point.
///
pub fn calculate_valuation_series(
    transactions: &[Transaction],
    price_table: &HashMap<String, PriceSeries>,
    price_dates: &[NaiveDate],
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    calculated_at: NaiveDateTime,
) -> Result<Vec<ValuationPoint>> {
    if transactions.is_empty() {
        return Ok(Vec::new());
    }
    let first_transaction_date = transactions[0].effective_date;

    let mut axis: BTreeSet<NaiveDate> = price_dates.iter().copied().collect();
    axis.extend(transactions.iter().map(|t| t.effective_date));
    if let Some(end) = end_date {
        axis.insert(end);
    }
    let axis: Vec<NaiveDate> = axis
        .into_iter()
        .filter(|date| *date >= first_transaction_date)
        .filter(|date| start_date.map_or(true, |start| *date >= start))
        .filter(|date| end_date.map_or(true, |end| *date <= end))
        .collect();

    let mut state = HoldingsState::new();
    let mut cumulative_spent = Decimal::ZERO;
    let mut cumulative_revenue = Decimal::ZERO;
    let mut next_transaction = 0;
    let mut points = Vec::with_capacity(axis.len());

    for date in axis {
        while next_transaction < transactions.len()
            && transactions[next_transaction].effective_date <= date
        {
            let transaction = &transactions[next_transaction];
            state.apply(transaction)?;
            let amount = transaction.total_amount().unwrap_or_default();
            match transaction.transaction_type {
                TransactionType::Buy => cumulative_spent += amount,
                TransactionType::Sell => cumulative_revenue += amount,
                TransactionType::Open => {}
            }
            next_transaction += 1;
        }

        let mut sealed_cost_basis = Decimal::ZERO;
        let mut opened_cost_basis = Decimal::ZERO;
        let mut market_value = Decimal::ZERO;
        let mut missing_price_products = Vec::new();

        for holding in state.holdings() {
            sealed_cost_basis += holding.sealed_cost_basis;
            opened_cost_basis += holding.opened_cost_basis;

            if holding.sealed_quantity == 0 {
                continue;
            }
            let price = price_table
                .get(&holding.product_id)
                .and_then(|series| series.range(..=date).next_back())
                .map(|(_, price)| *price);
            match price {
                Some(price) => {
                    market_value += price * Decimal::from(holding.sealed_quantity);
                }
                None => {
                    debug!(
                        "No price observation for product {} on or before {}; valuing at zero",
                        holding.product_id, date
                    );
                    missing_price_products.push(holding.product_id.clone());
                }
            }
        }

        let roi = if cumulative_spent > Decimal::ZERO {
            Some((market_value + cumulative_revenue - cumulative_spent) / cumulative_spent)
        } else {
            None
        };

        points.push(ValuationPoint {
            valuation_date: date,
            cost_basis: sealed_cost_basis + opened_cost_basis,
            sealed_cost_basis,
            opened_cost_basis,
            market_value,
            cumulative_spent,
            cumulative_revenue,
            net_investment: cumulative_spent - cumulative_revenue,
            unrealized_gain: market_value - sealed_cost_basis,
            roi,
            missing_price_products,
            calculated_at,
        });
    }

    Ok(points)
}
