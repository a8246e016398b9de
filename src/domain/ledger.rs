use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{CASH_SYMBOL, TransactionRecord};

/// Compute the cash balance from a list of records.
/// Balance = signed sum of quantity over all cash records
pub fn derived_cash_balance(records: &[TransactionRecord]) -> Decimal {
    records.iter().fold(Decimal::ZERO, |balance, record| {
        if record.is_cash() {
            balance + record.quantity
        } else {
            balance
        }
    })
}

/// Compute the held quantity of a symbol from a list of records.
/// Held quantity = signed sum of quantity over matching records
pub fn held_quantity(symbol: &str, records: &[TransactionRecord]) -> Decimal {
    records
        .iter()
        .filter(|r| r.symbol == symbol)
        .map(|r| r.quantity)
        .sum()
}

/// Compute held quantities for every non-cash symbol that has ever appeared
/// in the records, in first-appearance order. Symbols whose quantity has
/// fallen back to zero are retained (closed positions stay visible).
pub fn compute_holdings(records: &[TransactionRecord]) -> Vec<(String, Decimal)> {
    let mut holdings: Vec<(String, Decimal)> = Vec::new();

    for record in records {
        if record.symbol == CASH_SYMBOL {
            continue;
        }
        match holdings.iter_mut().find(|(sym, _)| *sym == record.symbol) {
            Some((_, quantity)) => *quantity += record.quantity,
            None => holdings.push((record.symbol.clone(), record.quantity)),
        }
    }

    holdings
}

/// Result of replaying the full record log against cached state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntegrityReport {
    pub record_count: usize,
    pub cached_cash_balance: Decimal,
    pub derived_cash_balance: Decimal,
    /// Symbols whose derived held quantity is negative
    pub negative_holdings: Vec<(String, Decimal)>,
}

impl IntegrityReport {
    pub fn is_ok(&self) -> bool {
        self.cached_cash_balance == self.derived_cash_balance && self.negative_holdings.is_empty()
    }
}

/// Replay the record log and compare it against the cached cash balance.
pub fn verify_ledger(cached_balance: Decimal, records: &[TransactionRecord]) -> IntegrityReport {
    let negative_holdings = compute_holdings(records)
        .into_iter()
        .filter(|(_, quantity)| *quantity < Decimal::ZERO)
        .collect();

    IntegrityReport {
        record_count: records.len(),
        cached_cash_balance: cached_balance,
        derived_cash_balance: derived_cash_balance(records),
        negative_holdings,
    }
}
