use chrono::Utc;
use rust_decimal::Decimal;

use crate::domain::{
    IntegrityReport, PortfolioLedger, RecordKind, TransactionRecord, verify_ledger,
};

use super::{AppError, PortfolioReport, PositionSummary};

/// Application service providing high-level operations over a single ledger.
/// This is the primary interface for any client (CLI, test harness, etc.).
/// It owns the ledger: one service instance is one brokerage session.
pub struct PortfolioService {
    ledger: PortfolioLedger,
}

/// Result of a cash deposit or withdrawal
#[derive(Debug)]
pub struct CashResult {
    pub record: TransactionRecord,
    pub cash_balance: Decimal,
}

/// Result of a buy or sell: both appended legs plus the new balance
#[derive(Debug)]
pub struct TradeResult {
    pub stock_record: TransactionRecord,
    pub cash_record: TransactionRecord,
    /// Total cost (buy) or total earnings (sell)
    pub total: Decimal,
    pub cash_balance: Decimal,
}

/// Holdings entry for a symbol
pub struct HoldingEntry {
    pub symbol: String,
    pub quantity: Decimal,
}

/// Filter for querying transaction history
#[derive(Default)]
pub struct HistoryFilter {
    pub symbol: Option<String>,
    pub kind: Option<RecordKind>,
    pub limit: Option<usize>,
}

impl PortfolioService {
    /// Create a service over a fresh, empty ledger.
    pub fn new() -> Self {
        Self {
            ledger: PortfolioLedger::new(),
        }
    }

    // ========================
    // Cash operations
    // ========================

    pub fn deposit(&mut self, amount: Decimal) -> Result<CashResult, AppError> {
        let record = self.ledger.deposit_cash(amount)?.clone();
        Ok(CashResult {
            record,
            cash_balance: self.ledger.cash_balance(),
        })
    }

    pub fn withdraw(&mut self, amount: Decimal) -> Result<CashResult, AppError> {
        let record = self.ledger.withdraw_cash(amount)?.clone();
        Ok(CashResult {
            record,
            cash_balance: self.ledger.cash_balance(),
        })
    }

    // ========================
    // Trade operations
    // ========================

    pub fn buy(
        &mut self,
        symbol: &str,
        quantity: Decimal,
        unit_price: Decimal,
    ) -> Result<TradeResult, AppError> {
        let appended = self.ledger.buy_stock(symbol, quantity, unit_price)?;
        let (stock_record, cash_record) = (appended[0].clone(), appended[1].clone());
        Ok(TradeResult {
            total: -cash_record.quantity,
            stock_record,
            cash_record,
            cash_balance: self.ledger.cash_balance(),
        })
    }

    pub fn sell(
        &mut self,
        symbol: &str,
        quantity: Decimal,
        unit_price: Decimal,
    ) -> Result<TradeResult, AppError> {
        let appended = self.ledger.sell_stock(symbol, quantity, unit_price)?;
        let (stock_record, cash_record) = (appended[0].clone(), appended[1].clone());
        Ok(TradeResult {
            total: cash_record.quantity,
            stock_record,
            cash_record,
            cash_balance: self.ledger.cash_balance(),
        })
    }

    // ========================
    // Read operations
    // ========================

    pub fn cash_balance(&self) -> Decimal {
        self.ledger.cash_balance()
    }

    pub fn held_quantity(&self, symbol: &str) -> Decimal {
        self.ledger.held_quantity(symbol)
    }

    /// Full transaction history in insertion order.
    pub fn history(&self) -> &[TransactionRecord] {
        self.ledger.history()
    }

    /// Transaction history narrowed by symbol and/or kind. `limit` keeps the
    /// most recent matches.
    pub fn history_filtered(&self, filter: &HistoryFilter) -> Vec<TransactionRecord> {
        let matches: Vec<TransactionRecord> = self
            .ledger
            .history()
            .iter()
            .filter(|r| match &filter.symbol {
                Some(symbol) => r.symbol.eq_ignore_ascii_case(symbol),
                None => true,
            })
            .filter(|r| match filter.kind {
                Some(kind) => r.kind == kind,
                None => true,
            })
            .cloned()
            .collect();

        match filter.limit {
            Some(limit) if matches.len() > limit => matches[matches.len() - limit..].to_vec(),
            _ => matches,
        }
    }

    /// Current holdings per symbol. With `open_only`, closed positions
    /// (quantity zero) are dropped from the view.
    pub fn holdings(&self, open_only: bool) -> Vec<HoldingEntry> {
        self.ledger
            .holdings()
            .into_iter()
            .filter(|(_, quantity)| !open_only || *quantity != Decimal::ZERO)
            .map(|(symbol, quantity)| HoldingEntry { symbol, quantity })
            .collect()
    }

    /// Per-position summary of the whole session.
    pub fn summary(&self) -> PortfolioReport {
        let records = self.ledger.history();

        let positions: Vec<PositionSummary> = self
            .ledger
            .holdings()
            .into_iter()
            .map(|(symbol, quantity)| {
                let mut total_bought = Decimal::ZERO;
                let mut total_sold = Decimal::ZERO;
                let mut net_invested = Decimal::ZERO;

                for record in records.iter().filter(|r| r.symbol == symbol) {
                    match record.kind {
                        RecordKind::Buy => {
                            total_bought += record.quantity;
                            net_invested += record.quantity * record.unit_price;
                        }
                        RecordKind::Sell => {
                            // Sell records carry negative quantities
                            total_sold -= record.quantity;
                            net_invested += record.quantity * record.unit_price;
                        }
                        _ => {}
                    }
                }

                PositionSummary {
                    symbol,
                    quantity,
                    total_bought,
                    total_sold,
                    net_invested,
                }
            })
            .collect();

        let net_invested = positions.iter().map(|p| p.net_invested).sum();

        PortfolioReport {
            as_of: Utc::now(),
            cash_balance: self.ledger.cash_balance(),
            positions,
            net_invested,
        }
    }

    /// Replay the record log and check it against the cached balance.
    pub fn check_integrity(&self) -> IntegrityReport {
        verify_ledger(self.ledger.cash_balance(), self.ledger.history())
    }
}

impl Default for PortfolioService {
    fn default() -> Self {
        Self::new()
    }
}
