use rust_decimal::Decimal;

use super::{RecordKind, TransactionRecord, compute_holdings, held_quantity};

/// The append-only brokerage ledger: an ordered sequence of transaction
/// records plus a cached cash balance kept in sync on every mutation.
///
/// Every operation validates against current derived state first and appends
/// only on success, so a failed call leaves the ledger untouched. A trade
/// appends both of its legs (stock then cash) before returning; callers never
/// observe a half-applied trade.
#[derive(Debug, Default)]
pub struct PortfolioLedger {
    records: Vec<TransactionRecord>,
    cash_balance: Decimal,
}

impl PortfolioLedger {
    /// Create an empty ledger with zero cash balance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a cash deposit. Rejects non-positive amounts.
    pub fn deposit_cash(&mut self, amount: Decimal) -> Result<&TransactionRecord, LedgerError> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount { amount });
        }

        self.cash_balance += amount;
        let idx = self.records.len();
        self.records
            .push(TransactionRecord::cash(RecordKind::Deposit, amount));
        Ok(&self.records[idx])
    }

    /// Record a cash withdrawal. Rejects non-positive amounts and
    /// withdrawals exceeding the current cash balance.
    pub fn withdraw_cash(&mut self, amount: Decimal) -> Result<&TransactionRecord, LedgerError> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount { amount });
        }
        if amount > self.cash_balance {
            return Err(LedgerError::InsufficientFunds {
                available: self.cash_balance,
                required: amount,
            });
        }

        self.cash_balance -= amount;
        let idx = self.records.len();
        self.records
            .push(TransactionRecord::cash(RecordKind::Withdraw, -amount));
        Ok(&self.records[idx])
    }

    /// Buy shares: appends a stock record followed by the paying cash record.
    /// Fails when the total cost exceeds the current cash balance.
    pub fn buy_stock(
        &mut self,
        symbol: &str,
        quantity: Decimal,
        unit_price: Decimal,
    ) -> Result<&[TransactionRecord], LedgerError> {
        validate_trade_inputs(symbol, quantity, unit_price)?;

        let total_cost = quantity * unit_price;
        if total_cost > self.cash_balance {
            return Err(LedgerError::InsufficientFunds {
                available: self.cash_balance,
                required: total_cost,
            });
        }

        self.cash_balance -= total_cost;
        self.records.push(TransactionRecord::stock(
            symbol,
            RecordKind::Buy,
            quantity,
            unit_price,
        ));
        self.records
            .push(TransactionRecord::cash(RecordKind::Withdraw, -total_cost));
        Ok(&self.records[self.records.len() - 2..])
    }

    /// Sell shares: appends a stock record followed by the proceeds cash
    /// record. Fails when the quantity exceeds the currently held quantity.
    pub fn sell_stock(
        &mut self,
        symbol: &str,
        quantity: Decimal,
        unit_price: Decimal,
    ) -> Result<&[TransactionRecord], LedgerError> {
        validate_trade_inputs(symbol, quantity, unit_price)?;

        let held = self.held_quantity(symbol);
        if quantity > held {
            return Err(LedgerError::InsufficientHoldings {
                symbol: symbol.to_string(),
                held,
                requested: quantity,
            });
        }

        let total_earnings = quantity * unit_price;
        self.cash_balance += total_earnings;
        self.records.push(TransactionRecord::stock(
            symbol,
            RecordKind::Sell,
            -quantity,
            unit_price,
        ));
        self.records
            .push(TransactionRecord::cash(RecordKind::Deposit, total_earnings));
        Ok(&self.records[self.records.len() - 2..])
    }

    /// Cached cash balance, equal to the derived sum over cash records.
    pub fn cash_balance(&self) -> Decimal {
        self.cash_balance
    }

    /// Derived held quantity of a symbol (zero for unknown symbols).
    pub fn held_quantity(&self, symbol: &str) -> Decimal {
        held_quantity(symbol, &self.records)
    }

    /// Full transaction history in insertion (= chronological) order.
    pub fn history(&self) -> &[TransactionRecord] {
        &self.records
    }

    /// Held quantity per non-cash symbol, in first-appearance order.
    /// Closed positions (quantity zero) are retained.
    pub fn holdings(&self) -> Vec<(String, Decimal)> {
        compute_holdings(&self.records)
    }
}

fn validate_trade_inputs(
    symbol: &str,
    quantity: Decimal,
    unit_price: Decimal,
) -> Result<(), LedgerError> {
    if symbol.is_empty() || symbol == super::CASH_SYMBOL {
        return Err(LedgerError::ReservedSymbol {
            symbol: symbol.to_string(),
        });
    }
    if quantity <= Decimal::ZERO {
        return Err(LedgerError::InvalidQuantity { quantity });
    }
    if unit_price < Decimal::ZERO {
        return Err(LedgerError::InvalidPrice { unit_price });
    }
    Ok(())
}

/// A rejected ledger operation. Every variant leaves the ledger unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Withdrawal or purchase exceeds available cash
    InsufficientFunds {
        available: Decimal,
        required: Decimal,
    },
    /// Sale exceeds currently held quantity of the symbol
    InsufficientHoldings {
        symbol: String,
        held: Decimal,
        requested: Decimal,
    },
    /// Cash amount must be strictly positive
    InvalidAmount { amount: Decimal },
    /// Trade quantity must be strictly positive
    InvalidQuantity { quantity: Decimal },
    /// Unit price must be non-negative
    InvalidPrice { unit_price: Decimal },
    /// Symbol is empty or collides with the reserved cash symbol
    ReservedSymbol { symbol: String },
}

impl std::fmt::Display for LedgerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LedgerError::InsufficientFunds {
                available,
                required,
            } => {
                write!(
                    f,
                    "Insufficient funds: {} available, {} required",
                    available, required
                )
            }
            LedgerError::InsufficientHoldings {
                symbol,
                held,
                requested,
            } => {
                write!(
                    f,
                    "Insufficient holdings of {}: {} held, {} requested",
                    symbol, held, requested
                )
            }
            LedgerError::InvalidAmount { amount } => {
                write!(f, "Amount must be positive, got {}", amount)
            }
            LedgerError::InvalidQuantity { quantity } => {
                write!(f, "Quantity must be positive, got {}", quantity)
            }
            LedgerError::InvalidPrice { unit_price } => {
                write!(f, "Unit price must be non-negative, got {}", unit_price)
            }
            LedgerError::ReservedSymbol { symbol } => {
                write!(f, "Invalid symbol: '{}'", symbol)
            }
        }
    }
}

impl std::error::Error for LedgerError {}

#[cfg(test)]
mod tests {
    use super::super::derived_cash_balance;
    use super::*;

    fn dec(value: i64) -> Decimal {
        Decimal::from(value)
    }

    /// The cached balance must equal the derived sum after every operation.
    fn assert_invariant(ledger: &PortfolioLedger) {
        assert_eq!(
            ledger.cash_balance(),
            derived_cash_balance(ledger.history()),
            "cached cash balance diverged from derived sum"
        );
    }

    #[test]
    fn test_new_ledger_is_empty() {
        let ledger = PortfolioLedger::new();
        assert_eq!(ledger.cash_balance(), Decimal::ZERO);
        assert!(ledger.history().is_empty());
        assert!(ledger.holdings().is_empty());
    }

    #[test]
    fn test_deposit_appends_one_record() {
        let mut ledger = PortfolioLedger::new();
        ledger.deposit_cash(dec(1000)).unwrap();

        assert_eq!(ledger.cash_balance(), dec(1000));
        assert_eq!(ledger.history().len(), 1);
        assert_eq!(ledger.history()[0].kind, RecordKind::Deposit);
        assert_eq!(ledger.history()[0].quantity, dec(1000));
        assert_invariant(&ledger);
    }

    #[test]
    fn test_deposit_rejects_non_positive() {
        let mut ledger = PortfolioLedger::new();

        assert!(matches!(
            ledger.deposit_cash(Decimal::ZERO),
            Err(LedgerError::InvalidAmount { .. })
        ));
        assert!(matches!(
            ledger.deposit_cash(dec(-50)),
            Err(LedgerError::InvalidAmount { .. })
        ));
        assert!(ledger.history().is_empty());
    }

    #[test]
    fn test_withdraw_roundtrip_restores_balance() {
        let mut ledger = PortfolioLedger::new();
        ledger.deposit_cash(dec(250)).unwrap();
        ledger.withdraw_cash(dec(250)).unwrap();

        assert_eq!(ledger.cash_balance(), Decimal::ZERO);
        assert_eq!(ledger.history().len(), 2);
        assert_eq!(ledger.history()[1].quantity, dec(-250));
        assert_invariant(&ledger);
    }

    #[test]
    fn test_withdraw_insufficient_funds_leaves_state_unchanged() {
        let mut ledger = PortfolioLedger::new();
        ledger.deposit_cash(dec(740)).unwrap();

        let err = ledger.withdraw_cash(dec(10000)).unwrap_err();
        assert_eq!(
            err,
            LedgerError::InsufficientFunds {
                available: dec(740),
                required: dec(10000),
            }
        );
        assert_eq!(ledger.cash_balance(), dec(740));
        assert_eq!(ledger.history().len(), 1);
        assert_invariant(&ledger);
    }

    #[test]
    fn test_buy_appends_stock_leg_then_cash_leg() {
        let mut ledger = PortfolioLedger::new();
        ledger.deposit_cash(dec(1000)).unwrap();
        let appended = ledger.buy_stock("AAPL", dec(10), dec(50)).unwrap();

        assert_eq!(appended.len(), 2);
        assert_eq!(appended[0].kind, RecordKind::Buy);
        assert_eq!(appended[0].symbol, "AAPL");
        assert_eq!(appended[0].quantity, dec(10));
        assert_eq!(appended[0].unit_price, dec(50));
        assert_eq!(appended[1].kind, RecordKind::Withdraw);
        assert!(appended[1].is_cash());
        assert_eq!(appended[1].quantity, dec(-500));

        assert_eq!(ledger.cash_balance(), dec(500));
        assert_eq!(ledger.held_quantity("AAPL"), dec(10));
        assert_invariant(&ledger);
    }

    #[test]
    fn test_buy_insufficient_funds_appends_nothing() {
        let mut ledger = PortfolioLedger::new();
        ledger.deposit_cash(dec(100)).unwrap();

        let err = ledger.buy_stock("AAPL", dec(10), dec(50)).unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientFunds { .. }));
        // No partial append: neither the stock leg nor the cash leg landed
        assert_eq!(ledger.history().len(), 1);
        assert_eq!(ledger.cash_balance(), dec(100));
        assert_invariant(&ledger);
    }

    #[test]
    fn test_sell_reduces_holding_and_credits_cash() {
        let mut ledger = PortfolioLedger::new();
        ledger.deposit_cash(dec(1000)).unwrap();
        ledger.buy_stock("AAPL", dec(10), dec(50)).unwrap();
        let appended = ledger.sell_stock("AAPL", dec(4), dec(60)).unwrap();

        assert_eq!(appended[0].kind, RecordKind::Sell);
        assert_eq!(appended[0].quantity, dec(-4));
        assert_eq!(appended[1].kind, RecordKind::Deposit);
        assert_eq!(appended[1].quantity, dec(240));

        assert_eq!(ledger.cash_balance(), dec(740));
        assert_eq!(ledger.held_quantity("AAPL"), dec(6));
        assert_invariant(&ledger);
    }

    #[test]
    fn test_sell_insufficient_holdings_leaves_state_unchanged() {
        let mut ledger = PortfolioLedger::new();
        ledger.deposit_cash(dec(1000)).unwrap();
        ledger.buy_stock("AAPL", dec(10), dec(50)).unwrap();
        ledger.sell_stock("AAPL", dec(4), dec(60)).unwrap();

        let err = ledger.sell_stock("AAPL", dec(100), dec(60)).unwrap_err();
        assert_eq!(
            err,
            LedgerError::InsufficientHoldings {
                symbol: "AAPL".to_string(),
                held: dec(6),
                requested: dec(100),
            }
        );
        assert_eq!(ledger.cash_balance(), dec(740));
        assert_eq!(ledger.held_quantity("AAPL"), dec(6));
        assert_invariant(&ledger);
    }

    #[test]
    fn test_sell_unknown_symbol_fails() {
        let mut ledger = PortfolioLedger::new();
        ledger.deposit_cash(dec(1000)).unwrap();

        let err = ledger.sell_stock("GOOG", dec(1), dec(10)).unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientHoldings { .. }));
        assert_eq!(ledger.history().len(), 1);
    }

    #[test]
    fn test_trades_reject_cash_symbol() {
        let mut ledger = PortfolioLedger::new();
        ledger.deposit_cash(dec(1000)).unwrap();

        let err = ledger.buy_stock("CASH", dec(1), dec(1)).unwrap_err();
        assert!(matches!(err, LedgerError::ReservedSymbol { .. }));
    }

    #[test]
    fn test_trades_reject_non_positive_quantity_and_negative_price() {
        let mut ledger = PortfolioLedger::new();
        ledger.deposit_cash(dec(1000)).unwrap();

        assert!(matches!(
            ledger.buy_stock("AAPL", Decimal::ZERO, dec(50)),
            Err(LedgerError::InvalidQuantity { .. })
        ));
        assert!(matches!(
            ledger.buy_stock("AAPL", dec(10), dec(-1)),
            Err(LedgerError::InvalidPrice { .. })
        ));
        assert_eq!(ledger.history().len(), 1);
    }

    #[test]
    fn test_fractional_quantities() {
        let mut ledger = PortfolioLedger::new();
        ledger.deposit_cash(dec(1000)).unwrap();
        ledger
            .buy_stock("AAPL", Decimal::new(25, 1), dec(100))
            .unwrap(); // 2.5 shares

        assert_eq!(ledger.held_quantity("AAPL"), Decimal::new(25, 1));
        assert_eq!(ledger.cash_balance(), dec(750));
        assert_invariant(&ledger);
    }

    #[test]
    fn test_free_stock_grant_at_zero_price() {
        // Price zero is allowed: quantity moves, cash leg is zero
        let mut ledger = PortfolioLedger::new();
        ledger.buy_stock("AAPL", dec(5), Decimal::ZERO).unwrap();

        assert_eq!(ledger.held_quantity("AAPL"), dec(5));
        assert_eq!(ledger.cash_balance(), Decimal::ZERO);
        assert_invariant(&ledger);
    }
}
