use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type RecordId = Uuid;

/// Reserved symbol for cash movements. Distinct from any tradable ticker.
pub const CASH_SYMBOL: &str = "CASH";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    /// Cash entering the account (plain deposit or sale proceeds)
    Deposit,
    /// Cash leaving the account (plain withdrawal or purchase cost)
    Withdraw,
    /// Shares entering the account
    Buy,
    /// Shares leaving the account
    Sell,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Deposit => "deposit",
            RecordKind::Withdraw => "withdraw",
            RecordKind::Buy => "buy",
            RecordKind::Sell => "sell",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "deposit" => Some(RecordKind::Deposit),
            "withdraw" => Some(RecordKind::Withdraw),
            "buy" => Some(RecordKind::Buy),
            "sell" => Some(RecordKind::Sell),
            _ => None,
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One ledger entry: a signed cash or share movement at a point in time.
/// Records are immutable - corrections are made by appending offsetting
/// records, never by editing past entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: RecordId,
    /// Ticker symbol, or `CASH_SYMBOL` for cash movements
    pub symbol: String,
    /// When the record was appended
    pub timestamp: DateTime<Utc>,
    pub kind: RecordKind,
    /// Signed quantity: positive for increases, negative for decreases.
    /// Shares for stock records, currency units for cash records.
    pub quantity: Decimal,
    /// Price per unit at transaction time; 1 for pure cash movements
    pub unit_price: Decimal,
}

impl TransactionRecord {
    /// Create a cash movement record. `quantity` carries the sign:
    /// positive for deposits, negative for withdrawals.
    pub fn cash(kind: RecordKind, quantity: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            symbol: CASH_SYMBOL.to_string(),
            timestamp: Utc::now(),
            kind,
            quantity,
            unit_price: Decimal::ONE,
        }
    }

    /// Create a stock movement record. `quantity` carries the sign:
    /// positive for buys, negative for sells.
    pub fn stock(
        symbol: impl Into<String>,
        kind: RecordKind,
        quantity: Decimal,
        unit_price: Decimal,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            symbol: symbol.into(),
            timestamp: Utc::now(),
            kind,
            quantity,
            unit_price,
        }
    }

    /// Returns true if this record moves cash rather than shares
    pub fn is_cash(&self) -> bool {
        self.symbol == CASH_SYMBOL
    }
}
