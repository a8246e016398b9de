use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioReport {
    pub as_of: DateTime<Utc>,
    pub cash_balance: Decimal,
    pub positions: Vec<PositionSummary>,
    /// Net cash spent on stock across the whole session (buys minus sales)
    pub net_invested: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionSummary {
    pub symbol: String,
    /// Current held quantity (zero for closed positions)
    pub quantity: Decimal,
    /// Total shares ever bought
    pub total_bought: Decimal,
    /// Total shares ever sold
    pub total_sold: Decimal,
    /// Cash spent on buys minus cash received from sales
    pub net_invested: Decimal,
}
