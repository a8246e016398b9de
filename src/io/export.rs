use anyhow::Result;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::application::PortfolioService;
use crate::domain::TransactionRecord;

/// Session snapshot for full JSON export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub cash_balance: Decimal,
    pub records: Vec<TransactionRecord>,
}

/// Exporter for converting session data to various formats
pub struct Exporter<'a> {
    service: &'a PortfolioService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a PortfolioService) -> Self {
        Self { service }
    }

    /// Export transaction history to CSV format
    pub fn export_history_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        // Write header
        csv_writer.write_record(["id", "timestamp", "symbol", "kind", "quantity", "unit_price"])?;

        let mut count = 0;
        for record in self.service.history() {
            csv_writer.write_record(&[
                record.id.to_string(),
                record.timestamp.to_rfc3339(),
                record.symbol.clone(),
                record.kind.to_string(),
                record.quantity.to_string(),
                record.unit_price.to_string(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export current holdings to CSV format
    pub fn export_holdings_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        // Write header
        csv_writer.write_record(["symbol", "quantity"])?;

        let mut count = 0;
        for entry in self.service.holdings(false) {
            csv_writer.write_record(&[entry.symbol, entry.quantity.to_string()])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export the full session as a JSON snapshot
    pub fn export_full_json<W: Write>(&self, mut writer: W) -> Result<SessionSnapshot> {
        let snapshot = SessionSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            cash_balance: self.service.cash_balance(),
            records: self.service.history().to_vec(),
        };

        let json = serde_json::to_string_pretty(&snapshot)?;
        writer.write_all(json.as_bytes())?;
        writer.flush()?;

        Ok(snapshot)
    }
}
