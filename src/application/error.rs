use thiserror::Error;

use crate::domain::LedgerError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Operation rejected: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Unknown record kind: {0} (expected deposit, withdraw, buy or sell)")]
    UnknownRecordKind(String),
}
