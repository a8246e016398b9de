// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use folio::application::PortfolioService;
use rust_decimal::Decimal;

/// Shorthand for building whole-number decimals in scenarios
pub fn dec(value: i64) -> Decimal {
    Decimal::from(value)
}

/// Helper to create a service over a fresh empty ledger
pub fn test_service() -> PortfolioService {
    PortfolioService::new()
}

/// Helper to create a service pre-funded with an initial deposit
pub fn funded_service(amount: i64) -> Result<PortfolioService> {
    let mut service = PortfolioService::new();
    service.deposit(dec(amount))?;
    Ok(service)
}

/// Assert the cached cash balance matches the replayed record log
pub fn assert_ledger_ok(service: &PortfolioService) {
    let report = service.check_integrity();
    assert!(
        report.is_ok(),
        "integrity check failed: cached {} vs derived {}",
        report.cached_cash_balance,
        report.derived_cash_balance
    );
}
