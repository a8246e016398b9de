mod common;

use anyhow::Result;
use common::{dec, funded_service, test_service};
use rust_decimal::Decimal;

#[test]
fn test_summary_empty_session() {
    let service = test_service();
    let report = service.summary();

    assert_eq!(report.cash_balance, Decimal::ZERO);
    assert_eq!(report.net_invested, Decimal::ZERO);
    assert!(report.positions.is_empty());
}

#[test]
fn test_summary_tracks_bought_sold_and_net_invested() -> Result<()> {
    let mut service = funded_service(10000)?;
    service.buy("AAPL", dec(10), dec(50))?; // -500 cash
    service.sell("AAPL", dec(4), dec(60))?; // +240 cash
    service.buy("MSFT", dec(5), dec(200))?; // -1000 cash

    let report = service.summary();
    assert_eq!(report.cash_balance, dec(10000 - 500 + 240 - 1000));
    assert_eq!(report.positions.len(), 2);

    let aapl = &report.positions[0];
    assert_eq!(aapl.symbol, "AAPL");
    assert_eq!(aapl.quantity, dec(6));
    assert_eq!(aapl.total_bought, dec(10));
    assert_eq!(aapl.total_sold, dec(4));
    assert_eq!(aapl.net_invested, dec(500 - 240));

    let msft = &report.positions[1];
    assert_eq!(msft.symbol, "MSFT");
    assert_eq!(msft.quantity, dec(5));
    assert_eq!(msft.total_sold, Decimal::ZERO);
    assert_eq!(msft.net_invested, dec(1000));

    assert_eq!(report.net_invested, dec(260 + 1000));
    Ok(())
}

#[test]
fn test_summary_includes_closed_positions() -> Result<()> {
    let mut service = funded_service(1000)?;
    service.buy("AAPL", dec(10), dec(50))?;
    service.sell("AAPL", dec(10), dec(60))?;

    let report = service.summary();
    assert_eq!(report.positions.len(), 1);
    assert_eq!(report.positions[0].quantity, Decimal::ZERO);
    // Sold above cost: net invested goes negative (realized gain)
    assert_eq!(report.positions[0].net_invested, dec(500 - 600));
    Ok(())
}

#[test]
fn test_integrity_report_on_live_service() -> Result<()> {
    let mut service = funded_service(740)?;
    let report = service.check_integrity();

    assert!(report.is_ok());
    assert_eq!(report.record_count, 1);
    assert_eq!(report.cached_cash_balance, dec(740));
    assert_eq!(report.derived_cash_balance, dec(740));

    service.withdraw(dec(740))?;
    assert!(service.check_integrity().is_ok());
    Ok(())
}
