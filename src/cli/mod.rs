use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

use crate::application::{AppError, HistoryFilter, PortfolioService};
use crate::domain::{RecordKind, TransactionRecord};

/// Folio - Brokerage Session Ledger
#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "A single-session, in-memory brokerage ledger")]
#[command(version)]
pub struct Cli {
    /// Read session commands from a file instead of stdin
    #[arg(short, long)]
    pub script: Option<String>,

    /// Suppress the prompt and banner (useful when piping input)
    #[arg(short, long)]
    pub quiet: bool,
}

/// One line of session input, parsed as a subcommand.
#[derive(Parser)]
#[command(name = "folio", no_binary_name = true)]
#[command(disable_version_flag = true)]
struct SessionLine {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deposit cash into the account
    Deposit {
        /// Amount to deposit (e.g. "1000" or "250.50")
        amount: Decimal,
    },

    /// Withdraw cash from the account
    Withdraw {
        /// Amount to withdraw
        amount: Decimal,
    },

    /// Buy shares of a stock
    Buy {
        /// Ticker symbol (e.g. AAPL)
        symbol: String,

        /// Number of shares (fractional allowed)
        quantity: Decimal,

        /// Price per share
        price: Decimal,
    },

    /// Sell shares of a stock
    Sell {
        /// Ticker symbol
        symbol: String,

        /// Number of shares (fractional allowed)
        quantity: Decimal,

        /// Price per share
        price: Decimal,
    },

    /// Show the current cash balance
    Balance,

    /// Show the transaction history
    History {
        /// Filter by ticker symbol
        #[arg(long)]
        symbol: Option<String>,

        /// Filter by record kind: deposit, withdraw, buy, sell
        #[arg(long)]
        kind: Option<String>,

        /// Show only the most recent N records
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show current holdings per symbol
    Holdings {
        /// Omit closed positions (held quantity zero)
        #[arg(long)]
        open_only: bool,
    },

    /// Show a per-position session summary
    Summary,

    /// Verify ledger integrity (cached balance vs replayed log)
    Check,

    /// Export session data to CSV or JSON
    Export {
        /// What to export: history, holdings, full
        export_type: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// End the session
    #[command(alias = "exit")]
    Quit,
}

enum SessionControl {
    Continue,
    Quit,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let mut service = PortfolioService::new();

        match &self.script {
            Some(path) => {
                let script = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read script file: {}", path))?;
                for line in script.lines() {
                    if let SessionControl::Quit = eval_line(&mut service, line)? {
                        break;
                    }
                }
            }
            None => {
                if !self.quiet {
                    println!(
                        "folio {} - type 'help' for commands, 'quit' to end",
                        env!("CARGO_PKG_VERSION")
                    );
                }
                self.run_interactive(&mut service)?;
            }
        }

        Ok(())
    }

    fn run_interactive(&self, service: &mut PortfolioService) -> Result<()> {
        use std::io::{BufRead, Write};

        let stdin = std::io::stdin();
        let mut lines = stdin.lock().lines();

        loop {
            if !self.quiet {
                print!("folio> ");
                std::io::stdout().flush()?;
            }

            let Some(line) = lines.next() else {
                // EOF ends the session
                break;
            };
            if let SessionControl::Quit = eval_line(service, &line?)? {
                break;
            }
        }

        Ok(())
    }
}

/// Parse and execute one line of session input. Rejected operations are
/// printed and the session continues; only driver-level failures propagate.
fn eval_line(service: &mut PortfolioService, line: &str) -> Result<SessionControl> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(SessionControl::Continue);
    }

    let parsed = match SessionLine::try_parse_from(line.split_whitespace()) {
        Ok(parsed) => parsed,
        Err(err) => {
            // Covers parse errors as well as help requests
            err.print()?;
            return Ok(SessionControl::Continue);
        }
    };

    match dispatch(service, parsed.command) {
        Ok(control) => Ok(control),
        Err(err) => {
            eprintln!("Error: {}", err);
            Ok(SessionControl::Continue)
        }
    }
}

fn dispatch(service: &mut PortfolioService, command: Commands) -> Result<SessionControl> {
    match command {
        Commands::Deposit { amount } => {
            let result = service.deposit(amount)?;
            println!(
                "Deposited {} (balance: {})",
                result.record.quantity, result.cash_balance
            );
        }

        Commands::Withdraw { amount } => {
            let result = service.withdraw(amount)?;
            println!("Withdrew {} (balance: {})", amount, result.cash_balance);
        }

        Commands::Buy {
            symbol,
            quantity,
            price,
        } => {
            let symbol = symbol.to_uppercase();
            let result = service.buy(&symbol, quantity, price)?;
            println!(
                "Bought {} {} @ {} for {} (balance: {})",
                quantity, symbol, price, result.total, result.cash_balance
            );
        }

        Commands::Sell {
            symbol,
            quantity,
            price,
        } => {
            let symbol = symbol.to_uppercase();
            let result = service.sell(&symbol, quantity, price)?;
            println!(
                "Sold {} {} @ {} for {} (balance: {})",
                quantity, symbol, price, result.total, result.cash_balance
            );
        }

        Commands::Balance => {
            println!("Cash balance: {}", service.cash_balance());
        }

        Commands::History {
            symbol,
            kind,
            limit,
        } => {
            let kind = kind
                .map(|k| {
                    RecordKind::from_str(&k).ok_or(AppError::UnknownRecordKind(k))
                })
                .transpose()?;
            let filter = HistoryFilter {
                symbol,
                kind,
                limit,
            };
            print_history(&service.history_filtered(&filter));
        }

        Commands::Holdings { open_only } => {
            let holdings = service.holdings(open_only);
            if holdings.is_empty() {
                println!("No holdings.");
            } else {
                println!("{:<10} {:>16}", "SYMBOL", "QUANTITY");
                println!("{}", "-".repeat(27));
                for entry in holdings {
                    println!("{:<10} {:>16}", entry.symbol, entry.quantity);
                }
            }
        }

        Commands::Summary => {
            let report = service.summary();
            println!(
                "Portfolio summary as of {}",
                report.as_of.format("%Y-%m-%d %H:%M:%S")
            );
            println!();
            println!(
                "{:<10} {:>12} {:>12} {:>12} {:>14}",
                "SYMBOL", "QUANTITY", "BOUGHT", "SOLD", "NET INVESTED"
            );
            println!("{}", "-".repeat(65));
            for position in &report.positions {
                println!(
                    "{:<10} {:>12} {:>12} {:>12} {:>14}",
                    position.symbol,
                    position.quantity,
                    position.total_bought,
                    position.total_sold,
                    position.net_invested
                );
            }
            println!("{}", "-".repeat(65));
            println!("Cash balance: {}", report.cash_balance);
            println!("Net invested: {}", report.net_invested);
        }

        Commands::Check => {
            let report = service.check_integrity();
            if report.is_ok() {
                println!(
                    "Ledger OK: {} records, cash balance {}",
                    report.record_count, report.cached_cash_balance
                );
            } else {
                println!("Ledger integrity check FAILED");
                println!("  Cached cash balance:  {}", report.cached_cash_balance);
                println!("  Derived cash balance: {}", report.derived_cash_balance);
                for (symbol, quantity) in &report.negative_holdings {
                    println!("  Negative holding: {} = {}", symbol, quantity);
                }
            }
        }

        Commands::Export {
            export_type,
            output,
        } => {
            run_export_command(service, &export_type, output.as_deref())?;
        }

        Commands::Quit => {
            return Ok(SessionControl::Quit);
        }
    }

    Ok(SessionControl::Continue)
}

fn print_history(records: &[TransactionRecord]) {
    if records.is_empty() {
        println!("No transactions.");
        return;
    }

    println!(
        "{:<20} {:<10} {:>14} {:>12} {:<9}",
        "DATE", "SYMBOL", "QUANTITY", "PRICE", "KIND"
    );
    println!("{}", "-".repeat(70));
    for record in records {
        println!(
            "{:<20} {:<10} {:>14} {:>12} {:<9}",
            record.timestamp.format("%Y-%m-%d %H:%M:%S"),
            record.symbol,
            record.quantity,
            record.unit_price,
            record.kind
        );
    }
}

fn run_export_command(
    service: &PortfolioService,
    export_type: &str,
    output: Option<&str>,
) -> Result<()> {
    use crate::io::Exporter;
    use std::fs::File;
    use std::io::{Write, stdout};

    let exporter = Exporter::new(service);

    // Determine output writer
    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    match export_type {
        "history" => {
            let count = exporter.export_history_csv(writer)?;
            if output.is_some() {
                eprintln!("Exported {} records", count);
            }
        }
        "holdings" => {
            let count = exporter.export_holdings_csv(writer)?;
            if output.is_some() {
                eprintln!("Exported {} holdings", count);
            }
        }
        "full" => {
            let snapshot = exporter.export_full_json(writer)?;
            if output.is_some() {
                eprintln!(
                    "Exported full session: {} records, cash balance {}",
                    snapshot.records.len(),
                    snapshot.cash_balance
                );
            }
        }
        _ => {
            anyhow::bail!(
                "Invalid export type '{}'. Valid types: history, holdings, full",
                export_type
            );
        }
    }

    Ok(())
}
