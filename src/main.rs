use anyhow::Result;
use clap::Parser;
use folio::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.run()
}
