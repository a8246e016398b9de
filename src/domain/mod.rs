mod ledger;
mod portfolio;
mod record;

pub use ledger::*;
pub use portfolio::*;
pub use record::*;
