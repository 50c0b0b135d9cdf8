//! splitbook-core: domain types, recency tracking and settlement for a two-partner ledger

pub mod ledger;
pub mod party;
pub mod recency;
pub mod settlement;

pub use ledger::{CategorySummary, Ledger, PriorBalances, Transaction};
pub use party::{Party, PartyCodes};
pub use recency::{RecencyTracker, parse_instant};
pub use settlement::{
    DEFAULT_EPSILON, Direction, Provisional, Settlement, SettlementBreakdown, settle,
};
