//! splitbook-finance: row aggregation and the one-shot statement analysis engine

pub mod aggregator;
pub mod engine;

pub use aggregator::{Aggregate, Aggregator};
pub use engine::{AnalyzeOptions, Analysis, KeyStats, analyze_path, analyze_reader};
