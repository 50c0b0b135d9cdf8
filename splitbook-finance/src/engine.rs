//! One-shot analysis of a partnership statement.
//!
//! A run reads the header, maps columns, aggregates every row, then settles.
//! Any [`IngestError`] aborts the run before results are produced; the input
//! file is closed on every path when the reader drops.

use chrono::{Datelike, Local};
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, trace, warn};

use splitbook_core::{
    DEFAULT_EPSILON, Ledger, Party, PartyCodes, PriorBalances, SettlementBreakdown, Transaction,
    settle,
};
use splitbook_ingest::{ColumnMap, IngestError, StatementReader, map_columns};

use crate::aggregator::Aggregator;

/// Caller-controlled knobs for a run.
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    pub codes: PartyCodes,
    pub prior: PriorBalances,
    /// Settlement amounts at or below this are reported as settled.
    pub epsilon: Decimal,
    /// Year assumed for dates written without one ("1/15").
    pub reference_year: i32,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            codes: PartyCodes::default(),
            prior: PriorBalances::default(),
            epsilon: DEFAULT_EPSILON,
            reference_year: Local::now().year(),
        }
    }
}

/// Headline numbers for a statement.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct KeyStats {
    pub transaction_count: usize,
    pub total_deposits: Decimal,
    pub total_withdrawals: Decimal,
    /// Bank balance on the latest transaction.
    pub latest_balance: Option<Decimal>,
    /// Rows whose party label matched no code.
    pub needs_review: usize,
}

impl KeyStats {
    fn compute(transactions: &[Transaction], ledger: &Ledger, latest: Option<&Transaction>) -> Self {
        Self {
            transaction_count: transactions.len(),
            total_deposits: ledger.total_deposits(),
            total_withdrawals: ledger.total_withdrawals(),
            latest_balance: latest.map(|t| t.balance),
            needs_review: ledger[Party::Unspecified].count(),
        }
    }
}

/// Result of analyzing one statement.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub columns: ColumnMap,
    pub transactions: Vec<Transaction>,
    pub ledger: Ledger,
    pub latest: Option<Transaction>,
    pub settlement: SettlementBreakdown,
    pub stats: KeyStats,
}

impl Analysis {
    /// Transactions tagged with `party`, in statement order.
    pub fn transactions_for(&self, party: Party) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter().filter(move |t| t.party == party)
    }
}

/// Analyze a statement file on disk.
pub fn analyze_path(path: impl AsRef<Path>, opts: &AnalyzeOptions) -> Result<Analysis, IngestError> {
    let path = path.as_ref();
    debug!(path = %path.display(), "opening statement");
    let reader = StatementReader::open(path)?;
    analyze(reader, opts)
}

/// Analyze a statement from any byte source.
pub fn analyze_reader<R: Read>(reader: R, opts: &AnalyzeOptions) -> Result<Analysis, IngestError> {
    analyze(StatementReader::from_reader(reader), opts)
}

fn analyze<R: Read>(mut reader: StatementReader<R>, opts: &AnalyzeOptions) -> Result<Analysis, IngestError> {
    let header = reader.header()?;
    let columns = map_columns(&header)?;
    debug!(?columns, "mapped statement columns");

    let mut agg = Aggregator::new(columns, &opts.codes, opts.reference_year);
    while let Some(row) = reader.next_row()? {
        if agg.push_row(&row).is_none() {
            trace!(record = reader.records_read(), "skipping blank row");
        }
    }
    let rows = agg.len();
    let out = agg.finish(&opts.prior);

    let settlement = settle(
        &out.ledger[Party::PartyA],
        &out.ledger[Party::PartyB],
        &opts.prior,
        opts.epsilon,
    );
    let stats = KeyStats::compute(&out.transactions, &out.ledger, out.latest.as_ref());
    if [stats.total_deposits, stats.total_withdrawals]
        .iter()
        .any(|t| *t == Decimal::MAX || *t == Decimal::MIN)
    {
        warn!("statement totals reached the decimal limit; figures are saturated");
    }

    info!(
        rows,
        records = reader.records_read(),
        settled = settlement.outcome.is_settled(),
        amount = %settlement.outcome.amount(),
        "statement analyzed"
    );
    if stats.needs_review > 0 {
        warn!(
            count = stats.needs_review,
            net = %out.ledger[Party::Unspecified].net(),
            "unspecified transactions need categorizing before the settlement can be trusted"
        );
    }

    Ok(Analysis {
        columns,
        transactions: out.transactions,
        ledger: out.ledger,
        latest: out.latest,
        settlement,
        stats,
    })
}
