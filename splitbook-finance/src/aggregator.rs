//! Row classifier and aggregator: turns raw statement rows into typed
//! transactions, per-party totals and the latest-transaction pointer.

use splitbook_core::{Ledger, PartyCodes, PriorBalances, RecencyTracker, Transaction};
use splitbook_ingest::{ColumnMap, normalize_party, parse_amount};

/// Everything accumulated over one pass of the rows.
#[derive(Debug, Clone)]
pub struct Aggregate {
    pub transactions: Vec<Transaction>,
    pub ledger: Ledger,
    pub latest: Option<Transaction>,
}

/// Single-pass accumulator; feed rows in input order, then call [`Aggregator::finish`].
pub struct Aggregator<'a> {
    columns: ColumnMap,
    codes: &'a PartyCodes,
    transactions: Vec<Transaction>,
    ledger: Ledger,
    recency: RecencyTracker,
}

impl<'a> Aggregator<'a> {
    pub fn new(columns: ColumnMap, codes: &'a PartyCodes, reference_year: i32) -> Self {
        Self {
            columns,
            codes,
            transactions: Vec::new(),
            ledger: Ledger::new(),
            recency: RecencyTracker::new(reference_year),
        }
    }

    /// Classify and record one data row. Returns `None` for blank rows.
    pub fn push_row<S: AsRef<str>>(&mut self, row: &[S]) -> Option<&Transaction> {
        if row.iter().all(|c| c.as_ref().trim().is_empty()) {
            return None;
        }

        let cols = &self.columns;
        let txn = Transaction::new(
            cols.date(row),
            ColumnMap::cell(row, cols.remarks),
            parse_amount(ColumnMap::cell(row, cols.withdrawal)),
            parse_amount(ColumnMap::cell(row, cols.deposit)),
            parse_amount(ColumnMap::cell(row, cols.balance)),
            normalize_party(ColumnMap::cell(row, cols.party), self.codes),
        );

        let index = self.transactions.len();
        self.recency.observe(index, &txn.date);
        self.ledger.record(&txn);
        self.transactions.push(txn);
        self.transactions.last()
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Close the pass: stamp prior balances and resolve the latest row.
    pub fn finish(mut self, prior: &PriorBalances) -> Aggregate {
        self.ledger.apply_prior_balances(prior);
        let latest = self
            .recency
            .latest_index()
            .and_then(|i| self.transactions.get(i))
            .cloned();

        Aggregate {
            transactions: self.transactions,
            ledger: self.ledger,
            latest,
        }
    }
}
