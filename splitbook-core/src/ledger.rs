//! Transaction records and per-category running totals

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::ops::Index;

use crate::party::Party;

/// One classified statement row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    /// Raw date text as it appeared in the statement (may be empty)
    pub date: String,
    pub remarks: String,
    pub withdrawal: Decimal,
    pub deposit: Decimal,
    /// Running account balance reported by the bank
    pub balance: Decimal,
    pub party: Party,
}

impl Transaction {
    pub fn new(
        date: impl Into<String>,
        remarks: impl Into<String>,
        withdrawal: Decimal,
        deposit: Decimal,
        balance: Decimal,
        party: Party,
    ) -> Self {
        Self {
            date: date.into(),
            remarks: remarks.into(),
            withdrawal,
            deposit,
            balance,
            party,
        }
    }
}

/// Running totals for one category.
///
/// `net` is private and refreshed on every mutation of the totals. All
/// arithmetic saturates at `Decimal::MAX`/`Decimal::MIN` instead of panicking.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct CategorySummary {
    total_deposits: Decimal,
    total_withdrawals: Decimal,
    net: Decimal,
    count: usize,
    prior_balance: Decimal,
}

impl CategorySummary {
    pub fn total_deposits(&self) -> Decimal {
        self.total_deposits
    }

    pub fn total_withdrawals(&self) -> Decimal {
        self.total_withdrawals
    }

    /// Withdrawals minus deposits. Positive means the party took out more than it put in.
    pub fn net(&self) -> Decimal {
        self.net
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn prior_balance(&self) -> Decimal {
        self.prior_balance
    }

    /// Fold amounts into the totals without touching the row count.
    pub fn add_amounts(&mut self, deposit: Decimal, withdrawal: Decimal) {
        self.total_deposits = self.total_deposits.saturating_add(deposit);
        self.total_withdrawals = self.total_withdrawals.saturating_add(withdrawal);
        self.refresh_net();
    }

    pub fn increment_count(&mut self) {
        self.count += 1;
    }

    fn refresh_net(&mut self) {
        self.net = self.total_withdrawals.saturating_sub(self.total_deposits);
    }
}

/// Carry-forward amounts from before this statement, supplied by the caller.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PriorBalances {
    pub party_a: Decimal,
    pub party_b: Decimal,
    /// Display-only; never used in settlement.
    pub shared: Decimal,
}

impl PriorBalances {
    pub fn new(party_a: Decimal, party_b: Decimal, shared: Decimal) -> Self {
        Self {
            party_a,
            party_b,
            shared,
        }
    }

    pub fn for_party(&self, party: Party) -> Decimal {
        match party {
            Party::PartyA => self.party_a,
            Party::PartyB => self.party_b,
            Party::Shared => self.shared,
            Party::Unspecified => Decimal::ZERO,
        }
    }

    pub fn any_partner_nonzero(&self) -> bool {
        !self.party_a.is_zero() || !self.party_b.is_zero()
    }
}

/// The four category summaries, indexed by [`Party`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    categories: [CategorySummary; 4],
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one classified transaction to the totals.
    ///
    /// Shared rows are split evenly into both partners; the shared bucket only counts them.
    pub fn record(&mut self, txn: &Transaction) {
        match txn.party {
            Party::Shared => {
                let two = Decimal::TWO;
                let half_deposit = txn.deposit / two;
                let half_withdrawal = txn.withdrawal / two;
                self.categories[Party::PartyA.index()].add_amounts(half_deposit, half_withdrawal);
                self.categories[Party::PartyB.index()].add_amounts(half_deposit, half_withdrawal);
                self.categories[Party::Shared.index()].increment_count();
            }
            party => {
                let summary = &mut self.categories[party.index()];
                summary.add_amounts(txn.deposit, txn.withdrawal);
                summary.increment_count();
            }
        }
    }

    /// Stamp the caller-supplied prior balances. Does not affect `net`.
    pub fn apply_prior_balances(&mut self, prior: &PriorBalances) {
        for party in Party::ALL {
            let summary = &mut self.categories[party.index()];
            summary.refresh_net();
            summary.prior_balance = prior.for_party(party);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Party, &CategorySummary)> {
        Party::ALL.into_iter().map(move |p| (p, &self.categories[p.index()]))
    }

    /// Sum of deposits across all four categories.
    pub fn total_deposits(&self) -> Decimal {
        self.categories
            .iter()
            .map(CategorySummary::total_deposits)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// Sum of withdrawals across all four categories.
    pub fn total_withdrawals(&self) -> Decimal {
        self.categories
            .iter()
            .map(CategorySummary::total_withdrawals)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    pub fn total_count(&self) -> usize {
        self.categories.iter().map(CategorySummary::count).sum()
    }
}

impl Index<Party> for Ledger {
    type Output = CategorySummary;

    fn index(&self, party: Party) -> &CategorySummary {
        &self.categories[party.index()]
    }
}

impl Serialize for Ledger {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(Party::ALL.len()))?;
        for (party, summary) in self.iter() {
            map.serialize_entry(&party, summary)?;
        }
        map.end()
    }
}
