//! Settlement between the two partners.
//!
//! The calculation runs in two stages. First the difference in net positions
//! picks a provisional direction and a base amount (half the difference).
//! Then prior balances, which record payments already made between the
//! partners, are folded in; the sign of the result decides whether the
//! provisional direction holds, flips, or the accounts are square.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::ledger::{CategorySummary, PriorBalances};
use crate::party::Party;

/// Amounts at or below this are reported as settled.
pub const DEFAULT_EPSILON: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Who pays whom.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum Direction {
    #[serde(rename = "party-b-owes-party-a")]
    PartyBOwesPartyA,
    #[serde(rename = "party-a-owes-party-b")]
    PartyAOwesPartyB,
}

impl Direction {
    pub fn flipped(self) -> Self {
        match self {
            Direction::PartyBOwesPartyA => Direction::PartyAOwesPartyB,
            Direction::PartyAOwesPartyB => Direction::PartyBOwesPartyA,
        }
    }

    pub fn owing(self) -> Party {
        match self {
            Direction::PartyBOwesPartyA => Party::PartyB,
            Direction::PartyAOwesPartyB => Party::PartyA,
        }
    }

    pub fn receiving(self) -> Party {
        match self {
            Direction::PartyBOwesPartyA => Party::PartyA,
            Direction::PartyAOwesPartyB => Party::PartyB,
        }
    }
}

/// Stage one: direction implied by net positions alone.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(tag = "state", content = "direction", rename_all = "kebab-case")]
pub enum Provisional {
    Owes(Direction),
    /// Net positions are equal.
    Zero,
}

impl Provisional {
    fn from_difference(difference: Decimal) -> Self {
        if difference > Decimal::ZERO {
            Provisional::Owes(Direction::PartyBOwesPartyA)
        } else if difference < Decimal::ZERO {
            Provisional::Owes(Direction::PartyAOwesPartyB)
        } else {
            Provisional::Zero
        }
    }

    /// Signed amount after prior balances. Positive keeps this direction.
    fn apply_prior(self, base: Decimal, prior: &PriorBalances) -> Decimal {
        match self {
            Provisional::Owes(Direction::PartyBOwesPartyA) => {
                base.saturating_sub(prior.party_a).saturating_add(prior.party_b)
            }
            Provisional::Owes(Direction::PartyAOwesPartyB) => {
                base.saturating_sub(prior.party_b).saturating_add(prior.party_a)
            }
            Provisional::Zero => (-prior.party_a).saturating_sub(prior.party_b),
        }
    }

    /// Stage two: resolve the signed amount into a final outcome.
    fn resolve(self, signed: Decimal, epsilon: Decimal) -> Settlement {
        let direction = match self {
            Provisional::Owes(direction) if signed > Decimal::ZERO => Some(direction),
            Provisional::Owes(direction) if signed < Decimal::ZERO => Some(direction.flipped()),
            Provisional::Owes(_) => None,
            // No direction to keep; only a negative amount flips into one.
            Provisional::Zero if signed < Decimal::ZERO => Some(Direction::PartyBOwesPartyA),
            Provisional::Zero => None,
        };

        let amount = signed.abs();
        match direction {
            Some(direction) if amount > epsilon => Settlement::Owes {
                owing: direction.owing(),
                receiving: direction.receiving(),
                amount,
            },
            _ => Settlement::Settled,
        }
    }
}

/// Final answer: who pays whom how much, or nothing is owed.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum Settlement {
    Owes {
        owing: Party,
        receiving: Party,
        amount: Decimal,
    },
    Settled,
}

impl Settlement {
    /// Amount to transfer; zero when settled.
    pub fn amount(&self) -> Decimal {
        match self {
            Settlement::Owes { amount, .. } => *amount,
            Settlement::Settled => Decimal::ZERO,
        }
    }

    pub fn owing_party(&self) -> Option<Party> {
        match self {
            Settlement::Owes { owing, .. } => Some(*owing),
            Settlement::Settled => None,
        }
    }

    pub fn is_settled(&self) -> bool {
        matches!(self, Settlement::Settled)
    }
}

/// Every intermediate value of the calculation, for display and auditing.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct SettlementBreakdown {
    pub difference: Decimal,
    pub base_settlement: Decimal,
    pub provisional: Provisional,
    /// Settlement after prior balances, before the sign is resolved.
    pub signed_settlement: Decimal,
    pub prior_party_a: Decimal,
    pub prior_party_b: Decimal,
    pub outcome: Settlement,
}

/// Work out the settlement between the partners.
///
/// Only the partners' prior balances take part; the shared one is display-only.
/// Arithmetic saturates rather than overflowing.
pub fn settle(
    party_a: &CategorySummary,
    party_b: &CategorySummary,
    prior: &PriorBalances,
    epsilon: Decimal,
) -> SettlementBreakdown {
    let difference = party_b.net().saturating_sub(party_a.net());
    let base_settlement = difference.abs() / Decimal::TWO;

    let provisional = Provisional::from_difference(difference);
    let signed_settlement = provisional.apply_prior(base_settlement, prior);
    let outcome = provisional.resolve(signed_settlement, epsilon);

    SettlementBreakdown {
        difference,
        base_settlement,
        provisional,
        signed_settlement,
        prior_party_a: prior.party_a,
        prior_party_b: prior.party_b,
        outcome,
    }
}
