//! Party tags and the short codes that identify them in a statement's "Who" column.

use serde::{Deserialize, Serialize};

/// The fixed set of categories every transaction is classified into.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Party {
    #[serde(rename = "party-a")]
    PartyA,
    #[serde(rename = "party-b")]
    PartyB,
    /// Joint expenses/income, split 50/50 between the two partners.
    #[serde(rename = "shared")]
    Shared,
    /// Label did not match any known code; needs manual review.
    #[serde(rename = "unspecified")]
    Unspecified,
}

impl Party {
    /// All categories, in ledger order.
    pub const ALL: [Party; 4] = [Party::PartyA, Party::PartyB, Party::Shared, Party::Unspecified];

    /// Position of this category inside a [`crate::Ledger`].
    pub fn index(self) -> usize {
        match self {
            Party::PartyA => 0,
            Party::PartyB => 1,
            Party::Shared => 2,
            Party::Unspecified => 3,
        }
    }

    /// The other partner. Only meaningful for the two named parties.
    pub fn counterparty(self) -> Option<Party> {
        match self {
            Party::PartyA => Some(Party::PartyB),
            Party::PartyB => Some(Party::PartyA),
            Party::Shared | Party::Unspecified => None,
        }
    }

    pub fn is_partner(self) -> bool {
        matches!(self, Party::PartyA | Party::PartyB)
    }
}

/// Short codes used in the statement plus the display label for unmatched rows.
///
/// Codes are compared trimmed and uppercased, so `nb` in a config matches `NB` in a statement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PartyCodes {
    pub party_a: String,
    pub party_b: String,
    pub shared: String,
    pub unspecified: String,
}

impl Default for PartyCodes {
    fn default() -> Self {
        Self {
            party_a: "NB".to_string(),
            party_b: "NS".to_string(),
            shared: "C".to_string(),
            unspecified: "Unspecified".to_string(),
        }
    }
}

impl PartyCodes {
    pub fn new(
        party_a: impl Into<String>,
        party_b: impl Into<String>,
        shared: impl Into<String>,
    ) -> Self {
        Self {
            party_a: party_a.into().trim().to_uppercase(),
            party_b: party_b.into().trim().to_uppercase(),
            shared: shared.into().trim().to_uppercase(),
            ..Self::default()
        }
    }

    /// Human-readable label for a category.
    pub fn label(&self, party: Party) -> &str {
        match party {
            Party::PartyA => &self.party_a,
            Party::PartyB => &self.party_b,
            Party::Shared => &self.shared,
            Party::Unspecified => &self.unspecified,
        }
    }

    /// Reverse lookup of an already-normalized (trimmed, uppercased) code.
    pub fn party_for_code(&self, code: &str) -> Option<Party> {
        if code.is_empty() {
            return None;
        }
        let hit = |configured: &str| code == configured.trim().to_uppercase();
        if hit(&self.party_a) {
            Some(Party::PartyA)
        } else if hit(&self.party_b) {
            Some(Party::PartyB)
        } else if hit(&self.shared) {
            Some(Party::Shared)
        } else {
            None
        }
    }
}
