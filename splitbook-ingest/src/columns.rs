//! Header discovery: figure out which column holds which field.
//!
//! Bank exports name their columns inconsistently ("Value Date",
//! "Transaction Remarks", "Withdrawal Amount (INR)"), so matching is by
//! case-insensitive substring with a fixed precedence per header cell.

use serde::Serialize;
use std::fmt;

use crate::error::IngestError;

/// Semantic fields a statement column can map to.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    ValueDate,
    TransactionDate,
    Remarks,
    Withdrawal,
    Deposit,
    Balance,
    Party,
}

impl Field {
    /// Fields that must be present, in the order they are checked.
    pub const REQUIRED: [Field; 5] = [
        Field::Remarks,
        Field::Withdrawal,
        Field::Deposit,
        Field::Party,
        Field::Balance,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::ValueDate => "value_date",
            Field::TransactionDate => "transaction_date",
            Field::Remarks => "remarks",
            Field::Withdrawal => "withdrawal",
            Field::Deposit => "deposit",
            Field::Balance => "balance",
            Field::Party => "party",
        }
    }

    /// Classify one header cell. First matching rule wins.
    pub fn classify(header: &str) -> Option<Field> {
        let h = header.trim().trim_start_matches('\u{feff}').trim().to_lowercase();

        if h.contains("value date") {
            Some(Field::ValueDate)
        } else if h.contains("transaction date") && !h.contains("posted") {
            Some(Field::TransactionDate)
        } else if h.contains("transaction remarks") || h.contains("description") {
            Some(Field::Remarks)
        } else if h.contains("withdrawal") {
            Some(Field::Withdrawal)
        } else if h.contains("deposit") {
            Some(Field::Deposit)
        } else if h.contains("balance") && !h.contains("closing") {
            Some(Field::Balance)
        } else if h == "who" {
            Some(Field::Party)
        } else {
            None
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Column positions for every discovered field.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct ColumnMap {
    pub value_date: Option<usize>,
    pub transaction_date: Option<usize>,
    pub remarks: usize,
    pub withdrawal: usize,
    pub deposit: usize,
    pub balance: usize,
    pub party: usize,
}

impl ColumnMap {
    /// Trimmed cell at `index`, or "" if the row is shorter than that.
    pub fn cell<'a, S: AsRef<str>>(row: &'a [S], index: usize) -> &'a str {
        row.get(index).map(|c| c.as_ref().trim()).unwrap_or("")
    }

    /// Date text for a row: value date if that column exists in the row,
    /// else transaction date, else empty.
    pub fn date<'a, S: AsRef<str>>(&self, row: &'a [S]) -> &'a str {
        let value_date = self.value_date.filter(|&i| i < row.len());
        let transaction_date = self.transaction_date.filter(|&i| i < row.len());
        match value_date.or(transaction_date) {
            Some(i) => Self::cell(row, i),
            None => "",
        }
    }
}

/// Build the column map from a header row.
///
/// A field matched by more than one header cell takes the last one.
pub fn map_columns<S: AsRef<str>>(header: &[S]) -> Result<ColumnMap, IngestError> {
    if header.iter().all(|c| c.as_ref().trim().trim_start_matches('\u{feff}').is_empty()) {
        return Err(IngestError::EmptyHeader);
    }

    let mut found: [Option<usize>; 7] = [None; 7];
    for (index, cell) in header.iter().enumerate() {
        if let Some(field) = Field::classify(cell.as_ref()) {
            found[slot(field)] = Some(index);
        }
    }

    for field in Field::REQUIRED {
        if found[slot(field)].is_none() {
            return Err(IngestError::MissingColumn(field));
        }
    }

    let required = |field: Field| found[slot(field)].ok_or(IngestError::MissingColumn(field));

    Ok(ColumnMap {
        value_date: found[slot(Field::ValueDate)],
        transaction_date: found[slot(Field::TransactionDate)],
        remarks: required(Field::Remarks)?,
        withdrawal: required(Field::Withdrawal)?,
        deposit: required(Field::Deposit)?,
        balance: required(Field::Balance)?,
        party: required(Field::Party)?,
    })
}

fn slot(field: Field) -> usize {
    match field {
        Field::ValueDate => 0,
        Field::TransactionDate => 1,
        Field::Remarks => 2,
        Field::Withdrawal => 3,
        Field::Deposit => 4,
        Field::Balance => 5,
        Field::Party => 6,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bank_export_header() {
        let header = [
            "S No.",
            "Value Date",
            "Transaction Date",
            "Cheque Number",
            "Transaction Remarks",
            "Withdrawal Amount (INR )",
            "Deposit Amount (INR )",
            "Balance (INR )",
            "Who",
        ];
        let map = map_columns(&header).unwrap();
        assert_eq!(map.value_date, Some(1));
        assert_eq!(map.transaction_date, Some(2));
        assert_eq!(map.remarks, 4);
        assert_eq!(map.withdrawal, 5);
        assert_eq!(map.deposit, 6);
        assert_eq!(map.balance, 7);
        assert_eq!(map.party, 8);
    }

    #[test]
    fn test_precedence_and_exclusions() {
        assert_eq!(Field::classify("Posted Transaction Date"), None);
        assert_eq!(Field::classify("Closing Balance"), None);
        assert_eq!(Field::classify("  DESCRIPTION "), Some(Field::Remarks));
        // "value date" is checked before "balance"
        assert_eq!(Field::classify("Balance Value Date"), Some(Field::ValueDate));
        assert_eq!(Field::classify("Who paid"), None);
        assert_eq!(Field::classify(" who "), Some(Field::Party));
        assert_eq!(Field::classify("\u{feff}Description"), Some(Field::Remarks));
    }

    #[test]
    fn test_dates_are_optional() {
        let map = map_columns(&["Description", "Withdrawal", "Deposit", "Balance", "Who"]).unwrap();
        assert_eq!(map.value_date, None);
        assert_eq!(map.transaction_date, None);
        assert_eq!(map.date(&["a", "1", "2", "3", "NB"]), "");
    }

    #[test]
    fn test_missing_deposit() {
        let err = map_columns(&["Date", "Description", "Withdrawal", "Balance", "Who"]).unwrap_err();
        assert!(matches!(err, IngestError::MissingColumn(Field::Deposit)));
        assert_eq!(err.to_string(), "required column 'deposit' not found in CSV");
    }

    #[test]
    fn test_missing_fields_reported_in_check_order() {
        let err = map_columns(&["Balance"]).unwrap_err();
        assert!(matches!(err, IngestError::MissingColumn(Field::Remarks)));
        let err = map_columns(&["Description", "Withdrawal", "Deposit", "Balance"]).unwrap_err();
        assert!(matches!(err, IngestError::MissingColumn(Field::Party)));
    }

    #[test]
    fn test_blank_header_is_empty() {
        let err = map_columns(&["", "  "]).unwrap_err();
        assert!(matches!(err, IngestError::EmptyHeader));
        let none: [&str; 0] = [];
        assert!(matches!(map_columns(&none), Err(IngestError::EmptyHeader)));
    }

    #[test]
    fn test_later_duplicate_wins() {
        let map =
            map_columns(&["Description", "Withdrawal", "Deposit", "Balance", "Who", "Available Balance"])
                .unwrap();
        assert_eq!(map.balance, 5);
    }

    #[test]
    fn test_date_prefers_value_date() {
        let map = map_columns(&[
            "Value Date",
            "Transaction Date",
            "Description",
            "Withdrawal",
            "Deposit",
            "Balance",
            "Who",
        ])
        .unwrap();
        assert_eq!(map.date(&["01/02/2026", "01/01/2026", "x"]), "01/02/2026");
        // value date column present but blank: no fallback
        assert_eq!(map.date(&["", "01/01/2026", "x"]), "");
        // row too short to hold value date: nothing to fall back to either
        assert_eq!(map.date(&[] as &[&str]), "");
    }

    #[test]
    fn test_short_row_cells_are_empty() {
        let row = ["only"];
        assert_eq!(ColumnMap::cell(&row, 0), "only");
        assert_eq!(ColumnMap::cell(&row, 4), "");
    }
}
