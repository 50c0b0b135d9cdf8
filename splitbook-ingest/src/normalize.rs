//! Cell normalization. Both functions are total: bad input degrades, never fails.

use rust_decimal::Decimal;
use splitbook_core::{Party, PartyCodes};
use std::str::FromStr;

/// Parse an amount cell like "1,234.50".
///
/// Empty, "nan" (any case) and "-" are zero, as is anything that still does
/// not parse once thousands separators are removed.
pub fn parse_amount(text: &str) -> Decimal {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") || trimmed == "-" {
        return Decimal::ZERO;
    }

    let cleaned = trimmed.replace(',', "");
    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .unwrap_or(Decimal::ZERO)
}

/// Map a "Who" cell to a party by exact (trimmed, uppercased) code match.
pub fn normalize_party(text: &str, codes: &PartyCodes) -> Party {
    let code = text.trim().to_uppercase();
    codes.party_for_code(&code).unwrap_or(Party::Unspecified)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_amount_zero_markers() {
        for s in ["", "   ", "nan", "NaN", "NAN", "-", " - "] {
            assert_eq!(parse_amount(s), Decimal::ZERO, "input {s:?}");
        }
    }

    #[test]
    fn test_parse_amount_thousands() {
        assert_eq!(parse_amount("1,234.50"), dec!(1234.50));
        assert_eq!(parse_amount(" 12,34,567.00 "), dec!(1234567));
        assert_eq!(parse_amount("100"), dec!(100));
        assert_eq!(parse_amount("0.5"), dec!(0.5));
    }

    #[test]
    fn test_parse_amount_scientific() {
        assert_eq!(parse_amount("1e3"), dec!(1000));
    }

    #[test]
    fn test_parse_amount_garbage_is_zero() {
        for s in ["abc", "₹100", "12..5", "--", "1,2,3x"] {
            assert_eq!(parse_amount(s), Decimal::ZERO, "input {s:?}");
        }
    }

    #[test]
    fn test_normalize_party_default_codes() {
        let codes = PartyCodes::default();
        assert_eq!(normalize_party("NB", &codes), Party::PartyA);
        assert_eq!(normalize_party(" ns ", &codes), Party::PartyB);
        assert_eq!(normalize_party("c", &codes), Party::Shared);
        assert_eq!(normalize_party("", &codes), Party::Unspecified);
        assert_eq!(normalize_party("NB/NS", &codes), Party::Unspecified);
        assert_eq!(normalize_party("Common", &codes), Party::Unspecified);
    }

    #[test]
    fn test_normalize_party_custom_codes() {
        let codes = PartyCodes::new("AL", "BO", "J");
        assert_eq!(normalize_party("al", &codes), Party::PartyA);
        assert_eq!(normalize_party("NB", &codes), Party::Unspecified);
        assert_eq!(normalize_party("j", &codes), Party::Shared);
    }
}
