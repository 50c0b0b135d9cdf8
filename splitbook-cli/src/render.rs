//! Plain-text rendering of an analysis.

use num_format::{Locale, ToFormattedString};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use splitbook_core::{Direction, Party, PartyCodes, PriorBalances, Provisional, Settlement, Transaction};
use splitbook_finance::Analysis;
use std::io::{self, Write};

/// `₹1,234.50` style: two decimals (half away from zero) and `,` grouping.
pub fn format_currency(amount: Decimal, symbol: &str) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    let abs = rounded.abs();
    let whole = abs.trunc();
    let cents = ((abs - whole) * Decimal::ONE_HUNDRED).to_u32().unwrap_or(0);
    let whole = whole.to_u128().unwrap_or(0).to_formatted_string(&Locale::en);
    format!("{sign}{symbol}{whole}.{cents:02}")
}

pub fn format_bytes(bytes: u64) -> String {
    if bytes >= 1_048_576 {
        format!("{:.2} MB", bytes as f64 / 1_048_576.0)
    } else if bytes >= 1024 {
        format!("{:.2} KB", bytes as f64 / 1024.0)
    } else {
        format!("{bytes} bytes")
    }
}

/// What to show besides the analysis itself.
pub struct View<'a> {
    pub file_name: &'a str,
    pub file_size: u64,
    pub codes: &'a PartyCodes,
    pub currency_symbol: &'a str,
    /// Restrict the transaction list to one category
    pub filter: Option<Party>,
    pub limit: Option<usize>,
}

impl View<'_> {
    fn money(&self, amount: Decimal) -> String {
        format_currency(amount, self.currency_symbol)
    }

    fn label(&self, party: Party) -> &str {
        self.codes.label(party)
    }
}

pub fn render_report(out: &mut impl Write, a: &Analysis, view: &View) -> io::Result<()> {
    writeln!(
        out,
        "File: {} ({}), {} transactions\n",
        view.file_name,
        format_bytes(view.file_size),
        a.transactions.len()
    )?;
    render_key_stats(out, a, view)?;
    render_settlement(out, a, view)?;
    render_summaries(out, a, view)?;
    render_transactions(out, a, view)?;
    Ok(())
}

fn render_key_stats(out: &mut impl Write, a: &Analysis, view: &View) -> io::Result<()> {
    let s = &a.stats;
    writeln!(out, "## Key statistics\n")?;
    writeln!(out, "Total transactions: {}", s.transaction_count)?;
    writeln!(out, "Total deposits:     {}", view.money(s.total_deposits))?;
    writeln!(out, "Total withdrawals:  {}", view.money(s.total_withdrawals))?;
    let latest = s.latest_balance.map(|b| view.money(b)).unwrap_or_else(|| "-".to_string());
    writeln!(out, "Latest balance:     {latest}")?;
    if s.needs_review > 0 {
        writeln!(out, "Needs review:       {}", s.needs_review)?;
    }
    writeln!(out)
}

fn render_settlement(out: &mut impl Write, a: &Analysis, view: &View) -> io::Result<()> {
    let (pa, pb) = (Party::PartyA, Party::PartyB);
    writeln!(out, "## Partnership settlement\n")?;
    for party in [pa, pb] {
        let s = &a.ledger[party];
        writeln!(
            out,
            "{} net: {} ({} transactions)",
            view.label(party),
            view.money(s.net()),
            s.count()
        )?;
    }
    writeln!(out)?;

    match a.settlement.outcome {
        Settlement::Owes { owing, receiving, amount } => {
            writeln!(out, "{} owes {} {}", view.label(owing), view.label(receiving), view.money(amount))?;
            writeln!(
                out,
                "{} should pay this amount to {} to settle accounts",
                view.label(owing),
                view.label(receiving)
            )?;
        }
        Settlement::Settled => writeln!(out, "Accounts are settled! No money owed.")?,
    }

    let prior = PriorBalances::new(a.settlement.prior_party_a, a.settlement.prior_party_b, Decimal::ZERO);
    if prior.any_partner_nonzero() {
        render_prior_applied(out, a, view, &prior)?;
    }

    let unspecified = &a.ledger[Party::Unspecified];
    if unspecified.count() > 0 {
        writeln!(
            out,
            "\nNote: {} unspecified transaction(s) totaling {} need to be categorized for accurate settlement calculation.",
            unspecified.count(),
            view.money(unspecified.net())
        )?;
    }
    writeln!(out)
}

fn render_prior_applied(out: &mut impl Write, a: &Analysis, view: &View, prior: &PriorBalances) -> io::Result<()> {
    let (a_code, b_code) = (view.label(Party::PartyA), view.label(Party::PartyB));
    writeln!(out, "\nPrevious balance applied:")?;

    if !prior.party_a.is_zero() {
        let who = if prior.party_a > Decimal::ZERO {
            format!("{b_code} already paid {a_code} this amount")
        } else {
            format!("{a_code} already paid {b_code} this amount")
        };
        writeln!(out, "  - {a_code} previous balance: {} ({who})", view.money(prior.party_a))?;
    }
    if !prior.party_b.is_zero() {
        let who = if prior.party_b > Decimal::ZERO {
            format!("{a_code} already paid {b_code} this amount")
        } else {
            format!("{b_code} already paid {a_code} this amount")
        };
        writeln!(out, "  - {b_code} previous balance: {} ({who})", view.money(prior.party_b))?;
    }

    let s = &a.settlement;
    let (sign_a, sign_b) = match s.provisional {
        Provisional::Owes(Direction::PartyBOwesPartyA) => (Decimal::NEGATIVE_ONE, Decimal::ONE),
        Provisional::Owes(Direction::PartyAOwesPartyB) => (Decimal::ONE, Decimal::NEGATIVE_ONE),
        Provisional::Zero => (Decimal::NEGATIVE_ONE, Decimal::NEGATIVE_ONE),
    };
    let mut calc = format!("  Calculation: base settlement of {}", view.money(s.base_settlement));
    for term in [sign_a * prior.party_a, sign_b * prior.party_b] {
        if term < Decimal::ZERO {
            calc.push_str(&format!(" - {} (already paid)", view.money(term.abs())));
        } else if term > Decimal::ZERO {
            calc.push_str(&format!(" + {} (owed back)", view.money(term)));
        }
    }
    calc.push_str(&format!(" = {}", view.money(s.outcome.amount())));
    writeln!(out, "{calc}")
}

fn render_summaries(out: &mut impl Write, a: &Analysis, view: &View) -> io::Result<()> {
    writeln!(out, "## Financial summary by category\n")?;
    for (party, s) in a.ledger.iter() {
        match party {
            Party::Shared => writeln!(out, "[{}] common (split 50-50 between partners)", view.label(party))?,
            Party::Unspecified => writeln!(out, "[{}] needs review", view.label(party))?,
            _ => writeln!(out, "[{}] partner", view.label(party))?,
        }
        writeln!(out, "  Total deposits:    {}", view.money(s.total_deposits()))?;
        writeln!(out, "  Total withdrawals: {}", view.money(s.total_withdrawals()))?;
        writeln!(out, "  Transactions:      {}", s.count())?;
        if party != Party::Shared {
            writeln!(out, "  Net amount:        {}", view.money(s.net()))?;
        }
        if !s.prior_balance().is_zero() {
            writeln!(out, "  Previous balance:  {}", view.money(s.prior_balance()))?;
        }
    }
    writeln!(out)
}

fn render_transactions(out: &mut impl Write, a: &Analysis, view: &View) -> io::Result<()> {
    let shown: Vec<&Transaction> = match view.filter {
        Some(party) => a.transactions_for(party).collect(),
        None => a.transactions.iter().collect(),
    };
    let heading = view.filter.map(|p| view.label(p)).unwrap_or("all");
    writeln!(out, "## Transactions ({heading}: {})\n", shown.len())?;

    for t in shown.iter().take(view.limit.unwrap_or(usize::MAX)) {
        let date = if t.date.is_empty() { "-" } else { t.date.as_str() };
        writeln!(
            out,
            "{:<12} {:<40} {:>14} {:>14} {:>14}  {}",
            date,
            truncate(&t.remarks, 40),
            view.money(t.withdrawal),
            view.money(t.deposit),
            view.money(t.balance),
            view.label(t.party)
        )?;
    }
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut cut: String = s.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use splitbook_finance::{AnalyzeOptions, analyze_reader};

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(dec!(1234.5), "₹"), "₹1,234.50");
        assert_eq!(format_currency(dec!(0), "₹"), "₹0.00");
        assert_eq!(format_currency(dec!(-43740.5), "$"), "-$43,740.50");
        assert_eq!(format_currency(dec!(0.005), "$"), "$0.01");
        assert_eq!(format_currency(dec!(1000000), ""), "1,000,000.00");
        assert_eq!(format_currency(dec!(-0.001), "$"), "$0.00");
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 bytes");
        assert_eq!(format_bytes(2048), "2.00 KB");
        assert_eq!(format_bytes(3 * 1_048_576), "3.00 MB");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
    }

    fn render(csv: &str, prior: PriorBalances, filter: Option<Party>) -> String {
        let opts = AnalyzeOptions {
            prior,
            reference_year: 2026,
            ..AnalyzeOptions::default()
        };
        let a = analyze_reader(csv.as_bytes(), &opts).unwrap();
        let codes = PartyCodes::default();
        let view = View {
            file_name: "test.csv",
            file_size: csv.len() as u64,
            codes: &codes,
            currency_symbol: "₹",
            filter,
            limit: None,
        };
        let mut buf = Vec::new();
        render_report(&mut buf, &a, &view).unwrap();
        String::from_utf8(buf).unwrap()
    }

    const CSV: &str = "Description,Withdrawal,Deposit,Balance,Who\nx,100,0,900,NB\ny,0,50,950,NS\nz,10,0,940,\n";

    #[test]
    fn test_report_sections() {
        let text = render(CSV, PriorBalances::default(), None);
        assert!(text.contains("NB owes NS ₹75.00"));
        assert!(text.contains("NB should pay this amount to NS to settle accounts"));
        assert!(text.contains("Needs review:       1"));
        assert!(text.contains("1 unspecified transaction(s) totaling ₹10.00"));
        assert!(text.contains("## Transactions (all: 3)"));
        assert!(!text.contains("Previous balance applied"));
    }

    #[test]
    fn test_report_with_prior_balance() {
        let prior = PriorBalances::new(dec!(0), dec!(25), dec!(0));
        let text = render(CSV, prior, None);
        assert!(text.contains("Previous balance applied:"));
        assert!(text.contains("NS previous balance: ₹25.00 (NB already paid NS this amount)"));
        assert!(text.contains("base settlement of ₹75.00 - ₹25.00 (already paid) = ₹50.00"));
        assert!(text.contains("NB owes NS ₹50.00"));
    }

    #[test]
    fn test_calculation_ends_on_amount_owed() {
        // base 75 owed to NS, but NB already paid NS 100: NS now owes NB 25
        let prior = PriorBalances::new(dec!(0), dec!(100), dec!(0));
        let text = render(CSV, prior, None);
        assert!(text.contains("NS owes NB ₹25.00"));
        assert!(text.contains("base settlement of ₹75.00 - ₹100.00 (already paid) = ₹25.00"));
        assert!(!text.contains("-₹25.00"));
    }

    #[test]
    fn test_report_filtered() {
        let text = render(CSV, PriorBalances::default(), Some(Party::PartyB));
        assert!(text.contains("## Transactions (NS: 1)"));
    }

    #[test]
    fn test_report_settled() {
        let text = render("Description,Withdrawal,Deposit,Balance,Who\n,,,,\n", PriorBalances::default(), None);
        assert!(text.contains("Accounts are settled! No money owed."));
        assert!(text.contains("Latest balance:     -"));
    }
}
