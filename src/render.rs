//! Plain-text rendering of reports

use ledgerview_config::CurrencyConfig;
use ledgerview_core::{BalanceSheet, IncomeStatement, IntegrityWarning, StatementLine, TrialBalance};
use ledgerview_utils::format_amount;
use rust_decimal::Decimal;
use std::fmt::Write;

const NAME_WIDTH: usize = 44;
const AMOUNT_WIDTH: usize = 20;

/// Formats report tables using the configured currency settings
pub struct TableRenderer<'a> {
    currency: &'a CurrencyConfig,
}

impl<'a> TableRenderer<'a> {
    pub fn new(currency: &'a CurrencyConfig) -> Self {
        Self { currency }
    }

    fn amount(&self, amount: Decimal) -> String {
        format_amount(
            amount,
            self.currency.decimal_places,
            &self.currency.thousands_separator,
            &self.currency.decimal_separator,
        )
    }

    fn label(code: &str, name: &str, level: usize) -> String {
        let indent = "  ".repeat(level.saturating_sub(1));
        format!("{}{} {}", indent, code, name)
    }

    fn rule(out: &mut String, columns: usize) {
        let _ = writeln!(out, "{}", "-".repeat(NAME_WIDTH + columns * (AMOUNT_WIDTH + 1)));
    }

    fn section(&self, out: &mut String, title: &str, lines: &[StatementLine], total: Decimal) {
        let _ = writeln!(out, "{}", title);
        for line in lines {
            let _ = writeln!(
                out,
                "{:<w$} {:>a$}",
                Self::label(&line.code, &line.name, line.level),
                self.amount(line.balance),
                w = NAME_WIDTH,
                a = AMOUNT_WIDTH,
            );
        }
        self.total(out, &format!("Total {}", title), total);
        out.push('\n');
    }

    fn total(&self, out: &mut String, label: &str, amount: Decimal) {
        let _ = writeln!(
            out,
            "{:<w$} {:>a$}",
            label,
            self.amount(amount),
            w = NAME_WIDTH,
            a = AMOUNT_WIDTH,
        );
    }

    pub fn trial_balance(&self, report: &TrialBalance, period: &str) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Trial Balance ({}) - {}", self.currency.code, period);
        Self::rule(&mut out, 2);
        let _ = writeln!(
            out,
            "{:<w$} {:>a$} {:>a$}",
            "Account",
            "Debit",
            "Credit",
            w = NAME_WIDTH,
            a = AMOUNT_WIDTH,
        );
        Self::rule(&mut out, 2);
        for row in &report.rows {
            let _ = writeln!(
                out,
                "{:<w$} {:>a$} {:>a$}",
                Self::label(&row.code, &row.name, row.level),
                self.amount(row.debit),
                self.amount(row.credit),
                w = NAME_WIDTH,
                a = AMOUNT_WIDTH,
            );
        }
        Self::rule(&mut out, 2);
        let _ = writeln!(
            out,
            "{:<w$} {:>a$} {:>a$}",
            "Total",
            self.amount(report.total_debit),
            self.amount(report.total_credit),
            w = NAME_WIDTH,
            a = AMOUNT_WIDTH,
        );
        out
    }

    pub fn income_statement(&self, report: &IncomeStatement, period: &str) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Income Statement ({}) - {}", self.currency.code, period);
        Self::rule(&mut out, 1);
        self.section(&mut out, "Revenues", &report.revenues, report.total_revenues);
        self.section(&mut out, "Cost of Sales", &report.cogs, report.total_cogs);
        self.total(&mut out, "Gross Profit", report.gross_profit);
        out.push('\n');
        self.section(&mut out, "Operating Expenses", &report.expenses, report.total_expenses);
        Self::rule(&mut out, 1);
        self.total(&mut out, "Net Income", report.net_income);
        out
    }

    pub fn balance_sheet(&self, report: &BalanceSheet, period: &str) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Balance Sheet ({}) - {}", self.currency.code, period);
        Self::rule(&mut out, 1);
        self.section(&mut out, "Assets", &report.assets, report.total_assets);
        self.section(&mut out, "Liabilities", &report.liabilities, report.total_liabilities);
        self.section(&mut out, "Equity", &report.equity, report.total_equity);
        Self::rule(&mut out, 1);
        self.total(
            &mut out,
            "Total Liabilities and Equity",
            report.total_liabilities_and_equity,
        );
        out
    }
}

pub fn warnings(warnings: &[IntegrityWarning]) -> String {
    let mut out = String::new();
    for warning in warnings {
        let _ = writeln!(out, "warning: {}", warning);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerview_core::TrialBalanceRow;
    use rust_decimal_macros::dec;

    fn row(code: &str, name: &str, level: usize, debit: Decimal, credit: Decimal) -> TrialBalanceRow {
        TrialBalanceRow {
            id: code.to_string(),
            code: code.to_string(),
            name: name.to_string(),
            debit,
            credit,
            level,
        }
    }

    #[test]
    fn test_trial_balance_table() {
        let currency = CurrencyConfig::default();
        let report = TrialBalance {
            rows: vec![
                row("1000", "Assets", 1, dec!(1500000), dec!(0)),
                row("1110", "Cash", 2, dec!(1500000), dec!(0)),
                row("3000", "Equity", 1, dec!(0), dec!(1500000)),
            ],
            total_debit: dec!(1500000),
            total_credit: dec!(1500000),
            warnings: vec![],
        };

        let text = TableRenderer::new(&currency).trial_balance(&report, "All Time");
        assert!(text.starts_with("Trial Balance (IDR) - All Time"));
        assert!(text.contains("\n1000 Assets "));
        assert!(text.contains("\n  1110 Cash "));
        assert!(text.contains("1,500,000.00"));
    }

    #[test]
    fn test_statement_uses_currency_separators() {
        let currency = CurrencyConfig {
            code: "EUR".to_string(),
            decimal_places: 2,
            thousands_separator: ".".to_string(),
            decimal_separator: ",".to_string(),
        };
        let report = IncomeStatement {
            revenues: vec![StatementLine {
                id: "sales".to_string(),
                code: "4100".to_string(),
                name: "Sales".to_string(),
                balance: dec!(12345.5),
                level: 2,
            }],
            total_revenues: dec!(12345.5),
            cogs: vec![],
            total_cogs: dec!(0),
            gross_profit: dec!(12345.5),
            expenses: vec![],
            total_expenses: dec!(0),
            net_income: dec!(12345.5),
            warnings: vec![],
        };

        let text = TableRenderer::new(&currency).income_statement(&report, "All Time");
        assert!(text.contains("12.345,50"));
        assert!(text.contains("Net Income"));
    }
}
