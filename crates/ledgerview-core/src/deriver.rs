//! Report derivation
//!
//! One bottom-up pass over the account tree produces a debit/credit rollup
//! for every node. Leaves take their raw balance: positive goes to the
//! debit column, negative to the credit column, whatever the account type.
//! Parents sum their children's columns. The statements then read each
//! row's balance on its normal side (`signed_balance`), which is where the
//! account type comes in.

use ledgerview_config::ReportsConfig;
use ledgerview_store::{Account, AccountGroup, Transaction};
use ledgerview_utils::compare_codes;
use rust_decimal::Decimal;

use crate::balances::{aggregate_balances, BalanceMap};
use crate::error::{CoreError, CoreResult, IntegrityWarning, IntegrityWarningKind};
use crate::journal::check_journals;
use crate::reports::{BalanceSheet, DerivedRow, IncomeStatement, StatementLine, TrialBalance, TrialBalanceRow};
use crate::tree::AccountTree;

/// Id given to the synthetic current period earnings row
pub const CURRENT_EARNINGS_ID: &str = "current-period-earnings";

/// Settings that shape the income statement and balance sheet
#[derive(Debug, Clone, PartialEq)]
pub struct ReportOptions {
    /// Expense codes starting with this prefix are cost of sales
    pub cost_of_sales_prefix: String,
    /// Reserved code of the synthetic earnings row; no real account may use it
    pub current_earnings_code: String,
    pub current_earnings_name: String,
}

impl Default for ReportOptions {
    fn default() -> Self {
        ReportOptions::from(&ReportsConfig::default())
    }
}

impl From<&ReportsConfig> for ReportOptions {
    fn from(config: &ReportsConfig) -> Self {
        Self {
            cost_of_sales_prefix: config.cost_of_sales_prefix.clone(),
            current_earnings_code: config.current_earnings_code.clone(),
            current_earnings_name: config.current_earnings_name.clone(),
        }
    }
}

/// Rolled-up rows for a whole tree
#[derive(Debug, Clone, Default)]
pub struct Derivation {
    /// One row per account, parents before children
    pub rows: Vec<DerivedRow>,
    pub warnings: Vec<IntegrityWarning>,
}

impl Derivation {
    fn group(&self, group: AccountGroup) -> impl Iterator<Item = &DerivedRow> {
        self.rows.iter().filter(move |r| r.group == group)
    }

    /// Sum of normal-side balances over the group's roots
    fn root_total(&self, group: AccountGroup) -> Decimal {
        self.group(group)
            .filter(|r| r.level == 1)
            .map(DerivedRow::signed_balance)
            .sum()
    }

    /// Display lines for the group: everything below the roots, by code
    fn lines(&self, group: AccountGroup, keep: impl Fn(&DerivedRow) -> bool) -> Vec<StatementLine> {
        let mut lines: Vec<StatementLine> = self
            .group(group)
            .filter(|r| r.level > 1 && keep(r))
            .map(DerivedRow::to_line)
            .collect();
        sort_lines(&mut lines);
        lines
    }
}

fn journal_warnings(transactions: &[Transaction]) -> Vec<IntegrityWarning> {
    let warnings = check_journals(transactions);
    for warning in &warnings {
        log::warn!("{}", warning);
    }
    warnings
}

fn sort_lines(lines: &mut [StatementLine]) {
    lines.sort_by(|a, b| compare_codes(&a.code, &b.code));
}

/// Compute debit/credit rollups for every node in `tree`
pub fn derive_rows(tree: &AccountTree, balances: &BalanceMap) -> Derivation {
    let order = tree.traversal_order();
    let mut rollups = vec![(Decimal::ZERO, Decimal::ZERO); tree.len()];
    let mut warnings = tree.warnings();

    for &id in order.iter().rev() {
        let node = tree.node(id);
        let raw = balances
            .get(&node.account.id)
            .copied()
            .unwrap_or(Decimal::ZERO);

        rollups[id] = if node.is_leaf() {
            if raw > Decimal::ZERO {
                (raw, Decimal::ZERO)
            } else {
                (Decimal::ZERO, -raw)
            }
        } else {
            if !raw.is_zero() {
                log::warn!(
                    "Account {} has children but carries {} in direct postings; excluded from rollup",
                    node.account.code,
                    raw
                );
                warnings.push(
                    IntegrityWarning::new(
                        IntegrityWarningKind::PostingToParentAccount,
                        format!(
                            "Account {} {} has child accounts but direct postings; they are left out of the rollup",
                            node.account.code, node.account.name
                        ),
                    )
                    .with_values(Decimal::ZERO, raw),
                );
            }
            node.children.iter().fold((Decimal::ZERO, Decimal::ZERO), |(d, c), &child| {
                (d + rollups[child].0, c + rollups[child].1)
            })
        };
    }

    let unknown: Vec<&String> = balances
        .keys()
        .filter(|id| tree.find(id).is_none())
        .collect();
    if !unknown.is_empty() {
        log::warn!(
            "{} account ids with postings are not in the chart of accounts; ignored",
            unknown.len()
        );
    }

    let rows = order
        .into_iter()
        .map(|id| {
            let node = tree.node(id);
            let (debit, credit) = rollups[id];
            DerivedRow {
                id: node.account.id.clone(),
                code: node.account.code.clone(),
                name: node.account.name.clone(),
                account_type: node.account.account_type,
                group: node.account.group,
                level: node.level,
                debit,
                credit,
                is_leaf: node.is_leaf(),
            }
        })
        .collect::<Vec<_>>();

    log::debug!("Derived {} report rows", rows.len());
    Derivation { rows, warnings }
}

/// Derives the three financial reports from accounts and postings
#[derive(Debug, Clone, Default)]
pub struct ReportDeriver {
    options: ReportOptions,
}

impl ReportDeriver {
    pub fn new(options: ReportOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ReportOptions {
        &self.options
    }

    /// Reject charts where a real account uses the reserved earnings code
    pub fn check_reserved_code(&self, tree: &AccountTree) -> CoreResult<()> {
        let reserved = &self.options.current_earnings_code;
        match tree.nodes().find(|(_, n)| &n.account.code == reserved) {
            Some((_, node)) => Err(CoreError::ReservedCode {
                code: reserved.clone(),
                account_id: node.account.id.clone(),
            }),
            None => Ok(()),
        }
    }

    pub fn trial_balance(&self, accounts: &[Account], transactions: &[Transaction]) -> CoreResult<TrialBalance> {
        let tree = AccountTree::build(accounts.to_vec())?;
        Ok(self.trial_balance_for(&tree, transactions))
    }

    pub fn income_statement(&self, accounts: &[Account], transactions: &[Transaction]) -> CoreResult<IncomeStatement> {
        let tree = AccountTree::build(accounts.to_vec())?;
        Ok(self.income_statement_for(&tree, transactions))
    }

    pub fn balance_sheet(&self, accounts: &[Account], transactions: &[Transaction]) -> CoreResult<BalanceSheet> {
        let tree = AccountTree::build(accounts.to_vec())?;
        self.balance_sheet_for(&tree, transactions)
    }

    /// Trial balance over `transactions`, flagging journals that do not sum to zero
    pub fn trial_balance_for(&self, tree: &AccountTree, transactions: &[Transaction]) -> TrialBalance {
        let mut report = self.trial_balance_with_balances(tree, &aggregate_balances(transactions));
        report.warnings.extend(journal_warnings(transactions));
        report
    }

    pub fn income_statement_for(&self, tree: &AccountTree, transactions: &[Transaction]) -> IncomeStatement {
        let mut report = self.income_statement_with_balances(tree, &aggregate_balances(transactions));
        report.warnings.extend(journal_warnings(transactions));
        report
    }

    pub fn balance_sheet_for(&self, tree: &AccountTree, transactions: &[Transaction]) -> CoreResult<BalanceSheet> {
        let mut report = self.balance_sheet_with_balances(tree, &aggregate_balances(transactions))?;
        report.warnings.extend(journal_warnings(transactions));
        Ok(report)
    }

    /// All rows across all levels ordered by code; totals are the root rows
    pub fn trial_balance_with_balances(&self, tree: &AccountTree, balances: &BalanceMap) -> TrialBalance {
        let derivation = derive_rows(tree, balances);

        let (total_debit, total_credit) = derivation
            .rows
            .iter()
            .filter(|r| r.level == 1)
            .fold((Decimal::ZERO, Decimal::ZERO), |(d, c), r| (d + r.debit, c + r.credit));

        let mut rows: Vec<TrialBalanceRow> = derivation
            .rows
            .into_iter()
            .map(|r| TrialBalanceRow {
                id: r.id,
                code: r.code,
                name: r.name,
                debit: r.debit,
                credit: r.credit,
                level: r.level,
            })
            .collect();
        rows.sort_by(|a, b| compare_codes(&a.code, &b.code));

        TrialBalance {
            rows,
            total_debit,
            total_credit,
            warnings: derivation.warnings,
        }
    }

    pub fn income_statement_with_balances(&self, tree: &AccountTree, balances: &BalanceMap) -> IncomeStatement {
        let derivation = derive_rows(tree, balances);
        self.income_statement_from(&derivation)
    }

    fn income_statement_from(&self, derivation: &Derivation) -> IncomeStatement {
        let prefix = self.options.cost_of_sales_prefix.as_str();
        let is_cogs = |r: &DerivedRow| r.code.starts_with(prefix);

        let revenues = derivation.lines(AccountGroup::Revenues, |_| true);
        let total_revenues = derivation.root_total(AccountGroup::Revenues);

        let cogs = derivation.lines(AccountGroup::Expenses, is_cogs);
        let expenses = derivation.lines(AccountGroup::Expenses, |r| !is_cogs(r));

        // Level-2 rows already roll up everything beneath them
        let total_cogs: Decimal = cogs.iter().filter(|l| l.level == 2).map(|l| l.balance).sum();
        let total_expenses: Decimal = expenses.iter().filter(|l| l.level == 2).map(|l| l.balance).sum();

        let gross_profit = total_revenues - total_cogs;
        let net_income = gross_profit - total_expenses;

        IncomeStatement {
            revenues,
            total_revenues,
            cogs,
            total_cogs,
            gross_profit,
            expenses,
            total_expenses,
            net_income,
            warnings: derivation.warnings.clone(),
        }
    }

    pub fn balance_sheet_with_balances(&self, tree: &AccountTree, balances: &BalanceMap) -> CoreResult<BalanceSheet> {
        self.check_reserved_code(tree)?;

        let derivation = derive_rows(tree, balances);
        let net_income = self.income_statement_from(&derivation).net_income;

        let assets = derivation.lines(AccountGroup::Assets, |_| true);
        let total_assets = derivation.root_total(AccountGroup::Assets);

        let liabilities = derivation.lines(AccountGroup::Liabilities, |_| true);
        let total_liabilities = derivation.root_total(AccountGroup::Liabilities);

        let mut equity = derivation.lines(AccountGroup::Equity, |_| true);
        equity.push(StatementLine {
            id: CURRENT_EARNINGS_ID.to_string(),
            code: self.options.current_earnings_code.clone(),
            name: self.options.current_earnings_name.clone(),
            balance: net_income,
            level: 2,
        });
        sort_lines(&mut equity);
        let total_equity = derivation.root_total(AccountGroup::Equity) + net_income;

        let total_liabilities_and_equity = total_liabilities + total_equity;

        let mut warnings = derivation.warnings;
        if total_assets != total_liabilities_and_equity {
            let warning = IntegrityWarning::new(
                IntegrityWarningKind::UnbalancedBalanceSheet,
                "Total assets do not equal total liabilities and equity",
            )
            .with_values(total_assets, total_liabilities_and_equity);
            log::warn!("{}", warning);
            warnings.push(warning);
        }

        Ok(BalanceSheet {
            assets,
            total_assets,
            liabilities,
            total_liabilities,
            equity,
            total_equity,
            total_liabilities_and_equity,
            net_income,
            warnings,
        })
    }
}

/// Trial balance with the default report options
pub fn compute_trial_balance(accounts: &[Account], transactions: &[Transaction]) -> CoreResult<TrialBalance> {
    ReportDeriver::default().trial_balance(accounts, transactions)
}

/// Income statement with the default report options
pub fn compute_income_statement(accounts: &[Account], transactions: &[Transaction]) -> CoreResult<IncomeStatement> {
    ReportDeriver::default().income_statement(accounts, transactions)
}

/// Balance sheet with the default report options
pub fn compute_balance_sheet(accounts: &[Account], transactions: &[Transaction]) -> CoreResult<BalanceSheet> {
    ReportDeriver::default().balance_sheet(accounts, transactions)
}
