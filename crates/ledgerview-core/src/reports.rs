//! Report structures handed to the presentation layer

use ledgerview_store::{AccountGroup, AccountType};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::IntegrityWarning;

/// Debit/credit figures for one account at one level of the hierarchy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedRow {
    pub id: String,
    pub code: String,
    pub name: String,
    pub account_type: AccountType,
    pub group: AccountGroup,
    /// Depth in the tree; roots are level 1
    pub level: usize,
    pub debit: Decimal,
    pub credit: Decimal,
    pub is_leaf: bool,
}

impl DerivedRow {
    /// Net balance on the account's normal side
    pub fn signed_balance(&self) -> Decimal {
        match self.account_type {
            AccountType::Debit => self.debit - self.credit,
            AccountType::Credit => self.credit - self.debit,
        }
    }

    pub fn to_line(&self) -> StatementLine {
        StatementLine {
            id: self.id.clone(),
            code: self.code.clone(),
            name: self.name.clone(),
            balance: self.signed_balance(),
            level: self.level,
        }
    }
}

/// Trial balance row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialBalanceRow {
    pub id: String,
    pub code: String,
    pub name: String,
    pub debit: Decimal,
    pub credit: Decimal,
    pub level: usize,
}

/// Every account at every level, with root-level totals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalance {
    pub rows: Vec<TrialBalanceRow>,
    pub total_debit: Decimal,
    pub total_credit: Decimal,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<IntegrityWarning>,
}

impl TrialBalance {
    pub fn is_balanced(&self) -> bool {
        self.total_debit == self.total_credit
    }
}

/// Statement line carrying a type-normalized balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementLine {
    pub id: String,
    pub code: String,
    pub name: String,
    pub balance: Decimal,
    pub level: usize,
}

/// Income statement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeStatement {
    pub revenues: Vec<StatementLine>,
    pub total_revenues: Decimal,
    /// Cost of sales lines
    pub cogs: Vec<StatementLine>,
    pub total_cogs: Decimal,
    pub gross_profit: Decimal,
    /// Operating expense lines
    pub expenses: Vec<StatementLine>,
    pub total_expenses: Decimal,
    pub net_income: Decimal,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<IntegrityWarning>,
}

/// Balance sheet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceSheet {
    pub assets: Vec<StatementLine>,
    pub total_assets: Decimal,
    pub liabilities: Vec<StatementLine>,
    pub total_liabilities: Decimal,
    /// Equity lines, including the current period earnings row
    pub equity: Vec<StatementLine>,
    pub total_equity: Decimal,
    pub total_liabilities_and_equity: Decimal,
    /// Net income folded into equity
    pub net_income: Decimal,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<IntegrityWarning>,
}

impl BalanceSheet {
    pub fn is_balanced(&self) -> bool {
        self.total_assets == self.total_liabilities_and_equity
    }
}
