//! Balance aggregation
//!
//! [`aggregate_balances`] recomputes every account balance from the full
//! posting list. [`BalanceIndex`] keeps the same map up to date as postings
//! are appended, for callers that hold a long-lived ledger.

use ledgerview_store::Transaction;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Net signed balance per account id
pub type BalanceMap = HashMap<String, Decimal>;

/// Sum posting amounts by account. Accounts without postings are absent.
pub fn aggregate_balances(transactions: &[Transaction]) -> BalanceMap {
    let mut balances = BalanceMap::new();
    for tx in transactions {
        *balances.entry(tx.account_id.clone()).or_insert(Decimal::ZERO) += tx.amount;
    }
    balances
}

/// Incrementally maintained balance map
#[derive(Debug, Clone, Default)]
pub struct BalanceIndex {
    balances: BalanceMap,
    applied: usize,
}

impl BalanceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        Self {
            balances: aggregate_balances(transactions),
            applied: transactions.len(),
        }
    }

    /// Fold one new posting into the index
    pub fn apply(&mut self, tx: &Transaction) {
        *self
            .balances
            .entry(tx.account_id.clone())
            .or_insert(Decimal::ZERO) += tx.amount;
        self.applied += 1;
    }

    pub fn apply_all<'a>(&mut self, transactions: impl IntoIterator<Item = &'a Transaction>) {
        for tx in transactions {
            self.apply(tx);
        }
    }

    /// Balance of an account; zero when it has no postings
    pub fn balance(&self, account_id: &str) -> Decimal {
        self.balances
            .get(account_id)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Number of postings folded in so far
    pub fn applied(&self) -> usize {
        self.applied
    }

    pub fn as_map(&self) -> &BalanceMap {
        &self.balances
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn posting(id: usize, account: &str, amount: Decimal) -> Transaction {
        Transaction::new(
            format!("t{}", id),
            account,
            amount,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            "",
        )
    }

    #[test]
    fn test_aggregate_groups_by_account() {
        let transactions = vec![
            posting(1, "cash", dec!(100)),
            posting(2, "sales", dec!(-100)),
            posting(3, "cash", dec!(-30.25)),
            posting(4, "supplies", dec!(30.25)),
        ];

        let balances = aggregate_balances(&transactions);
        assert_eq!(balances.len(), 3);
        assert_eq!(balances["cash"], dec!(69.75));
        assert_eq!(balances["sales"], dec!(-100));
        assert!(!balances.contains_key("unused"));
    }

    #[test]
    fn test_index_matches_full_recompute() {
        let transactions = vec![
            posting(1, "cash", dec!(500)),
            posting(2, "equity", dec!(-500)),
            posting(3, "cash", dec!(-120)),
            posting(4, "rent", dec!(120)),
        ];

        let mut index = BalanceIndex::from_transactions(&transactions[..2]);
        index.apply_all(&transactions[2..]);

        assert_eq!(index.as_map(), &aggregate_balances(&transactions));
        assert_eq!(index.balance("cash"), dec!(380));
        assert_eq!(index.balance("unknown"), Decimal::ZERO);
        assert_eq!(index.applied(), 4);
    }

    fn amount_strategy() -> impl Strategy<Value = Decimal> {
        (-1_000_000i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
    }

    proptest! {
        #[test]
        fn prop_order_does_not_change_balances(
            entries in prop::collection::vec((0usize..5, amount_strategy()), 0..60),
            rotation in 0usize..60,
        ) {
            let accounts = ["cash", "bank", "sales", "rent", "equity"];
            let transactions: Vec<Transaction> = entries
                .iter()
                .enumerate()
                .map(|(i, (acc, amount))| posting(i, accounts[*acc], *amount))
                .collect();

            let mut shuffled = transactions.clone();
            shuffled.reverse();
            if !shuffled.is_empty() {
                let by = rotation % shuffled.len();
                shuffled.rotate_left(by);
            }

            prop_assert_eq!(aggregate_balances(&transactions), aggregate_balances(&shuffled));
        }
    }
}
