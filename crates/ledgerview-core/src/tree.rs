//! Account tree builder
//!
//! Turns the flat chart of accounts into a forest ordered by account code.
//! Nodes live in an arena and refer to each other by index, and every walk
//! over the tree is iterative, so deep or malformed hierarchies cannot blow
//! the stack.

use ledgerview_store::Account;
use ledgerview_utils::compare_codes;
use std::collections::HashMap;

use crate::error::{CoreError, CoreResult, IntegrityWarning, IntegrityWarningKind};

/// Index of a node inside an [`AccountTree`]
pub type NodeId = usize;

/// Account with its resolved position in the hierarchy
#[derive(Debug, Clone)]
pub struct AccountNode {
    pub account: Account,
    pub parent: Option<NodeId>,
    /// Children ordered by code
    pub children: Vec<NodeId>,
    /// Depth in the tree; roots are level 1
    pub level: usize,
}

impl AccountNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Forest of accounts built from parent links
#[derive(Debug, Clone, Default)]
pub struct AccountTree {
    nodes: Vec<AccountNode>,
    roots: Vec<NodeId>,
    index: HashMap<String, NodeId>,
    dangling: Vec<String>,
}

impl AccountTree {
    /// Build the forest from an unordered account list.
    ///
    /// Accounts without a parent, or whose parent id matches no account,
    /// become roots. Duplicate ids and cyclic parent chains are errors.
    pub fn build(accounts: Vec<Account>) -> CoreResult<Self> {
        let mut index: HashMap<String, NodeId> = HashMap::with_capacity(accounts.len());
        let mut nodes: Vec<AccountNode> = Vec::with_capacity(accounts.len());

        for account in accounts {
            if index.contains_key(&account.id) {
                return Err(CoreError::DuplicateAccount { id: account.id });
            }
            index.insert(account.id.clone(), nodes.len());
            nodes.push(AccountNode {
                account,
                parent: None,
                children: Vec::new(),
                level: 0,
            });
        }

        let mut roots = Vec::new();
        let mut dangling = Vec::new();

        for id in 0..nodes.len() {
            let parent = match nodes[id].account.parent_id.as_deref() {
                None => None,
                Some(parent_id) => match index.get(parent_id) {
                    Some(&parent) => Some(parent),
                    None => {
                        log::warn!(
                            "Account {} ({}) references missing parent {}; treating it as a root",
                            nodes[id].account.code,
                            nodes[id].account.id,
                            parent_id
                        );
                        dangling.push(nodes[id].account.id.clone());
                        None
                    }
                },
            };

            match parent {
                Some(parent) => {
                    nodes[id].parent = Some(parent);
                    nodes[parent].children.push(id);
                }
                None => roots.push(id),
            }
        }

        roots.sort_by(|a, b| compare_codes(&nodes[*a].account.code, &nodes[*b].account.code));
        for id in 0..nodes.len() {
            let mut children = std::mem::take(&mut nodes[id].children);
            children.sort_by(|a, b| compare_codes(&nodes[*a].account.code, &nodes[*b].account.code));
            nodes[id].children = children;
        }

        let mut tree = Self {
            nodes,
            roots,
            index,
            dangling,
        };
        tree.assign_levels()?;

        log::debug!(
            "Built account tree: {} accounts, {} roots",
            tree.nodes.len(),
            tree.roots.len()
        );
        Ok(tree)
    }

    /// Set levels from the roots down. Nodes the walk never reaches hang off
    /// a parent chain that loops back on itself.
    fn assign_levels(&mut self) -> CoreResult<()> {
        let mut stack: Vec<(NodeId, usize)> = self.roots.iter().rev().map(|&r| (r, 1)).collect();
        let mut reached = 0;

        while let Some((id, level)) = stack.pop() {
            self.nodes[id].level = level;
            reached += 1;
            for &child in self.nodes[id].children.iter().rev() {
                stack.push((child, level + 1));
            }
        }

        if reached == self.nodes.len() {
            return Ok(());
        }

        let start = self
            .nodes
            .iter()
            .position(|n| n.level == 0)
            .unwrap_or_default();
        Err(CoreError::CycleDetected {
            account_id: self.cycle_member(start),
        })
    }

    /// Walk parent links from `start` until a node repeats
    fn cycle_member(&self, start: NodeId) -> String {
        let mut seen = vec![false; self.nodes.len()];
        let mut current = start;
        loop {
            if seen[current] {
                return self.nodes[current].account.id.clone();
            }
            seen[current] = true;
            match self.nodes[current].parent {
                Some(parent) => current = parent,
                None => return self.nodes[current].account.id.clone(),
            }
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Root nodes ordered by code
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn node(&self, id: NodeId) -> &AccountNode {
        &self.nodes[id]
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &AccountNode)> {
        self.nodes.iter().enumerate()
    }

    /// Look up a node by account id
    pub fn find(&self, account_id: &str) -> Option<NodeId> {
        self.index.get(account_id).copied()
    }

    /// Account ids whose parent reference could not be resolved
    pub fn dangling_parents(&self) -> &[String] {
        &self.dangling
    }

    /// Pre-order walk: every parent precedes its children, siblings in code order
    pub fn traversal_order(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.nodes[id].children.iter().rev());
        }
        order
    }

    /// All nodes below `id`, in pre-order
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.nodes[id].children.iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.nodes[next].children.iter().rev());
        }
        out
    }

    /// Warnings for accounts attached as roots because their parent is missing
    pub fn warnings(&self) -> Vec<IntegrityWarning> {
        self.dangling
            .iter()
            .filter_map(|id| self.find(id))
            .map(|node| {
                let account = &self.nodes[node].account;
                IntegrityWarning::new(
                    IntegrityWarningKind::DanglingParent,
                    format!(
                        "Account {} {} references missing parent {}",
                        account.code,
                        account.name,
                        account.parent_id.as_deref().unwrap_or_default()
                    ),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerview_store::{AccountGroup, AccountType};

    fn account(id: &str, code: &str, parent: Option<&str>) -> Account {
        let account = Account::new(id, code, id, AccountType::Debit, AccountGroup::Assets);
        match parent {
            Some(p) => account.with_parent(p),
            None => account,
        }
    }

    fn codes(tree: &AccountTree, ids: &[NodeId]) -> Vec<String> {
        ids.iter().map(|&id| tree.node(id).account.code.clone()).collect()
    }

    #[test]
    fn test_single_chain() {
        let tree = AccountTree::build(vec![
            account("cash", "1110", Some("current")),
            account("assets", "1000", None),
            account("current", "1100", Some("assets")),
        ])
        .unwrap();

        assert_eq!(tree.len(), 3);
        assert_eq!(tree.roots().len(), 1);

        let root = tree.node(tree.roots()[0]);
        assert_eq!(root.account.code, "1000");
        assert_eq!(root.level, 1);
        assert_eq!(root.children.len(), 1);

        let child = tree.node(root.children[0]);
        assert_eq!(child.account.code, "1100");
        assert_eq!(child.level, 2);
        assert_eq!(child.children.len(), 1);

        let grandchild = tree.node(child.children[0]);
        assert_eq!(grandchild.account.code, "1110");
        assert_eq!(grandchild.level, 3);
        assert!(grandchild.is_leaf());
    }

    #[test]
    fn test_siblings_sorted_numerically() {
        let tree = AccountTree::build(vec![
            account("root", "1", None),
            account("c10", "1.10", Some("root")),
            account("c9", "1.9", Some("root")),
            account("c2", "1.2", Some("root")),
            account("r10", "10", None),
            account("r9", "9", None),
        ])
        .unwrap();

        assert_eq!(codes(&tree, tree.roots()), vec!["1", "9", "10"]);
        let root = tree.find("root").unwrap();
        assert_eq!(codes(&tree, &tree.node(root).children), vec!["1.2", "1.9", "1.10"]);
    }

    #[test]
    fn test_every_node_appears_once() {
        let tree = AccountTree::build(vec![
            account("a", "1000", None),
            account("b", "1100", Some("a")),
            account("c", "1200", Some("a")),
            account("d", "1210", Some("c")),
            account("e", "2000", None),
        ])
        .unwrap();

        let order = tree.traversal_order();
        assert_eq!(order.len(), tree.len());
        assert_eq!(codes(&tree, &order), vec!["1000", "1100", "1200", "1210", "2000"]);

        for (id, node) in tree.nodes() {
            let holders = tree
                .nodes()
                .filter(|(_, n)| n.children.contains(&id))
                .count();
            match node.account.parent_id {
                Some(_) => assert_eq!(holders, 1),
                None => assert_eq!(holders, 0),
            }
        }
    }

    #[test]
    fn test_dangling_parent_becomes_root() {
        let tree = AccountTree::build(vec![
            account("a", "1000", None),
            account("orphan", "1500", Some("ghost")),
        ])
        .unwrap();

        assert_eq!(tree.len(), 2);
        assert_eq!(codes(&tree, tree.roots()), vec!["1000", "1500"]);
        assert_eq!(tree.dangling_parents(), &["orphan".to_string()]);

        let warnings = tree.warnings();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, IntegrityWarningKind::DanglingParent);
        assert!(warnings[0].message.contains("ghost"));
    }

    #[test]
    fn test_two_node_cycle_detected() {
        let result = AccountTree::build(vec![
            account("a", "1000", Some("b")),
            account("b", "1100", Some("a")),
        ]);

        match result {
            Err(CoreError::CycleDetected { account_id }) => {
                assert!(account_id == "a" || account_id == "b")
            }
            other => panic!("expected cycle, got {:?}", other),
        }
    }

    #[test]
    fn test_self_parent_detected() {
        let result = AccountTree::build(vec![
            account("root", "1000", None),
            account("loop", "1100", Some("loop")),
        ]);
        assert!(matches!(result, Err(CoreError::CycleDetected { account_id }) if account_id == "loop"));
    }

    #[test]
    fn test_cycle_below_valid_root_detected() {
        // x -> y -> z -> y; x itself hangs off a real root
        let result = AccountTree::build(vec![
            account("root", "1000", None),
            account("x", "1100", Some("y")),
            account("y", "1200", Some("z")),
            account("z", "1300", Some("y")),
        ]);
        match result {
            Err(CoreError::CycleDetected { account_id }) => {
                assert!(account_id == "y" || account_id == "z")
            }
            other => panic!("expected cycle, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let result = AccountTree::build(vec![account("a", "1000", None), account("a", "2000", None)]);
        assert!(matches!(result, Err(CoreError::DuplicateAccount { id }) if id == "a"));
    }

    #[test]
    fn test_deep_chain_does_not_recurse() {
        let mut accounts = vec![account("n0", "0", None)];
        for i in 1..20_000 {
            accounts.push(account(&format!("n{}", i), &i.to_string(), Some(&format!("n{}", i - 1))));
        }
        let tree = AccountTree::build(accounts).unwrap();

        let last = tree.find("n19999").unwrap();
        assert_eq!(tree.node(last).level, 20_000);
        assert_eq!(tree.descendants(tree.roots()[0]).len(), 19_999);
    }

    #[test]
    fn test_empty_input() {
        let tree = AccountTree::build(vec![]).unwrap();
        assert!(tree.is_empty());
        assert!(tree.traversal_order().is_empty());
    }
}
