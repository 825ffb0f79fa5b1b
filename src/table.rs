//! Transactions, the transaction table, and support counting.
//!
//! The table is built once and never mutated afterwards; both mining
//! algorithms only read it. Support counting lives here because it is the
//! one primitive the algorithms share, and the dominant cost center of both.

use std::collections::BTreeMap;
use std::ops::Index;

use crate::types::Item;

/// A single customer's transaction: the deduplicated set of items bought.
///
/// Items are stored sorted, so membership checks are binary searches and
/// iteration order is stable. Stable order matters: the heuristic searcher
/// samples genes out of transactions, and a seeded run must replay exactly.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Transaction {
    items: Vec<Item>,
}

impl Transaction {
    fn new<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Item>,
    {
        let mut items: Vec<Item> = items.into_iter().collect();
        items.sort_unstable();
        items.dedup();
        Transaction { items }
    }

    /// Returns the number of distinct items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Checks whether the transaction has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the items in ascending order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Iterates over the items in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = Item> + '_ {
        self.items.iter().copied()
    }

    /// Checks whether the transaction contains `item`.
    pub fn contains(&self, item: Item) -> bool {
        self.items.binary_search(&item).is_ok()
    }

    /// Checks whether the transaction contains every item of `items`.
    pub fn contains_all(&self, items: &[Item]) -> bool {
        items.iter().all(|&item| self.contains(item))
    }
}

/// An immutable collection of transactions, shared read-only by both
/// mining algorithms.
#[derive(Debug, Clone)]
pub struct TransactionTable {
    transactions: Vec<Transaction>,
}

impl TransactionTable {
    /// Builds a table from rows of raw item ids.
    ///
    /// Each row becomes one transaction; duplicates within a row are
    /// dropped, and row order is preserved.
    pub fn from_rows<R, I>(rows: R) -> Self
    where
        R: IntoIterator<Item = I>,
        I: IntoIterator<Item = u32>,
    {
        let transactions = rows
            .into_iter()
            .map(|row| Transaction::new(row.into_iter().map(Item::new)))
            .collect();
        TransactionTable { transactions }
    }

    /// Normalizes raw `(customer_id, item_id)` records into a table with
    /// one transaction per customer.
    ///
    /// Items are deduplicated per customer, and customers are grouped in
    /// ascending id order, so the same records always produce the same
    /// table.
    pub fn from_records<R>(records: R) -> Self
    where
        R: IntoIterator<Item = (u32, u32)>,
    {
        let mut by_customer: BTreeMap<u32, Vec<Item>> = BTreeMap::new();
        for (customer, item) in records {
            by_customer.entry(customer).or_default().push(Item::new(item));
        }
        let transactions = by_customer.into_values().map(Transaction::new).collect();
        TransactionTable { transactions }
    }

    /// Returns the number of transactions.
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    /// Checks whether the table has no transactions.
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Iterates over the transactions.
    pub fn iter(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter()
    }

    /// Returns all distinct items across the table, in ascending order.
    pub fn distinct_items(&self) -> Vec<Item> {
        let mut items: Vec<Item> = self.transactions.iter().flat_map(Transaction::iter).collect();
        items.sort_unstable();
        items.dedup();
        items
    }

    /// Support of an itemset: the number of transactions containing every
    /// item of `items`.
    ///
    /// The slice does not have to be sorted, so both canonical itemsets and
    /// raw gene sequences can be scored without conversion. The empty slice
    /// is contained in every transaction, so its support is the table
    /// length.
    pub fn support(&self, items: &[Item]) -> usize {
        self.transactions.iter().filter(|txn| txn.contains_all(items)).count()
    }
}

impl Index<usize> for TransactionTable {
    type Output = Transaction;

    fn index(&self, index: usize) -> &Transaction {
        &self.transactions[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_table() -> TransactionTable {
        TransactionTable::from_rows(vec![
            vec![1, 2, 3],
            vec![1, 2],
            vec![1, 3],
            vec![2, 3],
        ])
    }

    fn items(ids: &[u32]) -> Vec<Item> {
        ids.iter().map(|&id| Item::new(id)).collect()
    }

    #[test]
    fn test_rows_are_deduplicated() {
        let table = TransactionTable::from_rows(vec![vec![2, 1, 2, 3]]);
        assert_eq!(table.len(), 1);
        assert_eq!(table[0].len(), 3);
        assert_eq!(table[0].items(), &items(&[1, 2, 3])[..]);
        assert!(table[0].contains(Item::new(2)));
        assert!(!table[0].contains(Item::new(4)));
    }

    #[test]
    fn test_support() {
        let table = demo_table();
        assert_eq!(table.support(&items(&[1])), 3);
        assert_eq!(table.support(&items(&[1, 2])), 2);
        assert_eq!(table.support(&items(&[2, 1])), 2);
        assert_eq!(table.support(&items(&[1, 2, 3])), 1);
        assert_eq!(table.support(&items(&[4])), 0);
    }

    #[test]
    fn test_support_of_empty_itemset() {
        let table = demo_table();
        assert_eq!(table.support(&[]), table.len());
    }

    #[test]
    fn test_support_monotonicity() {
        // Adding an item never raises support.
        let table = demo_table();
        let universe = table.distinct_items();
        for &a in &universe {
            let base = table.support(&[a]);
            for &b in &universe {
                assert!(table.support(&[a, b]) <= base);
            }
        }
    }

    #[test]
    fn test_distinct_items() {
        let table = TransactionTable::from_rows(vec![vec![5, 3], vec![3, 8, 1]]);
        assert_eq!(table.distinct_items(), items(&[1, 3, 5, 8]));
    }

    #[test]
    fn test_from_records_normalization() {
        // Customer 7 buys item 10 twice; both customers end up with
        // deduplicated transactions, ordered by customer id.
        let table = TransactionTable::from_records(vec![
            (9, 20),
            (7, 10),
            (7, 30),
            (7, 10),
            (9, 10),
        ]);
        assert_eq!(table.len(), 2);
        assert_eq!(table[0].items(), &items(&[10, 30])[..]);
        assert_eq!(table[1].items(), &items(&[10, 20])[..]);
    }

    #[test]
    fn test_empty_table() {
        let table = TransactionTable::from_rows(Vec::<Vec<u32>>::new());
        assert!(table.is_empty());
        assert_eq!(table.support(&items(&[1])), 0);
        assert!(table.distinct_items().is_empty());
    }
}
