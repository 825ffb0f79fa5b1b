//! Exact frequent-itemset enumeration, level by level.
//!
//! Level 1 scores every distinct item in the table. Each following level
//! generates candidate combinations only from items that survived the
//! previous level, drops candidates containing a known-infrequent subset,
//! and keeps those whose support meets the threshold.
//!
//! The infrequent registry is cumulative across levels: a candidate is
//! discarded if it is a superset of *any* itemset that ever fell below the
//! threshold, not just one from the previous level. Support is anti-monotone,
//! so such a candidate can never be frequent and is pruned before it is
//! counted.

use std::fmt;

use log::debug;

use crate::error::{Error, Result};
use crate::itemset::ItemSet;
use crate::table::TransactionTable;
use crate::types::Item;

/// A frequent itemset together with its support count.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Candidate {
    items: ItemSet,
    support: usize,
}

impl Candidate {
    /// The itemset.
    pub fn items(&self) -> &ItemSet {
        &self.items
    }

    /// The number of transactions containing the itemset.
    pub fn support(&self) -> usize {
        self.support
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "support: {:4}  items: {}", self.support, self.items)
    }
}

/// Level-wise exact enumerator for frequent itemsets.
pub struct Apriori {
    min_support: usize,
    max_level: usize,
}

impl Apriori {
    /// Creates an enumerator returning frequent itemsets of size
    /// `max_level` whose support is at least `min_support`.
    pub fn new(min_support: usize, max_level: usize) -> Self {
        Self { min_support, max_level }
    }

    /// Mines the table and returns the final level's frequent itemsets.
    ///
    /// A `min_support` of 0 keeps every candidate; a `max_level` of 1
    /// returns the frequent single items. An empty table yields an empty
    /// result, as does any level at which no candidate survives.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `max_level` is 0.
    pub fn mine(&self, table: &TransactionTable) -> Result<Vec<Candidate>> {
        if self.max_level < 1 {
            return Err(Error::Config("max_level must be at least 1".to_string()));
        }

        let mut infrequent: Vec<ItemSet> = Vec::new();

        let singletons: Vec<ItemSet> = table
            .distinct_items()
            .into_iter()
            .map(ItemSet::singleton)
            .collect();
        let mut frequent = self.filter_by_support(singletons, table, &mut infrequent);
        debug!("level 1: {} frequent itemsets", frequent.len());

        for level in 2..=self.max_level {
            let candidates = self.next_level(&frequent, &infrequent);
            if candidates.is_empty() {
                debug!("level {}: no candidates, stopping early", level);
                return Ok(Vec::new());
            }
            debug!("level {}: {} candidates after pruning", level, candidates.len());
            frequent = self.filter_by_support(candidates, table, &mut infrequent);
            debug!("level {}: {} frequent itemsets", level, frequent.len());
        }

        Ok(frequent)
    }

    /// Scores each itemset, keeping those at or above the threshold and
    /// recording the rest in the infrequent registry.
    fn filter_by_support(
        &self,
        itemsets: Vec<ItemSet>,
        table: &TransactionTable,
        infrequent: &mut Vec<ItemSet>,
    ) -> Vec<Candidate> {
        let mut kept = Vec::new();
        for items in itemsets {
            let support = table.support(items.items());
            if support >= self.min_support {
                kept.push(Candidate { items, support });
            } else {
                infrequent.push(items);
            }
        }
        kept
    }

    /// Generates the next level's candidates from the current frequent
    /// sets.
    ///
    /// Combinations are drawn only from items appearing in some surviving
    /// itemset; any combination with a registered infrequent subset is
    /// dropped before it is ever counted.
    fn next_level(&self, frequent: &[Candidate], infrequent: &[ItemSet]) -> Vec<ItemSet> {
        let mut pool: Vec<Item> = frequent.iter().flat_map(|c| c.items().iter()).collect();
        pool.sort_unstable();
        pool.dedup();
        if pool.is_empty() {
            return Vec::new();
        }

        let size = frequent[0].items().len() + 1;
        let mut candidates = Vec::new();
        let mut current = Vec::with_capacity(size);
        combinations(&pool, size, &mut current, &mut |combo| {
            let candidate = ItemSet::from_sorted(combo.to_vec());
            if !infrequent.iter().any(|unsupported| unsupported.is_subset_of(&candidate)) {
                candidates.push(candidate);
            }
        });
        candidates
    }
}

/// Calls `found` with every `size`-combination of `pool`, in lexicographic
/// order over the (sorted) pool.
fn combinations(
    pool: &[Item],
    size: usize,
    current: &mut Vec<Item>,
    found: &mut impl FnMut(&[Item]),
) {
    if current.len() == size {
        found(current);
        return;
    }
    let needed = size - current.len();
    for start in 0..pool.len() {
        if pool.len() - start < needed {
            break;
        }
        current.push(pool[start]);
        combinations(&pool[start + 1..], size, current, found);
        current.pop();
    }
}
