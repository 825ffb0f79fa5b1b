//! # itemset-rs: Frequent Itemset Mining in Rust
//!
//! **`itemset-rs`** discovers frequent itemsets, groups of items that
//! co-occur across many customer transactions, using two independent search
//! strategies over the same transaction table.
//!
//! ## What is a frequent itemset?
//!
//! The **support** of an itemset is the number of transactions containing
//! every one of its items. An itemset is **frequent** when its support
//! meets a threshold. Support is **anti-monotone**: adding an item can
//! never raise it, so no itemset can be frequent unless all of its subsets
//! are. That property is what makes exact enumeration tractable.
//!
//! ## Key Features
//!
//! - **Exact enumeration**: [`Apriori`][crate::apriori::Apriori] runs a
//!   level-wise search with a cumulative infrequent-itemset registry, so
//!   candidates containing a known-infrequent subset are pruned before they
//!   are ever counted.
//! - **Heuristic search**: [`GeneticSearch`][crate::genetic::GeneticSearch]
//!   evolves a population of fixed-size candidate itemsets via tournament
//!   selection and unique-gene crossover, converging on high-support
//!   itemsets without exhaustive enumeration.
//! - **Reproducible runs**: every randomized step draws from a
//!   caller-supplied [`rand::Rng`], so a seeded generator replays a run
//!   exactly.
//! - **One shared primitive**: both algorithms score itemsets through
//!   [`TransactionTable::support`][crate::table::TransactionTable::support].
//!
//! ## Basic Usage
//!
//! ```rust
//! use itemset_rs::apriori::Apriori;
//! use itemset_rs::table::TransactionTable;
//!
//! // One row per customer; duplicates within a row are dropped.
//! let table = TransactionTable::from_rows(vec![
//!     vec![1, 2, 3],
//!     vec![1, 2],
//!     vec![1, 3],
//!     vec![2, 3],
//! ]);
//!
//! // Itemsets of size 2 appearing in at least 2 transactions.
//! let frequent = Apriori::new(2, 2).mine(&table).unwrap();
//! assert_eq!(frequent.len(), 3);
//! for candidate in &frequent {
//!     assert_eq!(candidate.support(), 2);
//! }
//! ```
//!
//! ## Core Components
//!
//! - **[`apriori`]**: the exact level-wise enumerator.
//! - **[`genetic`]**: the population-based heuristic searcher.
//! - **[`table`]**: transactions, the transaction table, and support
//!   counting.

pub mod apriori;
pub mod error;
pub mod genetic;
pub mod itemset;
pub mod table;
pub mod types;
