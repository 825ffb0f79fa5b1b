//! Type-safe wrapper for item identifiers.
//!
//! Both mining algorithms treat a product as an opaque integer id. The
//! newtype keeps item ids from silently mixing with the counts and indices
//! that surround them in the algorithm code.

use std::fmt;

/// An item (product) identifier.
///
/// Items carry no internal structure; equality, ordering, and hashing are
/// by value.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Item(u32);

impl Item {
    /// Creates a new item with the given id.
    pub fn new(id: u32) -> Self {
        Item(id)
    }

    /// Returns the raw id as a `u32`.
    pub fn id(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for Item {
    fn from(id: u32) -> Self {
        Item(id)
    }
}

impl From<Item> for u32 {
    fn from(item: Item) -> Self {
        item.0
    }
}
