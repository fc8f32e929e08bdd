//! Sorted node-id set
//!
//! Field-object sets are small and mostly appended in increasing id order,
//! so a sorted vec beats a hash set on both memory and iteration order.
//!
//! # Performance Characteristics
//! - Insert: O(log n) search, O(1) amortized when appending in order
//! - Contains: O(log n)
//! - Iteration: ascending id order

use serde::{Deserialize, Serialize};

use crate::shared::models::NodeId;

/// Ordered set of node ids
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeBitSet {
    elements: Vec<NodeId>,
}

impl NodeBitSet {
    #[inline]
    pub const fn new() -> Self {
        Self {
            elements: Vec::new(),
        }
    }

    #[inline]
    pub fn singleton(id: NodeId) -> Self {
        Self { elements: vec![id] }
    }

    /// Insert an id. Returns true if it was not present.
    #[inline]
    pub fn insert(&mut self, id: NodeId) -> bool {
        // Fast path: append in order
        match self.elements.last() {
            None => {
                self.elements.push(id);
                return true;
            }
            Some(&last) if id > last => {
                self.elements.push(id);
                return true;
            }
            _ => {}
        }
        match self.elements.binary_search(&id) {
            Ok(_) => false,
            Err(pos) => {
                self.elements.insert(pos, id);
                true
            }
        }
    }

    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        self.elements.binary_search(&id).is_ok()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.elements.iter().copied()
    }

    #[inline]
    pub fn as_slice(&self) -> &[NodeId] {
        &self.elements
    }
}

impl FromIterator<NodeId> for NodeBitSet {
    fn from_iter<I: IntoIterator<Item = NodeId>>(iter: I) -> Self {
        let mut elements: Vec<NodeId> = iter.into_iter().collect();
        elements.sort_unstable();
        elements.dedup();
        Self { elements }
    }
}
