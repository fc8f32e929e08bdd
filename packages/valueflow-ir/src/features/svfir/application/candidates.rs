//! Candidate pointer selection
//!
//! Runs once over the finished graph. Nothing here mutates nodes or
//! statements; the result is a membership set handed to the solver.

use std::collections::BTreeSet;
use tracing::info;

use super::ir::SvfIr;
use crate::errors::Result;
use crate::features::svfir::domain::SvfVar;
use crate::features::svfir::infrastructure::GraphStore;
use crate::features::svfir::ports::{CallerInfo, LayoutService};
use crate::shared::models::NodeId;

/// Below this many nodes the scan stays sequential
#[cfg(feature = "parallel")]
const PARALLEL_SCAN_THRESHOLD: usize = 10_000;

fn is_valid_pointer_in(store: &GraphStore, var: &SvfVar) -> bool {
    var.is_pointer && store.has_incident_edges(var.id).unwrap_or(false)
}

#[cfg(feature = "parallel")]
fn select_candidate_pointers(store: &GraphStore) -> BTreeSet<NodeId> {
    use rayon::prelude::*;

    if store.node_count() < PARALLEL_SCAN_THRESHOLD {
        return select_candidate_pointers_seq(store);
    }
    let nodes: Vec<&SvfVar> = store.nodes().collect();
    nodes
        .par_iter()
        .filter(|var| is_valid_pointer_in(store, var))
        .map(|var| var.id)
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn select_candidate_pointers(store: &GraphStore) -> BTreeSet<NodeId> {
    select_candidate_pointers_seq(store)
}

fn select_candidate_pointers_seq(store: &GraphStore) -> BTreeSet<NodeId> {
    store
        .nodes()
        .filter(|var| is_valid_pointer_in(store, var))
        .map(|var| var.id)
        .collect()
}

impl<L: LayoutService> SvfIr<L> {
    /// Pointer-typed node with at least one incident statement
    pub fn is_valid_pointer(&self, node: NodeId) -> Result<bool> {
        let var = self.store.node(node)?;
        Ok(var.is_pointer && self.store.has_incident_edges(node)?)
    }

    /// Valid pointer that needs a top-level points-to set
    ///
    /// Requires a program value that is not a formal parameter of a function
    /// without any known caller.
    pub fn is_valid_top_level_ptr(&self, node: NodeId, callers: &dyn CallerInfo) -> Result<bool> {
        let var = self.store.node(node)?;
        if !var.is_top_level_ptr() || !self.is_valid_pointer(node)? {
            return Ok(false);
        }
        Ok(var
            .value
            .as_ref()
            .map_or(false, |value| !callers.is_arg_in_no_caller_function(value)))
    }

    /// Compute the candidate pointer set; call once construction is finished
    pub fn initialise_candidate_pointers(&mut self) -> &BTreeSet<NodeId> {
        self.candidate_pointers = select_candidate_pointers(&self.store);
        info!(
            "initialised {} candidate pointers out of {} nodes",
            self.candidate_pointers.len(),
            self.store.node_count()
        );
        &self.candidate_pointers
    }

    /// Candidate set from the last `initialise_candidate_pointers`
    #[inline]
    pub fn candidate_pointers(&self) -> &BTreeSet<NodeId> {
        &self.candidate_pointers
    }

    /// Every valid top-level pointer, in id order
    pub fn all_valid_ptrs(&self, callers: &dyn CallerInfo) -> Result<BTreeSet<NodeId>> {
        let mut ptrs = BTreeSet::new();
        for id in self.store.node_ids() {
            if self.is_valid_top_level_ptr(id, callers)? {
                ptrs.insert(id);
            }
        }
        Ok(ptrs)
    }
}
