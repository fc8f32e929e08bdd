//! Candidate query clients
//!
//! A client decides which pointers a demand-driven solver is asked about.

use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use super::ir::SvfIr;
use crate::errors::Result;
use crate::features::svfir::domain::StmtKind;
use crate::features::svfir::ports::{CallerInfo, LayoutService, QueryClient};
use crate::shared::models::{CallSiteId, NodeId};

/// Queries every valid top-level pointer, or only the ones set by the user
#[derive(Debug, Clone, Default)]
pub struct DefaultQueryClient {
    user_input: BTreeSet<NodeId>,
    candidate_queries: BTreeSet<NodeId>,
}

impl DefaultQueryClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict collection to explicitly requested pointers
    pub fn set_query(&mut self, ptr: NodeId) {
        self.user_input.insert(ptr);
    }

    /// No user query set: every valid top-level pointer is queried
    #[inline]
    pub fn solve_all(&self) -> bool {
        self.user_input.is_empty()
    }
}

impl QueryClient for DefaultQueryClient {
    fn collect_candidate_queries<L: LayoutService>(
        &mut self,
        ir: &SvfIr<L>,
        callers: &dyn CallerInfo,
    ) -> Result<&BTreeSet<NodeId>> {
        self.candidate_queries = if self.solve_all() {
            ir.all_valid_ptrs(callers)?
        } else {
            let mut queries = BTreeSet::new();
            for &ptr in &self.user_input {
                if ir.is_valid_top_level_ptr(ptr, callers)? {
                    queries.insert(ptr);
                } else {
                    debug!("dropping user query {}: not a valid top-level pointer", ptr);
                }
            }
            queries
        };
        Ok(&self.candidate_queries)
    }

    fn candidate_queries(&self) -> &BTreeSet<NodeId> {
        &self.candidate_queries
    }
}

/// Queries the pointers dereferenced by loads and stores or offset by geps
#[derive(Debug, Clone, Default)]
pub struct AliasQueryClient {
    load_src_nodes: BTreeSet<NodeId>,
    store_dst_nodes: BTreeSet<NodeId>,
    gep_src_nodes: BTreeSet<NodeId>,
    candidate_queries: BTreeSet<NodeId>,
}

impl AliasQueryClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_src_nodes(&self) -> &BTreeSet<NodeId> {
        &self.load_src_nodes
    }

    pub fn store_dst_nodes(&self) -> &BTreeSet<NodeId> {
        &self.store_dst_nodes
    }

    pub fn gep_src_nodes(&self) -> &BTreeSet<NodeId> {
        &self.gep_src_nodes
    }
}

impl QueryClient for AliasQueryClient {
    fn collect_candidate_queries<L: LayoutService>(
        &mut self,
        ir: &SvfIr<L>,
        callers: &dyn CallerInfo,
    ) -> Result<&BTreeSet<NodeId>> {
        self.load_src_nodes.clear();
        self.store_dst_nodes.clear();
        self.gep_src_nodes.clear();
        self.candidate_queries.clear();

        for stmt in ir.stmts_of_kind(StmtKind::Load) {
            if ir.is_valid_top_level_ptr(stmt.src, callers)? {
                self.load_src_nodes.insert(stmt.src);
            }
        }
        for stmt in ir.stmts_of_kind(StmtKind::Store) {
            if ir.is_valid_top_level_ptr(stmt.dst, callers)? {
                self.store_dst_nodes.insert(stmt.dst);
            }
        }
        for kind in [StmtKind::NormalGep, StmtKind::VariantGep] {
            for stmt in ir.stmts_of_kind(kind) {
                if ir.is_valid_top_level_ptr(stmt.src, callers)? {
                    self.gep_src_nodes.insert(stmt.src);
                }
            }
        }

        self.candidate_queries.extend(&self.load_src_nodes);
        self.candidate_queries.extend(&self.store_dst_nodes);
        self.candidate_queries.extend(&self.gep_src_nodes);
        Ok(&self.candidate_queries)
    }

    fn candidate_queries(&self) -> &BTreeSet<NodeId> {
        &self.candidate_queries
    }
}

/// Queries the function pointers of indirect call sites
#[derive(Debug, Clone, Default)]
pub struct FunptrQueryClient {
    fun_ptr_to_call_site: BTreeMap<NodeId, CallSiteId>,
    candidate_queries: BTreeSet<NodeId>,
}

impl FunptrQueryClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Indirect call site a queried function pointer was collected from
    pub fn call_site_of(&self, fun_ptr: NodeId) -> Option<CallSiteId> {
        self.fun_ptr_to_call_site.get(&fun_ptr).copied()
    }
}

impl QueryClient for FunptrQueryClient {
    fn collect_candidate_queries<L: LayoutService>(
        &mut self,
        ir: &SvfIr<L>,
        callers: &dyn CallerInfo,
    ) -> Result<&BTreeSet<NodeId>> {
        self.fun_ptr_to_call_site.clear();
        self.candidate_queries.clear();

        for (call_site, fun_ptr) in ir.indirect_call_sites() {
            if ir.is_valid_top_level_ptr(fun_ptr, callers)? {
                self.candidate_queries.insert(fun_ptr);
                self.fun_ptr_to_call_site.insert(fun_ptr, call_site);
            }
        }
        Ok(&self.candidate_queries)
    }

    fn candidate_queries(&self) -> &BTreeSet<NodeId> {
        &self.candidate_queries
    }
}
