//! Node/edge substrate
//!
//! A petgraph multigraph holds nodes and statement edges (edge weight is the
//! statement id). Statements themselves live in an arena indexed by `StmtId`,
//! and an exact-key index answers "does an edge of this kind (and label)
//! already connect src to dst" in O(1).

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use rustc_hash::FxHashMap;

use crate::errors::{Result, ValueFlowError};
use crate::features::svfir::domain::{EdgeLabel, StmtData, StmtKind, SvfStmt, SvfVar};
use crate::shared::models::{NodeId, StmtId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct EdgeKey {
    kind: StmtKind,
    src: NodeId,
    dst: NodeId,
    label: Option<EdgeLabel>,
}

/// Id of the statement stored at arena index `len`
fn stmt_id_for(len: usize) -> Result<StmtId> {
    StmtId::try_from(len).map_err(|_| {
        ValueFlowError::IdSpaceExhausted(format!("statement arena holds {} statements", len))
    })
}

/// Graph storage for IR nodes and statements
#[derive(Debug, Default, Clone)]
pub struct GraphStore {
    graph: DiGraph<SvfVar, StmtId>,
    node_index: FxHashMap<NodeId, NodeIndex>,
    stmts: Vec<SvfStmt>,
    edge_keys: FxHashMap<EdgeKey, StmtId>,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Nodes
    // ═══════════════════════════════════════════════════════════════════════

    /// Register a node under its own id
    pub fn add_node(&mut self, var: SvfVar) -> Result<NodeId> {
        let id = var.id;
        if self.node_index.contains_key(&id) {
            return Err(ValueFlowError::DuplicateNode(id));
        }
        let idx = self.graph.add_node(var);
        self.node_index.insert(id, idx);
        Ok(id)
    }

    #[inline]
    pub fn contains_node(&self, id: NodeId) -> bool {
        self.node_index.contains_key(&id)
    }

    #[inline]
    fn index_of(&self, id: NodeId) -> Result<NodeIndex> {
        self.node_index
            .get(&id)
            .copied()
            .ok_or(ValueFlowError::UnknownNode(id))
    }

    /// Look up a node; unknown ids are a caller defect
    #[inline]
    pub fn node(&self, id: NodeId) -> Result<&SvfVar> {
        let idx = self.index_of(id)?;
        Ok(&self.graph[idx])
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &SvfVar> + '_ {
        self.graph.node_weights()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.graph.node_weights().map(|var| var.id)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Edges
    // ═══════════════════════════════════════════════════════════════════════

    /// Existing unlabeled edge of `kind` from `src` to `dst`
    #[inline]
    pub fn find_edge(&self, kind: StmtKind, src: NodeId, dst: NodeId) -> Option<StmtId> {
        self.find_labeled_edge(kind, src, dst, None)
    }

    /// Existing edge of `kind` from `src` to `dst` carrying `label`
    #[inline]
    pub fn find_labeled_edge(
        &self,
        kind: StmtKind,
        src: NodeId,
        dst: NodeId,
        label: Option<EdgeLabel>,
    ) -> Option<StmtId> {
        self.edge_keys
            .get(&EdgeKey {
                kind,
                src,
                dst,
                label,
            })
            .copied()
    }

    /// Insert a new statement edge; both endpoints must exist
    pub fn insert_edge(&mut self, src: NodeId, dst: NodeId, data: StmtData) -> Result<StmtId> {
        let src_idx = self.index_of(src)?;
        let dst_idx = self.index_of(dst)?;

        let id = stmt_id_for(self.stmts.len())?;
        let stmt = SvfStmt::new(id, src, dst, data);
        let key = EdgeKey {
            kind: stmt.kind(),
            src,
            dst,
            label: stmt.label(),
        };

        self.graph.add_edge(src_idx, dst_idx, id);
        self.edge_keys.insert(key, id);
        self.stmts.push(stmt);
        Ok(id)
    }

    #[inline]
    pub fn stmt(&self, id: StmtId) -> Option<&SvfStmt> {
        self.stmts.get(id as usize)
    }

    #[inline]
    pub fn stmt_mut(&mut self, id: StmtId) -> Option<&mut SvfStmt> {
        self.stmts.get_mut(id as usize)
    }

    pub fn stmt_count(&self) -> usize {
        self.stmts.len()
    }

    pub fn stmts(&self) -> &[SvfStmt] {
        &self.stmts
    }

    fn edges_of_kind(
        &self,
        node: NodeId,
        kind: StmtKind,
        direction: Direction,
    ) -> Result<Vec<StmtId>> {
        let idx = self.index_of(node)?;
        Ok(self
            .graph
            .edges_directed(idx, direction)
            .map(|edge| *edge.weight())
            .filter(|&id| self.stmts[id as usize].kind() == kind)
            .collect())
    }

    /// Incoming statements of one kind
    pub fn incoming_edges(&self, node: NodeId, kind: StmtKind) -> Result<Vec<StmtId>> {
        self.edges_of_kind(node, kind, Direction::Incoming)
    }

    /// Outgoing statements of one kind
    pub fn outgoing_edges(&self, node: NodeId, kind: StmtKind) -> Result<Vec<StmtId>> {
        self.edges_of_kind(node, kind, Direction::Outgoing)
    }

    /// Whether any edge of `kind` ends at `node`
    pub fn has_incoming_edges(&self, node: NodeId, kind: StmtKind) -> Result<bool> {
        let idx = self.index_of(node)?;
        Ok(self
            .graph
            .edges_directed(idx, Direction::Incoming)
            .any(|edge| self.stmts[*edge.weight() as usize].kind() == kind))
    }

    /// Whether any edge starts or ends at `node`
    pub fn has_incident_edges(&self, node: NodeId) -> Result<bool> {
        let idx = self.index_of(node)?;
        Ok(self.graph.neighbors_undirected(idx).next().is_some())
    }
}
