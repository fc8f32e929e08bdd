//! IR size statistics

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use super::ir::SvfIr;
use crate::features::svfir::domain::StmtKind;
use crate::features::svfir::ports::LayoutService;

/// Node and statement counts of a built IR
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IrStats {
    pub total_nodes: usize,
    pub total_stmts: usize,
    /// Node kind name → count
    pub nodes_by_kind: BTreeMap<String, usize>,
    /// Statement kind name → count, kinds with no statement omitted
    pub stmts_by_kind: BTreeMap<String, usize>,
    /// Memory objects registered in the layout, reserved ones included
    pub mem_objects: usize,
    /// Ids handed out to value nodes (reserved pointers excluded)
    pub value_ids: usize,
    /// Ids handed out to front-end memory objects (reserved objects excluded)
    pub object_ids: usize,
    pub field_objects: usize,
    pub candidate_pointers: usize,
}

impl IrStats {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for IrStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SvfIr {{")?;
        writeln!(f, "  nodes: {}", self.total_nodes)?;
        for (kind, count) in &self.nodes_by_kind {
            writeln!(f, "    {}: {}", kind, count)?;
        }
        writeln!(f, "  stmts: {}", self.total_stmts)?;
        for (kind, count) in &self.stmts_by_kind {
            writeln!(f, "    {}: {}", kind, count)?;
        }
        writeln!(f, "  mem_objects: {}", self.mem_objects)?;
        writeln!(f, "  value_ids: {}", self.value_ids)?;
        writeln!(f, "  object_ids: {}", self.object_ids)?;
        writeln!(f, "  field_objects: {}", self.field_objects)?;
        writeln!(f, "  candidate_pointers: {}", self.candidate_pointers)?;
        writeln!(f, "}}")
    }
}

impl<L: LayoutService> SvfIr<L> {
    pub fn stats(&self) -> IrStats {
        let mut nodes_by_kind = BTreeMap::new();
        for var in self.store.nodes() {
            *nodes_by_kind.entry(var.kind.as_str().to_string()).or_insert(0) += 1;
        }
        let stmts_by_kind = StmtKind::ALL
            .iter()
            .map(|&kind| (kind, self.stmt_index.count(kind)))
            .filter(|&(_, count)| count > 0)
            .map(|(kind, count)| (kind.as_str().to_string(), count))
            .collect();

        IrStats {
            total_nodes: self.store.node_count(),
            total_stmts: self.store.stmt_count(),
            nodes_by_kind,
            stmts_by_kind,
            mem_objects: self.layout.num_mem_objs(),
            value_ids: self.ids.num_values(),
            object_ids: self.ids.num_objects(),
            field_objects: self.ids.num_gep_objects(),
            candidate_pointers: self.candidate_pointers.len(),
        }
    }
}
