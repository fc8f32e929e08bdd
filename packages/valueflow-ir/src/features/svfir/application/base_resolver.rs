//! Base-pointer and offset resolution for pointer arithmetic
//!
//! Every gep statement is attached to the *base* of its source, so a chain
//! `p1 = p0 + a; p2 = p1 + b` is stored as `p0 --gep(a)--> p1` and
//! `p0 --gep(a+b)--> p2`. Once a variable offset shows up on a path, every
//! gep built from it is variant.

use tracing::debug;

use super::ir::SvfIr;
use crate::errors::{Result, ValueFlowError};
use crate::features::svfir::domain::{LocationSet, NodeKind, StmtData, StmtKind, SvfStmt, SvfVar};
use crate::features::svfir::ports::LayoutService;
use crate::shared::models::{InstId, NodeId, StmtId};

/// `base + delta` as seen from `node`
pub(super) fn compose_offset(
    node: NodeId,
    base: LocationSet,
    delta: LocationSet,
) -> Result<LocationSet> {
    base.checked_add(delta)
        .ok_or(ValueFlowError::OffsetOverflow {
            node,
            offset: base.offset(),
            delta: delta.offset(),
        })
}

impl<L: LayoutService> SvfIr<L> {
    /// The single incoming gep statement of `node`, if any
    fn incoming_geps(&self, node: NodeId) -> Result<Vec<StmtId>> {
        let mut geps = self.store.incoming_edges(node, StmtKind::NormalGep)?;
        geps.extend(self.store.incoming_edges(node, StmtKind::VariantGep)?);
        Ok(geps)
    }

    fn incoming_gep(&self, node: NodeId) -> Result<Option<&SvfStmt>> {
        let geps = self.incoming_geps(node)?;
        match geps.len() {
            0 => Ok(None),
            1 => Ok(self.store.stmt(geps[0])),
            count => Err(ValueFlowError::MultipleGepEdges { node, count }),
        }
    }

    /// Node `node` was derived from by pointer arithmetic, or `node` itself
    pub fn base_of(&self, node: NodeId) -> Result<NodeId> {
        Ok(self.incoming_gep(node)?.map_or(node, |gep| gep.src))
    }

    /// Offset of `node` from its base
    ///
    /// `None` when the node is reached through a variant gep, whose offset is
    /// not known statically.
    pub fn accumulated_offset(&self, node: NodeId) -> Result<Option<LocationSet>> {
        Ok(match self.incoming_gep(node)? {
            None => Some(LocationSet::ZERO),
            Some(gep) => gep.location_set(),
        })
    }

    /// Whether `node` is reached through a variant gep
    pub fn has_incoming_variant_gep(&self, node: NodeId) -> Result<bool> {
        self.store.has_incoming_edges(node, StmtKind::VariantGep)
    }

    /// `dst = src + ls`
    ///
    /// Builds a normal gep when `const_gep` holds and `src` has a static
    /// offset, a variant gep otherwise.
    pub fn add_gep_stmt(
        &mut self,
        src: NodeId,
        dst: NodeId,
        ls: LocationSet,
        const_gep: bool,
    ) -> Result<StmtId> {
        if !const_gep {
            return self.add_variant_gep_stmt(src, dst);
        }
        if self.has_incoming_variant_gep(src)? {
            debug!(
                "gep {} -> {} becomes variant: source has a variant offset",
                src, dst
            );
            return self.add_variant_gep_stmt(src, dst);
        }
        self.add_normal_gep_stmt(src, dst, ls)
    }

    /// Normal gep from the base of `src`, offset composed with the base's
    pub fn add_normal_gep_stmt(
        &mut self,
        src: NodeId,
        dst: NodeId,
        ls: LocationSet,
    ) -> Result<StmtId> {
        let base_ls = self.accumulated_offset(src)?.unwrap_or(LocationSet::ZERO);
        let base = self.base_of(src)?;
        if let Some(existing) = self.store.find_edge(StmtKind::NormalGep, base, dst) {
            return Ok(existing);
        }
        self.check_no_incoming_gep(dst)?;
        let ls = compose_offset(src, base_ls, ls)?;
        self.get_or_insert_stmt(base, dst, StmtData::NormalGep { ls })
    }

    /// Variant gep from the base of `src`
    pub fn add_variant_gep_stmt(&mut self, src: NodeId, dst: NodeId) -> Result<StmtId> {
        let base = self.base_of(src)?;
        if let Some(existing) = self.store.find_edge(StmtKind::VariantGep, base, dst) {
            return Ok(existing);
        }
        self.check_no_incoming_gep(dst)?;
        self.get_or_insert_stmt(base, dst, StmtData::VariantGep)
    }

    /// Reject a gep into `dst` when one already ends there
    fn check_no_incoming_gep(&self, dst: NodeId) -> Result<()> {
        let existing = self.incoming_geps(dst)?.len();
        if existing > 0 {
            return Err(ValueFlowError::MultipleGepEdges {
                node: dst,
                count: existing + 1,
            });
        }
        Ok(())
    }

    /// Field value of `ptr` at `ls` for instruction `inst`
    ///
    /// One node per (instruction, base pointer, offset from base); creating it
    /// also emits the gep statement from `ptr`.
    pub fn gep_val_var(
        &mut self,
        inst: InstId,
        ptr: NodeId,
        ls: LocationSet,
        is_pointer: bool,
    ) -> Result<NodeId> {
        let base = self.base_of(ptr)?;
        let offset = match self.accumulated_offset(ptr)? {
            Some(base_ls) => compose_offset(ptr, base_ls, ls)?,
            None => ls,
        };
        if let Some(&id) = self.gep_val_map.get(&(inst, base, offset)) {
            return Ok(id);
        }

        let id = self.ids.allocate_value_id()?;
        let value = self.store.node(ptr)?.value.clone();
        self.store.add_node(SvfVar::new(
            id,
            NodeKind::GepVal {
                base,
                ls: offset,
                inst,
            },
            value,
            is_pointer,
        ))?;
        self.gep_val_map.insert((inst, base, offset), id);
        self.add_gep_stmt(ptr, id, ls, true)?;
        Ok(id)
    }
}
