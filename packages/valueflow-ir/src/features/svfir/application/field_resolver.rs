//! Field-sensitive object resolution
//!
//! Maps (memory object, offset) to the node standing for that field. Offsets
//! are first normalized by the layout service so that at most
//! `max_field_offset_limit` field nodes ever exist per object.

use tracing::debug;

use super::base_resolver::compose_offset;
use super::ir::SvfIr;
use crate::errors::{Result, ValueFlowError};
use crate::features::svfir::domain::{LocationSet, NodeKind, SvfVar};
use crate::features::svfir::infrastructure::NodeBitSet;
use crate::features::svfir::ports::LayoutService;
use crate::shared::models::{MemObjId, NodeId};

static NO_FIELDS: NodeBitSet = NodeBitSet::new();

impl<L: LayoutService> SvfIr<L> {
    /// Field node of `mem` at `ls`, created on first use
    pub fn gep_obj_var(&mut self, mem: MemObjId, ls: LocationSet) -> Result<NodeId> {
        let obj = self
            .layout
            .mem_obj(mem)
            .ok_or(ValueFlowError::UnknownMemObj(mem))?;
        if obj.is_field_insensitive() {
            return self.fi_obj_var(mem);
        }

        let normalized = self.layout.modulus_offset(obj, ls);
        if self.config.first_field_eq_base && normalized.is_zero() {
            return self.fi_obj_var(mem);
        }

        match self.gep_obj_map.get(&(mem, normalized)) {
            Some(&id) => Ok(id),
            None => self.add_gep_obj_node(mem, normalized),
        }
    }

    /// Field node at `ls` relative to object node `node`
    ///
    /// A field node composes its own offset with `ls` first, so nested field
    /// accesses land on the same node as one flat access.
    pub fn gep_obj_var_from_node(&mut self, node: NodeId, ls: LocationSet) -> Result<NodeId> {
        let kind = self.store.node(node)?.kind.clone();
        match kind {
            NodeKind::GepObj { mem, ls: base_ls } => {
                let ls = compose_offset(node, base_ls, ls)?;
                self.gep_obj_var(mem, ls)
            }
            NodeKind::FIObj { mem } | NodeKind::DummyObj { mem } => self.gep_obj_var(mem, ls),
            _ => Err(ValueFlowError::NotAnObject(node)),
        }
    }

    fn add_gep_obj_node(&mut self, mem: MemObjId, ls: LocationSet) -> Result<NodeId> {
        if self.gep_obj_map.contains_key(&(mem, ls)) {
            return Err(ValueFlowError::DuplicateFieldObject {
                base: mem,
                offset: ls.offset(),
            });
        }
        let offset = u32::try_from(ls.offset()).map_err(|_| {
            ValueFlowError::IdSpaceExhausted(format!(
                "normalized offset {} of mem obj {} is not a field index",
                ls, mem
            ))
        })?;
        let limit = self.layout.max_field_limit();
        let id = self.ids.allocate_gep_object_id(mem, offset, limit)?;
        let is_pointer = self
            .layout
            .mem_obj(mem)
            .map_or(false, |obj| obj.has_ptr_obj);

        self.store
            .add_node(SvfVar::new(id, NodeKind::GepObj { mem, ls }, None, is_pointer))?;
        self.gep_obj_map.insert((mem, ls), id);
        self.mem_to_fields.entry(mem).or_default().insert(id);
        debug!("created field object {} for mem obj {} at {}", id, mem, ls);
        Ok(id)
    }

    /// Every field node created for `mem`, including its field-insensitive node
    pub fn all_field_obj_vars(&self, mem: MemObjId) -> &NodeBitSet {
        self.mem_to_fields.get(&mem).unwrap_or(&NO_FIELDS)
    }

    /// `all_field_obj_vars` for the memory object behind `node`
    pub fn all_field_obj_vars_of_node(&self, node: NodeId) -> Result<&NodeBitSet> {
        let mem = self
            .store
            .node(node)?
            .mem_obj()
            .ok_or(ValueFlowError::NotAnObject(node))?;
        Ok(self.all_field_obj_vars(mem))
    }

    /// Field nodes of the object behind `node` as analyses should see them:
    /// just the field-insensitive node once the object is collapsed
    pub fn fields_after_collapse(&mut self, node: NodeId) -> Result<NodeBitSet> {
        let mem = self
            .store
            .node(node)?
            .mem_obj()
            .ok_or(ValueFlowError::NotAnObject(node))?;
        if self.mem_obj(mem)?.is_field_insensitive() {
            let fi = self.fi_obj_var(mem)?;
            return Ok(NodeBitSet::singleton(fi));
        }
        Ok(self.all_field_obj_vars(mem).clone())
    }

    /// Mark `mem` field-insensitive; later resolutions return its single node
    pub fn collapse_fields(&mut self, mem: MemObjId) -> Result<NodeId> {
        let obj = self
            .layout
            .mem_obj_mut(mem)
            .ok_or(ValueFlowError::UnknownMemObj(mem))?;
        if !obj.is_field_insensitive() {
            obj.set_field_insensitive();
            debug!("collapsed fields of mem obj {}", mem);
        }
        self.fi_obj_var(mem)
    }

    /// Number of field objects created so far
    pub fn num_field_objects(&self) -> usize {
        self.gep_obj_map.len()
    }
}
