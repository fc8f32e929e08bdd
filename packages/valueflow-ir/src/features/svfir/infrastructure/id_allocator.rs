//! Node identifier allocation
//!
//! Ordinary value and object ids come from one dense counter below
//! `GEP_ID_FLOOR`. Field-object ids live above the floor and are a pure
//! function of (base, offset, field limit):
//!
//! ```text
//! gep_id = GEP_ID_FLOOR + base * max_field_limit + offset     (offset < max_field_limit)
//! ```
//!
//! Two different triples with the same limit never map to the same id, and
//! no field-object id can equal an ordinary id.

use crate::errors::{Result, ValueFlowError};
use crate::shared::models::NodeId;

/// Reserved: blackhole object
pub const BLACK_HOLE_OBJ_ID: NodeId = 0;
/// Reserved: constant object
pub const CONSTANT_OBJ_ID: NodeId = 1;
/// Reserved: blackhole pointer
pub const BLACK_HOLE_PTR_ID: NodeId = 2;
/// Reserved: null pointer
pub const NULL_PTR_ID: NodeId = 3;
/// First id handed out by the dense counter
pub const FIRST_FREE_ID: NodeId = 4;

/// Lowest field-object id
pub const GEP_ID_FLOOR: NodeId = 1 << 40;

/// Deterministic node id allocator
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next_id: NodeId,
    num_values: usize,
    num_objects: usize,
    num_gep_objects: usize,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdAllocator {
    pub fn new() -> Self {
        Self {
            next_id: FIRST_FREE_ID,
            num_values: 0,
            num_objects: 0,
            num_gep_objects: 0,
        }
    }

    #[inline]
    fn allocate_dense(&mut self, what: &str) -> Result<NodeId> {
        if self.next_id >= GEP_ID_FLOOR {
            return Err(ValueFlowError::IdSpaceExhausted(format!(
                "no {} ids left below {}",
                what, GEP_ID_FLOOR
            )));
        }
        let id = self.next_id;
        self.next_id += 1;
        Ok(id)
    }

    pub fn allocate_value_id(&mut self) -> Result<NodeId> {
        let id = self.allocate_dense("value")?;
        self.num_values += 1;
        Ok(id)
    }

    pub fn allocate_object_id(&mut self) -> Result<NodeId> {
        let id = self.allocate_dense("object")?;
        self.num_objects += 1;
        Ok(id)
    }

    /// Id of the field object of `base` at a normalized `offset`
    pub fn allocate_gep_object_id(
        &mut self,
        base: NodeId,
        offset: u32,
        max_field_limit: u32,
    ) -> Result<NodeId> {
        let id = Self::gep_object_id(base, offset, max_field_limit)?;
        self.num_gep_objects += 1;
        Ok(id)
    }

    /// The id `allocate_gep_object_id` returns, without counting it
    pub fn gep_object_id(base: NodeId, offset: u32, max_field_limit: u32) -> Result<NodeId> {
        if base >= GEP_ID_FLOOR {
            return Err(ValueFlowError::IdSpaceExhausted(format!(
                "field object base {} is itself a field object id",
                base
            )));
        }
        if offset >= max_field_limit {
            return Err(ValueFlowError::IdSpaceExhausted(format!(
                "offset {} outside field limit {}",
                offset, max_field_limit
            )));
        }
        base.checked_mul(max_field_limit as NodeId)
            .and_then(|scaled| scaled.checked_add(offset as NodeId))
            .and_then(|rel| rel.checked_add(GEP_ID_FLOOR))
            .ok_or_else(|| {
                ValueFlowError::IdSpaceExhausted(format!(
                    "field object id overflow for base {} offset {}",
                    base, offset
                ))
            })
    }

    #[inline]
    pub fn is_gep_object_id(id: NodeId) -> bool {
        id >= GEP_ID_FLOOR
    }

    pub fn num_values(&self) -> usize {
        self.num_values
    }

    pub fn num_objects(&self) -> usize {
        self.num_objects
    }

    pub fn num_gep_objects(&self) -> usize {
        self.num_gep_objects
    }
}
