//! Default layout service: an in-memory symbol table of memory objects

use rustc_hash::FxHashMap;
use tracing::warn;

use crate::features::svfir::domain::{LocationSet, MemObj};
use crate::features::svfir::ports::LayoutService;
use crate::shared::models::MemObjId;

/// Memory-object registry with modulus offset normalization
#[derive(Debug, Clone)]
pub struct SymbolTable {
    mem_objs: FxHashMap<MemObjId, MemObj>,
    max_field_limit: u32,
}

impl SymbolTable {
    pub fn new(max_field_limit: u32) -> Self {
        Self {
            mem_objs: FxHashMap::default(),
            max_field_limit,
        }
    }

    pub fn len(&self) -> usize {
        self.mem_objs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mem_objs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MemObj> + '_ {
        self.mem_objs.values()
    }
}

impl LayoutService for SymbolTable {
    fn register_mem_obj(&mut self, mut obj: MemObj) {
        if obj.max_field_offset_limit > self.max_field_limit {
            warn!(
                "mem obj {} declares {} fields, clamped to {}",
                obj, obj.max_field_offset_limit, self.max_field_limit
            );
            obj.max_field_offset_limit = self.max_field_limit;
        }
        self.mem_objs.insert(obj.id, obj);
    }

    #[inline]
    fn mem_obj(&self, id: MemObjId) -> Option<&MemObj> {
        self.mem_objs.get(&id)
    }

    #[inline]
    fn mem_obj_mut(&mut self, id: MemObjId) -> Option<&mut MemObj> {
        self.mem_objs.get_mut(&id)
    }

    #[inline]
    fn num_mem_objs(&self) -> usize {
        self.len()
    }

    #[inline]
    fn max_field_limit(&self) -> u32 {
        self.max_field_limit
    }

    /// Offsets past the object's field limit wrap onto earlier fields.
    /// A negative offset is taken by absolute value so it still lands inside
    /// the object; an object with no fields maps everything to offset 0.
    fn modulus_offset(&self, obj: &MemObj, ls: LocationSet) -> LocationSet {
        let mut offset = ls.offset();
        if offset < 0 {
            warn!(
                "negative offset {} into mem obj {}, using its absolute value",
                offset, obj
            );
            offset = offset.saturating_abs();
        }
        let limit = obj.max_field_offset_limit as i64;
        if limit == 0 {
            LocationSet::ZERO
        } else {
            LocationSet::new(offset % limit)
        }
    }
}
