//! Memory objects
//!
//! A memory object is an abstract allocation (stack slot, global, heap site,
//! or a placeholder). Its field nodes are created on demand by the field
//! resolver; the object itself only carries layout facts.

use crate::shared::models::MemObjId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Layout facts supplied by the front end when an object is registered
///
/// # Example
/// ```
/// use valueflow_ir::features::svfir::domain::MemObjDesc;
///
/// // struct Pair { int *a; int *b; }  allocated at line 12
/// let desc = MemObjDesc::new("alloc:12")
///     .with_type("Pair")
///     .with_field_limit(2)
///     .with_pointers();
/// assert_eq!(desc.max_field_offset_limit, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemObjDesc {
    /// Human-readable allocation site (e.g. "alloc:10:Foo")
    pub name: String,

    /// Declared type, if known
    pub type_info: Option<String>,

    /// Number of distinct field offsets the layout exposes
    pub max_field_offset_limit: u32,

    /// The whole object is modelled by one node
    pub field_insensitive: bool,

    /// The object may hold pointers
    pub has_ptr_obj: bool,
}

impl MemObjDesc {
    #[inline]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_info: None,
            max_field_offset_limit: 1,
            field_insensitive: false,
            has_ptr_obj: false,
        }
    }

    #[inline]
    pub fn with_type(mut self, type_info: impl Into<String>) -> Self {
        self.type_info = Some(type_info.into());
        self
    }

    #[inline]
    pub fn with_field_limit(mut self, limit: u32) -> Self {
        self.max_field_offset_limit = limit;
        self
    }

    #[inline]
    pub fn field_insensitive(mut self) -> Self {
        self.field_insensitive = true;
        self
    }

    #[inline]
    pub fn with_pointers(mut self) -> Self {
        self.has_ptr_obj = true;
        self
    }
}

/// A registered memory object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemObj {
    /// Also the id of the object's field-insensitive node
    pub id: MemObjId,

    pub name: String,

    pub type_info: Option<String>,

    /// Per-object field limit, already clamped to the global limit
    pub max_field_offset_limit: u32,

    field_insensitive: bool,

    pub has_ptr_obj: bool,
}

impl MemObj {
    pub fn from_desc(id: MemObjId, desc: MemObjDesc) -> Self {
        Self {
            id,
            name: desc.name,
            type_info: desc.type_info,
            max_field_offset_limit: desc.max_field_offset_limit,
            field_insensitive: desc.field_insensitive,
            has_ptr_obj: desc.has_ptr_obj,
        }
    }

    #[inline]
    pub fn is_field_insensitive(&self) -> bool {
        self.field_insensitive
    }

    /// Collapse every field of this object onto its field-insensitive node
    #[inline]
    pub fn set_field_insensitive(&mut self) {
        self.field_insensitive = true;
    }
}

impl fmt::Display for MemObj {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.type_info {
            Some(ref ty) => write!(f, "{}:{}#{}", self.name, ty, self.id),
            None => write!(f, "{}#{}", self.name, self.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_desc_defaults() {
        let desc = MemObjDesc::new("alloc:1");
        assert_eq!(desc.max_field_offset_limit, 1);
        assert!(!desc.field_insensitive);
        assert!(!desc.has_ptr_obj);
    }

    #[test]
    fn test_collapse() {
        let mut obj = MemObj::from_desc(7, MemObjDesc::new("alloc:7").with_field_limit(4));
        assert!(!obj.is_field_insensitive());
        obj.set_field_insensitive();
        assert!(obj.is_field_insensitive());
    }

    #[test]
    fn test_display() {
        let obj = MemObj::from_desc(9, MemObjDesc::new("alloc:3").with_type("Node"));
        assert_eq!(obj.to_string(), "alloc:3:Node#9");
    }
}
