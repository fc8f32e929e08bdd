//! IR nodes
//!
//! Value nodes stand for scalar or pointer values; object nodes stand for
//! memory objects or one of their fields. Every node is addressed by its
//! `NodeId`; adjacency lives in the graph store, not here.

use super::location_set::LocationSet;
use crate::shared::models::{FunctionId, InstId, MemObjId, NodeId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Program value a node was created for
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceValue {
    /// Front-end name of the value (e.g. "%p" or "main::argv")
    pub name: String,

    /// Set when the value is a formal parameter of this function
    pub formal_param_of: Option<FunctionId>,
}

impl SourceValue {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            formal_param_of: None,
        }
    }

    /// A formal parameter of `func`
    pub fn formal_param(name: impl Into<String>, func: FunctionId) -> Self {
        Self {
            name: name.into(),
            formal_param_of: Some(func),
        }
    }
}

/// Node variants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Ordinary value
    Val,
    /// Synthetic field value of a base pointer, one per (instruction, base, offset)
    GepVal {
        base: NodeId,
        ls: LocationSet,
        inst: InstId,
    },
    /// Unique return value of a function
    RetVal { func: FunctionId },
    /// Unique variadic argument value of a function
    VarargVal { func: FunctionId },
    /// Value with no program counterpart (blackhole and null pointers)
    DummyVal,
    /// A whole memory object
    FIObj { mem: MemObjId },
    /// One field of a memory object at a normalized offset
    GepObj { mem: MemObjId, ls: LocationSet },
    /// Placeholder object with no program value (blackhole, constants, unknown allocations)
    DummyObj { mem: MemObjId },
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Val => "Val",
            NodeKind::GepVal { .. } => "GepVal",
            NodeKind::RetVal { .. } => "RetVal",
            NodeKind::VarargVal { .. } => "VarargVal",
            NodeKind::DummyVal => "DummyVal",
            NodeKind::FIObj { .. } => "FIObj",
            NodeKind::GepObj { .. } => "GepObj",
            NodeKind::DummyObj { .. } => "DummyObj",
        }
    }
}

/// A node of the value-flow IR
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SvfVar {
    pub id: NodeId,
    pub kind: NodeKind,
    /// Program value this node models, if any
    pub value: Option<SourceValue>,
    /// Static classification: the node may hold an address
    pub is_pointer: bool,
}

impl SvfVar {
    #[inline]
    pub fn new(id: NodeId, kind: NodeKind, value: Option<SourceValue>, is_pointer: bool) -> Self {
        Self {
            id,
            kind,
            value,
            is_pointer,
        }
    }

    /// Object node (whole object, field, or dummy object)
    #[inline]
    pub fn is_obj(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::FIObj { .. } | NodeKind::GepObj { .. } | NodeKind::DummyObj { .. }
        )
    }

    /// Value node: a candidate for a top-level (non-field) points-to set
    #[inline]
    pub fn is_top_level_ptr(&self) -> bool {
        !self.is_obj()
    }

    /// Memory object behind an object node
    #[inline]
    pub fn mem_obj(&self) -> Option<MemObjId> {
        match self.kind {
            NodeKind::FIObj { mem } | NodeKind::GepObj { mem, .. } | NodeKind::DummyObj { mem } => {
                Some(mem)
            }
            _ => None,
        }
    }

    /// Offset carried by field objects and field values
    #[inline]
    pub fn location_set(&self) -> Option<LocationSet> {
        match self.kind {
            NodeKind::GepObj { ls, .. } | NodeKind::GepVal { ls, .. } => Some(ls),
            _ => None,
        }
    }

    #[inline]
    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }
}

impl fmt::Display for SvfVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.as_str(), self.id)?;
        if let Some(ref value) = self.value {
            write!(f, "({})", value.name)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_classification() {
        let fi = SvfVar::new(4, NodeKind::FIObj { mem: 4 }, None, true);
        let field = SvfVar::new(
            99,
            NodeKind::GepObj {
                mem: 4,
                ls: LocationSet::new(1),
            },
            None,
            true,
        );
        let val = SvfVar::new(5, NodeKind::Val, Some(SourceValue::new("%p")), true);

        assert!(fi.is_obj() && field.is_obj());
        assert!(!val.is_obj());
        assert!(val.is_top_level_ptr());
        assert_eq!(field.mem_obj(), Some(4));
        assert_eq!(field.location_set(), Some(LocationSet::new(1)));
        assert_eq!(val.mem_obj(), None);
    }

    #[test]
    fn test_formal_param_value() {
        let v = SourceValue::formal_param("argv", 3);
        assert_eq!(v.formal_param_of, Some(3));
        assert_eq!(SourceValue::new("x").formal_param_of, None);
    }

    #[test]
    fn test_display() {
        let val = SvfVar::new(5, NodeKind::Val, Some(SourceValue::new("%p")), true);
        assert_eq!(val.to_string(), "Val5(%p)");
        assert_eq!(SvfVar::new(3, NodeKind::DummyVal, None, true).to_string(), "DummyVal3");
    }
}
