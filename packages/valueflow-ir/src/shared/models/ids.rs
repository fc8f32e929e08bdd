//! Identifier types shared by every IR component
//!
//! All cross references inside the IR (statement endpoints, base objects,
//! phi operands, field maps) are plain identifiers, never borrowed references.

/// Node identifier (value or object node)
pub type NodeId = u64;

/// Statement identifier (dense index into the statement arena)
pub type StmtId = u32;

/// Memory object identifier; equals the id of the object's field-insensitive node
pub type MemObjId = NodeId;

/// Originating instruction (intra-procedural ICFG node) of a store or field value
pub type InstId = u64;

/// Call site identifier (call ICFG node)
pub type CallSiteId = u64;

/// ICFG node identifier (branch successors)
pub type IcfgNodeId = u64;

/// Function identifier, as assigned by the front end
pub type FunctionId = u32;
