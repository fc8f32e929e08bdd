//! Shared models

pub mod ids;

pub use ids::{CallSiteId, FunctionId, IcfgNodeId, InstId, MemObjId, NodeId, StmtId};
