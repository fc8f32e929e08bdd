//! Domain models for the value-flow IR
//!
//! - LocationSet: accumulated gep offset
//! - MemObj: memory object layout facts
//! - SvfVar: value and object nodes
//! - SvfStmt: statement edges and the kind index

pub mod location_set;
pub mod mem_obj;
pub mod node;
pub mod stmt;

pub use location_set::LocationSet;
pub use mem_obj::{MemObj, MemObjDesc};
pub use node::{NodeKind, SourceValue, SvfVar};
pub use stmt::{EdgeLabel, StmtData, StmtIndex, StmtKind, SvfStmt};
