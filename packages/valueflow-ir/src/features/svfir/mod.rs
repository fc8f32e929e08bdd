//! # Value-Flow IR (SVFIR)
//!
//! Sparse, deduplicated program graph for interprocedural pointer analysis.
//! A front end lowers instructions into typed statement edges between value
//! and object nodes; repeated lowering of the same operation lands on the same
//! edge.
//!
//! - **Statement factory**: one lookup-or-create constructor per statement kind
//! - **Field resolver**: (memory object, offset) → field node, bounded per object
//! - **Base resolver**: gep chains normalized onto their base pointer
//! - **Candidate selector**: pointers worth a points-to set, computed after construction
//!
//! ## Usage
//! ```
//! use valueflow_ir::config::IrBuildConfig;
//! use valueflow_ir::features::svfir::{LocationSet, MemObjDesc, SvfIr};
//!
//! let mut ir = SvfIr::new(IrBuildConfig::default()).unwrap();
//! let obj = ir.add_object(MemObjDesc::new("alloc:s").with_field_limit(4)).unwrap();
//!
//! let f1 = ir.gep_obj_var(obj, LocationSet::new(1)).unwrap();
//! let f5 = ir.gep_obj_var(obj, LocationSet::new(5)).unwrap();
//! assert_eq!(f1, f5);
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use application::{AliasQueryClient, DefaultQueryClient, FunptrQueryClient, IrStats, SvfIr};
pub use domain::{
    EdgeLabel, LocationSet, MemObj, MemObjDesc, NodeKind, SourceValue, StmtData, StmtKind,
    SvfStmt, SvfVar,
};
pub use infrastructure::{StaticCallGraph, SymbolTable};
pub use ports::{CallerInfo, LayoutService, QueryClient};
