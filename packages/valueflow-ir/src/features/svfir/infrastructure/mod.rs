//! Infrastructure for the value-flow IR
//!
//! - **GraphStore**: petgraph-backed node/edge substrate with exact-key edge lookup
//! - **IdAllocator**: dense ids plus deterministic field-object ids
//! - **SymbolTable**: default `LayoutService`
//! - **StaticCallGraph**: default `CallerInfo`
//! - **NodeBitSet**: ordered node-id sets for field enumeration

pub mod call_graph;
pub mod graph_store;
pub mod id_allocator;
pub mod node_bitset;
pub mod symbol_table;

pub use call_graph::StaticCallGraph;
pub use graph_store::GraphStore;
pub use id_allocator::{
    IdAllocator, BLACK_HOLE_OBJ_ID, BLACK_HOLE_PTR_ID, CONSTANT_OBJ_ID, FIRST_FREE_ID,
    GEP_ID_FLOOR, NULL_PTR_ID,
};
pub use node_bitset::NodeBitSet;
pub use symbol_table::SymbolTable;
