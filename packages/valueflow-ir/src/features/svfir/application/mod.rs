//! Application layer: the `SvfIr` context object and its operations

mod base_resolver;
mod candidates;
mod field_resolver;
mod ir;
mod query_client;
mod stats;
mod stmt_factory;

pub use ir::SvfIr;
pub use query_client::{AliasQueryClient, DefaultQueryClient, FunptrQueryClient};
pub use stats::IrStats;
