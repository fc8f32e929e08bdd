//! Ports (interfaces) of the value-flow IR
//!
//! - **LayoutService**: symbol-table/type-layout facts about memory objects
//! - **CallerInfo**: call-graph facts used by candidate selection
//! - **QueryClient**: strategy for picking which pointers a solver should query

use crate::errors::Result;
use crate::features::svfir::application::SvfIr;
use crate::features::svfir::domain::{LocationSet, MemObj, SourceValue};
use crate::shared::models::{FunctionId, MemObjId, NodeId};
use std::collections::BTreeSet;

/// Symbol-table and type-layout services
///
/// Owns every registered `MemObj`; the IR only keeps identifiers.
pub trait LayoutService {
    /// Register a memory object under its id
    fn register_mem_obj(&mut self, obj: MemObj);

    fn mem_obj(&self, id: MemObjId) -> Option<&MemObj>;

    fn mem_obj_mut(&mut self, id: MemObjId) -> Option<&mut MemObj>;

    /// Number of registered memory objects, reserved ones included
    fn num_mem_objs(&self) -> usize;

    /// Global cap on field objects per memory object
    fn max_field_limit(&self) -> u32;

    /// Normalize an offset into `obj`'s field range
    fn modulus_offset(&self, obj: &MemObj, ls: LocationSet) -> LocationSet;
}

/// Call-graph facts
pub trait CallerInfo {
    /// Whether any call site statically reaches `func`
    fn has_caller(&self, func: FunctionId) -> bool;

    /// A formal parameter of a function nobody calls
    fn is_arg_in_no_caller_function(&self, value: &SourceValue) -> bool {
        value
            .formal_param_of
            .map_or(false, |func| !self.has_caller(func))
    }
}

/// Candidate query collection for a points-to client
///
/// # Example
/// ```ignore
/// let mut client = DefaultQueryClient::new();
/// client.set_query(p);
/// let queries = client.collect_candidate_queries(&ir, &call_graph)?;
/// ```
pub trait QueryClient {
    /// Compute and remember the candidate queries for `ir`
    fn collect_candidate_queries<L: LayoutService>(
        &mut self,
        ir: &SvfIr<L>,
        callers: &dyn CallerInfo,
    ) -> Result<&BTreeSet<NodeId>>;

    /// Queries computed by the last collection
    fn candidate_queries(&self) -> &BTreeSet<NodeId>;
}
