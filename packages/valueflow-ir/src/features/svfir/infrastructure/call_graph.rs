//! Static call graph facts for candidate selection
//!
//! The front end records every resolved call edge; a function that never
//! appears as a callee has no statically known caller.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::features::svfir::ports::CallerInfo;
use crate::shared::models::{CallSiteId, FunctionId};

/// Callee → call sites that reach it
#[derive(Debug, Clone, Default)]
pub struct StaticCallGraph {
    callers: FxHashMap<FunctionId, FxHashSet<CallSiteId>>,
    entry_points: FxHashSet<FunctionId>,
}

impl StaticCallGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `call_site` may call `callee`
    pub fn add_call(&mut self, call_site: CallSiteId, callee: FunctionId) {
        self.callers.entry(callee).or_default().insert(call_site);
    }

    /// Treat `func` as called from outside the program (e.g. `main`)
    pub fn add_entry_point(&mut self, func: FunctionId) {
        self.entry_points.insert(func);
    }

    pub fn call_sites_of(&self, callee: FunctionId) -> impl Iterator<Item = CallSiteId> + '_ {
        self.callers
            .get(&callee)
            .into_iter()
            .flat_map(|sites| sites.iter().copied())
    }
}

impl CallerInfo for StaticCallGraph {
    fn has_caller(&self, func: FunctionId) -> bool {
        self.entry_points.contains(&func)
            || self.callers.get(&func).map_or(false, |sites| !sites.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::svfir::domain::SourceValue;

    #[test]
    fn test_has_caller() {
        let mut cg = StaticCallGraph::new();
        cg.add_call(100, 1);
        cg.add_entry_point(0);

        assert!(cg.has_caller(1));
        assert!(cg.has_caller(0));
        assert!(!cg.has_caller(2));
        assert_eq!(cg.call_sites_of(1).collect::<Vec<_>>(), vec![100]);
    }

    #[test]
    fn test_arg_in_no_caller_function() {
        let mut cg = StaticCallGraph::new();
        cg.add_call(100, 1);

        assert!(!cg.is_arg_in_no_caller_function(&SourceValue::formal_param("a", 1)));
        assert!(cg.is_arg_in_no_caller_function(&SourceValue::formal_param("b", 2)));
        assert!(!cg.is_arg_in_no_caller_function(&SourceValue::new("local")));
    }
}
