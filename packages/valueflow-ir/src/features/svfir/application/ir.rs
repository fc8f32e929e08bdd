//! The value-flow IR context object
//!
//! `SvfIr` owns the graph store, the id allocator, the layout service and
//! every dedup map. The front end creates nodes through the methods below and
//! statements through the statement factory (`stmt_factory.rs`); field objects
//! come from the field resolver (`field_resolver.rs`) and gep statements from
//! the base resolver (`base_resolver.rs`).
//!
//! # Usage
//! ```
//! use valueflow_ir::config::IrBuildConfig;
//! use valueflow_ir::features::svfir::{MemObjDesc, SourceValue, SvfIr};
//!
//! let mut ir = SvfIr::new(IrBuildConfig::default()).unwrap();
//! let o1 = ir.add_object(MemObjDesc::new("alloc:1").with_pointers()).unwrap();
//! let v1 = ir.add_value_node(Some(SourceValue::new("%v1")), true).unwrap();
//! let v2 = ir.add_value_node(Some(SourceValue::new("%v2")), true).unwrap();
//!
//! ir.add_addr_stmt(o1, v1).unwrap();
//! let copy = ir.add_copy_stmt(v1, v2).unwrap();
//! assert_eq!(ir.add_copy_stmt(v1, v2).unwrap(), copy);
//! ```

use rustc_hash::FxHashMap;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::config::IrBuildConfig;
use crate::errors::{Result, ValueFlowError};
use crate::features::svfir::domain::{
    LocationSet, MemObj, MemObjDesc, NodeKind, SourceValue, StmtIndex, StmtKind, SvfStmt, SvfVar,
};
use crate::features::svfir::infrastructure::{
    GraphStore, IdAllocator, NodeBitSet, SymbolTable, BLACK_HOLE_OBJ_ID, BLACK_HOLE_PTR_ID,
    CONSTANT_OBJ_ID, NULL_PTR_ID,
};
use crate::features::svfir::ports::LayoutService;
use crate::shared::models::{CallSiteId, FunctionId, InstId, MemObjId, NodeId, StmtId};

/// Sparse, deduplicated value-flow IR
#[derive(Debug)]
pub struct SvfIr<L: LayoutService = SymbolTable> {
    pub(super) config: IrBuildConfig,
    pub(super) store: GraphStore,
    pub(super) ids: IdAllocator,
    pub(super) layout: L,
    /// Kind → statements, creation order
    pub(super) stmt_index: StmtIndex,
    /// Result node → its phi statement
    pub(super) phi_map: FxHashMap<NodeId, StmtId>,
    /// (memory object, normalized offset) → field object
    pub(super) gep_obj_map: FxHashMap<(MemObjId, LocationSet), NodeId>,
    /// Memory object → every field node created for it
    pub(super) mem_to_fields: FxHashMap<MemObjId, NodeBitSet>,
    /// (instruction, base pointer, offset) → field value
    pub(super) gep_val_map: FxHashMap<(InstId, NodeId, LocationSet), NodeId>,
    /// Indirect call site → function pointer it calls through
    pub(super) indirect_call_sites: BTreeMap<CallSiteId, NodeId>,
    pub(super) candidate_pointers: BTreeSet<NodeId>,
}

impl SvfIr<SymbolTable> {
    /// Create an IR backed by the default symbol table
    pub fn new(config: IrBuildConfig) -> Result<Self> {
        config.validate()?;
        let layout = SymbolTable::new(config.max_field_limit);
        Self::with_layout(config, layout)
    }
}

impl<L: LayoutService> SvfIr<L> {
    /// Create an IR over a caller-supplied layout service
    pub fn with_layout(config: IrBuildConfig, layout: L) -> Result<Self> {
        config.validate()?;
        let mut ir = Self {
            config,
            store: GraphStore::new(),
            ids: IdAllocator::new(),
            layout,
            stmt_index: StmtIndex::new(),
            phi_map: FxHashMap::default(),
            gep_obj_map: FxHashMap::default(),
            mem_to_fields: FxHashMap::default(),
            gep_val_map: FxHashMap::default(),
            indirect_call_sites: BTreeMap::new(),
            candidate_pointers: BTreeSet::new(),
        };
        ir.init_special_nodes()?;
        Ok(ir)
    }

    fn init_special_nodes(&mut self) -> Result<()> {
        let black_hole = MemObjDesc::new("blackhole").field_insensitive().with_pointers();
        let constant = MemObjDesc::new("constant").field_insensitive();
        self.layout
            .register_mem_obj(MemObj::from_desc(BLACK_HOLE_OBJ_ID, black_hole));
        self.layout
            .register_mem_obj(MemObj::from_desc(CONSTANT_OBJ_ID, constant));

        self.insert_obj_node(BLACK_HOLE_OBJ_ID, NodeKind::DummyObj { mem: BLACK_HOLE_OBJ_ID })?;
        self.insert_obj_node(CONSTANT_OBJ_ID, NodeKind::DummyObj { mem: CONSTANT_OBJ_ID })?;
        self.store
            .add_node(SvfVar::new(BLACK_HOLE_PTR_ID, NodeKind::DummyVal, None, true))?;
        self.store
            .add_node(SvfVar::new(NULL_PTR_ID, NodeKind::DummyVal, None, true))?;
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Configuration
    // ═══════════════════════════════════════════════════════════════════════

    #[inline]
    pub fn config(&self) -> &IrBuildConfig {
        &self.config
    }

    /// Switch the unknown-origin policy; set once before construction starts
    pub fn handle_blackhole(&mut self, enabled: bool) {
        self.config.handle_blackhole = enabled;
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Special Nodes
    // ═══════════════════════════════════════════════════════════════════════

    #[inline]
    pub fn black_hole_obj(&self) -> NodeId {
        BLACK_HOLE_OBJ_ID
    }

    #[inline]
    pub fn constant_obj(&self) -> NodeId {
        CONSTANT_OBJ_ID
    }

    #[inline]
    pub fn black_hole_ptr(&self) -> NodeId {
        BLACK_HOLE_PTR_ID
    }

    #[inline]
    pub fn null_ptr(&self) -> NodeId {
        NULL_PTR_ID
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Node Creation
    // ═══════════════════════════════════════════════════════════════════════

    /// Add a value node for a program value (or a temporary when `value` is None)
    pub fn add_value_node(&mut self, value: Option<SourceValue>, is_pointer: bool) -> Result<NodeId> {
        let id = self.ids.allocate_value_id()?;
        self.store
            .add_node(SvfVar::new(id, NodeKind::Val, value, is_pointer))
    }

    /// Add the unique return node of `func`
    pub fn add_ret_node(&mut self, func: FunctionId, is_pointer: bool) -> Result<NodeId> {
        let id = self.ids.allocate_value_id()?;
        self.store
            .add_node(SvfVar::new(id, NodeKind::RetVal { func }, None, is_pointer))
    }

    /// Add the unique variadic-argument node of `func`
    pub fn add_vararg_node(&mut self, func: FunctionId, is_pointer: bool) -> Result<NodeId> {
        let id = self.ids.allocate_value_id()?;
        self.store
            .add_node(SvfVar::new(id, NodeKind::VarargVal { func }, None, is_pointer))
    }

    /// Add a value node with no program counterpart
    pub fn add_dummy_value_node(&mut self, is_pointer: bool) -> Result<NodeId> {
        let id = self.ids.allocate_value_id()?;
        self.store
            .add_node(SvfVar::new(id, NodeKind::DummyVal, None, is_pointer))
    }

    /// Register a memory object without creating any node for it
    pub fn add_mem_obj(&mut self, mut desc: MemObjDesc) -> Result<MemObjId> {
        if !self.config.field_sensitive {
            desc.field_insensitive = true;
        }
        let id = self.ids.allocate_object_id()?;
        self.layout.register_mem_obj(MemObj::from_desc(id, desc));
        Ok(id)
    }

    /// Register a memory object and create its field-insensitive node
    pub fn add_object(&mut self, desc: MemObjDesc) -> Result<NodeId> {
        let mem = self.add_mem_obj(desc)?;
        self.fi_obj_var(mem)
    }

    /// Register a placeholder object (unknown allocation) and its node
    pub fn add_dummy_object(&mut self, desc: MemObjDesc) -> Result<NodeId> {
        let mem = self.add_mem_obj(desc)?;
        self.insert_obj_node(mem, NodeKind::DummyObj { mem })
    }

    /// Field-insensitive node of `mem`, created on first reference
    ///
    /// Dummy objects are their own field-insensitive node.
    pub fn fi_obj_var(&mut self, mem: MemObjId) -> Result<NodeId> {
        if self.layout.mem_obj(mem).is_none() {
            return Err(ValueFlowError::UnknownMemObj(mem));
        }
        if self.store.contains_node(mem) {
            return Ok(mem);
        }
        self.insert_obj_node(mem, NodeKind::FIObj { mem })
    }

    /// Create an object node whose id equals its memory object id
    fn insert_obj_node(&mut self, mem: MemObjId, kind: NodeKind) -> Result<NodeId> {
        let is_pointer = self
            .layout
            .mem_obj(mem)
            .map(|obj| obj.has_ptr_obj)
            .ok_or(ValueFlowError::UnknownMemObj(mem))?;
        let kind_name = kind.as_str();
        self.store
            .add_node(SvfVar::new(mem, kind, None, is_pointer))?;
        self.mem_to_fields.entry(mem).or_default().insert(mem);
        debug!("created {} node {}", kind_name, mem);
        Ok(mem)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Indirect Call Sites
    // ═══════════════════════════════════════════════════════════════════════

    /// Record that `call_site` calls through the function pointer `fun_ptr`
    pub fn add_indirect_call_site(&mut self, call_site: CallSiteId, fun_ptr: NodeId) -> Result<()> {
        self.store.node(fun_ptr)?;
        self.indirect_call_sites.insert(call_site, fun_ptr);
        Ok(())
    }

    #[inline]
    pub fn is_indirect_call_site(&self, call_site: CallSiteId) -> bool {
        self.indirect_call_sites.contains_key(&call_site)
    }

    /// Function pointer behind an indirect call site
    #[inline]
    pub fn fun_ptr_of(&self, call_site: CallSiteId) -> Option<NodeId> {
        self.indirect_call_sites.get(&call_site).copied()
    }

    /// Indirect call sites with their function pointers, in call-site order
    pub fn indirect_call_sites(&self) -> impl Iterator<Item = (CallSiteId, NodeId)> + '_ {
        self.indirect_call_sites.iter().map(|(&cs, &ptr)| (cs, ptr))
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Queries
    // ═══════════════════════════════════════════════════════════════════════

    #[inline]
    pub fn node(&self, id: NodeId) -> Result<&SvfVar> {
        self.store.node(id)
    }

    #[inline]
    pub fn contains_node(&self, id: NodeId) -> bool {
        self.store.contains_node(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &SvfVar> + '_ {
        self.store.nodes()
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.store.node_count()
    }

    #[inline]
    pub fn stmt(&self, id: StmtId) -> Option<&SvfStmt> {
        self.store.stmt(id)
    }

    #[inline]
    pub fn stmt_count(&self) -> usize {
        self.store.stmt_count()
    }

    /// Every statement of `kind`, in creation order
    pub fn stmts_of_kind(&self, kind: StmtKind) -> impl Iterator<Item = &SvfStmt> + '_ {
        self.stmt_index
            .of_kind(kind)
            .iter()
            .filter_map(move |&id| self.store.stmt(id))
    }

    /// Incoming statements of `kind` at `node`
    pub fn incoming_stmts(&self, node: NodeId, kind: StmtKind) -> Result<Vec<&SvfStmt>> {
        Ok(self
            .store
            .incoming_edges(node, kind)?
            .into_iter()
            .filter_map(|id| self.store.stmt(id))
            .collect())
    }

    /// Outgoing statements of `kind` at `node`
    pub fn outgoing_stmts(&self, node: NodeId, kind: StmtKind) -> Result<Vec<&SvfStmt>> {
        Ok(self
            .store
            .outgoing_edges(node, kind)?
            .into_iter()
            .filter_map(|id| self.store.stmt(id))
            .collect())
    }

    #[inline]
    pub fn layout(&self) -> &L {
        &self.layout
    }

    #[inline]
    pub fn mem_obj(&self, id: MemObjId) -> Result<&MemObj> {
        self.layout
            .mem_obj(id)
            .ok_or(ValueFlowError::UnknownMemObj(id))
    }

    /// Memory object behind an object node
    pub fn mem_obj_of_node(&self, node: NodeId) -> Result<&MemObj> {
        let mem = self
            .store
            .node(node)?
            .mem_obj()
            .ok_or(ValueFlowError::NotAnObject(node))?;
        self.mem_obj(mem)
    }
}
