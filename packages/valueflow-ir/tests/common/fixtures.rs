//! Test fixtures
//!
//! Small IRs built the way a front end would build them.

use valueflow_ir::config::IrBuildConfig;
use valueflow_ir::features::svfir::{MemObjDesc, SourceValue, SvfIr};
use valueflow_ir::NodeId;

/// Empty IR with the default (balanced) configuration
pub fn empty_ir() -> SvfIr {
    SvfIr::new(IrBuildConfig::default()).expect("default config is valid")
}

/// Empty IR with a custom configuration
pub fn ir_with(config: IrBuildConfig) -> SvfIr {
    SvfIr::new(config).expect("test config is valid")
}

/// Named pointer value
pub fn ptr(ir: &mut SvfIr, name: &str) -> NodeId {
    ir.add_value_node(Some(SourceValue::new(name)), true)
        .expect("value node")
}

/// Named non-pointer value
pub fn scalar(ir: &mut SvfIr, name: &str) -> NodeId {
    ir.add_value_node(Some(SourceValue::new(name)), false)
        .expect("value node")
}

/// Heap object with `fields` field slots that may hold pointers
pub fn struct_obj(ir: &mut SvfIr, name: &str, fields: u32) -> NodeId {
    ir.add_object(
        MemObjDesc::new(name)
            .with_type("struct")
            .with_field_limit(fields)
            .with_pointers(),
    )
    .expect("object node")
}

/// `p = &o` for a fresh object and pointer
pub fn alloc_site(ir: &mut SvfIr, name: &str, fields: u32) -> (NodeId, NodeId) {
    let obj = struct_obj(ir, &format!("alloc:{}", name), fields);
    let p = ptr(ir, name);
    ir.add_addr_stmt(obj, p).expect("addr stmt");
    (obj, p)
}
