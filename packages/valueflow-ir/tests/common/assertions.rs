//! Custom assertions for IR verification

use valueflow_ir::features::svfir::SvfIr;
use valueflow_ir::{NodeId, StmtKind};

/// Assert the number of statements of one kind
pub fn assert_stmt_count(ir: &SvfIr, kind: StmtKind, expected: usize) {
    let stmts: Vec<String> = ir.stmts_of_kind(kind).map(|s| s.to_string()).collect();
    assert_eq!(
        stmts.len(),
        expected,
        "Expected {expected} {kind} statements, got: {:?}",
        stmts
    );
}

/// Assert exactly one statement of `kind` runs from `src` to `dst`
pub fn assert_single_edge(ir: &SvfIr, kind: StmtKind, src: NodeId, dst: NodeId) {
    let matching = ir
        .stmts_of_kind(kind)
        .filter(|s| s.src == src && s.dst == dst)
        .count();
    assert_eq!(
        matching, 1,
        "Expected one {kind} edge {src} -> {dst}, found {matching}"
    );
}
