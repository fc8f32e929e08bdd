//! End-to-end IR construction tests
//!
//! Drive the public API the way an instruction-by-instruction front end does
//! and check the canonical graph that results.

mod common;

use common::*;
use pretty_assertions::assert_eq;
use valueflow_ir::config::IrBuildConfig;
use valueflow_ir::features::svfir::{
    AliasQueryClient, DefaultQueryClient, LocationSet, MemObjDesc, NodeKind, QueryClient,
    SourceValue, StaticCallGraph, StmtKind,
};
use valueflow_ir::ValueFlowError;

#[test]
fn test_addr_then_repeated_copy() {
    let mut ir = empty_ir();
    let o1 = struct_obj(&mut ir, "o1", 1);
    let v1 = ptr(&mut ir, "v1");
    let v2 = ptr(&mut ir, "v2");

    let addr = ir.add_addr_stmt(o1, v1).unwrap();
    let first = ir.add_copy_stmt(v1, v2).unwrap();
    let second = ir.add_copy_stmt(v1, v2).unwrap();

    assert_eq!(first, second);
    assert_stmt_count(&ir, StmtKind::Copy, 1);
    assert_stmt_count(&ir, StmtKind::Addr, 1);
    assert_single_edge(&ir, StmtKind::Copy, v1, v2);
    assert_single_edge(&ir, StmtKind::Addr, o1, v1);
    assert_eq!(ir.stmt(addr).unwrap().to_string(), format!("{} -- ADDR --> {}", o1, v1));
}

#[test]
fn test_field_wrap_around_scenario() {
    let mut ir = empty_ir();
    let o = struct_obj(&mut ir, "O", 4);

    let ids: Vec<_> = [0, 1, 4, 5]
        .iter()
        .map(|&off| ir.gep_obj_var(o, LocationSet::new(off)).unwrap())
        .collect();

    assert_eq!(ids[0], ids[2]);
    assert_eq!(ids[1], ids[3]);
    assert_ne!(ids[0], ids[1]);
}

#[test]
fn test_every_constructor_is_idempotent() {
    let mut ir = empty_ir();
    let a = ptr(&mut ir, "a");
    let b = ptr(&mut ir, "b");
    let c = scalar(&mut ir, "c");

    let first = vec![
        ir.add_addr_stmt(a, b).unwrap(),
        ir.add_copy_stmt(a, b).unwrap(),
        ir.add_load_stmt(a, b).unwrap(),
        ir.add_store_stmt(a, b, 1).unwrap(),
        ir.add_call_pe(a, b, 2).unwrap(),
        ir.add_ret_pe(a, b, 2).unwrap(),
        ir.add_thread_fork_pe(a, b, 3).unwrap(),
        ir.add_thread_join_pe(a, b, 3).unwrap(),
        ir.add_cmp_stmt(a, b, c, 32).unwrap(),
        ir.add_binary_op_stmt(a, b, c, 13).unwrap(),
        ir.add_unary_op_stmt(a, c, 7).unwrap(),
        ir.add_branch_stmt(c, a, vec![1, 2]).unwrap(),
    ];
    let second = vec![
        ir.add_addr_stmt(a, b).unwrap(),
        ir.add_copy_stmt(a, b).unwrap(),
        ir.add_load_stmt(a, b).unwrap(),
        ir.add_store_stmt(a, b, 1).unwrap(),
        ir.add_call_pe(a, b, 2).unwrap(),
        ir.add_ret_pe(a, b, 2).unwrap(),
        ir.add_thread_fork_pe(a, b, 3).unwrap(),
        ir.add_thread_join_pe(a, b, 3).unwrap(),
        ir.add_cmp_stmt(a, b, c, 32).unwrap(),
        ir.add_binary_op_stmt(a, b, c, 13).unwrap(),
        ir.add_unary_op_stmt(a, c, 7).unwrap(),
        ir.add_branch_stmt(c, a, vec![1, 2]).unwrap(),
    ];

    assert_eq!(first, second);
    assert_eq!(ir.stmt_count(), first.len());
}

#[test]
fn test_store_label_discrimination() {
    let mut ir = empty_ir();
    let v = ptr(&mut ir, "v");
    let p = ptr(&mut ir, "p");

    let s1 = ir.add_store_stmt(v, p, 10).unwrap();
    let s2 = ir.add_store_stmt(v, p, 11).unwrap();
    assert_ne!(s1, s2);
    assert_eq!(ir.add_store_stmt(v, p, 10).unwrap(), s1);
    assert_stmt_count(&ir, StmtKind::Store, 2);
}

#[test]
fn test_phi_accumulation() {
    let mut ir = empty_ir();
    let res = ptr(&mut ir, "res");
    let ops: Vec<_> = (0..3).map(|i| ptr(&mut ir, &format!("op{}", i))).collect();

    for &op in &ops {
        ir.add_phi_stmt(res, op).unwrap();
    }

    assert_stmt_count(&ir, StmtKind::Phi, 1);
    let phi = ir.stmts_of_kind(StmtKind::Phi).next().unwrap();
    assert_eq!(phi.dst, res);
    assert_eq!(phi.phi_operands().unwrap().to_vec(), ops);
}

#[test]
fn test_field_insensitive_collapse() {
    let mut ir = empty_ir();
    let obj = ir
        .add_object(MemObjDesc::new("array").with_field_limit(16).field_insensitive())
        .unwrap();

    let a = ir.gep_obj_var(obj, LocationSet::new(3)).unwrap();
    let b = ir.gep_obj_var(obj, LocationSet::new(9)).unwrap();
    assert_eq!(a, b);
    assert_eq!(a, obj);
    assert_eq!(ir.node(a).unwrap().kind, NodeKind::FIObj { mem: obj });
}

#[test]
fn test_base_recovery_round_trip() {
    let mut ir = empty_ir();
    let (_, base) = alloc_site(&mut ir, "base", 8);
    let mid = ptr(&mut ir, "mid");
    let last = ptr(&mut ir, "last");

    ir.add_gep_stmt(base, mid, LocationSet::new(2), true).unwrap();
    ir.add_gep_stmt(mid, last, LocationSet::new(3), true).unwrap();

    assert_eq!(ir.base_of(last).unwrap(), base);
    assert_eq!(
        ir.accumulated_offset(last).unwrap(),
        Some(LocationSet::new(5))
    );
    assert_stmt_count(&ir, StmtKind::NormalGep, 2);
}

#[test]
fn test_variant_poisoning() {
    let mut ir = empty_ir();
    let (_, base) = alloc_site(&mut ir, "base", 8);
    let idx = ptr(&mut ir, "idx");
    let field = ptr(&mut ir, "field");
    let deeper = ptr(&mut ir, "deeper");

    ir.add_gep_stmt(base, idx, LocationSet::ZERO, false).unwrap();
    ir.add_gep_stmt(idx, field, LocationSet::new(1), true).unwrap();
    ir.add_gep_stmt(field, deeper, LocationSet::new(2), true).unwrap();

    assert_stmt_count(&ir, StmtKind::NormalGep, 0);
    assert_stmt_count(&ir, StmtKind::VariantGep, 3);
    assert_eq!(ir.base_of(deeper).unwrap(), base);
    assert!(ir.has_incoming_variant_gep(deeper).unwrap());
}

#[test]
fn test_candidate_selection_exclusion() {
    let mut ir = empty_ir();
    let (_, p) = alloc_site(&mut ir, "p", 1);
    let isolated = ptr(&mut ir, "isolated");
    let arg = ir
        .add_value_node(Some(SourceValue::formal_param("arg", 9)), true)
        .unwrap();
    ir.add_copy_stmt(p, arg).unwrap();

    let candidates = ir.initialise_candidate_pointers().clone();
    assert!(candidates.contains(&p));
    assert!(candidates.contains(&arg));
    assert!(!candidates.contains(&isolated));

    let no_callers = StaticCallGraph::new();
    assert!(!ir.is_valid_top_level_ptr(arg, &no_callers).unwrap());
    assert!(ir.is_valid_top_level_ptr(p, &no_callers).unwrap());

    let mut with_caller = StaticCallGraph::new();
    with_caller.add_call(77, 9);
    assert!(ir.is_valid_top_level_ptr(arg, &with_caller).unwrap());
}

#[test]
fn test_invariant_violations_are_reported() {
    let mut ir = empty_ir();
    let a = ptr(&mut ir, "a");
    let b = ptr(&mut ir, "b");
    let dst = ptr(&mut ir, "dst");

    ir.add_gep_stmt(a, dst, LocationSet::new(1), true).unwrap();
    let err = ir.add_gep_stmt(b, dst, LocationSet::new(1), true).unwrap_err();
    assert!(err.is_invariant_violation());
    assert_eq!(err.offending_nodes(), vec![dst]);

    let err = ir.add_load_stmt(a, 999_999).unwrap_err();
    assert!(matches!(err, ValueFlowError::UnknownNode(999_999)));
    assert!(!err.is_invariant_violation());
}

#[test]
fn test_field_values_and_field_objects_together() {
    // p = &s; q = &p->f1; *q = r
    let mut ir = empty_ir();
    let (s, p) = alloc_site(&mut ir, "p", 4);
    let r = ptr(&mut ir, "r");

    let q = ir.gep_val_var(100, p, LocationSet::new(1), true).unwrap();
    ir.add_store_stmt(r, q, 101).unwrap();
    let f1 = ir.gep_obj_var_from_node(s, LocationSet::new(1)).unwrap();

    assert_eq!(ir.base_of(q).unwrap(), p);
    assert_eq!(ir.node(f1).unwrap().location_set(), Some(LocationSet::new(1)));
    assert!(ir.all_field_obj_vars_of_node(s).unwrap().contains(f1));
    assert!(ir.all_field_obj_vars(s).contains(s));
}

#[test]
fn test_query_clients_over_built_ir() {
    let mut ir = empty_ir();
    let (_, p) = alloc_site(&mut ir, "p", 4);
    let q = ptr(&mut ir, "q");
    let r = ptr(&mut ir, "r");
    ir.add_load_stmt(p, q).unwrap();
    ir.add_store_stmt(q, r, 1).unwrap();
    ir.add_copy_stmt(p, r).unwrap();

    let cg = StaticCallGraph::new();
    let mut alias = AliasQueryClient::new();
    let alias_queries: Vec<_> = alias
        .collect_candidate_queries(&ir, &cg)
        .unwrap()
        .iter()
        .copied()
        .collect();
    assert_eq!(alias_queries, vec![p, r]);

    let mut all = DefaultQueryClient::new();
    let all_queries: Vec<_> = all
        .collect_candidate_queries(&ir, &cg)
        .unwrap()
        .iter()
        .copied()
        .collect();
    assert_eq!(all_queries, vec![p, q, r]);
}

#[test]
fn test_blackhole_policy_from_config() {
    let mut ir = ir_with(IrBuildConfig::default().handle_blackhole(true));
    let p = ptr(&mut ir, "p");
    ir.add_black_hole_addr_stmt(p).unwrap();
    assert_single_edge(&ir, StmtKind::Addr, ir.black_hole_obj(), p);

    let mut ir = empty_ir();
    let p = ptr(&mut ir, "p");
    ir.add_black_hole_addr_stmt(p).unwrap();
    assert_single_edge(&ir, StmtKind::Copy, ir.null_ptr(), p);
}

#[test]
fn test_stats_after_construction() {
    let mut ir = empty_ir();
    let (obj, p) = alloc_site(&mut ir, "p", 4);
    let q = ptr(&mut ir, "q");
    ir.add_copy_stmt(p, q).unwrap();
    ir.gep_obj_var(obj, LocationSet::new(2)).unwrap();
    ir.initialise_candidate_pointers();

    let stats = ir.stats();
    assert_eq!(stats.total_stmts, 2);
    assert_eq!(stats.field_objects, 1);
    assert_eq!(stats.candidate_pointers, 3);
    assert!(stats.to_json().unwrap().contains("\"field_objects\": 1"));
}
