//! Statement factory
//!
//! One constructor per statement kind. Each constructor is lookup-or-create:
//! an existing edge with the same (kind, src, dst, label) is returned as is,
//! otherwise a new statement is inserted and registered in the kind index.
//! Phi is the exception and is keyed by its result node alone.

use tracing::trace;

use super::ir::SvfIr;
use crate::errors::Result;
use crate::features::svfir::domain::StmtData;
use crate::features::svfir::ports::LayoutService;
use crate::shared::models::{CallSiteId, IcfgNodeId, InstId, NodeId, StmtId};

impl<L: LayoutService> SvfIr<L> {
    /// Return the statement equal to `(src, dst, data)` or create it
    pub(super) fn get_or_insert_stmt(
        &mut self,
        src: NodeId,
        dst: NodeId,
        data: StmtData,
    ) -> Result<StmtId> {
        let kind = data.kind();
        if let Some(existing) = self.store.find_labeled_edge(kind, src, dst, data.label()) {
            return Ok(existing);
        }
        let id = self.store.insert_edge(src, dst, data)?;
        self.stmt_index.add(kind, id);
        trace!("new {} statement #{}: {} -> {}", kind, id, src, dst);
        Ok(id)
    }

    /// `dst = &src`
    pub fn add_addr_stmt(&mut self, src: NodeId, dst: NodeId) -> Result<StmtId> {
        self.get_or_insert_stmt(src, dst, StmtData::Addr)
    }

    /// `dst = src`
    pub fn add_copy_stmt(&mut self, src: NodeId, dst: NodeId) -> Result<StmtId> {
        self.get_or_insert_stmt(src, dst, StmtData::Copy)
    }

    /// `res = phi(.., op, ..)`
    ///
    /// The first call for `res` creates the statement with the edge `op -> res`;
    /// later calls append `op` to its operand list.
    pub fn add_phi_stmt(&mut self, res: NodeId, op: NodeId) -> Result<StmtId> {
        if let Some(&id) = self.phi_map.get(&res) {
            self.store.node(op)?;
            if let Some(stmt) = self.store.stmt_mut(id) {
                if let StmtData::Phi { ref mut operands } = stmt.data {
                    operands.push(op);
                }
            }
            return Ok(id);
        }
        let id = self.get_or_insert_stmt(op, res, StmtData::Phi { operands: vec![op] })?;
        self.phi_map.insert(res, id);
        Ok(id)
    }

    /// Phi statement whose result is `res`
    pub fn phi_stmt(&self, res: NodeId) -> Option<StmtId> {
        self.phi_map.get(&res).copied()
    }

    /// `dst = op1 <predicate> op2`; the edge runs op1 -> dst, labeled by op2
    pub fn add_cmp_stmt(
        &mut self,
        op1: NodeId,
        op2: NodeId,
        dst: NodeId,
        predicate: u32,
    ) -> Result<StmtId> {
        self.store.node(op2)?;
        self.get_or_insert_stmt(
            op1,
            dst,
            StmtData::Cmp {
                operands: [op1, op2],
                predicate,
            },
        )
    }

    /// `dst = op1 <opcode> op2`; the edge runs op1 -> dst, labeled by op2
    pub fn add_binary_op_stmt(
        &mut self,
        op1: NodeId,
        op2: NodeId,
        dst: NodeId,
        opcode: u32,
    ) -> Result<StmtId> {
        self.store.node(op2)?;
        self.get_or_insert_stmt(
            op1,
            dst,
            StmtData::BinaryOp {
                operands: [op1, op2],
                opcode,
            },
        )
    }

    /// `dst = <opcode> src`
    pub fn add_unary_op_stmt(&mut self, src: NodeId, dst: NodeId, opcode: u32) -> Result<StmtId> {
        self.get_or_insert_stmt(src, dst, StmtData::UnaryOp { opcode })
    }

    /// Conditional branch `br` on `cond`; the edge runs cond -> br
    pub fn add_branch_stmt(
        &mut self,
        br: NodeId,
        cond: NodeId,
        successors: Vec<IcfgNodeId>,
    ) -> Result<StmtId> {
        self.get_or_insert_stmt(cond, br, StmtData::Branch { successors })
    }

    /// `dst = *src`
    pub fn add_load_stmt(&mut self, src: NodeId, dst: NodeId) -> Result<StmtId> {
        self.get_or_insert_stmt(src, dst, StmtData::Load)
    }

    /// `*dst = src`, one statement per store instruction
    pub fn add_store_stmt(&mut self, src: NodeId, dst: NodeId, inst: InstId) -> Result<StmtId> {
        self.get_or_insert_stmt(src, dst, StmtData::Store { inst })
    }

    /// Actual-to-formal parameter passing at `call_site`
    pub fn add_call_pe(
        &mut self,
        src: NodeId,
        dst: NodeId,
        call_site: CallSiteId,
    ) -> Result<StmtId> {
        self.get_or_insert_stmt(src, dst, StmtData::Call { call_site })
    }

    /// Return value flowing back to the receiver at `call_site`
    pub fn add_ret_pe(&mut self, src: NodeId, dst: NodeId, call_site: CallSiteId) -> Result<StmtId> {
        self.get_or_insert_stmt(src, dst, StmtData::Ret { call_site })
    }

    /// Argument passed to a spawned thread routine at `call_site`
    pub fn add_thread_fork_pe(
        &mut self,
        src: NodeId,
        dst: NodeId,
        call_site: CallSiteId,
    ) -> Result<StmtId> {
        self.get_or_insert_stmt(src, dst, StmtData::ThreadFork { call_site })
    }

    /// Thread routine result flowing to the joining site `call_site`
    pub fn add_thread_join_pe(
        &mut self,
        src: NodeId,
        dst: NodeId,
        call_site: CallSiteId,
    ) -> Result<StmtId> {
        self.get_or_insert_stmt(src, dst, StmtData::ThreadJoin { call_site })
    }

    /// Give `node` an unknown origin
    ///
    /// With the blackhole policy on this is `node = &blackhole`, otherwise
    /// `node = null`.
    pub fn add_black_hole_addr_stmt(&mut self, node: NodeId) -> Result<StmtId> {
        if self.config.handle_blackhole {
            self.add_addr_stmt(self.black_hole_obj(), node)
        } else {
            self.add_copy_stmt(self.null_ptr(), node)
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::IrBuildConfig;
    use crate::errors::ValueFlowError;
    use crate::features::svfir::application::SvfIr;
    use crate::features::svfir::domain::{StmtKind, SourceValue};
    use crate::shared::models::NodeId;

    fn ir_with_values(n: usize) -> (SvfIr, Vec<NodeId>) {
        let mut ir = SvfIr::new(IrBuildConfig::default()).unwrap();
        let values = (0..n)
            .map(|i| {
                ir.add_value_node(Some(SourceValue::new(format!("%v{}", i))), true)
                    .unwrap()
            })
            .collect();
        (ir, values)
    }

    #[test]
    fn test_unlabeled_kinds_are_idempotent() {
        let (mut ir, v) = ir_with_values(2);
        let load = ir.add_load_stmt(v[0], v[1]).unwrap();
        let unary = ir.add_unary_op_stmt(v[0], v[1], 3).unwrap();
        let branch = ir.add_branch_stmt(v[1], v[0], vec![10, 11]).unwrap();

        assert_eq!(ir.add_load_stmt(v[0], v[1]).unwrap(), load);
        assert_eq!(ir.add_unary_op_stmt(v[0], v[1], 3).unwrap(), unary);
        assert_eq!(ir.add_branch_stmt(v[1], v[0], vec![10, 11]).unwrap(), branch);
        assert_eq!(ir.stmt_count(), 3);
    }

    #[test]
    fn test_same_pair_different_kinds_coexist() {
        let (mut ir, v) = ir_with_values(2);
        let copy = ir.add_copy_stmt(v[0], v[1]).unwrap();
        let load = ir.add_load_stmt(v[0], v[1]).unwrap();
        assert_ne!(copy, load);
        assert_eq!(ir.stmts_of_kind(StmtKind::Copy).count(), 1);
        assert_eq!(ir.stmts_of_kind(StmtKind::Load).count(), 1);
    }

    #[test]
    fn test_store_label_discrimination() {
        let (mut ir, v) = ir_with_values(2);
        let s1 = ir.add_store_stmt(v[0], v[1], 100).unwrap();
        let s2 = ir.add_store_stmt(v[0], v[1], 200).unwrap();
        assert_ne!(s1, s2);
        assert_eq!(ir.add_store_stmt(v[0], v[1], 100).unwrap(), s1);
        assert_eq!(ir.stmts_of_kind(StmtKind::Store).count(), 2);
    }

    #[test]
    fn test_call_site_labels() {
        let (mut ir, v) = ir_with_values(2);
        let c1 = ir.add_call_pe(v[0], v[1], 1).unwrap();
        let c2 = ir.add_call_pe(v[0], v[1], 2).unwrap();
        let r1 = ir.add_ret_pe(v[0], v[1], 1).unwrap();
        let f1 = ir.add_thread_fork_pe(v[0], v[1], 1).unwrap();
        let j1 = ir.add_thread_join_pe(v[0], v[1], 1).unwrap();

        assert_ne!(c1, c2);
        assert_eq!(ir.add_call_pe(v[0], v[1], 1).unwrap(), c1);
        assert_eq!(ir.add_ret_pe(v[0], v[1], 1).unwrap(), r1);
        assert_eq!(ir.add_thread_fork_pe(v[0], v[1], 1).unwrap(), f1);
        assert_eq!(ir.add_thread_join_pe(v[0], v[1], 1).unwrap(), j1);
        assert_eq!(ir.stmt(c2).unwrap().call_site(), Some(2));
    }

    #[test]
    fn test_cmp_and_binary_labeled_by_second_operand() {
        let (mut ir, v) = ir_with_values(4);
        let c1 = ir.add_cmp_stmt(v[0], v[1], v[3], 32).unwrap();
        let c2 = ir.add_cmp_stmt(v[0], v[2], v[3], 32).unwrap();
        assert_ne!(c1, c2);
        assert_eq!(ir.add_cmp_stmt(v[0], v[1], v[3], 32).unwrap(), c1);

        let b1 = ir.add_binary_op_stmt(v[0], v[1], v[3], 13).unwrap();
        assert_eq!(ir.add_binary_op_stmt(v[0], v[1], v[3], 13).unwrap(), b1);
    }

    #[test]
    fn test_phi_accumulates_operands_in_order() {
        let (mut ir, v) = ir_with_values(4);
        let res = v[3];
        let p1 = ir.add_phi_stmt(res, v[0]).unwrap();
        let p2 = ir.add_phi_stmt(res, v[1]).unwrap();
        let p3 = ir.add_phi_stmt(res, v[2]).unwrap();

        assert_eq!(p1, p2);
        assert_eq!(p2, p3);
        assert_eq!(ir.phi_stmt(res), Some(p1));
        let phi = ir.stmt(p1).unwrap();
        assert_eq!(phi.phi_operands(), Some(&[v[0], v[1], v[2]][..]));
        assert_eq!(phi.src, v[0]);
        assert_eq!(ir.stmts_of_kind(StmtKind::Phi).count(), 1);
    }

    #[test]
    fn test_phi_rejects_unknown_operand() {
        let (mut ir, v) = ir_with_values(2);
        ir.add_phi_stmt(v[1], v[0]).unwrap();
        assert!(matches!(
            ir.add_phi_stmt(v[1], 9_999),
            Err(ValueFlowError::UnknownNode(9_999))
        ));
    }

    #[test]
    fn test_unknown_node_is_rejected() {
        let (mut ir, v) = ir_with_values(1);
        let err = ir.add_copy_stmt(v[0], 4_242).unwrap_err();
        assert!(matches!(err, ValueFlowError::UnknownNode(4_242)));
        assert!(!err.is_invariant_violation());
        assert_eq!(ir.stmt_count(), 0);
    }

    #[test]
    fn test_black_hole_policy_off_copies_null() {
        let (mut ir, v) = ir_with_values(1);
        let id = ir.add_black_hole_addr_stmt(v[0]).unwrap();
        let stmt = ir.stmt(id).unwrap();
        assert_eq!(stmt.kind(), StmtKind::Copy);
        assert_eq!(stmt.src, ir.null_ptr());
    }

    #[test]
    fn test_black_hole_policy_on_takes_address() {
        let (mut ir, v) = ir_with_values(1);
        ir.handle_blackhole(true);
        let id = ir.add_black_hole_addr_stmt(v[0]).unwrap();
        let stmt = ir.stmt(id).unwrap();
        assert_eq!(stmt.kind(), StmtKind::Addr);
        assert_eq!(stmt.src, ir.black_hole_obj());
    }
}
