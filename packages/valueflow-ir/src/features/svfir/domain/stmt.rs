//! IR statements
//!
//! Every statement is a directed edge `src -> dst` of one kind:
//! - ADDR:    dst = &src             (src is an object)
//! - COPY:    dst = src
//! - LOAD:    dst = *src
//! - STORE:   *dst = src             (labelled by the store instruction)
//! - GEP:     dst = &src->f          (normal: constant offset, variant: unknown offset)
//! - CALL/RET, FORK/JOIN: parameter and return transfer (labelled by call site)
//! - PHI/CMP/BINARY/UNARY/BRANCH: non-address value flow

use super::location_set::LocationSet;
use crate::shared::models::{CallSiteId, IcfgNodeId, InstId, NodeId, StmtId};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Statement kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StmtKind {
    Addr,
    Copy,
    Store,
    Load,
    Call,
    Ret,
    NormalGep,
    VariantGep,
    ThreadFork,
    ThreadJoin,
    Cmp,
    BinaryOp,
    UnaryOp,
    Phi,
    Branch,
}

impl StmtKind {
    /// Every kind, in index order
    pub const ALL: [StmtKind; 15] = [
        StmtKind::Addr,
        StmtKind::Copy,
        StmtKind::Store,
        StmtKind::Load,
        StmtKind::Call,
        StmtKind::Ret,
        StmtKind::NormalGep,
        StmtKind::VariantGep,
        StmtKind::ThreadFork,
        StmtKind::ThreadJoin,
        StmtKind::Cmp,
        StmtKind::BinaryOp,
        StmtKind::UnaryOp,
        StmtKind::Phi,
        StmtKind::Branch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StmtKind::Addr => "ADDR",
            StmtKind::Copy => "COPY",
            StmtKind::Store => "STORE",
            StmtKind::Load => "LOAD",
            StmtKind::Call => "CALL",
            StmtKind::Ret => "RET",
            StmtKind::NormalGep => "NORMAL_GEP",
            StmtKind::VariantGep => "VARIANT_GEP",
            StmtKind::ThreadFork => "THREAD_FORK",
            StmtKind::ThreadJoin => "THREAD_JOIN",
            StmtKind::Cmp => "CMP",
            StmtKind::BinaryOp => "BINARY_OP",
            StmtKind::UnaryOp => "UNARY_OP",
            StmtKind::Phi => "PHI",
            StmtKind::Branch => "BRANCH",
        }
    }

    /// Pointer-arithmetic statement
    #[inline]
    pub fn is_gep(&self) -> bool {
        matches!(self, StmtKind::NormalGep | StmtKind::VariantGep)
    }

    /// Deduplicated on (src, dst, label) rather than (src, dst)
    #[inline]
    pub fn is_labeled(&self) -> bool {
        matches!(
            self,
            StmtKind::Store
                | StmtKind::Call
                | StmtKind::Ret
                | StmtKind::ThreadFork
                | StmtKind::ThreadJoin
                | StmtKind::Cmp
                | StmtKind::BinaryOp
        )
    }
}

impl fmt::Display for StmtKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extra key that keeps two statements of one kind on the same node pair apart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeLabel {
    /// Originating instruction (stores)
    Inst(InstId),
    /// Call site (call/return/fork/join transfer)
    CallSite(CallSiteId),
    /// Second operand (compare and binary statements)
    Operand(NodeId),
}

/// Kind-specific payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StmtData {
    Addr,
    Copy,
    Load,
    Store { inst: InstId },
    Call { call_site: CallSiteId },
    Ret { call_site: CallSiteId },
    ThreadFork { call_site: CallSiteId },
    ThreadJoin { call_site: CallSiteId },
    NormalGep { ls: LocationSet },
    VariantGep,
    Cmp { operands: [NodeId; 2], predicate: u32 },
    BinaryOp { operands: [NodeId; 2], opcode: u32 },
    UnaryOp { opcode: u32 },
    /// Operands in the order they were added
    Phi { operands: Vec<NodeId> },
    Branch { successors: Vec<IcfgNodeId> },
}

impl StmtData {
    pub fn kind(&self) -> StmtKind {
        match self {
            StmtData::Addr => StmtKind::Addr,
            StmtData::Copy => StmtKind::Copy,
            StmtData::Load => StmtKind::Load,
            StmtData::Store { .. } => StmtKind::Store,
            StmtData::Call { .. } => StmtKind::Call,
            StmtData::Ret { .. } => StmtKind::Ret,
            StmtData::ThreadFork { .. } => StmtKind::ThreadFork,
            StmtData::ThreadJoin { .. } => StmtKind::ThreadJoin,
            StmtData::NormalGep { .. } => StmtKind::NormalGep,
            StmtData::VariantGep => StmtKind::VariantGep,
            StmtData::Cmp { .. } => StmtKind::Cmp,
            StmtData::BinaryOp { .. } => StmtKind::BinaryOp,
            StmtData::UnaryOp { .. } => StmtKind::UnaryOp,
            StmtData::Phi { .. } => StmtKind::Phi,
            StmtData::Branch { .. } => StmtKind::Branch,
        }
    }

    /// Dedup label derived from the payload
    pub fn label(&self) -> Option<EdgeLabel> {
        match *self {
            StmtData::Store { inst } => Some(EdgeLabel::Inst(inst)),
            StmtData::Call { call_site }
            | StmtData::Ret { call_site }
            | StmtData::ThreadFork { call_site }
            | StmtData::ThreadJoin { call_site } => Some(EdgeLabel::CallSite(call_site)),
            StmtData::Cmp { operands, .. } | StmtData::BinaryOp { operands, .. } => {
                Some(EdgeLabel::Operand(operands[1]))
            }
            _ => None,
        }
    }
}

/// A statement edge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SvfStmt {
    pub id: StmtId,
    pub src: NodeId,
    pub dst: NodeId,
    pub data: StmtData,
}

impl SvfStmt {
    #[inline]
    pub fn new(id: StmtId, src: NodeId, dst: NodeId, data: StmtData) -> Self {
        Self { id, src, dst, data }
    }

    #[inline]
    pub fn kind(&self) -> StmtKind {
        self.data.kind()
    }

    #[inline]
    pub fn label(&self) -> Option<EdgeLabel> {
        self.data.label()
    }

    /// Offset of a normal gep statement
    #[inline]
    pub fn location_set(&self) -> Option<LocationSet> {
        match self.data {
            StmtData::NormalGep { ls } => Some(ls),
            _ => None,
        }
    }

    /// Phi operands in insertion order
    pub fn phi_operands(&self) -> Option<&[NodeId]> {
        match self.data {
            StmtData::Phi { ref operands } => Some(operands.as_slice()),
            _ => None,
        }
    }

    pub fn call_site(&self) -> Option<CallSiteId> {
        match self.data {
            StmtData::Call { call_site }
            | StmtData::Ret { call_site }
            | StmtData::ThreadFork { call_site }
            | StmtData::ThreadJoin { call_site } => Some(call_site),
            _ => None,
        }
    }
}

impl fmt::Display for SvfStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.data {
            StmtData::NormalGep { ls } => {
                write!(f, "{} -- {} {} --> {}", self.src, self.kind(), ls, self.dst)
            }
            _ => write!(f, "{} -- {} --> {}", self.src, self.kind(), self.dst),
        }
    }
}

/// Kind-indexed statement lists, in creation order
#[derive(Debug, Default, Clone)]
pub struct StmtIndex {
    by_kind: FxHashMap<StmtKind, Vec<StmtId>>,
    total: usize,
}

impl StmtIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a newly created statement
    pub fn add(&mut self, kind: StmtKind, id: StmtId) {
        self.by_kind.entry(kind).or_default().push(id);
        self.total += 1;
    }

    /// All statements of a kind
    #[inline]
    pub fn of_kind(&self, kind: StmtKind) -> &[StmtId] {
        self.by_kind.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    #[inline]
    pub fn count(&self, kind: StmtKind) -> usize {
        self.of_kind(kind).len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.total
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}
