/*
 * Value-Flow IR - program graph substrate for pointer analysis
 *
 * Feature-First Hexagonal Architecture:
 * - shared/      : Identifier models
 * - features/    : svfir (domain → ports → infrastructure → application)
 * - config/      : Build configuration, presets, YAML I/O
 * - errors       : Crate-wide error type
 *
 * Construction is single-threaded; the finished graph is read-only and
 * the candidate scan uses Rayon when the `parallel` feature is on.
 */

// Crate-level lint configuration
#![allow(clippy::new_without_default)] // Default impl not always needed
#![allow(clippy::unnecessary_map_or)] // map_or style for compatibility
#![allow(clippy::module_inception)] // Module naming intentional
#![allow(clippy::upper_case_acronyms)] // FIObj naming

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports - Feature-First Architecture
// ═══════════════════════════════════════════════════════════════════════════

/// Build configuration
pub mod config;

/// Error types
pub mod errors;

/// Feature slices
pub mod features;

/// Shared models
pub mod shared;

pub use config::{IrBuildConfig, Preset};
pub use errors::{Result, ValueFlowError};
pub use features::svfir::{LocationSet, MemObjDesc, SourceValue, StmtKind, SvfIr};
pub use shared::models::{MemObjId, NodeId, StmtId};
