//! Configuration system
//!
//! - `IrBuildConfig`: construction switches (blackhole policy, first-field
//!   policy, field limit, field sensitivity)
//! - `Preset`: complete defaults for common use cases
//! - YAML loading with a versioned envelope

pub mod error;
pub mod ir_config;
pub mod preset;

pub use error::{ConfigError, ConfigResult};
pub use ir_config::{IrBuildConfig, MAX_FIELD_LIMIT, MIN_FIELD_LIMIT};
pub use preset::Preset;
