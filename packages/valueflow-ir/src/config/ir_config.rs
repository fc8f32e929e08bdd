//! IR construction configuration
//!
//! The handful of switches that change how statements and field objects are
//! built. A value of this type is handed to `SvfIr::new`; nothing here is
//! global state.

use super::error::{ConfigError, ConfigResult};
use super::preset::Preset;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Smallest accepted global field limit
pub const MIN_FIELD_LIMIT: u32 = 1;

/// Largest accepted global field limit (bounds the gep-object id range)
pub const MAX_FIELD_LIMIT: u32 = 65536;

/// Configuration file versions this crate understands
pub const SUPPORTED_VERSIONS: &[u32] = &[1];

/// IR build configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IrBuildConfig {
    /// Model unknown-origin pointers as pointing to the blackhole object
    /// (otherwise they are copies of the null pointer)
    pub handle_blackhole: bool,

    /// Offset 0 of an object resolves to the object itself
    pub first_field_eq_base: bool,

    /// Global cap on distinct field objects per memory object (1..=65536)
    pub max_field_limit: u32,

    /// When false, every memory object is registered field-insensitive
    pub field_sensitive: bool,
}

impl Default for IrBuildConfig {
    fn default() -> Self {
        Self::from_preset(Preset::Balanced)
    }
}

impl IrBuildConfig {
    /// Get preset configuration
    pub fn from_preset(preset: Preset) -> Self {
        match preset {
            Preset::Fast => Self {
                handle_blackhole: false,
                first_field_eq_base: true,
                max_field_limit: 16,
                field_sensitive: false,
            },
            Preset::Balanced => Self {
                handle_blackhole: false,
                first_field_eq_base: false,
                max_field_limit: 512,
                field_sensitive: true,
            },
            Preset::Thorough => Self {
                handle_blackhole: true,
                first_field_eq_base: false,
                max_field_limit: 4096,
                field_sensitive: true,
            },
            Preset::Custom => Self {
                handle_blackhole: false,
                first_field_eq_base: false,
                max_field_limit: 512,
                field_sensitive: true,
            },
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_field_limit < MIN_FIELD_LIMIT || self.max_field_limit > MAX_FIELD_LIMIT {
            return Err(ConfigError::range_with_hint(
                "max_field_limit",
                self.max_field_limit,
                MIN_FIELD_LIMIT,
                MAX_FIELD_LIMIT,
                "The field limit bounds the field-object id range",
            ));
        }
        Ok(())
    }

    /// Builder: Set handle_blackhole
    pub fn handle_blackhole(mut self, v: bool) -> Self {
        self.handle_blackhole = v;
        self
    }

    /// Builder: Set first_field_eq_base
    pub fn first_field_eq_base(mut self, v: bool) -> Self {
        self.first_field_eq_base = v;
        self
    }

    /// Builder: Set max_field_limit
    pub fn max_field_limit(mut self, v: u32) -> Self {
        self.max_field_limit = v;
        self
    }

    /// Builder: Set field_sensitive
    pub fn field_sensitive(mut self, v: bool) -> Self {
        self.field_sensitive = v;
        self
    }

    /// Serialize to a versioned YAML document
    pub fn to_yaml(&self) -> ConfigResult<String> {
        let file = ConfigFileV1 {
            version: Some(1),
            preset: Some(Preset::Custom),
            ir: Some(IrOverrides {
                handle_blackhole: Some(self.handle_blackhole),
                first_field_eq_base: Some(self.first_field_eq_base),
                max_field_limit: Some(self.max_field_limit),
                field_sensitive: Some(self.field_sensitive),
            }),
        };
        Ok(serde_yaml::to_string(&file)?)
    }

    /// Parse a versioned YAML document: preset first, then overrides
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let file: ConfigFileV1 = serde_yaml::from_str(content)?;

        let version = file.version.ok_or(ConfigError::MissingVersion)?;
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(ConfigError::UnsupportedVersion {
                found: version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }

        let mut config = Self::from_preset(file.preset.unwrap_or(Preset::Balanced));
        if let Some(ir) = file.ir {
            ir.apply(&mut config);
        }
        config.validate()?;
        Ok(config)
    }

    /// Load from a YAML file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }
}

/// YAML schema v1
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFileV1 {
    /// Schema version (always 1 for v1)
    version: Option<u32>,

    /// Base preset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    preset: Option<Preset>,

    /// Fine-grained overrides
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ir: Option<IrOverrides>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct IrOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    handle_blackhole: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    first_field_eq_base: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    max_field_limit: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    field_sensitive: Option<bool>,
}

impl IrOverrides {
    fn apply(self, config: &mut IrBuildConfig) {
        if let Some(v) = self.handle_blackhole {
            config.handle_blackhole = v;
        }
        if let Some(v) = self.first_field_eq_base {
            config.first_field_eq_base = v;
        }
        if let Some(v) = self.max_field_limit {
            config.max_field_limit = v;
        }
        if let Some(v) = self.field_sensitive {
            config.field_sensitive = v;
        }
    }
}
