//! Preset configurations
//!
//! Presets provide complete default configurations for common use cases.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Configuration preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// CI/CD: every object collapsed to one node, null-pointer copies for unknown origins
    Fast,

    /// Development: field-sensitive with the usual field limit
    Balanced,

    /// Audit: large field limit, explicit blackhole object for unknown origins
    Thorough,

    /// User-defined (YAML or builder API)
    Custom,
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fast" => Ok(Self::Fast),
            "balanced" => Ok(Self::Balanced),
            "thorough" => Ok(Self::Thorough),
            "custom" => Ok(Self::Custom),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Fast => "fast",
            Self::Balanced => "balanced",
            Self::Thorough => "thorough",
            Self::Custom => "custom",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!("Fast".parse::<Preset>(), Ok(Preset::Fast));
        assert_eq!("THOROUGH".parse::<Preset>(), Ok(Preset::Thorough));
        assert!("medium".parse::<Preset>().is_err());
    }

    #[test]
    fn test_display_roundtrips_through_parse() {
        for preset in [Preset::Fast, Preset::Balanced, Preset::Thorough, Preset::Custom] {
            assert_eq!(preset.to_string().parse::<Preset>(), Ok(preset));
        }
    }
}
