use serde::{Deserialize, Serialize};

use crate::censor::CensorConfig;
use crate::error::ConfigError;
use crate::mask::MaskConfig;

/// Encoder settings as read from a TOML file.
///
/// ```toml
/// [censor]
/// paint_reuse = 2
///
/// [mask]
/// color_dist_threshold = 40
/// ```
///
/// Missing tables and keys fall back to their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodeSettings {
    pub censor: CensorConfig,
    pub mask: MaskConfig,
}

impl EncodeSettings {
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::Config(e.to_string()))
    }
}
