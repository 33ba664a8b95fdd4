use std::{env, fs};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Money;

/// Environment variable naming a JSON file to load the configuration from.
pub const CONFIG_ENV: &str = "TERRA_CONFIG_PATH";

/// Tunable limits and prices of the terraforming engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TerraformConfig {
    pub world_width: u32,
    pub world_height: u32,
    /// Highest corner height an edit may produce.
    pub max_height: i32,
    /// Allow edits within one tile of the grid border instead of failing
    /// early.
    pub allow_edge_terraform: bool,
    /// How far an elevated structure may end up above land lowered
    /// beneath it.
    pub max_clearance_above_lowered: i32,
    /// Price charged per adjusted corner.
    pub terraform_price: Money,
}

impl Default for TerraformConfig {
    fn default() -> Self {
        Self {
            world_width: 256,
            world_height: 256,
            max_height: 15,
            allow_edge_terraform: false,
            max_clearance_above_lowered: 12,
            terraform_price: 50,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading terraform config: {0}")]
    Io(#[from] std::io::Error),
    #[error("parsing terraform config: {0}")]
    Parse(#[from] serde_json::Error),
}

impl TerraformConfig {
    /// Load the configuration from the file named by [`CONFIG_ENV`], or
    /// fall back to the defaults when the variable is unset.
    pub fn load() -> Result<Self, ConfigError> {
        match env::var(CONFIG_ENV) {
            Ok(path) => {
                let text = fs::read_to_string(path)?;
                Ok(serde_json::from_str(&text)?)
            }
            Err(_) => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_in_defaults() {
        let config: TerraformConfig =
            serde_json::from_str(r#"{"world_width": 64, "world_height": 48}"#).unwrap();
        assert_eq!(config.world_width, 64);
        assert_eq!(config.world_height, 48);
        assert_eq!(config.max_height, TerraformConfig::default().max_height);
        assert!(!config.allow_edge_terraform);
    }
}
