use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// World-wide tunables. Every field has a default, so a config file only
/// names what it overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct WorldConfig {
    /// Fixed RNG seed; `None` draws from OS entropy.
    pub seed: Option<u64>,
    pub starting_wealth: i32,
    pub starting_level_points: i32,
    /// Extra generated items dropped into a new character's supplies.
    pub debug_supply_items: usize,
    pub max_name_len: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: None,
            starting_wealth: 10,
            starting_level_points: 10,
            debug_supply_items: 5,
            max_name_len: 30,
        }
    }
}

impl WorldConfig {
    pub fn seeded(seed: u64) -> Self {
        Self { seed: Some(seed), ..Self::default() }
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).context("failed to parse world config YAML")
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("failed to parse world config JSON")
    }

    /// Load from disk; `.json` files are read as JSON, anything else as YAML.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read world config: {}", path.display()))?;
        Self::from_text(&text, path)
    }

    /// Parse already-decoded text, picking the format from `path`'s extension.
    pub fn from_text(text: &str, path: &Path) -> Result<Self> {
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(text)
        } else {
            Self::from_yaml_str(text)
        }
        .with_context(|| format!("in {}", path.display()))
    }
}
