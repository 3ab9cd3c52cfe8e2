//! CLI 設定ファイル（TOML）
//!
//! ```toml
//! seed = 7
//! max_turns = 20000
//!
//! [engine]
//! search_radius = 40
//! max_items_per_tile = 512
//! ```
//!
//! どのキーも省略可能です。省略したものは既定値になります。

use std::fs;
use std::path::Path;

use anyhow::Context;
use drudge_core::domain::EngineConfig;
use serde::Deserialize;

pub const DEFAULT_MAX_TURNS: u64 = 10_000;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub seed: Option<u64>,
    pub max_turns: Option<u64>,
    pub engine: EngineConfig,
}

impl CliConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }
}
