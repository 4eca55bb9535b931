//! Repository configuration.
//!
//! Read from `<metadata root>/config.toml`; every section and key is optional.
//!
//! ```toml
//! [commit]
//! identity = "to-hutohu <tohu.soy@gmail.com>"
//! offset = "+0900"
//!
//! [tree]
//! sort_entries = true
//!
//! [index]
//! verify_checksum = true
//! ```

use crate::artifacts::objects::commit::parse_offset;
use crate::errors::{Error, Result};
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub commit: CommitConfig,

    #[serde(default)]
    pub tree: TreeConfig,

    #[serde(default)]
    pub index: IndexConfig,
}

impl Config {
    /// Load the configuration stored under `git_dir`, or the defaults when
    /// there is no configuration file.
    pub fn load(git_dir: &Path) -> Result<Self> {
        let path = git_dir.join(CONFIG_FILE_NAME);
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse {}: {e}", path.display())))?;
        config.commit.utc_offset()?;

        Ok(config)
    }

    pub fn save(&self, git_dir: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {e}")))?;
        std::fs::write(git_dir.join(CONFIG_FILE_NAME), content)?;

        Ok(())
    }
}

/// Signature used for author and committer lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitConfig {
    /// `Name <email>`
    pub identity: String,
    /// `±HHMM`
    pub offset: String,
}

impl CommitConfig {
    pub fn utc_offset(&self) -> Result<FixedOffset> {
        parse_offset(&self.offset)
            .ok_or_else(|| Error::Config(format!("invalid UTC offset {:?}", self.offset)))
    }
}

impl Default for CommitConfig {
    fn default() -> Self {
        Self {
            identity: "minigit <minigit@localhost>".to_string(),
            offset: "+0000".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Order tree entries by name instead of keeping the caller's order.
    pub sort_entries: bool,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self { sort_entries: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Reject indexes whose trailing checksum is missing or wrong.
    pub verify_checksum: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            verify_checksum: true,
        }
    }
}
