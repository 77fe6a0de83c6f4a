//! `aclgen.toml` configuration.
//!
//! The file supplies values a build host would otherwise provide: the platform
//! version, the architecture list, fallback feature selections, and the
//! derivation policy. Every section is optional.

use std::path::{Path, PathBuf};

use aclgen_core::FlagPolicy;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// File name searched for by [`AclgenConfig::find_and_load`].
pub const CONFIG_FILE_NAME: &str = "aclgen.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AclgenConfig {
    #[serde(default)]
    pub platform: PlatformConfig,
    #[serde(default)]
    pub features: FeaturesConfig,
    #[serde(default)]
    pub policy: FlagPolicy,
}

/// `[platform]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PlatformConfig {
    /// Platform version identifier.
    #[serde(default)]
    pub version: Option<String>,
    /// Architecture identifiers.
    #[serde(default)]
    pub arches: Vec<String>,
}

/// `[features]` section. Used only when the environment leaves a toggle unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FeaturesConfig {
    #[serde(default)]
    pub data_types: Option<String>,
    #[serde(default)]
    pub data_layouts: Option<String>,
}

impl AclgenConfig {
    /// Parse a configuration from a TOML string.
    pub fn parse(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let config = Self::parse(&content)?;
        log::debug!("loaded {}", path.display());
        Ok(config)
    }

    /// Search upward from `start_dir` for `aclgen.toml`, returning the parsed
    /// file and the path it was found at.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(CONFIG_FILE_NAME);
            if candidate.is_file() {
                let config = Self::load(&candidate)?;
                return Ok(Some((config, candidate)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    /// Template written by documentation and tests.
    pub fn template() -> String {
        r#"[platform]
version = "T"
arches = ["arm64"]

[features]
data-types = "ALL"
data-layouts = "ALL"

[policy]
integrated-as-cutoff = 13
"#
        .to_string()
    }
}
