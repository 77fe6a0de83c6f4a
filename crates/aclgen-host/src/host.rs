//! The boundary between a build orchestrator and the deriver.

use std::collections::BTreeMap;

use aclgen_core::features::{DATA_LAYOUT_ENV, DATA_TYPE_ENV, WILDCARD};
use aclgen_core::{BuildInputs, FlagPolicy};

/// What the deriver needs from a build orchestrator.
pub trait BuildHost {
    /// Platform version identifier of the current build (e.g. `"R"` or `"11"`).
    fn platform_version_name(&self) -> String;

    /// Architecture identifiers of the current build, in host order.
    fn arches(&self) -> Vec<String>;

    /// Raw environment lookup.
    fn getenv(&self, key: &str) -> Option<String>;

    /// Environment lookup where unset and empty both mean `default`.
    fn getenv_with_default(&self, key: &str, default: &str) -> String {
        match self.getenv(key) {
            Some(value) if !value.is_empty() => value,
            _ => default.to_string(),
        }
    }
}

/// Host whose version and architectures are given up front and whose
/// environment is the process environment.
#[derive(Debug, Clone)]
pub struct ProcessHost {
    version: String,
    arches: Vec<String>,
}

impl ProcessHost {
    pub fn new(version: impl Into<String>, arches: Vec<String>) -> Self {
        Self {
            version: version.into(),
            arches,
        }
    }
}

impl BuildHost for ProcessHost {
    fn platform_version_name(&self) -> String {
        self.version.clone()
    }

    fn arches(&self) -> Vec<String> {
        self.arches.clone()
    }

    fn getenv(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Host with every value held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticHost {
    version: String,
    arches: Vec<String>,
    env: BTreeMap<String, String>,
}

impl StaticHost {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            ..Self::default()
        }
    }

    /// Append an architecture.
    pub fn with_arch(mut self, arch: impl Into<String>) -> Self {
        self.arches.push(arch.into());
        self
    }

    /// Set an environment variable.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }
}

impl BuildHost for StaticHost {
    fn platform_version_name(&self) -> String {
        self.version.clone()
    }

    fn arches(&self) -> Vec<String> {
        self.arches.clone()
    }

    fn getenv(&self, key: &str) -> Option<String> {
        self.env.get(key).cloned()
    }
}

/// Read and parse everything the deriver needs from `host`.
pub fn inputs_from_host(host: &dyn BuildHost, policy: FlagPolicy) -> BuildInputs {
    let version = host.platform_version_name();
    let arches = host.arches();
    let data_types = host.getenv_with_default(DATA_TYPE_ENV, WILDCARD);
    let data_layouts = host.getenv_with_default(DATA_LAYOUT_ENV, WILDCARD);
    log::debug!(
        "host inputs: version={version:?} arches={arches:?} types={data_types:?} \
         layouts={data_layouts:?}"
    );
    BuildInputs::from_raw(
        &version,
        arches.as_slice(),
        Some(data_types.as_str()),
        Some(data_layouts.as_str()),
    )
    .with_policy(policy)
}
