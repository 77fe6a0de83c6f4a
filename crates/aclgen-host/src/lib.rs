//! Build-host adapter for aclgen.
//!
//! A build orchestrator exposes its configuration through [`BuildHost`]. This
//! crate turns that into [`aclgen_core::BuildInputs`], attaches the derived
//! flags to a module's properties, and loads optional `aclgen.toml` settings.

pub mod config;
pub mod error;
pub mod host;
pub mod module;

pub use config::AclgenConfig;
pub use error::{ConfigError, Result};
pub use host::{inputs_from_host, BuildHost, ProcessHost, StaticHost};
pub use module::{apply_defaults, ModuleProperties, MODULE_DEFAULTS_TYPE};
