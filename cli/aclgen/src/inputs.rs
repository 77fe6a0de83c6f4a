//! Resolution of derivation inputs from arguments, environment and `aclgen.toml`.

use std::fmt;
use std::path::{Path, PathBuf};

use aclgen_core::features::{DATA_LAYOUT_ENV, DATA_TYPE_ENV, WILDCARD};
use aclgen_core::{BuildInputs, FlagPolicy};
use aclgen_host::{inputs_from_host, AclgenConfig, BuildHost, StaticHost};
use anyhow::{Context, Result};
use clap::Args;

/// Input options shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// Platform version identifier (e.g. R, 11, T)
    #[arg(long)]
    pub platform_version: Option<String>,
    /// Target architecture (repeatable, e.g. --arch arm64 --arch armv8-2a)
    #[arg(long = "arch")]
    pub arches: Vec<String>,
    /// Data types, overriding COMPUTE_LIB_DATA_TYPE (e.g. "fp16,fp32")
    #[arg(long)]
    pub data_types: Option<String>,
    /// Data layouts, overriding COMPUTE_LIB_DATA_LAYOUT (e.g. "nhwc")
    #[arg(long)]
    pub data_layouts: Option<String>,
    /// First release ordinal using the integrated assembler
    #[arg(long)]
    pub integrated_as_cutoff: Option<u32>,
    /// Configuration file (default: nearest aclgen.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Argument,
    Environment,
    Config,
    Default,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Source::Argument => "command line",
            Source::Environment => "environment",
            Source::Config => "aclgen.toml",
            Source::Default => "default",
        };
        f.write_str(label)
    }
}

/// A value and its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved<T> {
    pub value: T,
    pub source: Source,
}

impl<T> Resolved<T> {
    fn new(value: T, source: Source) -> Self {
        Self { value, source }
    }
}

/// Fully resolved inputs for one invocation.
#[derive(Debug, Clone)]
pub struct ResolvedInputs {
    pub version: Resolved<Option<String>>,
    pub arches: Resolved<Vec<String>>,
    pub data_types: Resolved<String>,
    pub data_layouts: Resolved<String>,
    pub policy: Resolved<FlagPolicy>,
    pub config_path: Option<PathBuf>,
}

/// Load `--config` if given, otherwise search upward from `cwd`.
pub fn load_config(args: &InputArgs, cwd: &Path) -> Result<Option<(AclgenConfig, PathBuf)>> {
    match &args.config {
        Some(path) => {
            let config = AclgenConfig::load(path)
                .with_context(|| format!("loading {}", path.display()))?;
            Ok(Some((config, path.clone())))
        }
        None => AclgenConfig::find_and_load(cwd)
            .with_context(|| format!("searching for aclgen.toml from {}", cwd.display())),
    }
}

fn feature_value(
    arg: Option<&String>,
    env: &dyn BuildHost,
    key: &str,
    config: Option<&String>,
) -> Resolved<String> {
    if let Some(value) = arg {
        return Resolved::new(value.clone(), Source::Argument);
    }
    if let Some(value) = env.getenv(key).filter(|v| !v.is_empty()) {
        return Resolved::new(value, Source::Environment);
    }
    if let Some(value) = config {
        return Resolved::new(value.clone(), Source::Config);
    }
    Resolved::new(WILDCARD.to_string(), Source::Default)
}

impl ResolvedInputs {
    /// Merge arguments, environment (read through `env`) and configuration.
    pub fn resolve(
        args: &InputArgs,
        config: Option<(&AclgenConfig, &Path)>,
        env: &dyn BuildHost,
    ) -> Self {
        let cfg = config.map(|(c, _)| c);

        let config_version = cfg.and_then(|c| c.platform.version.as_ref());
        let version = match (&args.platform_version, config_version) {
            (Some(v), _) => Resolved::new(Some(v.clone()), Source::Argument),
            (None, Some(v)) => Resolved::new(Some(v.clone()), Source::Config),
            (None, None) => Resolved::new(None, Source::Default),
        };

        let arches = if !args.arches.is_empty() {
            Resolved::new(args.arches.clone(), Source::Argument)
        } else if let Some(c) = cfg.filter(|c| !c.platform.arches.is_empty()) {
            Resolved::new(c.platform.arches.clone(), Source::Config)
        } else {
            Resolved::new(Vec::new(), Source::Default)
        };

        let data_types = feature_value(
            args.data_types.as_ref(),
            env,
            DATA_TYPE_ENV,
            cfg.and_then(|c| c.features.data_types.as_ref()),
        );
        let data_layouts = feature_value(
            args.data_layouts.as_ref(),
            env,
            DATA_LAYOUT_ENV,
            cfg.and_then(|c| c.features.data_layouts.as_ref()),
        );

        let policy = match (args.integrated_as_cutoff, cfg) {
            (Some(cutoff), _) => Resolved::new(
                FlagPolicy {
                    integrated_as_cutoff: cutoff,
                },
                Source::Argument,
            ),
            (None, Some(c)) => Resolved::new(c.policy, Source::Config),
            (None, None) => Resolved::new(FlagPolicy::default(), Source::Default),
        };

        Self {
            version,
            arches,
            data_types,
            data_layouts,
            policy,
            config_path: config.map(|(_, p)| p.to_path_buf()),
        }
    }

    /// A host presenting exactly the resolved values.
    pub fn host(&self) -> StaticHost {
        let mut host = StaticHost::new(self.version.value.clone().unwrap_or_default())
            .with_env(DATA_TYPE_ENV, self.data_types.value.clone())
            .with_env(DATA_LAYOUT_ENV, self.data_layouts.value.clone());
        for arch in &self.arches.value {
            host = host.with_arch(arch.clone());
        }
        host
    }

    /// Parsed inputs for the deriver.
    pub fn build_inputs(&self) -> BuildInputs {
        inputs_from_host(&self.host(), self.policy.value)
    }
}

#[cfg(test)]
mod tests {
    use aclgen_core::{Arch, Release};

    use super::*;

    fn config() -> AclgenConfig {
        AclgenConfig::parse(
            r#"
[platform]
version = "R"
arches = ["armv8-2a"]

[features]
data-types = "fp32"
data-layouts = "nchw"

[policy]
integrated-as-cutoff = 11
"#,
        )
        .unwrap()
    }

    #[test]
    fn defaults_without_anything() {
        let resolved =
            ResolvedInputs::resolve(&InputArgs::default(), None, &StaticHost::default());
        assert_eq!(resolved.version.value, None);
        assert_eq!(resolved.data_types.value, "ALL");
        assert_eq!(resolved.data_types.source, Source::Default);
        assert_eq!(resolved.policy.value, FlagPolicy::default());
        let inputs = resolved.build_inputs();
        assert_eq!(inputs.version, None);
        assert!(inputs.features.data_types.is_wildcard());
    }

    #[test]
    fn config_fills_gaps() {
        let cfg = config();
        let resolved = ResolvedInputs::resolve(
            &InputArgs::default(),
            Some((&cfg, Path::new("aclgen.toml"))),
            &StaticHost::default(),
        );
        assert_eq!(resolved.version.source, Source::Config);
        assert_eq!(resolved.arches.value, vec!["armv8-2a"]);
        assert_eq!(resolved.data_layouts.value, "nchw");
        assert_eq!(resolved.policy.value.integrated_as_cutoff, 11);
        assert_eq!(resolved.config_path.as_deref(), Some(Path::new("aclgen.toml")));

        let inputs = resolved.build_inputs();
        assert_eq!(inputs.version, Some(Release::R));
        assert_eq!(inputs.arches, vec![Arch::Armv82a]);
    }

    #[test]
    fn environment_beats_config() {
        let cfg = config();
        let env = StaticHost::default().with_env(DATA_TYPE_ENV, "qasymm8");
        let resolved =
            ResolvedInputs::resolve(&InputArgs::default(), Some((&cfg, Path::new("x"))), &env);
        assert_eq!(resolved.data_types.value, "qasymm8");
        assert_eq!(resolved.data_types.source, Source::Environment);
        assert_eq!(resolved.data_layouts.source, Source::Config);
    }

    #[test]
    fn empty_environment_value_is_unset() {
        let env = StaticHost::default().with_env(DATA_LAYOUT_ENV, "");
        let resolved = ResolvedInputs::resolve(&InputArgs::default(), None, &env);
        assert_eq!(resolved.data_layouts.source, Source::Default);
    }

    #[test]
    fn arguments_beat_everything() {
        let cfg = config();
        let env = StaticHost::default().with_env(DATA_TYPE_ENV, "qasymm8");
        let args = InputArgs {
            platform_version: Some("13".into()),
            arches: vec!["arm64".into()],
            data_types: Some("fp16".into()),
            integrated_as_cutoff: Some(14),
            ..InputArgs::default()
        };
        let resolved = ResolvedInputs::resolve(&args, Some((&cfg, Path::new("x"))), &env);
        assert_eq!(resolved.version.value.as_deref(), Some("13"));
        assert_eq!(resolved.arches.source, Source::Argument);
        assert_eq!(resolved.data_types.value, "fp16");
        assert_eq!(resolved.policy.source, Source::Argument);
        assert_eq!(resolved.build_inputs().policy.integrated_as_cutoff, 14);
    }

    #[test]
    fn explicit_config_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let args = InputArgs {
            config: Some(dir.path().join("missing.toml")),
            ..InputArgs::default()
        };
        assert!(load_config(&args, dir.path()).is_err());
    }

    #[test]
    fn discovered_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("aclgen.toml"), AclgenConfig::template()).unwrap();
        let (cfg, path) = load_config(&InputArgs::default(), dir.path()).unwrap().unwrap();
        assert_eq!(cfg.platform.version.as_deref(), Some("T"));
        assert!(path.ends_with("aclgen.toml"));
    }
}
