//! Flag derivation.
//!
//! Flags are emitted in a fixed order: compiler compatibility, architecture
//! extensions, data-type kernels, data-layout kernels, then backends.

use serde::{Deserialize, Serialize};

use crate::arch::Arch;
use crate::features::{DataLayout, DataType, FeatureSelection, KernelFeature};
use crate::version::Release;

pub const NO_ADDRSIG: &str = "-fno-addrsig";
pub const NO_INTEGRATED_AS: &str = "-no-integrated-as";
pub const MARCH_ARMV8_2A_FP16: &str = "-march=armv8.2-a+fp16";
pub const ENABLE_FP16: &str = "-DARM_COMPUTE_ENABLE_FP16";
pub const CPU_ENABLED: &str = "-DARM_COMPUTE_CPU_ENABLED";
pub const OPENCL_ENABLED: &str = "-DARM_COMPUTE_OPENCL_ENABLED";

/// First release ordinal whose toolchain uses the integrated assembler.
pub const DEFAULT_INTEGRATED_AS_CUTOFF: u32 = 13;

/// Tunables of the derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FlagPolicy {
    /// Releases with an ordinal below this get `-no-integrated-as`.
    pub integrated_as_cutoff: u32,
}

impl Default for FlagPolicy {
    fn default() -> Self {
        Self {
            integrated_as_cutoff: DEFAULT_INTEGRATED_AS_CUTOFF,
        }
    }
}

impl FlagPolicy {
    /// Whether `release` predates the integrated assembler under this policy.
    pub fn needs_external_assembler(&self, release: Release) -> bool {
        release.ordinal() < self.integrated_as_cutoff
    }
}

/// Everything the derivation reads, already parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildInputs {
    /// Target release; `None` when the identifier was not in the table.
    pub version: Option<Release>,
    pub arches: Vec<Arch>,
    pub features: FeatureSelection,
    pub policy: FlagPolicy,
}

impl BuildInputs {
    /// Parse raw host values. Absent feature values select everything.
    pub fn from_raw<S: AsRef<str>>(
        version: &str,
        arches: &[S],
        data_types: Option<&str>,
        data_layouts: Option<&str>,
    ) -> Self {
        let parsed = Release::parse(version);
        if parsed.is_none() {
            log::debug!("unknown platform version '{version}', version-gated flags disabled");
        }
        Self {
            version: parsed,
            arches: arches.iter().map(|a| Arch::parse(a.as_ref())).collect(),
            features: FeatureSelection::from_env_values(data_types, data_layouts),
            policy: FlagPolicy::default(),
        }
    }

    /// Replace the policy.
    pub fn with_policy(mut self, policy: FlagPolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// Why a flag was emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum FlagReason {
    /// The release is in the address-significance-unsupported set.
    AddrsigUnsupported { release: Release },
    /// The release predates the integrated assembler.
    PreIntegratedAssembler { release: Release, cutoff: u32 },
    /// The release builds fp16 kernels for `armv8-2a`.
    Fp16Architecture { release: Release },
    DataType { data_type: DataType },
    DataLayout { data_layout: DataLayout },
    /// Backends compiled into every build.
    Backend,
}

impl FlagReason {
    /// Short human-readable explanation.
    pub fn describe(&self) -> String {
        match self {
            FlagReason::AddrsigUnsupported { release } => {
                format!("release {release} does not support address-significance tables")
            }
            FlagReason::PreIntegratedAssembler { release, cutoff } => {
                format!("release {release} is older than the integrated-assembler cutoff {cutoff}")
            }
            FlagReason::Fp16Architecture { release } => {
                format!("release {release} targeting armv8-2a")
            }
            FlagReason::DataType { data_type } => {
                format!("data type {} selected", data_type.token())
            }
            FlagReason::DataLayout { data_layout } => {
                format!("data layout {} selected", data_layout.token())
            }
            FlagReason::Backend => "backend always enabled".to_string(),
        }
    }
}

/// A flag together with the reason it was emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedFlag {
    pub flag: String,
    pub reason: FlagReason,
}

fn push(out: &mut Vec<DerivedFlag>, flag: &str, reason: FlagReason) {
    log::trace!("emit {flag}");
    out.push(DerivedFlag {
        flag: flag.to_string(),
        reason,
    });
}

/// Derive the flags with their reasons.
pub fn derive_explained(inputs: &BuildInputs) -> Vec<DerivedFlag> {
    let mut out = Vec::new();

    if let Some(release) = inputs.version {
        // Compiler compatibility
        if release.lacks_addrsig() {
            push(&mut out, NO_ADDRSIG, FlagReason::AddrsigUnsupported { release });
        }
        if inputs.policy.needs_external_assembler(release) {
            push(
                &mut out,
                NO_INTEGRATED_AS,
                FlagReason::PreIntegratedAssembler {
                    release,
                    cutoff: inputs.policy.integrated_as_cutoff,
                },
            );
        }

        // Architecture extensions
        if release.gates_fp16_arch() && inputs.arches.contains(&Arch::Armv82a) {
            let reason = FlagReason::Fp16Architecture { release };
            push(&mut out, MARCH_ARMV8_2A_FP16, reason);
            push(&mut out, ENABLE_FP16, reason);
        }
    }

    for data_type in inputs.features.data_types.enabled() {
        push(&mut out, data_type.kernel_flag(), FlagReason::DataType { data_type });
    }
    for data_layout in inputs.features.data_layouts.enabled() {
        push(
            &mut out,
            data_layout.kernel_flag(),
            FlagReason::DataLayout { data_layout },
        );
    }

    push(&mut out, CPU_ENABLED, FlagReason::Backend);
    push(&mut out, OPENCL_ENABLED, FlagReason::Backend);

    out
}

/// Derive the ordered flag list.
pub fn derive(inputs: &BuildInputs) -> Vec<String> {
    derive_explained(inputs)
        .into_iter()
        .map(|d| d.flag)
        .collect()
}

/// Derive from raw host values with the default policy.
pub fn derive_from_raw<S: AsRef<str>>(
    version: &str,
    arches: &[S],
    data_types: Option<&str>,
    data_layouts: Option<&str>,
) -> Vec<String> {
    derive(&BuildInputs::from_raw(version, arches, data_types, data_layouts))
}
