//! Attaching derived flags to a build module.

use aclgen_core::{derive, FlagPolicy};

use crate::host::{inputs_from_host, BuildHost};

/// Name under which the defaults are registered with the build host.
pub const MODULE_DEFAULTS_TYPE: &str = "arm_compute_library_defaults";

/// The subset of a compilation unit's properties the deriver writes to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleProperties {
    pub cppflags: Vec<String>,
}

/// Derive flags from `host` and append them to `props.cppflags`.
///
/// Flags already present keep their position; the derived ones follow in
/// derivation order.
pub fn apply_defaults(host: &dyn BuildHost, policy: FlagPolicy, props: &mut ModuleProperties) {
    let flags = derive(&inputs_from_host(host, policy));
    log::debug!("{MODULE_DEFAULTS_TYPE}: appending {} cppflags", flags.len());
    props.cppflags.extend(flags);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::StaticHost;

    #[test]
    fn appends_after_existing_flags() {
        let mut props = ModuleProperties {
            cppflags: vec!["-Wall".into(), "-O2".into()],
        };
        let host = StaticHost::new("U").with_env("COMPUTE_LIB_DATA_TYPE", "fp32");
        apply_defaults(&host, FlagPolicy::default(), &mut props);
        assert_eq!(
            props.cppflags,
            vec![
                "-Wall",
                "-O2",
                "-DENABLE_FP32_KERNELS",
                "-DENABLE_NHWC_KERNELS",
                "-DENABLE_NCHW_KERNELS",
                "-DARM_COMPUTE_CPU_ENABLED",
                "-DARM_COMPUTE_OPENCL_ENABLED",
            ]
        );
    }

    #[test]
    fn repeated_application_is_stable() {
        let host = StaticHost::new("Q").with_arch("arm64");
        let mut first = ModuleProperties::default();
        let mut second = ModuleProperties::default();
        apply_defaults(&host, FlagPolicy::default(), &mut first);
        apply_defaults(&host, FlagPolicy::default(), &mut second);
        assert_eq!(first, second);
        assert_eq!(first.cppflags[0], "-fno-addrsig");
    }
}
