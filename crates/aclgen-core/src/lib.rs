//! Compiler flag derivation for the Arm Compute Library.
//!
//! The library is configured at build time by a handful of inputs:
//! - **Platform version:** the OS release being targeted (`R`, `11`, ...)
//! - **Architectures:** the CPU architecture variants of the build
//! - **Feature toggles:** the data types and data layouts to compile kernels for
//!
//! [`derive`] maps those inputs to an ordered list of C++ flags. The mapping is
//! total: unrecognized values narrow the output, they never fail.

pub mod arch;
pub mod features;
pub mod flags;
pub mod version;

pub use arch::Arch;
pub use features::{DataLayout, DataType, FeatureSelection, KernelFeature, Selection};
pub use flags::{
    derive, derive_explained, derive_from_raw, BuildInputs, DerivedFlag, FlagPolicy, FlagReason,
};
pub use version::Release;
