//! Kernel feature toggles.
//!
//! The data types and data layouts to build kernels for are selected through
//! comma-separated environment values such as `fp16,FP32` or `ALL`.

use serde::{Deserialize, Serialize};

/// Environment variable selecting data types.
pub const DATA_TYPE_ENV: &str = "COMPUTE_LIB_DATA_TYPE";

/// Environment variable selecting data layouts.
pub const DATA_LAYOUT_ENV: &str = "COMPUTE_LIB_DATA_LAYOUT";

/// Token selecting every variant of a feature group.
pub const WILDCARD: &str = "ALL";

/// A feature whose kernels can be compiled in or out.
pub trait KernelFeature: Copy + Eq + 'static {
    /// Every variant, in flag emission order.
    const VARIANTS: &'static [Self];

    /// Upper-case selection token (e.g. `QASYMM8`).
    fn token(self) -> &'static str;

    /// Preprocessor flag enabling the feature's kernels.
    fn kernel_flag(self) -> &'static str;

    /// Match a token case-insensitively.
    fn from_token(token: &str) -> Option<Self> {
        Self::VARIANTS
            .iter()
            .copied()
            .find(|v| v.token().eq_ignore_ascii_case(token))
    }
}

/// Numeric data types with dedicated kernels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataType {
    Integer,
    Qasymm8,
    Qasymm8Signed,
    Qasymm16,
    Qsymm16,
    Fp16,
    Fp32,
}

impl KernelFeature for DataType {
    const VARIANTS: &'static [Self] = &[
        DataType::Integer,
        DataType::Qasymm8,
        DataType::Qasymm8Signed,
        DataType::Qasymm16,
        DataType::Qsymm16,
        DataType::Fp16,
        DataType::Fp32,
    ];

    fn token(self) -> &'static str {
        match self {
            DataType::Integer => "INTEGER",
            DataType::Qasymm8 => "QASYMM8",
            DataType::Qasymm8Signed => "QASYMM8_SIGNED",
            DataType::Qasymm16 => "QASYMM16",
            DataType::Qsymm16 => "QSYMM16",
            DataType::Fp16 => "FP16",
            DataType::Fp32 => "FP32",
        }
    }

    fn kernel_flag(self) -> &'static str {
        match self {
            DataType::Integer => "-DENABLE_INTEGER_KERNELS",
            DataType::Qasymm8 => "-DENABLE_QASYMM8_KERNELS",
            DataType::Qasymm8Signed => "-DENABLE_QASYMM8_SIGNED_KERNELS",
            DataType::Qasymm16 => "-DENABLE_QASYMM16_KERNELS",
            DataType::Qsymm16 => "-DENABLE_QSYMM16_KERNELS",
            DataType::Fp16 => "-DENABLE_FP16_KERNELS",
            DataType::Fp32 => "-DENABLE_FP32_KERNELS",
        }
    }
}

/// Tensor memory layouts with dedicated kernels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DataLayout {
    /// Channel-last.
    Nhwc,
    /// Channel-first.
    Nchw,
}

impl KernelFeature for DataLayout {
    const VARIANTS: &'static [Self] = &[DataLayout::Nhwc, DataLayout::Nchw];

    fn token(self) -> &'static str {
        match self {
            DataLayout::Nhwc => "NHWC",
            DataLayout::Nchw => "NCHW",
        }
    }

    fn kernel_flag(self) -> &'static str {
        match self {
            DataLayout::Nhwc => "-DENABLE_NHWC_KERNELS",
            DataLayout::Nchw => "-DENABLE_NCHW_KERNELS",
        }
    }
}

/// A parsed selection over one feature group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection<F> {
    wildcard: bool,
    picked: Vec<F>,
    ignored: Vec<String>,
}

impl<F: KernelFeature> Selection<F> {
    /// Select every variant.
    pub fn all() -> Self {
        Self {
            wildcard: true,
            picked: Vec::new(),
            ignored: Vec::new(),
        }
    }

    /// Parse a comma-separated token list.
    ///
    /// Tokens are trimmed and matched case-insensitively. Empty and
    /// unrecognized tokens are recorded in [`Selection::ignored`] (empty ones
    /// silently) and otherwise have no effect.
    pub fn parse(raw: &str) -> Self {
        let mut selection = Self {
            wildcard: false,
            picked: Vec::new(),
            ignored: Vec::new(),
        };
        for token in raw.split(',').map(str::trim) {
            if token.is_empty() {
                continue;
            }
            if token.eq_ignore_ascii_case(WILDCARD) {
                selection.wildcard = true;
            } else if let Some(feature) = F::from_token(token) {
                if !selection.picked.contains(&feature) {
                    selection.picked.push(feature);
                }
            } else {
                log::debug!("ignoring unrecognized feature token '{token}'");
                selection.ignored.push(token.to_string());
            }
        }
        selection
    }

    /// Parse an optional environment value; unset or empty selects everything.
    ///
    /// Any other value, including one made only of whitespace, is parsed and
    /// can only narrow the selection.
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value {
            None | Some("") => Self::all(),
            Some(raw) => Self::parse(raw),
        }
    }

    /// Whether `feature` is selected, explicitly or through the wildcard.
    pub fn contains(&self, feature: F) -> bool {
        self.wildcard || self.picked.contains(&feature)
    }

    /// Whether the wildcard token was present.
    pub fn is_wildcard(&self) -> bool {
        self.wildcard
    }

    /// Selected variants in emission order, regardless of input order.
    pub fn enabled(&self) -> impl Iterator<Item = F> + '_ {
        F::VARIANTS.iter().copied().filter(move |f| self.contains(*f))
    }

    /// Tokens that matched nothing.
    pub fn ignored(&self) -> &[String] {
        &self.ignored
    }
}

impl<F: KernelFeature> Default for Selection<F> {
    fn default() -> Self {
        Self::all()
    }
}

/// Data-type and data-layout selections for one build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureSelection {
    pub data_types: Selection<DataType>,
    pub data_layouts: Selection<DataLayout>,
}

impl FeatureSelection {
    /// Build from the raw values of [`DATA_TYPE_ENV`] and [`DATA_LAYOUT_ENV`].
    pub fn from_env_values(data_types: Option<&str>, data_layouts: Option<&str>) -> Self {
        Self {
            data_types: Selection::from_env_value(data_types),
            data_layouts: Selection::from_env_value(data_layouts),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_selects_everything() {
        let types = Selection::<DataType>::parse("ALL");
        assert!(types.is_wildcard());
        assert_eq!(types.enabled().count(), DataType::VARIANTS.len());
    }

    #[test]
    fn mixed_case_tokens() {
        let types = Selection::<DataType>::parse("fp16,FP32");
        let enabled: Vec<DataType> = types.enabled().collect();
        assert_eq!(enabled, vec![DataType::Fp16, DataType::Fp32]);
        assert!(types.ignored().is_empty());
    }

    #[test]
    fn emission_order_ignores_input_order() {
        let types = Selection::<DataType>::parse("fp32,integer,qasymm8_signed");
        let enabled: Vec<DataType> = types.enabled().collect();
        assert_eq!(
            enabled,
            vec![DataType::Integer, DataType::Qasymm8Signed, DataType::Fp32]
        );
    }

    #[test]
    fn qasymm8_does_not_match_signed_variant() {
        let types = Selection::<DataType>::parse("QASYMM8");
        assert!(types.contains(DataType::Qasymm8));
        assert!(!types.contains(DataType::Qasymm8Signed));
    }

    #[test]
    fn unknown_and_empty_tokens() {
        let layouts = Selection::<DataLayout>::parse("nchw,,bogus, ");
        let enabled: Vec<DataLayout> = layouts.enabled().collect();
        assert_eq!(enabled, vec![DataLayout::Nchw]);
        assert_eq!(layouts.ignored(), ["bogus".to_string()]);
    }

    #[test]
    fn nothing_recognized_selects_nothing() {
        let layouts = Selection::<DataLayout>::parse("NDHWC");
        assert_eq!(layouts.enabled().count(), 0);
    }

    #[test]
    fn duplicates_collapse() {
        let types = Selection::<DataType>::parse("fp16,FP16,Fp16");
        assert_eq!(types.enabled().count(), 1);
    }

    #[test]
    fn unset_or_empty_env_defaults_to_all() {
        assert!(Selection::<DataType>::from_env_value(None).is_wildcard());
        assert!(Selection::<DataType>::from_env_value(Some("")).is_wildcard());
        assert!(!Selection::<DataType>::from_env_value(Some("fp32")).is_wildcard());
    }

    #[test]
    fn whitespace_env_selects_nothing() {
        let blank = Selection::<DataType>::from_env_value(Some("  "));
        assert!(!blank.is_wildcard());
        assert_eq!(blank.enabled().count(), 0);

        let commas = Selection::<DataType>::from_env_value(Some(" , "));
        assert_eq!(blank, commas);
    }

    #[test]
    fn every_variant_has_matching_token_and_flag() {
        for dt in DataType::VARIANTS {
            assert_eq!(DataType::from_token(dt.token()), Some(*dt));
            assert!(dt.kernel_flag().contains(dt.token()));
        }
        for dl in DataLayout::VARIANTS {
            assert_eq!(DataLayout::from_token(&dl.token().to_lowercase()), Some(*dl));
            assert!(dl.kernel_flag().contains(dl.token()));
        }
    }
}
