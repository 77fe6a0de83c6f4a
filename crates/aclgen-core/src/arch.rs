//! Target architecture identifiers.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// A CPU architecture or architecture variant named by the build host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Arch {
    Arm,
    Arm64,
    X86,
    X86_64,
    Riscv64,
    Armv7a,
    Armv7aNeon,
    Armv8a,
    /// ARMv8.2-A, the first variant with half-precision arithmetic.
    Armv82a,
    Armv9a,
    /// Any identifier not listed above, kept verbatim.
    Other(String),
}

impl Arch {
    /// Parse an architecture identifier. Never fails; unknown names become [`Arch::Other`].
    pub fn parse(name: &str) -> Arch {
        let name = name.trim();
        match name.to_ascii_lowercase().as_str() {
            "arm" => Arch::Arm,
            "arm64" => Arch::Arm64,
            "x86" => Arch::X86,
            "x86_64" => Arch::X86_64,
            "riscv64" => Arch::Riscv64,
            "armv7-a" => Arch::Armv7a,
            "armv7-a-neon" => Arch::Armv7aNeon,
            "armv8-a" => Arch::Armv8a,
            "armv8-2a" => Arch::Armv82a,
            "armv9-a" => Arch::Armv9a,
            _ => {
                log::debug!("unrecognized architecture '{name}'");
                Arch::Other(name.to_string())
            }
        }
    }

    /// Canonical identifier.
    pub fn as_str(&self) -> &str {
        match self {
            Arch::Arm => "arm",
            Arch::Arm64 => "arm64",
            Arch::X86 => "x86",
            Arch::X86_64 => "x86_64",
            Arch::Riscv64 => "riscv64",
            Arch::Armv7a => "armv7-a",
            Arch::Armv7aNeon => "armv7-a-neon",
            Arch::Armv8a => "armv8-a",
            Arch::Armv82a => "armv8-2a",
            Arch::Armv9a => "armv9-a",
            Arch::Other(name) => name,
        }
    }

    /// Whether this is one of the identifiers known to the deriver.
    pub fn is_known(&self) -> bool {
        !matches!(self, Arch::Other(_))
    }
}

impl FromStr for Arch {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Arch::parse(s))
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_identifiers() {
        assert_eq!(Arch::parse("armv8-2a"), Arch::Armv82a);
        assert_eq!(Arch::parse("arm64"), Arch::Arm64);
        assert_eq!(Arch::parse("ARMv8-2A"), Arch::Armv82a);
        assert_eq!(Arch::parse(" x86_64 "), Arch::X86_64);
    }

    #[test]
    fn unknown_identifiers_are_kept() {
        let arch = Arch::parse("mips");
        assert_eq!(arch, Arch::Other("mips".into()));
        assert_eq!(arch.as_str(), "mips");
        assert!(!arch.is_known());
    }

    #[test]
    fn canonical_names_round_trip() {
        let all = [
            Arch::Arm,
            Arch::Arm64,
            Arch::X86,
            Arch::X86_64,
            Arch::Riscv64,
            Arch::Armv7a,
            Arch::Armv7aNeon,
            Arch::Armv8a,
            Arch::Armv82a,
            Arch::Armv9a,
        ];
        for arch in all {
            assert!(arch.is_known());
            assert_eq!(arch.as_str().parse::<Arch>().unwrap(), arch);
        }
    }

    #[test]
    fn similar_spellings_do_not_match() {
        assert!(!Arch::parse("armv8.2-a").is_known());
        assert!(!Arch::parse("armv8-2a+fp16").is_known());
    }
}
