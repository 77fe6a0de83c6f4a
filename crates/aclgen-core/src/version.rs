//! Platform release table.
//!
//! Releases are known both by letter code and by number. The table maps every
//! accepted identifier to a [`Release`], whose ordinal drives "at least
//! release N" comparisons.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A platform release the library can be built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Release {
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
}

/// Identifier to release mapping. Immutable for the life of the process.
static VERSION_TABLE: &[(&str, Release)] = &[
    ("O", Release::O),
    ("8", Release::O),
    ("P", Release::P),
    ("9", Release::P),
    ("Q", Release::Q),
    ("10", Release::Q),
    ("R", Release::R),
    ("11", Release::R),
    ("S", Release::S),
    ("12", Release::S),
    ("T", Release::T),
    ("13", Release::T),
    ("U", Release::U),
    ("14", Release::U),
    ("V", Release::V),
    ("15", Release::V),
];

impl Release {
    /// Every known release, oldest first.
    pub const ALL: [Release; 8] = [
        Release::O,
        Release::P,
        Release::Q,
        Release::R,
        Release::S,
        Release::T,
        Release::U,
        Release::V,
    ];

    /// Parse a platform version identifier.
    ///
    /// Accepts the letter code (either case) or the release number. Returns
    /// `None` for identifiers not in the table.
    pub fn parse(name: &str) -> Option<Release> {
        let name = name.trim();
        VERSION_TABLE
            .iter()
            .find(|(id, _)| id.eq_ignore_ascii_case(name))
            .map(|(_, release)| *release)
    }

    /// Ordinal used for ordered comparisons (the release number).
    pub fn ordinal(self) -> u32 {
        match self {
            Release::O => 8,
            Release::P => 9,
            Release::Q => 10,
            Release::R => 11,
            Release::S => 12,
            Release::T => 13,
            Release::U => 14,
            Release::V => 15,
        }
    }

    /// Letter code of the release.
    pub fn code(self) -> &'static str {
        match self {
            Release::O => "O",
            Release::P => "P",
            Release::Q => "Q",
            Release::R => "R",
            Release::S => "S",
            Release::T => "T",
            Release::U => "U",
            Release::V => "V",
        }
    }

    /// Whether the release's toolchain cannot handle address-significance tables.
    ///
    /// This is a fixed set, not an ordinal range.
    pub fn lacks_addrsig(self) -> bool {
        matches!(self, Release::Q | Release::R | Release::S)
    }

    /// Whether the release enables the fp16 arch flags on `armv8-2a` builds.
    pub fn gates_fp16_arch(self) -> bool {
        matches!(self, Release::R)
    }
}

impl fmt::Display for Release {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.code(), self.ordinal())
    }
}

/// Look up the ordinal of a platform version identifier.
pub fn ordinal(name: &str) -> Option<u32> {
    Release::parse(name).map(Release::ordinal)
}

/// All accepted identifiers with their release, in table order.
pub fn entries() -> &'static [(&'static str, Release)] {
    VERSION_TABLE
}
