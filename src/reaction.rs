use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A neutron interaction channel, identified by its ENDF/MT number.
///
/// The engine works with a closed set of channels rather than free-form
/// strings so lookups are typo-proof and iteration order is fixed. Channels
/// carry the conventional `"(n,...)"` names in their serialized form, which
/// is also what [`FromStr`] accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ReactionType {
    /// Elastic scattering, MT 2.
    #[serde(rename = "(n,elastic)")]
    Elastic,
    /// Inelastic level scattering, MT 4.
    #[serde(rename = "(n,level)")]
    Inelastic,
    /// Fission, MT 18.
    #[serde(rename = "(n,fission)")]
    Fission,
    /// Absorption, MT 27.
    #[serde(rename = "(n,absorption)")]
    Absorption,
    /// Radiative capture, MT 102.
    #[serde(rename = "(n,gamma)")]
    Capture,
}

impl ReactionType {
    /// Every channel in ascending MT order. This is the canonical iteration
    /// order wherever a reproducible walk over reaction channels is needed.
    pub const ALL: [ReactionType; 5] = [
        ReactionType::Elastic,
        ReactionType::Inelastic,
        ReactionType::Fission,
        ReactionType::Absorption,
        ReactionType::Capture,
    ];

    /// The ENDF/MT number of this channel.
    pub const fn mt(self) -> i32 {
        match self {
            ReactionType::Elastic => 2,
            ReactionType::Inelastic => 4,
            ReactionType::Fission => 18,
            ReactionType::Absorption => 27,
            ReactionType::Capture => 102,
        }
    }

    /// Look a channel up by MT number.
    pub fn from_mt(mt: i32) -> Option<Self> {
        Self::ALL.iter().copied().find(|r| r.mt() == mt)
    }

    /// The conventional reaction name, e.g. `"(n,gamma)"`.
    pub const fn name(self) -> &'static str {
        match self {
            ReactionType::Elastic => "(n,elastic)",
            ReactionType::Inelastic => "(n,level)",
            ReactionType::Fission => "(n,fission)",
            ReactionType::Absorption => "(n,absorption)",
            ReactionType::Capture => "(n,gamma)",
        }
    }
}

impl fmt::Display for ReactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ReactionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|r| r.name() == s)
            .ok_or_else(|| Error::UnknownReaction(s.to_string()))
    }
}
