use crate::reaction::ReactionType;
use thiserror::Error;

/// Errors produced by the material / cross-section engine.
///
/// The variants separate missing setup ([`Error::Configuration`]) from
/// non-physical input data ([`Error::Normalization`]) and from the defensive
/// invariant check at the end of the sampling walk
/// ([`Error::SamplingExhausted`]), so callers can distinguish "call the setup
/// methods first" from "fix your data".
#[derive(Debug, Error)]
pub enum Error {
    /// A derived quantity was requested before the material was fully
    /// specified (density missing, fractions unresolved, caches not built).
    #[error("material '{material}' is not ready: {reason}")]
    Configuration { material: String, reason: String },

    /// Fraction data that should sum to ~1 is zero, negative, or otherwise
    /// non-physical.
    #[error("material '{material}' has a non-physical composition: {reason}")]
    Normalization { material: String, reason: String },

    /// A nuclide name was referenced that is not part of the material (or,
    /// for mass-table lookups, not in the bundled data).
    #[error("unknown nuclide '{0}'")]
    UnknownNuclide(String),

    /// A reaction channel was requested that the nuclide's cross-section
    /// table does not define.
    #[error("nuclide '{nuclide}' has no cross section for {reaction}")]
    MissingReaction {
        nuclide: String,
        reaction: ReactionType,
    },

    /// A reaction name could not be parsed.
    #[error("unknown reaction name '{0}'")]
    UnknownReaction(String),

    /// A nuclide or cross-section value failed validation at construction.
    #[error("invalid nuclide data: {0}")]
    InvalidNuclide(String),

    /// Nuclide JSON could not be parsed.
    #[error("failed to parse nuclide JSON")]
    Json(#[from] serde_json::Error),

    /// The cumulative sampling walk visited every (nuclide, reaction) pair
    /// without the running ratio exceeding the random draw. Indicates
    /// malformed cross-section data, an empty material, or a draw beyond the
    /// reachable cumulative weight.
    #[error(
        "reaction sampling exhausted all channels of material '{material}' \
         (cumulative ratio {ratio}, xi {xi})"
    )]
    SamplingExhausted {
        material: String,
        ratio: f64,
        xi: f64,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
