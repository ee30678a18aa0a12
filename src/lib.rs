//! Nuclide and material cross-section engine with Monte Carlo
//! reaction-channel sampling.
//!
//! A [`Material`] owns shared references to [`Nuclide`] records (microscopic
//! cross sections in barns), converts between weight- and atom-fraction
//! composition views, aggregates macroscopic cross sections, and samples a
//! reaction channel proportional to its share of the total interaction rate.

mod data;
mod error;
mod material;
mod nuclide;
mod reaction;
mod rng;

pub use data::{atomic_mass, AVOGADRO, BARNS_TO_CM2};
pub use error::{Error, Result};
pub use material::{number_density, FractionBasis, Material};
pub use nuclide::{
    clear_nuclide_cache, get_or_register_nuclide, nuclide_from_json_str, registered_nuclide,
    Nuclide,
};
pub use reaction::ReactionType;
pub use rng::StreamRng;
