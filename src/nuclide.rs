use crate::data;
use crate::error::{Error, Result};
use crate::reaction::ReactionType;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

// Process-wide registry so that every material referring to the same isotope
// shares one Arc<Nuclide> instance.
static GLOBAL_NUCLIDE_CACHE: Lazy<Mutex<HashMap<String, Arc<Nuclide>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// A single isotope: its name, atomic mass, and a table of microscopic cross
/// sections by reaction channel.
///
/// Cross-section values are in barns (1e-24 cm^2). A `Nuclide` is constructed
/// once and treated as immutable afterwards; materials hold it behind
/// [`Arc`], so the same instance can appear in any number of compositions
/// (the same "U235" in both a metal and an oxide).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Nuclide {
    /// Canonical nuclide name, e.g. "U235".
    pub name: String,
    /// Atomic mass in g/mol.
    pub atomic_mass: f64,
    /// Microscopic cross section in barns per reaction channel.
    #[serde(default)]
    pub cross_sections: HashMap<ReactionType, f64>,
}

impl Nuclide {
    /// Build a nuclide, validating that the mass is positive and every cross
    /// section is a finite, non-negative number.
    pub fn new(
        name: impl Into<String>,
        atomic_mass: f64,
        cross_sections: HashMap<ReactionType, f64>,
    ) -> Result<Self> {
        let name = name.into();
        if !(atomic_mass > 0.0) || !atomic_mass.is_finite() {
            return Err(Error::InvalidNuclide(format!(
                "atomic mass of '{}' must be positive, got {}",
                name, atomic_mass
            )));
        }
        for (&reaction, &xs) in &cross_sections {
            if !xs.is_finite() || xs < 0.0 {
                return Err(Error::InvalidNuclide(format!(
                    "cross section of '{}' for {} must be a non-negative number, got {}",
                    name, reaction, xs
                )));
            }
        }
        Ok(Nuclide {
            name,
            atomic_mass,
            cross_sections,
        })
    }

    /// Build a nuclide using the atomic mass from the bundled
    /// [`crate::data::ATOMIC_MASSES`] table.
    pub fn from_table(name: &str, cross_sections: HashMap<ReactionType, f64>) -> Result<Self> {
        let mass =
            data::atomic_mass(name).ok_or_else(|| Error::UnknownNuclide(name.to_string()))?;
        Nuclide::new(name, mass, cross_sections)
    }

    /// Microscopic cross section in barns for a channel, if defined.
    pub fn microscopic_xs(&self, reaction: ReactionType) -> Option<f64> {
        self.cross_sections.get(&reaction).copied()
    }

    /// Channels this nuclide defines, in canonical MT order.
    pub fn reaction_types(&self) -> Vec<ReactionType> {
        ReactionType::ALL
            .iter()
            .copied()
            .filter(|r| self.cross_sections.contains_key(r))
            .collect()
    }
}

impl fmt::Display for Nuclide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {} g/mol", self.name, self.atomic_mass)
    }
}

/// Parse a nuclide from its JSON representation, e.g.
/// `{"name":"U235","atomic_mass":235.0439,"cross_sections":{"(n,fission)":585.1}}`.
pub fn nuclide_from_json_str(json: &str) -> Result<Nuclide> {
    let parsed: Nuclide = serde_json::from_str(json)?;
    // Re-run construction so JSON input gets the same validation.
    Nuclide::new(parsed.name, parsed.atomic_mass, parsed.cross_sections)
}

/// Insert a nuclide into the process-wide registry and return the shared
/// handle. If a nuclide with the same name is already registered, the
/// existing handle is returned and the argument is dropped.
pub fn get_or_register_nuclide(nuclide: Nuclide) -> Arc<Nuclide> {
    let mut cache = GLOBAL_NUCLIDE_CACHE
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    cache
        .entry(nuclide.name.clone())
        .or_insert_with(|| Arc::new(nuclide))
        .clone()
}

/// Shared handle to a previously registered nuclide, if any.
pub fn registered_nuclide(name: &str) -> Option<Arc<Nuclide>> {
    let cache = GLOBAL_NUCLIDE_CACHE
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    cache.get(name).cloned()
}

/// Clear the registry (used by tests to get deterministic behavior).
pub fn clear_nuclide_cache() {
    let mut cache = GLOBAL_NUCLIDE_CACHE
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    cache.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u235_xs() -> HashMap<ReactionType, f64> {
        let mut xs = HashMap::new();
        xs.insert(ReactionType::Fission, 585.1);
        xs.insert(ReactionType::Capture, 98.7);
        xs
    }

    #[test]
    fn test_new_validates_mass() {
        assert!(Nuclide::new("U235", 235.0439, u235_xs()).is_ok());
        assert!(matches!(
            Nuclide::new("U235", 0.0, HashMap::new()),
            Err(Error::InvalidNuclide(_))
        ));
        assert!(matches!(
            Nuclide::new("U235", -1.0, HashMap::new()),
            Err(Error::InvalidNuclide(_))
        ));
    }

    #[test]
    fn test_new_validates_cross_sections() {
        let mut xs = HashMap::new();
        xs.insert(ReactionType::Fission, -2.0);
        assert!(matches!(
            Nuclide::new("U235", 235.0439, xs),
            Err(Error::InvalidNuclide(_))
        ));

        let mut xs = HashMap::new();
        xs.insert(ReactionType::Fission, f64::NAN);
        assert!(Nuclide::new("U235", 235.0439, xs).is_err());
    }

    #[test]
    fn test_from_table() {
        let nuclide = Nuclide::from_table("O16", HashMap::new()).unwrap();
        assert!((nuclide.atomic_mass - 15.9949).abs() < 1e-3);
        assert!(matches!(
            Nuclide::from_table("Xx999", HashMap::new()),
            Err(Error::UnknownNuclide(_))
        ));
    }

    #[test]
    fn test_display() {
        let nuclide = Nuclide::new("U235", 235.0439, HashMap::new()).unwrap();
        assert_eq!(format!("{}", nuclide), "U235 @ 235.0439 g/mol");
    }

    #[test]
    fn test_reaction_types_are_mt_ordered() {
        let mut xs = HashMap::new();
        xs.insert(ReactionType::Capture, 1.0);
        xs.insert(ReactionType::Elastic, 2.0);
        xs.insert(ReactionType::Fission, 3.0);
        let nuclide = Nuclide::new("X", 1.0, xs).unwrap();
        assert_eq!(
            nuclide.reaction_types(),
            vec![
                ReactionType::Elastic,
                ReactionType::Fission,
                ReactionType::Capture
            ]
        );
    }

    #[test]
    fn test_json_round_trip() {
        let nuclide = Nuclide::new("U235", 235.0439, u235_xs()).unwrap();
        let json = serde_json::to_string(&nuclide).unwrap();
        let back = nuclide_from_json_str(&json).unwrap();
        assert_eq!(back.name, "U235");
        assert_eq!(back.atomic_mass, 235.0439);
        assert_eq!(back.microscopic_xs(ReactionType::Fission), Some(585.1));
    }

    #[test]
    fn test_json_rejects_bad_mass() {
        let json = r#"{"name":"U235","atomic_mass":-1.0,"cross_sections":{}}"#;
        assert!(nuclide_from_json_str(json).is_err());
    }

    #[test]
    fn test_registry_shares_instances() {
        clear_nuclide_cache();
        let first =
            get_or_register_nuclide(Nuclide::new("RegShared1", 10.0, HashMap::new()).unwrap());
        let second =
            get_or_register_nuclide(Nuclide::new("RegShared1", 99.0, HashMap::new()).unwrap());
        // Same name resolves to the same shared instance; the second insert is dropped.
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.atomic_mass, 10.0);
        assert!(registered_nuclide("RegShared1").is_some());
        clear_nuclide_cache();
        assert!(registered_nuclide("RegShared1").is_none());
    }
}
