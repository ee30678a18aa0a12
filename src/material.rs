use crate::data::{AVOGADRO, BARNS_TO_CM2};
use crate::error::{Error, Result};
use crate::nuclide::Nuclide;
use crate::reaction::ReactionType;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Which of the two composition mappings is authoritative for a material.
///
/// Set explicitly whenever a fraction mapping is populated; the conversion
/// methods consult it instead of inferring the representation from the
/// numeric content of the mappings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FractionBasis {
    #[default]
    Unset,
    Weight,
    Atomic,
}

/// Number density in atoms/cm^3 of one nuclide.
///
/// `density` is the material mass density in g/cm^3, `atomic_mass` the
/// (average) atomic mass in g/mol, and `fraction` the atom fraction of the
/// nuclide in the material.
pub fn number_density(density: f64, atomic_mass: f64, fraction: f64) -> f64 {
    density * AVOGADRO / atomic_mass * fraction
}

/// A material: a mass density plus a nuclide composition, with the derived
/// quantities needed for collision sampling.
///
/// Nuclides are held behind [`Arc`] and may be shared with other materials.
/// The composition can be given either by weight fraction or by atom
/// fraction; [`Material::convert_weight_to_atomic`] and
/// [`Material::convert_atomic_to_weight`] fill in the other view. The average
/// atomic mass and the total macroscopic cross section are memoized in
/// `Option` fields; every mutation of density or composition clears them.
///
/// Typical workflow:
/// 1. Create with [`Material::new`], add nuclides, set the density.
/// 2. Populate one fraction mapping, then call [`Material::aggregate`].
/// 3. Sample with [`Material::sample_reaction_type`]; an aggregated material
///    is read-only there, so it can be shared across threads, each thread
///    holding its own random number generator.
#[derive(Debug, Clone)]
pub struct Material {
    /// Display name of the material.
    pub name: String,
    /// Mass density in `density_units`.
    pub density: Option<f64>,
    /// Density unit (default: g/cm³).
    pub density_units: String,
    /// Composition as a map of nuclide name to shared nuclide data.
    pub nuclides: HashMap<String, Arc<Nuclide>>,
    /// Weight fraction per nuclide name.
    pub weight_fractions: HashMap<String, f64>,
    /// Atom fraction per nuclide name.
    pub atomic_fractions: HashMap<String, f64>,
    /// Which fraction mapping is authoritative.
    pub basis: FractionBasis,
    /// Memoized average atomic mass in g/mol; `None` until computed.
    pub avg_atomic_mass: Option<f64>,
    /// Memoized total macroscopic cross section in 1/cm; `None` until computed.
    pub total_macroscopic_xs: Option<f64>,
}

impl Material {
    pub fn new(name: impl Into<String>) -> Self {
        Material {
            name: name.into(),
            density: None,
            density_units: String::from("g/cm3"),
            nuclides: HashMap::new(),
            weight_fractions: HashMap::new(),
            atomic_fractions: HashMap::new(),
            basis: FractionBasis::Unset,
            avg_atomic_mass: None,
            total_macroscopic_xs: None,
        }
    }

    fn config_err(&self, reason: impl Into<String>) -> Error {
        Error::Configuration {
            material: self.name.clone(),
            reason: reason.into(),
        }
    }

    fn norm_err(&self, reason: impl Into<String>) -> Error {
        Error::Normalization {
            material: self.name.clone(),
            reason: reason.into(),
        }
    }

    /// Clear the memoized derived quantities.
    fn invalidate_cache(&mut self) {
        self.avg_atomic_mass = None;
        self.total_macroscopic_xs = None;
    }

    /// Set the mass density. Supported units are `"g/cm3"` and `"kg/m3"`.
    pub fn set_density(&mut self, units: impl AsRef<str>, value: f64) -> Result<()> {
        let units = units.as_ref();
        if !matches!(units, "g/cm3" | "kg/m3") {
            return Err(self.config_err(format!("unsupported density units '{}'", units)));
        }
        if !(value > 0.0) {
            return Err(self.config_err("density must be positive"));
        }
        self.density = Some(value);
        self.density_units = String::from(units);
        self.invalidate_cache();
        Ok(())
    }

    /// Density in g/cm^3 regardless of the unit it was set in.
    fn density_g_cm3(&self) -> Result<f64> {
        let value = self
            .density
            .ok_or_else(|| self.config_err("density not set"))?;
        match self.density_units.as_str() {
            "kg/m3" => Ok(value / 1000.0),
            _ => Ok(value),
        }
    }

    /// Add a nuclide to the composition, keyed by its name. Re-adding a name
    /// replaces the previous entry.
    pub fn add_nuclide(&mut self, nuclide: Arc<Nuclide>) {
        self.nuclides.insert(nuclide.name.clone(), nuclide);
        self.invalidate_cache();
    }

    /// Nuclide names in sorted order — the deterministic iteration order used
    /// by the sampling walk.
    pub fn sorted_nuclide_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.nuclides.keys().cloned().collect();
        names.sort();
        names
    }

    /// Set the weight fraction of one nuclide and mark the weight mapping as
    /// authoritative.
    pub fn set_weight_fraction(&mut self, nuclide: impl AsRef<str>, fraction: f64) -> Result<()> {
        if fraction < 0.0 {
            return Err(self.norm_err("fraction cannot be negative"));
        }
        self.weight_fractions
            .insert(String::from(nuclide.as_ref()), fraction);
        self.basis = FractionBasis::Weight;
        self.invalidate_cache();
        Ok(())
    }

    /// Set the atom fraction of one nuclide and mark the atomic mapping as
    /// authoritative.
    pub fn set_atomic_fraction(&mut self, nuclide: impl AsRef<str>, fraction: f64) -> Result<()> {
        if fraction < 0.0 {
            return Err(self.norm_err("fraction cannot be negative"));
        }
        self.atomic_fractions
            .insert(String::from(nuclide.as_ref()), fraction);
        self.basis = FractionBasis::Atomic;
        self.invalidate_cache();
        Ok(())
    }

    /// Convert weight fractions to atom fractions:
    /// `a_i = (w_i / m_i) / Σ_j (w_j / m_j)`.
    ///
    /// Does nothing unless the weight mapping is the authoritative one, in
    /// which case every nuclide must have a weight fraction.
    pub fn convert_weight_to_atomic(&mut self) -> Result<()> {
        if self.basis != FractionBasis::Weight {
            // Composition is already expressed in atom fractions (or not set).
            return Ok(());
        }
        let mut total_at = 0.0;
        for (name, nuclide) in &self.nuclides {
            let wt = self
                .weight_fractions
                .get(name)
                .ok_or_else(|| Error::Configuration {
                    material: self.name.clone(),
                    reason: format!("no weight fraction for nuclide '{}'", name),
                })?;
            total_at += wt / nuclide.atomic_mass;
        }
        if !(total_at > 0.0) {
            return Err(self.norm_err("weight fractions are unset or non-physical"));
        }
        let atomic: Vec<(String, f64)> = self
            .nuclides
            .iter()
            .map(|(name, nuclide)| {
                let wt = self.weight_fractions[name];
                (name.clone(), wt / nuclide.atomic_mass / total_at)
            })
            .collect();
        self.atomic_fractions.extend(atomic);
        self.invalidate_cache();
        Ok(())
    }

    /// Convert atom fractions to weight fractions:
    /// `w_i = (a_i · m_i) / Σ_j (a_j · m_j)`.
    ///
    /// Does nothing unless the atomic mapping is the authoritative one.
    /// Nuclides that already have a weight fraction keep it; only the missing
    /// entries are filled in, so partially pre-seeded weight data survives.
    pub fn convert_atomic_to_weight(&mut self) -> Result<()> {
        if self.basis != FractionBasis::Atomic {
            // Composition is already expressed in weight fractions (or not set).
            return Ok(());
        }
        let mut total_wt = 0.0;
        for (name, nuclide) in &self.nuclides {
            let at = self
                .atomic_fractions
                .get(name)
                .ok_or_else(|| Error::Configuration {
                    material: self.name.clone(),
                    reason: format!("no atom fraction for nuclide '{}'", name),
                })?;
            total_wt += at * nuclide.atomic_mass;
        }
        if !(total_wt > 0.0) {
            return Err(self.norm_err("atom fractions are unset or non-physical"));
        }
        let weights: Vec<(String, f64)> = self
            .nuclides
            .iter()
            .filter(|(name, _)| !self.weight_fractions.contains_key(*name))
            .map(|(name, nuclide)| {
                let at = self.atomic_fractions[name];
                (name.clone(), at * nuclide.atomic_mass / total_wt)
            })
            .collect();
        self.weight_fractions.extend(weights);
        self.invalidate_cache();
        Ok(())
    }

    /// Average atomic mass in g/mol, `Σ_i m_i · a_i`, memoized.
    ///
    /// Requires an atom fraction for every nuclide (run
    /// [`Material::convert_weight_to_atomic`] first if the composition was
    /// given by weight).
    pub fn average_atomic_mass(&mut self) -> Result<f64> {
        if let Some(a) = self.avg_atomic_mass {
            return Ok(a);
        }
        if self.nuclides.is_empty() {
            return Err(self.config_err("material has no nuclides"));
        }
        let mut a_avg = 0.0;
        for (name, nuclide) in &self.nuclides {
            let at = self
                .atomic_fractions
                .get(name)
                .ok_or_else(|| Error::Configuration {
                    material: self.name.clone(),
                    reason: format!("no atom fraction for nuclide '{}'", name),
                })?;
            a_avg += nuclide.atomic_mass * at;
        }
        self.avg_atomic_mass = Some(a_avg);
        Ok(a_avg)
    }

    /// Macroscopic cross section in 1/cm for one nuclide and one reaction
    /// channel: microscopic cross section (barns → cm^2) times the nuclide's
    /// number density at its atom fraction.
    pub fn macroscopic_cross_section(
        &mut self,
        nuclide: impl AsRef<str>,
        reaction: ReactionType,
    ) -> Result<f64> {
        let density = self.density_g_cm3()?;
        let a_avg = self.average_atomic_mass()?;
        let key = nuclide.as_ref();
        let nuclide = self
            .nuclides
            .get(key)
            .ok_or_else(|| Error::UnknownNuclide(key.to_string()))?;
        let at = self
            .atomic_fractions
            .get(key)
            .copied()
            .ok_or_else(|| Error::Configuration {
                material: self.name.clone(),
                reason: format!("no atom fraction for nuclide '{}'", key),
            })?;
        let micro = nuclide
            .microscopic_xs(reaction)
            .ok_or_else(|| Error::MissingReaction {
                nuclide: key.to_string(),
                reaction,
            })?;
        Ok(micro * BARNS_TO_CM2 * number_density(density, a_avg, at))
    }

    /// Total macroscopic cross section in 1/cm over all nuclides and all of
    /// their reaction channels, memoized.
    pub fn total_macroscopic_cross_section(&mut self) -> Result<f64> {
        if let Some(t) = self.total_macroscopic_xs {
            return Ok(t);
        }
        let mut total = 0.0;
        for name in self.sorted_nuclide_names() {
            let nuclide = self.nuclides[&name].clone();
            for reaction in nuclide.reaction_types() {
                total += self.macroscopic_cross_section(&name, reaction)?;
            }
        }
        self.total_macroscopic_xs = Some(total);
        Ok(total)
    }

    /// Mean free path in cm, `1 / Σ_total`.
    pub fn mean_free_path(&mut self) -> Result<f64> {
        let total = self.total_macroscopic_cross_section()?;
        if !(total > 0.0) {
            return Err(self.norm_err("total macroscopic cross section is zero"));
        }
        Ok(1.0 / total)
    }

    /// Resolve every derived quantity: fill in the non-authoritative fraction
    /// mapping, check the fraction-sum invariant, and build the memoized
    /// average atomic mass and total cross section. After this returns `Ok`,
    /// the material is a shared-read snapshot ready for sampling.
    pub fn aggregate(&mut self) -> Result<()> {
        self.convert_weight_to_atomic()?;
        self.convert_atomic_to_weight()?;
        self.validate_fraction_sum()?;
        self.average_atomic_mass()?;
        self.total_macroscopic_cross_section()?;
        Ok(())
    }

    /// Check that the authoritative fraction mapping covers every nuclide and
    /// sums to 1 within tolerance.
    fn validate_fraction_sum(&self) -> Result<()> {
        let (fractions, which) = match self.basis {
            FractionBasis::Weight => (&self.weight_fractions, "weight"),
            FractionBasis::Atomic => (&self.atomic_fractions, "atom"),
            FractionBasis::Unset => {
                return Err(self.config_err("no fraction mapping has been populated"));
            }
        };
        let mut sum = 0.0;
        for name in self.nuclides.keys() {
            sum += fractions.get(name).ok_or_else(|| Error::Configuration {
                material: self.name.clone(),
                reason: format!("no {} fraction for nuclide '{}'", which, name),
            })?;
        }
        if (sum - 1.0).abs() > 1e-9 {
            return Err(self.norm_err(format!("{} fractions sum to {}, expected 1", which, sum)));
        }
        Ok(())
    }

    /// Stochastically select a reaction channel, weighted by its share of the
    /// total macroscopic cross section.
    ///
    /// Walks nuclides in sorted-name order and each nuclide's channels in MT
    /// order, accumulating `a_n · (Σ_{n,r} / Σ_total)` until the running sum
    /// exceeds a uniform draw. The atom fraction appears in the cumulative
    /// weight in addition to the number-density factor already inside
    /// `Σ_{n,r}`; this mirrors the historical sampling formula, so for a
    /// multi-nuclide material the cumulative sum tops out below one and large
    /// draws surface [`Error::SamplingExhausted`].
    ///
    /// Requires [`Material::aggregate`] to have run; takes `&self` so an
    /// aggregated material can be sampled concurrently, one RNG per caller.
    pub fn sample_reaction_type<R: rand::Rng + ?Sized>(&self, rng: &mut R) -> Result<ReactionType> {
        let total = self
            .total_macroscopic_xs
            .ok_or_else(|| self.config_err("total macroscopic cross section not yet computed"))?;
        if !(total > 0.0) {
            return Err(self.norm_err("total macroscopic cross section is zero"));
        }
        let a_avg = self
            .avg_atomic_mass
            .ok_or_else(|| self.config_err("average atomic mass not yet computed"))?;
        let density = self.density_g_cm3()?;

        let xi: f64 = rng.gen_range(0.0..1.0);
        let mut ratio = 0.0;
        for name in self.sorted_nuclide_names() {
            let nuclide = &self.nuclides[&name];
            let at = self
                .atomic_fractions
                .get(&name)
                .copied()
                .ok_or_else(|| Error::Configuration {
                    material: self.name.clone(),
                    reason: format!("no atom fraction for nuclide '{}'", name),
                })?;
            for reaction in nuclide.reaction_types() {
                let micro = nuclide.cross_sections[&reaction] * BARNS_TO_CM2;
                let macro_xs = micro * number_density(density, a_avg, at);
                ratio += at * (macro_xs / total);
                if ratio > xi {
                    return Ok(reaction);
                }
            }
        }
        Err(Error::SamplingExhausted {
            material: self.name.clone(),
            ratio,
            xi,
        })
    }

    /// Stochastically select which nuclide a collision happens with, weighted
    /// by each nuclide's total macroscopic cross section.
    ///
    /// Same preconditions and concurrency contract as
    /// [`Material::sample_reaction_type`].
    pub fn sample_interacting_nuclide<R: rand::Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<String> {
        let a_avg = self
            .avg_atomic_mass
            .ok_or_else(|| self.config_err("average atomic mass not yet computed"))?;
        let density = self.density_g_cm3()?;

        let mut xs_by_nuclide = Vec::new();
        let mut total = 0.0;
        for name in self.sorted_nuclide_names() {
            let nuclide = &self.nuclides[&name];
            let at = self
                .atomic_fractions
                .get(&name)
                .copied()
                .ok_or_else(|| Error::Configuration {
                    material: self.name.clone(),
                    reason: format!("no atom fraction for nuclide '{}'", name),
                })?;
            let sigma: f64 = nuclide
                .cross_sections
                .values()
                .map(|micro| micro * BARNS_TO_CM2 * number_density(density, a_avg, at))
                .sum();
            if sigma > 0.0 {
                xs_by_nuclide.push((name, sigma));
                total += sigma;
            }
        }
        if xs_by_nuclide.is_empty() || !(total > 0.0) {
            return Err(self.norm_err("no nuclide has a nonzero macroscopic cross section"));
        }
        let xi = rng.gen_range(0.0..total);
        let mut accum = 0.0;
        for (name, sigma) in xs_by_nuclide {
            accum += sigma;
            if xi < accum {
                return Ok(name);
            }
        }
        Err(Error::SamplingExhausted {
            material: self.name.clone(),
            ratio: accum / total,
            xi: xi / total,
        })
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.density {
            Some(d) => write!(f, "{} @ {} {}: ", self.name, d, self.density_units)?,
            None => write!(f, "{}: ", self.name)?,
        }
        f.write_str(&self.sorted_nuclide_names().join(", "))
    }
}
