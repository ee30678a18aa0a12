// Static reference data for the materials library.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Avogadro's number in atoms per mole.
pub const AVOGADRO: f64 = 6.02214076e23;

/// Conversion factor from barns to cm^2 (1 barn = 1e-24 cm^2).
pub const BARNS_TO_CM2: f64 = 1.0e-24;

/// Atomic masses in g/mol for nuclides commonly used in reactor materials.
///
/// Each key is a nuclide name (e.g. `"U235"`). The table lets callers build a
/// [`crate::Nuclide`] by name without hand-entering the mass; a nuclide with
/// an explicit mass can always be constructed directly instead.
pub static ATOMIC_MASSES: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    let mut m = HashMap::new();

    // Hydrogen
    m.insert("H1", 1.00782503224);
    m.insert("H2", 2.01410177811);

    // Lithium
    m.insert("Li6", 6.01512288742);
    m.insert("Li7", 7.016003434);

    // Beryllium
    m.insert("Be9", 9.012183062);

    // Boron
    m.insert("B10", 10.012936862);
    m.insert("B11", 11.009305167);

    // Carbon
    m.insert("C12", 12.0);
    m.insert("C13", 13.003354835);

    // Nitrogen
    m.insert("N14", 14.003074004);
    m.insert("N15", 15.000108899);

    // Oxygen
    m.insert("O16", 15.994914619);
    m.insert("O17", 16.999131757);
    m.insert("O18", 17.999159613);

    // Sodium
    m.insert("Na23", 22.989769282);

    // Zirconium
    m.insert("Zr90", 89.904698755);
    m.insert("Zr91", 90.905640205);
    m.insert("Zr92", 91.905035336);
    m.insert("Zr94", 93.906312523);
    m.insert("Zr96", 95.908271433);

    // Uranium
    m.insert("U233", 233.039634294);
    m.insert("U234", 234.040950296);
    m.insert("U235", 235.043928117);
    m.insert("U238", 238.050786936);

    // Plutonium
    m.insert("Pu239", 239.052161596);
    m.insert("Pu240", 240.053811740);
    m.insert("Pu241", 241.056849651);

    m
});

/// Look up the atomic mass (g/mol) of a nuclide by name.
pub fn atomic_mass(nuclide: &str) -> Option<f64> {
    ATOMIC_MASSES.get(nuclide).copied()
}
