// Build a UO2 material, aggregate its cross sections, and sample reaction
// channels from it.

use std::collections::HashMap;
use std::sync::Arc;
use xsmat::{Material, Nuclide, ReactionType, StreamRng};

fn main() {
    let u235 = Arc::new(
        Nuclide::new(
            "U235",
            235.0439,
            HashMap::from([
                (ReactionType::Fission, 585.1),
                (ReactionType::Capture, 98.7),
            ]),
        )
        .unwrap(),
    );
    let u238 = Arc::new(
        Nuclide::new(
            "U238",
            238.0508,
            HashMap::from([(ReactionType::Capture, 2.68)]),
        )
        .unwrap(),
    );
    let o16 = Arc::new(
        Nuclide::new("O16", 15.9994, HashMap::from([(ReactionType::Elastic, 3.9)])).unwrap(),
    );

    let mut uo2 = Material::new("UO2");
    for nuclide in [u235, u238, o16] {
        uo2.add_nuclide(nuclide);
    }
    for name in ["U235", "U238", "O16"] {
        uo2.set_atomic_fraction(name, 1.0 / 3.0).unwrap();
    }
    uo2.set_density("g/cm3", 10.0).unwrap();
    uo2.aggregate().unwrap();

    println!("{}", uo2);
    println!(
        "average atomic mass: {:.2} g/mol",
        uo2.avg_atomic_mass.unwrap()
    );
    println!(
        "total macroscopic cross section: {:.4} 1/cm",
        uo2.total_macroscopic_xs.unwrap()
    );

    let mut rng = StreamRng::new(42);
    println!("\nSampling 10 reaction channels:");
    for i in 0..10 {
        match uo2.sample_reaction_type(&mut rng) {
            Ok(reaction) => println!("  draw {}: {}", i + 1, reaction),
            Err(e) => println!("  draw {}: {}", i + 1, e),
        }
    }
}
