//! Deterministic generation of the TRAPPIST-1 system.
//!
//! Each planet draws from a stream seeded by its own id, so regenerating one
//! planet (or the whole system) always yields the same zones.

pub mod analysis;
pub mod atmosphere;
pub mod planets;
pub mod zones;

use std::collections::BTreeMap;
use std::f64::consts::TAU;

use crate::components::{Moon, Planet};
use crate::config::WorldConfig;
use crate::orbit::{self, SECONDS_PER_DAY};
use crate::rng::{identity_rng, RngExt};

pub use planets::{PlanetDefinition, PLANET_TABLE};

const MOON_NUMERALS: [&str; 4] = ["I", "II", "III", "IV"];

/// The canonical world with the built-in seed and layout radius.
pub fn generate_trappist1_system() -> Vec<Planet> {
    generate_system(&WorldConfig::default())
}

pub fn generate_system(config: &WorldConfig) -> Vec<Planet> {
    let count = PLANET_TABLE.len();
    PLANET_TABLE
        .iter()
        .enumerate()
        .map(|(index, def)| {
            let initial_angle = index as f64 * TAU / count as f64;
            generate_planet(def, initial_angle, config)
        })
        .collect()
}

pub fn generate_planet(
    def: &PlanetDefinition,
    initial_angle_rad: f64,
    config: &WorldConfig,
) -> Planet {
    let mut rng = identity_rng(config.seed, def.id);
    let zones = zones::generate_zones(def, config.hex_radius, &mut rng);
    let moons = generate_moons(def, config.seed);

    let mut planet = Planet {
        id: def.id.to_string(),
        name: def.name.to_string(),
        semi_major_axis_au: def.semi_major_axis_au,
        orbital_period_days: def.orbital_period_days,
        eccentricity: def.eccentricity,
        initial_angle_rad,
        day_length_seconds: def.orbital_period_days * SECONDS_PER_DAY,
        equilibrium_temp_k: def.equilibrium_temp_k,
        base_biomass_rate: def.base_biomass_rate,
        base_predator_strength: def.base_predator_strength,
        zones,
        moons,
        position: Default::default(),
        extra: BTreeMap::new(),
    };
    planet.position = orbit::position_at(&planet.elements(), 0.0);

    tracing::debug!(
        target: "trappist::worldgen",
        planet = %planet.id,
        zones = planet.zones.len(),
        moons = planet.moons.len(),
        clustering = analysis::biome_clustering(&planet),
        "planet.generated"
    );
    planet
}

fn generate_moons(def: &PlanetDefinition, seed: u64) -> Vec<Moon> {
    let mut rng = identity_rng(seed, &format!("{}:moons", def.id));
    (0..def.moon_count as usize)
        .map(|index| Moon {
            id: format!("{}-m{}", def.id, index + 1),
            name: format!(
                "{} {}",
                def.name,
                MOON_NUMERALS.get(index).copied().unwrap_or("?")
            ),
            distance_km: rng.jitter(8_000.0, 60_000.0).round(),
        })
        .collect()
}
