use std::collections::{BTreeMap, HashMap};

use rand::{seq::SliceRandom, Rng};

use crate::components::{
    AtmosphereState, Biome, FoodType, InsolationBand, TemperatureBand, Terrain, Zone, ZoneState,
};
use crate::hex::{self, HexCoord};
use crate::rng::RngExt;

use super::atmosphere;
use super::planets::PlanetDefinition;

const SMOOTHING_PASSES: usize = 2;
/// Cells (of the 7-cell neighbourhood) that must agree before a zone adopts
/// the local majority terrain.
const SMOOTHING_QUORUM: usize = 4;
const TEMPERATURE_JITTER_K: f64 = 12.0;
const MIN_TEMPERATURE_K: f64 = 3.0;

/// Environment of one cell before ids and neighbours exist.
struct ZoneDraft {
    hex: HexCoord,
    temperature_k: f64,
    temperature_band: TemperatureBand,
    insolation_band: InsolationBand,
    atmosphere: AtmosphereState,
    terrain: Terrain,
}

/// Position across the disk along the star axis, -1 (anti-star) to 1 (substellar).
fn star_axis(hex: HexCoord, radius: i32) -> f64 {
    hex.q as f64 / radius as f64
}

pub fn temperature_band(x: f64) -> TemperatureBand {
    if x > 0.6 {
        TemperatureBand::Hot
    } else if x > 0.2 {
        TemperatureBand::Warm
    } else if x >= -0.2 {
        TemperatureBand::Temperate
    } else if x >= -0.6 {
        TemperatureBand::Cold
    } else {
        TemperatureBand::Frozen
    }
}

pub fn insolation_band(x: f64) -> InsolationBand {
    if x > 0.2 {
        InsolationBand::Light
    } else if x >= -0.2 {
        InsolationBand::Terminator
    } else {
        InsolationBand::Dark
    }
}

fn band_factor(band: TemperatureBand) -> f64 {
    match band {
        TemperatureBand::Hot => 1.35,
        TemperatureBand::Warm => 1.15,
        TemperatureBand::Temperate => 1.0,
        TemperatureBand::Cold => 0.7,
        TemperatureBand::Frozen => 0.35,
    }
}

/// Weights in `Terrain::ALL` order (soil, liquid, ice).
pub fn terrain_weights(band: TemperatureBand, atmosphere: AtmosphereState) -> [f64; 3] {
    let [mut soil, mut liquid, ice] = match band {
        TemperatureBand::Hot => [0.55, 0.30, 0.15],
        TemperatureBand::Warm => [0.50, 0.40, 0.10],
        TemperatureBand::Temperate => [0.45, 0.40, 0.15],
        TemperatureBand::Cold => [0.25, 0.15, 0.60],
        TemperatureBand::Frozen => [0.10, 0.05, 0.85],
    };
    match atmosphere {
        AtmosphereState::Thick => {}
        AtmosphereState::Thin => liquid *= 0.7,
        AtmosphereState::None => {
            liquid *= 0.2;
            soil *= 1.5;
        }
    }
    [soil, liquid, ice]
}

fn temperature_factor(temperature_k: f64) -> f64 {
    let z = (temperature_k - 290.0) / 90.0;
    (-z * z).exp().max(0.05)
}

fn terrain_biomass_factor(terrain: Terrain) -> f64 {
    match terrain {
        Terrain::Soil => 1.0,
        Terrain::Liquid => 1.3,
        Terrain::Ice => 0.4,
    }
}

fn atmosphere_biomass_factor(atmosphere: AtmosphereState) -> f64 {
    match atmosphere {
        AtmosphereState::Thick => 1.2,
        AtmosphereState::Thin => 0.8,
        AtmosphereState::None => 0.3,
    }
}

fn terrain_predator_factor(terrain: Terrain) -> f64 {
    match terrain {
        Terrain::Soil => 1.0,
        Terrain::Liquid => 1.2,
        Terrain::Ice => 0.6,
    }
}

fn atmosphere_predator_factor(atmosphere: AtmosphereState) -> f64 {
    match atmosphere {
        AtmosphereState::Thick => 1.2,
        AtmosphereState::Thin => 0.9,
        AtmosphereState::None => 0.5,
    }
}

pub fn zone_id(planet_id: &str, index: usize) -> String {
    format!("{planet_id}-z{index:03}")
}

/// Builds the full zone set of one planet from its own random stream.
pub fn generate_zones<R: Rng>(def: &PlanetDefinition, radius: i32, rng: &mut R) -> Vec<Zone> {
    let mut cells = hex::disk(radius);
    cells.shuffle(rng);

    let mut drafts: Vec<ZoneDraft> = cells
        .into_iter()
        .map(|cell| draft_environment(def, cell, radius, rng))
        .collect();

    let index_of: HashMap<HexCoord, usize> = drafts
        .iter()
        .enumerate()
        .map(|(index, draft)| (draft.hex, index))
        .collect();

    for _ in 0..SMOOTHING_PASSES {
        smooth_terrain(&mut drafts, &index_of);
    }

    let ids: Vec<String> = (0..drafts.len()).map(|i| zone_id(def.id, i)).collect();

    drafts
        .iter()
        .enumerate()
        .map(|(index, draft)| {
            let neighbor_ids = draft
                .hex
                .neighbors()
                .iter()
                .filter_map(|n| index_of.get(n).map(|&i| ids[i].clone()))
                .collect();
            finish_zone(def, draft, ids[index].clone(), neighbor_ids, rng)
        })
        .collect()
}

fn draft_environment<R: Rng>(
    def: &PlanetDefinition,
    hex: HexCoord,
    radius: i32,
    rng: &mut R,
) -> ZoneDraft {
    let x = star_axis(hex, radius);
    let band = temperature_band(x);
    let temperature_k = (def.equilibrium_temp_k * band_factor(band)
        + rng.jitter(-TEMPERATURE_JITTER_K, TEMPERATURE_JITTER_K))
    .max(MIN_TEMPERATURE_K);
    let atmosphere = atmosphere::atmosphere_for_temperature(temperature_k);
    let terrain = Terrain::ALL[rng.weighted_index(&terrain_weights(band, atmosphere))];
    ZoneDraft {
        hex,
        temperature_k,
        temperature_band: band,
        insolation_band: insolation_band(x),
        atmosphere,
        terrain,
    }
}

/// One synchronous majority pass: every zone reads the previous terrain map.
fn smooth_terrain(drafts: &mut [ZoneDraft], index_of: &HashMap<HexCoord, usize>) {
    let previous: Vec<Terrain> = drafts.iter().map(|d| d.terrain).collect();
    for (index, draft) in drafts.iter_mut().enumerate() {
        let mut counts = [0_usize; 3];
        let own = previous[index];
        counts[terrain_slot(own)] += 1;
        for neighbor in draft.hex.neighbors() {
            if let Some(&n) = index_of.get(&neighbor) {
                counts[terrain_slot(previous[n])] += 1;
            }
        }
        let mut best = terrain_slot(own);
        for slot in 0..3 {
            if counts[slot] > counts[best] {
                best = slot;
            }
        }
        if counts[best] >= SMOOTHING_QUORUM {
            draft.terrain = Terrain::ALL[best];
        }
    }
}

fn terrain_slot(terrain: Terrain) -> usize {
    match terrain {
        Terrain::Soil => 0,
        Terrain::Liquid => 1,
        Terrain::Ice => 2,
    }
}

fn finish_zone<R: Rng>(
    def: &PlanetDefinition,
    draft: &ZoneDraft,
    id: String,
    neighbor_ids: Vec<String>,
    rng: &mut R,
) -> Zone {
    let gas_composition = atmosphere::gas_composition(
        rng,
        draft.temperature_band,
        draft.terrain,
        draft.atmosphere,
        draft.temperature_k,
    );
    let atmospheric_mass = atmosphere::atmospheric_mass(rng, draft.atmosphere);

    let temp_factor = temperature_factor(draft.temperature_k);
    let biomass_rate = def.base_biomass_rate
        * temp_factor
        * terrain_biomass_factor(draft.terrain)
        * atmosphere_biomass_factor(draft.atmosphere)
        * rng.jitter(0.8, 1.2);
    let predator_strength = (def.base_predator_strength
        * (0.5 + temp_factor)
        * terrain_predator_factor(draft.terrain)
        * atmosphere_predator_factor(draft.atmosphere)
        * rng.jitter(0.8, 1.2))
    .floor()
    .max(0.0) as u32;

    Zone {
        id,
        planet_id: def.id.to_string(),
        hex_q: draft.hex.q,
        hex_r: draft.hex.r,
        hex_s: draft.hex.s(),
        temperature_k: draft.temperature_k,
        temperature_band: draft.temperature_band,
        insolation_band: draft.insolation_band,
        atmosphere: draft.atmosphere,
        terrain: draft.terrain,
        biome: Biome::classify(draft.terrain, draft.insolation_band),
        food_type: FoodType::for_terrain(draft.terrain),
        gas_composition,
        atmospheric_mass,
        biomass_rate,
        biomass_available: biomass_rate * 1_000.0,
        predator_strength,
        predator_defeated: false,
        state: ZoneState::Unexplored,
        progress: 0.0,
        neighbor_ids,
        extra: BTreeMap::new(),
    }
}
