use rand::Rng;

use crate::components::{AtmosphereState, GasComposition, TemperatureBand, Terrain};
use crate::rng::RngExt;

const THICK_THRESHOLD_K: f64 = 250.0;
const THIN_THRESHOLD_K: f64 = 150.0;
const FREEZING_K: f64 = 273.0;

pub fn atmosphere_for_temperature(temperature_k: f64) -> AtmosphereState {
    if temperature_k >= THICK_THRESHOLD_K {
        AtmosphereState::Thick
    } else if temperature_k >= THIN_THRESHOLD_K {
        AtmosphereState::Thin
    } else {
        AtmosphereState::None
    }
}

/// Column mass in bar-equivalents. Airless zones keep a trace exosphere so the
/// mass is never zero.
pub fn atmospheric_mass<R: Rng>(rng: &mut R, state: AtmosphereState) -> f64 {
    match state {
        AtmosphereState::Thick => rng.jitter(0.8, 2.0),
        AtmosphereState::Thin => rng.jitter(0.05, 0.3),
        AtmosphereState::None => rng.jitter(0.0005, 0.005),
    }
}

pub fn gas_composition<R: Rng>(
    rng: &mut R,
    band: TemperatureBand,
    terrain: Terrain,
    state: AtmosphereState,
    temperature_k: f64,
) -> GasComposition {
    let nitrogen = rng.jitter(0.5, 0.8);
    let carbon_dioxide = match band {
        TemperatureBand::Hot => rng.jitter(0.2, 0.5),
        TemperatureBand::Warm => rng.jitter(0.05, 0.2),
        TemperatureBand::Temperate => rng.jitter(0.01, 0.06),
        TemperatureBand::Cold => rng.jitter(0.005, 0.03),
        TemperatureBand::Frozen => rng.jitter(0.001, 0.01),
    };
    let oxygen = if terrain == Terrain::Liquid && state == AtmosphereState::Thick {
        rng.jitter(0.05, 0.2)
    } else {
        rng.jitter(0.0, 0.03)
    };
    let water_vapor = match terrain {
        Terrain::Liquid if temperature_k > FREEZING_K => rng.jitter(0.01, 0.05),
        Terrain::Liquid => rng.jitter(0.002, 0.01),
        _ => rng.jitter(0.0, 0.01),
    };
    let argon = rng.jitter(0.005, 0.015);
    GasComposition {
        nitrogen,
        carbon_dioxide,
        oxygen,
        water_vapor,
        argon,
    }
    .normalized()
}
