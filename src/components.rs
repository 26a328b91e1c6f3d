use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SimError;
use crate::hex::HexCoord;
use crate::orbit::{OrbitalElements, Position, SECONDS_PER_DAY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Terrain {
    Soil,
    Liquid,
    Ice,
}

impl Terrain {
    pub const ALL: [Terrain; 3] = [Terrain::Soil, Terrain::Liquid, Terrain::Ice];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemperatureBand {
    Hot,
    Warm,
    Temperate,
    Cold,
    Frozen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsolationBand {
    Light,
    Terminator,
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AtmosphereState {
    Thick,
    Thin,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Biome {
    Desert,
    Grassland,
    Tundra,
    ShallowSea,
    Ocean,
    SubglacialSea,
    FrostFlat,
    Glacier,
    IceSheet,
}

impl Biome {
    pub fn classify(terrain: Terrain, band: InsolationBand) -> Self {
        match (terrain, band) {
            (Terrain::Soil, InsolationBand::Light) => Biome::Desert,
            (Terrain::Soil, InsolationBand::Terminator) => Biome::Grassland,
            (Terrain::Soil, InsolationBand::Dark) => Biome::Tundra,
            (Terrain::Liquid, InsolationBand::Light) => Biome::ShallowSea,
            (Terrain::Liquid, InsolationBand::Terminator) => Biome::Ocean,
            (Terrain::Liquid, InsolationBand::Dark) => Biome::SubglacialSea,
            (Terrain::Ice, InsolationBand::Light) => Biome::FrostFlat,
            (Terrain::Ice, InsolationBand::Terminator) => Biome::Glacier,
            (Terrain::Ice, InsolationBand::Dark) => Biome::IceSheet,
        }
    }
}

/// Food harvested from a zone; workers keep one mastery track per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoodType {
    FungalMat,
    AlgaeBloom,
    CryoLichen,
}

impl FoodType {
    pub fn for_terrain(terrain: Terrain) -> Self {
        match terrain {
            Terrain::Soil => FoodType::FungalMat,
            Terrain::Liquid => FoodType::AlgaeBloom,
            Terrain::Ice => FoodType::CryoLichen,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneState {
    Unexplored,
    Exploring,
    Combating,
    Converting,
    Harvesting,
    Saturated,
}

/// Fractions of the five tracked gases.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GasComposition {
    pub nitrogen: f64,
    pub carbon_dioxide: f64,
    pub oxygen: f64,
    pub water_vapor: f64,
    pub argon: f64,
}

impl GasComposition {
    pub fn from_fractions(values: [f64; 5]) -> Self {
        Self {
            nitrogen: values[0],
            carbon_dioxide: values[1],
            oxygen: values[2],
            water_vapor: values[3],
            argon: values[4],
        }
    }

    pub fn fractions(&self) -> [f64; 5] {
        [
            self.nitrogen,
            self.carbon_dioxide,
            self.oxygen,
            self.water_vapor,
            self.argon,
        ]
    }

    pub fn sum(&self) -> f64 {
        self.fractions().iter().sum()
    }

    /// Rescales to sum 1. Non-finite or negative parts count as zero; an
    /// all-zero mix becomes pure nitrogen.
    pub fn normalized(&self) -> Self {
        let parts = self
            .fractions()
            .map(|v| if v.is_finite() && v > 0.0 { v } else { 0.0 });
        let total: f64 = parts.iter().sum();
        if total <= 0.0 {
            return Self::from_fractions([1.0, 0.0, 0.0, 0.0, 0.0]);
        }
        Self::from_fractions(parts.map(|v| v / total))
    }
}

impl Default for GasComposition {
    fn default() -> Self {
        Self::from_fractions([1.0, 0.0, 0.0, 0.0, 0.0])
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    pub id: String,
    pub planet_id: String,
    pub hex_q: i32,
    pub hex_r: i32,
    pub hex_s: i32,
    pub temperature_k: f64,
    pub temperature_band: TemperatureBand,
    pub insolation_band: InsolationBand,
    pub atmosphere: AtmosphereState,
    pub terrain: Terrain,
    pub biome: Biome,
    pub food_type: FoodType,
    pub gas_composition: GasComposition,
    pub atmospheric_mass: f64,
    pub biomass_rate: f64,
    pub biomass_available: f64,
    pub predator_strength: u32,
    #[serde(default)]
    pub predator_defeated: bool,
    pub state: ZoneState,
    pub progress: f64,
    pub neighbor_ids: Vec<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Zone {
    pub fn hex(&self) -> HexCoord {
        HexCoord::new(self.hex_q, self.hex_r)
    }

    /// Gas mix, always renormalized on read.
    pub fn atmosphere_mix(&self) -> GasComposition {
        self.gas_composition.normalized()
    }

    pub fn biomass_cap(&self) -> f64 {
        self.biomass_rate * 1_000.0
    }

    pub fn has_active_predator(&self) -> bool {
        self.predator_strength > 0 && !self.predator_defeated
    }
}

/// Decorative; only the distance matters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Moon {
    pub id: String,
    pub name: String,
    pub distance_km: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Planet {
    pub id: String,
    pub name: String,
    pub semi_major_axis_au: f64,
    pub orbital_period_days: f64,
    pub eccentricity: f64,
    pub initial_angle_rad: f64,
    pub day_length_seconds: f64,
    pub equilibrium_temp_k: f64,
    pub base_biomass_rate: f64,
    pub base_predator_strength: f64,
    pub zones: Vec<Zone>,
    pub moons: Vec<Moon>,
    pub position: Position,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Planet {
    pub fn elements(&self) -> OrbitalElements {
        OrbitalElements {
            semi_major_axis: self.semi_major_axis_au,
            eccentricity: self.eccentricity,
            period_seconds: self.orbital_period_days * SECONDS_PER_DAY,
            initial_angle_rad: self.initial_angle_rad,
        }
    }

    pub fn zone(&self, zone_id: &str) -> Result<&Zone, SimError> {
        self.zones
            .iter()
            .find(|zone| zone.id == zone_id)
            .ok_or_else(|| SimError::ZoneNotFound(zone_id.to_string()))
    }

    pub fn total_atmospheric_mass(&self) -> f64 {
        self.zones.iter().map(|z| z.atmospheric_mass.max(0.0)).sum()
    }

    /// Mass-weighted mean of the zone mixes.
    pub fn aggregate_gas_composition(&self) -> GasComposition {
        let total_mass = self.total_atmospheric_mass();
        if total_mass <= 0.0 {
            return GasComposition::default();
        }
        let mut acc = [0.0_f64; 5];
        for zone in &self.zones {
            let weight = zone.atmospheric_mass.max(0.0) / total_mass;
            for (slot, fraction) in acc.iter_mut().zip(zone.atmosphere_mix().fractions()) {
                *slot += fraction * weight;
            }
        }
        GasComposition::from_fractions(acc).normalized()
    }
}
