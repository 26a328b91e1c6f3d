/// Fixed orbital and ecological parameters for one planet of the system.
#[derive(Debug, Clone, Copy)]
pub struct PlanetDefinition {
    pub id: &'static str,
    pub name: &'static str,
    pub semi_major_axis_au: f64,
    pub orbital_period_days: f64,
    pub eccentricity: f64,
    pub equilibrium_temp_k: f64,
    pub base_biomass_rate: f64,
    pub base_predator_strength: f64,
    pub moon_count: u32,
}

pub const PLANET_TABLE: [PlanetDefinition; 7] = [
    PlanetDefinition {
        id: "trappist-1b",
        name: "TRAPPIST-1b",
        semi_major_axis_au: 0.01154,
        orbital_period_days: 1.51087,
        eccentricity: 0.00622,
        equilibrium_temp_k: 400.0,
        base_biomass_rate: 0.2,
        base_predator_strength: 2.0,
        moon_count: 0,
    },
    PlanetDefinition {
        id: "trappist-1c",
        name: "TRAPPIST-1c",
        semi_major_axis_au: 0.01580,
        orbital_period_days: 2.42182,
        eccentricity: 0.00654,
        equilibrium_temp_k: 342.0,
        base_biomass_rate: 0.4,
        base_predator_strength: 4.0,
        moon_count: 0,
    },
    PlanetDefinition {
        id: "trappist-1d",
        name: "TRAPPIST-1d",
        semi_major_axis_au: 0.02227,
        orbital_period_days: 4.04961,
        eccentricity: 0.00837,
        equilibrium_temp_k: 288.0,
        base_biomass_rate: 0.9,
        base_predator_strength: 8.0,
        moon_count: 1,
    },
    PlanetDefinition {
        id: "trappist-1e",
        name: "TRAPPIST-1e",
        semi_major_axis_au: 0.02925,
        orbital_period_days: 6.09965,
        eccentricity: 0.00510,
        equilibrium_temp_k: 251.0,
        base_biomass_rate: 1.2,
        base_predator_strength: 12.0,
        moon_count: 1,
    },
    PlanetDefinition {
        id: "trappist-1f",
        name: "TRAPPIST-1f",
        semi_major_axis_au: 0.03849,
        orbital_period_days: 9.20669,
        eccentricity: 0.01007,
        equilibrium_temp_k: 219.0,
        base_biomass_rate: 1.0,
        base_predator_strength: 10.0,
        moon_count: 2,
    },
    PlanetDefinition {
        id: "trappist-1g",
        name: "TRAPPIST-1g",
        semi_major_axis_au: 0.04683,
        orbital_period_days: 12.35294,
        eccentricity: 0.00208,
        equilibrium_temp_k: 199.0,
        base_biomass_rate: 0.6,
        base_predator_strength: 6.0,
        moon_count: 2,
    },
    PlanetDefinition {
        id: "trappist-1h",
        name: "TRAPPIST-1h",
        semi_major_axis_au: 0.06189,
        orbital_period_days: 18.77287,
        eccentricity: 0.00567,
        equilibrium_temp_k: 173.0,
        base_biomass_rate: 0.3,
        base_predator_strength: 3.0,
        moon_count: 1,
    },
];

pub fn definition(id: &str) -> Option<&'static PlanetDefinition> {
    PLANET_TABLE.iter().find(|def| def.id == id)
}
