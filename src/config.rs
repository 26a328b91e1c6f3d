use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::SimError;

fn default_ticks_per_day() -> u64 {
    86_400
}

fn default_worker_upkeep() -> f64 {
    0.02
}

fn default_queen_upkeep() -> f64 {
    0.1
}

fn default_starvation_damage() -> f64 {
    1.0
}

fn default_health_decay() -> f64 {
    0.0002
}

fn default_base_gather_rate() -> f64 {
    0.2
}

fn default_cargo_max() -> f64 {
    10.0
}

fn default_egg_cost() -> f64 {
    25.0
}

fn default_total_spawn_ticks() -> u64 {
    60
}

fn default_reevaluation_interval() -> u64 {
    10
}

fn default_work_per_gather_tick() -> f64 {
    0.05
}

fn default_starvation_coefficient() -> f64 {
    0.05
}

fn default_recycle_efficiency() -> f64 {
    0.25
}

fn default_overload_exponent() -> f64 {
    4.0
}

fn default_trend_threshold() -> f64 {
    2.0
}

fn default_equilibrium_overcapacity() -> f64 {
    1.2
}

fn default_catch_up_growth() -> f64 {
    0.1
}

fn default_catch_up_shrink() -> f64 {
    0.2
}

fn default_catch_up_shrink_threshold() -> f64 {
    1.5
}

fn default_skill_gain_scale() -> f64 {
    0.01
}

fn default_skill_gain_knee() -> f64 {
    25.0
}

fn default_skill_gain_power() -> f64 {
    2.0
}

fn default_mastery_xp_per_unit() -> f64 {
    1.0
}

fn default_world_seed() -> u64 {
    1
}

fn default_hex_radius() -> i32 {
    10
}

fn default_home_planet() -> String {
    "trappist-1e".to_string()
}

fn default_queen_count() -> u32 {
    1
}

fn default_workers_per_queen() -> u32 {
    6
}

fn default_queen_energy() -> f64 {
    400.0
}

fn default_queen_energy_max() -> f64 {
    1_000.0
}

fn default_neural_capacity() -> u32 {
    12
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeConfig {
    #[serde(default = "default_ticks_per_day")]
    pub ticks_per_day: u64,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            ticks_per_day: default_ticks_per_day(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColonyConfig {
    /// Cargo a worker burns each tick to stay alive.
    #[serde(default = "default_worker_upkeep")]
    pub worker_upkeep: f64,
    /// Energy a queen burns each tick.
    #[serde(default = "default_queen_upkeep")]
    pub queen_upkeep: f64,
    #[serde(default = "default_starvation_damage")]
    pub starvation_damage: f64,
    #[serde(default = "default_health_decay")]
    pub health_decay_per_tick: f64,
    #[serde(default = "default_base_gather_rate")]
    pub base_gather_rate: f64,
    #[serde(default = "default_cargo_max")]
    pub worker_cargo_max: f64,
    #[serde(default = "default_egg_cost")]
    pub egg_cost: f64,
    #[serde(default = "default_total_spawn_ticks")]
    pub total_spawn_ticks: u64,
    #[serde(default = "default_reevaluation_interval")]
    pub order_reevaluation_interval: u64,
    #[serde(default = "default_work_per_gather_tick")]
    pub work_per_gather_tick: f64,
}

impl Default for ColonyConfig {
    fn default() -> Self {
        Self {
            worker_upkeep: default_worker_upkeep(),
            queen_upkeep: default_queen_upkeep(),
            starvation_damage: default_starvation_damage(),
            health_decay_per_tick: default_health_decay(),
            base_gather_rate: default_base_gather_rate(),
            worker_cargo_max: default_cargo_max(),
            egg_cost: default_egg_cost(),
            total_spawn_ticks: default_total_spawn_ticks(),
            order_reevaluation_interval: default_reevaluation_interval(),
            work_per_gather_tick: default_work_per_gather_tick(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulationConfig {
    #[serde(default = "default_starvation_coefficient")]
    pub starvation_coefficient: f64,
    #[serde(default = "default_recycle_efficiency")]
    pub recycle_efficiency: f64,
    #[serde(default = "default_overload_exponent")]
    pub overload_exponent: f64,
    #[serde(default = "default_trend_threshold")]
    pub trend_threshold: f64,
    #[serde(default = "default_equilibrium_overcapacity")]
    pub equilibrium_overcapacity: f64,
    #[serde(default = "default_catch_up_growth")]
    pub catch_up_growth_rate: f64,
    #[serde(default = "default_catch_up_shrink")]
    pub catch_up_shrink_rate: f64,
    #[serde(default = "default_catch_up_shrink_threshold")]
    pub catch_up_shrink_threshold: f64,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            starvation_coefficient: default_starvation_coefficient(),
            recycle_efficiency: default_recycle_efficiency(),
            overload_exponent: default_overload_exponent(),
            trend_threshold: default_trend_threshold(),
            equilibrium_overcapacity: default_equilibrium_overcapacity(),
            catch_up_growth_rate: default_catch_up_growth(),
            catch_up_shrink_rate: default_catch_up_shrink(),
            catch_up_shrink_threshold: default_catch_up_shrink_threshold(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressionConfig {
    #[serde(default = "default_skill_gain_scale")]
    pub skill_gain_scale: f64,
    #[serde(default = "default_skill_gain_knee")]
    pub skill_gain_knee: f64,
    #[serde(default = "default_skill_gain_power")]
    pub skill_gain_power: f64,
    #[serde(default = "default_mastery_xp_per_unit")]
    pub mastery_xp_per_unit: f64,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            skill_gain_scale: default_skill_gain_scale(),
            skill_gain_knee: default_skill_gain_knee(),
            skill_gain_power: default_skill_gain_power(),
            mastery_xp_per_unit: default_mastery_xp_per_unit(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldConfig {
    #[serde(default = "default_world_seed")]
    pub seed: u64,
    #[serde(default = "default_hex_radius")]
    pub hex_radius: i32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: default_world_seed(),
            hex_radius: default_hex_radius(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetupConfig {
    #[serde(default = "default_home_planet")]
    pub home_planet_id: String,
    #[serde(default = "default_queen_count")]
    pub queens: u32,
    #[serde(default = "default_workers_per_queen")]
    pub workers_per_queen: u32,
    #[serde(default = "default_queen_energy")]
    pub queen_energy: f64,
    #[serde(default = "default_queen_energy_max")]
    pub queen_energy_max: f64,
    #[serde(default = "default_neural_capacity")]
    pub neural_capacity: u32,
    #[serde(default = "default_true")]
    pub eggs_enabled: bool,
}

impl Default for SetupConfig {
    fn default() -> Self {
        Self {
            home_planet_id: default_home_planet(),
            queens: default_queen_count(),
            workers_per_queen: default_workers_per_queen(),
            queen_energy: default_queen_energy(),
            queen_energy_max: default_queen_energy_max(),
            neural_capacity: default_neural_capacity(),
            eggs_enabled: true,
        }
    }
}

/// Every tunable constant of the simulation. Missing YAML keys fall back to
/// the built-in balance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimConfig {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub time: TimeConfig,
    #[serde(default)]
    pub colony: ColonyConfig,
    #[serde(default)]
    pub population: PopulationConfig,
    #[serde(default)]
    pub progression: ProgressionConfig,
    #[serde(default)]
    pub world: WorldConfig,
    #[serde(default)]
    pub setup: SetupConfig,
}

impl SimConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let config: SimConfig = serde_yaml::from_str(text).context("Failed to parse config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SimError> {
        let invalid = |msg: &str| Err(SimError::InvalidConfig(msg.to_string()));
        if self.time.ticks_per_day == 0 {
            return invalid("time.ticks_per_day must be greater than zero");
        }
        if self.colony.total_spawn_ticks == 0 {
            return invalid("colony.total_spawn_ticks must be greater than zero");
        }
        if self.colony.order_reevaluation_interval == 0 {
            return invalid("colony.order_reevaluation_interval must be greater than zero");
        }
        if self.colony.worker_upkeep <= 0.0 {
            return invalid("colony.worker_upkeep must be positive");
        }
        if self.colony.worker_cargo_max <= 0.0 {
            return invalid("colony.worker_cargo_max must be positive");
        }
        if self.world.hex_radius < 1 {
            return invalid("world.hex_radius must be at least 1");
        }
        if self.setup.queen_energy_max <= 0.0 {
            return invalid("setup.queen_energy_max must be positive");
        }
        if !(0.0..=1.0).contains(&self.population.recycle_efficiency) {
            return invalid("population.recycle_efficiency must lie in [0, 1]");
        }
        Ok(())
    }
}

pub struct ConfigLoader {
    base_dir: PathBuf,
}

impl ConfigLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<SimConfig> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: SimConfig = serde_yaml::from_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config {}", path.display()))?;
        tracing::info!(
            target: "trappist::config",
            path = %path.display(),
            ticks_per_day = config.time.ticks_per_day,
            "config.loaded=file"
        );
        Ok(config)
    }
}
