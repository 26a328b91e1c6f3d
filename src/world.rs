use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::components::{FoodType, InsolationBand, Planet, Zone};
use crate::config::SimConfig;
use crate::error::SimError;

pub const MAX_HEALTH: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Directive {
    GatherBiomass,
    Idle,
}

/// What a worker has been told to do. Only `GatherBiomass` and `Idle` have
/// effects; the remaining kinds are accepted and resolve to idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderKind {
    GatherBiomass,
    Idle,
    Combat,
    ExploreZone,
    BuildStructure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub kind: OrderKind,
    pub priority: u32,
}

impl Order {
    pub const GATHER_PRIORITY: u32 = 10;
    pub const IDLE_PRIORITY: u32 = 1;

    pub fn gather() -> Self {
        Self {
            kind: OrderKind::GatherBiomass,
            priority: Self::GATHER_PRIORITY,
        }
    }

    pub fn idle() -> Self {
        Self {
            kind: OrderKind::Idle,
            priority: Self::IDLE_PRIORITY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerState {
    Idle,
    IdleEmpty,
    IdleCargoFull,
    SelfMaintenance,
    Gathering,
}

impl WorkerState {
    /// States eligible for order reassignment.
    pub fn is_idle(&self) -> bool {
        matches!(
            self,
            WorkerState::Idle | WorkerState::IdleEmpty | WorkerState::IdleCargoFull
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EggProduction {
    pub enabled: bool,
    pub in_progress: bool,
    pub ticks_remaining: u64,
    pub progress_percent: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Queen {
    pub id: String,
    pub planet_id: String,
    pub home_zone_id: String,
    pub energy: f64,
    pub energy_max: f64,
    pub directive: Directive,
    pub command_queue: Vec<Order>,
    pub neural_capacity: u32,
    pub egg_production: EggProduction,
    /// Ticks left until this queen reassigns her idle workers.
    #[serde(default)]
    pub ticks_until_reassign: u64,
}

impl Queen {
    pub fn energy_room(&self) -> f64 {
        (self.energy_max - self.energy).max(0.0)
    }

    pub fn add_energy(&mut self, amount: f64) -> f64 {
        let accepted = amount.max(0.0).min(self.energy_room());
        self.energy += accepted;
        accepted
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Worker {
    pub id: String,
    pub queen_id: String,
    pub cargo: f64,
    pub cargo_max: f64,
    pub health: f64,
    pub foraging_skill: f64,
    #[serde(default)]
    pub mastery: BTreeMap<FoodType, f64>,
    pub order: Option<Order>,
    pub state: WorkerState,
    /// Created by the bulk catch-up path rather than by an egg.
    #[serde(default)]
    pub placeholder: bool,
}

impl Worker {
    pub fn hatchling(id: String, queen_id: String, cargo_max: f64) -> Self {
        Self {
            id,
            queen_id,
            cargo: 0.0,
            cargo_max,
            health: MAX_HEALTH,
            foraging_skill: 0.0,
            mastery: BTreeMap::new(),
            order: None,
            state: WorkerState::IdleEmpty,
            placeholder: false,
        }
    }

    pub fn mastery_xp(&self, food: FoodType) -> f64 {
        self.mastery.get(&food).copied().unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Swarm {
    pub queens: Vec<Queen>,
    pub workers: Vec<Worker>,
}

impl Swarm {
    pub fn queen(&self, queen_id: &str) -> Result<&Queen, SimError> {
        self.queens
            .iter()
            .find(|q| q.id == queen_id)
            .ok_or_else(|| SimError::QueenNotFound(queen_id.to_string()))
    }

    pub fn total_neural_capacity(&self) -> u64 {
        self.queens.iter().map(|q| q.neural_capacity as u64).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Growing,
    Shrinking,
    Stable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub simulated_time: u64,
    pub level: LogLevel,
    pub message: String,
}

/// Running totals for the day in progress.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayCounters {
    pub hatched: u64,
    pub died: u64,
    pub laid: u64,
    pub biomass_gathered: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStats {
    pub day: u64,
    pub simulated_time: u64,
    pub workers: usize,
    pub queens: usize,
    pub hatched: u64,
    pub died: u64,
    pub laid: u64,
    pub biomass_gathered: f64,
    pub queen_energy: f64,
    pub neural_load: f64,
    pub coordination_efficiency: f64,
    pub net_energy: f64,
    pub trend: Trend,
    pub days_to_equilibrium: Option<f64>,
    /// Highest mastery level any worker holds on any food.
    #[serde(default = "first_mastery_level")]
    pub best_mastery_level: u32,
    /// Produced by the bulk catch-up path.
    pub approximate: bool,
}

fn first_mastery_level() -> u32 {
    1
}

impl DailyStats {
    pub fn report(&self) -> String {
        let mut lines = vec![format!(
            "Day {} summary{}",
            self.day,
            if self.approximate { " (estimated)" } else { "" }
        )];
        lines.push(format!(
            "  population: {} workers, {} queens",
            self.workers, self.queens
        ));
        lines.push(format!(
            "  births: {} hatched, {} eggs laid; deaths: {}",
            self.hatched, self.laid, self.died
        ));
        lines.push(format!(
            "  biomass gathered: {:.2}, queen energy: {:.2}",
            self.biomass_gathered, self.queen_energy
        ));
        lines.push(format!("  best forager mastery: level {}", self.best_mastery_level));
        lines.push(format!(
            "  neural load: {:.2} (efficiency {:.3}), net energy {:+.3}/tick",
            self.neural_load, self.coordination_efficiency, self.net_energy
        ));
        let outlook = match (self.trend, self.days_to_equilibrium) {
            (Trend::Stable, _) => "stable".to_string(),
            (trend, Some(days)) => {
                format!("{trend:?}, ~{days:.1} days to equilibrium").to_lowercase()
            }
            (trend, None) => format!("{trend:?}").to_lowercase(),
        };
        lines.push(format!("  trend: {outlook}"));
        lines.join("\n")
    }
}

/// Outcome of one `apply_tick`/`process_catch_up` call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickResult {
    pub ticks_processed: u64,
    pub hatched: u64,
    pub died: u64,
    pub laid: u64,
    pub logs: Vec<LogEntry>,
    pub approximate: bool,
}

/// Aggregate root and save payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameData {
    pub planets: Vec<Planet>,
    pub swarm: Swarm,
    pub simulated_time: u64,
    pub last_wall_clock_ms: u64,
    #[serde(default)]
    pub next_entity_id: u64,
    #[serde(default)]
    pub day_counters: DayCounters,
    #[serde(default)]
    pub daily_stats: Vec<DailyStats>,
    #[serde(default)]
    pub logs: Vec<LogEntry>,
}

impl GameData {
    pub fn new(planets: Vec<Planet>, wall_clock_ms: u64) -> Self {
        Self {
            planets,
            swarm: Swarm::default(),
            simulated_time: 0,
            last_wall_clock_ms: wall_clock_ms,
            next_entity_id: 0,
            day_counters: DayCounters::default(),
            daily_stats: Vec::new(),
            logs: Vec::new(),
        }
    }

    /// Next id with the given prefix (`worker-7`).
    pub fn allocate_id(&mut self, prefix: &str) -> String {
        self.next_entity_id += 1;
        format!("{prefix}-{}", self.next_entity_id)
    }

    pub fn day(&self, ticks_per_day: u64) -> u64 {
        self.simulated_time / ticks_per_day.max(1)
    }

    pub fn spawn_worker(&mut self, queen_id: &str, cargo_max: f64) -> String {
        let id = self.allocate_id("worker");
        self.swarm
            .workers
            .push(Worker::hatchling(id.clone(), queen_id.to_string(), cargo_max));
        id
    }

    pub fn planet(&self, planet_id: &str) -> Result<&Planet, SimError> {
        self.planets
            .iter()
            .find(|p| p.id == planet_id)
            .ok_or_else(|| SimError::PlanetNotFound(planet_id.to_string()))
    }

    pub fn push_log(&mut self, level: LogLevel, message: impl Into<String>) -> LogEntry {
        let entry = LogEntry {
            simulated_time: self.simulated_time,
            level,
            message: message.into(),
        };
        self.logs.push(entry.clone());
        entry
    }

    /// Keeps the newest `keep` daily records.
    pub fn retain_recent_stats(&mut self, keep: usize) {
        if self.daily_stats.len() > keep {
            let excess = self.daily_stats.len() - keep;
            self.daily_stats.drain(..excess);
        }
    }

    pub fn retain_recent_logs(&mut self, keep: usize) {
        if self.logs.len() > keep {
            let excess = self.logs.len() - keep;
            self.logs.drain(..excess);
        }
    }
}

/// Best starting zone: highest biomass rate among non-dark zones.
pub fn choose_home_zone(planet: &Planet) -> Result<&Zone, SimError> {
    planet
        .zones
        .iter()
        .filter(|z| z.insolation_band != InsolationBand::Dark)
        .max_by(|a, b| a.biomass_rate.total_cmp(&b.biomass_rate))
        .or_else(|| planet.zones.first())
        .ok_or_else(|| SimError::ZoneNotFound(format!("{}: no zones", planet.id)))
}

/// Builds a fresh game with the configured starting swarm.
pub fn found_colony(
    planets: Vec<Planet>,
    config: &SimConfig,
    wall_clock_ms: u64,
) -> Result<GameData, SimError> {
    let setup = &config.setup;
    let mut data = GameData::new(planets, wall_clock_ms);
    let (planet_id, home_zone_id) = {
        let planet = data.planet(&setup.home_planet_id)?;
        (planet.id.clone(), choose_home_zone(planet)?.id.clone())
    };

    for _ in 0..setup.queens {
        let queen_id = data.allocate_id("queen");
        let mut queen = Queen {
            id: queen_id.clone(),
            planet_id: planet_id.clone(),
            home_zone_id: home_zone_id.clone(),
            energy: setup.queen_energy.min(setup.queen_energy_max),
            energy_max: setup.queen_energy_max,
            directive: Directive::Idle,
            command_queue: Vec::new(),
            neural_capacity: setup.neural_capacity,
            egg_production: EggProduction {
                enabled: setup.eggs_enabled,
                ..EggProduction::default()
            },
            ticks_until_reassign: 0,
        };
        crate::systems::colony::set_directive(&mut queen, Directive::GatherBiomass);
        data.swarm.queens.push(queen);
        for _ in 0..setup.workers_per_queen {
            data.spawn_worker(&queen_id, config.colony.worker_cargo_max);
        }
    }

    tracing::info!(
        target: "trappist::colony",
        planet = %planet_id,
        zone = %home_zone_id,
        queens = data.swarm.queens.len(),
        workers = data.swarm.workers.len(),
        "colony.founded"
    );
    Ok(data)
}
