//! Aggregate colony dynamics: neural overload, energy balance, starvation.

use std::collections::HashSet;

use anyhow::Result;

use crate::{
    config::SimConfig,
    engine::{System, SystemContext, TickReport},
    world::{GameData, Swarm, Trend, WorkerState},
};

pub fn neural_load(workers: usize, capacity: u64) -> f64 {
    if capacity == 0 {
        return 0.0;
    }
    workers as f64 / capacity as f64
}

/// 1.0 up to full load, then `1 / load^exponent`.
pub fn coordination_efficiency(load: f64, exponent: f64) -> f64 {
    if load <= 1.0 {
        1.0
    } else {
        1.0 / load.powf(exponent)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyBalance {
    pub neural_load: f64,
    pub efficiency: f64,
    pub production: f64,
    pub consumption: f64,
    pub net: f64,
    pub deficit: f64,
}

pub fn energy_balance(swarm: &Swarm, config: &SimConfig) -> EnergyBalance {
    let colony = &config.colony;
    let load = neural_load(swarm.workers.len(), swarm.total_neural_capacity());
    let efficiency = coordination_efficiency(load, config.population.overload_exponent);
    let raw: f64 = swarm
        .workers
        .iter()
        .filter(|w| w.state == WorkerState::Gathering)
        .map(|w| colony.base_gather_rate * (1.0 + w.foraging_skill.clamp(0.0, 100.0) / 100.0))
        .sum();
    let production = raw * efficiency;
    let consumption = swarm.workers.len() as f64 * colony.worker_upkeep
        + swarm.queens.len() as f64 * colony.queen_upkeep;
    let net = production - consumption;
    EnergyBalance {
        neural_load: load,
        efficiency,
        production,
        consumption,
        net,
        deficit: (-net).max(0.0),
    }
}

pub fn starvation_death_count(deficit: f64, workers: usize, config: &SimConfig) -> usize {
    let upkeep = config.colony.worker_upkeep;
    if !(deficit > 0.0) || upkeep <= 0.0 {
        return 0;
    }
    let potential = config.population.starvation_coefficient * deficit / upkeep;
    potential.min(workers as f64).floor().max(0.0) as usize
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StarvationOutcome {
    pub deaths: Vec<String>,
    pub recovered: f64,
}

/// Culls the weakest workers and recycles part of their cost into the queens.
pub fn resolve_starvation(
    swarm: &mut Swarm,
    deficit: f64,
    config: &SimConfig,
) -> StarvationOutcome {
    let count = starvation_death_count(deficit, swarm.workers.len(), config);
    if count == 0 {
        return StarvationOutcome::default();
    }

    let mut by_health: Vec<usize> = (0..swarm.workers.len()).collect();
    // stable: ties keep collection order
    by_health.sort_by(|&a, &b| swarm.workers[a].health.total_cmp(&swarm.workers[b].health));
    let deaths: Vec<String> = by_health[..count]
        .iter()
        .map(|&index| swarm.workers[index].id.clone())
        .collect();
    let doomed: HashSet<&str> = deaths.iter().map(String::as_str).collect();
    swarm.workers.retain(|w| !doomed.contains(w.id.as_str()));

    let recovered =
        count as f64 * config.colony.egg_cost * config.population.recycle_efficiency;
    if !swarm.queens.is_empty() {
        let share = recovered / swarm.queens.len() as f64;
        for queen in swarm.queens.iter_mut() {
            queen.add_energy(share);
        }
    }
    StarvationOutcome { deaths, recovered }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EquilibriumEstimate {
    pub trend: Trend,
    pub current: usize,
    pub target: f64,
    /// Linear distance-over-rate guess; `None` when the colony is not moving.
    pub days_to_equilibrium: Option<f64>,
}

pub fn classify_trend(net: f64, threshold: f64) -> Trend {
    if net > threshold {
        Trend::Growing
    } else if net < -threshold {
        Trend::Shrinking
    } else {
        Trend::Stable
    }
}

/// Population the colony settles at: slightly over its neural capacity.
pub fn target_population(swarm: &Swarm, config: &SimConfig) -> f64 {
    config.population.equilibrium_overcapacity * swarm.total_neural_capacity() as f64
}

pub fn estimate_equilibrium(
    swarm: &Swarm,
    balance: &EnergyBalance,
    config: &SimConfig,
) -> EquilibriumEstimate {
    let current = swarm.workers.len();
    let target = target_population(swarm, config);
    let trend = classify_trend(balance.net, config.population.trend_threshold);
    let egg_cost = config.colony.egg_cost.max(f64::EPSILON);
    let workers_per_day = balance.net.abs() * config.time.ticks_per_day as f64 / egg_cost;
    let days_to_equilibrium = if workers_per_day > 1e-9 {
        Some((target - current as f64).abs() / workers_per_day)
    } else {
        None
    };
    EquilibriumEstimate {
        trend,
        current,
        target,
        days_to_equilibrium,
    }
}

/// One starvation pass over the whole swarm per tick.
pub struct PopulationSystem;

impl PopulationSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PopulationSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for PopulationSystem {
    fn name(&self) -> &str {
        "population"
    }

    fn run(
        &mut self,
        ctx: &SystemContext,
        data: &mut GameData,
        report: &mut TickReport,
    ) -> Result<()> {
        let balance = energy_balance(&data.swarm, ctx.config);
        if balance.deficit <= 0.0 {
            return Ok(());
        }
        let outcome = resolve_starvation(&mut data.swarm, balance.deficit, ctx.config);
        if !outcome.deaths.is_empty() {
            tracing::debug!(
                target: "trappist::colony",
                tick = ctx.tick,
                deaths = outcome.deaths.len(),
                deficit = balance.deficit,
                recovered = outcome.recovered,
                "starvation.resolved"
            );
            report.died += outcome.deaths.len() as u64;
        }
        Ok(())
    }
}
