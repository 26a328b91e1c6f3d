use anyhow::Result;

use crate::{
    config::SimConfig,
    systems::{OrbitSystem, PopulationSystem, QueenSystem, WorkerSystem},
    world::{GameData, LogEntry},
};

pub struct EngineBuilder {
    config: SimConfig,
    systems: Vec<Box<dyn System>>,
}

impl EngineBuilder {
    pub fn new(config: SimConfig) -> Self {
        Self {
            config,
            systems: Vec::new(),
        }
    }

    pub fn with_system(mut self, system: impl System + 'static) -> Self {
        self.systems.push(Box::new(system));
        self
    }

    pub fn push_system(&mut self, system: impl System + 'static) {
        self.systems.push(Box::new(system));
    }

    /// Orbit, queens, workers, then the population pass.
    pub fn with_standard_systems(self) -> Self {
        self.with_system(OrbitSystem::new())
            .with_system(QueenSystem::new())
            .with_system(WorkerSystem::new())
            .with_system(PopulationSystem::new())
    }

    pub fn build(self) -> Engine {
        Engine {
            systems: self.systems,
            config: self.config,
        }
    }
}

/// Runs the system pipeline one simulated second at a time.
pub struct Engine {
    systems: Vec<Box<dyn System>>,
    config: SimConfig,
}

impl Engine {
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Runs every system once and advances simulated time by one tick.
    pub fn step(&mut self, data: &mut GameData) -> Result<TickReport> {
        let mut report = TickReport::default();
        let ctx = SystemContext {
            tick: data.simulated_time,
            config: &self.config,
        };
        for system in &mut self.systems {
            system.run(&ctx, data, &mut report)?;
        }
        data.simulated_time += 1;
        data.day_counters.hatched += report.hatched;
        data.day_counters.died += report.died;
        data.day_counters.laid += report.laid;
        data.day_counters.biomass_gathered += report.biomass_gathered;
        Ok(report)
    }

    pub fn run(&mut self, data: &mut GameData, ticks: u64) -> Result<TickReport> {
        let mut total = TickReport::default();
        for _ in 0..ticks {
            let report = self.step(data)?;
            total.absorb(report);
        }
        Ok(total)
    }
}

pub struct SystemContext<'a> {
    /// Simulated time at the start of this tick.
    pub tick: u64,
    pub config: &'a SimConfig,
}

/// Events produced while processing ticks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub hatched: u64,
    pub died: u64,
    pub laid: u64,
    pub biomass_gathered: f64,
    pub logs: Vec<LogEntry>,
}

impl TickReport {
    pub fn absorb(&mut self, other: TickReport) {
        self.hatched += other.hatched;
        self.died += other.died;
        self.laid += other.laid;
        self.biomass_gathered += other.biomass_gathered;
        self.logs.extend(other.logs);
    }
}

pub trait System {
    fn name(&self) -> &str;
    fn run(
        &mut self,
        ctx: &SystemContext,
        data: &mut GameData,
        report: &mut TickReport,
    ) -> Result<()>;
}
