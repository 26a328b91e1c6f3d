//! Advances simulated time from wall-clock time.
//!
//! One tick is one simulated second. A single call never processes more than
//! one simulated day; longer gaps go through [`TickScheduler::process_catch_up`].

pub mod catch_up;
pub mod summary;

use anyhow::Result;

use crate::{
    config::SimConfig,
    engine::{Engine, EngineBuilder},
    snapshot::SnapshotWriter,
    world::{GameData, TickResult},
};

/// Whole seconds between the stored timestamp and `now_ms`.
pub fn elapsed_seconds(last_ms: u64, now_ms: u64) -> u64 {
    now_ms.saturating_sub(last_ms) / 1_000
}

pub struct TickScheduler {
    engine: Engine,
    snapshots: Option<SnapshotWriter>,
}

impl TickScheduler {
    pub fn new(config: SimConfig) -> Self {
        Self::from_engine(EngineBuilder::new(config).with_standard_systems().build())
    }

    pub fn from_engine(engine: Engine) -> Self {
        Self {
            engine,
            snapshots: None,
        }
    }

    pub fn with_snapshots(mut self, writer: SnapshotWriter) -> Self {
        self.snapshots = Some(writer);
        self
    }

    pub fn config(&self) -> &SimConfig {
        self.engine.config()
    }

    /// Tick-accurate path, capped at one simulated day per call.
    pub fn apply_tick(&mut self, data: &mut GameData, now_ms: u64) -> Result<TickResult> {
        let elapsed = elapsed_seconds(data.last_wall_clock_ms, now_ms);
        if elapsed == 0 {
            return Ok(TickResult::default());
        }
        let ticks_per_day = self.config().time.ticks_per_day;
        let ticks = elapsed.min(ticks_per_day);
        let day_before = data.day(ticks_per_day);

        let report = self.engine.run(data, ticks)?;

        if ticks < elapsed {
            tracing::warn!(
                target: "trappist::scheduler",
                elapsed,
                processed = ticks,
                "tick.capped"
            );
            data.last_wall_clock_ms = now_ms;
        } else {
            data.last_wall_clock_ms += ticks * 1_000;
        }

        let mut result = TickResult {
            ticks_processed: ticks,
            hatched: report.hatched,
            died: report.died,
            laid: report.laid,
            logs: report.logs,
            approximate: false,
        };

        if data.day(ticks_per_day) > day_before {
            let entry = summary::close_day(data, self.engine.config());
            result.logs.push(entry);
            self.write_snapshot(data)?;
        }
        tracing::debug!(
            target: "trappist::scheduler",
            ticks,
            time = data.simulated_time,
            workers = data.swarm.workers.len(),
            "tick.applied"
        );
        Ok(result)
    }

    /// Dispatches to [`Self::apply_tick`] for gaps up to a day, otherwise to
    /// the bulk approximation.
    pub fn process_catch_up(&mut self, data: &mut GameData, now_ms: u64) -> Result<TickResult> {
        let elapsed = elapsed_seconds(data.last_wall_clock_ms, now_ms);
        if elapsed <= self.config().time.ticks_per_day {
            return self.apply_tick(data, now_ms);
        }
        let result = catch_up::bulk_catch_up(data, self.engine.config(), elapsed, now_ms);
        self.write_snapshot(data)?;
        Ok(result)
    }

    fn write_snapshot(&mut self, data: &GameData) -> Result<()> {
        let ticks_per_day = self.engine.config().time.ticks_per_day;
        if let Some(writer) = self.snapshots.as_mut() {
            writer.maybe_write(data, ticks_per_day)?;
        }
        Ok(())
    }
}

/// [`TickScheduler::apply_tick`] with the built-in balance.
pub fn apply_tick(data: &mut GameData, now_ms: u64) -> Result<TickResult> {
    TickScheduler::new(SimConfig::default()).apply_tick(data, now_ms)
}

/// [`TickScheduler::process_catch_up`] with the built-in balance.
pub fn process_catch_up(data: &mut GameData, now_ms: u64) -> Result<TickResult> {
    TickScheduler::new(SimConfig::default()).process_catch_up(data, now_ms)
}
