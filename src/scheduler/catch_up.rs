//! Bulk fast-forward for gaps longer than one simulated day.
//!
//! This is a statistical shortcut: it does not run queens or workers, and its
//! growth and culling rules differ from the tick-accurate path, so the two can
//! disagree for the same elapsed time.

use crate::{
    config::SimConfig,
    orbit::update_planet_positions,
    systems::population::target_population,
    world::{DayCounters, GameData, LogLevel, TickResult},
};

use super::summary::compile_daily_stats;

/// Workers to add this catch-up: a share of the gap per day, never past it.
pub fn growth_amount(current: usize, target: f64, elapsed_days: f64, config: &SimConfig) -> usize {
    let gap = target - current as f64;
    if gap <= 0.0 {
        return 0;
    }
    (config.population.catch_up_growth_rate * gap * elapsed_days)
        .min(gap)
        .floor()
        .max(0.0) as usize
}

/// Workers to remove once the colony is far above target. Never shrinks
/// below the target itself.
pub fn shrink_amount(current: usize, target: f64, elapsed_days: f64, config: &SimConfig) -> usize {
    let population = &config.population;
    if (current as f64) <= population.catch_up_shrink_threshold * target {
        return 0;
    }
    let excess = current as f64 - target;
    (population.catch_up_shrink_rate * excess * elapsed_days)
        .min(excess)
        .floor()
        .max(0.0) as usize
}

pub fn bulk_catch_up(
    data: &mut GameData,
    config: &SimConfig,
    elapsed_ticks: u64,
    now_ms: u64,
) -> TickResult {
    let ticks_per_day = config.time.ticks_per_day.max(1);
    let elapsed_days = elapsed_ticks as f64 / ticks_per_day as f64;
    let start_workers = data.swarm.workers.len();
    let target = target_population(&data.swarm, config);

    let grown = if data.swarm.queens.is_empty() {
        0
    } else {
        growth_amount(start_workers, target, elapsed_days, config)
    };
    let culled = shrink_amount(start_workers, target, elapsed_days, config);

    if grown > 0 {
        let queen_ids: Vec<String> = data.swarm.queens.iter().map(|q| q.id.clone()).collect();
        for index in 0..grown {
            let queen_id = &queen_ids[index % queen_ids.len()];
            let worker_id = data.spawn_worker(queen_id, config.colony.worker_cargo_max);
            if let Some(worker) = data.swarm.workers.iter_mut().find(|w| w.id == worker_id) {
                worker.placeholder = true;
            }
        }
    }
    if culled > 0 {
        let keep = data.swarm.workers.len().saturating_sub(culled);
        data.swarm.workers.truncate(keep);
    }

    let first_day = data.day(ticks_per_day);
    data.simulated_time += elapsed_ticks;
    data.last_wall_clock_ms = data
        .last_wall_clock_ms
        .saturating_add(elapsed_ticks.saturating_mul(1_000))
        .min(now_ms);
    update_planet_positions(&mut data.planets, data.simulated_time);

    let last_day = data.day(ticks_per_day);
    let days = last_day.saturating_sub(first_day);
    let end_workers = data.swarm.workers.len();
    let carried = std::mem::take(&mut data.day_counters);
    let mut logs = Vec::with_capacity(days as usize + 1);
    for offset in 0..days {
        let mut counters = DayCounters {
            hatched: spread(grown as u64, days, offset),
            died: spread(culled as u64, days, offset),
            ..DayCounters::default()
        };
        if offset == 0 {
            counters.hatched += carried.hatched;
            counters.died += carried.died;
            counters.laid += carried.laid;
            counters.biomass_gathered += carried.biomass_gathered;
        }
        let day = first_day + offset + 1;
        let mut stats = compile_daily_stats(data, config, day, &counters, true);
        stats.simulated_time = day * ticks_per_day;
        stats.workers = interpolate(start_workers, end_workers, offset + 1, days);
        logs.push(data.push_log(LogLevel::Info, stats.report()));
        data.daily_stats.push(stats);
    }

    tracing::info!(
        target: "trappist::scheduler",
        elapsed_ticks,
        days,
        grown,
        culled,
        workers = end_workers,
        "catch_up.bulk"
    );
    logs.push(data.push_log(
        LogLevel::Info,
        format!(
            "While you were away ({elapsed_days:.1} days): {grown} workers hatched, \
             {culled} lost. Colony now has {end_workers} workers (estimated)."
        ),
    ));

    TickResult {
        ticks_processed: elapsed_ticks,
        hatched: grown as u64,
        died: culled as u64,
        laid: grown as u64,
        logs,
        approximate: true,
    }
}

/// Even share of `total` over `parts`, remainder on the earliest parts.
fn spread(total: u64, parts: u64, index: u64) -> u64 {
    if parts == 0 {
        return 0;
    }
    total / parts + u64::from(index < total % parts)
}

fn interpolate(start: usize, end: usize, step: u64, steps: u64) -> usize {
    if steps == 0 {
        return end;
    }
    let t = step as f64 / steps as f64;
    (start as f64 + (end as f64 - start as f64) * t).round() as usize
}
