use crate::{
    config::SimConfig,
    progression,
    systems::population::{energy_balance, estimate_equilibrium},
    world::{DailyStats, DayCounters, GameData, LogEntry, LogLevel},
};

/// Daily record from the current swarm and the given day totals.
pub fn compile_daily_stats(
    data: &GameData,
    config: &SimConfig,
    day: u64,
    counters: &DayCounters,
    approximate: bool,
) -> DailyStats {
    let balance = energy_balance(&data.swarm, config);
    let estimate = estimate_equilibrium(&data.swarm, &balance, config);
    DailyStats {
        day,
        simulated_time: data.simulated_time,
        workers: data.swarm.workers.len(),
        queens: data.swarm.queens.len(),
        hatched: counters.hatched,
        died: counters.died,
        laid: counters.laid,
        biomass_gathered: counters.biomass_gathered,
        queen_energy: data.swarm.queens.iter().map(|q| q.energy).sum(),
        neural_load: balance.neural_load,
        coordination_efficiency: balance.efficiency,
        net_energy: balance.net,
        trend: estimate.trend,
        days_to_equilibrium: estimate.days_to_equilibrium,
        best_mastery_level: best_mastery_level(data),
        approximate,
    }
}

fn best_mastery_level(data: &GameData) -> u32 {
    data.swarm
        .workers
        .iter()
        .flat_map(|w| w.mastery.values())
        .map(|&xp| progression::mastery_level(xp))
        .max()
        .unwrap_or(1)
}

/// Appends the record for the day just finished and logs its report.
pub fn close_day(data: &mut GameData, config: &SimConfig) -> LogEntry {
    let day = data.day(config.time.ticks_per_day);
    let counters = std::mem::take(&mut data.day_counters);
    let stats = compile_daily_stats(data, config, day, &counters, false);
    tracing::info!(
        target: "trappist::scheduler",
        day,
        workers = stats.workers,
        queens = stats.queens,
        hatched = stats.hatched,
        died = stats.died,
        "day.closed"
    );
    let report = stats.report();
    data.daily_stats.push(stats);
    data.push_log(LogLevel::Info, report)
}
