use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use trappist::{
    found_colony,
    scheduler::TickScheduler,
    snapshot::{load_game, save_game, SnapshotWriter},
    world::LogEntry,
    worldgen::generate_system,
    ConfigLoader, SimConfig,
};

#[derive(Debug, Parser)]
#[command(author, version, about = "TRAPPIST-1 colony simulation runner")]
struct Cli {
    /// Balance file (YAML); built-in balance when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Save to resume from; a new colony is founded when the file does not exist
    #[arg(long)]
    save: Option<PathBuf>,

    /// Where to write the final save (defaults to --save)
    #[arg(long)]
    out: Option<PathBuf>,

    /// Wall-clock seconds to simulate
    #[arg(long, default_value_t = 3_600)]
    elapsed_seconds: u64,

    /// Wall-clock seconds per scheduler call on the tick-accurate path
    #[arg(long, default_value_t = 60)]
    step_seconds: u64,

    /// Directory for day snapshots
    #[arg(long)]
    snapshot_dir: Option<PathBuf>,

    /// Write a snapshot every N days
    #[arg(long, default_value_t = 1)]
    snapshot_interval_days: u64,

    /// Daily records to keep in the save
    #[arg(long, default_value_t = 30)]
    keep_days: usize,

    /// Log entries to keep in the save
    #[arg(long, default_value_t = 500)]
    keep_logs: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trappist=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => ConfigLoader::new(".").load(path)?,
        None => SimConfig::default(),
    };
    let ticks_per_day = config.time.ticks_per_day;

    let mut data = match &cli.save {
        Some(path) if path.exists() => load_game(path, &config.world)?,
        _ => {
            let now_ms = chrono::Utc::now().timestamp_millis().max(0) as u64;
            found_colony(generate_system(&config.world), &config, now_ms)?
        }
    };

    let mut scheduler = TickScheduler::new(config);
    if let Some(dir) = &cli.snapshot_dir {
        scheduler = scheduler.with_snapshots(SnapshotWriter::new(dir, cli.snapshot_interval_days));
    }

    let target_ms = data.last_wall_clock_ms + cli.elapsed_seconds * 1_000;
    let mut logs: Vec<LogEntry> = Vec::new();
    let (mut hatched, mut died) = (0, 0);
    if cli.elapsed_seconds > ticks_per_day {
        let result = scheduler.process_catch_up(&mut data, target_ms)?;
        hatched += result.hatched;
        died += result.died;
        logs.extend(result.logs);
    } else {
        let step_ms = cli.step_seconds.max(1) * 1_000;
        while data.last_wall_clock_ms + 1_000 <= target_ms {
            let now_ms = (data.last_wall_clock_ms + step_ms).min(target_ms);
            let result = scheduler.apply_tick(&mut data, now_ms)?;
            hatched += result.hatched;
            died += result.died;
            logs.extend(result.logs);
        }
    }

    data.retain_recent_stats(cli.keep_days);
    data.retain_recent_logs(cli.keep_logs);
    for entry in &logs {
        println!("[t={}] {}", entry.simulated_time, entry.message);
    }

    if let Some(out) = cli.out.as_ref().or(cli.save.as_ref()) {
        save_game(out, &data, ticks_per_day)?;
    }

    println!(
        "Simulated {} s. Workers: {} (+{} / -{}), queens: {}, day {}",
        data.simulated_time,
        data.swarm.workers.len(),
        hatched,
        died,
        data.swarm.queens.len(),
        data.day(ticks_per_day)
    );
    Ok(())
}
