use tempfile::tempdir;
use trappist::{
    apply_tick,
    config::{ConfigLoader, SimConfig},
    found_colony, generate_trappist1_system,
    orbit::position_at,
    process_catch_up,
    snapshot::{load_game, SnapshotWriter},
    GameData, TickScheduler,
};

fn fast_days() -> SimConfig {
    ConfigLoader::new(env!("CARGO_MANIFEST_DIR"))
        .load("config/fast_days.yaml")
        .unwrap()
}

fn colony(config: &SimConfig, now_ms: u64) -> GameData {
    found_colony(generate_trappist1_system(), config, now_ms).unwrap()
}

#[test]
fn an_hour_of_default_ticks_moves_the_planets() {
    let mut data = colony(&SimConfig::default(), 10_000);
    let result = apply_tick(&mut data, 10_000 + 3_600_000).unwrap();
    assert_eq!(result.ticks_processed, 3_600);
    assert_eq!(data.simulated_time, 3_600);
    assert_eq!(data.last_wall_clock_ms, 3_610_000);
    assert!(data.daily_stats.is_empty());
    for planet in &data.planets {
        assert_eq!(planet.position, position_at(&planet.elements(), 3_600.0));
    }
}

#[test]
fn day_boundaries_are_recorded_once_each() {
    let mut scheduler = TickScheduler::new(fast_days());
    let mut data = colony(scheduler.config(), 0);
    let mut now = 0;
    let mut day_reports = 0;
    while now < 1_000_000 {
        now += 7_000;
        let result = scheduler.apply_tick(&mut data, now.min(1_000_000)).unwrap();
        day_reports += result
            .logs
            .iter()
            .filter(|entry| entry.message.contains("summary"))
            .count();
    }
    assert_eq!(data.simulated_time, 1_000);
    assert_eq!(data.daily_stats.len(), 5);
    assert_eq!(day_reports, 5);
    let days: Vec<u64> = data.daily_stats.iter().map(|s| s.day).collect();
    assert_eq!(days, vec![1, 2, 3, 4, 5]);
}

#[test]
fn short_gaps_stay_tick_accurate() {
    let mut data = colony(&SimConfig::default(), 0);
    let result = process_catch_up(&mut data, 30_000).unwrap();
    assert!(!result.approximate);
    assert_eq!(result.ticks_processed, 30);
}

#[test]
fn long_gaps_are_fast_forwarded() {
    let config = fast_days();
    let mut scheduler = TickScheduler::new(config.clone());
    let mut data = colony(&config, 0);
    // 3 days and a bit
    let result = scheduler.process_catch_up(&mut data, 650_000).unwrap();
    assert!(result.approximate);
    assert_eq!(data.simulated_time, 650);
    assert_eq!(data.last_wall_clock_ms, 650_000);
    assert_eq!(data.daily_stats.len(), 3);
    assert!(data.daily_stats.iter().all(|s| s.approximate));
    for planet in &data.planets {
        assert_eq!(planet.position, position_at(&planet.elements(), 650.0));
    }
    // target 1.2 * 12 = 14.4, gap 6.4, 3.25 days at 10%
    assert_eq!(result.hatched, 2);
    assert_eq!(data.swarm.workers.len(), 10);
    let last = data.daily_stats.last().unwrap();
    assert_eq!(last.workers, 10);
    assert_eq!(data.daily_stats.iter().map(|s| s.hatched).sum::<u64>(), 2);
}

#[test]
fn crowded_colony_shrinks_from_the_tail() {
    let config = fast_days();
    let mut scheduler = TickScheduler::new(config.clone());
    let mut data = colony(&config, 0);
    for _ in 0..32 {
        let queen_id = data.swarm.queens[0].id.clone();
        data.spawn_worker(&queen_id, 10.0);
    }
    let first_ids: Vec<String> = data.swarm.workers.iter().take(10).map(|w| w.id.clone()).collect();
    // 40 workers, target 14.4, excess 25.6
    let result = scheduler.process_catch_up(&mut data, 1_000_000).unwrap();
    assert_eq!(result.died, 25);
    assert_eq!(data.swarm.workers.len(), 15);
    let kept: Vec<String> = data.swarm.workers.iter().take(10).map(|w| w.id.clone()).collect();
    assert_eq!(kept, first_ids);
}

#[test]
fn snapshots_land_on_day_boundaries() {
    let dir = tempdir().expect("tempdir");
    let config = fast_days();
    let mut scheduler =
        TickScheduler::new(config.clone()).with_snapshots(SnapshotWriter::new(dir.path(), 1));
    let mut data = colony(&config, 0);
    scheduler.apply_tick(&mut data, 200_000).unwrap();

    let path = dir.path().join("day_000001.json");
    assert!(path.exists());
    let restored = load_game(&path, &config.world).unwrap();
    assert_eq!(restored.simulated_time, 200);
    assert_eq!(restored.swarm.workers.len(), data.swarm.workers.len());
    assert_eq!(restored.daily_stats.len(), 1);
}
