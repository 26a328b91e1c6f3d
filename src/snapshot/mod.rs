//! Save files: writing day snapshots and loading them back through the normalizer.

pub mod normalize;

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    components::Planet, config::WorldConfig, orbit::update_planet_positions, world::GameData,
    worldgen::generate_system,
};

pub use normalize::{normalize_planets_against, normalize_planets_from_save};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveMetadata {
    pub saved_at: DateTime<Utc>,
    pub simulated_time: u64,
    pub day: u64,
    pub workers: usize,
    pub queens: usize,
}

#[derive(Serialize)]
struct SaveFileRef<'a> {
    metadata: SaveMetadata,
    game: &'a GameData,
}

pub fn save_game(
    path: impl AsRef<Path>,
    data: &GameData,
    ticks_per_day: u64,
) -> Result<SaveMetadata> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create save directory {}", parent.display()))?;
    }
    let metadata = SaveMetadata {
        saved_at: Utc::now(),
        simulated_time: data.simulated_time,
        day: data.day(ticks_per_day),
        workers: data.swarm.workers.len(),
        queens: data.swarm.queens.len(),
    };
    let json = serde_json::to_string_pretty(&SaveFileRef {
        metadata: metadata.clone(),
        game: data,
    })
    .context("Failed to serialize game")?;
    fs::write(path, json).with_context(|| format!("Failed to write save {}", path.display()))?;
    tracing::info!(
        target: "trappist::save",
        path = %path.display(),
        day = metadata.day,
        workers = metadata.workers,
        "save.written"
    );
    Ok(metadata)
}

/// Reads a save and repairs its planets against the canonical world.
pub fn load_game(path: impl AsRef<Path>, world: &WorldConfig) -> Result<GameData> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read save {}", path.display()))?;
    let value: Value =
        serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))?;
    game_from_value(value, generate_system(world))
        .with_context(|| format!("Invalid save {}", path.display()))
}

/// Accepts either a full save file (`{metadata, game}`) or a bare game record.
pub fn game_from_value(value: Value, canonical: Vec<Planet>) -> Result<GameData> {
    let mut game = match value {
        Value::Object(mut map) if map.contains_key("game") => {
            map.remove("game").unwrap_or(Value::Null)
        }
        other => other,
    };
    let Value::Object(fields) = &mut game else {
        bail!("save does not contain a game object");
    };
    let saved_planets = fields.remove("planets").unwrap_or(Value::Null);
    let planets = normalize_planets_against(&saved_planets, canonical);
    fields.insert(
        "planets".to_string(),
        serde_json::to_value(&planets).context("Failed to re-encode planets")?,
    );
    let mut data: GameData = serde_json::from_value(game).context("Failed to decode game")?;
    update_planet_positions(&mut data.planets, data.simulated_time);
    Ok(data)
}

/// Writes `day_NNNNNN.json` every `interval_days` completed days.
pub struct SnapshotWriter {
    output_dir: PathBuf,
    interval_days: u64,
    last_day: Option<u64>,
}

impl SnapshotWriter {
    pub fn new(output_dir: impl AsRef<Path>, interval_days: u64) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            interval_days,
            last_day: None,
        }
    }

    pub fn maybe_write(&mut self, data: &GameData, ticks_per_day: u64) -> Result<Option<PathBuf>> {
        if self.interval_days == 0 {
            return Ok(None);
        }
        let day = data.day(ticks_per_day);
        if day == 0 || day % self.interval_days != 0 || self.last_day == Some(day) {
            return Ok(None);
        }
        let path = self.output_dir.join(format!("day_{day:06}.json"));
        save_game(&path, data, ticks_per_day)?;
        self.last_day = Some(day);
        Ok(Some(path))
    }
}
