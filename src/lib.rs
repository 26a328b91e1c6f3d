pub mod components;
pub mod config;
pub mod engine;
pub mod error;
pub mod hex;
pub mod lifecycle;
pub mod orbit;
pub mod progression;
pub mod rng;
pub mod scheduler;
pub mod snapshot;
pub mod systems;
pub mod world;
pub mod worldgen;

pub use config::{ConfigLoader, SimConfig};
pub use engine::{Engine, EngineBuilder};
pub use error::SimError;
pub use orbit::update_planet_positions;
pub use scheduler::{apply_tick, process_catch_up, TickScheduler};
pub use snapshot::normalize_planets_from_save;
pub use world::{found_colony, GameData, TickResult};
pub use worldgen::generate_trappist1_system;
