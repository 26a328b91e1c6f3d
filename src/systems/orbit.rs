use anyhow::Result;

use crate::{
    engine::{System, SystemContext, TickReport},
    orbit::update_planet_positions,
    world::GameData,
};

/// Moves every planet to its position at the end of the tick.
pub struct OrbitSystem;

impl OrbitSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for OrbitSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for OrbitSystem {
    fn name(&self) -> &str {
        "orbit"
    }

    fn run(
        &mut self,
        ctx: &SystemContext,
        data: &mut GameData,
        _report: &mut TickReport,
    ) -> Result<()> {
        update_planet_positions(&mut data.planets, ctx.tick + 1);
        Ok(())
    }
}
