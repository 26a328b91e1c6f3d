//! Zone state machine and biomass accounting.
//!
//! States only move forward:
//! `unexplored → exploring → [combating] → converting → harvesting → saturated`.
//! Progress is supplied by colony work; this module only interprets it.

use crate::components::{Zone, ZoneState};

pub const PROGRESS_COMPLETE: f64 = 100.0;
const REGROWTH_FRACTION: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiomassDraw {
    pub taken: f64,
    /// Depletion emptied the zone (checked before regrowth).
    pub exhausted: bool,
    pub transition: Option<ZoneState>,
}

/// State reached when the current one completes, or `None` where progress
/// does not drive the transition.
pub fn next_state(zone: &Zone) -> Option<ZoneState> {
    match zone.state {
        ZoneState::Unexplored => Some(ZoneState::Exploring),
        ZoneState::Exploring if zone.has_active_predator() => Some(ZoneState::Combating),
        ZoneState::Exploring => Some(ZoneState::Converting),
        ZoneState::Combating => Some(ZoneState::Converting),
        ZoneState::Converting => Some(ZoneState::Harvesting),
        ZoneState::Harvesting | ZoneState::Saturated => None,
    }
}

/// Work units scaled for the zone's current state.
pub fn effective_work(zone: &Zone, work: f64) -> f64 {
    match zone.state {
        ZoneState::Combating => work / (1.0 + zone.predator_strength as f64 / 10.0),
        _ => work,
    }
}

/// Adds work to `progress` and applies at most one transition.
pub fn contribute_work(zone: &mut Zone, work: f64) -> Option<ZoneState> {
    if next_state(zone).is_none() || !(work > 0.0) {
        return None;
    }
    let current = if zone.progress.is_finite() {
        zone.progress
    } else {
        0.0
    };
    zone.progress = (current + effective_work(zone, work)).clamp(0.0, PROGRESS_COMPLETE);
    advance(zone)
}

/// Moves to the next state once progress is complete.
pub fn advance(zone: &mut Zone) -> Option<ZoneState> {
    if zone.progress < PROGRESS_COMPLETE {
        return None;
    }
    let next = next_state(zone)?;
    if zone.state == ZoneState::Combating {
        zone.predator_defeated = true;
    }
    zone.state = next;
    zone.progress = 0.0;
    Some(next)
}

/// Takes up to `amount`, then regrows 1% of the rate, capped at the initial stock.
pub fn deplete_biomass(zone: &mut Zone, amount: f64) -> BiomassDraw {
    let available = if zone.biomass_available.is_finite() {
        zone.biomass_available.max(0.0)
    } else {
        0.0
    };
    let taken = amount.max(0.0).min(available);
    let remaining = available - taken;
    let exhausted = remaining <= 0.0;

    let mut transition = None;
    if exhausted && zone.state == ZoneState::Harvesting {
        zone.state = ZoneState::Saturated;
        zone.progress = 0.0;
        transition = Some(ZoneState::Saturated);
    }

    let regrowth = zone.biomass_rate.max(0.0) * REGROWTH_FRACTION;
    zone.biomass_available = (remaining + regrowth).min(zone.biomass_cap());

    BiomassDraw {
        taken,
        exhausted,
        transition,
    }
}
