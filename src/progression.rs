//! Foraging skill and per-food mastery curves.

use std::sync::OnceLock;

use crate::config::ProgressionConfig;

pub const MAX_SKILL: f64 = 100.0;
pub const MAX_MASTERY_LEVEL: u32 = 99;
/// Ceiling on the mastery term of the gather multiplier.
pub const MAX_MASTERY_BONUS: f64 = 1.0;

/// Skill gained per unit of food at the current skill level.
pub fn skill_gain_rate(skill: f64, config: &ProgressionConfig) -> f64 {
    let knee = config.skill_gain_knee.max(f64::EPSILON);
    config.skill_gain_scale / (1.0 + skill.max(0.0) / knee).powf(config.skill_gain_power)
}

/// New skill after gathering `food_gathered`. Nothing gathered, nothing learned.
pub fn apply_skill_gain(skill: f64, food_gathered: f64, config: &ProgressionConfig) -> f64 {
    if !(food_gathered > 0.0) {
        return skill;
    }
    (skill + skill_gain_rate(skill, config) * food_gathered).clamp(0.0, MAX_SKILL)
}

pub fn mastery_xp_for(food_gathered: f64, config: &ProgressionConfig) -> f64 {
    if !(food_gathered > 0.0) {
        return 0.0;
    }
    food_gathered * config.mastery_xp_per_unit
}

/// Per-level increment `(L-1) + 300·2^((L-1)/7)`.
pub fn xp_for_level(level: u32) -> f64 {
    let l = level.saturating_sub(1) as f64;
    l + 300.0 * 2f64.powf(l / 7.0)
}

/// Cumulative XP thresholds, index = level (index 0 unused).
pub struct MasteryTable {
    thresholds: Vec<u64>,
}

impl MasteryTable {
    pub fn build() -> Self {
        let mut thresholds = vec![0_u64; MAX_MASTERY_LEVEL as usize + 1];
        let mut points = 0.0_f64;
        for level in 2..=MAX_MASTERY_LEVEL {
            points += xp_for_level(level).floor();
            thresholds[level as usize] = (points / 4.0).floor() as u64;
        }
        Self { thresholds }
    }

    pub fn threshold(&self, level: u32) -> u64 {
        let level = level.clamp(1, MAX_MASTERY_LEVEL);
        self.thresholds[level as usize]
    }

    /// Highest level whose threshold `xp` meets, scanning down from 99.
    pub fn level_for(&self, xp: f64) -> u32 {
        if !xp.is_finite() || xp <= 0.0 {
            return 1;
        }
        (1..=MAX_MASTERY_LEVEL)
            .rev()
            .find(|&level| xp >= self.thresholds[level as usize] as f64)
            .unwrap_or(1)
    }
}

/// Table shared by the whole process, built on first use.
pub fn mastery_table() -> &'static MasteryTable {
    static TABLE: OnceLock<MasteryTable> = OnceLock::new();
    TABLE.get_or_init(MasteryTable::build)
}

pub fn mastery_level(xp: f64) -> u32 {
    mastery_table().level_for(xp)
}

/// Multiplier applied to a worker's base gather rate: skill scales it by up
/// to 2x, mastery XP on the zone's food by `xp / 200` capped at
/// `MAX_MASTERY_BONUS`.
pub fn gather_multiplier(foraging_skill: f64, mastery_xp: f64) -> f64 {
    let skill = 1.0 + foraging_skill.clamp(0.0, MAX_SKILL) / 100.0;
    let mastery = 1.0 + (mastery_xp.max(0.0) / 200.0).min(MAX_MASTERY_BONUS);
    skill * mastery
}
