pub const MIN_STAGE: i8 = -6;
pub const MAX_STAGE: i8 = 6;

/// Multiplier for a stat stage: (2+s)/2 for s >= 0, 2/(2-s) below zero.
/// Stages outside [-6, 6] are clamped first.
pub fn stage_multiplier(stage: i8) -> f64 {
    let stage = f64::from(stage.clamp(MIN_STAGE, MAX_STAGE));
    if stage >= 0.0 {
        (2.0 + stage) / 2.0
    } else {
        2.0 / (2.0 - stage)
    }
}

/// Apply a stage delta, returning the new stage clamped to [-6, 6].
pub fn apply_stage_delta(current: i8, delta: i8) -> i8 {
    current.saturating_add(delta).clamp(MIN_STAGE, MAX_STAGE)
}

/// Level-scaled stat before stages: floor(base * 2 * level / 100) + 5.
pub fn scaled_stat(base: u16, level: u8) -> u32 {
    u32::from(base) * 2 * u32::from(level) / 100 + 5
}

/// Stat used in damage calculations, with the stage multiplier applied.
pub fn effective_stat(base: u16, level: u8, stage: i8) -> f64 {
    scaled_stat(base, level) as f64 * stage_multiplier(stage)
}

/// Turn-order speed. Stages are not applied to speed.
pub fn effective_speed(base_speed: u16, level: u8) -> u32 {
    scaled_stat(base_speed, level)
}

/// Max HP: floor(baseHP * 2 * level / 100) + level + 10, at least 1.
pub fn calculate_max_hp(base_hp: u16, level: u8) -> u16 {
    let hp = u32::from(base_hp) * 2 * u32::from(level) / 100 + u32::from(level) + 10;
    hp.clamp(1, u32::from(u16::MAX)) as u16
}
