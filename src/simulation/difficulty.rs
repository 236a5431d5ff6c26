//! Difficulty ramps and the paddle-game curriculum.
//!
//! Difficulty is always recomputed from cumulative score, never stored and
//! mutated: two episodes at the same score see identical parameters, and a
//! single episode can only ever ramp up because its score never decreases.

use serde::Serialize;

/// Base scroll velocity of the flappy pipes.
pub const FLAPPY_BASE_VELOCITY: f32 = 5.0;
/// Hard cap on the flappy scroll velocity.
pub const FLAPPY_MAX_VELOCITY: f32 = 10.0;
/// Score interval between flappy velocity increments.
pub const FLAPPY_VELOCITY_STEP_SCORE: u32 = 15;
/// Score past which pipes start bobbing vertically.
pub const FLAPPY_OSCILLATE_SCORE: u32 = 50;
/// Score past which pipe gaps start pulsing.
pub const FLAPPY_PULSE_SCORE: u32 = 200;
/// Gap between a pipe pair at spawn time.
pub const FLAPPY_BASE_GAP: f32 = 200.0;
/// Smallest gap a pulsing pipe can reach.
pub const FLAPPY_GAP_MIN: f32 = 150.0;
/// Largest gap a pulsing pipe can reach.
pub const FLAPPY_GAP_MAX: f32 = 220.0;
/// Lowest top edge of the gap (bobbing and spawning bounce off this).
pub const FLAPPY_GAP_TOP_MIN: f32 = 50.0;
/// Highest top edge of the gap.
pub const FLAPPY_GAP_TOP_MAX: f32 = 400.0;

/// Base scroll velocity of the dino field.
pub const DINO_BASE_VELOCITY: f32 = 10.0;
/// First-tier velocity cap.
pub const DINO_FIRST_CAP: f32 = 25.0;
/// Second-tier velocity cap, reachable only past [`DINO_CAP_RAISE_SCORE`].
pub const DINO_SECOND_CAP: f32 = 40.0;
/// Score at which the dino velocity cap is raised to the second tier.
pub const DINO_CAP_RAISE_SCORE: f32 = 500.0;
/// Velocity above which grouped barrier patterns become eligible to spawn.
pub const DINO_GROUP_VELOCITY: f32 = 18.0;

/// Half-range of the paddle bot's aiming error at zero skill, in pixels.
pub const BOT_ERROR_RANGE: f32 = 150.0;

/// Simulation parameters derived from progress. Monotone non-decreasing
/// over the course of one episode; secondary toggles latch on and never
/// switch back off.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DifficultyState {
    /// Horizontal scroll velocity applied to every obstacle this tick.
    pub velocity: f32,
    /// Baseline gap handed to newly spawned pipe pairs.
    pub gap: f32,
    /// Obstacles bob vertically once latched.
    pub oscillate: bool,
    /// Pipe gaps breathe once latched.
    pub pulse: bool,
    /// Adversarial bot skill (paddle game only).
    pub bot_skill: f32,
    /// Ramp or curriculum level index.
    pub level: usize,
    /// Human-readable level label for the render boundary.
    pub label: &'static str,
}

/// Flappy ramp: stepped velocity increments up to a hard cap, then two
/// permanent toggles at their own milestones.
pub fn flappy(score: u32) -> DifficultyState {
    let velocity = (FLAPPY_BASE_VELOCITY + (score / FLAPPY_VELOCITY_STEP_SCORE) as f32)
        .min(FLAPPY_MAX_VELOCITY);
    let oscillate = score > FLAPPY_OSCILLATE_SCORE;
    let pulse = score > FLAPPY_PULSE_SCORE;
    let (level, label) = if pulse {
        (3, "Lvl 4 (GOD)")
    } else if oscillate {
        (2, "Lvl 3 (Move)")
    } else if score > FLAPPY_VELOCITY_STEP_SCORE {
        (1, "Lvl 2 (Speed)")
    } else {
        (0, "Lvl 1")
    };
    DifficultyState {
        velocity,
        gap: FLAPPY_BASE_GAP,
        oscillate,
        pulse,
        bot_skill: 0.0,
        level,
        label,
    }
}

/// Dino ramp: linear velocity growth under a two-tier cap. The cap itself
/// is raised once the score passes [`DINO_CAP_RAISE_SCORE`].
pub fn dino(score: f32) -> DifficultyState {
    let (velocity, level, label) = if score < DINO_CAP_RAISE_SCORE {
        (
            (DINO_BASE_VELOCITY + score * 0.03).min(DINO_FIRST_CAP),
            0,
            "Run",
        )
    } else {
        (
            (DINO_FIRST_CAP + (score - DINO_CAP_RAISE_SCORE) * 0.04).min(DINO_SECOND_CAP),
            1,
            "Overdrive",
        )
    };
    DifficultyState {
        velocity,
        gap: 0.0,
        oscillate: false,
        pulse: false,
        bot_skill: 0.0,
        level,
        label,
    }
}

/// One rung of the paddle-game curriculum.
#[derive(Debug, Clone, Copy)]
pub struct Level {
    /// Label shown at the render boundary.
    pub name: &'static str,
    /// Paddle returns required to advance past this rung.
    pub hit_target: u32,
    /// Bot skill while on this rung. Above 1.0 the bot moves faster than
    /// its baseline but still aims with a small residual error.
    pub bot_skill: f32,
}

/// The paddle-game curriculum, easiest rung first. The last rung is
/// survival mode: its hit target is never realistically reached.
pub const LEVELS: [Level; 4] = [
    Level {
        name: "Kindergarten",
        hit_target: 10,
        bot_skill: 0.4,
    },
    Level {
        name: "Amateur",
        hit_target: 20,
        bot_skill: 0.7,
    },
    Level {
        name: "Pro",
        hit_target: 30,
        bot_skill: 1.0,
    },
    Level {
        name: "GOD MODE",
        hit_target: 999,
        bot_skill: 1.2,
    },
];

/// Paddle-game difficulty for a curriculum level index (clamped to the
/// last rung).
pub fn pong(level: usize) -> DifficultyState {
    let index = level.min(LEVELS.len() - 1);
    let rung = &LEVELS[index];
    DifficultyState {
        velocity: 0.0,
        gap: 0.0,
        oscillate: false,
        pulse: false,
        bot_skill: rung.bot_skill,
        level: index,
        label: rung.name,
    }
}

/// Hit target for a curriculum level index (clamped to the last rung).
pub fn pong_hit_target(level: usize) -> u32 {
    LEVELS[level.min(LEVELS.len() - 1)].hit_target
}
