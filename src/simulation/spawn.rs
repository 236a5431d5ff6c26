//! Obstacle archetypes and the difficulty-gated spawner.
//!
//! Archetypes differ only in spawn-time parameters, so a single
//! [`Obstacle`] struct tagged with [`ObstacleKind`] replaces a subclass
//! per sprite; the per-kind footprint lives in [`ObstacleKind::profile`].

use serde::{Deserialize, Serialize};

use super::collision::Extent;
use super::difficulty::{DINO_GROUP_VELOCITY, DifficultyState};
use super::rng::SimRng;

/// Gap between members of a spawned barrier group.
const GROUP_GAP: f32 = 10.0;
/// Spawn lead distance beyond the right field edge, lower bound.
const SPAWN_LEAD_MIN: f32 = 100.0;
/// Spawn lead distance beyond the right field edge, upper bound.
const SPAWN_LEAD_MAX: f32 = 300.0;
/// Probability of a flying hazard per spawn decision.
const FLYING_CHANCE: f32 = 0.2;
/// Probability mass up to which a group pattern is chosen once eligible.
const GROUP_CHANCE: f32 = 0.7;

/// Heights above the ground at which a flying hazard may travel. The
/// highest one sails over a running dino, the middle one forces a duck,
/// the lowest one forces a jump.
const FLYING_HEIGHTS: [f32; 3] = [400.0, 135.0, 80.0];

/// Fixed palette of grouped barrier layouts (left to right).
const GROUP_PATTERNS: [&[GroupSlot]; 5] = [
    &[GroupSlot::Large, GroupSlot::Large],
    &[GroupSlot::Small, GroupSlot::Small, GroupSlot::Small],
    &[GroupSlot::Large, GroupSlot::Large, GroupSlot::Large],
    &[GroupSlot::Small, GroupSlot::Large, GroupSlot::Small],
    &[GroupSlot::Large, GroupSlot::Small, GroupSlot::Large],
];

#[derive(Debug, Clone, Copy)]
enum GroupSlot {
    Small,
    Large,
}

/// Obstacle archetype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Low barrier; `cluster` selects the wide multi-stem sprite variant.
    SmallBarrier {
        /// Wide variant flag.
        cluster: bool,
    },
    /// Tall barrier.
    LargeBarrier,
    /// Airborne hazard. Always spawns singly.
    FlyingHazard,
}

/// Spawn-time footprint of an obstacle kind.
#[derive(Debug, Clone, Copy)]
pub struct KindProfile {
    /// Sprite width.
    pub width: f32,
    /// Sprite height.
    pub height: f32,
    /// Animation frame count (cosmetic).
    pub frames: u8,
}

impl ObstacleKind {
    /// Footprint table for the archetypes.
    pub fn profile(self) -> KindProfile {
        match self {
            Self::SmallBarrier { cluster: false } => KindProfile {
                width: 50.0,
                height: 90.0,
                frames: 1,
            },
            Self::SmallBarrier { cluster: true } => KindProfile {
                width: 100.0,
                height: 90.0,
                frames: 1,
            },
            Self::LargeBarrier => KindProfile {
                width: 70.0,
                height: 100.0,
                frames: 1,
            },
            Self::FlyingHazard => KindProfile {
                width: 90.0,
                height: 70.0,
                frames: 2,
            },
        }
    }
}

/// A scrolling obstacle owned by one episode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    /// Archetype tag.
    pub kind: ObstacleKind,
    /// Left edge. Strictly decreases every tick while the episode runs.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Set exactly once, when the obstacle falls behind the agent.
    pub passed: bool,
    /// Animation counter; the current frame is `frame_index / 5`.
    pub frame_index: u8,
}

impl Obstacle {
    /// Creates a ground-standing obstacle with its feet on `ground_y`.
    pub fn grounded(kind: ObstacleKind, x: f32, ground_y: f32) -> Self {
        Self {
            kind,
            x,
            y: ground_y - kind.profile().height,
            passed: false,
            frame_index: 0,
        }
    }

    /// Sprite width from the kind table.
    pub fn width(&self) -> f32 {
        self.kind.profile().width
    }

    /// Sprite height from the kind table.
    pub fn height(&self) -> f32 {
        self.kind.profile().height
    }

    /// Right edge.
    pub fn right(&self) -> f32 {
        self.x + self.width()
    }

    /// Scrolls left by `velocity` and advances the animation counter.
    pub fn advance(&mut self, velocity: f32) {
        self.x -= velocity;
        self.frame_index = (self.frame_index + 1) % 10;
    }

    /// Current animation frame (cosmetic, exposed for rendering).
    pub fn frame(&self) -> u8 {
        (self.frame_index / 5) % self.kind.profile().frames.max(1)
    }

    /// Collision extent for the current silhouette: flying hazards are
    /// elliptical, barriers are boxy.
    pub fn extent(&self) -> Extent {
        let profile = self.kind.profile();
        match self.kind {
            ObstacleKind::FlyingHazard => {
                Extent::ellipse(self.x, self.y, profile.width, profile.height)
            }
            _ => Extent::rect(self.x, self.y, profile.width, profile.height),
        }
    }

    /// True once the obstacle has fully scrolled off the visible field.
    pub fn is_offscreen(&self) -> bool {
        self.right() < 0.0
    }
}

/// Spawns the next obstacle wave just beyond the right field edge.
///
/// Flying hazards only ever spawn singly. Grouped barrier patterns are
/// only eligible once the scroll velocity exceeds
/// [`DINO_GROUP_VELOCITY`]; below that, a wave is always a single
/// barrier or a flying hazard. Members of a group are laid out left to
/// right behind an advancing cursor, so they never overlap.
pub fn spawn_wave(
    rng: &mut SimRng,
    difficulty: &DifficultyState,
    field_width: f32,
    ground_y: f32,
) -> Vec<Obstacle> {
    let mut cursor = field_width + rng.uniform(SPAWN_LEAD_MIN, SPAWN_LEAD_MAX);
    let roll = rng.uniform(0.0, 1.0);

    if roll < FLYING_CHANCE {
        let altitude = FLYING_HEIGHTS[rng.below(FLYING_HEIGHTS.len())];
        return vec![Obstacle {
            kind: ObstacleKind::FlyingHazard,
            x: cursor,
            y: ground_y - altitude,
            passed: false,
            frame_index: 0,
        }];
    }

    if difficulty.velocity > DINO_GROUP_VELOCITY && roll < GROUP_CHANCE {
        let pattern = GROUP_PATTERNS[rng.below(GROUP_PATTERNS.len())];
        let mut wave = Vec::with_capacity(pattern.len());
        for slot in pattern {
            let kind = match slot {
                GroupSlot::Small => ObstacleKind::SmallBarrier {
                    cluster: rng.coin(),
                },
                GroupSlot::Large => ObstacleKind::LargeBarrier,
            };
            let obstacle = Obstacle::grounded(kind, cursor, ground_y);
            cursor += obstacle.width() + GROUP_GAP;
            wave.push(obstacle);
        }
        return wave;
    }

    let kind = if rng.coin() {
        ObstacleKind::SmallBarrier {
            cluster: rng.coin(),
        }
    } else {
        ObstacleKind::LargeBarrier
    };
    vec![Obstacle::grounded(kind, cursor, ground_y)]
}
