//! Dino runner simulation: ballistic jumps, duck pose, obstacle waves,
//! and the survival-rate scoring episode.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use super::collision::{self, Extent};
use super::difficulty::{self, DifficultyState};
use super::episode::{BoundaryError, Episode, IntentLatch, TickEvents, TickOutcome, validate_action};
use super::population::RewardWeights;
use super::rng::SimRng;
use super::spawn::{self, Obstacle};

/// Tuning for the dino simulation. Units are pixels and ticks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DinoParams {
    /// Field width.
    pub width: f32,
    /// Field height.
    pub height: f32,
    /// Ground line the dino and barriers stand on.
    pub ground_y: f32,
    /// Fixed left edge of the dino.
    pub dino_x: f32,
    /// Upright silhouette width.
    pub run_width: f32,
    /// Upright silhouette height.
    pub run_height: f32,
    /// Ducking silhouette width.
    pub duck_width: f32,
    /// Ducking silhouette height.
    pub duck_height: f32,
    /// Gravity added to the vertical velocity every airborne tick.
    pub gravity: f32,
    /// Upward velocity imparted by a jump.
    pub jump_velocity: f32,
    /// Position change per unit of vertical velocity.
    pub fall_multiplier: f32,
    /// Score accrued per tick per unit of scroll velocity.
    pub score_rate: f32,
    /// Step budget; exhausting it is terminal.
    pub max_steps: u32,
}

impl Default for DinoParams {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 450.0,
            ground_y: 430.0,
            dino_x: 80.0,
            run_width: 80.0,
            run_height: 90.0,
            duck_width: 110.0,
            duck_height: 60.0,
            gravity: 0.6,
            jump_velocity: 8.5,
            fall_multiplier: 4.0,
            score_rate: 0.015,
            max_steps: 6000,
        }
    }
}

/// Dino pose. Ducking swaps the collision extent; Jumping follows the
/// ballistic arc. The running/ducking animation frame derives from the
/// step counter and is cosmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DinoPose {
    /// On the ground, upright.
    Running,
    /// Airborne.
    Jumping,
    /// On the ground, flattened.
    Ducking,
}

/// The dino agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dino {
    /// Current pose.
    pub pose: DinoPose,
    /// Top edge of the silhouette.
    pub y: f32,
    /// Vertical velocity while airborne (positive is down).
    pub vel_y: f32,
    /// Animation counter; the current frame is `step_index / 5`.
    pub step_index: u8,
}

impl Dino {
    fn new(params: &DinoParams) -> Self {
        Self {
            pose: DinoPose::Running,
            y: params.ground_y - params.run_height,
            vel_y: 0.0,
            step_index: 0,
        }
    }

    /// Silhouette width for the current pose.
    pub fn width(&self, params: &DinoParams) -> f32 {
        match self.pose {
            DinoPose::Ducking => params.duck_width,
            _ => params.run_width,
        }
    }

    /// Silhouette height for the current pose.
    pub fn height(&self, params: &DinoParams) -> f32 {
        match self.pose {
            DinoPose::Ducking => params.duck_height,
            _ => params.run_height,
        }
    }

    /// Current animation frame (cosmetic, exposed for rendering).
    pub fn frame(&self) -> u8 {
        (self.step_index / 5) % 2
    }

    /// Applies this tick's intents and integrates one tick. Jump wins
    /// over duck; both are ignored mid-air. Intents are per-tick values,
    /// not held state.
    pub fn update(&mut self, control: DinoControl, params: &DinoParams) {
        if self.pose != DinoPose::Jumping {
            if control.jump {
                self.pose = DinoPose::Jumping;
                self.vel_y = -params.jump_velocity;
            } else if control.duck {
                self.pose = DinoPose::Ducking;
            } else {
                self.pose = DinoPose::Running;
            }
        }

        match self.pose {
            DinoPose::Jumping => {
                self.vel_y += params.gravity;
                self.y += self.vel_y * params.fall_multiplier;
                if self.y + params.run_height >= params.ground_y {
                    self.y = params.ground_y - params.run_height;
                    self.vel_y = 0.0;
                    self.pose = DinoPose::Running;
                }
            }
            DinoPose::Running | DinoPose::Ducking => {
                self.y = params.ground_y - self.height(params);
                self.step_index = (self.step_index + 1) % 10;
            }
        }
    }

    /// Rounded-rectangle silhouette for the current pose and frame.
    pub fn extent(&self, params: &DinoParams) -> Extent {
        let w = self.width(params);
        let h = self.height(params);
        Extent::rounded(params.dino_x, self.y, w, h, w.min(h) * 0.25)
    }
}

/// Per-tick control for the dino episode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DinoControl {
    /// Jump this tick. Takes priority over duck.
    pub jump: bool,
    /// Duck this tick.
    pub duck: bool,
}

impl From<IntentLatch> for DinoControl {
    fn from(intents: IntentLatch) -> Self {
        Self {
            jump: intents.jump,
            duck: intents.duck,
        }
    }
}

/// Read-only view of one tick for the render boundary.
#[derive(Debug, Clone, Serialize)]
pub struct DinoSnapshot {
    /// Current pose.
    pub pose: DinoPose,
    /// Animation frame.
    pub frame: u8,
    /// Top edge of the dino.
    pub dino_y: f32,
    /// Obstacles on the field, oldest first.
    pub obstacles: Vec<Obstacle>,
    /// Accrued score.
    pub score: f32,
    /// Current scroll velocity.
    pub velocity: f32,
    /// Difficulty label.
    pub label: &'static str,
}

/// One dino playthrough: the runner, its obstacle waves, and the
/// velocity-scaled survival score.
#[derive(Debug, Clone)]
pub struct DinoEpisode {
    params: DinoParams,
    dino: Dino,
    obstacles: Vec<Obstacle>,
    score: f32,
    steps: u32,
    terminal: bool,
    rng: SimRng,
}

impl DinoEpisode {
    /// Creates an episode. The first wave spawns on the first tick.
    pub fn new(params: DinoParams, rng: SimRng) -> Self {
        Self {
            dino: Dino::new(&params),
            obstacles: Vec::new(),
            score: 0.0,
            steps: 0,
            terminal: false,
            rng,
            params,
        }
    }

    /// Convenience constructor from a bare seed.
    pub fn seeded(params: DinoParams, seed: u64) -> Self {
        Self::new(params, SimRng::seeded(seed))
    }

    /// Current difficulty, derived from the score.
    pub fn difficulty(&self) -> DifficultyState {
        difficulty::dino(self.score)
    }

    /// The dino.
    pub fn dino(&self) -> &Dino {
        &self.dino
    }

    /// Obstacles on the field, oldest first.
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Render snapshot for this tick.
    pub fn snapshot(&self) -> DinoSnapshot {
        let difficulty = self.difficulty();
        DinoSnapshot {
            pose: self.dino.pose,
            frame: self.dino.frame(),
            dino_y: self.dino.y,
            obstacles: self.obstacles.clone(),
            score: self.score,
            velocity: difficulty.velocity,
            label: difficulty.label,
        }
    }

    /// The obstacle the dino should be reacting to: the first one not yet
    /// fully behind it.
    fn target_obstacle(&self) -> Option<&Obstacle> {
        self.obstacles.iter().find(|obstacle| !obstacle.passed)
    }
}

impl Episode for DinoEpisode {
    type Control = DinoControl;

    fn observation_len(&self) -> usize {
        4
    }

    fn action_len(&self) -> usize {
        2
    }

    fn observe(&self) -> Array1<f32> {
        let difficulty = self.difficulty();
        let (distance, altitude, width) = match self.target_obstacle() {
            Some(obstacle) => (
                (obstacle.x - self.params.dino_x) / self.params.width,
                obstacle.y / self.params.height,
                obstacle.width() / self.params.width,
            ),
            // Nothing on the field yet: report a far-away, sizeless target.
            None => (1.0, 0.0, 0.0),
        };
        Array1::from_vec(vec![difficulty.velocity / 100.0, distance, altitude, width])
    }

    fn decode_action(&self, output: &Array1<f32>) -> Result<DinoControl, BoundaryError> {
        validate_action(output, self.action_len())?;
        let jump = output[0] > 0.5;
        Ok(DinoControl {
            jump,
            duck: !jump && output[1] > 0.5,
        })
    }

    fn tick(&mut self, control: DinoControl) -> TickOutcome {
        if self.terminal {
            return TickOutcome::skipped();
        }
        self.steps += 1;
        let difficulty = difficulty::dino(self.score);
        let mut events = TickEvents::default();

        if self.obstacles.is_empty() {
            self.obstacles = spawn::spawn_wave(
                &mut self.rng,
                &difficulty,
                self.params.width,
                self.params.ground_y,
            );
        }

        self.dino.update(control, &self.params);

        for obstacle in &mut self.obstacles {
            obstacle.advance(difficulty.velocity);
        }

        let dino_extent = self.dino.extent(&self.params);
        if self
            .obstacles
            .iter()
            .any(|obstacle| collision::overlaps(&dino_extent, &obstacle.extent()))
        {
            events.collided = true;
            self.terminal = true;
            return TickOutcome {
                alive: false,
                score_delta: 0.0,
                events,
            };
        }

        for obstacle in &mut self.obstacles {
            if !obstacle.passed && obstacle.right() < self.params.dino_x {
                obstacle.passed = true;
                events.passed += 1;
            }
        }

        self.obstacles.retain(|obstacle| !obstacle.is_offscreen());

        let score_delta = difficulty.velocity * self.params.score_rate;
        self.score += score_delta;

        if self.steps >= self.params.max_steps {
            events.timed_out = true;
            self.terminal = true;
            return TickOutcome {
                alive: false,
                score_delta,
                events,
            };
        }

        TickOutcome {
            alive: true,
            score_delta,
            events,
        }
    }

    fn terminal(&self) -> bool {
        self.terminal
    }

    fn score(&self) -> f32 {
        self.score
    }

    fn steps(&self) -> u32 {
        self.steps
    }

    fn shaped_reward(&self, outcome: &TickOutcome, weights: &RewardWeights) -> f32 {
        let mut reward = weights.survival;
        if outcome.events.collided {
            reward -= weights.collision_penalty;
        }
        reward
    }
}
