//! Flappy bird simulation: bird kinematics, pipe scrolling, mask
//! collisions, and the pass-scoring episode.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use super::collision::{self, Extent};
use super::difficulty::{
    self, DifficultyState, FLAPPY_GAP_MAX, FLAPPY_GAP_MIN, FLAPPY_GAP_TOP_MAX, FLAPPY_GAP_TOP_MIN,
};
use super::episode::{BoundaryError, Episode, IntentLatch, TickEvents, TickOutcome, validate_action};
use super::population::RewardWeights;
use super::rng::SimRng;

/// Tilt snapped to when the bird rises.
const MAX_TILT: f32 = 25.0;
/// Tilt decay per falling tick.
const TILT_VEL: f32 = 15.0;
/// Steepest nose-down tilt.
const MIN_TILT: f32 = -35.0;
/// Terminal per-tick drop.
const MAX_DROP_PER_TICK: f32 = 16.0;
/// Extra displacement added to upward motion so flaps feel snappy.
const RISE_SNAP: f32 = 2.0;
/// Quadratic fall coefficient (0.5 times the gravity constant).
const FALL_ACCEL: f32 = 1.5;
/// Vertical step of a bobbing pipe.
const BOB_STEP: f32 = 4.0;
/// Gap change per tick of a pulsing pipe.
const PULSE_STEP: f32 = 2.0;

/// Tuning for the flappy simulation. Units are pixels and ticks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlappyParams {
    /// Field width.
    pub width: f32,
    /// Field height.
    pub height: f32,
    /// Ground line; touching it is terminal.
    pub ground_y: f32,
    /// Fixed horizontal position of the bird's center.
    pub bird_x: f32,
    /// Vertical center of the bird at spawn.
    pub bird_start_y: f32,
    /// Bird silhouette width.
    pub bird_width: f32,
    /// Bird silhouette height.
    pub bird_height: f32,
    /// Velocity imparted by a flap (negative is up).
    pub lift: f32,
    /// Pipe sprite width.
    pub pipe_width: f32,
    /// Step budget; exhausting it is terminal.
    pub max_steps: u32,
}

impl Default for FlappyParams {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 630.0,
            ground_y: 630.0,
            bird_x: 230.0,
            bird_start_y: 350.0,
            bird_width: 64.0,
            bird_height: 48.0,
            lift: -7.2,
            pipe_width: 90.0,
            max_steps: 6000,
        }
    }
}

/// The flappy agent. Vertical displacement follows a capped quadratic
/// profile from the last flap: `d = lift * t + 1.5 * t^2`, clamped to
/// [`MAX_DROP_PER_TICK`] on the way down and amplified by [`RISE_SNAP`]
/// on the way up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bird {
    /// Horizontal center (fixed).
    pub x: f32,
    /// Vertical center.
    pub y: f32,
    /// Velocity imparted by the last flap.
    pub vel: f32,
    /// Ticks since the last flap.
    pub tick_count: u32,
    /// Cosmetic tilt in degrees for the render boundary. Has no effect on
    /// physics or collision.
    pub tilt: f32,
    /// Height at the moment of the last flap; drives the tilt pose.
    anchor_y: f32,
}

impl Bird {
    fn new(params: &FlappyParams) -> Self {
        Self {
            x: params.bird_x,
            y: params.bird_start_y,
            vel: 0.0,
            tick_count: 0,
            tilt: 0.0,
            anchor_y: params.bird_start_y,
        }
    }

    /// Resets the fall clock and imparts upward velocity. The latest
    /// action in a tick wins; there is no queuing.
    pub fn flap(&mut self, lift: f32) {
        self.vel = lift;
        self.tick_count = 0;
        self.anchor_y = self.y;
    }

    /// Integrates one tick and returns the applied vertical displacement.
    pub fn advance(&mut self) -> f32 {
        self.tick_count += 1;
        let t = self.tick_count as f32;
        let mut d = self.vel * t + FALL_ACCEL * t * t;
        if d >= MAX_DROP_PER_TICK {
            d = MAX_DROP_PER_TICK;
        }
        if d < 0.0 {
            d -= RISE_SNAP;
        }
        self.y += d;

        if d < 0.0 || self.y < self.anchor_y + 50.0 {
            if self.tilt < MAX_TILT {
                self.tilt = MAX_TILT;
            }
        } else if self.tilt > MIN_TILT {
            self.tilt -= TILT_VEL;
        }
        d
    }

    /// Elliptical silhouette centered on the bird.
    pub fn extent(&self, params: &FlappyParams) -> Extent {
        Extent::ellipse(
            self.x - params.bird_width * 0.5,
            self.y - params.bird_height * 0.5,
            params.bird_width,
            params.bird_height,
        )
    }
}

/// A pipe pair. The gap's top edge sits at `gap_top`; the top pipe fills
/// everything above it and the bottom pipe everything below `gap_top +
/// gap` down to the ground.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pipe {
    /// Left edge.
    pub x: f32,
    /// Bottom edge of the top pipe.
    pub gap_top: f32,
    /// Current gap height. Pulses once the difficulty latches pulsing.
    pub gap: f32,
    /// Set exactly once, when the pipe falls behind the bird.
    pub passed: bool,
    bob_dir: f32,
    pulse_dir: f32,
}

impl Pipe {
    /// Spawns a pipe at `x` with a random gap position.
    pub fn spawn(x: f32, gap: f32, rng: &mut SimRng) -> Self {
        Self {
            x,
            gap_top: rng.uniform(FLAPPY_GAP_TOP_MIN, FLAPPY_GAP_TOP_MAX),
            gap,
            passed: false,
            bob_dir: 1.0,
            pulse_dir: 1.0,
        }
    }

    /// Scrolls left and applies the secondary motion patterns that the
    /// difficulty has latched on.
    pub fn advance(&mut self, difficulty: &DifficultyState) {
        self.x -= difficulty.velocity;

        if difficulty.oscillate {
            self.gap_top += self.bob_dir * BOB_STEP;
            if self.gap_top > FLAPPY_GAP_TOP_MAX {
                self.bob_dir = -1.0;
            }
            if self.gap_top < FLAPPY_GAP_TOP_MIN {
                self.bob_dir = 1.0;
            }
        }

        if difficulty.pulse {
            self.gap += self.pulse_dir * PULSE_STEP;
            if self.gap > FLAPPY_GAP_MAX {
                self.pulse_dir = -1.0;
            }
            if self.gap < FLAPPY_GAP_MIN {
                self.pulse_dir = 1.0;
            }
        }
    }

    /// Vertical center of the gap, the bird's natural target.
    pub fn gap_center(&self) -> f32 {
        self.gap_top + self.gap * 0.5
    }

    /// Collision test against both parts of the pair. Overlapping either
    /// pipe counts.
    pub fn collides(&self, bird: &Extent, params: &FlappyParams) -> bool {
        let top = Extent::rect(self.x, 0.0, params.pipe_width, self.gap_top);
        let bottom_y = self.gap_top + self.gap;
        let bottom = Extent::rect(
            self.x,
            bottom_y,
            params.pipe_width,
            (params.ground_y - bottom_y).max(0.0),
        );
        collision::overlaps(bird, &top) || collision::overlaps(bird, &bottom)
    }

    /// True once the pipe has fully scrolled off the visible field.
    pub fn is_offscreen(&self, params: &FlappyParams) -> bool {
        self.x + params.pipe_width < 0.0
    }
}

/// Per-tick control for the flappy episode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlappyControl {
    /// Flap this tick.
    pub flap: bool,
}

impl From<IntentLatch> for FlappyControl {
    fn from(intents: IntentLatch) -> Self {
        Self { flap: intents.jump }
    }
}

/// Read-only view of one tick for the render boundary.
#[derive(Debug, Clone, Serialize)]
pub struct FlappySnapshot {
    /// Bird horizontal center.
    pub bird_x: f32,
    /// Bird vertical center.
    pub bird_y: f32,
    /// Cosmetic tilt in degrees.
    pub tilt: f32,
    /// Pipes currently on the field, oldest first.
    pub pipes: Vec<Pipe>,
    /// Pipes passed so far.
    pub score: u32,
    /// Current scroll velocity.
    pub velocity: f32,
    /// Difficulty label.
    pub label: &'static str,
}

/// One flappy playthrough: a bird, its pipes, and the pass counter.
#[derive(Debug, Clone)]
pub struct FlappyEpisode {
    params: FlappyParams,
    bird: Bird,
    pipes: Vec<Pipe>,
    score: u32,
    steps: u32,
    terminal: bool,
    rng: SimRng,
}

impl FlappyEpisode {
    /// Creates an episode with one pipe staged at the right field edge.
    pub fn new(params: FlappyParams, mut rng: SimRng) -> Self {
        let first = Pipe::spawn(params.width, difficulty::flappy(0).gap, &mut rng);
        Self {
            bird: Bird::new(&params),
            pipes: vec![first],
            score: 0,
            steps: 0,
            terminal: false,
            rng,
            params,
        }
    }

    /// Convenience constructor from a bare seed.
    pub fn seeded(params: FlappyParams, seed: u64) -> Self {
        Self::new(params, SimRng::seeded(seed))
    }

    /// Current difficulty, derived from the score.
    pub fn difficulty(&self) -> DifficultyState {
        difficulty::flappy(self.score)
    }

    /// The bird.
    pub fn bird(&self) -> &Bird {
        &self.bird
    }

    /// Pipes currently on the field, oldest first.
    pub fn pipes(&self) -> &[Pipe] {
        &self.pipes
    }

    /// Render snapshot for this tick.
    pub fn snapshot(&self) -> FlappySnapshot {
        let difficulty = self.difficulty();
        FlappySnapshot {
            bird_x: self.bird.x,
            bird_y: self.bird.y,
            tilt: self.bird.tilt,
            pipes: self.pipes.clone(),
            score: self.score,
            velocity: difficulty.velocity,
            label: difficulty.label,
        }
    }

    /// The pipe the bird should be steering for: the first one it has not
    /// yet fully cleared.
    fn target_pipe(&self) -> &Pipe {
        if self.pipes.len() > 1 && self.bird.x > self.pipes[0].x + self.params.pipe_width {
            &self.pipes[1]
        } else {
            &self.pipes[0]
        }
    }
}

impl Episode for FlappyEpisode {
    type Control = FlappyControl;

    fn observation_len(&self) -> usize {
        3
    }

    fn action_len(&self) -> usize {
        1
    }

    fn observe(&self) -> Array1<f32> {
        let pipe = self.target_pipe();
        Array1::from_vec(vec![
            self.bird.y / self.params.height,
            (self.bird.y - pipe.gap_center()) / self.params.height,
            self.bird.vel / 10.0,
        ])
    }

    fn decode_action(&self, output: &Array1<f32>) -> Result<FlappyControl, BoundaryError> {
        validate_action(output, self.action_len())?;
        Ok(FlappyControl {
            flap: output[0] > 0.5,
        })
    }

    fn tick(&mut self, control: FlappyControl) -> TickOutcome {
        if self.terminal {
            return TickOutcome::skipped();
        }
        self.steps += 1;
        let difficulty = difficulty::flappy(self.score);
        let mut events = TickEvents::default();

        if control.flap {
            self.bird.flap(self.params.lift);
        }
        self.bird.advance();

        for pipe in &mut self.pipes {
            pipe.advance(&difficulty);
        }

        let bird_extent = self.bird.extent(&self.params);
        if self
            .pipes
            .iter()
            .any(|pipe| pipe.collides(&bird_extent, &self.params))
        {
            events.collided = true;
            self.terminal = true;
            return TickOutcome {
                alive: false,
                score_delta: 0.0,
                events,
            };
        }

        let half_height = self.params.bird_height * 0.5;
        if self.bird.y + half_height >= self.params.ground_y || self.bird.y - half_height <= 0.0 {
            self.terminal = true;
            return TickOutcome {
                alive: false,
                score_delta: 0.0,
                events,
            };
        }

        for pipe in &mut self.pipes {
            if !pipe.passed && pipe.x < self.bird.x {
                pipe.passed = true;
                events.passed += 1;
            }
        }
        let score_delta = events.passed as f32;
        if events.passed > 0 {
            self.score += events.passed;
            let next = Pipe::spawn(self.params.width, difficulty.gap, &mut self.rng);
            self.pipes.push(next);
        }

        let params = &self.params;
        self.pipes.retain(|pipe| !pipe.is_offscreen(params));

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
        self.score as f32
    }

    fn steps(&self) -> u32 {
        self.steps
    }

    fn shaped_reward(&self, outcome: &TickOutcome, weights: &RewardWeights) -> f32 {
        let mut reward = weights.survival;
        reward += outcome.events.passed as f32 * weights.event;
        if outcome.events.collided {
            reward -= weights.collision_penalty;
        }
        reward
    }
}
