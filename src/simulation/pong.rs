//! Paddle game simulation: an agent paddle on the left, a skill-scaled
//! bot on the right, and a hit-count curriculum that levels up until the
//! survival rung.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use super::collision::{self, Extent};
use super::difficulty::{self, BOT_ERROR_RANGE, DifficultyState};
use super::episode::{BoundaryError, Episode, TickEvents, TickOutcome, validate_action};
use super::population::RewardWeights;
use super::rng::SimRng;

/// Tuning for the paddle game. Units are pixels and ticks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PongParams {
    /// Field width.
    pub width: f32,
    /// Field height.
    pub height: f32,
    /// Paddle width.
    pub paddle_width: f32,
    /// Paddle height.
    pub paddle_height: f32,
    /// Paddle movement per tick at speed factor 1.
    pub paddle_vel: f32,
    /// Ball radius.
    pub ball_radius: f32,
    /// Horizontal ball velocity at serve.
    pub ball_base_speed: f32,
    /// Steepest vertical velocity a paddle edge can impart.
    pub max_bounce_vel: f32,
    /// Step budget; exhausting it is terminal.
    pub max_steps: u32,
}

impl Default for PongParams {
    fn default() -> Self {
        Self {
            width: 700.0,
            height: 500.0,
            paddle_width: 20.0,
            paddle_height: 100.0,
            paddle_vel: 5.0,
            ball_radius: 7.0,
            ball_base_speed: 6.0,
            max_bounce_vel: 5.0,
            max_steps: 6000,
        }
    }
}

/// A vertically clamped paddle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    /// Left edge (fixed).
    pub x: f32,
    /// Top edge.
    pub y: f32,
}

impl Paddle {
    /// Moves one tick up or down at the given speed factor, clamped to
    /// the playfield.
    pub fn advance(&mut self, up: bool, speed: f32, params: &PongParams) {
        let v = params.paddle_vel * speed;
        self.y += if up { -v } else { v };
        self.y = self.y.clamp(0.0, params.height - params.paddle_height);
    }

    /// Vertical center.
    pub fn center_y(&self, params: &PongParams) -> f32 {
        self.y + params.paddle_height * 0.5
    }

    /// Bounding-box extent.
    pub fn extent(&self, params: &PongParams) -> Extent {
        Extent::rect(self.x, self.y, params.paddle_width, params.paddle_height)
    }
}

/// The ball. Velocity components are raw; the serve speed factor scales
/// both on every advance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    /// Horizontal center.
    pub x: f32,
    /// Vertical center.
    pub y: f32,
    /// Raw horizontal velocity.
    pub vx: f32,
    /// Raw vertical velocity.
    pub vy: f32,
    /// Serve speed factor, derived from the bot skill at serve time.
    pub speed: f32,
}

impl Ball {
    /// Serves from the field center with a random horizontal direction
    /// and a random (never perfectly flat in expectation) vertical angle.
    pub fn serve(rng: &mut SimRng, params: &PongParams, bot_skill: f32) -> Self {
        let direction = if rng.coin() { 1.0 } else { -1.0 };
        Self {
            x: params.width * 0.5,
            y: params.height * 0.5,
            vx: direction * params.ball_base_speed,
            vy: rng.uniform(-4.0, 4.0),
            speed: 1.0 + bot_skill * 0.1,
        }
    }

    /// Integrates one tick.
    pub fn advance(&mut self) {
        self.x += self.vx * self.speed;
        self.y += self.vy * self.speed;
    }

    /// Extent used for the bounding-box paddle test: the ball's center
    /// line, widened by the radius. Keeping the height at zero preserves
    /// the serve rule that the ball center must be within the paddle's
    /// vertical span.
    pub fn extent(&self, params: &PongParams) -> Extent {
        Extent::rect(
            self.x - params.ball_radius,
            self.y,
            params.ball_radius * 2.0,
            0.0,
        )
    }
}

/// Per-tick control for the paddle episode. The decision policy is
/// winner-takes-all, so the paddle is always in motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PongControl {
    /// Move the paddle up.
    Up,
    /// Move the paddle down.
    Down,
}

/// Read-only view of one tick for the render boundary.
#[derive(Debug, Clone, Serialize)]
pub struct PongSnapshot {
    /// Agent paddle.
    pub left: Paddle,
    /// Bot paddle.
    pub right: Paddle,
    /// The ball.
    pub ball: Ball,
    /// Returns landed on the current curriculum rung.
    pub hits: u32,
    /// Total returns this episode.
    pub score: u32,
    /// Curriculum rung index.
    pub level: usize,
    /// Curriculum rung name.
    pub label: &'static str,
}

/// One paddle-game playthrough against the curriculum bot.
#[derive(Debug, Clone)]
pub struct PongEpisode {
    params: PongParams,
    left: Paddle,
    right: Paddle,
    ball: Ball,
    hits_this_level: u32,
    total_hits: u32,
    level: usize,
    steps: u32,
    terminal: bool,
    rng: SimRng,
}

impl PongEpisode {
    /// Creates an episode on the first curriculum rung.
    pub fn new(params: PongParams, mut rng: SimRng) -> Self {
        let paddle_y = params.height * 0.5 - params.paddle_height * 0.5;
        let ball = Ball::serve(&mut rng, &params, 1.0);
        Self {
            left: Paddle { x: 10.0, y: paddle_y },
            right: Paddle {
                x: params.width - 30.0,
                y: paddle_y,
            },
            ball,
            hits_this_level: 0,
            total_hits: 0,
            level: 0,
            steps: 0,
            terminal: false,
            rng,
            params,
        }
    }

    /// Convenience constructor from a bare seed.
    pub fn seeded(params: PongParams, seed: u64) -> Self {
        Self::new(params, SimRng::seeded(seed))
    }

    /// Current difficulty, derived from the curriculum rung.
    pub fn difficulty(&self) -> DifficultyState {
        difficulty::pong(self.level)
    }

    /// Agent paddle.
    pub fn left(&self) -> &Paddle {
        &self.left
    }

    /// Bot paddle.
    pub fn right(&self) -> &Paddle {
        &self.right
    }

    /// The ball.
    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    /// Curriculum rung index.
    pub fn level(&self) -> usize {
        self.level
    }

    /// Render snapshot for this tick.
    pub fn snapshot(&self) -> PongSnapshot {
        PongSnapshot {
            left: self.left.clone(),
            right: self.right.clone(),
            ball: self.ball.clone(),
            hits: self.hits_this_level,
            score: self.total_hits,
            level: self.level,
            label: self.difficulty().label,
        }
    }

    /// Bot paddle tracking: aims at the ball with a uniform error whose
    /// range shrinks with skill, and moves at a skill-scaled speed.
    fn advance_bot(&mut self, skill: f32) {
        let error = (1.0 - skill).abs() * BOT_ERROR_RANGE;
        let target = self.ball.y + self.rng.uniform(-error, error);
        let center = self.right.center_y(&self.params);
        if target > center {
            self.right.advance(false, skill, &self.params);
        } else if target < center {
            self.right.advance(true, skill, &self.params);
        }
    }

    /// Bounce off a paddle: flip the horizontal direction and set the
    /// vertical velocity from the hit offset (a center hit leaves the
    /// ball flat up to serve noise).
    fn bounce(&mut self, paddle_center: f32, leftward: bool) {
        self.ball.vx = if leftward {
            -self.ball.vx.abs()
        } else {
            self.ball.vx.abs()
        };
        let offset = paddle_center - self.ball.y;
        self.ball.vy = -(offset / (self.params.paddle_height * 0.5) * self.params.max_bounce_vel);
        self.ball.vy += self.rng.uniform(-1.0, 1.0);
    }
}

impl Episode for PongEpisode {
    type Control = PongControl;

    fn observation_len(&self) -> usize {
        5
    }

    fn action_len(&self) -> usize {
        2
    }

    fn observe(&self) -> Array1<f32> {
        Array1::from_vec(vec![
            self.left.y / self.params.height,
            self.ball.y / self.params.height,
            (self.ball.x - self.left.x).abs() / self.params.width,
            self.ball.vx / 10.0,
            self.ball.vy / 10.0,
        ])
    }

    fn decode_action(&self, output: &Array1<f32>) -> Result<PongControl, BoundaryError> {
        validate_action(output, self.action_len())?;
        Ok(if output[0] > output[1] {
            PongControl::Up
        } else {
            PongControl::Down
        })
    }

    fn tick(&mut self, control: PongControl) -> TickOutcome {
        if self.terminal {
            return TickOutcome::skipped();
        }
        self.steps += 1;
        let difficulty = difficulty::pong(self.level);
        let mut events = TickEvents::default();
        let mut score_delta = 0.0;

        self.left
            .advance(control == PongControl::Up, 1.0, &self.params);

        self.ball.advance();
        self.advance_bot(difficulty.bot_skill);

        if self.ball.y <= 0.0 {
            self.ball.vy = self.ball.vy.abs();
        } else if self.ball.y >= self.params.height {
            self.ball.vy = -self.ball.vy.abs();
        }

        let ball_extent = self.ball.extent(&self.params);
        if self.ball.vx < 0.0 {
            if collision::overlaps(&ball_extent, &self.left.extent(&self.params)) {
                let center = self.left.center_y(&self.params);
                self.bounce(center, false);
                self.hits_this_level += 1;
                self.total_hits += 1;
                events.hits = 1;
                score_delta = 1.0;
            }
        } else if collision::overlaps(&ball_extent, &self.right.extent(&self.params)) {
            let center = self.right.center_y(&self.params);
            self.bounce(center, true);
        }

        if self.ball.x < 0.0 {
            // The agent let the ball through.
            self.terminal = true;
            return TickOutcome {
                alive: false,
                score_delta,
                events,
            };
        }
        if self.ball.x > self.params.width {
            // The bot missed; re-serve and play on.
            self.ball = Ball::serve(&mut self.rng, &self.params, difficulty.bot_skill);
        }

        if self.hits_this_level >= difficulty::pong_hit_target(self.level) {
            events.level_up = true;
            self.hits_this_level = 0;
            self.level = (self.level + 1).min(difficulty::LEVELS.len() - 1);
            let skill = difficulty::pong(self.level).bot_skill;
            self.ball = Ball::serve(&mut self.rng, &self.params, skill);
        }

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
        self.total_hits as f32
    }

    fn steps(&self) -> u32 {
        self.steps
    }

    fn shaped_reward(&self, outcome: &TickOutcome, weights: &RewardWeights) -> f32 {
        let paddle_center = self.left.center_y(&self.params);
        let mut reward = if self.ball.vx < 0.0 {
            // Ball incoming: reward alignment with the ball.
            let gap = (paddle_center - self.ball.y).abs();
            (1.0 - gap / self.params.height).powi(2) * weights.alignment
        } else {
            // Ball receding: reward drifting back toward the field center.
            let gap = (paddle_center - self.params.height * 0.5).abs();
            (1.0 - gap / self.params.height).powi(2) * weights.recenter
        };
        reward += outcome.events.hits as f32 * weights.event;
        if outcome.events.level_up {
            reward += weights.level_bonus;
        }
        reward
    }
}
