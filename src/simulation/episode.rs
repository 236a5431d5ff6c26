//! Episode protocol shared by the three simulations.
//!
//! An episode is one self-contained playthrough from agent spawn to a
//! terminal state, advanced exactly one fixed-timestep tick per call.
//! Failure is never a fault: collisions, out-of-bounds exits, and step
//! budget exhaustion all express themselves as the terminal transition.
//! The only errors this module defines are contract violations by the
//! external decision function, which fail fast at the boundary instead of
//! being silently clamped.

use ndarray::Array1;
use thiserror::Error;

use super::population::RewardWeights;

/// Contract violations by the external decision function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BoundaryError {
    /// The decision output does not match the game's action arity.
    #[error("decision output arity mismatch: expected {expected}, got {got}")]
    ActionArity {
        /// Arity the game expects.
        expected: usize,
        /// Arity the decision function produced.
        got: usize,
    },
    /// The decision output contains NaN or an infinity.
    #[error("non-finite decision output at index {index}")]
    NonFiniteAction {
        /// Index of the offending value.
        index: usize,
    },
}

/// Validates arity and finiteness of a raw decision output.
pub fn validate_action(output: &Array1<f32>, expected: usize) -> Result<(), BoundaryError> {
    if output.len() != expected {
        return Err(BoundaryError::ActionArity {
            expected,
            got: output.len(),
        });
    }
    if let Some(index) = output.iter().position(|v| !v.is_finite()) {
        return Err(BoundaryError::NonFiniteAction { index });
    }
    Ok(())
}

/// Events raised by a single tick, consumed by reward shaping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickEvents {
    /// Obstacles that fell behind the agent this tick.
    pub passed: u32,
    /// Successful paddle returns this tick.
    pub hits: u32,
    /// The curriculum level advanced this tick.
    pub level_up: bool,
    /// A lethal collision ended the episode this tick.
    pub collided: bool,
    /// The step budget ran out this tick.
    pub timed_out: bool,
}

/// Result of advancing an episode by one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutcome {
    /// False once the episode is terminal.
    pub alive: bool,
    /// Score gained this tick. Never negative.
    pub score_delta: f32,
    /// What happened this tick.
    pub events: TickEvents,
}

impl TickOutcome {
    /// Outcome returned when ticking an already-terminal episode.
    pub(crate) fn skipped() -> Self {
        Self {
            alive: false,
            score_delta: 0.0,
            events: TickEvents::default(),
        }
    }
}

/// One self-contained playthrough stepped at a fixed timestep.
///
/// Ticking an already-terminal episode is a no-op that keeps reporting
/// `alive: false`.
pub trait Episode {
    /// Per-tick control decoded from a decision function or human intents.
    type Control;

    /// Length of the observation vector.
    fn observation_len(&self) -> usize;

    /// Number of floats expected from the decision function.
    fn action_len(&self) -> usize;

    /// Builds the normalized observation from this episode's own state.
    fn observe(&self) -> Array1<f32>;

    /// Validates a raw decision output and decodes it into a control
    /// value, applying the game's interpretation policy.
    fn decode_action(&self, output: &Array1<f32>) -> Result<Self::Control, BoundaryError>;

    /// Advances exactly one tick under the given control.
    fn tick(&mut self, control: Self::Control) -> TickOutcome;

    /// True once the episode reached its terminal state.
    fn terminal(&self) -> bool;

    /// Cumulative score. Non-decreasing while the episode runs.
    fn score(&self) -> f32;

    /// Ticks advanced so far.
    fn steps(&self) -> u32;

    /// Shaping reward for one tick outcome, read against the post-tick
    /// episode state.
    fn shaped_reward(&self, outcome: &TickOutcome, weights: &RewardWeights) -> f32;
}

/// Edge-triggered intent flags from a human-input collaborator.
///
/// The input layer sets flags as keys go down; the game loop consumes
/// them once per tick via [`IntentLatch::take`], which clears the latch.
/// Holding a key therefore requires re-setting the flag every frame,
/// matching the per-tick control contract of the episodes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntentLatch {
    /// Jump / flap requested.
    pub jump: bool,
    /// Duck requested.
    pub duck: bool,
    /// Move up requested.
    pub up: bool,
    /// Move down requested.
    pub down: bool,
}

impl IntentLatch {
    /// Consumes the latched intents, clearing the latch.
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }
}
