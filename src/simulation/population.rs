//! Population driver and fitness accumulation.
//!
//! Owns one (episode, decision function, fitness) triple per live
//! candidate and advances all of them exactly one tick per call. Each
//! candidate only ever observes its own episode. Terminal candidates are
//! retired with a reverse-indexed `swap_remove`, so every survivor is
//! processed exactly once per tick no matter how many die mid-pass.

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::episode::{BoundaryError, Episode};

/// Additive reward-shaping weights. The defaults are the empirically
/// tuned values the games were trained with; none of them carries deeper
/// meaning than "shaped behavior well".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardWeights {
    /// Per-tick survival reward (flappy, dino).
    pub survival: f32,
    /// Alignment reward while the ball approaches (paddle game).
    pub alignment: f32,
    /// Recentering reward while the ball recedes (paddle game).
    pub recenter: f32,
    /// Discrete reward per scoring event (pipe passed, paddle hit).
    pub event: f32,
    /// Penalty applied on a lethal collision.
    pub collision_penalty: f32,
    /// Lump bonus on a curriculum level-up (paddle game).
    pub level_bonus: f32,
}

impl Default for RewardWeights {
    fn default() -> Self {
        Self {
            survival: 0.1,
            alignment: 0.1,
            recenter: 0.05,
            event: 5.0,
            collision_penalty: 1.0,
            level_bonus: 50.0,
        }
    }
}

/// Scalar fitness assembled over one episode's lifetime. The evolutionary
/// collaborator reads it only after the owning episode terminates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FitnessAccumulator {
    total: f32,
}

impl FitnessAccumulator {
    /// Adds one tick's shaped reward.
    pub fn add(&mut self, reward: f32) {
        self.total += reward;
    }

    /// Accumulated fitness.
    pub fn total(&self) -> f32 {
        self.total
    }
}

/// Final record for a completed episode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EpisodeReport {
    /// Candidate id assigned at push time.
    pub candidate: usize,
    /// Accumulated fitness.
    pub fitness: f32,
    /// Final game score.
    pub score: f32,
    /// Ticks the episode lasted.
    pub steps: u32,
}

struct Candidate<E, F> {
    id: usize,
    episode: E,
    policy: F,
    fitness: FitnessAccumulator,
}

/// Drives a shrinking population of candidate controllers, one episode
/// each, in lockstep ticks.
pub struct PopulationDriver<E, F>
where
    E: Episode,
    F: FnMut(&Array1<f32>) -> Array1<f32>,
{
    candidates: Vec<Candidate<E, F>>,
    weights: RewardWeights,
    completed: Vec<EpisodeReport>,
    next_id: usize,
}

impl<E, F> PopulationDriver<E, F>
where
    E: Episode,
    F: FnMut(&Array1<f32>) -> Array1<f32>,
{
    /// Creates an empty driver with the given shaping weights.
    pub fn new(weights: RewardWeights) -> Self {
        Self {
            candidates: Vec::new(),
            weights,
            completed: Vec::new(),
            next_id: 0,
        }
    }

    /// Adds a candidate and returns its id.
    pub fn push(&mut self, episode: E, policy: F) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        self.candidates.push(Candidate {
            id,
            episode,
            policy,
            fitness: FitnessAccumulator::default(),
        });
        id
    }

    /// Live candidate count.
    pub fn live(&self) -> usize {
        self.candidates.len()
    }

    /// True once every candidate's episode has terminated.
    pub fn is_done(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Reports for completed episodes, in retirement order.
    pub fn reports(&self) -> &[EpisodeReport] {
        &self.completed
    }

    /// Advances every live candidate exactly one tick and retires the
    /// ones whose episodes terminated. Returns the live count afterward.
    ///
    /// A decision-function contract violation aborts the pass
    /// immediately; candidates later in the pass are left un-ticked.
    pub fn tick(&mut self) -> Result<usize, BoundaryError> {
        for index in (0..self.candidates.len()).rev() {
            let candidate = &mut self.candidates[index];
            let observation = candidate.episode.observe();
            let output = (candidate.policy)(&observation);
            let control = candidate.episode.decode_action(&output)?;
            let outcome = candidate.episode.tick(control);
            let reward = candidate.episode.shaped_reward(&outcome, &self.weights);
            candidate.fitness.add(reward);

            if !outcome.alive {
                let report = EpisodeReport {
                    candidate: candidate.id,
                    fitness: candidate.fitness.total(),
                    score: candidate.episode.score(),
                    steps: candidate.episode.steps(),
                };
                debug!(
                    candidate = report.candidate,
                    steps = report.steps,
                    fitness = report.fitness,
                    "episode terminal"
                );
                self.completed.push(report);
                // Reverse iteration makes this safe: the element swapped
                // in from the tail was already processed this tick.
                self.candidates.swap_remove(index);
            }
        }
        Ok(self.candidates.len())
    }

    /// Ticks until every episode terminates or `stop` returns true. The
    /// stop signal is checked once per tick boundary, never mid-tick.
    pub fn run_until_done(
        &mut self,
        mut stop: impl FnMut() -> bool,
    ) -> Result<&[EpisodeReport], BoundaryError> {
        while !self.candidates.is_empty() {
            if stop() {
                info!(live = self.candidates.len(), "stopped before completion");
                break;
            }
            self.tick()?;
        }
        Ok(&self.completed)
    }
}
