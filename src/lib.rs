//! # Neat Arcade - Arcade Simulation Core for Neuro-Evolution
//!
//! Headless, fixed-timestep simulations of three arcade games (a flappy
//! bird, a dino runner, and a paddle game), each playable tick-by-tick by a
//! human input source or by a whole population of neural controllers at once.
//! The evolutionary algorithm itself stays outside the crate: it supplies a
//! decision function `observation -> action` per candidate and reads back a
//! fitness scalar once the candidate's episode terminates.
//!
//! ## Features
//!
//! - Deterministic physics and spawning given a fixed seed
//! - Difficulty ramps that never ease off within an episode
//! - Mask-based collision detection (bounding box for the paddle game)
//! - Population-batched stepping with safe mid-tick retirement
//! - Configurable reward-shaping weights
//! - Read-only per-tick snapshots for an external renderer
//!
//! ## Core Modules
//!
//! - [`simulation::flappy`] - Flappy bird physics, pipes, and episode
//! - [`simulation::dino`] - Dino runner physics, obstacle waves, and episode
//! - [`simulation::pong`] - Paddle game, adversarial bot, and curriculum
//! - [`simulation::population`] - Batched driver and fitness accumulation
//! - [`simulation::collision`] - Overlap oracle for agent/obstacle extents
//! - [`simulation::difficulty`] - Progress-derived simulation parameters

/// Core simulation logic and data structures.
pub mod simulation {
    /// Overlap oracle for agent and obstacle extents.
    pub mod collision;
    /// Difficulty ramps and the paddle-game curriculum.
    pub mod difficulty;
    /// Dino runner simulation.
    pub mod dino;
    /// Episode protocol shared by all three simulations.
    pub mod episode;
    /// Flappy bird simulation.
    pub mod flappy;
    /// Paddle game simulation.
    pub mod pong;
    /// Population driver and fitness accumulation.
    pub mod population;
    /// Seedable randomness source.
    pub mod rng;
    /// Obstacle archetypes and the difficulty-gated spawner.
    pub mod spawn;
}
