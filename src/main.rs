//! Headless demo driver: runs a population of random linear policies
//! through each game and logs the resulting fitness reports. Stands in
//! for the external neuro-evolution collaborator, which would supply real
//! decision functions through the same boundary.

use ndarray::{Array1, Array2};
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::Uniform;
use tracing::{error, info};

use neat_arcade::simulation::dino::{DinoEpisode, DinoParams};
use neat_arcade::simulation::episode::{Episode, IntentLatch};
use neat_arcade::simulation::flappy::{FlappyControl, FlappyEpisode, FlappyParams};
use neat_arcade::simulation::pong::{PongEpisode, PongParams};
use neat_arcade::simulation::population::{EpisodeReport, PopulationDriver, RewardWeights};
use neat_arcade::simulation::rng::SimRng;

type Policy = Box<dyn FnMut(&Array1<f32>) -> Array1<f32>>;

const POPULATION: usize = 50;
const BASE_SEED: u64 = 42;

/// A random single-layer controller squashed through a sigmoid, so its
/// outputs land in the (0, 1) range the threshold policies expect.
fn random_policy(inputs: usize, outputs: usize) -> Policy {
    let weights = Array2::random((outputs, inputs), Uniform::new(-1.0, 1.0));
    let biases = Array1::random(outputs, Uniform::new(-1.0, 1.0));
    Box::new(move |observation: &Array1<f32>| {
        let mut out = weights.dot(observation);
        out += &biases;
        out.mapv_inplace(|v| 1.0 / (1.0 + (-v).exp()));
        out
    })
}

fn summarize(game: &str, reports: &[EpisodeReport]) {
    let best = reports
        .iter()
        .max_by(|a, b| a.fitness.total_cmp(&b.fitness));
    if let Some(best) = best {
        info!(
            game,
            candidates = reports.len(),
            best_fitness = best.fitness,
            best_score = best.score,
            best_steps = best.steps,
            "generation complete"
        );
    }
}

fn run_flappy() {
    let mut driver = PopulationDriver::new(RewardWeights::default());
    for index in 0..POPULATION {
        let episode = FlappyEpisode::new(FlappyParams::default(), SimRng::derive(BASE_SEED, index));
        let policy = random_policy(episode.observation_len(), episode.action_len());
        driver.push(episode, policy);
    }
    match driver.run_until_done(|| false) {
        Ok(reports) => summarize("flappy", reports),
        Err(err) => error!(game = "flappy", %err, "decision boundary violation"),
    }
}

fn run_dino() {
    let mut driver = PopulationDriver::new(RewardWeights::default());
    for index in 0..POPULATION {
        let episode = DinoEpisode::new(DinoParams::default(), SimRng::derive(BASE_SEED, index));
        let policy = random_policy(episode.observation_len(), episode.action_len());
        driver.push(episode, policy);
    }
    match driver.run_until_done(|| false) {
        Ok(reports) => summarize("dino", reports),
        Err(err) => error!(game = "dino", %err, "decision boundary violation"),
    }
}

fn run_pong() {
    let mut driver = PopulationDriver::new(RewardWeights::default());
    for index in 0..POPULATION {
        let episode = PongEpisode::new(PongParams::default(), SimRng::derive(BASE_SEED, index));
        let policy = random_policy(episode.observation_len(), episode.action_len());
        driver.push(episode, policy);
    }
    match driver.run_until_done(|| false) {
        Ok(reports) => summarize("pong", reports),
        Err(err) => error!(game = "pong", %err, "decision boundary violation"),
    }
}

/// A short human-style session driven through the intent latch instead of
/// a decision function: flap on a fixed cadence and dump the final
/// snapshot for whatever renderer wants it.
fn run_scripted_flappy() {
    let mut latch = IntentLatch::default();
    let mut episode = FlappyEpisode::seeded(FlappyParams::default(), BASE_SEED);
    let mut ticks = 0u32;
    while !episode.terminal() && ticks < 600 {
        if ticks % 15 == 0 {
            latch.jump = true;
        }
        let control = FlappyControl::from(latch.take());
        let _ = episode.tick(control);
        ticks += 1;
    }
    info!(
        game = "flappy-scripted",
        ticks,
        score = episode.snapshot().score,
        "scripted session over"
    );
    if let Ok(json) = serde_json::to_string(&episode.snapshot()) {
        println!("{json}");
    }
}

fn main() {
    tracing_subscriber::fmt::init();

    run_flappy();
    run_dino();
    run_pong();
    run_scripted_flappy();
}
