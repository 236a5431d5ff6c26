#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use ndarray::Array1;
use neat_arcade::simulation::episode::{BoundaryError, Episode};
use neat_arcade::simulation::flappy::{FlappyControl, FlappyEpisode, FlappyParams};

fn coast() -> FlappyControl {
    FlappyControl { flap: false }
}

fn flap() -> FlappyControl {
    FlappyControl { flap: true }
}

#[test]
fn free_fall_matches_capped_quadratic_profile() {
    let params = FlappyParams::default();
    let start_y = params.bird_start_y;
    let mut episode = FlappyEpisode::seeded(params, 1);

    // With no flap the impulse velocity stays zero, so the displacement at
    // tick t is 1.5 * t^2 capped at 16 units per tick.
    let mut expected_y = start_y;
    for t in 1..=10u32 {
        let outcome = episode.tick(coast());
        assert!(outcome.alive, "bird should stay airborne for 10 ticks");
        let t = t as f32;
        let displacement = (1.5 * t * t).min(16.0);
        expected_y += displacement;
        assert_eq!(episode.bird().y, expected_y, "tick {t}");
    }
}

#[test]
fn falling_out_of_the_field_is_terminal_but_not_a_collision() {
    let mut episode = FlappyEpisode::seeded(FlappyParams::default(), 2);

    let mut last = None;
    for _ in 0..60 {
        let outcome = episode.tick(coast());
        last = Some(outcome);
        if !outcome.alive {
            break;
        }
    }
    let last = last.expect("episode must have ticked");
    assert!(!last.alive);
    assert!(episode.terminal());
    assert!(!last.events.collided, "ground exit is not a collision");
    assert!(!last.events.timed_out);
}

#[test]
fn flying_over_the_top_is_terminal() {
    let mut episode = FlappyEpisode::seeded(FlappyParams::default(), 3);

    let mut alive = true;
    for _ in 0..200 {
        alive = episode.tick(flap()).alive;
        if !alive {
            break;
        }
    }
    assert!(!alive);
    assert!(episode.terminal());
}

/// Steers with the textbook heuristic (flap whenever the bird sits below
/// the gap center of the pipe it is approaching) and returns the number
/// of pipes passed, asserting the scoring invariants along the way.
fn run_gap_chaser(seed: u64, tick_budget: u32) -> u32 {
    let params = FlappyParams::default();
    let pipe_width = params.pipe_width;
    let mut episode = FlappyEpisode::seeded(params, seed);

    let mut total_passes = 0u32;
    let mut previous_score = 0.0;
    for _ in 0..tick_budget {
        let flap_now = {
            let pipes = episode.pipes();
            let bird = episode.bird();
            let target = if pipes.len() > 1 && bird.x > pipes[0].x + pipe_width {
                &pipes[1]
            } else {
                &pipes[0]
            };
            bird.y > target.gap_center()
        };
        let outcome = episode.tick(FlappyControl { flap: flap_now });
        assert!(outcome.score_delta >= 0.0);
        assert!(episode.score() >= previous_score, "score must never drop");
        previous_score = episode.score();
        total_passes += outcome.events.passed;
        assert!(
            episode.pipes().len() <= 3,
            "one spawn per pass keeps the field sparse"
        );
        if total_passes >= 3 || !outcome.alive {
            break;
        }
    }
    assert_eq!(episode.score(), total_passes as f32);
    total_passes
}

#[test]
fn passing_pipes_scores_and_spawns_replacements() {
    // The heuristic is not a trained controller, so a given seed may draw
    // an unlucky gap sequence; across a handful of seeds it reliably
    // clears several pipes, and every run must uphold the scoring
    // invariants regardless.
    let best = (0..10).map(|seed| run_gap_chaser(seed, 3000)).max();
    assert!(best.unwrap_or(0) >= 3, "no seed cleared three pipes");
}

#[test]
fn identical_seeds_and_controls_replay_identically() {
    let run = || {
        let mut episode = FlappyEpisode::seeded(FlappyParams::default(), 99);
        let mut trace = Vec::new();
        for tick in 0..2000 {
            let control = FlappyControl { flap: tick % 10 == 0 };
            let outcome = episode.tick(control);
            trace.push((
                episode.bird().y.to_bits(),
                episode.score().to_bits(),
                outcome.alive,
            ));
            if !outcome.alive {
                break;
            }
        }
        trace
    };
    assert_eq!(run(), run());
}

#[test]
fn decision_boundary_rejects_bad_outputs() {
    let episode = FlappyEpisode::seeded(FlappyParams::default(), 5);

    let wrong_arity = Array1::from_vec(vec![0.3, 0.7]);
    assert_eq!(
        episode.decode_action(&wrong_arity),
        Err(BoundaryError::ActionArity {
            expected: 1,
            got: 2
        })
    );

    let non_finite = Array1::from_vec(vec![f32::NAN]);
    assert_eq!(
        episode.decode_action(&non_finite),
        Err(BoundaryError::NonFiniteAction { index: 0 })
    );

    let fine = Array1::from_vec(vec![0.9]);
    assert_eq!(
        episode.decode_action(&fine),
        Ok(FlappyControl { flap: true })
    );
}

#[test]
fn ticking_a_terminal_episode_is_a_no_op() {
    let mut episode = FlappyEpisode::seeded(FlappyParams::default(), 6);
    while episode.tick(coast()).alive {}
    let y = episode.bird().y;
    let steps = episode.steps();

    let outcome = episode.tick(flap());
    assert!(!outcome.alive);
    assert_eq!(outcome.score_delta, 0.0);
    assert_eq!(episode.bird().y, y, "terminal state must not advance");
    assert_eq!(episode.steps(), steps);
}
