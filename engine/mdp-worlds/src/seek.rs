//! 2-D continuous goal-seeking under heading control.
//!
//! The agent picks a heading in `[-π, π)` and advances a fixed step; the
//! executed heading carries uniform jitter. The episode absorbs inside a
//! radius around the goal, paying a bonus; every other step costs 1.

use std::f64::consts::PI;

use mdp_core::Mdp;
use rand::Rng;
use rand_chacha::ChaCha20Rng;

/// Squared-distance tolerance for treating two positions as the same
/// sampled outcome.
const STATE_EPSILON: f64 = 1e-6;

/// A planar position. Equality compares positions within the outcome
/// tolerance.
#[derive(Debug, Clone)]
pub struct SeekState {
    pub x: f64,
    pub y: f64,
}

impl PartialEq for SeekState {
    fn eq(&self, other: &Self) -> bool {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy < STATE_EPSILON
    }
}

/// The goal-seeking problem definition.
#[derive(Debug, Clone)]
pub struct SeekWorld {
    pub goal_x: f64,
    pub goal_y: f64,
    /// Distance advanced per step.
    pub step: f64,
    /// Half-width of the uniform heading jitter, in radians.
    pub heading_jitter: f64,
    /// Radius around the goal that absorbs.
    pub goal_radius: f64,
    /// Candidate headings the heuristic rollout samples per step.
    pub heuristic_samples: usize,
}

impl SeekWorld {
    pub fn new(goal_x: f64, goal_y: f64) -> Self {
        Self {
            goal_x,
            goal_y,
            step: 0.1,
            heading_jitter: 0.1,
            goal_radius: 0.1,
            heuristic_samples: 10,
        }
    }

    fn goal_distance_sq(&self, x: f64, y: f64) -> f64 {
        let dx = x - self.goal_x;
        let dy = y - self.goal_y;
        dx * dx + dy * dy
    }

    /// Advance one step along `heading` with no jitter.
    fn advance(&self, state: &SeekState, heading: f64) -> (f64, f64) {
        (
            state.x + self.step * heading.cos(),
            state.y + self.step * heading.sin(),
        )
    }
}

fn wrap_heading(mut heading: f64) -> f64 {
    if heading > PI {
        heading -= 2.0 * PI;
    }
    if heading < -PI {
        heading += 2.0 * PI;
    }
    heading
}

impl Mdp for SeekWorld {
    type State = SeekState;
    type Action = f64;

    fn initial_state(&self) -> SeekState {
        SeekState { x: 0.0, y: 0.0 }
    }

    fn terminal(&self, state: &SeekState) -> bool {
        self.goal_distance_sq(state.x, state.y) < self.goal_radius * self.goal_radius
    }

    fn has_untried_actions(&self, _state: &SeekState) -> bool {
        // The heading space is continuous; a fresh draw is always available.
        true
    }

    fn next_action(&self, _state: &mut SeekState, rng: &mut ChaCha20Rng) -> f64 {
        rng.gen_range(-PI..PI)
    }

    fn random_action(&self, _state: &SeekState, rng: &mut ChaCha20Rng) -> f64 {
        rng.gen_range(-PI..PI)
    }

    /// Best of a handful of sampled headings, judged on the jitter-free
    /// advance.
    fn rollout_action(&self, state: &SeekState, rng: &mut ChaCha20Rng) -> f64 {
        let mut best = 0.0;
        let mut best_distance = f64::INFINITY;
        for _ in 0..self.heuristic_samples {
            let heading = self.random_action(state, rng);
            let (x, y) = self.advance(state, heading);
            let distance = self.goal_distance_sq(x, y);
            if distance < best_distance {
                best_distance = distance;
                best = heading;
            }
        }
        best
    }

    fn transition(&self, state: &SeekState, action: &f64, rng: &mut ChaCha20Rng) -> SeekState {
        let jitter = rng.gen_range(-self.heading_jitter..self.heading_jitter);
        let heading = wrap_heading(action + jitter);
        let (x, y) = self.advance(state, heading);
        SeekState { x, y }
    }

    fn reward(&self, _from: &SeekState, _action: &f64, to: &SeekState) -> f64 {
        if self.terminal(to) {
            10.0
        } else {
            -1.0
        }
    }
}
