//! Two-step 1-D continuous trap benchmark.
//!
//! The agent displaces a point along the line twice. Landing short of the
//! threshold pays a modest reward, landing inside the trap band pays
//! nothing, and clearing the band pays the jackpot. Displacements are
//! drawn uniformly from `[0, 1)`, so the jackpot is only reachable on the
//! second step and only from the far end of the safe region.

use mdp_core::Mdp;
use rand::Rng;
use rand_chacha::ChaCha20Rng;

/// Squared-difference tolerance for treating two positions as the same
/// sampled outcome.
const STATE_EPSILON: f64 = 1e-6;

/// A position on the line and how many steps have been taken.
/// Equality compares the position only, within the outcome tolerance.
#[derive(Debug, Clone)]
pub struct TrapState {
    pub x: f64,
    pub time: u32,
}

impl PartialEq for TrapState {
    fn eq(&self, other: &Self) -> bool {
        let dx = self.x - other.x;
        dx * dx < STATE_EPSILON
    }
}

/// The trap problem definition.
#[derive(Debug, Clone)]
pub struct TrapWorld {
    /// Reward for `x` short of the threshold.
    pub low_reward: f64,
    /// Reward for `x` past the trap band.
    pub high_reward: f64,
    /// Left edge of the trap band.
    pub threshold: f64,
    /// Width of the trap band.
    pub gap: f64,
    /// Scale of the additive execution noise.
    pub noise: f64,
    /// Number of steps before the episode absorbs.
    pub horizon: u32,
}

impl Default for TrapWorld {
    fn default() -> Self {
        Self {
            low_reward: 70.0,
            high_reward: 100.0,
            threshold: 1.0,
            gap: 0.7,
            noise: 0.01,
            horizon: 2,
        }
    }
}

impl Mdp for TrapWorld {
    type State = TrapState;
    type Action = f64;

    fn initial_state(&self) -> TrapState {
        TrapState { x: 0.0, time: 0 }
    }

    fn terminal(&self, state: &TrapState) -> bool {
        state.time >= self.horizon
    }

    fn has_untried_actions(&self, _state: &TrapState) -> bool {
        // The action space is continuous; a fresh draw is always available.
        true
    }

    fn next_action(&self, _state: &mut TrapState, rng: &mut ChaCha20Rng) -> f64 {
        rng.gen::<f64>()
    }

    fn random_action(&self, _state: &TrapState, rng: &mut ChaCha20Rng) -> f64 {
        rng.gen::<f64>()
    }

    fn transition(&self, state: &TrapState, action: &f64, rng: &mut ChaCha20Rng) -> TrapState {
        TrapState {
            x: state.x + action + self.noise * rng.gen::<f64>(),
            time: state.time + 1,
        }
    }

    fn reward(&self, _from: &TrapState, _action: &f64, to: &TrapState) -> f64 {
        if to.x < self.threshold {
            self.low_reward
        } else if to.x < self.threshold + self.gap {
            0.0
        } else {
            self.high_reward
        }
    }
}
