//! Search configuration: the policy bundle and its tunables.
//!
//! Every pluggable behavior is a small closed enum rather than a trait
//! object; the search loop dispatches on the tag.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Regulariser applied to zero-visit denominators in the UCB1 formula.
pub const UCB_EPSILON: f64 = 1e-6;

/// Value function used to rank a decision's action edges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeValue {
    /// `W/(n+ε) + 2c·√(ln(n_parent + 1)/(n+ε))`. Unvisited edges get an
    /// effectively unbounded bonus, so every edge is tried before any is
    /// repeated.
    Ucb1 { c: f64 },

    /// Mean return only; used for final action extraction.
    Greedy,
}

/// Decides whether a descent should open a new action edge at a decision
/// node or reuse an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpansionGate {
    /// Expand whenever the state still has an untried action: every action
    /// is tried once before the node is descended through.
    Always,

    /// Single progressive widening: expand while `n = 0` or
    /// `n^alpha > |children|`. Keeps the fan-out sublinear in visits so
    /// continuous action spaces stay tractable.
    Spw { alpha: f64 },
}

/// Decides how an action edge turns into a next decision node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeRule {
    /// Sample the transition kernel every time; equal outcomes are
    /// memoised into the same child.
    Simple,

    /// Progressive outcome widening: sample fresh while `n = 0` or
    /// `n^beta > |children|`, otherwise revisit an existing child with
    /// probability proportional to its visit count.
    Widened { beta: f64 },
}

/// Default policy used during rollouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RolloutRule {
    /// `random_action` at every step.
    Uniform,

    /// The problem's `rollout_action` best-guess.
    Heuristic,
}

/// Errors produced by [`MctsConfig::validate`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("widening exponent must lie in (0, 1], got {0}")]
    InvalidExponent(f64),

    #[error("discount factor must lie in (0, 1], got {0}")]
    InvalidDiscount(f64),

    #[error("parallel_roots must be at least 1")]
    NoReplicas,
}

/// Configuration for one search tree (and all of its root replicas).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MctsConfig {
    /// UCB1 exploration constant `c`. Higher values favour exploration.
    pub exploration_c: f64,

    /// Action-expansion gate.
    pub expansion: ExpansionGate,

    /// Outcome-sampling rule.
    pub outcomes: OutcomeRule,

    /// Rollout policy.
    pub rollout: RolloutRule,

    /// Maximum number of simulated steps per rollout.
    pub rollout_depth: usize,

    /// Discount factor `gamma` in (0, 1].
    pub gamma: f64,

    /// Number of independent root replicas grown by `compute`. With 1 the
    /// search runs in place on the calling thread.
    pub parallel_roots: usize,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            exploration_c: std::f64::consts::FRAC_1_SQRT_2,
            expansion: ExpansionGate::Always,
            outcomes: OutcomeRule::Simple,
            rollout: RolloutRule::Uniform,
            rollout_depth: 1000,
            gamma: 0.9,
            parallel_roots: 1,
        }
    }
}

impl MctsConfig {
    /// Builder: set the UCB1 exploration constant.
    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration_c = c;
        self
    }

    /// Builder: gate action expansion by single progressive widening.
    pub fn with_spw(mut self, alpha: f64) -> Self {
        self.expansion = ExpansionGate::Spw { alpha };
        self
    }

    /// Builder: widen outcomes progressively instead of always resampling.
    pub fn with_widened_outcomes(mut self, beta: f64) -> Self {
        self.outcomes = OutcomeRule::Widened { beta };
        self
    }

    /// Builder: use the problem's heuristic rollout policy.
    pub fn with_heuristic_rollout(mut self) -> Self {
        self.rollout = RolloutRule::Heuristic;
        self
    }

    /// Builder: set the rollout depth cap.
    pub fn with_rollout_depth(mut self, depth: usize) -> Self {
        self.rollout_depth = depth;
        self
    }

    /// Builder: set the discount factor.
    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    /// Builder: set the number of independent root replicas.
    pub fn with_parallel_roots(mut self, roots: usize) -> Self {
        self.parallel_roots = roots;
        self
    }

    /// Check that every tunable is in range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let ExpansionGate::Spw { alpha } = self.expansion {
            if !(alpha > 0.0 && alpha <= 1.0) {
                return Err(ConfigError::InvalidExponent(alpha));
            }
        }
        if let OutcomeRule::Widened { beta } = self.outcomes {
            if !(beta > 0.0 && beta <= 1.0) {
                return Err(ConfigError::InvalidExponent(beta));
            }
        }
        if !(self.gamma > 0.0 && self.gamma <= 1.0) {
            return Err(ConfigError::InvalidDiscount(self.gamma));
        }
        if self.parallel_roots == 0 {
            return Err(ConfigError::NoReplicas);
        }
        Ok(())
    }
}
