//! Monte-Carlo Tree Search (MCTS) over generic Markov Decision Processes.
//!
//! This crate grows an asymmetric search tree for any problem implementing
//! the `mdp-core` [`Mdp`](mdp_core::Mdp) trait and answers "which action
//! should be taken from the root state".
//!
//! # Overview
//!
//! Each [`Mcts::iterate`] pass runs four phases:
//!
//! 1. **Selection**: descend the tree, balancing exploration and
//!    exploitation with UCB1
//! 2. **Expansion**: open a new action edge when the expansion gate allows
//!    it (always, or by single progressive widening)
//! 3. **Rollout**: simulate from the frontier under the default policy and
//!    collect a discounted return
//! 4. **Back-propagation**: update visit counts and accumulated returns
//!    along the visited path
//!
//! The tree alternates decision nodes (states) and action nodes (tried
//! actions); sampled outcomes below an action are memoised by state
//! equality, which is what lets stochastic and continuous problems share
//! structure. Progressive widening keeps both fan-outs sublinear in visit
//! counts so continuous action/outcome spaces stay tractable.
//!
//! # Usage
//!
//! ```rust,ignore
//! use mcts::{Mcts, MctsConfig};
//! use mdp_worlds::GridWorld;
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha20Rng;
//!
//! let world = GridWorld::new(5, 0.0);
//! let config = MctsConfig::default()
//!     .with_rollout_depth(10_000)
//!     .with_heuristic_rollout();
//!
//! let mut search = Mcts::from_initial(&world, config).unwrap();
//! let mut rng = ChaCha20Rng::seed_from_u64(42);
//! search.compute(10_000, &mut rng);
//!
//! let best = search.best_action().unwrap();
//! println!("best action: {:?} (mean return {})", best.action, best.mean());
//! ```
//!
//! # Configuration
//!
//! [`MctsConfig`] selects the policy bundle and its tunables: the UCB1
//! exploration constant, the expansion gate (always / SPW `alpha`), the
//! outcome rule (simple / widened `beta`), the rollout policy and depth,
//! the discount factor, and the number of parallel root replicas.
//!
//! # Parallelism
//!
//! Parallelism happens only at the root: [`Mcts::compute`] can grow
//! independent replica trees on a rayon pool and fold their root statistics
//! back together. There is no locking inside a tree; workers share nothing
//! mutable.

pub mod config;
pub mod node;
pub mod root;
pub mod search;
pub mod tree;

// Re-export main types
pub use config::{
    ConfigError, ExpansionGate, MctsConfig, OutcomeRule, RolloutRule, TreeValue, UCB_EPSILON,
};
pub use node::{ActionId, ActionNode, DecisionId, DecisionNode};
pub use search::Mcts;
pub use tree::{SearchTree, TreeStats};

/// Tiny problems for unit tests (internal use only)
#[cfg(test)]
pub(crate) mod test_support;
