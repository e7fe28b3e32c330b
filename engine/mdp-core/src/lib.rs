//! Core problem contract for the MCTS planning engine
//!
//! This crate defines the single abstraction a host problem must satisfy:
//! - `Mdp`: typed trait describing a Markov Decision Process: states,
//!   actions, a stochastic transition kernel, stage rewards, termination,
//!   and the action-enumeration hooks the search tree expands through.
//!
//! The engine never inspects states or actions beyond these operations;
//! equality of both is whatever `PartialEq` the problem supplies, which is
//! how continuous problems plug in epsilon comparisons.

pub mod problem;

// Re-export the main trait for convenience
pub use problem::Mdp;
