//! Reference problem implementations for the MCTS engine
//!
//! Three small worlds implementing the `mdp-core` `Mdp` trait, used by the
//! engine's integration tests and benches:
//!
//! - [`GridWorld`]: discrete N×N navigation with an optional slip
//!   probability and a goal corner
//! - [`TrapWorld`]: a two-step 1-D continuous benchmark with a low-reward
//!   safe region and a higher reward past a zero-reward trap
//! - [`SeekWorld`]: 2-D continuous goal-seeking under heading control with
//!   execution noise
//!
//! None of these are part of the engine core; they exist so the search has
//! something real to chew on.

pub mod grid;
pub mod seek;
pub mod trap;

pub use grid::{GridAction, GridState, GridWorld};
pub use seek::{SeekState, SeekWorld};
pub use trap::{TrapState, TrapWorld};
