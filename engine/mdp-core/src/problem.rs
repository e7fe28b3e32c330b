//! The `Mdp` trait: what a host problem must provide to be searchable.
//!
//! The planner grows a tree of state snapshots and tried actions, so the
//! contract is built around an *enumeration protocol*: a state snapshot
//! remembers which actions have already been handed out (`next_action`
//! records its pick in the snapshot), and `has_untried_actions` reports
//! whether another one is available. Continuous action spaces simply never
//! exhaust.

use rand_chacha::ChaCha20Rng;

/// A Markov Decision Process the planner can search.
///
/// Implementations must be cheap to share across worker threads: the planner
/// holds one `&Mdp` per search and hands it unchanged to every root replica.
/// All stochastic operations draw from an explicit generator so that a
/// single-tree search is reproducible given its seed.
///
/// # Example
///
/// ```rust
/// use mdp_core::Mdp;
/// use rand::Rng;
/// use rand_chacha::ChaCha20Rng;
///
/// /// Walk right along a line of cells; the last cell absorbs.
/// #[derive(Debug)]
/// struct Line {
///     len: u32,
/// }
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct Cell {
///     pos: u32,
///     tried: Vec<bool>, // [left, right]
/// }
///
/// impl Mdp for Line {
///     type State = Cell;
///     type Action = bool; // true = right
///
///     fn initial_state(&self) -> Cell {
///         Cell { pos: 0, tried: vec![false, false] }
///     }
///
///     fn terminal(&self, s: &Cell) -> bool {
///         s.pos + 1 >= self.len
///     }
///
///     fn has_untried_actions(&self, s: &Cell) -> bool {
///         s.tried.iter().any(|t| !t)
///     }
///
///     fn next_action(&self, s: &mut Cell, rng: &mut ChaCha20Rng) -> bool {
///         loop {
///             let right = rng.gen::<bool>();
///             let slot = right as usize;
///             if !s.tried[slot] {
///                 s.tried[slot] = true;
///                 return right;
///             }
///         }
///     }
///
///     fn random_action(&self, _s: &Cell, rng: &mut ChaCha20Rng) -> bool {
///         rng.gen::<bool>()
///     }
///
///     fn transition(&self, s: &Cell, a: &bool, _rng: &mut ChaCha20Rng) -> Cell {
///         let pos = if *a { s.pos + 1 } else { s.pos.saturating_sub(1) };
///         Cell { pos, tried: vec![false, false] }
///     }
///
///     fn reward(&self, _from: &Cell, _a: &bool, to: &Cell) -> f64 {
///         if self.terminal(to) {
///             1.0
///         } else {
///             0.0
///         }
///     }
/// }
///
/// let line = Line { len: 4 };
/// let s = line.initial_state();
/// assert!(!line.terminal(&s));
/// ```
pub trait Mdp: Send + Sync {
    /// State snapshot stored at each decision node. Equality (`PartialEq`)
    /// is the problem's notion of "same outcome" and drives child
    /// deduplication; continuous problems typically compare within an
    /// epsilon.
    type State: Clone + PartialEq + Send + Sync;

    /// Action payload stored at each action edge; equality deduplicates
    /// sibling edges.
    type Action: Clone + PartialEq + Send + Sync;

    /// Produce the initial state. Searches may also be constructed from a
    /// caller-supplied state directly.
    fn initial_state(&self) -> Self::State;

    /// Absorbing/goal test.
    fn terminal(&self, state: &Self::State) -> bool;

    /// Whether this snapshot can still hand out an action it has not handed
    /// out before. Must be `false` once every valid action has been
    /// returned by `next_action`.
    fn has_untried_actions(&self, state: &Self::State) -> bool;

    /// Produce one not-yet-tried action and record it in the snapshot.
    ///
    /// Only called when `has_untried_actions` is true. May be stochastic;
    /// under repeated calls it must return every valid action at most once
    /// until the snapshot is exhausted.
    fn next_action(&self, state: &mut Self::State, rng: &mut ChaCha20Rng) -> Self::Action;

    /// A uniformly random valid action, used by the default rollout policy.
    fn random_action(&self, state: &Self::State, rng: &mut ChaCha20Rng) -> Self::Action;

    /// The action the rollout policy plays from `state`. Defaults to the
    /// uniform policy; problems with a cheap heuristic override this.
    fn rollout_action(&self, state: &Self::State, rng: &mut ChaCha20Rng) -> Self::Action {
        self.random_action(state, rng)
    }

    /// Sample a successor state under the transition kernel. May be
    /// stochastic; the planner memoises equal outcomes.
    fn transition(
        &self,
        state: &Self::State,
        action: &Self::Action,
        rng: &mut ChaCha20Rng,
    ) -> Self::State;

    /// Stage reward for the step `(from, action, to)`.
    fn reward(&self, from: &Self::State, action: &Self::Action, to: &Self::State) -> f64;

    /// Prior value a freshly created action edge starts from. Stands in for
    /// the edge's mean until its first visit.
    fn initial_value(&self, _state: &Self::State) -> f64 {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};

    /// Two-armed bandit: one pull, arm 1 pays 1.0.
    #[derive(Debug)]
    struct Bandit;

    #[derive(Debug, Clone, PartialEq)]
    struct BanditState {
        pulled: Option<u8>,
        tried: [bool; 2],
    }

    impl Mdp for Bandit {
        type State = BanditState;
        type Action = u8;

        fn initial_state(&self) -> BanditState {
            BanditState { pulled: None, tried: [false; 2] }
        }

        fn terminal(&self, s: &BanditState) -> bool {
            s.pulled.is_some()
        }

        fn has_untried_actions(&self, s: &BanditState) -> bool {
            s.tried.iter().any(|t| !t)
        }

        fn next_action(&self, s: &mut BanditState, rng: &mut ChaCha20Rng) -> u8 {
            loop {
                let arm = rng.gen_range(0..2u8);
                if !s.tried[arm as usize] {
                    s.tried[arm as usize] = true;
                    return arm;
                }
            }
        }

        fn random_action(&self, _s: &BanditState, rng: &mut ChaCha20Rng) -> u8 {
            rng.gen_range(0..2u8)
        }

        fn transition(
            &self,
            _s: &BanditState,
            a: &u8,
            _rng: &mut ChaCha20Rng,
        ) -> BanditState {
            BanditState { pulled: Some(*a), tried: [false; 2] }
        }

        fn reward(&self, _from: &BanditState, a: &u8, _to: &BanditState) -> f64 {
            if *a == 1 {
                1.0
            } else {
                0.0
            }
        }
    }

    #[test]
    fn enumeration_exhausts_each_action_once() {
        let problem = Bandit;
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let mut state = problem.initial_state();

        assert!(problem.has_untried_actions(&state));
        let first = problem.next_action(&mut state, &mut rng);
        assert!(problem.has_untried_actions(&state));
        let second = problem.next_action(&mut state, &mut rng);
        assert!(!problem.has_untried_actions(&state));

        let mut arms = [first, second];
        arms.sort_unstable();
        assert_eq!(arms, [0, 1]);
    }

    #[test]
    fn default_rollout_action_is_uniform() {
        let problem = Bandit;
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let state = problem.initial_state();

        // Both arms show up under the default policy.
        let mut seen = [false; 2];
        for _ in 0..64 {
            seen[problem.rollout_action(&state, &mut rng) as usize] = true;
        }
        assert!(seen[0] && seen[1]);
    }

    #[test]
    fn default_initial_value_is_zero() {
        let problem = Bandit;
        let state = problem.initial_state();
        assert_eq!(problem.initial_value(&state), 0.0);
    }
}
