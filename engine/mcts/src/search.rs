//! The per-iteration search algorithm.
//!
//! One `iterate` pass descends the tree (opening a new action edge when the
//! expansion gate allows it, otherwise following the UCB1 maximum), samples
//! an outcome below the chosen edge, rolls out from the frontier with the
//! default policy, and propagates the discounted return back up the visited
//! path.

use mdp_core::Mdp;
use rand::Rng;
use rand_chacha::ChaCha20Rng;
use tracing::trace;

use crate::config::{ConfigError, ExpansionGate, MctsConfig, OutcomeRule, RolloutRule, TreeValue};
use crate::node::{ActionId, ActionNode, DecisionId};
use crate::tree::{SearchTree, TreeStats};

/// A Monte-Carlo tree search over one problem instance.
///
/// The search owns its tree and borrows the (immutable) problem; all
/// randomness is drawn from the generator handed to [`iterate`] and
/// [`compute`](Mcts::compute), so a single-tree run is reproducible given
/// its seed.
///
/// [`iterate`]: Mcts::iterate
pub struct Mcts<'a, P: Mdp> {
    pub(crate) problem: &'a P,
    pub(crate) tree: SearchTree<P::State, P::Action>,
    pub(crate) config: MctsConfig,
}

impl<'a, P: Mdp> Mcts<'a, P> {
    /// Create a search rooted at a caller-supplied state.
    pub fn new(
        problem: &'a P,
        root_state: P::State,
        config: MctsConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            problem,
            tree: SearchTree::new(root_state),
            config,
        })
    }

    /// Create a search rooted at the problem's initial state.
    pub fn from_initial(problem: &'a P, config: MctsConfig) -> Result<Self, ConfigError> {
        let root_state = problem.initial_state();
        Self::new(problem, root_state, config)
    }

    /// The tree grown so far.
    pub fn tree(&self) -> &SearchTree<P::State, P::Action> {
        &self.tree
    }

    /// Consume the search, keeping the tree.
    pub fn into_tree(self) -> SearchTree<P::State, P::Action> {
        self.tree
    }

    /// Longest chain of decisions from the root (diagnostics).
    pub fn max_depth(&self) -> usize {
        self.tree.max_depth()
    }

    /// Diagnostic tree statistics.
    pub fn stats(&self) -> TreeStats {
        self.tree.stats()
    }

    /// Run one selection/expansion/rollout/back-propagation pass.
    pub fn iterate(&mut self, rng: &mut ChaCha20Rng) {
        let root = self.tree.root();
        let mut visited: Vec<DecisionId> = vec![root];
        let mut rewards: Vec<f64> = vec![0.0];

        let mut cur = root;
        if !self.problem.terminal(&self.tree.decision(root).state) {
            loop {
                let edge = self.choose_edge(cur, rng);
                let next = self.next_decision(edge, rng);

                let reward = {
                    let from = &self.tree.decision(cur).state;
                    let to = &self.tree.decision(next).state;
                    self.problem.reward(from, &self.tree.action(edge).action, to)
                };
                rewards.push(reward);
                visited.push(next);
                cur = next;

                // Descent stops at a terminal state or at a decision that
                // had not been visited before this pass.
                let node = self.tree.decision(cur);
                if self.problem.terminal(&node.state) || node.unvisited() {
                    break;
                }
            }
        }

        let leaf_terminal = self.problem.terminal(&self.tree.decision(cur).state);
        let mut value = if leaf_terminal {
            0.0
        } else {
            self.rollout(cur, rng)
        };

        debug_assert_eq!(visited.len(), rewards.len());
        for i in (0..visited.len()).rev() {
            value = rewards[i] + self.config.gamma * value;
            let parent = {
                let node = self.tree.decision_mut(visited[i]);
                node.visits += 1;
                node.parent
            };
            if parent.is_some() {
                self.tree.action_mut(parent).update_stats(value);
            }
        }

        trace!(
            path_len = visited.len(),
            value,
            terminal = leaf_terminal,
            "iteration complete"
        );
    }

    /// The root's best action edge under the greedy value, or `None` when
    /// the root state is terminal or no edge has been created yet.
    pub fn best_action(&self) -> Option<&ActionNode<P::Action>> {
        self.best_action_by(TreeValue::Greedy)
    }

    /// The root's best action edge under a caller-supplied value function.
    pub fn best_action_by(&self, value: TreeValue) -> Option<&ActionNode<P::Action>> {
        let root = self.tree.root();
        if self.problem.terminal(&self.tree.decision(root).state) {
            return None;
        }
        self.tree.best_child(root, value).map(|id| self.tree.action(id))
    }

    /// Pick the edge to descend through at `decision`: a fresh action when
    /// the expansion gate opens, the UCB1 maximum otherwise.
    fn choose_edge(&mut self, decision: DecisionId, rng: &mut ChaCha20Rng) -> ActionId {
        if self.widen_actions(decision) {
            let (action, prior) = {
                let node = self.tree.decision_mut(decision);
                let action = self.problem.next_action(&mut node.state, rng);
                let prior = self.problem.initial_value(&node.state);
                (action, prior)
            };
            // A stochastic enumerator may re-produce a known action; the
            // existing edge is reused in that case.
            return self.tree.find_or_insert_action(decision, action, prior);
        }

        let ucb = TreeValue::Ucb1 {
            c: self.config.exploration_c,
        };
        self.tree
            .best_child(decision, ucb)
            .expect("non-terminal decision has neither untried nor tried actions")
    }

    fn widen_actions(&self, decision: DecisionId) -> bool {
        let node = self.tree.decision(decision);
        if !self.problem.has_untried_actions(&node.state) {
            return false;
        }
        match self.config.expansion {
            ExpansionGate::Always => true,
            ExpansionGate::Spw { alpha } => {
                node.visits == 0
                    || f64::from(node.visits).powf(alpha) > node.children.len() as f64
            }
        }
    }

    /// Turn a chosen action edge into the next decision node.
    fn next_decision(&mut self, edge: ActionId, rng: &mut ChaCha20Rng) -> DecisionId {
        if let OutcomeRule::Widened { beta } = self.config.outcomes {
            let node = self.tree.action(edge);
            let widen = node.visits == 0
                || f64::from(node.visits).powf(beta) > node.children.len() as f64;
            if !widen {
                return self.weighted_revisit(edge, rng);
            }
        }
        self.sample_outcome(edge, rng)
    }

    /// Sample the transition kernel and memoise the outcome.
    fn sample_outcome(&mut self, edge: ActionId, rng: &mut ChaCha20Rng) -> DecisionId {
        let next_state = {
            let node = self.tree.action(edge);
            let from = &self.tree.decision(node.parent).state;
            self.problem.transition(from, &node.action, rng)
        };
        self.tree.find_or_insert_outcome(edge, next_state)
    }

    /// Revisit an existing outcome with probability proportional to its
    /// visit count. Draws `r` in `[0, Σn)` and walks a strict `<` prefix.
    fn weighted_revisit(&self, edge: ActionId, rng: &mut ChaCha20Rng) -> DecisionId {
        let node = self.tree.action(edge);
        let total: u32 = node
            .children
            .iter()
            .map(|&c| self.tree.decision(c).visits)
            .sum();
        debug_assert!(total > 0, "widened edge has no visited outcomes");

        let mut remaining = rng.gen_range(0..total);
        for &child in &node.children {
            let visits = self.tree.decision(child).visits;
            if remaining < visits {
                return child;
            }
            remaining -= visits;
        }
        unreachable!("visit-weighted draw exceeded the total")
    }

    /// Simulate up to `rollout_depth` steps from the frontier under the
    /// default policy; returns the discounted accumulated reward.
    fn rollout(&self, from: DecisionId, rng: &mut ChaCha20Rng) -> f64 {
        let mut discount = 1.0;
        let mut total = 0.0;
        let mut state = self.tree.decision(from).state.clone();

        for _ in 0..self.config.rollout_depth {
            let action = match self.config.rollout {
                RolloutRule::Uniform => self.problem.random_action(&state, rng),
                RolloutRule::Heuristic => self.problem.rollout_action(&state, rng),
            };
            let next = self.problem.transition(&state, &action, rng);
            total += discount * self.problem.reward(&state, &action, &next);
            state = next;
            if self.problem.terminal(&state) {
                break;
            }
            discount *= self.config.gamma;
        }

        total
    }
}
