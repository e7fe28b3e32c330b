//! Root-parallel batch computation.
//!
//! A batch either iterates the caller's tree in place or grows
//! `parallel_roots` independent replicas of the root and folds their
//! top-level statistics back in. Workers share nothing mutable: each owns
//! its tree and a generator seeded from the caller's, and the fold happens
//! strictly after every worker has finished.

use mdp_core::Mdp;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use rayon::prelude::*;
use tracing::debug;

use crate::config::MctsConfig;
use crate::search::Mcts;
use crate::tree::SearchTree;

impl<'a, P: Mdp> Mcts<'a, P> {
    /// Run a batch of `iterations` passes.
    ///
    /// With `parallel_roots = 1` this iterates the caller's own tree. With
    /// more, each replica runs `iterations` passes on its own copy of the
    /// root state and the finished trees are merged into the caller's root
    /// (matching actions fold their statistics, new actions bring their
    /// subtrees across).
    pub fn compute(&mut self, iterations: u32, rng: &mut ChaCha20Rng) {
        if self.config.parallel_roots <= 1 {
            for _ in 0..iterations {
                self.iterate(rng);
            }
            return;
        }

        let seeds: Vec<u64> = (0..self.config.parallel_roots).map(|_| rng.gen()).collect();
        let root_state = self.tree.decision(self.tree.root()).state.clone();
        let problem = self.problem;
        let config = self.config.clone();

        debug!(
            replicas = seeds.len(),
            iterations, "growing independent root replicas"
        );

        let replicas: Vec<SearchTree<P::State, P::Action>> = seeds
            .into_par_iter()
            .map(|seed| grow_replica(problem, root_state.clone(), &config, iterations, seed))
            .collect();

        for replica in replicas {
            self.tree.merge_inplace(replica);
        }

        let stats = self.tree.stats();
        debug!(
            decisions = stats.decision_count,
            actions = stats.action_count,
            "replica trees merged"
        );
    }
}

/// Grow one independent tree from `root_state` with its own generator.
fn grow_replica<P: Mdp>(
    problem: &P,
    root_state: P::State,
    config: &MctsConfig,
    iterations: u32,
    seed: u64,
) -> SearchTree<P::State, P::Action> {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);

    // Replicas never fan out again themselves.
    let mut config = config.clone();
    config.parallel_roots = 1;

    let mut search = Mcts {
        problem,
        tree: SearchTree::new(root_state),
        config,
    };
    for _ in 0..iterations {
        search.iterate(&mut rng);
    }
    search.into_tree()
}
