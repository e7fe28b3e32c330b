//! The search tree: two arenas of alternating node kinds.
//!
//! Decision and action nodes live in contiguous `Vec` arenas and point at
//! each other through index newtypes. Downward links own (the arenas own the
//! nodes), upward links are bare indices used only by back-propagation, so
//! the structure is a tree by construction.
//!
//! The store's two inserting operations deduplicate children under the
//! problem's equality: one action node per distinct action below a decision,
//! one decision node per distinct sampled outcome below an action.

use crate::config::{TreeValue, UCB_EPSILON};
use crate::node::{ActionId, ActionNode, DecisionId, DecisionNode};

/// Arena-backed search tree over problem states `S` and actions `A`.
#[derive(Debug, Clone)]
pub struct SearchTree<S, A> {
    decisions: Vec<DecisionNode<S>>,
    actions: Vec<ActionNode<A>>,
    root: DecisionId,
}

/// Point-in-time tree statistics, for diagnostics.
#[derive(Debug, Clone)]
pub struct TreeStats {
    pub decision_count: usize,
    pub action_count: usize,
    pub root_visits: u32,
    pub max_depth: usize,
}

impl<S, A> SearchTree<S, A>
where
    S: Clone + PartialEq,
    A: Clone + PartialEq,
{
    /// Create a tree holding only a root decision for `root_state`.
    pub fn new(root_state: S) -> Self {
        Self {
            decisions: vec![DecisionNode::new(root_state, ActionId::NONE)],
            actions: Vec::new(),
            root: DecisionId(0),
        }
    }

    #[inline]
    pub fn root(&self) -> DecisionId {
        self.root
    }

    #[inline]
    pub fn decision(&self, id: DecisionId) -> &DecisionNode<S> {
        &self.decisions[id.0 as usize]
    }

    #[inline]
    pub fn decision_mut(&mut self, id: DecisionId) -> &mut DecisionNode<S> {
        &mut self.decisions[id.0 as usize]
    }

    #[inline]
    pub fn action(&self, id: ActionId) -> &ActionNode<A> {
        &self.actions[id.0 as usize]
    }

    #[inline]
    pub fn action_mut(&mut self, id: ActionId) -> &mut ActionNode<A> {
        &mut self.actions[id.0 as usize]
    }

    /// All decision nodes, in allocation order.
    #[inline]
    pub fn decisions(&self) -> &[DecisionNode<S>] {
        &self.decisions
    }

    /// All action nodes, in allocation order.
    #[inline]
    pub fn actions(&self) -> &[ActionNode<A>] {
        &self.actions
    }

    fn push_decision(&mut self, node: DecisionNode<S>) -> DecisionId {
        let id = DecisionId(self.decisions.len() as u32);
        self.decisions.push(node);
        id
    }

    fn push_action(&mut self, node: ActionNode<A>) -> ActionId {
        let id = ActionId(self.actions.len() as u32);
        self.actions.push(node);
        id
    }

    /// Return the child of `parent` whose action equals `action`, creating
    /// and linking a fresh edge (initialised to `prior`) if none exists.
    pub fn find_or_insert_action(
        &mut self,
        parent: DecisionId,
        action: A,
        prior: f64,
    ) -> ActionId {
        if let Some(&existing) = self
            .decision(parent)
            .children
            .iter()
            .find(|&&c| self.action(c).action == action)
        {
            return existing;
        }

        let id = self.push_action(ActionNode::new(action, parent, prior));
        self.decision_mut(parent).children.push(id);
        id
    }

    /// Return the child of `parent` whose state equals `state`, creating and
    /// linking a fresh decision node if none exists.
    pub fn find_or_insert_outcome(&mut self, parent: ActionId, state: S) -> DecisionId {
        if let Some(&existing) = self
            .action(parent)
            .children
            .iter()
            .find(|&&c| self.decision(c).state == state)
        {
            return existing;
        }

        let id = self.push_decision(DecisionNode::new(state, parent));
        self.action_mut(parent).children.push(id);
        id
    }

    /// Rank an action edge under the given value function.
    pub fn edge_value(&self, edge: ActionId, value: TreeValue) -> f64 {
        let node = self.action(edge);
        match value {
            TreeValue::Greedy => node.mean(),
            TreeValue::Ucb1 { c } => {
                let parent_visits = self.decision(node.parent).visits;
                let n = f64::from(node.visits) + UCB_EPSILON;
                node.total_value / n
                    + 2.0 * c * ((f64::from(parent_visits) + 1.0).ln() / n).sqrt()
            }
        }
    }

    /// The action child of `decision` maximising `value`. Ties break in
    /// scan order (the first maximum wins). `None` if there are no children.
    pub fn best_child(&self, decision: DecisionId, value: TreeValue) -> Option<ActionId> {
        let mut best = None;
        let mut best_value = f64::NEG_INFINITY;

        for &child in &self.decision(decision).children {
            let v = self.edge_value(child, value);
            if v > best_value {
                best_value = v;
                best = Some(child);
            }
        }

        best
    }

    /// Fold another tree grown from the same root state into this one.
    ///
    /// Only root-level action statistics are combined: a replica edge whose
    /// action matches an existing edge adds its `(W, n)` and nothing deeper;
    /// an unmatched edge brings its whole subtree across. Addition is
    /// commutative, so replicas can be folded in any order.
    pub fn merge_inplace(&mut self, other: SearchTree<S, A>) {
        let root = self.root;
        for &theirs in &other.decision(other.root()).children {
            let edge = other.action(theirs);
            let matched = self
                .decision(root)
                .children
                .iter()
                .copied()
                .find(|&c| self.action(c).action == edge.action);

            match matched {
                Some(ours) => {
                    let node = self.action_mut(ours);
                    node.visits += edge.visits;
                    node.total_value += edge.total_value;
                }
                None => {
                    self.graft_action(root, &other, theirs);
                }
            }
        }
    }

    /// Copy an action subtree out of `other`, rooted under `parent` here.
    /// Iterative so that arbitrarily deep replicas cannot overflow the
    /// stack.
    fn graft_action(&mut self, parent: DecisionId, other: &SearchTree<S, A>, src: ActionId) {
        let first = {
            let edge = other.action(src);
            self.push_action(ActionNode {
                action: edge.action.clone(),
                parent,
                children: Vec::new(),
                visits: edge.visits,
                total_value: edge.total_value,
            })
        };
        self.decision_mut(parent).children.push(first);

        let mut work: Vec<(ActionId, ActionId)> = vec![(first, src)];
        while let Some((dst_edge, src_edge)) = work.pop() {
            for &src_child in &other.action(src_edge).children {
                let child = other.decision(src_child);
                let dst_child = self.push_decision(DecisionNode {
                    state: child.state.clone(),
                    parent: dst_edge,
                    children: Vec::new(),
                    visits: child.visits,
                });
                self.action_mut(dst_edge).children.push(dst_child);

                for &src_grand in &child.children {
                    let grand = other.action(src_grand);
                    let dst_grand = self.push_action(ActionNode {
                        action: grand.action.clone(),
                        parent: dst_child,
                        children: Vec::new(),
                        visits: grand.visits,
                        total_value: grand.total_value,
                    });
                    self.decision_mut(dst_child).children.push(dst_grand);
                    work.push((dst_grand, src_grand));
                }
            }
        }
    }

    /// Longest chain of decisions from the root.
    pub fn max_depth(&self) -> usize {
        self.depth_from(self.root, 0)
    }

    fn depth_from(&self, decision: DecisionId, parent_depth: usize) -> usize {
        let node = self.decision(decision);
        if node.children.is_empty() {
            return parent_depth + 1;
        }

        let mut deepest = 0;
        for &edge in &node.children {
            for &child in &self.action(edge).children {
                deepest = deepest.max(self.depth_from(child, parent_depth + 1));
            }
        }
        deepest
    }

    /// Diagnostic summary of the current tree.
    pub fn stats(&self) -> TreeStats {
        TreeStats {
            decision_count: self.decisions.len(),
            action_count: self.actions.len(),
            root_visits: self.decision(self.root).visits,
            max_depth: self.max_depth(),
        }
    }
}
