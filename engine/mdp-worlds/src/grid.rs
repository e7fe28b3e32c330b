//! Discrete N×N grid navigation.
//!
//! Four moves, borders clamp, goal in the far corner. A slip probability
//! diverts an executed move to the neighbouring action, which makes the
//! transition kernel stochastic without changing the reachable set.

use mdp_core::Mdp;
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha20Rng;

/// The four grid moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridAction {
    Up,
    Down,
    Right,
    Left,
}

impl GridAction {
    pub const ALL: [GridAction; 4] = [
        GridAction::Up,
        GridAction::Down,
        GridAction::Right,
        GridAction::Left,
    ];

    /// The neighbouring action a slip diverts to.
    fn slipped(self) -> Self {
        match self {
            GridAction::Up => GridAction::Down,
            GridAction::Down => GridAction::Right,
            GridAction::Right => GridAction::Left,
            GridAction::Left => GridAction::Up,
        }
    }
}

/// A cell position plus the enumeration bookkeeping for tried actions.
/// Equality compares the position only.
#[derive(Debug, Clone)]
pub struct GridState {
    pub x: u32,
    pub y: u32,
    tried: Vec<GridAction>,
}

impl PartialEq for GridState {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

/// The grid problem definition.
#[derive(Debug, Clone)]
pub struct GridWorld {
    size: u32,
    slip: f64,
}

impl GridWorld {
    /// An N×N grid with the given slip probability. The goal sits at
    /// `(N-1, N-1)`.
    pub fn new(size: u32, slip: f64) -> Self {
        assert!(size >= 2, "grid needs at least two cells per side");
        Self { size, slip }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn goal(&self) -> (u32, u32) {
        (self.size - 1, self.size - 1)
    }

    /// A fresh state snapshot at the given cell.
    pub fn state_at(&self, x: u32, y: u32) -> GridState {
        GridState {
            x,
            y,
            tried: Vec::new(),
        }
    }

    /// Whether the move stays on the board.
    fn valid(&self, state: &GridState, action: GridAction) -> bool {
        match action {
            GridAction::Up => state.y + 1 < self.size,
            GridAction::Down => state.y > 0,
            GridAction::Right => state.x + 1 < self.size,
            GridAction::Left => state.x > 0,
        }
    }

    fn valid_actions(&self, state: &GridState) -> Vec<GridAction> {
        GridAction::ALL
            .iter()
            .copied()
            .filter(|&a| self.valid(state, a))
            .collect()
    }

    /// Apply a move deterministically, clamping at the border.
    fn apply(&self, state: &GridState, action: GridAction) -> (u32, u32) {
        let (mut x, mut y) = (state.x, state.y);
        match action {
            GridAction::Up => {
                if y + 1 < self.size {
                    y += 1;
                }
            }
            GridAction::Down => y = y.saturating_sub(1),
            GridAction::Right => {
                if x + 1 < self.size {
                    x += 1;
                }
            }
            GridAction::Left => x = x.saturating_sub(1),
        }
        (x, y)
    }

    fn goal_distance_sq(&self, x: u32, y: u32) -> f64 {
        let (gx, gy) = self.goal();
        let dx = f64::from(x) - f64::from(gx);
        let dy = f64::from(y) - f64::from(gy);
        dx * dx + dy * dy
    }
}

impl Mdp for GridWorld {
    type State = GridState;
    type Action = GridAction;

    fn initial_state(&self) -> GridState {
        self.state_at(0, 0)
    }

    fn terminal(&self, state: &GridState) -> bool {
        (state.x, state.y) == self.goal()
    }

    fn has_untried_actions(&self, state: &GridState) -> bool {
        state.tried.len() < self.valid_actions(state).len()
    }

    fn next_action(&self, state: &mut GridState, rng: &mut ChaCha20Rng) -> GridAction {
        let candidates: Vec<GridAction> = self
            .valid_actions(state)
            .into_iter()
            .filter(|a| !state.tried.contains(a))
            .collect();
        let pick = *candidates
            .choose(rng)
            .expect("next_action called on an exhausted grid state");
        state.tried.push(pick);
        pick
    }

    fn random_action(&self, state: &GridState, rng: &mut ChaCha20Rng) -> GridAction {
        *self
            .valid_actions(state)
            .choose(rng)
            .expect("every grid cell has a valid move")
    }

    /// Greedy step toward the goal, judged on the slip-free move.
    fn rollout_action(&self, state: &GridState, _rng: &mut ChaCha20Rng) -> GridAction {
        let mut best = GridAction::Up;
        let mut best_distance = f64::INFINITY;
        for action in self.valid_actions(state) {
            let (x, y) = self.apply(state, action);
            let distance = self.goal_distance_sq(x, y);
            if distance < best_distance {
                best_distance = distance;
                best = action;
            }
        }
        best
    }

    fn transition(&self, state: &GridState, action: &GridAction, rng: &mut ChaCha20Rng) -> GridState {
        let mut executed = *action;
        if self.slip > 0.0 && rng.gen::<f64>() < self.slip {
            executed = executed.slipped();
        }
        let (x, y) = self.apply(state, executed);
        self.state_at(x, y)
    }

    fn reward(&self, _from: &GridState, _action: &GridAction, to: &GridState) -> f64 {
        if (to.x, to.y) == self.goal() {
            1.0
        } else {
            0.0
        }
    }
}
