//! Minimal problems exercising the engine from unit tests.

use mdp_core::Mdp;
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha20Rng;

/// Deterministic walk along a line of cells; the last cell absorbs.
/// One action only, so tree shape is a single path.
#[derive(Debug)]
pub(crate) struct ChainMdp {
    len: u32,
    step_reward: f64,
}

#[derive(Debug, Clone)]
pub(crate) struct ChainState {
    pos: u32,
    tried: bool,
}

impl PartialEq for ChainState {
    fn eq(&self, other: &Self) -> bool {
        self.pos == other.pos
    }
}

impl ChainMdp {
    pub(crate) fn new(len: u32) -> Self {
        Self {
            len,
            step_reward: 1.0,
        }
    }

    pub(crate) fn with_step_reward(mut self, reward: f64) -> Self {
        self.step_reward = reward;
        self
    }
}

impl Mdp for ChainMdp {
    type State = ChainState;
    type Action = u8;

    fn initial_state(&self) -> ChainState {
        ChainState { pos: 0, tried: false }
    }

    fn terminal(&self, state: &ChainState) -> bool {
        state.pos + 1 >= self.len
    }

    fn has_untried_actions(&self, state: &ChainState) -> bool {
        !state.tried
    }

    fn next_action(&self, state: &mut ChainState, _rng: &mut ChaCha20Rng) -> u8 {
        state.tried = true;
        0
    }

    fn random_action(&self, _state: &ChainState, _rng: &mut ChaCha20Rng) -> u8 {
        0
    }

    fn transition(&self, state: &ChainState, _action: &u8, _rng: &mut ChaCha20Rng) -> ChainState {
        ChainState {
            pos: (state.pos + 1).min(self.len - 1),
            tried: false,
        }
    }

    fn reward(&self, _from: &ChainState, _action: &u8, _to: &ChainState) -> f64 {
        self.step_reward
    }
}

/// One-shot multi-armed bandit: every arm leads to the same absorbing
/// state, paying its configured reward.
#[derive(Debug)]
pub(crate) struct BanditMdp {
    payouts: Vec<f64>,
}

#[derive(Debug, Clone)]
pub(crate) struct BanditState {
    pulled: bool,
    tried: Vec<u8>,
}

impl PartialEq for BanditState {
    fn eq(&self, other: &Self) -> bool {
        self.pulled == other.pulled
    }
}

impl BanditMdp {
    pub(crate) fn new(payouts: Vec<f64>) -> Self {
        Self { payouts }
    }
}

impl Mdp for BanditMdp {
    type State = BanditState;
    type Action = u8;

    fn initial_state(&self) -> BanditState {
        BanditState {
            pulled: false,
            tried: Vec::new(),
        }
    }

    fn terminal(&self, state: &BanditState) -> bool {
        state.pulled
    }

    fn has_untried_actions(&self, state: &BanditState) -> bool {
        state.tried.len() < self.payouts.len()
    }

    fn next_action(&self, state: &mut BanditState, rng: &mut ChaCha20Rng) -> u8 {
        let untried: Vec<u8> = (0..self.payouts.len() as u8)
            .filter(|arm| !state.tried.contains(arm))
            .collect();
        let pick = *untried
            .choose(rng)
            .expect("next_action called on an exhausted bandit state");
        state.tried.push(pick);
        pick
    }

    fn random_action(&self, _state: &BanditState, rng: &mut ChaCha20Rng) -> u8 {
        rng.gen_range(0..self.payouts.len() as u8)
    }

    fn transition(
        &self,
        _state: &BanditState,
        _action: &u8,
        _rng: &mut ChaCha20Rng,
    ) -> BanditState {
        BanditState {
            pulled: true,
            tried: Vec::new(),
        }
    }

    fn reward(&self, _from: &BanditState, action: &u8, _to: &BanditState) -> f64 {
        self.payouts[*action as usize]
    }
}

/// Endless single-action coin flips; transitions land on one of two states,
/// exercising outcome memoisation.
#[derive(Debug)]
pub(crate) struct CoinMdp;

#[derive(Debug, Clone)]
pub(crate) struct CoinState {
    up: bool,
    tried: bool,
}

impl PartialEq for CoinState {
    fn eq(&self, other: &Self) -> bool {
        self.up == other.up
    }
}

impl Mdp for CoinMdp {
    type State = CoinState;
    type Action = u8;

    fn initial_state(&self) -> CoinState {
        CoinState { up: true, tried: false }
    }

    fn terminal(&self, _state: &CoinState) -> bool {
        false
    }

    fn has_untried_actions(&self, state: &CoinState) -> bool {
        !state.tried
    }

    fn next_action(&self, state: &mut CoinState, _rng: &mut ChaCha20Rng) -> u8 {
        state.tried = true;
        0
    }

    fn random_action(&self, _state: &CoinState, _rng: &mut ChaCha20Rng) -> u8 {
        0
    }

    fn transition(&self, _state: &CoinState, _action: &u8, rng: &mut ChaCha20Rng) -> CoinState {
        CoinState {
            up: rng.gen::<bool>(),
            tried: false,
        }
    }

    fn reward(&self, _from: &CoinState, _action: &u8, to: &CoinState) -> f64 {
        if to.up {
            1.0
        } else {
            -1.0
        }
    }
}

/// A contract-bending enumerator that always claims one more untried
/// action and always hands out the same one. The store must deduplicate.
#[derive(Debug)]
pub(crate) struct RepeatMdp;

#[derive(Debug, Clone)]
pub(crate) struct RepeatState {
    depth: u32,
}

impl PartialEq for RepeatState {
    fn eq(&self, other: &Self) -> bool {
        self.depth == other.depth
    }
}

impl Mdp for RepeatMdp {
    type State = RepeatState;
    type Action = u8;

    fn initial_state(&self) -> RepeatState {
        RepeatState { depth: 0 }
    }

    fn terminal(&self, _state: &RepeatState) -> bool {
        false
    }

    fn has_untried_actions(&self, _state: &RepeatState) -> bool {
        true
    }

    fn next_action(&self, _state: &mut RepeatState, _rng: &mut ChaCha20Rng) -> u8 {
        0
    }

    fn random_action(&self, _state: &RepeatState, _rng: &mut ChaCha20Rng) -> u8 {
        0
    }

    fn transition(
        &self,
        state: &RepeatState,
        _action: &u8,
        _rng: &mut ChaCha20Rng,
    ) -> RepeatState {
        RepeatState { depth: state.depth + 1 }
    }

    fn reward(&self, _from: &RepeatState, _action: &u8, _to: &RepeatState) -> f64 {
        0.0
    }
}
