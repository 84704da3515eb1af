use super::mdp_simulator::pick_next;
use crate::{common::defs::*, error::*};
use itertools::iproduct;
use ndarray::Array3;
use rand::rngs::StdRng;
use tracing::trace;

/// Markov Decision Process - Sutton & Barto 2018.
///
/// The last state is the absorbing state: every action keeps the process there
/// with probability 1 and reward 0.
pub trait Mdp {
    fn n_s(&self) -> usize;

    fn n_a(&self) -> usize;

    fn absorbing_state(&self) -> Discrete {
        self.n_s().saturating_sub(1)
    }

    /// Probability of landing in `next_state` after taking `action` in `state`.
    fn p(&self, next_state: Discrete, state: Discrete, action: Discrete) -> MdpResult<Continous>;

    /// Reward for the transition `state --action--> next_state`.
    fn r(&self, next_state: Discrete, state: Discrete, action: Discrete) -> MdpResult<Continous>;

    /// Dense transition and reward tensors, both indexed `[state, action, next_state]`.
    fn prob_rewards(&self) -> MdpResult<(Array3<Continous>, Array3<Continous>)> {
        let (n_s, n_a) = (self.n_s(), self.n_a());
        let mut p = Array3::zeros((n_s, n_a, n_s));
        let mut r = Array3::zeros((n_s, n_a, n_s));
        for (s, a, ns) in iproduct!(0..n_s, 0..n_a, 0..n_s) {
            p[[s, a, ns]] = self.p(ns, s, a)?;
            r[[s, a, ns]] = self.r(ns, s, a)?;
        }

        Ok((p, r))
    }
}

pub(crate) fn check_query(
    next_state: Discrete,
    state: Discrete,
    action: Discrete,
    n_s: usize,
    n_a: usize,
) -> MdpResult<()> {
    check_index("next_state", next_state, n_s)?;
    check_index("state", state, n_s)?;
    check_index("action", action, n_a)
}

/// Per-instance episode bookkeeping.
#[derive(Debug, Clone, PartialEq)]
pub struct Episode {
    pub state: Discrete,
    pub n_steps: usize,
    pub max_steps: usize,
    /// Initial-state distribution.
    pub pi: Vec<Continous>,
}

impl Episode {
    pub fn new(pi: Vec<Continous>, max_steps: usize) -> MdpResult<Self> {
        if max_steps == 0 {
            return Err(MdpError::Config("max_steps must be at least 1".into()));
        }

        let state = pi
            .iter()
            .position(|&w| w > 0.)
            .ok_or_else(|| MdpError::Config("initial-state distribution has no mass".into()))?;

        Ok(Self {
            state,
            n_steps: 0,
            max_steps,
            pi,
        })
    }
}

/// An [`Mdp`] that can also be played one step at a time.
///
/// Randomness is always supplied by the caller, so a seeded generator
/// reproduces an episode exactly.
pub trait Environment: Mdp {
    fn episode(&self) -> &Episode;

    fn episode_mut(&mut self) -> &mut Episode;

    /// Text view of the grid, with the policy and value overlaid when given.
    fn render(&self, policy: Option<&[Discrete]>, value: Option<&[Continous]>) -> MdpResult<String>;

    fn state(&self) -> Discrete {
        self.episode().state
    }

    fn is_terminal(&self, s: Discrete) -> bool {
        s == self.absorbing_state()
    }

    fn reset(&mut self, rng: &mut StdRng) -> MdpResult<Discrete> {
        let s = pick_next(rng, &self.episode().pi)?;
        let episode = self.episode_mut();
        episode.n_steps = 0;
        episode.state = s;

        Ok(s)
    }

    /// Returns `(next_state, reward, done)`.
    fn step(
        &mut self,
        rng: &mut StdRng,
        action: Discrete,
    ) -> MdpResult<(Discrete, Continous, bool)> {
        let n_a = self.n_a();
        if action >= n_a {
            return Err(MdpError::InvalidAction { action, n_a });
        }

        let state = self.state();
        let weights = (0..self.n_s())
            .map(|ns| self.p(ns, state, action))
            .collect::<MdpResult<Vec<_>>>()?;
        let next_state = pick_next(rng, &weights)?;
        let reward = self.r(next_state, state, action)?;

        let truncated = {
            let episode = self.episode_mut();
            episode.n_steps += 1;
            episode.state = next_state;
            episode.n_steps >= episode.max_steps
        };
        let done = truncated || self.is_terminal(next_state);
        trace!(state, action, next_state, reward, done, "step");

        Ok((next_state, reward, done))
    }
}
