use super::mdp::Environment;
use crate::{common::defs::*, error::*};
use rand::distributions::WeightedIndex;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EpisodeEvent {
    pub s: Discrete,
    pub a: Discrete,
    pub r: Continous,
    pub done: bool,
}

/// Draws an index with probability proportional to its weight.
pub fn pick_next(rng: &mut StdRng, weights: &[Continous]) -> MdpResult<Discrete> {
    let dist = WeightedIndex::new(weights).map_err(|e| MdpError::Sampling(e.to_string()))?;
    Ok(dist.sample(rng))
}

/// Plays one episode from a fresh reset, following `policy` until `done`.
pub fn run_episode<E, P>(env: &mut E, policy: &P, rng: &mut StdRng) -> MdpResult<Vec<EpisodeEvent>>
where
    E: Environment + ?Sized,
    P: Policy + ?Sized,
{
    let mut s = env.reset(rng)?;
    let mut events = vec![];
    loop {
        let a = policy.policy(s).ok_or(MdpError::OutOfBounds {
            what: "policy state",
            index: s,
            len: env.n_s(),
        })?;
        let (next, r, done) = env.step(rng, a)?;
        events.push(EpisodeEvent { s, a, r, done });
        if done {
            break;
        }

        s = next;
    }

    Ok(events)
}
