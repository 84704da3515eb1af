use crate::mdps::mdp::Mdp;
use crate::{common::defs::*, error::*};
use ndarray::{s, Array3};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const DEFAULT_MAX_ITERATIONS: usize = 128;

/// How a sweep reads the value array while writing it.
///
/// `InPlace` overwrites `value[s]` as soon as it is computed, so later states of the
/// same sweep already see it. The fixed point is the same for both strategies but the
/// trajectory, and therefore the iteration count, differs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sweep {
    #[default]
    InPlace,
    /// Double-buffered: every backup reads the previous sweep's array only.
    Synchronous,
}

/// How a convergence loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Convergence {
    pub iterations: usize,
    /// Largest per-state change of the last sweep.
    pub delta: Continous,
    pub converged: bool,
}

/// Transition and reward tensors captured once per solver call.
#[derive(Debug, Clone)]
pub(crate) struct Model {
    pub p: Array3<Continous>,
    pub r: Array3<Continous>,
}

impl Model {
    pub fn from_mdp<M: Mdp + ?Sized>(mdp: &M) -> MdpResult<Self> {
        let (p, r) = mdp.prob_rewards()?;
        Ok(Self { p, r })
    }

    pub fn n_s(&self) -> usize {
        self.p.dim().0
    }

    pub fn n_a(&self) -> usize {
        self.p.dim().1
    }

    /// `Σ_{s'} P(s'|s,a) · (R(s,a,s') + γ·value[s'])`
    pub fn q_value(&self, value: &[Continous], gamma: Continous, s: Discrete, a: Discrete) -> Continous {
        self.p
            .slice(s![s, a, ..])
            .iter()
            .zip(self.r.slice(s![s, a, ..]).iter())
            .zip(value)
            .map(|((p, r), v)| p * (r + gamma * v))
            .sum()
    }

    /// Best action and its value; ties go to the lowest action index.
    pub fn greedy(&self, value: &[Continous], gamma: Continous, s: Discrete) -> (Discrete, Continous) {
        let mut best = (0, self.q_value(value, gamma, s, 0));
        for a in 1..self.n_a() {
            let q = self.q_value(value, gamma, s, a);
            if q > best.1 {
                best = (a, q);
            }
        }

        best
    }

    pub fn check_policy(&self, policy: &[Discrete]) -> MdpResult<()> {
        self.check_len("policy", policy.len())?;
        let n_a = self.n_a();
        match policy.iter().find(|&&a| a >= n_a) {
            Some(&action) => Err(MdpError::InvalidAction { action, n_a }),
            None => Ok(()),
        }
    }

    pub fn check_len(&self, what: &'static str, actual: usize) -> MdpResult<()> {
        if actual == self.n_s() {
            Ok(())
        } else {
            Err(MdpError::Shape {
                what,
                expected: self.n_s(),
                actual,
            })
        }
    }
}

/// One pass over every state, returning the largest change.
pub(crate) fn sweep<F>(value: &mut [Continous], mode: Sweep, backup: F) -> Continous
where
    F: Fn(Discrete, &[Continous]) -> Continous,
{
    let mut delta: Continous = 0.;
    match mode {
        Sweep::InPlace => {
            for s in 0..value.len() {
                let current = value[s];
                let updated = backup(s, value);
                value[s] = updated;
                delta = delta.max((current - updated).abs());
            }
        }
        Sweep::Synchronous => {
            let previous = value.to_vec();
            for (s, v) in value.iter_mut().enumerate() {
                *v = backup(s, &previous);
                delta = delta.max((previous[s] - *v).abs());
            }
        }
    }

    delta
}

/// Sweeps from an all-zero value array until `delta < theta` or `max_iterations` sweeps.
pub(crate) fn converge<F>(
    label: &'static str,
    n_s: usize,
    theta: Continous,
    max_iterations: usize,
    mode: Sweep,
    backup: F,
) -> (Vec<Continous>, Convergence)
where
    F: Fn(Discrete, &[Continous]) -> Continous,
{
    let mut value = vec![0.; n_s];
    let mut iterations = 0;
    let mut delta = Continous::INFINITY;
    let mut converged = false;

    while iterations < max_iterations && !converged {
        delta = sweep(&mut value, mode, &backup);
        iterations += 1;
        converged = delta < theta;
        debug!(label, iterations, delta, "sweep");
    }

    if !converged {
        warn!(label, iterations, delta, theta, "iteration cap reached before convergence");
    }

    (
        value,
        Convergence {
            iterations,
            delta,
            converged,
        },
    )
}
