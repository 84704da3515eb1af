use super::common::*;
use crate::mdps::{mdp::Mdp, mdp_solver::MdpSolver};
use crate::{common::defs::*, error::*};
use std::rc::Rc;
use tracing::{debug, info, warn};

/// Value of a fixed `policy`, starting from an all-zero value array.
///
/// The returned [`Convergence`] tells whether `delta < theta` was reached or
/// `max_iterations` sweeps ran out first.
pub fn policy_evaluation<M: Mdp + ?Sized>(
    env: &M,
    policy: &[Discrete],
    gamma: Continous,
    theta: Continous,
    max_iterations: usize,
) -> MdpResult<(Vec<Continous>, Convergence)> {
    policy_evaluation_with(env, policy, gamma, theta, max_iterations, Sweep::InPlace)
}

pub fn policy_evaluation_with<M: Mdp + ?Sized>(
    env: &M,
    policy: &[Discrete],
    gamma: Continous,
    theta: Continous,
    max_iterations: usize,
    sweep: Sweep,
) -> MdpResult<(Vec<Continous>, Convergence)> {
    let model = Model::from_mdp(env)?;
    evaluate(&model, policy, gamma, theta, max_iterations, sweep)
}

/// Greedy policy w.r.t. `value`, plus whether it equals `policy` state by state.
pub fn policy_improvement<M: Mdp + ?Sized>(
    env: &M,
    policy: &[Discrete],
    value: &[Continous],
    gamma: Continous,
) -> MdpResult<(Vec<Discrete>, bool)> {
    let model = Model::from_mdp(env)?;
    improve(&model, policy, value, gamma)
}

/// Alternates evaluation and improvement until the policy is stable or
/// `max_iterations` rounds have run. The cap also bounds each evaluation.
pub fn policy_iteration<M: Mdp + ?Sized>(
    env: &M,
    gamma: Continous,
    theta: Continous,
    max_iterations: usize,
) -> MdpResult<(Vec<Discrete>, Vec<Continous>, Convergence)> {
    policy_iteration_with(env, gamma, theta, max_iterations, Sweep::InPlace)
}

pub fn policy_iteration_with<M: Mdp + ?Sized>(
    env: &M,
    gamma: Continous,
    theta: Continous,
    max_iterations: usize,
    sweep: Sweep,
) -> MdpResult<(Vec<Discrete>, Vec<Continous>, Convergence)> {
    let model = Model::from_mdp(env)?;
    iterate(&model, gamma, theta, max_iterations, sweep)
}

pub(crate) fn evaluate(
    model: &Model,
    policy: &[Discrete],
    gamma: Continous,
    theta: Continous,
    max_iterations: usize,
    sweep: Sweep,
) -> MdpResult<(Vec<Continous>, Convergence)> {
    model.check_policy(policy)?;

    Ok(converge(
        "policy_evaluation",
        model.n_s(),
        theta,
        max_iterations,
        sweep,
        |s, v| model.q_value(v, gamma, s, policy[s]),
    ))
}

pub(crate) fn improve(
    model: &Model,
    policy: &[Discrete],
    value: &[Continous],
    gamma: Continous,
) -> MdpResult<(Vec<Discrete>, bool)> {
    model.check_len("policy", policy.len())?;
    model.check_len("value", value.len())?;

    let improved = (0..model.n_s())
        .map(|s| model.greedy(value, gamma, s).0)
        .collect::<Vec<_>>();
    let stable = improved == policy;

    Ok((improved, stable))
}

fn iterate(
    model: &Model,
    gamma: Continous,
    theta: Continous,
    max_iterations: usize,
    sweep: Sweep,
) -> MdpResult<(Vec<Discrete>, Vec<Continous>, Convergence)> {
    let mut policy = vec![0; model.n_s()];
    let mut value = vec![0.; model.n_s()];
    let mut iterations = 0;
    let mut delta = Continous::INFINITY;
    let mut stable = false;

    while iterations < max_iterations && !stable {
        let (v, evaluation) = evaluate(model, &policy, gamma, theta, max_iterations, sweep)?;
        value = v;
        delta = evaluation.delta;
        (policy, stable) = improve(model, &policy, &value, gamma)?;
        iterations += 1;
        debug!(iterations, stable, "policy iteration round");
    }

    if stable {
        info!(iterations, "policy iteration converged");
    } else {
        warn!(iterations, "policy iteration stopped before the policy was stable");
    }

    Ok((
        policy,
        value,
        Convergence {
            iterations,
            delta,
            converged: stable,
        },
    ))
}

#[derive(Clone)]
pub struct PolicyIteration {
    mdp: Rc<dyn Mdp>,
    gamma: Continous,
    sweep: Sweep,
    model: Option<Model>,
    pi: Vec<Discrete>,
    v: Vec<Continous>,
}

impl PolicyIteration {
    pub fn new(mdp: Rc<dyn Mdp>, gamma: Continous) -> Self {
        Self {
            mdp,
            gamma,
            sweep: Sweep::default(),
            model: None,
            pi: vec![],
            v: vec![],
        }
    }

    pub fn with_sweep(mut self, sweep: Sweep) -> Self {
        self.sweep = sweep;
        self
    }

    pub fn policy(&self) -> &[Discrete] {
        &self.pi
    }

    pub fn value(&self) -> &[Continous] {
        &self.v
    }
}

impl MdpSolver<bool> for PolicyIteration {
    fn v_star(&self, s: Discrete) -> Option<Continous> {
        self.v.get(s).copied()
    }

    fn q_star(&self, s: Discrete, a: Discrete) -> Option<Continous> {
        let model = self.model.as_ref()?;
        if s >= model.n_s() || a >= model.n_a() {
            return None;
        }

        Some(model.q_value(&self.v, self.gamma, s, a))
    }

    fn pi_star(&self, s: Discrete) -> Option<Discrete> {
        self.pi.get(s).copied()
    }

    /// Returns whether the policy became stable and the number of rounds run.
    fn exec(&mut self, theta: Continous, num_iterations: Option<usize>) -> MdpResult<(bool, usize)> {
        let model = Model::from_mdp(self.mdp.as_ref())?;
        let max_iterations = num_iterations.unwrap_or(DEFAULT_MAX_ITERATIONS);
        let (pi, v, convergence) = iterate(&model, self.gamma, theta, max_iterations, self.sweep)?;

        self.model = Some(model);
        self.pi = pi;
        self.v = v;

        Ok((convergence.converged, convergence.iterations))
    }
}
