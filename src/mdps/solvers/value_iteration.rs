use super::common::*;
use super::policy_iteration::improve;
use crate::mdps::{mdp::Mdp, mdp_solver::MdpSolver};
use crate::{common::defs::*, error::*};
use std::rc::Rc;
use tracing::info;

/// Bellman optimality sweeps from an all-zero value array, followed by one
/// greedy improvement pass to read off the policy.
pub fn value_iteration<M: Mdp + ?Sized>(
    env: &M,
    gamma: Continous,
    theta: Continous,
    max_iterations: usize,
) -> MdpResult<(Vec<Discrete>, Vec<Continous>, Convergence)> {
    value_iteration_with(env, gamma, theta, max_iterations, Sweep::InPlace)
}

pub fn value_iteration_with<M: Mdp + ?Sized>(
    env: &M,
    gamma: Continous,
    theta: Continous,
    max_iterations: usize,
    sweep: Sweep,
) -> MdpResult<(Vec<Discrete>, Vec<Continous>, Convergence)> {
    let model = Model::from_mdp(env)?;
    iterate(&model, gamma, theta, max_iterations, sweep)
}

fn iterate(
    model: &Model,
    gamma: Continous,
    theta: Continous,
    max_iterations: usize,
    sweep: Sweep,
) -> MdpResult<(Vec<Discrete>, Vec<Continous>, Convergence)> {
    let (value, convergence) = converge(
        "value_iteration",
        model.n_s(),
        theta,
        max_iterations,
        sweep,
        |s, v| model.greedy(v, gamma, s).1,
    );
    let (policy, _) = improve(model, &vec![0; model.n_s()], &value, gamma)?;

    if convergence.converged {
        info!(iterations = convergence.iterations, "value iteration converged");
    }

    Ok((policy, value, convergence))
}

#[derive(Clone)]
pub struct ValueIteration {
    mdp: Rc<dyn Mdp>,
    gamma: Continous,
    sweep: Sweep,
    model: Option<Model>,
    pi: Vec<Discrete>,
    v: Vec<Continous>,
}

impl ValueIteration {
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

impl MdpSolver<bool> for ValueIteration {
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

    /// Returns whether `delta < theta` was reached and the number of sweeps run.
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
