use crate::{common::defs::*, error::*};

pub trait MdpSolver<T> {
    fn v_star(&self, s: Discrete) -> Option<Continous>;

    fn q_star(&self, s: Discrete, a: Discrete) -> Option<Continous>;

    fn pi_star(&self, s: Discrete) -> Option<Discrete>;

    /// Solves the MDP, returning the solver's outcome and the number of iterations it took.
    fn exec(&mut self, theta: Continous, num_iterations: Option<usize>) -> MdpResult<(T, usize)>;
}
