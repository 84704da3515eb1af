use super::mdp_solver::*;
use crate::common::defs::*;
use std::rc::Rc;

pub struct MdpSolverPolicy<T> {
    pub mdp_solver: Rc<dyn MdpSolver<T>>,
}

impl<T> Policy for MdpSolverPolicy<T> {
    fn policy(&self, s: Discrete) -> Option<Discrete> {
        self.mdp_solver.pi_star(s)
    }
}
