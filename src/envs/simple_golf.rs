use crate::mdps::mdp::*;
use crate::{common::defs::*, error::*};
use ndarray::Array3;

/// https://towardsdatascience.com/reinforcement-learning-an-easy-introduction-to-value-iteration-e4cfe0731fd5
///
/// States: 0 fairway, 1 green, 2 in the hole (absorbing). Unlisted
/// `(state, action)` pairs leave the ball where it is.
pub struct SimpleGolf {
    p: Array3<Continous>,
    r: Array3<Continous>,
}

impl SimpleGolf {
    pub fn new() -> Self {
        let transitions = [
            ((0, 0), vec![(1, 0.9, 0.), (0, 0.1, 0.)]),
            ((1, 1), vec![(0, 0.9, 0.), (1, 0.1, 0.)]),
            ((1, 2), vec![(2, 0.9, 10.), (1, 0.1, 0.)]),
        ];

        let (n_s, n_a) = (3, 3);
        let mut p = Array3::zeros((n_s, n_a, n_s));
        let mut r = Array3::zeros((n_s, n_a, n_s));
        for s in 0..n_s {
            for a in 0..n_a {
                p[[s, a, s]] = 1.;
            }
        }

        for ((s, a), ts) in transitions {
            p[[s, a, s]] = 0.;
            for (ns, prob, reward) in ts {
                p[[s, a, ns]] = prob;
                r[[s, a, ns]] = reward;
            }
        }

        Self { p, r }
    }
}

impl Mdp for SimpleGolf {
    fn n_s(&self) -> usize {
        self.p.dim().0
    }

    fn n_a(&self) -> usize {
        self.p.dim().1
    }

    fn p(&self, next_state: Discrete, state: Discrete, action: Discrete) -> MdpResult<Continous> {
        check_query(next_state, state, action, self.n_s(), self.n_a())?;
        Ok(self.p[[state, action, next_state]])
    }

    fn r(&self, next_state: Discrete, state: Discrete, action: Discrete) -> MdpResult<Continous> {
        check_query(next_state, state, action, self.n_s(), self.n_a())?;
        Ok(self.r[[state, action, next_state]])
    }
}
