use ndarray::{Array1, Array2};
use tabular_dp::mdps::mdp::Mdp;
use tabular_dp::*;

#[allow(dead_code)]
pub fn q_value<M: Mdp>(env: &M, value: &[Continous], gamma: Continous, s: Discrete, a: Discrete) -> Continous {
    (0..env.n_s())
        .map(|ns| env.p(ns, s, a).unwrap() * (env.r(ns, s, a).unwrap() + gamma * value[ns]))
        .sum()
}

/// Builds `(I - γ Pπ, Rπ)` so that `vπ` solves `(I - γ Pπ) v = Rπ`.
#[allow(dead_code)]
pub fn policy_system<M: Mdp>(env: &M, policy: &[Discrete], gamma: Continous) -> (Array2<f64>, Array1<f64>) {
    let n = env.n_s();
    let mut a = Array2::<f64>::eye(n);
    let mut b = Array1::<f64>::zeros(n);
    for s in 0..n {
        for ns in 0..n {
            let p = env.p(ns, s, policy[s]).unwrap();
            a[[s, ns]] -= gamma * p;
            b[s] += p * env.r(ns, s, policy[s]).unwrap();
        }
    }

    (a, b)
}

/// Gaussian elimination with partial pivoting.
#[allow(dead_code)]
pub fn solve_linear(mut a: Array2<f64>, mut b: Array1<f64>) -> Array1<f64> {
    let n = b.len();
    for col in 0..n {
        let pivot = (col..n)
            .max_by(|&i, &j| a[[i, col]].abs().total_cmp(&a[[j, col]].abs()))
            .unwrap();
        assert!(a[[pivot, col]].abs() > 1e-12, "singular system");
        if pivot != col {
            for k in 0..n {
                a.swap([col, k], [pivot, k]);
            }
            b.swap(col, pivot);
        }

        for row in (col + 1)..n {
            let f = a[[row, col]] / a[[col, col]];
            for k in col..n {
                a[[row, k]] -= f * a[[col, k]];
            }
            b[row] -= f * b[col];
        }
    }

    let mut x = Array1::<f64>::zeros(n);
    for row in (0..n).rev() {
        let tail: f64 = ((row + 1)..n).map(|k| a[[row, k]] * x[k]).sum();
        x[row] = (b[row] - tail) / a[[row, row]];
    }

    x
}

#[allow(dead_code)]
pub fn assert_kernel_is_stochastic<M: Mdp>(env: &M) {
    for s in 0..env.n_s() {
        for a in 0..env.n_a() {
            let total: f64 = (0..env.n_s()).map(|ns| env.p(ns, s, a).unwrap()).sum();
            assert!((total - 1.).abs() <= 1e-9, "P(.|{s}, {a}) sums to {total}");
        }
    }
}

#[allow(dead_code)]
pub fn assert_absorbing<M: Mdp>(env: &M) {
    let sink = env.absorbing_state();
    for a in 0..env.n_a() {
        assert_eq!(env.p(sink, sink, a).unwrap(), 1.);
        for ns in 0..env.n_s() {
            assert_eq!(env.r(ns, sink, a).unwrap(), 0.);
        }
    }
}

#[allow(dead_code)]
pub fn assert_no_reward_without_probability<M: Mdp>(env: &M) {
    for s in 0..env.n_s() {
        for a in 0..env.n_a() {
            for ns in 0..env.n_s() {
                if env.p(ns, s, a).unwrap() == 0. {
                    assert_eq!(env.r(ns, s, a).unwrap(), 0., "R({ns} | {s}, {a})");
                }
            }
        }
    }
}
