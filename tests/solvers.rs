extern crate assertor;
extern crate float_eq;
extern crate tabular_dp;
mod common;

use assertor::*;
use common::*;
use float_eq::*;
use itertools::Itertools;
use tabular_dp::envs::{frozen_lake::*, grid_world::*};
use tabular_dp::mdps::{mdp::*, solvers::*};
use tabular_dp::*;

const SMALL_LAKE_POLICY: [Discrete; 17] = [1, 3, 1, 2, 1, 0, 1, 0, 3, 1, 1, 0, 0, 3, 3, 0, 0];

fn small_lake(slip: f64) -> FrozenLake {
    FrozenLake::new(&FrozenLake::SMALL_LAKE, slip, 100).unwrap()
}

#[test]
fn evaluation_of_always_up_without_discount() {
    let env = small_lake(0.);
    let policy: Vec<Discrete> = vec![0; env.n_s()];
    let (v, c) = policy_evaluation(&env, &policy, 1., 1e-4, 1000).unwrap();

    // Only the goal, which drains into the sink with reward 1, has value.
    let mut expected = vec![0.; 17];
    expected[15] = 1.;
    assert_float_eq!(v, expected, abs_all <= 1e-9);
    assert!(c.converged);
    assert_eq!(c.iterations, 2);

    // It is a solution of v = Rπ + Pπ v.
    let (a, b) = policy_system(&env, &policy, 1.);
    let residual = a.dot(&ndarray::Array1::from(v)) - b;
    assert!(residual.iter().all(|x| x.abs() < 1e-9));
}

#[test]
fn evaluation_matches_linear_solution() {
    for (slip, policy) in [
        (0., vec![0usize; 17]),
        (0.1, vec![0; 17]),
        (0.1, SMALL_LAKE_POLICY.to_vec()),
        (0.5, vec![3, 1, 2, 0, 3, 1, 2, 0, 3, 1, 2, 0, 3, 1, 2, 0, 0]),
    ] {
        let env = small_lake(slip);
        let (v, c) = policy_evaluation(&env, &policy, 0.9, 1e-12, 10000).unwrap();
        let (a, b) = policy_system(&env, &policy, 0.9);
        let exact = solve_linear(a, b);

        assert!(c.converged);
        assert_float_eq!(v, exact.to_vec(), abs_all <= 1e-9);
    }
}

#[test]
fn slippery_lake_end_to_end() {
    let env = small_lake(0.1);
    let (pi, v, c) = policy_iteration(&env, 0.9, 1e-4, 128).unwrap();

    assert!(c.converged);
    assert!(c.iterations < 20);
    assert_eq!(pi, SMALL_LAKE_POLICY.to_vec());
    assert!(v[0] > 0. && v[0] < 1.);
    assert_float_eq!(v[0], 0.4547, abs <= 1e-3);
    // From the start the agent heads down or right, towards the goal.
    assert_that!(vec![1usize, 3]).contains(pi[0]);
}

#[test]
fn policy_and_value_iteration_agree() {
    let lakes: [&[&str]; 2] = [&FrozenLake::SMALL_LAKE, &FrozenLake::BIG_LAKE];
    for lake in lakes {
        let env = FrozenLake::new(lake, 0.1, 100).unwrap();
        let theta = 1e-8;
        let (pi_p, v_p, c_p) = policy_iteration(&env, 0.9, theta, 1000).unwrap();
        let (pi_v, v_v, c_v) = value_iteration(&env, 0.9, theta, 1000).unwrap();

        assert!(c_p.converged && c_v.converged);
        assert_float_eq!(v_p.clone(), v_v.clone(), abs_all <= 1e-6);

        // Equal policies up to ties between equally good actions.
        for (s, (&a_p, &a_v)) in pi_p.iter().zip_eq(&pi_v).enumerate() {
            let q_p = q_value(&env, &v_p, 0.9, s, a_p);
            let q_v = q_value(&env, &v_p, 0.9, s, a_v);
            assert_float_eq!(q_p, q_v, abs <= 1e-6, "state {}", s);
        }
    }
}

#[test]
fn improvement_of_optimal_value_is_stable() {
    let env = small_lake(0.1);
    let (pi, v, _) = value_iteration(&env, 0.9, 1e-10, 1000).unwrap();
    let (improved, stable) = policy_improvement(&env, &pi, &v, 0.9).unwrap();

    assert!(stable);
    assert_eq!(improved, pi);
}

#[test]
fn synchronous_sweep_reaches_the_same_fixed_point_more_slowly() {
    let env = small_lake(0.1);
    let (pi_a, v_a, c_a) = value_iteration_with(&env, 0.9, 1e-8, 1000, Sweep::InPlace).unwrap();
    let (pi_b, v_b, c_b) = value_iteration_with(&env, 0.9, 1e-8, 1000, Sweep::Synchronous).unwrap();

    assert_eq!(pi_a, pi_b);
    assert_float_eq!(v_a, v_b, abs_all <= 1e-6);
    assert_eq!(c_a.iterations, 16);
    assert_eq!(c_b.iterations, 22);
}

#[test]
fn reward_grid_prefers_positive_goal() {
    let env = GridWorld::new(&GridWorld::DEFAULT_GRID, 30).unwrap();
    let (pi, v, c) = value_iteration(&env, 0.9, 1e-8, 1000).unwrap();

    assert!(c.converged);
    // (3, 2) leads into +1, (2, 2) leads into -1.
    assert!(v[14] > v[10]);
    assert_float_eq!(
        v,
        vec![
            0.59049, 0.6561, 0.729, 0.6561, 0.6561, 0., 0.81, 0., 0.729, 0.81, 0.9, 0., 0., 0.9,
            1., 0., 0.
        ],
        abs_all <= 1e-9
    );
    assert_eq!(pi, SMALL_LAKE_POLICY.to_vec());
    assert_never_enters_negative_goal(&env, &pi);
}

#[test]
fn undiscounted_reward_grid() {
    // The cell next to -1 is walled off from +1.
    let env = GridWorld::new(&["$.&#.£"], 30).unwrap();
    let (pi, v, c) = value_iteration(&env, 1., 1e-8, 1000).unwrap();

    assert!(c.converged);
    assert!(v[1] > v[4]);
    assert_float_eq!(v[1], 1., abs <= 1e-12);
    assert_float_eq!(v[4], 0., abs <= 1e-12);
    assert_never_enters_negative_goal(&env, &pi);
}

#[test]
fn policy_iteration_cycles_without_discount() {
    let env = GridWorld::new(&["$.&#.£"], 30).unwrap();
    let (_, _, c) = policy_iteration(&env, 1., 1e-8, 10).unwrap();

    assert!(!c.converged);
    assert_eq!(c.iterations, 10);
}

#[test]
fn value_iteration_reports_the_cap() {
    let env = FrozenLake::new(&FrozenLake::BIG_LAKE, 0.1, 100).unwrap();
    let (pi, v, c) = value_iteration(&env, 0.9, 1e-8, 2).unwrap();

    assert!(!c.converged);
    assert_eq!(c.iterations, 2);
    assert_eq!(pi.len(), 65);
    assert_eq!(v.len(), 65);
}

fn assert_never_enters_negative_goal(env: &GridWorld, pi: &[Discrete]) {
    let negative = (0..env.n_s())
        .filter(|&s| env.tile(s) == Some(GridTile::NegativeGoal))
        .collect::<Vec<_>>();
    assert!(!negative.is_empty());

    for s in (0..env.n_s()).filter(|&s| !negative.contains(&s)) {
        for &g in &negative {
            assert_eq!(env.p(g, s, pi[s]).unwrap(), 0., "state {s} steps into {g}");
        }
    }
}
