use crate::config::*;
use crate::envs::{frozen_lake::FrozenLake, grid_world::GridWorld};
use crate::mdps::{
    mdp::*, mdp_simulator::*, mdp_solver::MdpSolver, mdp_solver_policy::MdpSolverPolicy,
    solvers::*,
};
use crate::{common::defs::*, error::*};
use clap::ValueEnum;
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::rc::Rc;
use tracing::info;

/// Built-in grids selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    SmallLake,
    BigLake,
    Grid,
}

impl Preset {
    pub fn env_config(self, slip: Continous, max_steps: usize, seed: Option<u64>) -> EnvConfig {
        let rows = |rows: &[&str]| rows.iter().map(|r| r.to_string()).collect::<Vec<_>>();
        match self {
            Preset::SmallLake => EnvConfig::FrozenLake {
                lake: rows(&FrozenLake::SMALL_LAKE),
                slip,
                max_steps,
                seed,
            },
            Preset::BigLake => EnvConfig::FrozenLake {
                lake: rows(&FrozenLake::BIG_LAKE),
                slip,
                max_steps,
                seed,
            },
            Preset::Grid => EnvConfig::GridWorld {
                grid: rows(&GridWorld::DEFAULT_GRID),
                max_steps,
                seed,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Algorithm {
    PolicyIteration,
    ValueIteration,
    Both,
}

impl Algorithm {
    fn runs_policy_iteration(self) -> bool {
        matches!(self, Algorithm::PolicyIteration | Algorithm::Both)
    }

    fn runs_value_iteration(self) -> bool {
        matches!(self, Algorithm::ValueIteration | Algorithm::Both)
    }
}

/// Command-line values that take precedence over the loaded [`SolverConfig`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SolverOverrides {
    pub gamma: Option<Continous>,
    pub theta: Option<Continous>,
    pub max_iterations: Option<usize>,
}

impl SolverOverrides {
    pub fn apply(&self, solver: &mut SolverConfig) {
        if let Some(gamma) = self.gamma {
            solver.gamma = gamma;
        }
        if let Some(theta) = self.theta {
            solver.theta = theta;
        }
        if let Some(max_iterations) = self.max_iterations {
            solver.max_iterations = max_iterations;
        }
    }
}

/// What `--save` writes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    pub gamma: Continous,
    pub policy: Vec<Discrete>,
    pub value: Vec<Continous>,
}

impl Solution {
    pub fn save<P: AsRef<Path>>(&self, path: P) -> MdpResult<()> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> MdpResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Outcome of one solver.
pub struct Report {
    pub title: &'static str,
    pub converged: bool,
    pub iterations: usize,
    /// Grid with the policy and value overlaid.
    pub rendered: String,
    pub solution: Solution,
    solver: Rc<dyn MdpSolver<bool>>,
}

impl Report {
    pub fn policy(&self) -> MdpSolverPolicy<bool> {
        MdpSolverPolicy {
            mdp_solver: Rc::clone(&self.solver),
        }
    }
}

/// One greedy episode and the grid as it was left.
pub struct Playback {
    pub events: Vec<EpisodeEvent>,
    pub rendered: String,
}

impl Playback {
    pub fn total_reward(&self) -> Continous {
        self.events.iter().map(|e| e.r).sum()
    }
}

/// Builds the configured environment, solves it and optionally plays one
/// episode with the last solution.
pub fn run(
    config: &Config,
    algorithm: Algorithm,
    play: bool,
    seed: Option<u64>,
) -> MdpResult<(Vec<Report>, Option<Playback>)> {
    info!(?config, ?algorithm, "solving");
    match &config.env {
        EnvConfig::FrozenLake {
            lake,
            slip,
            max_steps,
            ..
        } => run_env(FrozenLake::new(lake, *slip, *max_steps)?, &config.solver, algorithm, play, seed),
        EnvConfig::GridWorld {
            grid, max_steps, ..
        } => run_env(GridWorld::new(grid, *max_steps)?, &config.solver, algorithm, play, seed),
    }
}

fn run_env<E>(
    env: E,
    solver: &SolverConfig,
    algorithm: Algorithm,
    play: bool,
    seed: Option<u64>,
) -> MdpResult<(Vec<Report>, Option<Playback>)>
where
    E: Environment + Clone + 'static,
{
    let mdp = Rc::new(env.clone()) as Rc<dyn Mdp>;
    let SolverConfig {
        gamma,
        theta,
        max_iterations,
        sweep,
    } = *solver;

    let mut reports = vec![];
    if algorithm.runs_policy_iteration() {
        let mut pi = PolicyIteration::new(Rc::clone(&mdp), gamma).with_sweep(sweep);
        let (converged, iterations) = pi.exec(theta, Some(max_iterations))?;
        let rendered = env.render(Some(pi.policy()), Some(pi.value()))?;
        let solution = Solution {
            gamma,
            policy: pi.policy().to_vec(),
            value: pi.value().to_vec(),
        };
        reports.push(Report {
            title: "Policy iteration",
            converged,
            iterations,
            rendered,
            solution,
            solver: Rc::new(pi),
        });
    }

    if algorithm.runs_value_iteration() {
        let mut vi = ValueIteration::new(Rc::clone(&mdp), gamma).with_sweep(sweep);
        let (converged, iterations) = vi.exec(theta, Some(max_iterations))?;
        let rendered = env.render(Some(vi.policy()), Some(vi.value()))?;
        let solution = Solution {
            gamma,
            policy: vi.policy().to_vec(),
            value: vi.value().to_vec(),
        };
        reports.push(Report {
            title: "Value iteration",
            converged,
            iterations,
            rendered,
            solution,
            solver: Rc::new(vi),
        });
    }

    let playback = match reports.last() {
        Some(report) if play => {
            let rng = &mut seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
            let env = &mut env.clone();
            let events = run_episode(env, &report.policy(), rng)?;
            let rendered = env.render(None, None)?;
            Some(Playback { events, rendered })
        }
        _ => None,
    };

    Ok((reports, playback))
}
