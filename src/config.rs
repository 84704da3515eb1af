use crate::common::defs::*;
use crate::error::*;
use crate::mdps::solvers::{Sweep, DEFAULT_MAX_ITERATIONS};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Slip probability used when a lake does not give one.
pub const DEFAULT_SLIP: Continous = 0.1;

pub const DEFAULT_MAX_STEPS: usize = 100;

fn default_slip() -> Continous {
    DEFAULT_SLIP
}

fn default_max_steps() -> usize {
    DEFAULT_MAX_STEPS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub gamma: Continous,
    pub theta: Continous,
    pub max_iterations: usize,
    pub sweep: Sweep,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            gamma: 0.9,
            theta: 1e-4,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            sweep: Sweep::InPlace,
        }
    }
}

/// Which grid to build. Grids are rows of single-character symbols.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EnvConfig {
    FrozenLake {
        lake: Vec<String>,
        #[serde(default = "default_slip")]
        slip: Continous,
        #[serde(default = "default_max_steps")]
        max_steps: usize,
        #[serde(default)]
        seed: Option<u64>,
    },
    GridWorld {
        grid: Vec<String>,
        #[serde(default = "default_max_steps")]
        max_steps: usize,
        #[serde(default)]
        seed: Option<u64>,
    },
}

impl EnvConfig {
    pub fn seed(&self) -> Option<u64> {
        match self {
            EnvConfig::FrozenLake { seed, .. } | EnvConfig::GridWorld { seed, .. } => *seed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub env: EnvConfig,
    #[serde(default)]
    pub solver: SolverConfig,
}

impl Config {
    pub fn from_json_str(s: &str) -> MdpResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> MdpResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}
