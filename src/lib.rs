pub mod common;
pub mod config;
pub mod envs;
pub mod error;
pub mod mdps;
pub mod runner;

pub use common::defs::*;
pub use error::*;
