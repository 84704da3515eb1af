mod common;
pub mod policy_iteration;
pub mod value_iteration;

pub use common::{Convergence, Sweep, DEFAULT_MAX_ITERATIONS};
pub use policy_iteration::*;
pub use value_iteration::*;
