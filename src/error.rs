use crate::common::defs::*;

/// Errors raised by environments, solvers and configuration loading.
#[derive(thiserror::Error, Debug)]
pub enum MdpError {
    #[error("Invalid action: {action} (expected 0..{n_a})")]
    InvalidAction { action: Discrete, n_a: usize },

    #[error("{what} index {index} out of bounds (len {len})")]
    OutOfBounds {
        what: &'static str,
        index: usize,
        len: usize,
    },

    #[error("{what} has length {actual}, expected {expected}")]
    Shape {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Cannot sample: {0}")]
    Sampling(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type MdpResult<T> = Result<T, MdpError>;

pub(crate) fn check_index(what: &'static str, index: usize, len: usize) -> MdpResult<()> {
    if index < len {
        Ok(())
    } else {
        Err(MdpError::OutOfBounds { what, index, len })
    }
}
