pub mod frozen_lake;
pub mod grid_world;
#[cfg(test)]
pub mod simple_golf;

use crate::common::{defs::*, utils::*};
use crate::error::*;
use itertools::Itertools;
use ndarray::Array2;

/// A grid cell parsed from one character.
pub trait Tile: Copy + PartialEq {
    /// Cell text for the agent's position when rendering.
    const AGENT: &'static str;

    fn from_symbol(c: char) -> Option<Self>;

    /// Cell text when rendering.
    fn glyph(&self) -> &'static str;

    fn is_start(&self) -> bool;
}

/// Parses rows of symbols into a rectangular grid.
pub fn parse_grid<T: Tile, S: AsRef<str>>(rows: &[S]) -> MdpResult<Array2<T>> {
    let n_rows = rows.len();
    let n_cols = rows.first().map_or(0, |r| r.as_ref().chars().count());
    if n_rows == 0 || n_cols == 0 {
        return Err(MdpError::Config("grid is empty".into()));
    }

    let mut cells = Vec::with_capacity(n_rows * n_cols);
    for (i, row) in rows.iter().enumerate() {
        let row = row.as_ref();
        if row.chars().count() != n_cols {
            return Err(MdpError::Config(format!(
                "row {i} has {} cells, expected {n_cols}",
                row.chars().count()
            )));
        }

        for c in row.chars() {
            let tile = T::from_symbol(c)
                .ok_or_else(|| MdpError::Config(format!("unknown symbol '{c}' in row {i}")))?;
            cells.push(tile);
        }
    }

    Array2::from_shape_vec((n_rows, n_cols), cells).map_err(|e| MdpError::Config(e.to_string()))
}

/// Uniform distribution over the start cells, with no mass on the absorbing state.
pub fn start_distribution<T: Tile>(grid: &Array2<T>) -> MdpResult<Vec<Continous>> {
    let starts = grid.iter().filter(|t| t.is_start()).count();
    if starts == 0 {
        return Err(MdpError::Config("grid has no start cell".into()));
    }

    Ok(grid
        .iter()
        .map(|t| if t.is_start() { 1. / starts as Continous } else { 0. })
        .chain([0.])
        .collect())
}

pub(crate) fn render_grid<T: Tile>(
    name: &str,
    grid: &Array2<T>,
    state: Discrete,
    policy: Option<&[Discrete]>,
    value: Option<&[Continous]>,
) -> MdpResult<String> {
    let (_, cols) = grid.dim();
    let n_s = grid.len() + 1;

    let mut out = format!("{name}:\n");
    for (r, row) in grid.outer_iter().enumerate() {
        let line = row
            .iter()
            .enumerate()
            .map(|(c, t)| {
                if position_to_index(r, c, cols) == state {
                    T::AGENT
                } else {
                    t.glyph()
                }
            })
            .join(" ");
        out.push_str(&line);
        out.push('\n');
    }

    if let Some(policy) = policy {
        check_len("policy", policy.len(), n_s)?;
        out.push_str("Policy:\n");
        for row in policy[..n_s - 1].chunks(cols) {
            out.push_str(&row.iter().map(|&a| action_label(a)).join(" "));
            out.push('\n');
        }
    }

    if let Some(value) = value {
        check_len("value", value.len(), n_s)?;
        out.push_str("Value:\n");
        for row in value[..n_s - 1].chunks(cols) {
            out.push_str(&row.iter().map(|v| format!("{v:.3}")).join(" "));
            out.push('\n');
        }
    }

    Ok(out)
}

fn check_len(what: &'static str, actual: usize, expected: usize) -> MdpResult<()> {
    if actual == expected {
        Ok(())
    } else {
        Err(MdpError::Shape {
            what,
            expected,
            actual,
        })
    }
}
