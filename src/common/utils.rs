use super::defs::*;

/// Row-major flattening of a grid cell.
pub fn position_to_index(row: usize, col: usize, columns: usize) -> Discrete {
    row * columns + col
}

/// Inverse of [`position_to_index`].
pub fn index_to_position(index: Discrete, columns: usize) -> (usize, usize) {
    (index / columns, index % columns)
}

/// Applies `delta` to `(row, col)`, returning `None` when the result leaves the grid.
pub fn offset(
    (row, col): (usize, usize),
    delta: (isize, isize),
    rows: usize,
    columns: usize,
) -> Option<(usize, usize)> {
    let r = row.checked_add_signed(delta.0)?;
    let c = col.checked_add_signed(delta.1)?;
    if r < rows && c < columns {
        Some((r, c))
    } else {
        None
    }
}

pub fn action_label(a: Discrete) -> char {
    ACTION_LABELS.get(a).copied().unwrap_or('?')
}
