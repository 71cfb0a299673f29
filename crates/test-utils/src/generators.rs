//! Generators for synthetic packed ABI data.
//!
//! ABI products store most variables as 16-bit integers with a
//! `scale_factor`/`add_offset` pair. These helpers create predictable stored
//! values so tests can compute the expected physical values by hand.

/// Creates a grid of stored values where `grid[row][col] == row * width + col`,
/// wrapping at the `i16` range.
///
/// ```
/// use test_utils::create_index_grid;
///
/// let grid = create_index_grid(4, 2);
/// assert_eq!(grid, vec![0, 1, 2, 3, 4, 5, 6, 7]);
/// ```
pub fn create_index_grid(width: usize, height: usize) -> Vec<i16> {
    (0..width * height).map(|i| i as i16).collect()
}

/// Creates a grid whose stored values cover the upper half of the unsigned
/// 16-bit range, i.e. values that read as negative `i16`.
///
/// Cell `i` stores `-(i as i16) - 2`, so the first cell is `-2` (65534 once
/// reinterpreted) and `-1` is never produced; that value is left for fill.
pub fn create_high_unsigned_grid(width: usize, height: usize) -> Vec<i16> {
    (0..width * height).map(|i| -(i as i16) - 2).collect()
}

/// Replaces the stored value at each `(col, row)` with `fill`.
pub fn with_fill(
    mut grid: Vec<i16>,
    width: usize,
    fill: i16,
    fill_positions: &[(usize, usize)],
) -> Vec<i16> {
    for &(col, row) in fill_positions {
        if let Some(cell) = grid.get_mut(row * width + col) {
            *cell = fill;
        }
    }
    grid
}

/// Physical value of a stored 16-bit integer, the way CF decoding does it.
pub fn unpack(stored: i16, scale_factor: f64, add_offset: f64, unsigned: bool) -> f64 {
    let raw = if unsigned {
        stored as u16 as f64
    } else {
        stored as f64
    };
    raw * scale_factor + add_offset
}

/// Evenly spaced axis of `n` values from `first` to `last` inclusive.
pub fn linspace(first: f64, last: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![first],
        _ => {
            let step = (last - first) / (n - 1) as f64;
            (0..n).map(|i| first + step * i as f64).collect()
        }
    }
}
