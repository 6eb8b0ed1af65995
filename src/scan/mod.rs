use crate::grid::PixelGrid;
use std::iter::Rev;
use std::ops::Range;

/// Returns the `(row, col)` coordinates of the raster position `idx`.
///
/// # Panics
///
/// Panics if `idx` is outside the grid.
pub fn to_coords(idx: usize, grid: &PixelGrid) -> (usize, usize) {
    assert!(idx < grid.len());
    (idx / grid.cols(), idx % grid.cols())
}

/// Returns the raster position of `(row, col)`.
///
/// # Panics
///
/// Panics if the coordinates are outside the grid.
pub fn to_linear(row: usize, col: usize, grid: &PixelGrid) -> usize {
    assert!(row < grid.rows() && col < grid.cols());
    row * grid.cols() + col
}

/// Returns the number of raster positions visited by every scheme.
///
/// The scan stops at `to_linear(rows - 1, cols - 1)`, so the last pixel of
/// the grid is never visited.
pub fn scan_len(grid: &PixelGrid) -> usize {
    if grid.is_empty() {
        return 0;
    }
    to_linear(grid.rows() - 1, grid.cols() - 1, grid)
}

/// Returns the previously visited positions searched for position `idx`,
/// nearest first, given a window of `window` pixels.
///
/// The window covers `idx - 1` down to `max(0, idx - window - 1) + 1`, so
/// position 0 is never part of a window.
pub fn history_window(idx: usize, window: usize) -> Rev<Range<usize>> {
    let stop = if idx > window { idx - window - 1 } else { 0 };
    (stop + 1..idx.max(stop + 1)).rev()
}

#[cfg(test)]
mod test {
    use super::{history_window, scan_len, to_coords, to_linear};
    use crate::grid::PixelGrid;

    #[test]
    fn test_coords_round_trip() {
        let grid = PixelGrid::filled(7, 23, [0, 0, 0]);
        assert_eq!(to_coords(0, &grid), (0, 0));
        assert_eq!(to_coords(22, &grid), (0, 22));
        assert_eq!(to_coords(23, &grid), (1, 0));
        assert_eq!(to_coords(5 * 23 + 8, &grid), (5, 8));

        for idx in 0..grid.len() {
            let (row, col) = to_coords(idx, &grid);
            assert_eq!(to_linear(row, col, &grid), idx);
        }
    }

    #[test]
    #[should_panic]
    fn test_coords_out_of_bounds() {
        let grid = PixelGrid::filled(4, 5, [0, 0, 0]);
        to_coords(20, &grid);
    }

    #[test]
    #[should_panic]
    fn test_linear_out_of_bounds() {
        let grid = PixelGrid::filled(4, 5, [0, 0, 0]);
        to_linear(0, 5, &grid);
    }

    #[test]
    fn test_scan_len_skips_last_pixel() {
        assert_eq!(scan_len(&PixelGrid::filled(4, 5, [0, 0, 0])), 19);
        assert_eq!(scan_len(&PixelGrid::filled(1, 4, [0, 0, 0])), 3);
        assert_eq!(scan_len(&PixelGrid::filled(1, 1, [0, 0, 0])), 0);
        assert_eq!(scan_len(&PixelGrid::filled(0, 3, [0, 0, 0])), 0);
    }

    #[test]
    fn test_history_window() {
        let window: Vec<usize> = history_window(10, 4).collect();
        assert_eq!(window, vec![9, 8, 7, 6]);

        // Position 0 is never searched.
        let window: Vec<usize> = history_window(5, 4).collect();
        assert_eq!(window, vec![4, 3, 2, 1]);
        let window: Vec<usize> = history_window(3, 4).collect();
        assert_eq!(window, vec![2, 1]);

        assert_eq!(history_window(1, 4).count(), 0);
        assert_eq!(history_window(0, 4).count(), 0);
        assert_eq!(history_window(6, 1).collect::<Vec<_>>(), vec![5]);
    }
}
