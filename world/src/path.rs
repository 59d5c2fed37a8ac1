//! Immutable route travelled by enemies.

use std::collections::BTreeSet;

use tower_defence_core::{CellCoord, PathView, Vec2};

/// Ordered waypoints derived from grid cells, plus every cell the route crosses.
#[derive(Clone, Debug)]
pub(crate) struct Path {
    waypoints: Vec<Vec2>,
    cells: BTreeSet<CellCoord>,
}

impl Path {
    /// Builds the route through the centres of the provided cells.
    ///
    /// Callers validate that at least two cells are supplied.
    pub(crate) fn from_cells(cells: &[CellCoord], cell_size: f64) -> Self {
        let waypoints = cells.iter().map(|cell| cell.center(cell_size)).collect();

        let mut covered = BTreeSet::new();
        for pair in cells.windows(2) {
            rasterise_segment(pair[0], pair[1], &mut covered);
        }
        if let [only] = cells {
            let _ = covered.insert(*only);
        }

        Self {
            waypoints,
            cells: covered,
        }
    }

    pub(crate) fn view(&self) -> PathView<'_> {
        PathView::new(&self.waypoints)
    }

    pub(crate) fn start(&self) -> Vec2 {
        self.waypoints.first().copied().unwrap_or(Vec2::ZERO)
    }

    pub(crate) fn last_index(&self) -> usize {
        self.waypoints.len().saturating_sub(1)
    }

    pub(crate) fn contains_cell(&self, cell: CellCoord) -> bool {
        self.cells.contains(&cell)
    }

    pub(crate) fn cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.cells.iter().copied()
    }
}

/// Marks every cell crossed by the straight segment between two cells.
fn rasterise_segment(from: CellCoord, to: CellCoord, out: &mut BTreeSet<CellCoord>) {
    let mut column = i64::from(from.column());
    let mut row = i64::from(from.row());
    let end_column = i64::from(to.column());
    let end_row = i64::from(to.row());

    let delta_column = (end_column - column).abs();
    let delta_row = -(end_row - row).abs();
    let step_column = if column < end_column { 1 } else { -1 };
    let step_row = if row < end_row { 1 } else { -1 };
    let mut error = delta_column + delta_row;

    loop {
        // Both coordinates stay between the two non-negative endpoints.
        let _ = out.insert(CellCoord::new(column as u32, row as u32));
        if column == end_column && row == end_row {
            break;
        }

        let doubled = 2 * error;
        if doubled >= delta_row {
            error += delta_row;
            column += step_column;
        }
        if doubled <= delta_column {
            error += delta_column;
            row += step_row;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn waypoints_sit_on_cell_centres() {
        let path = Path::from_cells(&[CellCoord::new(0, 12), CellCoord::new(3, 12)], 50.0);
        let view = path.view();

        assert_eq!(view.len(), 2);
        assert_eq!(view.waypoint(0), Some(Vec2::new(25.0, 625.0)));
        assert_eq!(view.waypoint(1), Some(Vec2::new(175.0, 625.0)));
        assert_eq!(path.start(), Vec2::new(25.0, 625.0));
        assert_eq!(path.last_index(), 1);
    }

    #[test]
    fn straight_segments_cover_every_intermediate_cell() {
        let path = Path::from_cells(
            &[
                CellCoord::new(0, 2),
                CellCoord::new(3, 2),
                CellCoord::new(3, 0),
            ],
            10.0,
        );

        let cells: Vec<_> = path.cells().collect();
        assert_eq!(
            cells,
            vec![
                CellCoord::new(0, 2),
                CellCoord::new(1, 2),
                CellCoord::new(2, 2),
                CellCoord::new(3, 0),
                CellCoord::new(3, 1),
                CellCoord::new(3, 2),
            ]
        );
        assert!(!path.contains_cell(CellCoord::new(2, 1)));
    }

    #[test]
    fn diagonal_segments_are_connected() {
        let path = Path::from_cells(&[CellCoord::new(0, 0), CellCoord::new(3, 3)], 10.0);
        for step in 0..=3 {
            assert!(path.contains_cell(CellCoord::new(step, step)));
        }
    }
}
