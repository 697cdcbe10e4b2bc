use super::{CellSelector, ScanOrder};
use crate::grid::Cell;
use crate::wave::WaveGrid;

/// Minimum-remaining-values selection: the uncollapsed cell with the fewest
/// candidates, ties going to the first cell in `scan_order`.
///
/// Single-candidate cells are the minimum and are therefore returned before
/// anything else, so they get committed instead of lingering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MinimumRemainingValues {
    pub scan_order: ScanOrder,
}

impl MinimumRemainingValues {
    pub fn new(scan_order: ScanOrder) -> Self {
        Self { scan_order }
    }
}

impl CellSelector for MinimumRemainingValues {
    fn select_next_cell(&self, grid: &WaveGrid) -> Option<(usize, usize)> {
        let mut best: Option<((usize, usize), usize)> = None;
        for (x, y) in self.scan_order.coordinates(grid.width(), grid.height()) {
            let Some(Cell::Uncollapsed(domain)) = grid.cell(x, y) else {
                continue;
            };
            let size = domain.count_ones();
            if best.map_or(true, |(_, lowest)| size < lowest) {
                best = Some(((x, y), size));
                if size <= 1 {
                    break;
                }
            }
        }
        best.map(|(coords, _)| coords)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{force_collapse, BoundaryMode, SingletonPropagator};
    use wfc_rules::{TileDefinition, TileEdges, TileId};

    fn roads(width: usize, height: usize) -> WaveGrid {
        WaveGrid::from_definitions(
            width,
            height,
            vec![
                TileDefinition::new("blank", 1.0, TileEdges::uniform("grass")),
                TileDefinition::new(
                    "horizontal road",
                    0.001,
                    TileEdges::new("grass", "road", "grass", "road"),
                ),
                TileDefinition::new(
                    "vertical road",
                    0.001,
                    TileEdges::new("road", "grass", "road", "grass"),
                ),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_fresh_grid_ties_break_by_scan_order() {
        let grid = roads(3, 3);
        assert_eq!(
            MinimumRemainingValues::default().select_next_cell(&grid),
            Some((0, 0))
        );
        assert_eq!(
            MinimumRemainingValues::new(ScanOrder::ColumnMajor).select_next_cell(&grid),
            Some((0, 0))
        );
    }

    #[test]
    fn test_prefers_smallest_domain() {
        let mut grid = roads(3, 3);
        let propagator = SingletonPropagator::new(BoundaryMode::Clamped);
        // Blank in the middle narrows its four neighbors to two candidates.
        force_collapse(&mut grid, 1, 1, TileId(0), &propagator).unwrap();
        assert_eq!(
            MinimumRemainingValues::new(ScanOrder::RowMajor).select_next_cell(&grid),
            Some((1, 0))
        );
        assert_eq!(
            MinimumRemainingValues::new(ScanOrder::ColumnMajor).select_next_cell(&grid),
            Some((0, 1))
        );
    }

    #[test]
    fn test_none_when_complete() {
        let mut grid = roads(2, 1);
        let propagator = SingletonPropagator::default();
        force_collapse(&mut grid, 0, 0, TileId(1), &propagator).unwrap();
        assert!(grid.is_complete());
        assert_eq!(MinimumRemainingValues::default().select_next_cell(&grid), None);
    }

    #[test]
    fn test_singleton_domain_is_selected() {
        let grid = WaveGrid::from_definitions(
            2,
            2,
            vec![TileDefinition::new("only", 1.0, TileEdges::uniform("a"))],
        )
        .unwrap();
        assert_eq!(
            MinimumRemainingValues::default().select_next_cell(&grid),
            Some((0, 0))
        );
    }

    #[test]
    fn test_scan_order_coordinates() {
        let row: Vec<_> = ScanOrder::RowMajor.coordinates(2, 2).collect();
        assert_eq!(row, vec![(0, 0), (1, 0), (0, 1), (1, 1)]);
        let column: Vec<_> = ScanOrder::ColumnMajor.coordinates(2, 2).collect();
        assert_eq!(column, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
    }
}
