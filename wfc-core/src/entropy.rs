use crate::wave::WaveGrid;
use std::fmt::Debug;

mod mrv;

pub use mrv::MinimumRemainingValues;

/// Order in which cells are visited when breaking ties between equally
/// constrained cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum ScanOrder {
    /// `y` outer, `x` inner: the first row is scanned left to right first.
    #[default]
    RowMajor,
    /// `x` outer, `y` inner.
    ColumnMajor,
}

impl ScanOrder {
    /// All in-range coordinates of a `width` x `height` grid, in this order.
    pub fn coordinates(
        self,
        width: usize,
        height: usize,
    ) -> Box<dyn Iterator<Item = (usize, usize)>> {
        match self {
            Self::RowMajor => {
                Box::new((0..height).flat_map(move |y| (0..width).map(move |x| (x, y))))
            }
            Self::ColumnMajor => {
                Box::new((0..width).flat_map(move |x| (0..height).map(move |y| (x, y))))
            }
        }
    }
}

/// Picks the next cell to collapse.
pub trait CellSelector: Debug {
    /// Coordinates of the next cell to collapse, or `None` once no
    /// uncollapsed cell remains.
    #[must_use]
    fn select_next_cell(&self, grid: &WaveGrid) -> Option<(usize, usize)>;
}
