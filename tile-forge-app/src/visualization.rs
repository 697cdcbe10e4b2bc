use colored::{Color, ColoredString, Colorize};
use wfc_core::{Cell, WaveGrid};

/// Trait for types that can visualize the state of a `WaveGrid`.
pub trait Visualizer {
    /// Displays the current state of the grid.
    fn display_state(&mut self, grid: &WaveGrid) -> Result<(), anyhow::Error>;
}

const PALETTE: [Color; 6] = [
    Color::Green,
    Color::Yellow,
    Color::Blue,
    Color::Magenta,
    Color::Cyan,
    Color::White,
];

/// Renders the grid as a glyph map on stdout.
///
/// Committed cells show the first letter of the tile name, colored by tile id.
/// Undetermined cells show their domain size (`+` above 9), contradictions a red `X`.
#[derive(Debug, Default)]
pub struct TerminalVisualizer {
    frames_drawn: usize,
}

impl TerminalVisualizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames_drawn(&self) -> usize {
        self.frames_drawn
    }

    /// Glyph for a single cell.
    pub fn glyph(grid: &WaveGrid, cell: &Cell) -> ColoredString {
        match cell {
            Cell::Collapsed(id) => {
                let initial = grid
                    .catalog()
                    .get(*id)
                    .and_then(|tile| tile.name().chars().next())
                    .unwrap_or('?');
                initial
                    .to_string()
                    .color(PALETTE[id.0 % PALETTE.len()])
                    .bold()
            }
            Cell::Uncollapsed(domain) => match domain.count_ones() {
                n @ 0..=9 => n.to_string().dimmed(),
                _ => "+".dimmed(),
            },
            Cell::Contradiction => "X".red().bold(),
        }
    }

    /// One string per row, glyphs separated by spaces.
    pub fn render_lines(grid: &WaveGrid) -> Vec<String> {
        (0..grid.height())
            .map(|y| {
                (0..grid.width())
                    .filter_map(|x| grid.cell(x, y))
                    .map(|cell| Self::glyph(grid, cell).to_string())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect()
    }
}

impl Visualizer for TerminalVisualizer {
    fn display_state(&mut self, grid: &WaveGrid) -> Result<(), anyhow::Error> {
        println!(
            "--- {}x{} grid, {} of {} cells collapsed ---",
            grid.width(),
            grid.height(),
            grid.collapsed_cells(),
            grid.total_cells()
        );
        for line in Self::render_lines(grid) {
            println!("{line}");
        }
        self.frames_drawn += 1;
        Ok(())
    }
}
