use crate::config::OutputFormat;
use anyhow::{bail, Context, Result};
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use wfc_core::{Cell, WaveGrid};

/// Renders a fully collapsed grid as text: space-separated tile ids along X,
/// one line per row.
pub fn render_text(grid: &WaveGrid) -> Result<String> {
    let mut text = String::new();
    for y in 0..grid.height() {
        let mut line = Vec::with_capacity(grid.width());
        for x in 0..grid.width() {
            match grid.cell(x, y) {
                Some(Cell::Collapsed(tile)) => line.push(tile.to_string()),
                Some(Cell::Uncollapsed(domain)) => bail!(
                    "Grid cell ({x},{y}) is not fully collapsed ({} possibilities), cannot save.",
                    domain.count_ones()
                ),
                Some(Cell::Contradiction) => {
                    bail!("Grid cell ({x},{y}) has a contradiction (0 possibilities), cannot save.")
                }
                None => bail!("Internal error: Failed to access grid cell ({x},{y})"),
            }
        }
        text.push_str(&line.join(" "));
        text.push('\n');
    }
    Ok(text)
}

/// Saves the grid to `output_path` in the requested format.
///
/// `Text` requires every cell to be collapsed; `Json` writes the snapshot as is.
pub fn save_grid_to_file(grid: &WaveGrid, output_path: &Path, format: OutputFormat) -> Result<()> {
    log::info!("Attempting to save grid to {output_path:?} as {format:?}...");

    // Render before creating the file so a failure leaves nothing behind.
    let text = match format {
        OutputFormat::Text => Some(render_text(grid)?),
        OutputFormat::Json => None,
    };

    let file = File::create(output_path)
        .with_context(|| format!("Failed to create output file: {output_path:?}"))?;
    let mut writer = io::BufWriter::new(file);

    match text {
        Some(text) => writer
            .write_all(text.as_bytes())
            .with_context(|| format!("Failed to write grid to {output_path:?}"))?,
        None => {
            serde_json::to_writer_pretty(&mut writer, &grid.snapshot())
                .context("Failed to serialize grid snapshot")?;
            writeln!(writer)?;
        }
    }

    writer
        .flush()
        .context("Failed to flush writer for output file")?;
    log::info!("Successfully saved grid to {output_path:?}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use wfc_core::{force_collapse, SingletonPropagator};
    use wfc_rules::{TileDefinition, TileEdges, TileId};

    fn solved_grid() -> WaveGrid {
        let mut grid = WaveGrid::from_definitions(
            3,
            2,
            vec![
                TileDefinition::new("blank", 1.0, TileEdges::uniform("grass")),
                TileDefinition::new(
                    "horizontal road",
                    0.001,
                    TileEdges::new("grass", "road", "grass", "road"),
                ),
            ],
        )
        .unwrap();
        let propagator = SingletonPropagator::default();
        force_collapse(&mut grid, 0, 0, TileId(1), &propagator).unwrap();
        force_collapse(&mut grid, 0, 1, TileId(0), &propagator).unwrap();
        grid
    }

    #[test]
    fn test_render_text_rows() {
        assert_eq!(render_text(&solved_grid()).unwrap(), "1 1 1\n0 0 0\n");
    }

    #[test]
    fn test_text_refuses_uncollapsed_grid() {
        let grid = WaveGrid::from_definitions(
            2,
            1,
            vec![TileDefinition::new("a", 1.0, TileEdges::uniform("x"))],
        )
        .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let error = save_grid_to_file(&grid, &path, OutputFormat::Text).unwrap_err();
        assert!(error.to_string().contains("not fully collapsed"));
        assert!(!path.exists());
    }

    #[test]
    fn test_json_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        save_grid_to_file(&solved_grid(), &path, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["width"], 3);
        assert_eq!(value["complete"], true);
        assert_eq!(value["rows"][0][0]["state"], "collapsed");
        assert_eq!(value["rows"][0][0]["tile"], "horizontal road");
        assert_eq!(value["rows"][1][2]["id"], 0);
    }
}
