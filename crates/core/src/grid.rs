//! Grid assembly and cell state.
//!
//! A proof grid is `grid_size x grid_size` cells in row-major order. Row `i`
//! takes the i-th x-axis value and column `j` the j-th y-axis value. Each
//! cell's image lives at `{row}_{col}.png` inside the proof's folder; the
//! presence of that file is what makes the cell ready.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::CoreError;

/// Extension of generated cell images.
pub const IMAGE_EXTENSION: &str = "png";

/// One grid position and the axis values it was generated with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridCell {
    pub row: usize,
    pub col: usize,
    pub x_value: f64,
    pub y_value: f64,
}

impl GridCell {
    /// The `{row}_{col}` identifier used in URLs and element ids.
    pub fn image_id(&self) -> String {
        image_id(self.row, self.col)
    }

    /// `{row}_{col}.png`
    pub fn filename(&self) -> String {
        image_filename(self.row, self.col)
    }

    /// Human-readable `"x, y"` label.
    pub fn caption(&self) -> String {
        format!("{:.1}, {:.1}", self.x_value, self.y_value)
    }

    pub fn image_path(&self, folder: &Path) -> PathBuf {
        folder.join(self.filename())
    }
}

pub fn image_id(row: usize, col: usize) -> String {
    format!("{row}_{col}")
}

pub fn image_filename(row: usize, col: usize) -> String {
    format!("{row}_{col}.{IMAGE_EXTENSION}")
}

/// Parse a `{row}_{col}` identifier, rejecting anything outside the grid
/// and any spelling other than the one [`image_id`] produces.
pub fn parse_image_id(id: &str, grid_size: usize) -> Result<(usize, usize), CoreError> {
    let invalid = || CoreError::Validation(format!("Invalid image id '{id}'"));

    let (row, col) = id.split_once('_').ok_or_else(invalid)?;
    let row: usize = row.parse().map_err(|_| invalid())?;
    let col: usize = col.parse().map_err(|_| invalid())?;

    if row >= grid_size || col >= grid_size || image_id(row, col) != id {
        return Err(invalid());
    }
    Ok((row, col))
}

/// Pair every x value with every y value, row-major.
pub fn assemble_grid(
    grid_size: usize,
    x_values: &[f64],
    y_values: &[f64],
) -> Result<Vec<GridCell>, CoreError> {
    if x_values.len() != grid_size || y_values.len() != grid_size {
        return Err(CoreError::Validation(format!(
            "Axis value counts ({}, {}) do not match grid size {grid_size}",
            x_values.len(),
            y_values.len()
        )));
    }

    let mut cells = Vec::with_capacity(grid_size * grid_size);
    for (row, &x_value) in x_values.iter().enumerate() {
        for (col, &y_value) in y_values.iter().enumerate() {
            cells.push(GridCell {
                row,
                col,
                x_value,
                y_value,
            });
        }
    }
    Ok(cells)
}

/// Whether a cell's image has been written yet.
///
/// Moves from `Pending` to `Ready` once, when the image file appears.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CellState {
    Pending,
    Ready,
}

impl CellState {
    /// Inspect the filesystem for the image at `path`.
    pub fn resolve(path: &Path) -> Self {
        if path.is_file() {
            CellState::Ready
        } else {
            CellState::Pending
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn three_by_three() -> Vec<GridCell> {
        assemble_grid(3, &[1.0, 25.5, 50.0], &[0.1, 5.05, 10.0]).unwrap()
    }

    #[test]
    fn assembles_row_major_cells() {
        let cells = three_by_three();
        assert_eq!(cells.len(), 9);

        let ids: Vec<String> = cells.iter().map(GridCell::image_id).collect();
        assert_eq!(
            ids,
            ["0_0", "0_1", "0_2", "1_0", "1_1", "1_2", "2_0", "2_1", "2_2"]
        );
        assert_eq!(cells[0].filename(), "0_0.png");
        assert_eq!(cells[8].filename(), "2_2.png");
    }

    #[test]
    fn rows_take_x_and_columns_take_y() {
        let cells = three_by_three();
        let cell = &cells[5]; // (1, 2)
        assert_eq!((cell.row, cell.col), (1, 2));
        assert_eq!(cell.x_value, 25.5);
        assert_eq!(cell.y_value, 10.0);
    }

    #[test]
    fn captions_show_both_values() {
        let cells = three_by_three();
        assert_eq!(cells[0].caption(), "1.0, 0.1");
        assert_eq!(cells[3].caption(), "25.5, 0.1");
        assert_eq!(cells[8].caption(), "50.0, 10.0");
    }

    #[test]
    fn assembly_is_deterministic() {
        assert_eq!(three_by_three(), three_by_three());
    }

    #[test]
    fn mismatched_axis_lengths_rejected() {
        assert!(assemble_grid(3, &[1.0, 2.0], &[1.0, 2.0, 3.0]).is_err());
    }

    #[test]
    fn parse_image_id_roundtrip_and_bounds() {
        assert_eq!(parse_image_id("2_1", 3).unwrap(), (2, 1));
        assert!(parse_image_id("3_0", 3).is_err());
        assert!(parse_image_id("0_3", 3).is_err());
        assert!(parse_image_id("01", 3).is_err());
        assert!(parse_image_id("a_b", 3).is_err());
        assert!(parse_image_id("../0_0", 3).is_err());
    }

    #[test]
    fn parse_image_id_rejects_noncanonical_spellings() {
        assert!(parse_image_id("+1_0", 3).is_err());
        assert!(parse_image_id("1_+0", 3).is_err());
        assert!(parse_image_id("01_1", 3).is_err());
        assert_eq!(parse_image_id("1_0", 3).unwrap(), (1, 0));
    }

    #[test]
    fn cell_state_follows_file_presence() {
        let dir = tempfile::tempdir().unwrap();
        let cells = three_by_three();
        let path = cells[4].image_path(dir.path());

        assert_eq!(CellState::resolve(&path), CellState::Pending);
        std::fs::write(&path, b"png").unwrap();
        assert_eq!(CellState::resolve(&path), CellState::Ready);

        // Other cells are unaffected.
        assert_eq!(
            CellState::resolve(&cells[0].image_path(dir.path())),
            CellState::Pending
        );
    }
}
