//! Grid geometry and cell calculations
//!
//! This module handles the logical grid laid over a screen region. It maps
//! pixels to cells and cell spans back to screen rectangles.
//!
//! The grid extent is divided proportionally: the boundary in front of cell
//! `i` sits at `origin + floor(i * extent / count)`. Neighbouring cells share
//! a boundary, so the cells tile the extent exactly even when the extent is
//! not a multiple of the cell count.

use crate::domain::core::PixelRect;
use crate::domain::selection::Selection;

/// Errors that can occur during grid operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// Grid dimensions are invalid (zero cells or an empty extent)
    #[error("Invalid grid: {columns}x{rows} cells over {width}x{height} pixels")]
    InvalidDimensions {
        columns: u32,
        rows: u32,
        width: u32,
        height: u32,
    },
    /// The extent is too small to give every cell at least one pixel
    #[error("Grid of {columns}x{rows} cells does not fit {width}x{height} pixels")]
    InvalidCellSize {
        columns: u32,
        rows: u32,
        width: u32,
        height: u32,
    },
    /// A selection refers to a cell outside the grid
    #[error("Selection cell {cell} lies outside the {columns}x{rows} grid")]
    MalformedSelection {
        cell: CellCoord,
        columns: u32,
        rows: u32,
    },
}

/// Grid coordinates representing a (column, row) position
///
/// Uses zero-based indexing starting from the top-left cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellCoord {
    pub col: u32,
    pub row: u32,
}

impl CellCoord {
    /// Creates new cell coordinates
    pub fn new(col: u32, row: u32) -> Self {
        Self { col, row }
    }
}

impl std::fmt::Display for CellCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

/// A fixed grid laid over a rectangular screen region
///
/// Immutable once built; every other component reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSpec {
    /// The screen area this grid covers (in screen coordinates)
    area: PixelRect,
    /// Number of columns in the grid
    columns: u32,
    /// Number of rows in the grid
    rows: u32,
}

impl GridSpec {
    /// Creates a grid of `columns` x `rows` cells covering `area`
    ///
    /// # Arguments
    /// * `area` - Screen rectangle the grid covers (must not be empty)
    /// * `columns` - Number of columns (must be > 0)
    /// * `rows` - Number of rows (must be > 0)
    ///
    /// # Returns
    /// A new GridSpec, GridError::InvalidDimensions for empty input, or
    /// GridError::InvalidCellSize when a cell would be zero pixels wide or tall
    ///
    /// # Example
    /// ```rust
    /// use grid_resize::domain::{core::PixelRect, grid::GridSpec};
    ///
    /// let grid = GridSpec::new(PixelRect::new(0, 0, 1920, 1080), 8, 6).unwrap();
    /// assert_eq!(grid.dimensions(), (8, 6));
    /// ```
    pub fn new(area: PixelRect, columns: u32, rows: u32) -> Result<Self, GridError> {
        if columns == 0 || rows == 0 || area.width == 0 || area.height == 0 {
            return Err(GridError::InvalidDimensions {
                columns,
                rows,
                width: area.width,
                height: area.height,
            });
        }

        if area.width < columns || area.height < rows {
            return Err(GridError::InvalidCellSize {
                columns,
                rows,
                width: area.width,
                height: area.height,
            });
        }

        Ok(Self { area, columns, rows })
    }

    /// Returns the grid dimensions as (columns, rows)
    pub fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    /// Returns the screen area this grid covers
    pub fn area(&self) -> PixelRect {
        self.area
    }

    /// Checks if the given cell lies inside the grid
    pub fn contains_cell(&self, cell: CellCoord) -> bool {
        cell.col < self.columns && cell.row < self.rows
    }

    /// Screen x of the boundary in front of column `index`
    ///
    /// `index == columns` yields the right edge of the grid.
    pub fn column_edge(&self, index: u32) -> i32 {
        self.area.x + proportional(index, self.area.width, self.columns)
    }

    /// Screen y of the boundary in front of row `index`
    ///
    /// `index == rows` yields the bottom edge of the grid.
    pub fn row_edge(&self, index: u32) -> i32 {
        self.area.y + proportional(index, self.area.height, self.rows)
    }

    /// Clamps cell indices into `[0, count)`
    pub fn clamp_cell(&self, cell: CellCoord) -> CellCoord {
        CellCoord::new(cell.col.min(self.columns - 1), cell.row.min(self.rows - 1))
    }

    /// Maps a screen pixel to the cell containing it
    ///
    /// Positions outside the grid snap to the nearest edge cell.
    pub fn cell_from_pixel(&self, x: i32, y: i32) -> CellCoord {
        let col = index_along(x.saturating_sub(self.area.x), self.area.width, self.columns);
        let row = index_along(y.saturating_sub(self.area.y), self.area.height, self.rows);
        CellCoord::new(col, row)
    }

    /// Screen rectangle of a single cell
    pub fn cell_rect(&self, cell: CellCoord) -> Result<PixelRect, GridError> {
        self.pixel_rect(&Selection::single(cell))
    }

    /// Screen rectangle covered by a selection
    ///
    /// The selection is normalized first, so anchor and current may be any
    /// two opposite corners.
    ///
    /// # Returns
    /// The covering rectangle, or GridError::MalformedSelection if either end
    /// of the selection lies outside the grid
    pub fn pixel_rect(&self, selection: &Selection) -> Result<PixelRect, GridError> {
        for cell in [selection.anchor(), selection.current()] {
            if !self.contains_cell(cell) {
                return Err(GridError::MalformedSelection {
                    cell,
                    columns: self.columns,
                    rows: self.rows,
                });
            }
        }

        let (top_left, bottom_right) = selection.normalized();

        Ok(PixelRect::from_edges(
            self.column_edge(top_left.col),
            self.row_edge(top_left.row),
            self.column_edge(bottom_right.col + 1),
            self.row_edge(bottom_right.row + 1),
        ))
    }
}

/// Offset of boundary `index` when `extent` pixels are split into `count` parts
fn proportional(index: u32, extent: u32, count: u32) -> i32 {
    (index as u64 * extent as u64 / count as u64) as i32
}

/// Index of the part containing `offset`, clamped to `[0, count)`
///
/// Inverse of `proportional`: the largest `i` whose boundary is `<= offset`.
fn index_along(offset: i32, extent: u32, count: u32) -> u32 {
    if offset <= 0 {
        return 0;
    }
    if offset as u32 >= extent {
        return count - 1;
    }

    let offset = offset as u64;
    let index = ((offset + 1) * count as u64).div_ceil(extent as u64) - 1;
    (index as u32).min(count - 1)
}
