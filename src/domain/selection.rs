//! Anchor/current selection and coordinate normalization
//!
//! A selection is the span of cells between an anchor cell (where the user
//! started) and the current cell (where the pointer or cursor is now). The
//! anchor may sit at any corner relative to the current cell; geometry is only
//! ever derived from the normalized form.

use crate::domain::grid::CellCoord;

/// An axis-aligned span of grid cells, inclusive on both ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// Cell the selection is rooted at
    anchor: CellCoord,
    /// Cell the selection currently extends to
    current: CellCoord,
}

impl Selection {
    /// Creates a single-cell selection rooted at `cell`
    pub fn single(cell: CellCoord) -> Self {
        Self {
            anchor: cell,
            current: cell,
        }
    }

    /// Creates a selection spanning `anchor` to `current`
    ///
    /// # Example
    /// ```rust
    /// use grid_resize::domain::{grid::CellCoord, selection::Selection};
    ///
    /// let selection = Selection::spanning(CellCoord::new(3, 2), CellCoord::new(1, 1));
    /// let (top_left, bottom_right) = selection.normalized();
    /// assert_eq!(top_left, CellCoord::new(1, 1));
    /// assert_eq!(bottom_right, CellCoord::new(3, 2));
    /// ```
    pub fn spanning(anchor: CellCoord, current: CellCoord) -> Self {
        Self { anchor, current }
    }

    /// Returns the anchor cell
    pub fn anchor(&self) -> CellCoord {
        self.anchor
    }

    /// Returns the current cell
    pub fn current(&self) -> CellCoord {
        self.current
    }

    /// Moves the current end of the selection, keeping the anchor
    pub fn extend_to(&mut self, cell: CellCoord) {
        self.current = cell;
    }

    /// Restarts the selection at the current cell
    pub fn reanchor(&mut self) {
        self.anchor = self.current;
    }

    /// Collapses the selection onto `cell`
    pub fn reset_to(&mut self, cell: CellCoord) {
        self.anchor = cell;
        self.current = cell;
    }

    /// Returns the (top_left, bottom_right) corners of the selection
    pub fn normalized(&self) -> (CellCoord, CellCoord) {
        normalize_coordinates(self.anchor, self.current)
    }

    /// Returns the selection size in cells as (columns, rows)
    pub fn dimensions(&self) -> (u32, u32) {
        let (top_left, bottom_right) = self.normalized();
        (
            bottom_right.col - top_left.col + 1,
            bottom_right.row - top_left.row + 1,
        )
    }

    /// Checks if the selection covers a single cell
    pub fn is_single_cell(&self) -> bool {
        self.anchor == self.current
    }
}

/// Normalizes two coordinates into top-left and bottom-right corners
///
/// The result is the same regardless of the order of the arguments.
pub fn normalize_coordinates(a: CellCoord, b: CellCoord) -> (CellCoord, CellCoord) {
    let top_left = CellCoord::new(a.col.min(b.col), a.row.min(b.row));
    let bottom_right = CellCoord::new(a.col.max(b.col), a.row.max(b.row));
    (top_left, bottom_right)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_selection_is_one_cell() {
        let selection = Selection::single(CellCoord::new(2, 1));
        assert!(selection.is_single_cell());
        assert_eq!(selection.dimensions(), (1, 1));
        assert_eq!(selection.anchor(), selection.current());
    }

    #[test]
    fn extend_keeps_anchor() {
        let mut selection = Selection::single(CellCoord::new(1, 1));
        selection.extend_to(CellCoord::new(3, 2));

        assert_eq!(selection.anchor(), CellCoord::new(1, 1));
        assert_eq!(selection.current(), CellCoord::new(3, 2));
        assert_eq!(selection.dimensions(), (3, 2));
        assert!(!selection.is_single_cell());
    }

    #[test]
    fn reanchor_starts_fresh_rectangle() {
        let mut selection = Selection::spanning(CellCoord::new(0, 0), CellCoord::new(2, 2));
        selection.reanchor();
        assert_eq!(selection.anchor(), CellCoord::new(2, 2));
        assert!(selection.is_single_cell());
    }

    #[test]
    fn normalize_coordinates_test() {
        // Normal order
        let (tl, br) = normalize_coordinates(CellCoord::new(0, 0), CellCoord::new(3, 2));
        assert_eq!(tl, CellCoord::new(0, 0));
        assert_eq!(br, CellCoord::new(3, 2));

        // Reverse order
        let (tl, br) = normalize_coordinates(CellCoord::new(3, 2), CellCoord::new(0, 0));
        assert_eq!(tl, CellCoord::new(0, 0));
        assert_eq!(br, CellCoord::new(3, 2));

        // Mixed corners: anchor top-right, current bottom-left
        let (tl, br) = normalize_coordinates(CellCoord::new(3, 1), CellCoord::new(1, 2));
        assert_eq!(tl, CellCoord::new(1, 1));
        assert_eq!(br, CellCoord::new(3, 2));
    }

    #[test]
    fn normalization_is_symmetric() {
        let a = CellCoord::new(4, 0);
        let b = CellCoord::new(1, 5);
        assert_eq!(
            Selection::spanning(a, b).normalized(),
            Selection::spanning(b, a).normalized()
        );
    }

    #[test]
    fn reset_collapses_selection() {
        let mut selection = Selection::spanning(CellCoord::new(0, 0), CellCoord::new(2, 2));
        selection.reset_to(CellCoord::new(1, 0));
        assert_eq!(selection, Selection::single(CellCoord::new(1, 0)));
    }
}
