use serde::{Deserialize, Serialize};

/// Integer cell coordinate on the field.
///
/// # Coordinate System
///
/// - `col` increases rightward, `0..width` is inside the field
/// - `row` increases downward, row 0 is the top row
/// - Rows may be negative while a piece is still above the visible field
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize, derive_more::Display,
)]
#[display("({col}, {row})")]
pub struct Cell {
    pub col: i32,
    pub row: i32,
}

impl Cell {
    #[must_use]
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    #[must_use]
    pub const fn offset(self, dcol: i32, drow: i32) -> Self {
        Self::new(self.col + dcol, self.row + drow)
    }

    #[must_use]
    pub const fn shifted(self, direction: Direction) -> Self {
        let (dcol, drow) = direction.delta();
        self.offset(dcol, drow)
    }

    /// Rotates this cell 90° clockwise around `pivot`.
    ///
    /// Relative to the pivot, `(x, y)` maps to `(-y, x)`; with rows growing
    /// downward this is a clockwise turn on screen.
    #[must_use]
    pub const fn rotated_cw_about(self, pivot: Cell) -> Self {
        let dx = self.col - pivot.col;
        let dy = self.row - pivot.row;
        Self::new(pivot.col - dy, pivot.row + dx)
    }
}

/// Unit translation applied to a falling piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum Direction {
    Left,
    Right,
    Down,
}

impl Direction {
    /// Returns the `(dcol, drow)` offset of this direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
        }
    }
}

/// Fractional position used by preview boxes drawn beside the field.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
pub struct DisplayPoint {
    pub x: f32,
    pub y: f32,
}

impl DisplayPoint {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn offset_by(self, cell: Cell) -> Self {
        Self::new(self.x + cell.col as f32, self.y + cell.row as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_about_origin() {
        let pivot = Cell::new(0, 0);
        assert_eq!(Cell::new(1, 0).rotated_cw_about(pivot), Cell::new(0, 1));
        assert_eq!(Cell::new(0, 1).rotated_cw_about(pivot), Cell::new(-1, 0));
        assert_eq!(Cell::new(-1, 0).rotated_cw_about(pivot), Cell::new(0, -1));
        assert_eq!(Cell::new(0, -1).rotated_cw_about(pivot), Cell::new(1, 0));
    }

    #[test]
    fn test_rotation_about_offset_pivot() {
        let pivot = Cell::new(4, 7);
        let cell = Cell::new(5, 7);
        assert_eq!(cell.rotated_cw_about(pivot), Cell::new(4, 8));
        // Four quarter turns bring the cell back
        let mut rotated = cell;
        for _ in 0..4 {
            rotated = rotated.rotated_cw_about(pivot);
        }
        assert_eq!(rotated, cell);
        // The pivot itself never moves
        assert_eq!(pivot.rotated_cw_about(pivot), pivot);
    }

    #[test]
    fn test_shifted() {
        let cell = Cell::new(3, 3);
        assert_eq!(cell.shifted(Direction::Left), Cell::new(2, 3));
        assert_eq!(cell.shifted(Direction::Right), Cell::new(4, 3));
        assert_eq!(cell.shifted(Direction::Down), Cell::new(3, 4));
    }

    #[test]
    fn test_cell_display() {
        assert_eq!(Cell::new(-1, 12).to_string(), "(-1, 12)");
    }
}
