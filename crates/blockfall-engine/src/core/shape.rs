use serde::{Deserialize, Serialize};

use super::cell::Cell;

/// Enum representing the type of piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum ShapeKind {
    /// I-piece.
    I = 0,
    /// O-piece.
    O = 1,
    /// T-piece.
    T = 2,
    /// S-piece.
    S = 3,
    /// Z-piece.
    Z = 4,
    /// J-piece.
    J = 5,
    /// L-piece.
    L = 6,
}

impl ShapeKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    pub const ALL: [ShapeKind; Self::LEN] = [
        ShapeKind::I,
        ShapeKind::O,
        ShapeKind::T,
        ShapeKind::S,
        ShapeKind::Z,
        ShapeKind::J,
        ShapeKind::L,
    ];

    /// Returns the four cell offsets of this shape, relative to its pivot.
    ///
    /// The first offset is always `(0, 0)`: the first block of every piece is
    /// its rotation pivot.
    #[must_use]
    pub const fn offsets(self) -> [Cell; 4] {
        SHAPE_OFFSETS[self as usize]
    }

    #[must_use]
    pub const fn color(self) -> Color {
        match self {
            ShapeKind::I => Color::Cyan,
            ShapeKind::O => Color::Yellow,
            ShapeKind::T => Color::Purple,
            ShapeKind::S => Color::Green,
            ShapeKind::Z => Color::Red,
            ShapeKind::J => Color::Blue,
            ShapeKind::L => Color::Orange,
        }
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::ShapeKind;
    ///
    /// assert_eq!(ShapeKind::I.as_char(), 'I');
    /// assert_eq!(ShapeKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            ShapeKind::I => 'I',
            ShapeKind::O => 'O',
            ShapeKind::T => 'T',
            ShapeKind::S => 'S',
            ShapeKind::Z => 'Z',
            ShapeKind::J => 'J',
            ShapeKind::L => 'L',
        }
    }

    /// Parses a piece kind from a single character.
    ///
    /// ```
    /// use blockfall_engine::ShapeKind;
    ///
    /// assert_eq!(ShapeKind::from_char('O'), Some(ShapeKind::O));
    /// assert_eq!(ShapeKind::from_char('X'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(ShapeKind::I),
            'O' => Some(ShapeKind::O),
            'T' => Some(ShapeKind::T),
            'S' => Some(ShapeKind::S),
            'Z' => Some(ShapeKind::Z),
            'J' => Some(ShapeKind::J),
            'L' => Some(ShapeKind::L),
            _ => None,
        }
    }
}

/// Display color of a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Color {
    Cyan,
    Yellow,
    Purple,
    Green,
    Red,
    Blue,
    Orange,
}

// Indexed by `ShapeKind as usize`. Offsets are (col, row) with rows growing downward.
const SHAPE_OFFSETS: [[Cell; 4]; ShapeKind::LEN] = {
    const fn c(col: i32, row: i32) -> Cell {
        Cell::new(col, row)
    }
    [
        // I-piece
        [c(0, 0), c(0, 1), c(0, -1), c(0, -2)],
        // O-piece
        [c(0, 0), c(0, -1), c(1, 0), c(1, -1)],
        // T-piece
        [c(0, 0), c(-1, 0), c(1, 0), c(0, -1)],
        // S-piece
        [c(0, 0), c(-1, 0), c(0, -1), c(1, -1)],
        // Z-piece
        [c(0, 0), c(1, 0), c(0, -1), c(-1, -1)],
        // J-piece
        [c(0, 0), c(-1, 0), c(0, -1), c(0, -2)],
        // L-piece
        [c(0, 0), c(1, 0), c(0, -1), c(0, -2)],
    ]
};

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_every_shape_has_four_distinct_cells() {
        for kind in ShapeKind::ALL {
            let offsets = kind.offsets();
            let unique: HashSet<_> = offsets.iter().collect();
            assert_eq!(unique.len(), 4, "{kind:?} has overlapping offsets");
            assert_eq!(offsets[0], Cell::new(0, 0), "{kind:?} pivot is not first");
        }
    }

    #[test]
    fn test_shapes_have_distinct_colors() {
        let colors: HashSet<_> = ShapeKind::ALL.iter().map(|k| k.color()).collect();
        assert_eq!(colors.len(), ShapeKind::LEN);
    }

    #[test]
    fn test_shape_kind_char_conversion() {
        for kind in ShapeKind::ALL {
            assert_eq!(ShapeKind::from_char(kind.as_char()), Some(kind));
        }
        assert_eq!(ShapeKind::from_char('x'), None);
        assert_eq!(ShapeKind::from_char('i'), None);
    }

    #[test]
    fn test_shape_kind_serialization() {
        let json = serde_json::to_string(&[ShapeKind::O, ShapeKind::I]).unwrap();
        assert_eq!(json, r#"["O","I"]"#);
        let kinds: Vec<ShapeKind> = serde_json::from_str(r#"["T","L"]"#).unwrap();
        assert_eq!(kinds, vec![ShapeKind::T, ShapeKind::L]);
    }
}
