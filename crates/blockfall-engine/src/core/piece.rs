use crate::SpawnBlocked;

use super::{
    cell::{Cell, Direction, DisplayPoint},
    field::{Block, BlockIds, Field, FieldConfig},
    shape::{Color, ShapeKind},
};

/// Where a piece is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum PieceRole {
    /// The falling piece controlled by the player.
    Active,
    /// The upcoming piece shown in the "next" box.
    Next,
    /// The piece shown in the hold box.
    Held,
}

/// A tetromino: four blocks sharing one shape.
///
/// Movement and rotation compute all four candidate cells first and commit
/// them only if none collides, so a piece is never left half-moved.
///
/// # Rotation
///
/// The first block is the pivot for every shape. Rotation turns the other
/// blocks 90° clockwise around it and is simply rejected when the result
/// collides; no wall kicks are tried.
///
/// # Example
///
/// ```
/// use blockfall_engine::{BlockIds, Direction, Field, FieldConfig, Piece, ShapeKind};
///
/// let field = Field::new(FieldConfig::STANDARD);
/// let mut ids = BlockIds::new();
/// let mut piece = Piece::spawn(ShapeKind::T, &field, &mut ids).unwrap();
///
/// assert!(piece.try_move(Direction::Left, &field));
/// assert!(piece.try_rotate(&field));
/// assert!(!piece.is_landing(&field));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    kind: ShapeKind,
    role: PieceRole,
    cells: [Cell; 4],
    blocks: [Block; 4],
}

impl Piece {
    /// Creates an active piece at the spawn position of `field`.
    ///
    /// The shape is centered horizontally, then translated back inside the
    /// side walls if any block sticks out. Blocks may start above row 0.
    pub fn spawn(kind: ShapeKind, field: &Field, ids: &mut BlockIds) -> Result<Self, SpawnBlocked> {
        let config = field.config();
        let origin = config.spawn_origin();
        let mut cells = kind.offsets().map(|o| origin.offset(o.col, o.row));
        Self::fit_between_walls(&mut cells, config);
        if field.is_colliding(&cells) {
            return Err(SpawnBlocked);
        }
        Ok(Self::with_cells(kind, PieceRole::Active, cells, ids))
    }

    /// Creates a piece for the hold box.
    ///
    /// Its cells are the bare shape offsets; it never interacts with a field.
    #[must_use]
    pub fn held(kind: ShapeKind, ids: &mut BlockIds) -> Self {
        Self::with_cells(kind, PieceRole::Held, kind.offsets(), ids)
    }

    fn with_cells(kind: ShapeKind, role: PieceRole, cells: [Cell; 4], ids: &mut BlockIds) -> Self {
        let blocks = [(); 4].map(|()| Block::new(ids.next_id(), kind));
        Self {
            kind,
            role,
            cells,
            blocks,
        }
    }

    fn fit_between_walls(cells: &mut [Cell; 4], config: FieldConfig) {
        let cols = config.col_range();
        let min_col = cells.iter().map(|c| c.col).fold(i32::MAX, i32::min);
        let max_col = cells.iter().map(|c| c.col).fold(i32::MIN, i32::max);
        let shift = if min_col < cols.start {
            cols.start - min_col
        } else if max_col >= cols.end {
            cols.end - 1 - max_col
        } else {
            0
        };
        for cell in cells {
            *cell = cell.offset(shift, 0);
        }
    }

    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    #[must_use]
    pub fn color(&self) -> Color {
        self.kind.color()
    }

    #[must_use]
    pub fn role(&self) -> PieceRole {
        self.role
    }

    #[must_use]
    pub fn with_role(mut self, role: PieceRole) -> Self {
        self.role = role;
        self
    }

    #[must_use]
    pub fn cells(&self) -> &[Cell; 4] {
        &self.cells
    }

    #[must_use]
    pub fn blocks(&self) -> &[Block; 4] {
        &self.blocks
    }

    /// The rotation pivot (the first block).
    #[must_use]
    pub fn pivot(&self) -> Cell {
        self.cells[0]
    }

    /// Iterates over each block paired with its cell.
    pub fn placed_blocks(&self) -> impl Iterator<Item = (Cell, Block)> + '_ {
        self.cells.iter().copied().zip(self.blocks.iter().copied())
    }

    #[must_use]
    pub fn moved_cells(&self, direction: Direction) -> [Cell; 4] {
        self.cells.map(|cell| cell.shifted(direction))
    }

    #[must_use]
    pub fn rotated_cells(&self) -> [Cell; 4] {
        let pivot = self.pivot();
        self.cells.map(|cell| cell.rotated_cw_about(pivot))
    }

    /// Moves one cell in `direction` if nothing is in the way.
    ///
    /// Returns whether the piece moved.
    pub fn try_move(&mut self, direction: Direction, field: &Field) -> bool {
        let cells = self.moved_cells(direction);
        if field.is_colliding(&cells) {
            return false;
        }
        self.cells = cells;
        true
    }

    /// Rotates 90° clockwise around the pivot if nothing is in the way.
    ///
    /// Returns whether the piece rotated.
    pub fn try_rotate(&mut self, field: &Field) -> bool {
        let cells = self.rotated_cells();
        if field.is_colliding(&cells) {
            return false;
        }
        self.cells = cells;
        true
    }

    /// Returns whether the piece rests on the floor or on locked blocks.
    #[must_use]
    pub fn is_landing(&self, field: &Field) -> bool {
        field.is_colliding(&self.moved_cells(Direction::Down))
    }

    /// Translates the piece down until no block is above row 0.
    ///
    /// Returns the number of rows moved.
    pub fn settle_into_field(&mut self) -> i32 {
        let top = self.cells.iter().map(|c| c.row).fold(i32::MAX, i32::min);
        let shift = (-top).max(0);
        for cell in &mut self.cells {
            *cell = cell.offset(0, shift);
        }
        shift
    }

    /// Returns where each block is drawn for this piece's role.
    ///
    /// Active pieces are drawn on their field cells, next and held pieces in
    /// their preview box.
    #[must_use]
    pub fn display_points(&self, config: FieldConfig) -> [DisplayPoint; 4] {
        let (origin, cells) = match self.role {
            PieceRole::Active => (DisplayPoint::default(), self.cells),
            PieceRole::Next => (config.next_display_origin(), self.kind.offsets()),
            PieceRole::Held => (config.hold_display_origin(), self.kind.offsets()),
        };
        cells.map(|cell| origin.offset_by(cell))
    }

    #[must_use]
    pub fn preview(&self, config: FieldConfig) -> PiecePreview {
        PiecePreview {
            kind: self.kind,
            role: self.role,
            points: self.display_points(config),
        }
    }
}

/// Snapshot of a piece for drawing, detached from the simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PiecePreview {
    pub kind: ShapeKind,
    pub role: PieceRole,
    pub points: [DisplayPoint; 4],
}

impl PiecePreview {
    #[must_use]
    pub fn color(&self) -> Color {
        self.kind.color()
    }
}
