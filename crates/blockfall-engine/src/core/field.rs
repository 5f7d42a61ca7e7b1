use std::{fmt, ops::Range};

use crate::{OutOfBoundsWrite, PlaceError};

use super::{
    cell::{Cell, DisplayPoint},
    shape::{Color, ShapeKind},
};

/// Rejected field dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("field {width}x{height} is smaller than the 4x4 minimum")]
pub struct FieldTooSmall {
    pub width: u16,
    pub height: u16,
}

/// Immutable dimensions of a playfield.
///
/// A `FieldConfig` is fixed for the lifetime of a [`Field`]; a stage change
/// replaces it wholesale rather than mutating it.
///
/// # Example
///
/// ```
/// use blockfall_engine::FieldConfig;
///
/// let config = FieldConfig::new(6, 12).unwrap();
/// assert_eq!(config.width(), 6);
/// assert!(FieldConfig::new(3, 12).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldConfig {
    width: u16,
    height: u16,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl FieldConfig {
    pub const MIN_WIDTH: u16 = 4;
    pub const MIN_HEIGHT: u16 = 4;

    /// Standard 10×20 board.
    pub const STANDARD: Self = Self {
        width: 10,
        height: 20,
    };

    pub const fn new(width: u16, height: u16) -> Result<Self, FieldTooSmall> {
        if width < Self::MIN_WIDTH || height < Self::MIN_HEIGHT {
            return Err(FieldTooSmall { width, height });
        }
        Ok(Self { width, height })
    }

    #[must_use]
    pub const fn width(self) -> usize {
        self.width as usize
    }

    #[must_use]
    pub const fn height(self) -> usize {
        self.height as usize
    }

    /// Columns inside the field.
    #[must_use]
    pub fn col_range(self) -> Range<i32> {
        0..i32::from(self.width)
    }

    /// Cell that a new piece's pivot is placed on before edge adjustment.
    #[must_use]
    pub fn spawn_origin(self) -> Cell {
        Cell::new(i32::from(self.width / 2) - 1, 0)
    }

    /// Top-left origin of the "next piece" preview box.
    #[must_use]
    pub fn next_display_origin(self) -> DisplayPoint {
        DisplayPoint::new(
            f32::from(self.width) * 1.3 - 0.5,
            f32::from(self.height) * 0.3,
        )
    }

    /// Top-left origin of the "held piece" preview box.
    #[must_use]
    pub fn hold_display_origin(self) -> DisplayPoint {
        DisplayPoint::new(f32::from(self.width) * 2.0, f32::from(self.height) * 0.3)
    }
}

/// Identity of a single block, stable from spawn until it is cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(u32);

impl BlockId {
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

/// Hands out fresh [`BlockId`]s.
#[derive(Debug, Clone, Default)]
pub struct BlockIds {
    next: u32,
}

impl BlockIds {
    #[must_use]
    pub const fn new() -> Self {
        Self { next: 0 }
    }

    pub fn next_id(&mut self) -> BlockId {
        let id = BlockId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

/// The atomic unit occupying one cell.
///
/// A block belongs to its piece until lock-in and to the [`Field`] afterwards.
/// Its position is not stored: inside the field it is the index of the cell
/// holding it, so shifting a row moves every block in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    id: BlockId,
    kind: ShapeKind,
}

impl Block {
    #[must_use]
    pub const fn new(id: BlockId, kind: ShapeKind) -> Self {
        Self { id, kind }
    }

    #[must_use]
    pub const fn id(self) -> BlockId {
        self.id
    }

    #[must_use]
    pub const fn kind(self) -> ShapeKind {
        self.kind
    }

    #[must_use]
    pub const fn color(self) -> Color {
        self.kind.color()
    }
}

/// A block removed by a line clear.
///
/// It is no longer alive: the field has already dropped it, and `cell` is
/// where it sat so the renderer can play its disintegration effect there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearedBlock {
    pub block: Block,
    pub cell: Cell,
}

/// Result of [`Field::clear_full_lines`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineClear {
    rows: Vec<usize>,
    cleared_blocks: Vec<ClearedBlock>,
}

impl LineClear {
    /// Number of lines removed.
    #[must_use]
    pub fn count(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Indices (before the shift) of the removed rows, bottom-most first.
    #[must_use]
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    #[must_use]
    pub fn cleared_blocks(&self) -> &[ClearedBlock] {
        &self.cleared_blocks
    }
}

/// A single row of the field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRow {
    cells: Vec<Option<Block>>,
}

impl FieldRow {
    fn empty(width: usize) -> Self {
        Self {
            cells: vec![None; width],
        }
    }

    #[must_use]
    pub fn cells(&self) -> &[Option<Block>] {
        &self.cells
    }

    #[must_use]
    pub fn is_filled(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }
}

/// The playfield grid of locked blocks.
///
/// Row 0 is the top row. Only cells inside the field exist; a piece that is
/// still partly above row 0 is not tracked here until it locks.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Cell, Field, FieldConfig};
///
/// let field = Field::new(FieldConfig::STANDARD);
/// assert!(!field.is_occupied(Cell::new(0, 0)));
/// // Walls and floor block movement, the space above the field does not.
/// assert!(field.is_occupied(Cell::new(-1, 5)));
/// assert!(field.is_occupied(Cell::new(0, 20)));
/// assert!(!field.is_occupied(Cell::new(0, -3)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    config: FieldConfig,
    rows: Vec<FieldRow>,
}

impl Field {
    #[must_use]
    pub fn new(config: FieldConfig) -> Self {
        Self {
            config,
            rows: vec![FieldRow::empty(config.width()); config.height()],
        }
    }

    #[must_use]
    pub fn config(&self) -> FieldConfig {
        self.config
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.config.width()
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.config.height()
    }

    /// Maps a cell to `(col, row)` array indices if it lies inside the field.
    fn index(&self, cell: Cell) -> Option<(usize, usize)> {
        let col = usize::try_from(cell.col).ok()?;
        let row = usize::try_from(cell.row).ok()?;
        (col < self.width() && row < self.height()).then_some((col, row))
    }

    #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn cell_at(col: usize, row: usize) -> Cell {
        // Both indices are bounded by the u16 field dimensions.
        Cell::new(col as i32, row as i32)
    }

    /// Returns whether `cell` blocks movement.
    ///
    /// Cells left or right of the field and below its bottom row count as
    /// occupied. Cells above the field (`row < 0`) never do.
    #[must_use]
    pub fn is_occupied(&self, cell: Cell) -> bool {
        if cell.row < 0 {
            return !self.config.col_range().contains(&cell.col);
        }
        match self.index(cell) {
            Some((col, row)) => self.rows[row].cells[col].is_some(),
            None => true,
        }
    }

    /// Returns whether any of `cells` is occupied.
    #[must_use]
    pub fn is_colliding(&self, cells: &[Cell]) -> bool {
        cells.iter().any(|&cell| self.is_occupied(cell))
    }

    /// Returns the block locked at `cell`, if any.
    #[must_use]
    pub fn block_at(&self, cell: Cell) -> Option<Block> {
        let (col, row) = self.index(cell)?;
        self.rows[row].cells[col]
    }

    /// Locks a block into `cell`.
    ///
    /// Writing outside the field or onto an occupied cell leaves the field
    /// untouched and reports why.
    pub fn place(&mut self, block: Block, cell: Cell) -> Result<(), PlaceError> {
        let (col, row) = self.index(cell).ok_or(PlaceError::OutOfBounds(OutOfBoundsWrite {
            col: cell.col,
            row: cell.row,
        }))?;
        let slot = &mut self.rows[row].cells[col];
        if slot.is_some() {
            return Err(PlaceError::Occupied { cell });
        }
        *slot = Some(block);
        Ok(())
    }

    /// Removes every full row and compacts the rows above it.
    ///
    /// Rows are scanned bottom to top with a write cursor starting at the
    /// bottom row: surviving rows are moved down to the cursor, full rows are
    /// emptied and their blocks reported as cleared. Rows left above the
    /// cursor end up empty.
    pub fn clear_full_lines(&mut self) -> LineClear {
        let mut clear = LineClear::default();
        let mut write = self.height();
        for y in (0..self.height()).rev() {
            if self.rows[y].is_filled() {
                clear.rows.push(y);
                for (x, slot) in self.rows[y].cells.iter_mut().enumerate() {
                    if let Some(block) = slot.take() {
                        clear.cleared_blocks.push(ClearedBlock {
                            block,
                            cell: Self::cell_at(x, y),
                        });
                    }
                }
                continue;
            }
            write -= 1;
            if write != y {
                // Rows in (y, write] are empty at this point, so the swap
                // leaves an empty row behind instead of a copy.
                self.rows.swap(write, y);
            }
        }
        let width = self.width();
        self.rows[..write].fill(FieldRow::empty(width));
        clear
    }

    /// Empties every cell.
    pub fn reset(&mut self) {
        let width = self.width();
        self.rows.fill(FieldRow::empty(width));
    }

    #[must_use]
    pub fn rows(&self) -> &[FieldRow] {
        &self.rows
    }

    /// Iterates over every locked block together with its cell.
    pub fn blocks(&self) -> impl Iterator<Item = (Cell, Block)> + '_ {
        self.rows.iter().enumerate().flat_map(|(y, row)| {
            row.cells
                .iter()
                .enumerate()
                .filter_map(move |(x, slot)| slot.map(|block| (Self::cell_at(x, y), block)))
        })
    }

    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.rows
            .iter()
            .map(|row| row.cells.iter().filter(|slot| slot.is_some()).count())
            .sum()
    }

    /// Returns whether any of the topmost `count` rows holds a block.
    #[must_use]
    pub fn has_blocks_in_top_rows(&self, count: usize) -> bool {
        self.rows.iter().take(count).any(|row| !row.is_empty())
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            for slot in &row.cells {
                let c = slot.map_or('.', |block| block.kind().as_char());
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(width: u16, height: u16) -> Field {
        Field::new(FieldConfig::new(width, height).unwrap())
    }

    fn fill_row(field: &mut Field, ids: &mut BlockIds, row: i32, skip: &[i32]) {
        let width = i32::try_from(field.width()).unwrap();
        for col in (0..width).filter(|col| !skip.contains(col)) {
            field
                .place(Block::new(ids.next_id(), ShapeKind::I), Cell::new(col, row))
                .unwrap();
        }
    }

    #[test]
    fn test_field_config_limits() {
        assert!(FieldConfig::new(4, 4).is_ok());
        assert_eq!(
            FieldConfig::new(3, 8),
            Err(FieldTooSmall {
                width: 3,
                height: 8
            })
        );
        assert!(FieldConfig::new(10, 3).is_err());
        assert_eq!(FieldConfig::STANDARD.spawn_origin(), Cell::new(4, 0));
        assert_eq!(
            FieldConfig::new(5, 10).unwrap().spawn_origin(),
            Cell::new(1, 0)
        );
    }

    #[test]
    fn test_initial_field_is_empty() {
        let field = field(10, 20);
        assert_eq!(field.rows().len(), 20);
        for row in field.rows() {
            assert_eq!(row.cells().len(), 10);
            assert!(row.is_empty());
        }
        assert_eq!(field.occupied_count(), 0);
    }

    #[test]
    fn test_is_occupied_bounds() {
        let field = field(10, 20);
        assert!(field.is_occupied(Cell::new(-1, 0)));
        assert!(field.is_occupied(Cell::new(10, 0)));
        assert!(field.is_occupied(Cell::new(0, 20)));
        assert!(!field.is_occupied(Cell::new(9, 19)));
        // Above the field only the horizontal bounds matter
        assert!(!field.is_occupied(Cell::new(5, -4)));
        assert!(field.is_occupied(Cell::new(-1, -1)));
        assert!(field.is_occupied(Cell::new(10, -1)));
    }

    #[test]
    fn test_place_and_read_back() {
        let mut field = field(10, 20);
        let mut ids = BlockIds::new();
        let block = Block::new(ids.next_id(), ShapeKind::T);
        field.place(block, Cell::new(3, 7)).unwrap();
        assert!(field.is_occupied(Cell::new(3, 7)));
        assert_eq!(field.block_at(Cell::new(3, 7)), Some(block));
        assert_eq!(field.occupied_count(), 1);
    }

    #[test]
    fn test_place_out_of_bounds_is_skipped() {
        let mut field = field(10, 20);
        let mut ids = BlockIds::new();
        let result = field.place(Block::new(ids.next_id(), ShapeKind::T), Cell::new(2, -1));
        assert_eq!(
            result,
            Err(PlaceError::OutOfBounds(OutOfBoundsWrite { col: 2, row: -1 }))
        );
        let result = field.place(Block::new(ids.next_id(), ShapeKind::T), Cell::new(10, 3));
        assert!(matches!(result, Err(PlaceError::OutOfBounds(_))));
        assert_eq!(field.occupied_count(), 0);
    }

    #[test]
    fn test_place_on_occupied_cell_keeps_first_block() {
        let mut field = field(10, 20);
        let mut ids = BlockIds::new();
        let first = Block::new(ids.next_id(), ShapeKind::S);
        let second = Block::new(ids.next_id(), ShapeKind::Z);
        field.place(first, Cell::new(0, 19)).unwrap();
        assert_eq!(
            field.place(second, Cell::new(0, 19)),
            Err(PlaceError::Occupied {
                cell: Cell::new(0, 19)
            })
        );
        assert_eq!(field.block_at(Cell::new(0, 19)), Some(first));
    }

    #[test]
    fn test_clear_lines_basic() {
        let mut field = field(10, 20);
        let mut ids = BlockIds::new();
        fill_row(&mut field, &mut ids, 0, &[]);

        let clear = field.clear_full_lines();
        assert_eq!(clear.count(), 1);
        assert_eq!(clear.rows(), &[0]);
        assert_eq!(clear.cleared_blocks().len(), 10);
        assert!(field.rows()[0].is_empty());
        assert_eq!(field.occupied_count(), 0);
    }

    #[test]
    fn test_clear_lines_with_partial_lines() {
        let mut field = field(10, 20);
        let mut ids = BlockIds::new();
        fill_row(&mut field, &mut ids, 19, &[9]);

        let clear = field.clear_full_lines();
        assert_eq!(clear.count(), 0);
        assert_eq!(field.occupied_count(), 9);
    }

    #[test]
    fn test_clear_lines_shifts_rows_above() {
        let mut field = field(10, 20);
        let mut ids = BlockIds::new();
        fill_row(&mut field, &mut ids, 19, &[]);
        let marker = Block::new(ids.next_id(), ShapeKind::O);
        field.place(marker, Cell::new(4, 17)).unwrap();

        let clear = field.clear_full_lines();
        assert_eq!(clear.count(), 1);
        assert_eq!(field.block_at(Cell::new(4, 18)), Some(marker));
        assert_eq!(field.block_at(Cell::new(4, 17)), None);
        assert!(field.rows()[0].is_empty());
    }

    #[test]
    fn test_clear_non_adjacent_lines() {
        let mut field = field(4, 8);
        let mut ids = BlockIds::new();
        fill_row(&mut field, &mut ids, 7, &[]);
        fill_row(&mut field, &mut ids, 6, &[0]);
        fill_row(&mut field, &mut ids, 5, &[]);
        let top = Block::new(ids.next_id(), ShapeKind::L);
        field.place(top, Cell::new(2, 4)).unwrap();

        let clear = field.clear_full_lines();
        assert_eq!(clear.rows(), &[7, 5]);
        // Row 6 had one full row below it, row 4 had two
        assert_eq!(field.rows()[7].cells().iter().flatten().count(), 3);
        assert!(field.rows()[7].cells()[0].is_none());
        assert_eq!(field.block_at(Cell::new(2, 6)), Some(top));
        for y in 0..6 {
            assert!(field.rows()[y].is_empty(), "row {y} should be empty");
        }
    }

    #[test]
    fn test_clear_lines_all_filled() {
        let mut field = field(4, 4);
        let mut ids = BlockIds::new();
        for row in 0..4 {
            fill_row(&mut field, &mut ids, row, &[]);
        }
        let clear = field.clear_full_lines();
        assert_eq!(clear.count(), 4);
        assert_eq!(clear.cleared_blocks().len(), 16);
        assert_eq!(field.occupied_count(), 0);
    }

    #[test]
    fn test_clear_lines_is_idempotent() {
        let mut field = field(10, 20);
        let mut ids = BlockIds::new();
        fill_row(&mut field, &mut ids, 19, &[]);
        fill_row(&mut field, &mut ids, 18, &[3]);
        assert_eq!(field.clear_full_lines().count(), 1);
        let snapshot = field.clone();
        assert_eq!(field.clear_full_lines().count(), 0);
        assert_eq!(field, snapshot);
    }

    #[test]
    fn test_shifted_rows_are_independent() {
        let mut field = field(4, 6);
        let mut ids = BlockIds::new();
        fill_row(&mut field, &mut ids, 5, &[]);
        field
            .place(Block::new(ids.next_id(), ShapeKind::T), Cell::new(0, 4))
            .unwrap();
        field.clear_full_lines();

        // Writing into the shifted row must not show up in any other row
        field
            .place(Block::new(ids.next_id(), ShapeKind::T), Cell::new(1, 5))
            .unwrap();
        assert_eq!(field.occupied_count(), 2);
        assert!(field.rows()[4].is_empty());
    }

    #[test]
    fn test_occupied_cells_stay_occupied_until_cleared() {
        let mut field = field(10, 20);
        let mut ids = BlockIds::new();
        field
            .place(Block::new(ids.next_id(), ShapeKind::J), Cell::new(5, 19))
            .unwrap();
        for col in 0..4 {
            field
                .place(Block::new(ids.next_id(), ShapeKind::J), Cell::new(col, 10))
                .unwrap();
            assert!(field.is_occupied(Cell::new(5, 19)));
        }
        assert_eq!(field.clear_full_lines().count(), 0);
        assert!(field.is_occupied(Cell::new(5, 19)));
    }

    #[test]
    fn test_reset() {
        let mut field = field(6, 12);
        let mut ids = BlockIds::new();
        fill_row(&mut field, &mut ids, 11, &[2]);
        field.reset();
        assert_eq!(field.occupied_count(), 0);
        assert_eq!(field.rows().len(), 12);
    }

    #[test]
    fn test_top_rows_and_blocks_iterator() {
        let mut field = field(4, 8);
        let mut ids = BlockIds::new();
        assert!(!field.has_blocks_in_top_rows(2));
        let block = Block::new(ids.next_id(), ShapeKind::Z);
        field.place(block, Cell::new(3, 1)).unwrap();
        assert!(field.has_blocks_in_top_rows(2));
        assert!(!field.has_blocks_in_top_rows(1));
        assert_eq!(field.blocks().collect::<Vec<_>>(), vec![(Cell::new(3, 1), block)]);
    }

    #[test]
    fn test_display() {
        let mut field = field(4, 4);
        let mut ids = BlockIds::new();
        field
            .place(Block::new(ids.next_id(), ShapeKind::O), Cell::new(0, 3))
            .unwrap();
        field
            .place(Block::new(ids.next_id(), ShapeKind::T), Cell::new(3, 3))
            .unwrap();
        assert_eq!(field.to_string(), "....\n....\n....\nO..T\n");
    }
}
