use arrayvec::ArrayVec;

use crate::{
    BlockIds, Direction, Field, FieldConfig, GameStats, HoldError, LineClear, LockAward,
    OutOfBoundsWrite, Piece, PiecePreview, PieceRole, PlaceError, ShapeGenerator, ShapeKind,
    SpawnBlocked,
};

/// Gravity cadence delivered to [`Simulation::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum Tick {
    /// Regular gravity, used while soft drop is off.
    Normal,
    /// Soft-drop gravity, used while soft drop is on.
    Fast,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum Phase {
    Falling,
    GameOver,
}

/// Result of one [`Simulation::step`].
#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum StepOutcome {
    /// The tick did not apply (wrong cadence or game over).
    Idle,
    /// The active piece moved down one row.
    Fell,
    /// The active piece landed and was locked into the field.
    Locked(LockReport),
}

/// Everything that happened while locking one piece.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockReport {
    pub line_clear: LineClear,
    pub award: LockAward,
    /// Blocks that were outside the field when the piece locked and were
    /// dropped instead of written.
    pub skipped_writes: ArrayVec<OutOfBoundsWrite, 4>,
    /// Whether this lock ended the game.
    pub game_over: bool,
}

/// The gameplay simulation: field, active/next/held pieces and scoring.
///
/// # Step Sequence
///
/// Each applicable tick moves the active piece down one row if it can and
/// then checks whether it rests on something. A resting piece is locked in the
/// same tick:
///
/// 1. Its blocks are written into the field (blocks outside are skipped)
/// 2. Full lines are cleared
/// 3. Score, level and combo are updated
/// 4. If either of the top two rows holds a block, the game is over
/// 5. Otherwise the next piece becomes active and a fresh next piece is drawn
///
/// # Hold
///
/// Hold is allowed once per spawned piece. The first hold stores the active
/// shape and promotes the next piece; later holds swap the active shape with
/// the held one. A rejected hold leaves the simulation unchanged.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Direction, FieldConfig, ShapeGenerator, ShapeKind, Simulation, Tick};
///
/// let generator = ShapeGenerator::new(&ShapeKind::ALL);
/// let mut sim = Simulation::new(FieldConfig::STANDARD, generator);
///
/// sim.move_piece(Direction::Left);
/// sim.rotate();
/// while !sim.step(Tick::Normal).is_locked() {}
///
/// assert_eq!(sim.stats().completed_pieces(), 1);
/// assert!(!sim.is_game_over());
/// ```
#[derive(Debug, Clone)]
pub struct Simulation {
    config: FieldConfig,
    field: Field,
    active: Option<Piece>,
    next: Piece,
    held: Option<Piece>,
    can_hold: bool,
    soft_drop: bool,
    phase: Phase,
    stats: GameStats,
    generator: ShapeGenerator,
    ids: BlockIds,
}

impl Simulation {
    #[must_use]
    pub fn new(config: FieldConfig, mut generator: ShapeGenerator) -> Self {
        let field = Field::new(config);
        let mut ids = BlockIds::new();
        let (active, next) = Self::first_pieces(&field, &mut generator, &mut ids);
        Self {
            config,
            field,
            active: Some(active),
            next,
            held: None,
            can_hold: true,
            soft_drop: false,
            phase: Phase::Falling,
            stats: GameStats::new(),
            generator,
            ids,
        }
    }

    fn first_pieces(
        field: &Field,
        generator: &mut ShapeGenerator,
        ids: &mut BlockIds,
    ) -> (Piece, Piece) {
        let mut spawn = |kind| {
            Piece::spawn(kind, field, ids).expect("every shape fits on an empty field")
        };
        let mut active = spawn(generator.pop_next());
        let next = spawn(generator.pop_next()).with_role(PieceRole::Next);
        active.settle_into_field();
        (active, next)
    }

    /// Discards all pieces and locked blocks and starts over on a new board.
    ///
    /// The shape generator keeps its state.
    pub fn reset(&mut self, config: FieldConfig) {
        self.config = config;
        self.field = Field::new(config);
        let (active, next) = Self::first_pieces(&self.field, &mut self.generator, &mut self.ids);
        self.active = Some(active);
        self.next = next;
        self.held = None;
        self.can_hold = true;
        self.soft_drop = false;
        self.phase = Phase::Falling;
        self.stats = GameStats::new();
    }

    #[must_use]
    pub fn config(&self) -> FieldConfig {
        self.config
    }

    #[must_use]
    pub fn field(&self) -> &Field {
        &self.field
    }

    /// The falling piece, absent once the game is over.
    #[must_use]
    pub fn active(&self) -> Option<&Piece> {
        self.active.as_ref()
    }

    #[must_use]
    pub fn next(&self) -> &Piece {
        &self.next
    }

    #[must_use]
    pub fn held(&self) -> Option<&Piece> {
        self.held.as_ref()
    }

    #[must_use]
    pub fn held_kind(&self) -> Option<ShapeKind> {
        self.held.as_ref().map(Piece::kind)
    }

    #[must_use]
    pub fn next_preview(&self) -> PiecePreview {
        self.next.preview(self.config)
    }

    #[must_use]
    pub fn held_preview(&self) -> Option<PiecePreview> {
        self.held.as_ref().map(|piece| piece.preview(self.config))
    }

    #[must_use]
    pub fn can_hold(&self) -> bool {
        self.can_hold
    }

    #[must_use]
    pub fn is_soft_drop(&self) -> bool {
        self.soft_drop
    }

    pub fn set_soft_drop(&mut self, on: bool) {
        self.soft_drop = on;
    }

    /// The tick cadence that currently drives gravity.
    #[must_use]
    pub fn gravity_tick(&self) -> Tick {
        if self.soft_drop {
            Tick::Fast
        } else {
            Tick::Normal
        }
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.phase.is_game_over()
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    /// Moves the active piece one cell. Returns whether it moved.
    pub fn move_piece(&mut self, direction: Direction) -> bool {
        match self.active.as_mut() {
            Some(piece) if self.phase.is_falling() => piece.try_move(direction, &self.field),
            _ => false,
        }
    }

    /// Rotates the active piece clockwise. Returns whether it rotated.
    pub fn rotate(&mut self) -> bool {
        match self.active.as_mut() {
            Some(piece) if self.phase.is_falling() => piece.try_rotate(&self.field),
            _ => false,
        }
    }

    /// Advances gravity by one tick.
    ///
    /// Ticks whose cadence does not match the soft-drop flag are ignored.
    pub fn step(&mut self, tick: Tick) -> StepOutcome {
        if self.phase.is_game_over() || tick != self.gravity_tick() {
            return StepOutcome::Idle;
        }
        let Some(mut piece) = self.active.take() else {
            return StepOutcome::Idle;
        };
        let fell = piece.try_move(Direction::Down, &self.field);
        if !piece.is_landing(&self.field) {
            self.active = Some(piece);
            return if fell {
                StepOutcome::Fell
            } else {
                StepOutcome::Idle
            };
        }
        StepOutcome::Locked(self.lock(&piece))
    }

    fn lock(&mut self, piece: &Piece) -> LockReport {
        let mut skipped_writes = ArrayVec::new();
        for (cell, block) in piece.placed_blocks() {
            match self.field.place(block, cell) {
                Ok(()) | Err(PlaceError::Occupied { .. }) => {}
                Err(PlaceError::OutOfBounds(write)) => skipped_writes.push(write),
            }
        }

        let line_clear = self.field.clear_full_lines();
        let award = self.stats.complete_piece_drop(line_clear.count());

        if self.field.has_blocks_in_top_rows(2) {
            self.phase = Phase::GameOver;
        } else {
            self.spawn_next();
        }

        LockReport {
            line_clear,
            award,
            skipped_writes,
            game_over: self.phase.is_game_over(),
        }
    }

    fn spawn_next(&mut self) {
        let fresh = match Piece::spawn(self.generator.pop_next(), &self.field, &mut self.ids) {
            Ok(piece) => piece.with_role(PieceRole::Next),
            Err(SpawnBlocked) => {
                self.phase = Phase::GameOver;
                return;
            }
        };
        let mut active = std::mem::replace(&mut self.next, fresh).with_role(PieceRole::Active);
        self.soft_drop = false;
        self.can_hold = true;
        active.settle_into_field();
        if self.field.is_colliding(active.cells()) {
            self.phase = Phase::GameOver;
            return;
        }
        self.active = Some(active);
    }

    /// Swaps the active piece with the hold slot.
    ///
    /// On error nothing changes; the error only says why the hold was refused.
    pub fn hold(&mut self) -> Result<(), HoldError> {
        let Some(active) = self.active.as_ref().filter(|_| self.phase.is_falling()) else {
            return Err(HoldError::NotPlaying);
        };
        if !self.can_hold {
            return Err(HoldError::HoldAlreadyUsed);
        }
        let active_kind = active.kind();

        let mut generator = self.generator.clone();
        let (mut promoted, new_next) = if let Some(held) = &self.held {
            let restored = Piece::spawn(held.kind(), &self.field, &mut self.ids)
                .map_err(|SpawnBlocked| HoldError::PieceCollision)?;
            (restored, None)
        } else {
            let fresh = Piece::spawn(generator.pop_next(), &self.field, &mut self.ids)
                .map_err(|SpawnBlocked| HoldError::PieceCollision)?;
            let promoted = self.next.clone().with_role(PieceRole::Active);
            (promoted, Some(fresh.with_role(PieceRole::Next)))
        };
        promoted.settle_into_field();
        if self.field.is_colliding(promoted.cells()) {
            return Err(HoldError::PieceCollision);
        }

        if let Some(next) = new_next {
            self.next = next;
            self.generator = generator;
        }
        self.held = Some(Piece::held(active_kind, &mut self.ids));
        self.active = Some(promoted);
        self.can_hold = false;
        Ok(())
    }
}

#[cfg(test)]
use crate::{Block, Cell};

#[cfg(test)]
impl Simulation {
    /// Places filler blocks straight into the field.
    pub(crate) fn fill_row(&mut self, row: i32, cols: impl IntoIterator<Item = i32>) {
        for col in cols {
            let block = Block::new(self.ids.next_id(), ShapeKind::O);
            self.field.place(block, Cell::new(col, row)).unwrap();
        }
    }

    pub(crate) fn stats_mut(&mut self) -> &mut GameStats {
        &mut self.stats
    }
}
