//! Falling-block puzzle engine.
//!
//! - [`core`](crate::core) holds the board primitives: cells, shapes, the locked-block
//!   field and the four-block piece.
//! - [`engine`](crate::engine) drives a game: stage table, shape generation, scoring, the
//!   per-step simulation and the frame-driven session controller.

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// A new active piece could not be placed because it overlaps the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("piece colliding when spawning")]
pub struct SpawnBlocked;

/// A block write fell outside the field and was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("block at ({col}, {row}) is outside the field")]
pub struct OutOfBoundsWrite {
    pub col: i32,
    pub row: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum PlaceError {
    #[display("{_0}")]
    OutOfBounds(OutOfBoundsWrite),
    #[display("cell {cell} is already occupied")]
    Occupied { cell: Cell },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum HoldError {
    #[display("hold is only possible while a piece is falling")]
    NotPlaying,
    #[display("hold already used for this piece")]
    HoldAlreadyUsed,
    /// The piece that would become active overlaps locked blocks.
    #[display("piece colliding when holding piece")]
    PieceCollision,
}
