//! Board primitives.
//!
//! - [`Cell`] / [`Direction`] - integer coordinates and unit moves
//! - [`ShapeKind`] / [`Color`] - the seven tetromino shapes
//! - [`Field`] - the grid of locked blocks with line clearing
//! - [`Piece`] - four blocks moved and rotated as one unit

pub use self::{cell::*, field::*, piece::*, shape::*};

mod cell;
mod field;
mod piece;
mod shape;
