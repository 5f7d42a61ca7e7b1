//! Game engine logic and state management.
//!
//! This module drives a game on top of the [`core`](crate::core) primitives:
//!
//! - [`StageTable`] / [`StageConfig`] - curriculum presets (board, shapes, hold)
//! - [`ShapeGenerator`] / [`ShapeSeed`] - seeded source of upcoming shapes
//! - [`GameStats`] - score, level and combo bookkeeping
//! - [`Simulation`] - field, active/next/held pieces and the lock sequence
//! - [`GameSession`] - frame-driven controller with menu, pause and game over
//!
//! # Game Flow
//!
//! 1. Pick a stage and start a [`GameSession`]
//! 2. Feed player [`Intent`]s and call [`GameSession::increment_frame`] once per frame
//! 3. Gravity ticks move the active piece down until it lands and locks
//! 4. Full lines are cleared, points awarded and the next piece spawns
//! 5. The game ends once a lock leaves blocks in the top two rows
//!
//! For headless use, [`Simulation`] can be driven directly with
//! [`Simulation::step`].
//!
//! # Example
//!
//! ```
//! use blockfall_engine::{Direction, ShapeGenerator, StageTable, Simulation, Tick};
//!
//! let stages = StageTable::default();
//! let stage = stages.get(2);
//! let generator = ShapeGenerator::new(&stage.allowed_shapes);
//! let mut sim = Simulation::new(stage.field_config().unwrap(), generator);
//!
//! sim.move_piece(Direction::Right);
//! sim.set_soft_drop(true);
//! while !sim.step(Tick::Fast).is_locked() {}
//!
//! println!("score: {}", sim.stats().score());
//! ```

pub use self::{game_session::*, game_stats::*, shape_generator::*, simulation::*, stage::*};

mod game_session;
mod game_stats;
mod shape_generator;
mod simulation;
mod stage;
