//! Fixed-step simulation and timing engine for the game of Snake
//!
//! The engine owns the rules of the game (movement, growth, food placement,
//! collisions, scoring) and the pacing of the game, leaving drawing and
//! keyboard handling to whatever hosts it.  A host typically builds a
//! [`Session`], calls [`Session::frame()`] once per display refresh, forwards
//! direction requests with [`Session::request_direction()`], and renders the
//! [`Snapshot`] produced by each tick.
pub mod autopilot;
pub mod clock;
pub mod config;
pub mod consts;
pub mod direction;
pub mod food;
pub mod grid;
pub mod input;
pub mod scores;
pub mod session;
pub mod simulation;
pub mod snake;
pub mod util;

pub use crate::clock::{Clock, Speed};
pub use crate::direction::Direction;
pub use crate::grid::{BoundaryMode, Cell, Grid, LevelSize};
pub use crate::scores::{FileStore, KeyValueStore, MemoryStore, ScoreStore};
pub use crate::session::Session;
pub use crate::simulation::{
    Outcome, Phase, Settings, SetupError, SimulationState, SnakeSimulation, Snapshot, Termination,
};
pub use crate::snake::Snake;
