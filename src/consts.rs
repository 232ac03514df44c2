//! Assorted constants & hard-coded configuration
use std::time::Duration;

/// Number of cells in the snake's body when a game starts
pub const INITIAL_SNAKE_LENGTH: usize = 3;

/// Default number of simulation ticks per second (one move every 200 ms)
pub const DEFAULT_SPEED: u32 = 5;

/// Slowest permitted simulation speed, in ticks per second
pub const MIN_SPEED: u32 = 1;

/// Fastest permitted simulation speed, in ticks per second
pub const MAX_SPEED: u32 = 30;

/// Key under which the best score is kept in a key-value store
pub const BEST_SCORE_KEY: &str = "best-score";

/// Interval between scheduler invocations in the headless runner, roughly one
/// display refresh at 60 Hz
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// When sampling a food position at random, give up and enumerate the free
/// cells after this many rejected draws.
pub const MAX_FOOD_SAMPLES: usize = 32;
