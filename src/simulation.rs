use crate::consts;
use crate::direction::Direction;
use crate::food::FoodSpawner;
use crate::grid::{BoundaryMode, Cell, Grid, LevelSize};
use crate::input::InputBuffer;
use crate::scores::ScoreStore;
use crate::snake::{Snake, SnakeError};
use rand::Rng;
use serde::{ser::SerializeStruct, Serialize, Serializer};
use std::fmt;
use thiserror::Error;
use tracing::instrument;

/// Parameters fixed for the lifetime of a game
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Settings {
    pub grid: Grid,
    pub boundary: BoundaryMode,
    /// Number of cells in the snake at the start of a game
    pub initial_length: usize,
}

impl Settings {
    pub fn new(grid: Grid) -> Settings {
        Settings {
            grid,
            ..Settings::default()
        }
    }

    /// Check that a new game can be started with these settings: the initial
    /// snake must fit on the top row of the grid and leave room for food.
    pub fn validate(&self) -> Result<(), SetupError> {
        if self.initial_length == 0 {
            Err(SetupError::Snake(SnakeError::Empty))
        } else if self.initial_length > usize::from(self.grid.width())
            || self.initial_length >= self.grid.area()
        {
            Err(SetupError::SnakeTooLong {
                length: self.initial_length,
                grid: self.grid,
            })
        } else {
            Ok(())
        }
    }

    /// Return the starting position of the snake's head and the direction
    /// it initially faces.  The snake starts along the top row with its tail
    /// in the top-left corner, heading right.
    fn start(&self) -> (Cell, Direction) {
        let x = i32::try_from(self.initial_length.saturating_sub(1)).unwrap_or(0);
        (Cell::new(x, 0), Direction::Right)
    }
}

impl Default for Settings {
    fn default() -> Settings {
        Settings {
            grid: LevelSize::default().grid(),
            boundary: BoundaryMode::default(),
            initial_length: consts::INITIAL_SNAKE_LENGTH,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    Running,
    Terminated(Termination),
}

/// Why a game ended
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Termination {
    /// The snake left the grid while boundaries were not wrapping
    Wall,

    /// The snake ran into its own body
    SelfCollision,

    /// The snake has filled the board and there are no more cells to place
    /// food in.
    BoardFull,
}

impl Termination {
    pub fn as_str(self) -> &'static str {
        match self {
            Termination::Wall => "wall",
            Termination::SelfCollision => "self-collision",
            Termination::BoardFull => "board-full",
        }
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// The mutable state of a single game
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SimulationState {
    snake: Snake,
    /// Holds both the direction of the last move and the one for the next
    input: InputBuffer,
    /// `None` only once the board is full
    food: Option<Cell>,
    score: u32,
    phase: Phase,
}

impl SimulationState {
    /// Construct a running game state with the snake `snake` heading in
    /// `direction` and food at `food`.  The state is checked against the grid
    /// when passed to [`SnakeSimulation::from_state()`].
    pub fn new(snake: Snake, direction: Direction, food: Cell) -> SimulationState {
        SimulationState {
            snake,
            input: InputBuffer::new(direction),
            food: Some(food),
            score: 0,
            phase: Phase::Running,
        }
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    /// The direction the snake moved in on the last tick
    pub fn direction(&self) -> Direction {
        self.input.current()
    }

    /// The direction the snake will move in on the next tick
    pub fn pending_direction(&self) -> Direction {
        self.input.pending()
    }

    pub fn food(&self) -> Option<Cell> {
        self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }
}

impl Serialize for SimulationState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut st = serializer.serialize_struct("SimulationState", 6)?;
        st.serialize_field("snake", &self.snake)?;
        st.serialize_field("direction", &self.input.current())?;
        st.serialize_field("pending_direction", &self.input.pending())?;
        st.serialize_field("food", &self.food)?;
        st.serialize_field("score", &self.score)?;
        st.serialize_field("phase", &self.phase)?;
        st.end()
    }
}

/// A read-only copy of a game, as handed to whatever is presenting it
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Snapshot {
    /// Number of ticks since the game started
    pub tick: u64,
    pub grid: Grid,
    pub boundary: BoundaryMode,
    pub best_score: u32,
    #[serde(flatten)]
    pub state: SimulationState,
}

/// What happened on a call to [`SnakeSimulation::advance()`]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// The snake moved one cell without eating
    Moved,

    /// The snake moved onto the food and grew by one cell
    Ate,

    /// The game ended on this tick
    Terminated(Termination),

    /// The game had already ended, so nothing happened
    Idle,
}

/// The game engine: owns the state of a game and advances it one tick at a
/// time
#[derive(Debug)]
pub struct SnakeSimulation<R = rand::rngs::ThreadRng> {
    settings: Settings,
    spawner: FoodSpawner<R>,
    scores: ScoreStore,
    state: SimulationState,
    tick: u64,
}

impl SnakeSimulation<rand::rngs::ThreadRng> {
    pub fn new(settings: Settings, scores: ScoreStore) -> Result<Self, SetupError> {
        SnakeSimulation::new_with_rng(settings, scores, rand::rng())
    }
}

impl<R: Rng> SnakeSimulation<R> {
    /// Start a new game with the given settings
    pub fn new_with_rng(
        settings: Settings,
        scores: ScoreStore,
        rng: R,
    ) -> Result<SnakeSimulation<R>, SetupError> {
        settings.validate()?;
        let mut spawner = FoodSpawner::new(rng);
        let state = initial_state(&settings, &mut spawner)?;
        Ok(SnakeSimulation {
            settings,
            spawner,
            scores,
            state,
            tick: 0,
        })
    }

    /// Resume a game from an arbitrary running state.  `settings.initial_length`
    /// only takes effect on the next [`reset()`][SnakeSimulation::reset].
    pub fn from_state(
        settings: Settings,
        state: SimulationState,
        scores: ScoreStore,
        rng: R,
    ) -> Result<SnakeSimulation<R>, SetupError> {
        settings.validate()?;
        let grid = settings.grid;
        if let Some(cell) = state.snake.cells().find(|&c| !grid.contains(c)) {
            return Err(SetupError::OutOfBounds(cell));
        }
        if let Some(food) = state.food {
            if !grid.contains(food) {
                return Err(SetupError::OutOfBounds(food));
            }
            if state.snake.contains(food) {
                return Err(SetupError::FoodOnSnake(food));
            }
        }
        Ok(SnakeSimulation {
            settings,
            spawner: FoodSpawner::new(rng),
            scores,
            state,
            tick: 0,
        })
    }

    /// Throw away the current game and start a new one
    pub fn reset(&mut self) {
        match initial_state(&self.settings, &mut self.spawner) {
            Ok(state) => self.state = state,
            // Settings were validated on construction, so a fresh snake
            // always fits.
            Err(e) => tracing::error!(error = %e, "Failed to reset game"),
        }
        self.tick = 0;
        tracing::debug!(best_score = self.scores.best(), "Started new game");
    }

    /// Move the game forwards by one tick
    #[instrument(level = "trace", skip_all, fields(tick = self.tick))]
    pub fn advance(&mut self) -> Outcome {
        if !self.state.is_running() {
            return Outcome::Idle;
        }
        self.tick += 1;
        let direction = self.state.input.consume();
        let grid = self.settings.grid;
        let mut head = self.state.snake.head().step(direction);
        match self.settings.boundary {
            BoundaryMode::Wrapping => head = grid.normalize(head, BoundaryMode::Wrapping),
            BoundaryMode::Bounded => {
                if !grid.contains(head) {
                    return self.terminate(Termination::Wall);
                }
            }
        }
        // The tail has not moved out of the way yet, so running into it counts.
        if self.state.snake.contains(head) {
            return self.terminate(Termination::SelfCollision);
        }
        self.state.snake.push_head(head);
        if self.state.food == Some(head) {
            self.state.score += 1;
            if self.state.score > self.scores.best() {
                tracing::info!(score = self.state.score, "New best score");
                self.scores.save(self.state.score);
            }
            self.state.food = self.spawner.spawn(grid, self.state.snake.occupied());
            match self.state.food {
                Some(food) => tracing::debug!(%food, "Placed food"),
                None => return self.terminate(Termination::BoardFull),
            }
            Outcome::Ate
        } else {
            let _ = self.state.snake.pop_tail();
            Outcome::Moved
        }
    }

    fn terminate(&mut self, cause: Termination) -> Outcome {
        tracing::debug!(%cause, score = self.state.score, tick = self.tick, "Game over");
        self.state.phase = Phase::Terminated(cause);
        Outcome::Terminated(cause)
    }
}

impl<R> SnakeSimulation<R> {
    /// Ask for the snake to turn.  Returns whether the request was accepted.
    pub fn request_direction(&mut self, direction: Direction) -> bool {
        self.state.input.request_direction(direction)
    }

    /// Change how the grid's edges behave, starting with the next tick
    pub fn set_boundary_mode(&mut self, mode: BoundaryMode) {
        if self.settings.boundary != mode {
            tracing::debug!(%mode, "Changed boundary mode");
            self.settings.boundary = mode;
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// Number of ticks since the current game started
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn best_score(&self) -> u32 {
        self.scores.best()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tick: self.tick,
            grid: self.settings.grid,
            boundary: self.settings.boundary,
            best_score: self.scores.best(),
            state: self.state.clone(),
        }
    }
}

fn initial_state<R: Rng>(
    settings: &Settings,
    spawner: &mut FoodSpawner<R>,
) -> Result<SimulationState, SetupError> {
    let (head, direction) = settings.start();
    let snake = Snake::in_line(head, direction, settings.initial_length)?;
    let food = spawner
        .spawn(settings.grid, snake.occupied())
        .ok_or(SetupError::SnakeTooLong {
            length: settings.initial_length,
            grid: settings.grid,
        })?;
    Ok(SimulationState::new(snake, direction, food))
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum SetupError {
    #[error(transparent)]
    Snake(#[from] SnakeError),
    #[error("a snake of length {length} does not fit on a {grid} grid with room for food")]
    SnakeTooLong { length: usize, grid: Grid },
    #[error("cell {0} is outside the grid")]
    OutOfBounds(Cell),
    #[error("food at {0} is on the snake")]
    FoodOnSnake(Cell),
}
