//! A greedy steering policy used to drive games without a human player
use crate::direction::Direction;
use crate::grid::{BoundaryMode, Cell, Grid};
use crate::simulation::Snapshot;

/// Choose a direction for the next tick: the safe move that brings the head
/// closest to the food, preferring to keep going straight on ties.  A move is
/// safe if it keeps the head on the grid and off the snake's body, tail
/// included.
///
/// Returns `None` if the game is over or every move is fatal.
pub fn steer(snapshot: &Snapshot) -> Option<Direction> {
    let state = &snapshot.state;
    if !state.is_running() {
        return None;
    }
    let current = state.direction();
    let head = state.snake().head();
    Direction::ALL
        .into_iter()
        .filter(|&d| d != current.reverse())
        .filter_map(|d| {
            let cell = destination(snapshot.grid, snapshot.boundary, head, d)?;
            (!state.snake().contains(cell)).then_some((d, cell))
        })
        .min_by_key(|&(d, cell)| {
            let dist = state.food().map_or(0, |food| {
                distance(snapshot.grid, snapshot.boundary, cell, food)
            });
            (dist, d != current)
        })
        .map(|(d, _)| d)
}

/// Return the cell the head would land on by moving in `direction`, or
/// `None` if it would leave a bounded grid
fn destination(grid: Grid, mode: BoundaryMode, head: Cell, direction: Direction) -> Option<Cell> {
    let cell = grid.normalize(head.step(direction), mode);
    grid.contains(cell).then_some(cell)
}

/// Manhattan distance between two cells, taking the short way around a
/// wrapping grid
fn distance(grid: Grid, mode: BoundaryMode, a: Cell, b: Cell) -> u32 {
    let dx = a.x.abs_diff(b.x);
    let dy = a.y.abs_diff(b.y);
    match mode {
        BoundaryMode::Bounded => dx + dy,
        BoundaryMode::Wrapping => {
            let w = u32::from(grid.width());
            let h = u32::from(grid.height());
            dx.min(w.saturating_sub(dx)) + dy.min(h.saturating_sub(dy))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scores::ScoreStore;
    use crate::simulation::{Settings, SimulationState, SnakeSimulation};
    use crate::snake::Snake;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;
    use rstest::rstest;

    fn snapshot(
        cells: &[(i32, i32)],
        direction: Direction,
        food: (i32, i32),
        boundary: BoundaryMode,
    ) -> Snapshot {
        let settings = Settings {
            grid: Grid::new(5, 5).unwrap(),
            boundary,
            initial_length: 2,
        };
        let snake = Snake::new(cells.iter().copied().map(Cell::from)).unwrap();
        let state = SimulationState::new(snake, direction, Cell::from(food));
        SnakeSimulation::from_state(
            settings,
            state,
            ScoreStore::in_memory(),
            ChaCha12Rng::seed_from_u64(0),
        )
        .unwrap()
        .snapshot()
    }

    #[rstest]
    #[case((4, 2), Direction::Right)]
    #[case((2, 0), Direction::Up)]
    #[case((2, 4), Direction::Down)]
    fn heads_for_food(#[case] food: (i32, i32), #[case] expected: Direction) {
        let snap = snapshot(
            &[(2, 2), (1, 2)],
            Direction::Right,
            food,
            BoundaryMode::Bounded,
        );
        assert_eq!(steer(&snap), Some(expected));
    }

    #[test]
    fn never_reverses() {
        // The food is directly behind the snake.
        let snap = snapshot(
            &[(2, 2), (3, 2)],
            Direction::Left,
            (4, 2),
            BoundaryMode::Bounded,
        );
        let d = steer(&snap).unwrap();
        assert_ne!(d, Direction::Right);
    }

    #[test]
    fn ties_keep_going_straight() {
        // Up and Right are equally far from the food.
        let snap = snapshot(
            &[(2, 2), (1, 2)],
            Direction::Right,
            (4, 0),
            BoundaryMode::Bounded,
        );
        assert_eq!(steer(&snap), Some(Direction::Right));
    }

    #[test]
    fn avoids_wall() {
        let snap = snapshot(
            &[(4, 0), (3, 0)],
            Direction::Right,
            (4, 4),
            BoundaryMode::Bounded,
        );
        assert_eq!(steer(&snap), Some(Direction::Down));
    }

    #[test]
    fn wraps_towards_food() {
        let snap = snapshot(
            &[(4, 2), (3, 2)],
            Direction::Right,
            (0, 2),
            BoundaryMode::Wrapping,
        );
        assert_eq!(steer(&snap), Some(Direction::Right));
    }

    #[test]
    fn avoids_own_body() {
        // . . . . .
        // . # # . .
        // . # H . .
        // . # # . .
        // . . * . .
        let snap = snapshot(
            &[(2, 2), (2, 1), (1, 1), (1, 2), (1, 3), (2, 3)],
            Direction::Down,
            (2, 4),
            BoundaryMode::Bounded,
        );
        assert_eq!(steer(&snap), Some(Direction::Right));
    }

    #[test]
    fn trapped() {
        // Boxed into the top-left corner by its own body
        let snap = snapshot(
            &[(0, 0), (0, 1), (1, 1), (1, 0)],
            Direction::Up,
            (4, 4),
            BoundaryMode::Bounded,
        );
        assert_eq!(steer(&snap), None);
    }

    #[test]
    fn plays_whole_games() {
        let settings = Settings {
            grid: Grid::new(8, 6).unwrap(),
            boundary: BoundaryMode::Wrapping,
            initial_length: 3,
        };
        let mut sim = SnakeSimulation::new_with_rng(
            settings,
            ScoreStore::in_memory(),
            ChaCha12Rng::seed_from_u64(0x5EED),
        )
        .unwrap();
        let mut ticks = 0;
        while sim.is_running() && ticks < 10_000 {
            if let Some(d) = steer(&sim.snapshot()) {
                let _ = sim.request_direction(d);
            }
            let _ = sim.advance();
            ticks += 1;
        }
        assert!(sim.state().score() > 0, "autopilot never ate anything");
    }
}
