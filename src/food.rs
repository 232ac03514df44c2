use crate::consts;
use crate::grid::{Cell, Grid};
use rand::{seq::IteratorRandom, Rng};
use std::collections::HashSet;

/// Chooses where to place food
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FoodSpawner<R> {
    rng: R,
}

impl<R: Rng> FoodSpawner<R> {
    pub fn new(rng: R) -> FoodSpawner<R> {
        FoodSpawner { rng }
    }

    /// Pick a cell of `grid` that is not in `occupied`, uniformly at random.
    /// Returns `None` if every cell of the grid is occupied.
    ///
    /// While the grid is mostly empty, cells are drawn from the whole grid and
    /// redrawn on hitting an occupied one.  Once the grid is at least half
    /// full, or after too many redraws, the free cells are enumerated and one
    /// is chosen directly, so the number of draws is always bounded.
    pub fn spawn(&mut self, grid: Grid, occupied: &HashSet<Cell>) -> Option<Cell> {
        let area = grid.area();
        let taken = occupied.iter().filter(|&&c| grid.contains(c)).count();
        if taken >= area {
            return None;
        }
        if taken.saturating_mul(2) < area {
            for _ in 0..consts::MAX_FOOD_SAMPLES {
                let cell = grid.cell_at(self.rng.random_range(0..area))?;
                if !occupied.contains(&cell) {
                    return Some(cell);
                }
            }
        }
        grid.cells()
            .filter(|c| !occupied.contains(c))
            .choose(&mut self.rng)
    }
}
