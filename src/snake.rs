use crate::direction::Direction;
use crate::grid::Cell;
use serde::{Serialize, Serializer};
use std::collections::{HashSet, VecDeque};
use thiserror::Error;

/// Snake state.  Snate.
///
/// The cells behind the head are also kept as a set for constant-time
/// occupancy checks; the set always holds exactly `head` plus `body`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Snake {
    /// The position of the snake's head
    head: Cell,

    /// The positions of the rest of the snake, nearest the head first
    body: VecDeque<Cell>,

    /// Every cell occupied by the snake, head included
    occupied: HashSet<Cell>,
}

impl Snake {
    /// Create a snake from its cells, head first.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `cells` is empty or contains any cell more than once.
    pub fn new<I: IntoIterator<Item = Cell>>(cells: I) -> Result<Snake, SnakeError> {
        let mut iter = cells.into_iter();
        let head = iter.next().ok_or(SnakeError::Empty)?;
        let mut snake = Snake {
            head,
            body: VecDeque::new(),
            occupied: HashSet::from([head]),
        };
        for cell in iter {
            if !snake.occupied.insert(cell) {
                return Err(SnakeError::Overlap(cell));
            }
            snake.body.push_back(cell);
        }
        Ok(snake)
    }

    /// Create a straight snake of `length` cells with its head at `head`,
    /// facing in `direction`, so that the rest of the body trails behind it.
    pub fn in_line(head: Cell, direction: Direction, length: usize) -> Result<Snake, SnakeError> {
        let behind = direction.reverse();
        Snake::new(std::iter::successors(Some(head), |&c| Some(c.step(behind))).take(length))
    }

    /// Return the position of the snake's head
    pub fn head(&self) -> Cell {
        self.head
    }

    /// Return the position of the snake's last cell, which is the head if the
    /// snake is only one cell long
    pub fn tail(&self) -> Cell {
        self.body.back().copied().unwrap_or(self.head)
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.body.len() + 1
    }

    /// Does any part of the snake, tail included, lie on `cell`?
    pub fn contains(&self, cell: Cell) -> bool {
        self.occupied.contains(&cell)
    }

    /// Iterate over the snake's cells from head to tail
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        std::iter::once(self.head).chain(self.body.iter().copied())
    }

    /// Return the set of cells occupied by the snake
    pub fn occupied(&self) -> &HashSet<Cell> {
        &self.occupied
    }

    /// Make `cell` the new head.  The caller is responsible for checking that
    /// `cell` is not already part of the snake.
    pub(crate) fn push_head(&mut self, cell: Cell) {
        debug_assert!(!self.occupied.contains(&cell), "snake would overlap itself");
        self.occupied.insert(cell);
        self.body.push_front(self.head);
        self.head = cell;
    }

    /// Remove and return the last cell of the snake.  The head is never
    /// removed.
    pub(crate) fn pop_tail(&mut self) -> Option<Cell> {
        let cell = self.body.pop_back()?;
        self.occupied.remove(&cell);
        Some(cell)
    }
}

impl Serialize for Snake {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.cells())
    }
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum SnakeError {
    #[error("snake must have at least one cell")]
    Empty,
    #[error("snake occupies cell {0} more than once")]
    Overlap(Cell),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn in_line_trails_behind_head() {
        let snake = Snake::in_line(Cell::new(2, 0), Direction::Right, 3).unwrap();
        assert_eq!(
            snake.cells().collect::<Vec<_>>(),
            [Cell::new(2, 0), Cell::new(1, 0), Cell::new(0, 0)]
        );
        assert_eq!(snake.head(), Cell::new(2, 0));
        assert_eq!(snake.tail(), Cell::new(0, 0));
        assert_eq!(snake.len(), 3);
    }

    #[test]
    fn empty_snake() {
        assert_eq!(Snake::new(Vec::new()), Err(SnakeError::Empty));
        assert_eq!(
            Snake::in_line(Cell::new(0, 0), Direction::Up, 0),
            Err(SnakeError::Empty)
        );
    }

    #[test]
    fn overlapping_snake() {
        let r = Snake::new([Cell::new(1, 1), Cell::new(1, 2), Cell::new(1, 1)]);
        assert_eq!(r, Err(SnakeError::Overlap(Cell::new(1, 1))));
    }

    #[test]
    fn push_and_pop() {
        let mut snake = Snake::new([Cell::new(1, 0), Cell::new(0, 0)]).unwrap();
        snake.push_head(Cell::new(2, 0));
        assert!(snake.contains(Cell::new(2, 0)));
        assert_eq!(snake.pop_tail(), Some(Cell::new(0, 0)));
        assert!(!snake.contains(Cell::new(0, 0)));
        assert_eq!(
            snake.cells().collect::<Vec<_>>(),
            [Cell::new(2, 0), Cell::new(1, 0)]
        );
        assert_eq!(snake.occupied().len(), snake.len());
    }

    #[test]
    fn never_pop_head() {
        let mut snake = Snake::new([Cell::new(4, 4)]).unwrap();
        assert_eq!(snake.pop_tail(), None);
        assert_eq!(snake.len(), 1);
        assert_eq!(snake.head(), Cell::new(4, 4));
    }

    #[test]
    fn serialize_as_list() {
        let snake = Snake::new([Cell::new(1, 0), Cell::new(0, 0)]).unwrap();
        assert_eq!(
            serde_json::to_string(&snake).unwrap(),
            r#"[{"x":1,"y":0},{"x":0,"y":0}]"#
        );
    }
}
