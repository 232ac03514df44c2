use crate::direction::Direction;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A position on the grid.  Coordinates are signed so that a step off the
/// edge of the grid can be represented before it is checked.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Cell {
        Cell { x, y }
    }

    /// Return the cell one step away in `direction`, without regard for any
    /// grid bounds
    pub fn step(self, direction: Direction) -> Cell {
        let (dx, dy) = direction.delta();
        Cell {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

impl From<(i32, i32)> for Cell {
    fn from((x, y): (i32, i32)) -> Cell {
        Cell { x, y }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// What happens when the snake moves past an edge of the grid
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryMode {
    /// Leaving the grid ends the game
    #[default]
    Bounded,

    /// Leaving the grid reenters it on the opposite side
    #[serde(alias = "wrap")]
    Wrapping,
}

impl BoundaryMode {
    pub fn as_str(self) -> &'static str {
        match self {
            BoundaryMode::Bounded => "bounded",
            BoundaryMode::Wrapping => "wrapping",
        }
    }
}

impl fmt::Display for BoundaryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// The rectangular space of cells in which the game is played.  Cells run
/// from `(0, 0)` in the top-left corner to `(width - 1, height - 1)` in the
/// bottom-right.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
pub struct Grid {
    width: u16,
    height: u16,
}

impl Grid {
    pub fn new(width: u16, height: u16) -> Result<Grid, GridError> {
        if width == 0 || height == 0 {
            Err(GridError { width, height })
        } else {
            Ok(Grid { width, height })
        }
    }

    pub fn width(self) -> u16 {
        self.width
    }

    pub fn height(self) -> u16 {
        self.height
    }

    /// Total number of cells in the grid
    pub fn area(self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }

    pub fn contains(self, cell: Cell) -> bool {
        (0..i32::from(self.width)).contains(&cell.x) && (0..i32::from(self.height)).contains(&cell.y)
    }

    /// Under [`BoundaryMode::Wrapping`], return `cell` with its coordinates
    /// wrapped around to lie within the grid.  Under
    /// [`BoundaryMode::Bounded`], `cell` is returned unchanged; whether it
    /// lies within the grid is for the caller to check with
    /// [`Grid::contains()`].
    pub fn normalize(self, cell: Cell, mode: BoundaryMode) -> Cell {
        match mode {
            BoundaryMode::Bounded => cell,
            BoundaryMode::Wrapping => Cell {
                x: cell.x.rem_euclid(i32::from(self.width)),
                y: cell.y.rem_euclid(i32::from(self.height)),
            },
        }
    }

    /// Iterate over every cell in the grid in row-major order
    pub fn cells(self) -> impl Iterator<Item = Cell> {
        let width = i32::from(self.width);
        (0..i32::from(self.height)).flat_map(move |y| (0..width).map(move |x| Cell { x, y }))
    }

    /// Return the cell with the given row-major index, if there is one
    pub fn cell_at(self, index: usize) -> Option<Cell> {
        if index >= self.area() {
            return None;
        }
        let width = usize::from(self.width);
        let x = i32::try_from(index % width).ok()?;
        let y = i32::try_from(index / width).ok()?;
        Some(Cell { x, y })
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[error("grid dimensions must be nonzero; got {width}x{height}")]
pub struct GridError {
    width: u16,
    height: u16,
}

/// Preset grid sizes
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelSize {
    Small,
    Medium,
    #[default]
    Large,
}

impl LevelSize {
    pub fn grid(self) -> Grid {
        let (width, height) = match self {
            LevelSize::Small => (38, 8),
            LevelSize::Medium => (53, 12),
            LevelSize::Large => (76, 19),
        };
        Grid { width, height }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LevelSize::Small => "small",
            LevelSize::Medium => "medium",
            LevelSize::Large => "large",
        }
    }
}

impl fmt::Display for LevelSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for LevelSize {
    type Err = ParseLevelSizeError;

    fn from_str(s: &str) -> Result<LevelSize, ParseLevelSizeError> {
        match s.to_ascii_lowercase().as_str() {
            "small" => Ok(LevelSize::Small),
            "medium" => Ok(LevelSize::Medium),
            "large" => Ok(LevelSize::Large),
            _ => Err(ParseLevelSizeError),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[error("invalid level size; expected \"small\", \"medium\", or \"large\"")]
pub struct ParseLevelSizeError;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn grid(width: u16, height: u16) -> Grid {
        Grid::new(width, height).unwrap()
    }

    #[test]
    fn zero_size_grid() {
        assert!(Grid::new(0, 5).is_err());
        assert!(Grid::new(5, 0).is_err());
        assert_eq!(
            Grid::new(0, 0).unwrap_err().to_string(),
            "grid dimensions must be nonzero; got 0x0"
        );
    }

    #[rstest]
    #[case(Cell::new(0, 0), true)]
    #[case(Cell::new(9, 14), true)]
    #[case(Cell::new(10, 14), false)]
    #[case(Cell::new(9, 15), false)]
    #[case(Cell::new(-1, 3), false)]
    #[case(Cell::new(3, -1), false)]
    fn test_contains(#[case] cell: Cell, #[case] r: bool) {
        assert_eq!(grid(10, 15).contains(cell), r);
    }

    #[rstest]
    #[case(Cell::new(10, 7), BoundaryMode::Wrapping, Cell::new(0, 7))]
    #[case(Cell::new(-1, 7), BoundaryMode::Wrapping, Cell::new(9, 7))]
    #[case(Cell::new(2, 15), BoundaryMode::Wrapping, Cell::new(2, 0))]
    #[case(Cell::new(2, -1), BoundaryMode::Wrapping, Cell::new(2, 14))]
    #[case(Cell::new(2, 7), BoundaryMode::Wrapping, Cell::new(2, 7))]
    #[case(Cell::new(10, 7), BoundaryMode::Bounded, Cell::new(10, 7))]
    #[case(Cell::new(-1, -1), BoundaryMode::Bounded, Cell::new(-1, -1))]
    fn test_normalize(#[case] cell: Cell, #[case] mode: BoundaryMode, #[case] r: Cell) {
        assert_eq!(grid(10, 15).normalize(cell, mode), r);
    }

    #[test]
    fn cells_cover_grid() {
        let g = grid(4, 3);
        let cells = g.cells().collect::<Vec<_>>();
        assert_eq!(cells.len(), g.area());
        assert_eq!(cells[0], Cell::new(0, 0));
        assert_eq!(cells[5], Cell::new(1, 1));
        assert!(cells.iter().all(|&c| g.contains(c)));
        for (i, &c) in cells.iter().enumerate() {
            assert_eq!(g.cell_at(i), Some(c));
        }
        assert_eq!(g.cell_at(12), None);
    }

    #[test]
    fn step_off_edge() {
        assert_eq!(Cell::new(0, 0).step(Direction::Up), Cell::new(0, -1));
        assert_eq!(Cell::new(0, 0).step(Direction::Right), Cell::new(1, 0));
    }

    #[rstest]
    #[case("small", LevelSize::Small)]
    #[case("Medium", LevelSize::Medium)]
    #[case("LARGE", LevelSize::Large)]
    fn parse_level_size(#[case] s: &str, #[case] size: LevelSize) {
        assert_eq!(s.parse::<LevelSize>(), Ok(size));
    }

    #[test]
    fn parse_bad_level_size() {
        assert_eq!("huge".parse::<LevelSize>(), Err(ParseLevelSizeError));
    }

    #[test]
    fn deserialize_wrap_alias() {
        #[derive(Deserialize)]
        struct Holder {
            mode: BoundaryMode,
        }
        let h: Holder = toml::from_str(r#"mode = "wrap""#).unwrap();
        assert_eq!(h.mode, BoundaryMode::Wrapping);
    }
}
