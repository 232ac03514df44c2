use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four directions in which the snake can travel.
///
/// Up is towards `y = 0`, and Left is towards `x = 0`.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All directions, in a fixed order
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Return the unit offset `(dx, dy)` for moving one cell in this
    /// direction.  Exactly one component is nonzero.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Return the axis along which this direction runs
    pub fn axis(self) -> Axis {
        match self {
            Direction::Up | Direction::Down => Axis::Vertical,
            Direction::Left | Direction::Right => Axis::Horizontal,
        }
    }

    pub fn reverse(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Is a turn from `self` to `other` a quarter turn?  Reversals and
    /// repeats of the same direction are not.
    pub fn is_perpendicular_to(self, other: Direction) -> bool {
        self.axis() != other.axis()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn deltas_are_unit_vectors() {
        for d in Direction::ALL {
            let (dx, dy) = d.delta();
            assert_eq!(dx.abs() + dy.abs(), 1, "{d} is not a unit step");
        }
    }

    #[test]
    fn reverse_negates_delta() {
        for d in Direction::ALL {
            let (dx, dy) = d.delta();
            assert_eq!(d.reverse().delta(), (-dx, -dy));
            assert_eq!(d.reverse().reverse(), d);
        }
    }

    #[rstest]
    #[case(Direction::Right, Direction::Up, true)]
    #[case(Direction::Right, Direction::Down, true)]
    #[case(Direction::Right, Direction::Left, false)]
    #[case(Direction::Right, Direction::Right, false)]
    #[case(Direction::Up, Direction::Left, true)]
    #[case(Direction::Up, Direction::Down, false)]
    fn test_is_perpendicular_to(
        #[case] current: Direction,
        #[case] requested: Direction,
        #[case] r: bool,
    ) {
        assert_eq!(current.is_perpendicular_to(requested), r);
    }

    #[test]
    fn serialize_lowercase() {
        assert_eq!(
            serde_json::to_string(&Direction::Left).unwrap(),
            r#""left""#
        );
    }
}
