use crate::direction::Direction;

/// Holds the direction the snake will take on its next move.
///
/// Any number of input sources may call
/// [`request_direction()`][InputBuffer::request_direction] between ticks.
/// Only a request at a right angle to the direction the snake is *currently*
/// moving in is accepted, and each accepted request overwrites the previous
/// one; nothing is queued.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct InputBuffer {
    /// The direction applied on the most recent tick
    current: Direction,

    /// The direction to apply on the next tick
    pending: Direction,
}

impl InputBuffer {
    pub fn new(direction: Direction) -> InputBuffer {
        InputBuffer {
            current: direction,
            pending: direction,
        }
    }

    /// Ask for the snake to turn to `direction` on the next tick.  Returns
    /// whether the request was accepted.
    pub fn request_direction(&mut self, direction: Direction) -> bool {
        if direction.is_perpendicular_to(self.current) {
            self.pending = direction;
            true
        } else {
            tracing::trace!(requested = %direction, current = %self.current, "Ignoring direction request");
            false
        }
    }

    /// Take the direction for the current tick.  This is to be called exactly
    /// once per tick, before the snake moves.
    pub fn consume(&mut self) -> Direction {
        self.current = self.pending;
        self.current
    }

    pub fn current(&self) -> Direction {
        self.current
    }

    pub fn pending(&self) -> Direction {
        self.pending
    }
}
