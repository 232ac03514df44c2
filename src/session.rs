use crate::clock::{Clock, Speed};
use crate::direction::Direction;
use crate::grid::BoundaryMode;
use crate::simulation::{Outcome, SnakeSimulation, Snapshot};
use rand::Rng;
use std::fmt;
use std::time::Duration;

type TickListener = Box<dyn FnMut(&Snapshot)>;

/// Drives a [`SnakeSimulation`] from a [`Clock`] and hands a [`Snapshot`] to
/// every registered listener after each tick.
///
/// The presentation layer calls [`frame()`][Session::frame] once per display
/// refresh with the time elapsed since the previous call, and forwards player
/// input through [`request_direction()`][Session::request_direction].
pub struct Session<R = rand::rngs::ThreadRng> {
    simulation: SnakeSimulation<R>,
    clock: Clock,
    /// Whether to start a new game as soon as one ends
    auto_restart: bool,
    listeners: Vec<TickListener>,
}

impl<R: Rng> Session<R> {
    pub fn new(simulation: SnakeSimulation<R>, speed: Speed) -> Session<R> {
        Session {
            simulation,
            clock: Clock::new(speed),
            auto_restart: true,
            listeners: Vec::new(),
        }
    }

    /// Set whether to start a new game as soon as one ends.  This is on by
    /// default.
    pub fn with_auto_restart(mut self, auto_restart: bool) -> Session<R> {
        self.auto_restart = auto_restart;
        self
    }

    /// Register a function to call with a snapshot of the game after every
    /// tick
    pub fn on_tick<F>(&mut self, listener: F)
    where
        F: FnMut(&Snapshot) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Report that `elapsed` time has passed since the last call, advancing
    /// the game if a tick is due.  Returns the snapshot of the game after the
    /// tick, if there was one.
    ///
    /// With auto-restart enabled, a tick that ends the game still produces a
    /// snapshot of the ended game, after which a new game is started in its
    /// place.  Without auto-restart, an ended game stays ended until
    /// [`reset()`][Session::reset] is called.
    pub fn frame(&mut self, elapsed: Duration) -> Option<Snapshot> {
        if !self.clock.tick(elapsed) {
            return None;
        }
        if !self.simulation.is_running() {
            if self.auto_restart {
                self.simulation.reset();
            } else {
                return None;
            }
        }
        let outcome = self.simulation.advance();
        let snapshot = self.simulation.snapshot();
        for listener in &mut self.listeners {
            listener(&snapshot);
        }
        if matches!(outcome, Outcome::Terminated(_)) && self.auto_restart {
            self.simulation.reset();
        }
        Some(snapshot)
    }

    /// Start a new game.  The first tick of the new game comes a full period
    /// after this call.
    pub fn reset(&mut self) {
        self.simulation.reset();
        self.clock.restart();
    }
}

impl<R> Session<R> {
    pub fn request_direction(&mut self, direction: Direction) -> bool {
        self.simulation.request_direction(direction)
    }

    pub fn pause(&mut self) {
        if !self.clock.is_paused() {
            tracing::debug!("Paused");
            self.clock.pause();
        }
    }

    pub fn resume(&mut self) {
        if self.clock.is_paused() {
            tracing::debug!("Resumed");
            self.clock.resume();
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.clock.is_paused() {
            self.resume();
        } else {
            self.pause();
        }
    }

    pub fn is_paused(&self) -> bool {
        self.clock.is_paused()
    }

    pub fn set_speed(&mut self, speed: Speed) {
        if self.clock.speed() != speed {
            tracing::debug!(%speed, "Changed speed");
            self.clock.set_speed(speed);
        }
    }

    /// Go one tick per second faster, up to [`Speed::MAXIMUM`]
    pub fn increase_speed(&mut self) {
        let mut speed = self.clock.speed();
        speed.increase();
        self.set_speed(speed);
    }

    /// Go one tick per second slower, down to [`Speed::MINIMUM`]
    pub fn decrease_speed(&mut self) {
        let mut speed = self.clock.speed();
        speed.decrease();
        self.set_speed(speed);
    }

    pub fn speed(&self) -> Speed {
        self.clock.speed()
    }

    pub fn set_boundary_mode(&mut self, mode: BoundaryMode) {
        self.simulation.set_boundary_mode(mode);
    }

    pub fn auto_restart(&self) -> bool {
        self.auto_restart
    }

    pub fn simulation(&self) -> &SnakeSimulation<R> {
        &self.simulation
    }

    pub fn snapshot(&self) -> Snapshot {
        self.simulation.snapshot()
    }
}

impl<R: fmt::Debug> fmt::Debug for Session<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("simulation", &self.simulation)
            .field("clock", &self.clock)
            .field("auto_restart", &self.auto_restart)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
