use crate::consts;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Simulation speed in ticks per second
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Speed(u32);

impl Speed {
    pub const MINIMUM: Speed = Speed(consts::MIN_SPEED);
    pub const MAXIMUM: Speed = Speed(consts::MAX_SPEED);

    pub fn new(ticks_per_second: u32) -> Option<Speed> {
        (consts::MIN_SPEED..=consts::MAX_SPEED)
            .contains(&ticks_per_second)
            .then_some(Speed(ticks_per_second))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Time between two ticks at this speed
    pub fn period(self) -> Duration {
        Duration::from_secs(1) / self.0
    }

    pub fn increase(&mut self) {
        if self.can_increase() {
            self.0 += 1;
        }
    }

    pub fn decrease(&mut self) {
        if self.can_decrease() {
            self.0 -= 1;
        }
    }

    pub fn can_increase(self) -> bool {
        self < Self::MAXIMUM
    }

    pub fn can_decrease(self) -> bool {
        self > Self::MINIMUM
    }
}

impl Default for Speed {
    fn default() -> Speed {
        Speed(consts::DEFAULT_SPEED)
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0.to_string())
    }
}

impl TryFrom<u32> for Speed {
    type Error = SpeedError;

    fn try_from(value: u32) -> Result<Speed, SpeedError> {
        Speed::new(value).ok_or(SpeedError(value))
    }
}

impl From<Speed> for u32 {
    fn from(value: Speed) -> u32 {
        value.0
    }
}

impl std::str::FromStr for Speed {
    type Err = ParseSpeedError;

    fn from_str(s: &str) -> Result<Speed, ParseSpeedError> {
        let n = s.trim().parse::<u32>()?;
        Ok(Speed::try_from(n)?)
    }
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[error(
    "speed must be between {min} and {max} ticks per second; got {0}",
    min = consts::MIN_SPEED,
    max = consts::MAX_SPEED
)]
pub struct SpeedError(u32);

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ParseSpeedError {
    #[error("speed is not an integer")]
    Int(#[from] std::num::ParseIntError),
    #[error(transparent)]
    Range(#[from] SpeedError),
}

/// Decides when the simulation should advance.
///
/// The caller reports how much time has passed each time it is invoked (e.g.,
/// once per display refresh), and the clock answers whether a tick is due.
/// Time is accumulated across calls; once at least one tick period has built
/// up, a tick is reported and the accumulator starts over from zero.  Any
/// excess is dropped, so a long stall produces a single tick rather than a
/// burst of catch-up ticks.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Clock {
    speed: Speed,
    /// Time elapsed since the last tick, excluding time spent paused
    accumulated: Duration,
    paused: bool,
}

impl Clock {
    pub fn new(speed: Speed) -> Clock {
        Clock {
            speed,
            accumulated: Duration::ZERO,
            paused: false,
        }
    }

    /// Report that `elapsed` has passed since the previous call.  Returns
    /// `true` if the simulation should advance now.
    pub fn tick(&mut self, elapsed: Duration) -> bool {
        if self.paused {
            return false;
        }
        self.accumulated = self.accumulated.saturating_add(elapsed);
        if self.accumulated >= self.speed.period() {
            self.accumulated = Duration::ZERO;
            true
        } else {
            false
        }
    }

    pub fn speed(&self) -> Speed {
        self.speed
    }

    /// Change the tick rate.  Time already accumulated counts towards the next
    /// tick at the new rate.
    pub fn set_speed(&mut self, speed: Speed) {
        self.speed = speed;
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Unpause the clock.  The next tick will be a full period after this
    /// call, regardless of how long the clock was paused or how close to a
    /// tick it was when paused.
    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            self.accumulated = Duration::ZERO;
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Forget any time accumulated towards the next tick
    pub fn restart(&mut self) {
        self.accumulated = Duration::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const MS: Duration = Duration::from_millis(1);

    #[rstest]
    #[case(0, None)]
    #[case(1, Some(1))]
    #[case(5, Some(5))]
    #[case(30, Some(30))]
    #[case(31, None)]
    fn test_speed_new(#[case] n: u32, #[case] r: Option<u32>) {
        assert_eq!(Speed::new(n).map(Speed::get), r);
    }

    #[test]
    fn default_period() {
        assert_eq!(Speed::default().period(), Duration::from_millis(200));
    }

    #[test]
    fn speed_steps_stop_at_limits() {
        let mut speed = Speed::MAXIMUM;
        speed.increase();
        assert_eq!(speed, Speed::MAXIMUM);
        speed.decrease();
        assert_eq!(speed.get(), consts::MAX_SPEED - 1);
        let mut speed = Speed::MINIMUM;
        speed.decrease();
        assert_eq!(speed, Speed::MINIMUM);
        assert!(!speed.can_decrease());
        assert!(speed.can_increase());
    }

    #[rstest]
    #[case("12", Ok(12))]
    #[case(" 7 ", Ok(7))]
    #[case("0", Err("speed must be between 1 and 30 ticks per second; got 0"))]
    #[case("fast", Err("speed is not an integer"))]
    fn parse_speed(#[case] s: &str, #[case] r: Result<u32, &str>) {
        assert_eq!(
            s.parse::<Speed>().map(Speed::get).map_err(|e| e.to_string()),
            r.map_err(String::from)
        );
    }

    #[test]
    fn tick_once_period_elapses() {
        // 5 ticks/s: 200 ms period
        let mut clock = Clock::new(Speed::default());
        assert!(!clock.tick(MS * 100));
        assert!(!clock.tick(MS * 99));
        assert!(clock.tick(MS));
        assert!(!clock.tick(MS * 199));
        assert!(clock.tick(MS));
    }

    #[test]
    fn no_catch_up_burst() {
        let mut clock = Clock::new(Speed::default());
        assert!(clock.tick(Duration::from_secs(5)));
        assert!(!clock.tick(Duration::ZERO));
        assert!(!clock.tick(MS * 199));
        assert!(clock.tick(MS));
    }

    #[test]
    fn paused_never_ticks() {
        let mut clock = Clock::new(Speed::default());
        clock.pause();
        assert!(clock.is_paused());
        for _ in 0..10 {
            assert!(!clock.tick(Duration::from_secs(1)));
        }
    }

    #[test]
    fn resume_resets_reference() {
        let mut clock = Clock::new(Speed::default());
        assert!(!clock.tick(MS * 150));
        clock.pause();
        assert!(!clock.tick(Duration::from_secs(60)));
        clock.resume();
        assert!(!clock.is_paused());
        assert!(!clock.tick(MS * 150));
        assert!(clock.tick(MS * 50));
    }

    #[test]
    fn resume_when_running_is_noop() {
        let mut clock = Clock::new(Speed::default());
        assert!(!clock.tick(MS * 150));
        clock.resume();
        assert!(clock.tick(MS * 50));
    }

    #[test]
    fn speed_change_applies_to_next_evaluation() {
        let mut clock = Clock::new(Speed::default());
        assert!(!clock.tick(MS * 120));
        clock.set_speed(Speed::new(10).unwrap());
        assert!(clock.tick(MS));
        assert!(!clock.tick(MS * 99));
        assert!(clock.tick(MS));
    }
}
