use std::fmt;

use crate::TURN_TIME;

/// An opaque representation of a time instant.
///
/// The unit of time is a scheduler tick. An actor with speed 1 acts once per
/// `TURN_TIME` ticks.
#[derive(Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct Instant(pub(crate) i64);

impl Instant {
    pub const fn new(tick: i64) -> Self {
        Instant(tick)
    }

    pub const fn tick(self) -> i64 {
        self.0
    }

    /// When an actor of the given speed acting at this instant acts next.
    pub fn after(self, speed: u32) -> Self {
        self + action_interval(speed)
    }
}

/// Ticks between the actions of an actor of the given speed.
///
/// Speed 0 is treated as 1.
pub const fn action_interval(speed: u32) -> i64 {
    let speed = if speed == 0 { 1 } else { speed as i64 };
    TURN_TIME / speed
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

impl std::ops::Add<i64> for Instant {
    type Output = Self;

    fn add(self, rhs: i64) -> Self::Output {
        Instant(self.0 + rhs)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn intervals() {
        assert_eq!(action_interval(10), 100);
        assert_eq!(action_interval(20), 50);
        assert_eq!(action_interval(3), 333);
        assert_eq!(action_interval(0), TURN_TIME);

        let t = Instant::new(100);
        assert_eq!(t.after(10), Instant(200));
        assert_eq!(t.after(5).tick(), 300);
        assert_eq!((t + 5).to_string(), "t105");
    }
}
