//! Simulated clock for the hunters world.
//!
//! The clock counts simulated minutes since the world started. Day, hour,
//! and minute-of-hour are derived from that counter and never stored.
//! The counter only moves forward.

use hunters_types::ClockView;

/// Minutes in one simulated day.
pub const MINUTES_PER_DAY: u64 = 1440;

/// Minutes in one simulated hour.
pub const MINUTES_PER_HOUR: u64 = 60;

/// Errors that can occur during clock operations.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// Minute counter would overflow.
    #[error("clock overflow: cannot advance {minutes} minutes past minute {current}")]
    Overflow {
        /// Minute counter before the advance.
        current: u64,
        /// Requested advance.
        minutes: u64,
    },
}

/// Monotonic simulated-minute counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameClock {
    minute: u64,
}

impl GameClock {
    /// Create a clock at minute 0.
    pub const fn new() -> Self {
        Self { minute: 0 }
    }

    /// Create a clock at an arbitrary minute (tests and restores).
    pub const fn at(minute: u64) -> Self {
        Self { minute }
    }

    /// Advance by `minutes`. Returns the new minute.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::Overflow`] if the counter would exceed `u64::MAX`.
    pub fn advance(&mut self, minutes: u64) -> Result<u64, ClockError> {
        self.minute = self
            .minute
            .checked_add(minutes)
            .ok_or(ClockError::Overflow {
                current: self.minute,
                minutes,
            })?;
        Ok(self.minute)
    }

    /// Total simulated minutes since start.
    pub const fn minute(&self) -> u64 {
        self.minute
    }

    /// Day number, starting at 1.
    pub fn day(&self) -> u64 {
        (self.minute / MINUTES_PER_DAY).saturating_add(1)
    }

    /// Hour of day, `0..24`.
    pub fn hour(&self) -> u8 {
        let hour = (self.minute % MINUTES_PER_DAY) / MINUTES_PER_HOUR;
        u8::try_from(hour).unwrap_or(u8::MAX)
    }

    /// Minute of hour, `0..60`.
    pub fn minute_of_hour(&self) -> u8 {
        u8::try_from(self.minute % MINUTES_PER_HOUR).unwrap_or(u8::MAX)
    }

    /// Build the published view of this clock at the given store version.
    pub fn view(&self, version: u64) -> ClockView {
        ClockView {
            version,
            total_minutes: self.minute,
            day: self.day(),
            hour: self.hour(),
            minute: self.minute_of_hour(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn clock_starts_at_day_one_midnight() {
        let clock = GameClock::new();
        assert_eq!(clock.minute(), 0);
        assert_eq!(clock.day(), 1);
        assert_eq!(clock.hour(), 0);
        assert_eq!(clock.minute_of_hour(), 0);
    }

    #[test]
    fn advance_adds_exactly_n() {
        let mut clock = GameClock::new();
        assert_eq!(clock.advance(10).unwrap(), 10);
        assert_eq!(clock.advance(0).unwrap(), 10);
        assert_eq!(clock.advance(59).unwrap(), 69);
        assert_eq!(clock.minute(), 69);
    }

    #[test]
    fn calendar_fields_derive_from_minutes() {
        // Day 2, 01:05
        let clock = GameClock::at(MINUTES_PER_DAY + 65);
        assert_eq!(clock.day(), 2);
        assert_eq!(clock.hour(), 1);
        assert_eq!(clock.minute_of_hour(), 5);

        let view = clock.view(7);
        assert_eq!(view.version, 7);
        assert_eq!(view.total_minutes, 1505);
        assert_eq!(view.day, 2);
    }

    #[test]
    fn last_minute_of_day() {
        let clock = GameClock::at(MINUTES_PER_DAY - 1);
        assert_eq!(clock.day(), 1);
        assert_eq!(clock.hour(), 23);
        assert_eq!(clock.minute_of_hour(), 59);
    }

    #[test]
    fn overflow_is_an_error_and_leaves_clock_untouched() {
        let mut clock = GameClock::at(u64::MAX - 1);
        assert!(clock.advance(2).is_err());
        assert_eq!(clock.minute(), u64::MAX - 1);
    }
}
