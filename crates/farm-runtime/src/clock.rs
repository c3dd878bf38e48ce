//! Simulated hour/day clock.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClockError {
    #[error("hours per day must be > 0")]
    ZeroHoursInDay,
    #[error("day must be >= 1")]
    ZeroDay,
    #[error("hour {hour} out of range for a {hours_in_day}-hour day")]
    HourOutOfRange { hour: u32, hours_in_day: u32 },
}

/// Emitted when the hour counter wraps and a new day begins.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DayRollover {
    pub day: u32,
}

/// Two-counter clock: `hour` in `[0, hours_in_day)` and `day >= 1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Clock {
    day: u32,
    hour: u32,
    hours_in_day: u32,
}

impl Clock {
    /// A clock at day 1, hour 0.
    pub fn new(hours_in_day: u32) -> Result<Self, ClockError> {
        Self::at(1, 0, hours_in_day)
    }

    /// A clock at an explicit position.
    pub fn at(day: u32, hour: u32, hours_in_day: u32) -> Result<Self, ClockError> {
        if hours_in_day == 0 {
            return Err(ClockError::ZeroHoursInDay);
        }
        if day == 0 {
            return Err(ClockError::ZeroDay);
        }
        if hour >= hours_in_day {
            return Err(ClockError::HourOutOfRange { hour, hours_in_day });
        }
        Ok(Self {
            day,
            hour,
            hours_in_day,
        })
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    /// Advance one hour; returns the rollover when the day changes.
    pub fn tick(&mut self) -> Option<DayRollover> {
        self.hour += 1;
        if self.hour < self.hours_in_day {
            return None;
        }
        self.hour = 0;
        self.day = self.day.saturating_add(1);
        Some(DayRollover { day: self.day })
    }

    /// Share of the current day already elapsed, in percent.
    pub fn day_progress_pct(&self) -> u32 {
        (u64::from(self.hour) * 100 / u64::from(self.hours_in_day)) as u32
    }
}
