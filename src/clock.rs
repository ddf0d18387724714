//! Clock

use jiff::{Zoned, civil::Date};
use mockall::automock;

/// Source of "today" for request and pickup dates.
#[automock]
pub trait Clock: Send + Sync {
    /// The current civil date.
    fn today(&self) -> Date;
}

/// Reads the system time zone's current date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> Date {
        Zoned::now().date()
    }
}

/// Always reports the same date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(Date);

impl FixedClock {
    /// Pin the clock to `date`.
    pub const fn new(date: Date) -> Self {
        Self(date)
    }
}

impl Clock for FixedClock {
    fn today(&self) -> Date {
        self.0
    }
}
