//! Clocks
//!
//! Order timestamps and delivery estimates are computed once, at submission
//! time. The clock is injected so tests can pin "now".

use std::fmt;

use jiff::Zoned;

/// Provides the current wall-clock time.
pub trait Clock: fmt::Debug {
    /// Returns the current time in the system time zone.
    fn now(&self) -> Zoned;
}

/// The real system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Zoned {
        Zoned::now()
    }
}

/// A clock pinned to a single instant.
#[derive(Debug, Clone)]
pub struct FixedClock {
    at: Zoned,
}

impl FixedClock {
    /// Creates a clock that always reports `at`.
    #[must_use]
    pub fn new(at: Zoned) -> Self {
        Self { at }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Zoned {
        self.at.clone()
    }
}
