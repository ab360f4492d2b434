//! Clock abstraction and the context handed to formula functions

use chrono::{DateTime, FixedOffset, Local};
use std::fmt;

/// Source of the current time for `NOW()` and `TODAY()`.
///
/// Evaluation is otherwise a pure function of formula and record, so tests
/// and replays inject a [`FixedClock`].
pub trait Clock: Send + Sync + fmt::Debug {
    /// Current instant
    fn now(&self) -> DateTime<FixedOffset>;

    /// Midnight at the start of the current day, in the clock's offset
    fn today(&self) -> DateTime<FixedOffset> {
        start_of_day(self.now())
    }
}

/// Wall clock in the host's local time zone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// A clock frozen at one instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    now: DateTime<FixedOffset>,
}

impl FixedClock {
    /// Create a clock that always reports `now`
    pub fn new(now: DateTime<FixedOffset>) -> Self {
        Self { now }
    }

    /// Create a clock from an RFC 3339 timestamp
    pub fn parse(timestamp: &str) -> Result<Self, chrono::ParseError> {
        DateTime::parse_from_rfc3339(timestamp).map(Self::new)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.now
    }
}

fn start_of_day(now: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    now.date_naive()
        .and_hms_opt(0, 0, 0)
        .and_then(|midnight| midnight.and_local_timezone(*now.offset()).single())
        .unwrap_or(now)
}

/// Per-call context passed to every function implementation
pub struct FunctionContext<'a> {
    name: &'a str,
    clock: &'a dyn Clock,
}

impl<'a> FunctionContext<'a> {
    /// Create a context for a call to `name`
    pub fn new(name: &'a str, clock: &'a dyn Clock) -> Self {
        Self { name, clock }
    }

    /// Upper-cased name the function was invoked as
    pub fn name(&self) -> &str {
        self.name
    }

    /// Current instant from the engine's clock
    pub fn now(&self) -> DateTime<FixedOffset> {
        self.clock.now()
    }

    /// Start of the current day from the engine's clock
    pub fn today(&self) -> DateTime<FixedOffset> {
        self.clock.today()
    }
}
