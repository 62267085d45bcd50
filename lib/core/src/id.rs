//! Identifiers for orchestration runs.
//!
//! IDs use ULID format so that log lines for consecutive runs sort by time.

use std::fmt;
use ulid::Ulid;

/// Unique identifier for one pass through the analyze/build/judge pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunId(Ulid);

impl RunId {
    const PREFIX: &'static str = "run_";

    /// Creates a new ID with a randomly generated ULID.
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::PREFIX, self.0)
    }
}
