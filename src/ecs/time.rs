use std::fmt;

/// Simulation tick rate. One tick per rendered frame at a fixed step.
pub const TICKS_PER_SECOND: u64 = 10;

/// Seconds advanced per simulation tick.
pub const TICK_SECONDS: f64 = 1.0 / TICKS_PER_SECOND as f64;

/// Simulation time as total elapsed ticks since start.
///
/// A plain `u64` wrapper — no wall clock involvement, so tests advance a
/// virtual clock deterministically. Natural `u64` ordering equals
/// chronological ordering.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SimTime(u64);

impl SimTime {
    pub fn from_ticks(ticks: u64) -> Self {
        Self(ticks)
    }

    /// Nearest tick boundary at or after the given number of seconds.
    pub fn from_secs_f64(secs: f64) -> Self {
        Self((secs.max(0.0) * TICKS_PER_SECOND as f64).ceil() as u64)
    }

    pub fn as_ticks(self) -> u64 {
        self.0
    }

    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 * TICK_SECONDS
    }

    /// Seconds elapsed since `earlier`. Saturates at zero if `earlier`
    /// is in the future.
    pub fn elapsed_since(self, earlier: SimTime) -> f64 {
        self.0.saturating_sub(earlier.0) as f64 * TICK_SECONDS
    }

    /// The time `secs` seconds from now, rounded up to a tick boundary.
    pub fn after_secs(self, secs: f64) -> Self {
        Self(self.0 + Self::from_secs_f64(secs).0)
    }

    pub fn next_tick(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}s", self.as_secs_f64())
    }
}
