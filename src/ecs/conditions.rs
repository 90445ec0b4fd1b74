use bevy_ecs::system::Res;

use super::clock::SimClock;
use super::time::{SimTime, TICKS_PER_SECOND};

// Internal check function for testability.

fn every_second_check(time: SimTime) -> bool {
    time.as_ticks().is_multiple_of(TICKS_PER_SECOND)
}

/// Bevy run condition (for use with `.run_if()`): fires once per
/// simulated second, starting at tick 0. Used for 1 Hz housekeeping like
/// social-share scans that do not need per-frame resolution.
pub fn every_second(clock: Res<SimClock>) -> bool {
    every_second_check(clock.time)
}
