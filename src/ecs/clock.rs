use bevy_ecs::resource::Resource;
use bevy_ecs::system::ResMut;

use super::time::SimTime;

/// Simulation clock resource tracking the current time and tick count.
///
/// Advances by one tick per schedule run. The `advance_clock` system
/// moves the clock forward at the end of each tick (in `SimPhase::Last`),
/// so every system observes a consistent time within the tick.
#[derive(Resource, Debug)]
pub struct SimClock {
    pub time: SimTime,
    pub tick_count: u64,
}

impl SimClock {
    pub fn new() -> Self {
        Self {
            time: SimTime::from_ticks(0),
            tick_count: 0,
        }
    }

    pub fn advance(&mut self) {
        self.time = self.time.next_tick();
        self.tick_count += 1;
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Bevy system that advances the simulation clock by one tick.
/// Registered in `SimPhase::Last`.
pub fn advance_clock(mut clock: ResMut<SimClock>) {
    clock.advance();
}
