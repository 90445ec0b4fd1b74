use bevy_app::App;

use crate::ecs::schedule::SimTick;
use crate::ecs::time::SimTime;

/// Run `n` simulation ticks.
pub fn tick(app: &mut App, n: u64) {
    for _ in 0..n {
        app.world_mut().run_schedule(SimTick);
    }
}

/// Run enough ticks to cover `secs` seconds of simulated time
/// (rounded up to whole ticks).
pub fn tick_seconds(app: &mut App, secs: f64) {
    tick(app, SimTime::from_secs_f64(secs).as_ticks().max(1));
}

/// Current simulated seconds on the clock.
pub fn current_secs(app: &App) -> f64 {
    app.world()
        .resource::<crate::ecs::clock::SimClock>()
        .time
        .as_secs_f64()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::app::build_sim_app;
    use crate::ecs::time::TICKS_PER_SECOND;

    #[test]
    fn tick_seconds_covers_the_requested_span() {
        let mut app = build_sim_app();
        tick_seconds(&mut app, 2.5);
        assert!(current_secs(&app) >= 2.5);
        assert!(current_secs(&app) < 2.5 + 1.0 / TICKS_PER_SECOND as f64 + 1e-9);
    }
}
