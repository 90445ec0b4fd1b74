//! Inbound API for the host game.
//!
//! Every call here is synchronous: its full effect is visible the
//! moment it returns, with zero intervening ticks. A reported sighting
//! leaves the guard population already at Panic; the next schedule run
//! only reacts to that state, it does not create it.

use bevy_ecs::world::World;

use crate::ecs::clock::SimClock;
use crate::ecs::resources::{
    Difficulty, EventLog, GlobalAlert, GuardAlertConfig, GuardAlertness, PlayerPosition,
    SimEventKind,
};
use crate::ecs::systems::{global_alert, guard_alert, noise};
use crate::model::{AlertnessLevel, GlobalAlertLevel, Vec2};

/// The player was seen. Jumps the guard population straight to Panic,
/// pushes the position to every guard, and pins the global
/// last-known-player-position.
pub fn report_sighting(world: &mut World, position: Vec2) {
    let now = world.resource::<SimClock>().time;
    guard_alert::escalate(world, AlertnessLevel::Panic);
    guard_alert::alert_all_guards(world, AlertnessLevel::Panic, Some(position));
    world.resource_mut::<GlobalAlert>().last_known_player_pos = Some(position);
    world.resource_mut::<EventLog>().push(
        SimEventKind::Sighting,
        now,
        format!("player sighted at {position}"),
        serde_json::json!({ "x": position.x, "y": position.y }),
    );
}

/// A citizen was found missing. Once the difficulty-scaled threshold is
/// crossed, the population turns at least Suspicious.
pub fn report_missing_citizen(world: &mut World) {
    let count = {
        let mut alertness = world.resource_mut::<GuardAlertness>();
        alertness.missing_citizens += 1;
        alertness.missing_citizens
    };
    let threshold = {
        let base = world.resource::<GuardAlertConfig>().missing_citizen_threshold;
        world.resource::<Difficulty>().effective_threshold(base)
    };
    if count >= threshold {
        guard_alert::escalate(world, AlertnessLevel::Suspicious);
    }
}

/// A trap was triggered. Traps weigh heavier than disappearances: past
/// the threshold the population turns at least Alert.
pub fn report_trap_triggered(world: &mut World) {
    let count = {
        let mut alertness = world.resource_mut::<GuardAlertness>();
        alertness.traps_triggered += 1;
        alertness.traps_triggered
    };
    let threshold = {
        let base = world.resource::<GuardAlertConfig>().trap_threshold;
        world.resource::<Difficulty>().effective_threshold(base)
    };
    if count >= threshold {
        guard_alert::escalate(world, AlertnessLevel::Alert);
    }
}

/// Emit a noise into the world. Out-of-range radius and intensity are
/// clamped, never rejected.
pub fn emit_noise(world: &mut World, position: Vec2, radius: f32, intensity: f32) {
    noise::dispatch_noise(world, position, radius, intensity);
}

/// Advance the global alert ladder exactly one level.
pub fn advance_global_alert(world: &mut World) {
    global_alert::raise_global_alert(world);
}

/// Step the global alert ladder down one level if its dwell timer has
/// elapsed. The schedule already does this every tick; this entry point
/// exists for hosts that pause the simulation but still want decay.
pub fn decay_global_alert(world: &mut World) {
    global_alert::decay_global_alert(world);
}

/// Jump the global alert ladder to an arbitrary level. All effects of
/// the target level are applied in full before this returns.
pub fn force_global_alert(world: &mut World, level: GlobalAlertLevel) {
    global_alert::force_global_alert(world, level);
}

/// Host-supplied player position for this frame. Whether it becomes the
/// last-known position depends on who is actually watching.
pub fn set_player_position(world: &mut World, position: Vec2) {
    world.resource_mut::<PlayerPosition>().0 = Some(position);
}

/// Set the difficulty knob. Values are clamped to the supported range.
pub fn set_difficulty(world: &mut World, value: f64) {
    *world.resource_mut::<Difficulty>() = Difficulty::clamped(value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::app::build_sim_app_seeded;
    use crate::ecs::components::{GuardAlertLevel, GuardKnowledge};
    use crate::ecs::spawn;

    #[test]
    fn sighting_is_synchronous() {
        let mut app = build_sim_app_seeded(42);
        let guard = spawn::spawn_guard(app.world_mut(), Vec2::ZERO);

        report_sighting(app.world_mut(), Vec2::new(12.0, 5.0));

        // No tick has run; the effect is already complete.
        assert_eq!(
            app.world().resource::<GuardAlertness>().level,
            AlertnessLevel::Panic
        );
        assert_eq!(
            app.world().get::<GuardAlertLevel>(guard).unwrap().0,
            AlertnessLevel::Panic
        );
        assert_eq!(
            app.world().get::<GuardKnowledge>(guard).unwrap().last_player_pos,
            Some(Vec2::new(12.0, 5.0))
        );
    }

    #[test]
    fn missing_citizens_escalate_at_threshold() {
        let mut app = build_sim_app_seeded(42);
        let threshold = app
            .world()
            .resource::<GuardAlertConfig>()
            .missing_citizen_threshold;
        for _ in 0..threshold - 1 {
            report_missing_citizen(app.world_mut());
        }
        assert_eq!(
            app.world().resource::<GuardAlertness>().level,
            AlertnessLevel::Normal
        );
        report_missing_citizen(app.world_mut());
        assert_eq!(
            app.world().resource::<GuardAlertness>().level,
            AlertnessLevel::Suspicious
        );
    }

    #[test]
    fn traps_escalate_to_alert() {
        let mut app = build_sim_app_seeded(42);
        let threshold = app.world().resource::<GuardAlertConfig>().trap_threshold;
        for _ in 0..threshold {
            report_trap_triggered(app.world_mut());
        }
        assert_eq!(
            app.world().resource::<GuardAlertness>().level,
            AlertnessLevel::Alert
        );
    }

    #[test]
    fn harder_difficulty_lowers_the_missing_citizen_threshold() {
        let mut app = build_sim_app_seeded(42);
        set_difficulty(app.world_mut(), 3.0);
        report_missing_citizen(app.world_mut());
        assert_eq!(
            app.world().resource::<GuardAlertness>().level,
            AlertnessLevel::Suspicious
        );
    }
}
