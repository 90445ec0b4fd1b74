//! Guard alertness manager.
//!
//! A single tracked level for the whole guard population, raised by
//! monotonic-max triggers and decayed one step at a time by a
//! difficulty-scaled dwell timer. Every level change is mirrored
//! synchronously into each registered guard's `GuardAlertLevel`; with
//! zero registered guards the broadcast is simply a no-op.

use bevy_app::{App, Plugin};
use bevy_ecs::entity::Entity;
use bevy_ecs::message::Messages;
use bevy_ecs::query::With;
use bevy_ecs::schedule::IntoScheduleConfigs;
use bevy_ecs::world::World;

use crate::ecs::clock::SimClock;
use crate::ecs::components::{Guard, GuardAlertLevel, GuardKnowledge};
use crate::ecs::events::{AlertnessChanged, GuardAlerted};
use crate::ecs::resources::{
    Difficulty, EventLog, GuardAlertConfig, GuardAlertness, SimEventKind, SpatialGrid,
};
use crate::ecs::schedule::{DomainSet, SimTick};
use crate::model::{AlertnessLevel, NoiseEvent, Vec2};

fn registered_guards(world: &mut World) -> Vec<Entity> {
    world
        .query_filtered::<Entity, With<Guard>>()
        .iter(world)
        .collect()
}

/// Raise the tracked level to at least `target` (monotonic max) and, on
/// an actual change, mirror the new level to every registered guard.
pub(crate) fn escalate(world: &mut World, target: AlertnessLevel) {
    let now = world.resource::<SimClock>().time;
    let change = world.resource_mut::<GuardAlertness>().increase(target, now);
    if let Some((old, new)) = change {
        broadcast_level(world, old, new);
    }
}

/// Mirror a level change to every guard and announce it.
fn broadcast_level(world: &mut World, old: AlertnessLevel, new: AlertnessLevel) {
    let now = world.resource::<SimClock>().time;
    for guard in registered_guards(world) {
        if let Some(mut mirror) = world.get_mut::<GuardAlertLevel>(guard) {
            mirror.0 = new;
        }
    }
    world
        .resource_mut::<Messages<AlertnessChanged>>()
        .write(AlertnessChanged { old, new });
    world.resource_mut::<EventLog>().push(
        SimEventKind::AlertnessChanged,
        now,
        format!("guard alertness {old:?} -> {new:?}"),
        serde_json::json!({ "old": old, "new": new }),
    );
    tracing::debug!(?old, ?new, "guard alertness changed");
}

/// "Alert all": push an alert (and the position that caused it) to every
/// registered guard. Used for direct sightings.
pub(crate) fn alert_all_guards(world: &mut World, level: AlertnessLevel, position: Option<Vec2>) {
    let guards = registered_guards(world);
    for &guard in &guards {
        if let Some(pos) = position
            && let Some(mut knowledge) = world.get_mut::<GuardKnowledge>(guard)
        {
            knowledge.last_player_pos = Some(pos);
        }
    }
    let mut messages = world.resource_mut::<Messages<GuardAlerted>>();
    for guard in guards {
        messages.write(GuardAlerted {
            guard,
            level,
            position,
        });
    }
}

/// "Alert nearby": push an alert only to guards within `radius` of the
/// position, found through the spatial index.
pub(crate) fn alert_guards_near(
    world: &mut World,
    level: AlertnessLevel,
    position: Vec2,
    radius: f32,
) {
    let nearby: Vec<Entity> = world
        .resource::<SpatialGrid>()
        .query(position, radius)
        .into_iter()
        .filter(|&e| world.get::<Guard>(e).is_some())
        .collect();
    let mut messages = world.resource_mut::<Messages<GuardAlerted>>();
    for guard in nearby {
        messages.write(GuardAlerted {
            guard,
            level,
            position: Some(position),
        });
    }
}

/// A loud noise makes the population at least Suspicious, but only
/// guards near the noise are pushed an investigate alert.
pub(crate) fn note_loud_noise(world: &mut World, event: &NoiseEvent) {
    escalate(world, AlertnessLevel::Suspicious);
    let radius = world
        .resource::<GuardAlertConfig>()
        .loud_noise_alert_radius;
    alert_guards_near(world, AlertnessLevel::Suspicious, event.position, radius);
}

/// Exclusive system: steps the level down once the difficulty-scaled
/// dwell has elapsed with no new trigger. Runs in `DomainSet::GuardAlert`.
pub fn decay_guard_alertness(world: &mut World) {
    let now = world.resource::<SimClock>().time;
    let dwell = world.resource::<GuardAlertConfig>().decay_secs
        * world.resource::<Difficulty>().decay_scale();
    let change = world.resource_mut::<GuardAlertness>().try_decay(now, dwell);
    if let Some((old, new)) = change {
        broadcast_level(world, old, new);
    }
}

// ---------------------------------------------------------------------------
// Plugin registration
// ---------------------------------------------------------------------------

pub struct GuardAlertPlugin;

impl Plugin for GuardAlertPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            SimTick,
            decay_guard_alertness.in_set(DomainSet::GuardAlert),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::app::build_sim_app_seeded;
    use crate::ecs::plugin::SimPlugin;
    use crate::ecs::spawn;
    use crate::ecs::test_helpers::tick_seconds;

    #[test]
    fn escalate_mirrors_level_to_all_guards() {
        let mut app = build_sim_app_seeded(42);
        let world = app.world_mut();
        let a = spawn::spawn_guard(world, Vec2::ZERO);
        let b = spawn::spawn_guard(world, Vec2::new(100.0, 0.0));

        escalate(world, AlertnessLevel::Alert);

        assert_eq!(world.get::<GuardAlertLevel>(a).unwrap().0, AlertnessLevel::Alert);
        assert_eq!(world.get::<GuardAlertLevel>(b).unwrap().0, AlertnessLevel::Alert);
        assert_eq!(
            world.resource::<EventLog>().count_of(SimEventKind::AlertnessChanged),
            1
        );
    }

    #[test]
    fn escalate_with_no_guards_is_a_noop_broadcast() {
        let mut app = build_sim_app_seeded(42);
        escalate(app.world_mut(), AlertnessLevel::Panic);
        assert_eq!(
            app.world().resource::<GuardAlertness>().level,
            AlertnessLevel::Panic
        );
    }

    #[test]
    fn alert_nearby_only_reaches_guards_in_radius() {
        let mut app = build_sim_app_seeded(42);
        let world = app.world_mut();
        let near = spawn::spawn_guard(world, Vec2::new(5.0, 0.0));
        let far = spawn::spawn_guard(world, Vec2::new(80.0, 0.0));

        alert_guards_near(world, AlertnessLevel::Suspicious, Vec2::ZERO, 20.0);

        let alerted: Vec<GuardAlerted> =
            world.resource_mut::<Messages<GuardAlerted>>().drain().collect();
        assert_eq!(alerted.len(), 1);
        assert_eq!(alerted[0].guard, near);
        assert!(alerted.iter().all(|a| a.guard != far));
    }

    #[test]
    fn decay_waits_for_difficulty_scaled_dwell() {
        let mut app = build_sim_app_seeded(42);
        app.add_plugins(SimPlugin);
        spawn::spawn_guard(app.world_mut(), Vec2::ZERO);
        escalate(app.world_mut(), AlertnessLevel::Alert);

        let dwell = app.world().resource::<GuardAlertConfig>().decay_secs;
        tick_seconds(&mut app, dwell * 0.5);
        assert_eq!(
            app.world().resource::<GuardAlertness>().level,
            AlertnessLevel::Alert
        );
        tick_seconds(&mut app, dwell * 0.6);
        assert_eq!(
            app.world().resource::<GuardAlertness>().level,
            AlertnessLevel::Suspicious
        );
    }
}
