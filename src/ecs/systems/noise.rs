//! Noise propagation — a pure dispatcher.
//!
//! `dispatch_noise` queries the spatial index for everyone in range and
//! hands each listener a distance-attenuated intensity. Listeners decide
//! their own reaction from personality and alertness state. Loud noises
//! additionally nudge the guard alertness manager ("alert nearby").

use std::collections::HashMap;

use bevy_ecs::entity::Entity;
use bevy_ecs::message::Messages;
use bevy_ecs::resource::Resource;
use bevy_ecs::world::World;

use crate::ecs::clock::SimClock;
use crate::ecs::components::{Citizen, Guard};
use crate::ecs::events::NoiseHeard;
use crate::ecs::resources::{EventLog, SimEventKind, SpatialGrid};
use crate::ecs::tasks::{TaskKind, TaskQueue};
use crate::model::{NoiseEvent, Vec2};

use super::guard_alert;

/// Tuning for noise dispatch.
#[derive(Resource, Debug, Clone)]
pub struct NoiseConfig {
    /// Fixed multiplier on the intensity guards receive. Guards are
    /// more alert to noise than citizens; always >= 1.
    pub guard_sensitivity: f32,
    /// Source intensity at or above which the noise counts as "loud"
    /// and feeds the guard alertness manager.
    pub loud_threshold: f32,
    /// How long an emitted noise stays in the debug overlay log.
    pub debug_retention_secs: f64,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            guard_sensitivity: 1.5,
            loud_threshold: 0.6,
            debug_retention_secs: 2.0,
        }
    }
}

/// Recently emitted noises, retained briefly for debug visualization
/// only. Entries expire via the task queue — no unbounded growth.
#[derive(Resource, Debug, Default)]
pub struct NoiseLog {
    events: HashMap<u64, NoiseEvent>,
    next_id: u64,
}

impl NoiseLog {
    pub fn insert(&mut self, event: NoiseEvent) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.events.insert(id, event);
        id
    }

    pub fn remove(&mut self, id: u64) {
        self.events.remove(&id);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NoiseEvent> {
        self.events.values()
    }
}

/// Emit a noise at `position`. Bad inputs are clamped, not rejected.
pub fn dispatch_noise(world: &mut World, position: Vec2, radius: f32, intensity: f32) {
    let now = world.resource::<SimClock>().time;
    let event = NoiseEvent::new(position, radius, intensity, now);

    let (guard_sensitivity, loud_threshold, retention) = {
        let cfg = world.resource::<NoiseConfig>();
        (
            cfg.guard_sensitivity.max(1.0),
            cfg.loud_threshold,
            cfg.debug_retention_secs,
        )
    };

    let noise_id = world.resource_mut::<NoiseLog>().insert(event);
    world
        .resource_mut::<TaskQueue>()
        .schedule(now.after_secs(retention), TaskKind::ExpireNoise { noise_id });

    // Snapshot listeners and their positions before dispatching.
    let listeners: Vec<(Entity, Vec2)> = {
        let grid = world.resource::<SpatialGrid>();
        grid.query(event.position, event.radius)
            .into_iter()
            .filter_map(|e| grid.position_of(e).map(|pos| (e, pos)))
            .collect()
    };

    let mut heard = Vec::new();
    for (listener, pos) in listeners {
        let attenuated = event.attenuated(pos);
        if world.get::<Guard>(listener).is_some() {
            heard.push(NoiseHeard {
                listener,
                position: event.position,
                intensity: attenuated * guard_sensitivity,
            });
        } else if world.get::<Citizen>(listener).is_some() {
            heard.push(NoiseHeard {
                listener,
                position: event.position,
                intensity: attenuated,
            });
        }
    }
    let count = heard.len();
    {
        let mut messages = world.resource_mut::<Messages<NoiseHeard>>();
        for msg in heard {
            messages.write(msg);
        }
    }

    if event.intensity >= loud_threshold {
        guard_alert::note_loud_noise(world, &event);
    }

    world.resource_mut::<EventLog>().push(
        SimEventKind::NoiseEmitted,
        now,
        format!("noise at {} heard by {count}", event.position),
        serde_json::json!({
            "radius": event.radius,
            "intensity": event.intensity,
            "listeners": count,
        }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::app::build_sim_app_seeded;
    use crate::ecs::spawn;
    use crate::model::PersonalityProfile;

    fn drain_heard(world: &mut World) -> Vec<NoiseHeard> {
        world.resource_mut::<Messages<NoiseHeard>>().drain().collect()
    }

    #[test]
    fn attenuation_is_linear_and_cut_at_radius() {
        let mut app = build_sim_app_seeded(42);
        let world = app.world_mut();
        let near = spawn::spawn_citizen(world, Vec2::new(5.0, 0.0), Some(PersonalityProfile::Normal));
        let far = spawn::spawn_citizen(world, Vec2::new(11.0, 0.0), Some(PersonalityProfile::Normal));

        dispatch_noise(world, Vec2::ZERO, 10.0, 0.8);

        let heard = drain_heard(world);
        assert_eq!(heard.len(), 1);
        assert_eq!(heard[0].listener, near);
        assert!((heard[0].intensity - 0.4).abs() < 1e-6);
        assert!(heard.iter().all(|h| h.listener != far));
    }

    #[test]
    fn guards_hear_with_sensitivity_multiplier() {
        let mut app = build_sim_app_seeded(42);
        let world = app.world_mut();
        // Guard and citizen at the same distance from the source.
        let guard = spawn::spawn_guard(world, Vec2::new(4.0, 0.0));
        let citizen =
            spawn::spawn_citizen(world, Vec2::new(-4.0, 0.0), Some(PersonalityProfile::Normal));

        dispatch_noise(world, Vec2::ZERO, 8.0, 0.5);

        let heard = drain_heard(world);
        let guard_heard = heard.iter().find(|h| h.listener == guard).unwrap();
        let citizen_heard = heard.iter().find(|h| h.listener == citizen).unwrap();
        let sensitivity = app.world().resource::<NoiseConfig>().guard_sensitivity;
        assert!(
            (guard_heard.intensity - citizen_heard.intensity * sensitivity).abs() < 1e-6,
            "guard should hear {sensitivity}x the citizen intensity"
        );
    }

    #[test]
    fn noise_log_entries_expire_via_task_queue() {
        let mut app = build_sim_app_seeded(42);
        app.add_plugins(crate::ecs::plugin::SimPlugin);
        dispatch_noise(app.world_mut(), Vec2::ZERO, 5.0, 0.3);
        assert_eq!(app.world().resource::<NoiseLog>().len(), 1);

        let retention = app.world().resource::<NoiseConfig>().debug_retention_secs;
        crate::ecs::test_helpers::tick_seconds(&mut app, retention + 0.5);
        assert!(app.world().resource::<NoiseLog>().is_empty());
    }

    #[test]
    fn out_of_range_inputs_are_clamped_not_fatal() {
        let mut app = build_sim_app_seeded(42);
        let world = app.world_mut();
        spawn::spawn_citizen(world, Vec2::ZERO, Some(PersonalityProfile::Normal));
        dispatch_noise(world, Vec2::ZERO, -4.0, 7.0);
        // Zero radius: nothing dispatched, nothing panicked.
        let heard = drain_heard(world);
        assert!(heard.iter().all(|h| h.intensity <= 1.5));
    }
}
