use bevy_app::{App, Plugin};
use bevy_ecs::schedule::IntoScheduleConfigs;

use super::resources::sync_spatial_index;
use super::schedule::{DomainSet, SimPhase, SimTick};
use super::systems::behavior::BehaviorPlugin;
use super::systems::global_alert::GlobalAlertPlugin;
use super::systems::guard_alert::GuardAlertPlugin;
use super::systems::perception::PerceptionPlugin;
use super::systems::social::SocialPlugin;
use super::tasks::run_due_tasks;

/// Aggregate plugin installing all simulation domain plugins plus the
/// spatial-index sync and the timed-task runner.
pub struct SimPlugin;

impl Plugin for SimPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(SimTick, sync_spatial_index.in_set(DomainSet::Spatial));
        app.add_plugins((
            PerceptionPlugin,
            SocialPlugin,
            GuardAlertPlugin,
            GlobalAlertPlugin,
            BehaviorPlugin,
        ));
        app.add_systems(SimTick, run_due_tasks.in_set(SimPhase::PostUpdate));
    }
}

#[cfg(test)]
mod tests {
    use super::SimPlugin;
    use crate::ecs::api;
    use crate::ecs::app::{build_sim_app_deterministic, build_sim_app_seeded};
    use crate::ecs::clock::SimClock;
    use crate::ecs::resources::{EventLog, GlobalAlertConfig};
    use crate::ecs::spawn;
    use crate::ecs::test_helpers::tick_seconds;
    use crate::ecs::time::TICKS_PER_SECOND;
    use crate::model::{GlobalAlertLevel, PersonalityProfile, Vec2};

    /// A small town: a few guards, a few citizens, two gates, and spawn
    /// points for escalation units.
    fn spawn_minimal_town(app: &mut bevy_app::App) {
        app.world_mut()
            .resource_mut::<GlobalAlertConfig>()
            .unit_spawn_points = vec![Vec2::new(40.0, 0.0), Vec2::new(-40.0, 0.0)];

        let world = app.world_mut();
        spawn::spawn_guard(world, Vec2::new(10.0, 0.0));
        spawn::spawn_guard(world, Vec2::new(-10.0, 0.0));
        spawn::spawn_citizen(world, Vec2::new(2.0, 2.0), Some(PersonalityProfile::Social));
        spawn::spawn_citizen(world, Vec2::new(4.0, 2.0), Some(PersonalityProfile::Normal));
        spawn::spawn_citizen(world, Vec2::new(-3.0, 1.0), None);
        spawn::spawn_gate(world, Vec2::new(0.0, 50.0));
        spawn::spawn_gate(world, Vec2::new(0.0, -50.0));
    }

    #[test]
    fn sim_plugin_smoke_test() {
        let mut app = build_sim_app_seeded(42);
        app.add_plugins(SimPlugin);
        spawn_minimal_town(&mut app);

        api::emit_noise(app.world_mut(), Vec2::ZERO, 15.0, 0.7);
        api::force_global_alert(app.world_mut(), GlobalAlertLevel::Orange);
        tick_seconds(&mut app, 10.0);

        let clock = app.world().resource::<SimClock>();
        assert_eq!(clock.tick_count, 10 * TICKS_PER_SECOND);
        assert!(!app.world().resource::<EventLog>().events.is_empty());
    }

    #[test]
    fn deterministic_runs_produce_identical_event_logs() {
        let run = || {
            let mut app = build_sim_app_deterministic(42);
            app.add_plugins(SimPlugin);
            spawn_minimal_town(&mut app);
            api::emit_noise(app.world_mut(), Vec2::ZERO, 15.0, 0.7);
            tick_seconds(&mut app, 20.0);
            app.world()
                .resource::<EventLog>()
                .events
                .iter()
                .map(|e| (e.kind, e.timestamp))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }
}
