//! Reactive behavior: how guards and citizens act on what they have
//! perceived. Pathfinding and locomotion are external; these systems
//! only change core-visible state and emit movement orders.

use bevy_app::{App, Plugin};
use bevy_ecs::entity::Entity;
use bevy_ecs::message::{MessageReader, MessageWriter};
use bevy_ecs::query::With;
use bevy_ecs::schedule::IntoScheduleConfigs;
use bevy_ecs::system::{Query, Res, ResMut};

use crate::ecs::clock::SimClock;
use crate::ecs::components::{
    Citizen, CitizenMemory, CitizenState, Guard, GuardKnowledge, GuardState, Personality, Position,
    Suspicion,
};
use crate::ecs::events::{GuardAlerted, MoveOrder, MoveUrgency};
use crate::ecs::resources::GlobalAlertConfig;
use crate::ecs::schedule::{DomainSet, SimTick};
use crate::ecs::systems::perception::MemoryConfig;
use crate::ecs::tasks::{TaskKind, TaskQueue};
use crate::model::{AlertnessLevel, MemoryKind, Vec2};

/// Guards pushed an alert head for the reported position. A panic-level
/// alert with a known player position sends the guard into a chase
/// instead of a walk-over.
pub fn guard_react(
    mut alerts: MessageReader<GuardAlerted>,
    mut moves: MessageWriter<MoveOrder>,
    mut guards: Query<(&mut GuardState, &GuardKnowledge), With<Guard>>,
) {
    for alert in alerts.read() {
        let Ok((mut state, knowledge)) = guards.get_mut(alert.guard) else {
            continue;
        };
        if state.is_engaged() {
            continue;
        }
        if alert.level >= AlertnessLevel::Panic
            && let Some(target) = alert.position.or(knowledge.last_player_pos)
        {
            *state = GuardState::Chase;
            moves.write(MoveOrder {
                entity: alert.guard,
                target,
                urgency: MoveUrgency::Run,
            });
            continue;
        }
        if let Some(target) = alert.position {
            *state = GuardState::Investigate(target);
            moves.write(MoveOrder {
                entity: alert.guard,
                target,
                urgency: if alert.level >= AlertnessLevel::Alert {
                    MoveUrgency::Run
                } else {
                    MoveUrgency::Walk
                },
            });
        }
    }
}

/// Citizens flee past their personality flee threshold, and the curious
/// walk over to look at remembered unusual events instead of idling.
pub fn citizen_react(
    clock: Res<SimClock>,
    memory_cfg: Res<MemoryConfig>,
    alert_cfg: Res<GlobalAlertConfig>,
    mut tasks: ResMut<TaskQueue>,
    mut moves: MessageWriter<MoveOrder>,
    mut citizens: Query<
        (
            Entity,
            &Position,
            &Personality,
            &Suspicion,
            &CitizenMemory,
            &mut CitizenState,
        ),
        With<Citizen>,
    >,
) {
    for (citizen, pos, personality, suspicion, memory, mut state) in &mut citizens {
        if matches!(*state, CitizenState::Flee(_)) {
            continue;
        }

        if suspicion.0 > personality.traits.flee_threshold() {
            // Run from the most threatening remembered location, or just
            // away from here.
            let danger = memory
                .0
                .relevant(Some(MemoryKind::Threat), clock.time, memory_cfg.base_decay_secs)
                .first()
                .map(|e| e.location)
                .or_else(|| memory.0.most_important(clock.time, memory_cfg.base_decay_secs).map(|e| e.location))
                .unwrap_or(pos.0);
            let target = flee_away(pos.0, danger);
            *state = CitizenState::Flee(target);
            tasks.schedule(
                clock.time.after_secs(alert_cfg.flee_duration_secs),
                TaskKind::CalmCitizen { citizen },
            );
            moves.write(MoveOrder {
                entity: citizen,
                target,
                urgency: MoveUrgency::Run,
            });
            continue;
        }

        if *state == CitizenState::Idle
            && let Some(entry) = memory
                .0
                .relevant(Some(MemoryKind::UnusualEvent), clock.time, memory_cfg.base_decay_secs)
                .first()
            && personality.traits.investigates(entry.importance)
        {
            let target = entry.location;
            *state = CitizenState::Investigate(target);
            moves.write(MoveOrder {
                entity: citizen,
                target,
                urgency: MoveUrgency::Walk,
            });
        }
    }
}

fn flee_away(from: Vec2, danger: Vec2) -> Vec2 {
    const FLEE_DISTANCE: f32 = 30.0;
    let dx = from.x - danger.x;
    let dy = from.y - danger.y;
    let len = (dx * dx + dy * dy).sqrt();
    if len < 1e-3 {
        return Vec2::new(from.x + FLEE_DISTANCE, from.y);
    }
    Vec2::new(
        from.x + dx / len * FLEE_DISTANCE,
        from.y + dy / len * FLEE_DISTANCE,
    )
}

// ---------------------------------------------------------------------------
// Plugin registration
// ---------------------------------------------------------------------------

pub struct BehaviorPlugin;

impl Plugin for BehaviorPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            SimTick,
            (guard_react, citizen_react).in_set(DomainSet::Behavior),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::app::build_sim_app_seeded;
    use crate::ecs::plugin::SimPlugin;
    use crate::ecs::spawn;
    use crate::ecs::systems::guard_alert;
    use crate::ecs::test_helpers::tick;
    use crate::model::{MemoryEntry, PersonalityProfile};

    #[test]
    fn alerted_guard_investigates_the_reported_position() {
        let mut app = build_sim_app_seeded(42);
        app.add_plugins(SimPlugin);
        let guard = spawn::spawn_guard(app.world_mut(), Vec2::ZERO);

        guard_alert::alert_guards_near(
            app.world_mut(),
            AlertnessLevel::Suspicious,
            Vec2::new(10.0, 0.0),
            25.0,
        );
        tick(&mut app, 1);

        assert_eq!(
            app.world().get::<GuardState>(guard),
            Some(&GuardState::Investigate(Vec2::new(10.0, 0.0)))
        );
    }

    #[test]
    fn panic_alert_with_known_position_starts_a_chase() {
        let mut app = build_sim_app_seeded(42);
        app.add_plugins(SimPlugin);
        let guard = spawn::spawn_guard(app.world_mut(), Vec2::ZERO);

        guard_alert::alert_all_guards(
            app.world_mut(),
            AlertnessLevel::Panic,
            Some(Vec2::new(3.0, 4.0)),
        );
        tick(&mut app, 1);

        assert_eq!(app.world().get::<GuardState>(guard), Some(&GuardState::Chase));
        assert_eq!(
            app.world().get::<GuardKnowledge>(guard).unwrap().last_player_pos,
            Some(Vec2::new(3.0, 4.0))
        );
    }

    #[test]
    fn suspicious_citizen_flees_past_threshold() {
        let mut app = build_sim_app_seeded(42);
        app.add_plugins(SimPlugin);
        let citizen = spawn::spawn_citizen(
            app.world_mut(),
            Vec2::new(1.0, 1.0),
            Some(PersonalityProfile::Cowardly),
        );
        app.world_mut().get_mut::<Suspicion>(citizen).unwrap().0 = 0.5;

        tick(&mut app, 1);

        assert!(matches!(
            app.world().get::<CitizenState>(citizen),
            Some(CitizenState::Flee(_))
        ));
    }

    #[test]
    fn brave_citizen_holds_at_the_same_suspicion() {
        let mut app = build_sim_app_seeded(42);
        app.add_plugins(SimPlugin);
        let citizen = spawn::spawn_citizen(
            app.world_mut(),
            Vec2::new(1.0, 1.0),
            Some(PersonalityProfile::Brave),
        );
        app.world_mut().get_mut::<Suspicion>(citizen).unwrap().0 = 0.5;

        tick(&mut app, 1);

        assert_eq!(
            app.world().get::<CitizenState>(citizen),
            Some(&CitizenState::Idle)
        );
    }

    #[test]
    fn curious_citizen_investigates_unusual_events() {
        let mut app = build_sim_app_seeded(42);
        app.add_plugins(SimPlugin);
        let citizen = spawn::spawn_citizen(
            app.world_mut(),
            Vec2::ZERO,
            Some(PersonalityProfile::Curious),
        );
        let now = app.world().resource::<SimClock>().time;
        app.world_mut()
            .get_mut::<CitizenMemory>(citizen)
            .unwrap()
            .0
            .remember(MemoryEntry::new(
                MemoryKind::UnusualEvent,
                Vec2::new(7.0, 7.0),
                now,
                0.5,
                "a door left open",
            ));

        tick(&mut app, 1);

        assert_eq!(
            app.world().get::<CitizenState>(citizen),
            Some(&CitizenState::Investigate(Vec2::new(7.0, 7.0)))
        );
    }
}
