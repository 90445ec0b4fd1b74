//! Global alert state machine: effect application, escalation units,
//! decay, and last-known-player-position tracking.
//!
//! Effect application is a full, idempotent reconciliation against the
//! current level. Every transition re-applies the whole effect row, so
//! a state entered by force looks identical to one entered step by
//! step.

use bevy_app::{App, Plugin};
use bevy_ecs::entity::Entity;
use bevy_ecs::message::Messages;
use bevy_ecs::query::With;
use bevy_ecs::schedule::IntoScheduleConfigs;
use bevy_ecs::world::World;

use crate::ecs::clock::SimClock;
use crate::ecs::components::{
    Citizen, CitizenState, Gate, Guard, GuardModifiers, GuardState, Position, Suspicion,
};
use crate::ecs::events::{GateLockChanged, GlobalAlertChanged, SpawnRequest};
use crate::ecs::resources::{
    Difficulty, EventLog, GlobalAlert, GlobalAlertConfig, PlayerPosition, SimEventKind,
};
use crate::ecs::schedule::{DomainSet, SimTick};
use crate::ecs::spawn;
use crate::ecs::tasks::{TaskKind, TaskQueue};
use crate::model::{EscalationUnitKind, GlobalAlertLevel, Vec2};

/// Advance the ladder exactly one level and re-apply effects.
pub(crate) fn raise_global_alert(world: &mut World) {
    let now = world.resource::<SimClock>().time;
    let change = world.resource_mut::<GlobalAlert>().advance(now);
    if let Some((old, new)) = change {
        announce_transition(world, old, new);
    }
    apply_alert_state_effects(world);
}

/// Jump the ladder to an arbitrary level and re-apply effects.
pub(crate) fn force_global_alert(world: &mut World, level: GlobalAlertLevel) {
    let now = world.resource::<SimClock>().time;
    let (old, new) = world.resource_mut::<GlobalAlert>().force(level, now);
    if old != new {
        announce_transition(world, old, new);
    }
    apply_alert_state_effects(world);
}

fn announce_transition(world: &mut World, old: GlobalAlertLevel, new: GlobalAlertLevel) {
    let now = world.resource::<SimClock>().time;
    world
        .resource_mut::<Messages<GlobalAlertChanged>>()
        .write(GlobalAlertChanged { old, new });
    world.resource_mut::<EventLog>().push(
        SimEventKind::GlobalAlertChanged,
        now,
        format!("global alert {old:?} -> {new:?}"),
        serde_json::json!({ "old": old, "new": new }),
    );
    tracing::info!(?old, ?new, "global alert changed");
}

/// Exclusive: reconcile the world against the current level's effect
/// row. Safe to call repeatedly at the same level.
pub fn apply_alert_state_effects(world: &mut World) {
    let level = world.resource::<GlobalAlert>().level;
    let effects = world.resource::<GlobalAlertConfig>().effects(level);

    // Guard multipliers.
    let guards: Vec<Entity> = world
        .query_filtered::<Entity, With<Guard>>()
        .iter(world)
        .collect();
    for guard in guards {
        if let Some(mut modifiers) = world.get_mut::<GuardModifiers>(guard) {
            modifiers.speed_multiplier = effects.speed_multiplier;
            modifiers.detection_multiplier = effects.detection_multiplier;
        }
    }

    reconcile_units(world, level);
    reconcile_gates(world, effects.locks_gates);
    if effects.civilians_flee {
        trigger_civilian_flight(world);
    }
}

/// Bring the spawned escalation-unit roster in line with the level:
/// dogs and gate patrols at Orange and above, elites added at Red,
/// everything torn down below Orange.
fn reconcile_units(world: &mut World, level: GlobalAlertLevel) {
    let now = world.resource::<SimClock>().time;

    if !level.spawns_units() {
        let units = std::mem::take(&mut world.resource_mut::<GlobalAlert>().spawned_units);
        for (entity, kind) in units {
            spawn::despawn_unit(world, entity);
            world.resource_mut::<EventLog>().push(
                SimEventKind::UnitDespawned,
                now,
                format!("{kind:?} withdrawn"),
                serde_json::json!({ "kind": kind }),
            );
        }
        return;
    }

    let cfg = world.resource::<GlobalAlertConfig>();
    let dogs_wanted = cfg.dogs_per_orange_alert as usize;
    let elites_wanted = if level == GlobalAlertLevel::Red {
        cfg.elites_per_red_alert as usize
    } else {
        0
    };
    let spawn_points = cfg.unit_spawn_points.clone();
    let hunt = world.resource::<GlobalAlert>().last_known_player_pos;

    let gate_positions: Vec<Vec2> = world
        .query_filtered::<&Position, With<Gate>>()
        .iter(world)
        .map(|p| p.0)
        .collect();
    if gate_positions.is_empty() {
        tracing::warn!("no gates registered; skipping mounted patrols");
    }

    if spawn_points.is_empty() && (dogs_wanted > 0 || elites_wanted > 0) {
        tracing::warn!("no unit spawn points configured; skipping dogs and elites");
    }

    let mut point_cursor = 0usize;
    let next_point = |cursor: &mut usize| -> Option<Vec2> {
        if spawn_points.is_empty() {
            return None;
        }
        let p = spawn_points[*cursor % spawn_points.len()];
        *cursor += 1;
        Some(p)
    };

    // Desired roster per kind; excess from a prior higher level is
    // withdrawn, missing units are raised.
    let desired = [
        (
            EscalationUnitKind::SearchDog,
            if spawn_points.is_empty() { 0 } else { dogs_wanted },
        ),
        (EscalationUnitKind::MountedPatrol, gate_positions.len()),
        (
            EscalationUnitKind::EliteGuard,
            if spawn_points.is_empty() { 0 } else { elites_wanted },
        ),
    ];

    for (kind, wanted) in desired {
        let have = world.resource::<GlobalAlert>().unit_count(kind);
        if have > wanted {
            // Keep the first `wanted` units of this kind, withdraw the rest.
            let excess: Vec<Entity> = {
                let mut alert = world.resource_mut::<GlobalAlert>();
                let mut kept = Vec::new();
                let mut removed = Vec::new();
                let mut seen = 0usize;
                let units = std::mem::take(&mut alert.spawned_units);
                for (entity, k) in units {
                    if k == kind {
                        seen += 1;
                        if seen > wanted {
                            removed.push(entity);
                            continue;
                        }
                    }
                    kept.push((entity, k));
                }
                alert.spawned_units = kept;
                removed
            };
            for entity in excess {
                spawn::despawn_unit(world, entity);
                world.resource_mut::<EventLog>().push(
                    SimEventKind::UnitDespawned,
                    now,
                    format!("{kind:?} withdrawn"),
                    serde_json::json!({ "kind": kind }),
                );
            }
            continue;
        }
        for i in have..wanted {
            let pos = match kind {
                EscalationUnitKind::MountedPatrol => gate_positions[i],
                _ => match next_point(&mut point_cursor) {
                    Some(p) => p,
                    None => continue,
                },
            };
            let entity = spawn::spawn_escalation_unit(world, kind, pos, hunt);
            world
                .resource_mut::<GlobalAlert>()
                .spawned_units
                .push((entity, kind));
            world
                .resource_mut::<Messages<SpawnRequest>>()
                .write(SpawnRequest {
                    unit: kind,
                    position: pos,
                });
            world.resource_mut::<EventLog>().push(
                SimEventKind::UnitSpawned,
                now,
                format!("{kind:?} raised at {pos}"),
                serde_json::json!({ "kind": kind }),
            );
        }
    }
}

fn reconcile_gates(world: &mut World, locked: bool) {
    let now = world.resource::<SimClock>().time;
    let mut alert = world.resource_mut::<GlobalAlert>();
    if alert.gates_locked == locked {
        return;
    }
    alert.gates_locked = locked;
    world
        .resource_mut::<Messages<GateLockChanged>>()
        .write(GateLockChanged { locked });
    world.resource_mut::<EventLog>().push(
        SimEventKind::GateLock,
        now,
        if locked {
            "city gates locked".to_string()
        } else {
            "city gates unlocked".to_string()
        },
        serde_json::json!({ "locked": locked }),
    );
}

/// Send every idle citizen running away from the danger point and
/// schedule their calm-down continuation. Citizens already fleeing keep
/// their current flight but get a refreshed calm-down timer.
fn trigger_civilian_flight(world: &mut World) {
    let now = world.resource::<SimClock>().time;
    let flee_secs = world.resource::<GlobalAlertConfig>().flee_duration_secs;
    let danger = world
        .resource::<GlobalAlert>()
        .last_known_player_pos
        .unwrap_or(Vec2::ZERO);

    let citizens: Vec<(Entity, Vec2, bool)> = world
        .query_filtered::<(Entity, &Position, &CitizenState), With<Citizen>>()
        .iter(world)
        .map(|(e, p, s)| (e, p.0, matches!(s, CitizenState::Flee(_))))
        .collect();

    let mut fled = 0usize;
    for (citizen, pos, already_fleeing) in citizens {
        if !already_fleeing {
            let away = flee_target(pos, danger);
            if let Some(mut state) = world.get_mut::<CitizenState>(citizen) {
                *state = CitizenState::Flee(away);
                fled += 1;
            }
        }
        world
            .resource_mut::<TaskQueue>()
            .schedule(now.after_secs(flee_secs), TaskKind::CalmCitizen { citizen });
    }

    if fled > 0 {
        world.resource_mut::<EventLog>().push(
            SimEventKind::CitizenFled,
            now,
            format!("{fled} citizens fled"),
            serde_json::json!({ "count": fled }),
        );
    }
}

/// A point directly away from the danger. With no separation (or no
/// known danger at the citizen's own position) any fixed direction
/// serves.
fn flee_target(from: Vec2, danger: Vec2) -> Vec2 {
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

/// Exclusive system: steps the global level down after the (long,
/// difficulty-scaled) dwell and re-applies effects on change.
pub fn decay_global_alert(world: &mut World) {
    let now = world.resource::<SimClock>().time;
    let dwell = world.resource::<GlobalAlertConfig>().decay_secs
        * world.resource::<Difficulty>().decay_scale();
    let change = world.resource_mut::<GlobalAlert>().try_decay(now, dwell);
    if let Some((old, new)) = change {
        announce_transition(world, old, new);
        apply_alert_state_effects(world);
    }
}

/// Exclusive system: the last-known-player-position only moves while
/// someone actually has eyes on the player — an engaged guard, or a
/// citizen whose suspicion is above the tracking threshold. Otherwise
/// the stored position goes stale on purpose.
pub fn track_player_position(world: &mut World) {
    let Some(player_pos) = world.resource::<PlayerPosition>().0 else {
        return;
    };
    let threshold = world
        .resource::<GlobalAlertConfig>()
        .suspicion_tracking_threshold;

    let guard_engaged = world
        .query_filtered::<&GuardState, With<Guard>>()
        .iter(world)
        .any(|s| s.is_engaged());
    let citizen_watching = !guard_engaged
        && world
            .query_filtered::<&Suspicion, With<Citizen>>()
            .iter(world)
            .any(|s| s.0 > threshold);

    if guard_engaged || citizen_watching {
        world.resource_mut::<GlobalAlert>().last_known_player_pos = Some(player_pos);
    }
}

// ---------------------------------------------------------------------------
// Plugin registration
// ---------------------------------------------------------------------------

pub struct GlobalAlertPlugin;

impl Plugin for GlobalAlertPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            SimTick,
            (track_player_position, decay_global_alert)
                .chain()
                .in_set(DomainSet::GlobalAlert),
        );
    }
}
