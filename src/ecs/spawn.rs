//! Spawn helpers: component bundles plus spatial-index registration in
//! one place, so every entity the systems reason about is queryable by
//! position from the moment it exists.

use bevy_ecs::entity::Entity;
use bevy_ecs::world::World;

use crate::ecs::components::{
    Citizen, CitizenMemory, CitizenState, EscalationUnit, Gate, Guard, GuardAlertLevel,
    GuardKnowledge, GuardModifiers, GuardState, Personality, Position, SocialCooldown, Suspicion,
};
use crate::ecs::resources::{GuardAlertness, PersonalityRng, SpatialGrid};
use crate::ecs::systems::perception::MemoryConfig;
use crate::model::{EscalationUnitKind, MemoryStore, PersonalityProfile, Vec2};

pub fn spawn_guard(world: &mut World, pos: Vec2) -> Entity {
    // New guards join at the population's current alertness.
    let level = world.resource::<GuardAlertness>().level;
    let entity = world
        .spawn((
            Guard,
            Position(pos),
            GuardAlertLevel(level),
            GuardModifiers::default(),
            GuardState::default(),
            GuardKnowledge::default(),
        ))
        .id();
    world.resource_mut::<SpatialGrid>().register(entity, pos);
    entity
}

/// Spawn a citizen. With `profile: None` the personality is drawn from
/// the rarity-weighted table using the personality domain RNG.
pub fn spawn_citizen(
    world: &mut World,
    pos: Vec2,
    profile: Option<PersonalityProfile>,
) -> Entity {
    let profile = match profile {
        Some(p) => p,
        None => {
            let mut rng = world.resource_mut::<PersonalityRng>();
            PersonalityProfile::random(&mut rng.0)
        }
    };
    let capacity = world.resource::<MemoryConfig>().capacity;
    let entity = world
        .spawn((
            Citizen,
            Position(pos),
            Personality::new(profile),
            CitizenMemory(MemoryStore::new(capacity)),
            Suspicion::default(),
            CitizenState::default(),
            SocialCooldown::default(),
        ))
        .id();
    world.resource_mut::<SpatialGrid>().register(entity, pos);
    entity
}

pub fn spawn_gate(world: &mut World, pos: Vec2) -> Entity {
    let entity = world.spawn((Gate, Position(pos))).id();
    world.resource_mut::<SpatialGrid>().register(entity, pos);
    entity
}

/// Spawn an escalation unit, seeded with the hunt position it should
/// converge on (if one is known).
pub fn spawn_escalation_unit(
    world: &mut World,
    kind: EscalationUnitKind,
    pos: Vec2,
    hunt: Option<Vec2>,
) -> Entity {
    let state = match hunt {
        Some(target) => GuardState::Search(target),
        None => GuardState::Patrol,
    };
    let entity = world
        .spawn((
            EscalationUnit { kind },
            Position(pos),
            state,
            GuardKnowledge {
                last_player_pos: hunt,
            },
        ))
        .id();
    world.resource_mut::<SpatialGrid>().register(entity, pos);
    entity
}

/// Remove a spawned unit from the index and the world. Safe to call on
/// an entity that is already gone.
pub fn despawn_unit(world: &mut World, entity: Entity) {
    world.resource_mut::<SpatialGrid>().unregister(entity);
    if world.get_entity(entity).is_ok() {
        world.despawn(entity);
    }
}
