//! Social memory propagation.
//!
//! Once per second, Social-profile citizens past their share cooldown
//! pass their most important memory to the nearest willing neighbor.
//! Second-hand copies arrive attenuated and tagged as social
//! interactions, so gossip fades with each hop. Only Social citizens
//! initiate; Loners refuse even to listen.

use bevy_app::{App, Plugin};
use bevy_ecs::entity::Entity;
use bevy_ecs::schedule::IntoScheduleConfigs;
use bevy_ecs::world::World;

use crate::ecs::clock::SimClock;
use crate::ecs::components::{
    Citizen, CitizenMemory, CitizenState, Personality, Position, SocialCooldown,
};
use crate::ecs::conditions::every_second;
use crate::ecs::resources::{EventLog, SimEventKind, SpatialGrid};
use crate::ecs::schedule::{DomainSet, SimTick};
use crate::ecs::systems::perception::MemoryConfig;
use crate::model::{MemoryEntry, MemoryKind, PersonalityProfile};

/// Exclusive system, gated to once per second by the schedule. Collects
/// all shares first, then applies them, so a memory shared this pass
/// cannot be re-shared within the same pass.
pub fn share_memories(world: &mut World) {
    let now = world.resource::<SimClock>().time;

    // Chats started on the previous pass are over.
    let chatting: Vec<Entity> = world
        .query::<(Entity, &CitizenState)>()
        .iter(world)
        .filter(|(_, s)| matches!(s, CitizenState::Socialize(_)))
        .map(|(e, _)| e)
        .collect();
    for citizen in chatting {
        if let Some(mut state) = world.get_mut::<CitizenState>(citizen) {
            *state = CitizenState::Idle;
        }
    }

    let (base_decay, cooldown_base, share_radius, attenuation) = {
        let cfg = world.resource::<MemoryConfig>();
        (
            cfg.base_decay_secs,
            cfg.share_cooldown_secs,
            cfg.share_radius,
            cfg.share_attenuation,
        )
    };

    struct Share {
        from: Entity,
        to: Entity,
        entry: MemoryEntry,
        next_share: crate::ecs::time::SimTime,
    }

    let mut shares: Vec<Share> = Vec::new();
    {
        let mut sharers = world.query::<(
            Entity,
            &Position,
            &Personality,
            &CitizenMemory,
            &SocialCooldown,
        )>();
        let grid = world.resource::<SpatialGrid>();

        let willing: std::collections::HashMap<Entity, bool> = sharers
            .iter(world)
            .map(|(e, _, p, _, _)| (e, p.profile.shares_memories()))
            .collect();

        for (entity, pos, personality, memory, cooldown) in sharers.iter(world) {
            if personality.profile != PersonalityProfile::Social {
                continue;
            }
            if now < cooldown.next_share {
                continue;
            }
            let Some(entry) = memory.0.most_important(now, base_decay) else {
                continue;
            };
            let Some(partner) = grid.nearest_matching(pos.0, share_radius, |e| {
                e != entity && willing.get(&e).copied().unwrap_or(false)
            }) else {
                continue;
            };
            let mut copy = entry.clone();
            copy.kind = MemoryKind::SocialInteraction;
            copy.importance = (copy.importance * attenuation).clamp(0.0, 1.0);
            copy.timestamp = now;
            let interval = personality.traits.share_interval_secs(cooldown_base);
            shares.push(Share {
                from: entity,
                to: partner,
                entry: copy,
                next_share: now.after_secs(interval),
            });
        }
    }

    for share in shares {
        // Partner may have despawned since collection.
        if world.get::<Citizen>(share.to).is_none() {
            continue;
        }
        let Some(mut memory) = world.get_mut::<CitizenMemory>(share.to) else {
            continue;
        };
        memory.0.remember(share.entry.clone());
        if let Some(mut cooldown) = world.get_mut::<SocialCooldown>(share.from) {
            cooldown.next_share = share.next_share;
        }
        // The teller visibly stops for a chat until the next pass.
        if let Some(mut state) = world.get_mut::<CitizenState>(share.from)
            && *state == CitizenState::Idle
        {
            *state = CitizenState::Socialize(share.to);
        }
        world.resource_mut::<EventLog>().push(
            SimEventKind::MemoryShared,
            now,
            "memory shared".to_string(),
            serde_json::json!({
                "importance": share.entry.importance,
            }),
        );
    }
}

// ---------------------------------------------------------------------------
// Plugin registration
// ---------------------------------------------------------------------------

pub struct SocialPlugin;

impl Plugin for SocialPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            SimTick,
            share_memories
                .run_if(every_second)
                .in_set(DomainSet::Social),
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
    use crate::model::{PersonalityProfile, Vec2};

    fn implant_memory(world: &mut World, citizen: Entity, importance: f32) {
        let now = world.resource::<SimClock>().time;
        world
            .get_mut::<CitizenMemory>(citizen)
            .unwrap()
            .0
            .remember(MemoryEntry::new(
                MemoryKind::PlayerSighting,
                Vec2::ZERO,
                now,
                importance,
                "saw someone on the rooftops",
            ));
    }

    #[test]
    fn memories_spread_to_nearby_citizens_attenuated() {
        let mut app = build_sim_app_seeded(42);
        app.add_plugins(SimPlugin);
        let teller = spawn::spawn_citizen(
            app.world_mut(),
            Vec2::ZERO,
            Some(PersonalityProfile::Social),
        );
        let listener = spawn::spawn_citizen(
            app.world_mut(),
            Vec2::new(2.0, 0.0),
            Some(PersonalityProfile::Normal),
        );
        implant_memory(app.world_mut(), teller, 0.9);

        tick_seconds(&mut app, 2.0);

        let attenuation = app.world().resource::<MemoryConfig>().share_attenuation;
        let memory = app.world().get::<CitizenMemory>(listener).unwrap();
        let received = memory
            .0
            .iter()
            .find(|e| e.kind == MemoryKind::SocialInteraction)
            .expect("listener should have received the memory");
        assert!((received.importance - 0.9 * attenuation).abs() < 1e-6);
    }

    #[test]
    fn loners_do_not_give_or_receive() {
        let mut app = build_sim_app_seeded(42);
        app.add_plugins(SimPlugin);
        let loner_teller = spawn::spawn_citizen(
            app.world_mut(),
            Vec2::ZERO,
            Some(PersonalityProfile::Loner),
        );
        let loner_listener = spawn::spawn_citizen(
            app.world_mut(),
            Vec2::new(2.0, 0.0),
            Some(PersonalityProfile::Loner),
        );
        let social = spawn::spawn_citizen(
            app.world_mut(),
            Vec2::new(4.0, 0.0),
            Some(PersonalityProfile::Social),
        );
        implant_memory(app.world_mut(), loner_teller, 0.9);
        implant_memory(app.world_mut(), social, 0.9);

        tick_seconds(&mut app, 5.0);

        let loner_mem = app.world().get::<CitizenMemory>(loner_listener).unwrap();
        assert!(
            loner_mem
                .0
                .iter()
                .all(|e| e.kind != MemoryKind::SocialInteraction),
            "loner should never receive shared memories"
        );
    }

    #[test]
    fn only_social_profiles_initiate_shares() {
        let mut app = build_sim_app_seeded(42);
        app.add_plugins(SimPlugin);
        let teller = spawn::spawn_citizen(
            app.world_mut(),
            Vec2::ZERO,
            Some(PersonalityProfile::Normal),
        );
        spawn::spawn_citizen(
            app.world_mut(),
            Vec2::new(2.0, 0.0),
            Some(PersonalityProfile::Normal),
        );
        implant_memory(app.world_mut(), teller, 0.9);

        tick_seconds(&mut app, 2.0);

        assert_eq!(
            app.world()
                .resource::<EventLog>()
                .count_of(SimEventKind::MemoryShared),
            0,
            "a Normal citizen must not start a chat"
        );
    }

    #[test]
    fn sharing_respects_the_cooldown() {
        let mut app = build_sim_app_seeded(42);
        app.add_plugins(SimPlugin);
        let teller = spawn::spawn_citizen(
            app.world_mut(),
            Vec2::ZERO,
            Some(PersonalityProfile::Social),
        );
        spawn::spawn_citizen(
            app.world_mut(),
            Vec2::new(2.0, 0.0),
            Some(PersonalityProfile::Normal),
        );
        implant_memory(app.world_mut(), teller, 0.9);

        tick_seconds(&mut app, 2.0);
        let shares_after_first = app
            .world()
            .resource::<EventLog>()
            .count_of(SimEventKind::MemoryShared);
        assert_eq!(shares_after_first, 1);

        // Still inside the cooldown window: no further share.
        tick_seconds(&mut app, 2.0);
        let shares_after_second = app
            .world()
            .resource::<EventLog>()
            .count_of(SimEventKind::MemoryShared);
        assert_eq!(shares_after_second, 1);
    }

    #[test]
    fn teller_shares_again_once_the_interval_elapses() {
        let mut app = build_sim_app_seeded(42);
        app.add_plugins(SimPlugin);
        let teller = spawn::spawn_citizen(
            app.world_mut(),
            Vec2::ZERO,
            Some(PersonalityProfile::Social),
        );
        spawn::spawn_citizen(
            app.world_mut(),
            Vec2::new(2.0, 0.0),
            Some(PersonalityProfile::Normal),
        );
        implant_memory(app.world_mut(), teller, 0.9);

        // Social traits put the personal interval under 15 seconds.
        let base = app.world().resource::<MemoryConfig>().share_cooldown_secs;
        let interval = PersonalityProfile::Social
            .traits()
            .share_interval_secs(base);
        assert!(interval < 15.0);

        tick_seconds(&mut app, 10.0);
        assert_eq!(
            app.world()
                .resource::<EventLog>()
                .count_of(SimEventKind::MemoryShared),
            1
        );

        tick_seconds(&mut app, 10.0);
        assert_eq!(
            app.world()
                .resource::<EventLog>()
                .count_of(SimEventKind::MemoryShared),
            2,
            "the cooldown must expire, not silence the teller forever"
        );
    }

    #[test]
    fn nothing_shared_when_out_of_range() {
        let mut app = build_sim_app_seeded(42);
        app.add_plugins(SimPlugin);
        let teller = spawn::spawn_citizen(
            app.world_mut(),
            Vec2::ZERO,
            Some(PersonalityProfile::Social),
        );
        spawn::spawn_citizen(
            app.world_mut(),
            Vec2::new(100.0, 0.0),
            Some(PersonalityProfile::Normal),
        );
        implant_memory(app.world_mut(), teller, 0.9);

        tick_seconds(&mut app, 5.0);

        assert_eq!(
            app.world()
                .resource::<EventLog>()
                .count_of(SimEventKind::MemoryShared),
            0
        );
    }
}
