use bevy_ecs::component::Component;
use bevy_ecs::entity::Entity;

use crate::ecs::time::SimTime;
use crate::model::{MemoryStore, PersonalityProfile, Traits, Vec2};

/// Immutable personality bundle, assigned at spawn.
#[derive(Component, Debug, Clone, Copy)]
pub struct Personality {
    pub profile: PersonalityProfile,
    pub traits: Traits,
}

impl Personality {
    pub fn new(profile: PersonalityProfile) -> Self {
        Self {
            profile,
            traits: profile.traits(),
        }
    }
}

/// The citizen's bounded, decaying memory store.
#[derive(Component, Debug, Clone)]
pub struct CitizenMemory(pub MemoryStore);

/// Continuous suspicion level in [0,1]. Raised by perceived noise and
/// threats, decays each tick. Compared against the personality flee
/// threshold, and against the high fixed threshold used by the
/// last-known-player-position tracker.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Suspicion(pub f32);

impl Suspicion {
    pub fn raise(&mut self, amount: f32) {
        self.0 = (self.0 + amount).clamp(0.0, 1.0);
    }

    pub fn decay(&mut self, amount: f32) {
        self.0 = (self.0 - amount).max(0.0);
    }
}

/// What the citizen is currently doing.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub enum CitizenState {
    #[default]
    Idle,
    Investigate(Vec2),
    Flee(Vec2),
    Socialize(Entity),
}

/// Cooldown gate for social memory sharing.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct SocialCooldown {
    pub next_share: SimTime,
}
