//! Citizen perception: turning heard noise into suspicion and memory.

use bevy_app::{App, Plugin};
use bevy_ecs::message::MessageReader;
use bevy_ecs::query::With;
use bevy_ecs::resource::Resource;
use bevy_ecs::schedule::IntoScheduleConfigs;
use bevy_ecs::system::{Query, Res};

use crate::ecs::clock::SimClock;
use crate::ecs::components::{Citizen, CitizenMemory, Personality, Suspicion};
use crate::ecs::conditions::every_second;
use crate::ecs::events::NoiseHeard;
use crate::ecs::schedule::{DomainSet, SimTick};
use crate::model::{MemoryEntry, MemoryKind};

// ---------------------------------------------------------------------------
// Tuning
// ---------------------------------------------------------------------------

/// Perceived intensity at or above which a noise is remembered as a
/// threat rather than an ordinary noise.
const THREAT_INTENSITY: f32 = 0.8;

/// Suspicion lost per tick of quiet.
const SUSPICION_DECAY_PER_TICK: f32 = 0.002;

/// Tuning for citizen memory stores.
#[derive(Resource, Debug, Clone)]
pub struct MemoryConfig {
    /// Entries a single citizen can hold before eviction kicks in.
    pub capacity: usize,
    /// Base lifetime in seconds; each entry scales this by importance.
    pub base_decay_secs: f64,
    /// Base seconds between social shares, scaled per-citizen by the
    /// sociability trait.
    pub share_cooldown_secs: f64,
    /// A share partner must be within this radius.
    pub share_radius: f32,
    /// Importance multiplier applied to second-hand memories.
    pub share_attenuation: f32,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            capacity: 10,
            base_decay_secs: 120.0,
            share_cooldown_secs: 20.0,
            share_radius: 6.0,
            share_attenuation: 0.8,
        }
    }
}

// ---------------------------------------------------------------------------
// Systems
// ---------------------------------------------------------------------------

/// Heard noise raises suspicion (scaled by the bravery-derived detection
/// trait) and leaves a memory whose importance is the perceived
/// intensity.
pub fn citizen_hear_noise(
    mut heard: MessageReader<NoiseHeard>,
    clock: Res<SimClock>,
    mut citizens: Query<(&Personality, &mut Suspicion, &mut CitizenMemory), With<Citizen>>,
) {
    for noise in heard.read() {
        let Ok((personality, mut suspicion, mut memory)) = citizens.get_mut(noise.listener) else {
            continue;
        };
        let perceived = (noise.intensity * personality.traits.detection_scale()).clamp(0.0, 1.0);
        if perceived <= 0.0 {
            continue;
        }
        suspicion.raise(perceived);
        let kind = if perceived >= THREAT_INTENSITY {
            MemoryKind::Threat
        } else {
            MemoryKind::Noise
        };
        memory.0.remember(MemoryEntry::new(
            kind,
            noise.position,
            clock.time,
            perceived,
            "heard a noise",
        ));
    }
}

/// Suspicion drains slowly every tick of quiet.
pub fn decay_suspicion(mut citizens: Query<&mut Suspicion, With<Citizen>>) {
    for mut suspicion in &mut citizens {
        suspicion.decay(SUSPICION_DECAY_PER_TICK);
    }
}

/// Drops expired entries from every citizen's memory store.
pub fn forget_expired_memories(
    clock: Res<SimClock>,
    cfg: Res<MemoryConfig>,
    mut citizens: Query<&mut CitizenMemory, With<Citizen>>,
) {
    for mut memory in &mut citizens {
        memory.0.forget_expired(clock.time, cfg.base_decay_secs);
    }
}

// ---------------------------------------------------------------------------
// Plugin registration
// ---------------------------------------------------------------------------

pub struct PerceptionPlugin;

impl Plugin for PerceptionPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            SimTick,
            (citizen_hear_noise, decay_suspicion)
                .chain()
                .in_set(DomainSet::Perception),
        );
        app.add_systems(
            SimTick,
            forget_expired_memories
                .run_if(every_second)
                .in_set(DomainSet::Perception)
                .after(decay_suspicion),
        );
    }
}
