use std::hash::{DefaultHasher, Hash, Hasher};

use bevy_ecs::resource::Resource;
use bevy_ecs::world::World;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::model::Vec2;

/// Simulation configuration.
#[derive(Resource, Debug, Clone)]
pub struct SimConfig {
    pub seed: u64,
    /// Spatial grid cell size in meters.
    pub cell_size: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            cell_size: 8.0,
        }
    }
}

/// Deterministic RNG for the simulation.
#[derive(Resource)]
pub struct SimRng {
    pub rng: SmallRng,
    pub seed: u64,
}

// ---------------------------------------------------------------------------
// Per-domain RNG resources
// ---------------------------------------------------------------------------

macro_rules! domain_rng {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Resource)]
        pub struct $name(pub SmallRng);

        impl Default for $name {
            fn default() -> Self {
                Self(SmallRng::seed_from_u64(0))
            }
        }
    };
}

domain_rng!(PersonalityRng, "Per-domain RNG for personality assignment.");
domain_rng!(SocialRng, "Per-domain RNG for social-interaction systems.");
domain_rng!(BehaviorRng, "Per-domain RNG for reactive-behavior systems.");

/// Derive a deterministic per-domain seed from the global seed, domain name, and tick count.
fn derive_domain_seed(seed: u64, domain: &str, tick: u64) -> u64 {
    let mut hasher = DefaultHasher::new();
    seed.hash(&mut hasher);
    domain.hash(&mut hasher);
    tick.hash(&mut hasher);
    hasher.finish()
}

/// Exclusive system that re-seeds all per-domain RNGs each tick.
/// Runs in `SimPhase::PreUpdate` before any domain systems.
pub fn distribute_rng(world: &mut World) {
    let seed = world.resource::<SimRng>().seed;
    let tick = world.resource::<crate::ecs::clock::SimClock>().tick_count;

    macro_rules! reseed {
        ($res:ty, $label:expr) => {
            world.resource_mut::<$res>().0 =
                SmallRng::seed_from_u64(derive_domain_seed(seed, $label, tick));
        };
    }

    reseed!(PersonalityRng, "personality");
    reseed!(SocialRng, "social");
    reseed!(BehaviorRng, "behavior");
}

/// External difficulty knob. 1.0 is baseline; higher values make alert
/// linger longer (slower decay) and lower the trigger thresholds.
#[derive(Resource, Debug, Clone, Copy)]
pub struct Difficulty(pub f64);

impl Default for Difficulty {
    fn default() -> Self {
        Self(1.0)
    }
}

impl Difficulty {
    pub fn clamped(value: f64) -> Self {
        Self(value.clamp(0.25, 4.0))
    }

    /// Multiplier applied to decay dwell times.
    pub fn decay_scale(self) -> f64 {
        self.0
    }

    /// Effective trigger threshold: shrinks as difficulty rises, never
    /// below 1.
    pub fn effective_threshold(self, base: u32) -> u32 {
        ((f64::from(base) / self.0).ceil() as u32).max(1)
    }
}

/// The player's current world position, supplied by the host each frame.
/// `None` until first reported.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct PlayerPosition(pub Option<Vec2>);
