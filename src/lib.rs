pub mod ecs;
pub mod model;

pub use model::{
    AlertnessLevel, EscalationUnitKind, GlobalAlertLevel, MemoryEntry, MemoryKind, MemoryStore,
    NoiseEvent, PersonalityProfile, Traits, Vec2,
};
