pub mod alert;
pub mod memory;
pub mod noise;
pub mod personality;
pub mod position;

pub use alert::{AlertnessLevel, EscalationUnitKind, GlobalAlertLevel};
pub use memory::{MemoryEntry, MemoryKind, MemoryStore};
pub use noise::NoiseEvent;
pub use personality::{PersonalityProfile, Traits};
pub use position::Vec2;
