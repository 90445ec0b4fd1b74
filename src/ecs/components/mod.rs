pub mod citizen;
pub mod common;
pub mod guard;

pub use citizen::{CitizenMemory, CitizenState, Personality, SocialCooldown, Suspicion};
pub use common::{Citizen, EscalationUnit, Gate, Guard, Position};
pub use guard::{GuardAlertLevel, GuardKnowledge, GuardModifiers, GuardState};
