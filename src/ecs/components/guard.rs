use bevy_ecs::component::Component;

use crate::model::{AlertnessLevel, Vec2};

/// Per-guard mirror of the population alertness level, kept in sync by
/// the guard alertness manager's broadcasts.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GuardAlertLevel(pub AlertnessLevel);

/// Speed/detection multipliers pushed by the global alert state machine.
///
/// Deliberately a second, distinct escalation signal from the alertness
/// level: the two paths stay coupled but separate.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct GuardModifiers {
    pub speed_multiplier: f32,
    pub detection_multiplier: f32,
}

impl Default for GuardModifiers {
    fn default() -> Self {
        Self {
            speed_multiplier: 1.0,
            detection_multiplier: 1.0,
        }
    }
}

/// What a guard (or escalation unit) is currently doing. Patrol routes,
/// search patterns, and combat are owned by the host's own agent state
/// machine; this is the core-visible summary it reports back.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub enum GuardState {
    #[default]
    Patrol,
    Investigate(Vec2),
    Chase,
    Attack,
    Search(Vec2),
}

impl GuardState {
    /// Actively on the player: the only states that count as "active
    /// visibility" for last-known-position tracking.
    pub fn is_engaged(self) -> bool {
        matches!(self, Self::Chase | Self::Attack)
    }
}

/// What this guard knows about the player. Pushed on sightings
/// ("alert all") and seeded into spawned escalation units.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct GuardKnowledge {
    pub last_player_pos: Option<Vec2>,
}
