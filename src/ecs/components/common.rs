use bevy_ecs::component::Component;

use crate::model::{EscalationUnitKind, Vec2};

/// Current world position, written by the external movement layer.
/// The `sync_spatial_index` system re-buckets movers each tick.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Position(pub Vec2);

// ---------------------------------------------------------------------------
// Marker components — one per agent population
// ---------------------------------------------------------------------------

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Guard;

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Citizen;

/// A city gate. Mounted patrols spawn one per gate at Orange, and gates
/// lock at Orange and above.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Gate;

/// A unit that exists only while the global alert state is Orange/Red.
#[derive(Component, Debug, Clone, Copy)]
pub struct EscalationUnit {
    pub kind: EscalationUnitKind,
}
