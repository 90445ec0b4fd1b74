use bevy_ecs::entity::Entity;
use bevy_ecs::message::Message;

use crate::model::{AlertnessLevel, EscalationUnitKind, GlobalAlertLevel, Vec2};

/// Guard-population alertness level changed. Consumed by host
/// controllers, UI, and audio.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct AlertnessChanged {
    pub old: AlertnessLevel,
    pub new: AlertnessLevel,
}

/// City-wide alert state changed.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlobalAlertChanged {
    pub old: GlobalAlertLevel,
    pub new: GlobalAlertLevel,
}

/// A single guard was pushed an alert, optionally with a position worth
/// investigating. "Alert all" sends one per registered guard; "alert
/// nearby" sends one per guard inside the trigger radius.
#[derive(Message, Clone, Copy, Debug)]
pub struct GuardAlerted {
    pub guard: Entity,
    pub level: AlertnessLevel,
    pub position: Option<Vec2>,
}

/// Distance-attenuated noise notification for one listener. The
/// propagation component is purely a dispatcher; the listener decides
/// its own reaction from personality and alertness state.
#[derive(Message, Clone, Copy, Debug)]
pub struct NoiseHeard {
    pub listener: Entity,
    pub position: Vec2,
    pub intensity: f32,
}

/// Outbound request for the (external) spawning subsystem. The core also
/// spawns its own simulation-side unit entity.
#[derive(Message, Clone, Copy, Debug)]
pub struct SpawnRequest {
    pub unit: EscalationUnitKind,
    pub position: Vec2,
}

/// Outbound: city gates locked or unlocked. Each gate's own trigger
/// logic consumes this.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct GateLockChanged {
    pub locked: bool,
}

/// Outbound movement command. Pathfinding and locomotion are external;
/// the core only says where an agent should head and how urgently.
#[derive(Message, Clone, Copy, Debug)]
pub struct MoveOrder {
    pub entity: Entity,
    pub target: Vec2,
    pub urgency: MoveUrgency,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveUrgency {
    Walk,
    Run,
}
