use bevy_ecs::entity::Entity;
use bevy_ecs::resource::Resource;

use crate::ecs::time::SimTime;
use crate::model::{AlertnessLevel, EscalationUnitKind, GlobalAlertLevel, Vec2};

// ---------------------------------------------------------------------------
// Guard alertness manager
// ---------------------------------------------------------------------------

/// Tuning for the guard alertness manager. Effective thresholds and
/// decay dwell are further scaled by the `Difficulty` resource.
#[derive(Resource, Debug, Clone)]
pub struct GuardAlertConfig {
    /// Seconds of continuous quiet before one decay step.
    pub decay_secs: f64,
    /// Missing citizens before the population turns at least Suspicious.
    pub missing_citizen_threshold: u32,
    /// Triggered traps before the population turns at least Alert.
    pub trap_threshold: u32,
    /// Only guards within this radius of a loud noise get pushed an
    /// investigate alert ("alert nearby").
    pub loud_noise_alert_radius: f32,
}

impl Default for GuardAlertConfig {
    fn default() -> Self {
        Self {
            decay_secs: 30.0,
            missing_citizen_threshold: 3,
            trap_threshold: 2,
            loud_noise_alert_radius: 25.0,
        }
    }
}

/// Single tracked alertness level for the guard population, plus the
/// discrete trigger counters that feed it.
#[derive(Resource, Debug, Clone)]
pub struct GuardAlertness {
    pub level: AlertnessLevel,
    pub last_change: SimTime,
    pub missing_citizens: u32,
    pub traps_triggered: u32,
}

impl Default for GuardAlertness {
    fn default() -> Self {
        Self {
            level: AlertnessLevel::Normal,
            last_change: SimTime::from_ticks(0),
            missing_citizens: 0,
            traps_triggered: 0,
        }
    }
}

impl GuardAlertness {
    /// Monotonic max: raises the level to at least `target`, never
    /// lowers it. A trigger at or above the current level re-arms the
    /// dwell timer. Returns the transition when the level changed.
    pub fn increase(
        &mut self,
        target: AlertnessLevel,
        now: SimTime,
    ) -> Option<(AlertnessLevel, AlertnessLevel)> {
        if target >= self.level {
            self.last_change = now;
        }
        if target > self.level {
            let old = self.level;
            self.level = target;
            return Some((old, target));
        }
        None
    }

    /// Steps down exactly one level once the full dwell time has passed
    /// with no intervening trigger. A no-op before that.
    pub fn try_decay(
        &mut self,
        now: SimTime,
        dwell_secs: f64,
    ) -> Option<(AlertnessLevel, AlertnessLevel)> {
        if self.level == AlertnessLevel::Normal {
            return None;
        }
        if now.elapsed_since(self.last_change) < dwell_secs {
            return None;
        }
        let old = self.level;
        self.level = self.level.lowered();
        self.last_change = now;
        Some((old, self.level))
    }
}

// ---------------------------------------------------------------------------
// Global alert state machine
// ---------------------------------------------------------------------------

/// Per-state effect row from the global alert configuration table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateEffects {
    pub speed_multiplier: f32,
    pub detection_multiplier: f32,
    pub audio_intensity: f32,
    pub locks_gates: bool,
    pub civilians_flee: bool,
}

/// Tuning for the global alert state machine.
#[derive(Resource, Debug, Clone)]
pub struct GlobalAlertConfig {
    /// Seconds of dwell before one decay step. Longer than guard
    /// alertness by design.
    pub decay_secs: f64,
    /// Search dogs spawned while at Orange or above.
    pub dogs_per_orange_alert: u32,
    /// Additional elite guards spawned at Red.
    pub elites_per_red_alert: u32,
    /// Spawn points for dogs and elite guards. Empty list degrades the
    /// feature with a warning instead of failing.
    pub unit_spawn_points: Vec<Vec2>,
    /// Seconds a triggered civilian keeps fleeing before calming down.
    pub flee_duration_secs: f64,
    /// Citizen suspicion above this counts as active visibility for the
    /// last-known-player-position tracker.
    pub suspicion_tracking_threshold: f32,
}

impl Default for GlobalAlertConfig {
    fn default() -> Self {
        Self {
            decay_secs: 90.0,
            dogs_per_orange_alert: 2,
            elites_per_red_alert: 3,
            unit_spawn_points: Vec::new(),
            flee_duration_secs: 45.0,
            suspicion_tracking_threshold: 0.9,
        }
    }
}

impl GlobalAlertConfig {
    /// The full per-state effect table. Re-applied in full on every
    /// transition, so each row must stand on its own.
    pub fn effects(&self, level: GlobalAlertLevel) -> StateEffects {
        match level {
            GlobalAlertLevel::Calm => StateEffects {
                speed_multiplier: 1.0,
                detection_multiplier: 1.0,
                audio_intensity: 0.0,
                locks_gates: false,
                civilians_flee: false,
            },
            GlobalAlertLevel::Yellow => StateEffects {
                speed_multiplier: 1.15,
                detection_multiplier: 1.25,
                audio_intensity: 0.3,
                locks_gates: false,
                civilians_flee: false,
            },
            GlobalAlertLevel::Orange => StateEffects {
                speed_multiplier: 1.3,
                detection_multiplier: 1.5,
                audio_intensity: 0.6,
                locks_gates: true,
                civilians_flee: true,
            },
            GlobalAlertLevel::Red => StateEffects {
                speed_multiplier: 1.5,
                detection_multiplier: 2.0,
                audio_intensity: 1.0,
                locks_gates: true,
                civilians_flee: true,
            },
        }
    }
}

/// The city-wide escalation ladder and what it currently owns: spawned
/// escalation units, the gate-lock flag, and the last known player
/// position fed to spawned hunters.
///
/// Not persisted: a fresh simulation always starts at Calm.
#[derive(Resource, Debug, Clone, Default)]
pub struct GlobalAlert {
    pub level: GlobalAlertLevel,
    pub last_change: SimTime,
    pub spawned_units: Vec<(Entity, EscalationUnitKind)>,
    pub last_known_player_pos: Option<Vec2>,
    pub gates_locked: bool,
}

impl GlobalAlert {
    /// Advance exactly one level. Saturates at Red.
    pub fn advance(&mut self, now: SimTime) -> Option<(GlobalAlertLevel, GlobalAlertLevel)> {
        let next = self.level.raised();
        if next == self.level {
            self.last_change = now;
            return None;
        }
        let old = self.level;
        self.level = next;
        self.last_change = now;
        Some((old, next))
    }

    /// Step down exactly one level once the dwell time has passed.
    pub fn try_decay(
        &mut self,
        now: SimTime,
        dwell_secs: f64,
    ) -> Option<(GlobalAlertLevel, GlobalAlertLevel)> {
        if self.level == GlobalAlertLevel::Calm {
            return None;
        }
        if now.elapsed_since(self.last_change) < dwell_secs {
            return None;
        }
        let old = self.level;
        self.level = self.level.lowered();
        self.last_change = now;
        Some((old, self.level))
    }

    /// Administrative override: jump to an arbitrary level, bypassing
    /// the single-step ladder. Effects are still re-applied in full by
    /// the caller.
    pub fn force(&mut self, level: GlobalAlertLevel, now: SimTime) -> (GlobalAlertLevel, GlobalAlertLevel) {
        let old = self.level;
        self.level = level;
        self.last_change = now;
        (old, level)
    }

    pub fn unit_count(&self, kind: EscalationUnitKind) -> usize {
        self.spawned_units.iter().filter(|(_, k)| *k == kind).count()
    }
}
