use serde::{Deserialize, Serialize};

/// Guard-population alertness tier. Fast-moving and localized: raised by
/// sightings, noises, and trigger counters; decays one step at a time
/// after a dwell period with no new triggers.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum AlertnessLevel {
    #[default]
    Normal,
    Suspicious,
    Alert,
    Panic,
}

impl AlertnessLevel {
    /// Next level up, saturating at `Panic`.
    pub fn raised(self) -> Self {
        match self {
            Self::Normal => Self::Suspicious,
            Self::Suspicious => Self::Alert,
            Self::Alert | Self::Panic => Self::Panic,
        }
    }

    /// Next level down, saturating at `Normal`.
    pub fn lowered(self) -> Self {
        match self {
            Self::Panic => Self::Alert,
            Self::Alert => Self::Suspicious,
            Self::Suspicious | Self::Normal => Self::Normal,
        }
    }
}

/// City-wide escalation ladder. Coarser and slower than guard alertness,
/// with spawning and lockdown side effects keyed by state.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum GlobalAlertLevel {
    #[default]
    Calm,
    Yellow,
    Orange,
    Red,
}

impl GlobalAlertLevel {
    /// Next level up, saturating at `Red`.
    pub fn raised(self) -> Self {
        match self {
            Self::Calm => Self::Yellow,
            Self::Yellow => Self::Orange,
            Self::Orange | Self::Red => Self::Red,
        }
    }

    /// Next level down, saturating at `Calm`.
    pub fn lowered(self) -> Self {
        match self {
            Self::Red => Self::Orange,
            Self::Orange => Self::Yellow,
            Self::Yellow | Self::Calm => Self::Calm,
        }
    }

    /// Escalation units exist only at Orange and above.
    pub fn spawns_units(self) -> bool {
        self >= Self::Orange
    }
}

/// A unit that exists only while the global alert state is Orange or Red.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EscalationUnitKind {
    SearchDog,
    MountedPatrol,
    EliteGuard,
}
