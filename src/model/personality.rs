use rand::Rng;
use serde::{Deserialize, Serialize};

/// Immutable per-citizen personality, assigned at spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PersonalityProfile {
    Cowardly,
    Normal,
    Brave,
    Curious,
    Social,
    Loner,
}

/// Rarity weights for random assignment. Normal is the common case;
/// Loner is the rarest.
const PROFILE_WEIGHTS: [(PersonalityProfile, u32); 6] = [
    (PersonalityProfile::Normal, 40),
    (PersonalityProfile::Social, 15),
    (PersonalityProfile::Curious, 15),
    (PersonalityProfile::Cowardly, 12),
    (PersonalityProfile::Brave, 10),
    (PersonalityProfile::Loner, 8),
];

impl PersonalityProfile {
    /// Rarity-weighted random draw.
    pub fn random(rng: &mut impl Rng) -> Self {
        let total: u32 = PROFILE_WEIGHTS.iter().map(|(_, w)| w).sum();
        let mut roll = rng.random_range(0..total);
        for (profile, weight) in PROFILE_WEIGHTS {
            if roll < weight {
                return profile;
            }
            roll -= weight;
        }
        Self::Normal
    }

    /// The continuous trait bundle this profile maps to.
    pub fn traits(self) -> Traits {
        match self {
            Self::Cowardly => Traits::new(0.15, 0.3, 0.4),
            Self::Normal => Traits::new(0.5, 0.5, 0.5),
            Self::Brave => Traits::new(0.85, 0.5, 0.5),
            Self::Curious => Traits::new(0.5, 0.85, 0.5),
            Self::Social => Traits::new(0.5, 0.5, 0.85),
            Self::Loner => Traits::new(0.45, 0.4, 0.1),
        }
    }

    /// Willingness to take part in memory sharing as a listener.
    /// Initiation is stricter: only Social citizens start a chat.
    pub fn shares_memories(self) -> bool {
        self != Self::Loner
    }
}

/// Continuous traits in [0,1] derived from the profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Traits {
    pub bravery: f32,
    pub curiosity: f32,
    pub social: f32,
}

impl Traits {
    fn new(bravery: f32, curiosity: f32, social: f32) -> Self {
        Self {
            bravery: bravery.clamp(0.0, 1.0),
            curiosity: curiosity.clamp(0.0, 1.0),
            social: social.clamp(0.0, 1.0),
        }
    }

    /// Multiplier on perceived-event intensity. Cowards notice danger
    /// faster (scale up), the brave slower.
    pub fn detection_scale(self) -> f32 {
        1.5 - self.bravery
    }

    /// Suspicion level at which this citizen flees. Cowards flee sooner.
    pub fn flee_threshold(self) -> f32 {
        0.3 + 0.5 * self.bravery
    }

    /// Seconds between social memory shares, scaled by sociability.
    pub fn share_interval_secs(self, base_secs: f64) -> f64 {
        base_secs / (0.5 + f64::from(self.social))
    }

    /// Whether an unusual event is worth walking over to investigate
    /// rather than ignoring.
    pub fn investigates(self, importance: f32) -> bool {
        importance * self.curiosity >= 0.25
    }
}
