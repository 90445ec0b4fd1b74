use super::position::Vec2;
use crate::ecs::time::SimTime;

/// An ephemeral noise emission. Consumed once for dispatch; retained
/// briefly only for the debug overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseEvent {
    pub position: Vec2,
    pub radius: f32,
    pub intensity: f32,
    pub created_at: SimTime,
}

impl NoiseEvent {
    /// Clamps bad configuration instead of rejecting it: negative radii
    /// become zero, intensity is pinned to [0,1].
    pub fn new(position: Vec2, radius: f32, intensity: f32, created_at: SimTime) -> Self {
        Self {
            position,
            radius: radius.max(0.0),
            intensity: intensity.clamp(0.0, 1.0),
            created_at,
        }
    }

    /// Linear falloff: `intensity * (1 - d/radius)`, clamped at 0 at the
    /// radius boundary. Listeners beyond the radius hear nothing.
    pub fn attenuated(&self, listener: Vec2) -> f32 {
        if self.radius <= 0.0 {
            return 0.0;
        }
        let d = self.position.distance(listener);
        if d > self.radius {
            return 0.0;
        }
        (self.intensity * (1.0 - d / self.radius)).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noise(radius: f32, intensity: f32) -> NoiseEvent {
        NoiseEvent::new(Vec2::ZERO, radius, intensity, SimTime::from_ticks(0))
    }

    #[test]
    fn attenuation_is_linear_in_distance() {
        let n = noise(10.0, 0.8);
        assert_eq!(n.attenuated(Vec2::ZERO), 0.8);
        assert!((n.attenuated(Vec2::new(5.0, 0.0)) - 0.4).abs() < 1e-6);
        assert!(n.attenuated(Vec2::new(10.0, 0.0)).abs() < 1e-6);
    }

    #[test]
    fn outside_radius_hears_nothing() {
        let n = noise(10.0, 1.0);
        assert_eq!(n.attenuated(Vec2::new(10.1, 0.0)), 0.0);
    }

    #[test]
    fn bad_inputs_are_clamped() {
        let n = noise(-5.0, 2.0);
        assert_eq!(n.radius, 0.0);
        assert_eq!(n.intensity, 1.0);
        assert_eq!(n.attenuated(Vec2::ZERO), 0.0);
    }
}
