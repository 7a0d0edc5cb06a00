//! Perpetual idle drivers: a slow tumble on all three axes and a vertical
//! sine bob. Both repeat until the window closes.

use std::f32::consts::TAU;

use cgmath::Vector3;

use super::easing::Easing;

/// Continuous rotation at one full turn per `period` seconds on every axis,
/// wrapped to [0, 2pi).
#[derive(Debug, Clone, Copy)]
pub struct Spin {
    period: f32,
}

impl Spin {
    /// Default spin period matching the showcase idle motion.
    pub const DEFAULT_PERIOD: f32 = 6.0;

    pub fn new(period: f32) -> Self {
        Self {
            period: period.max(f32::EPSILON),
        }
    }

    /// Applies `dt` seconds of spin to a Euler rotation vector in place.
    pub fn advance(&self, dt: f32, rotation: &mut Vector3<f32>) {
        let step = TAU * dt / self.period;
        rotation.x = wrap_angle(rotation.x + step);
        rotation.y = wrap_angle(rotation.y + step);
        rotation.z = wrap_angle(rotation.z + step);
    }
}

impl Default for Spin {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PERIOD)
    }
}

/// Wraps an angle in radians to [0, 2pi).
pub fn wrap_angle(angle: f32) -> f32 {
    angle.rem_euclid(TAU)
}

/// Vertical bob: eases up by `amplitude` over `half_period` seconds, then
/// back down, yoyo forever. The offset is additive at render time so it
/// never disturbs a tweened position target.
#[derive(Debug, Clone, Copy)]
pub struct Bob {
    amplitude: f32,
    half_period: f32,
    phase: f32,
}

impl Bob {
    /// Default amplitude/half-period matching the showcase idle motion.
    pub const DEFAULT_AMPLITUDE: f32 = 1.0;
    pub const DEFAULT_HALF_PERIOD: f32 = 1.2;

    pub fn new(amplitude: f32, half_period: f32) -> Self {
        Self {
            amplitude,
            half_period: half_period.max(f32::EPSILON),
            phase: 0.0,
        }
    }

    /// Advances the bob cursor and returns the current vertical offset.
    pub fn advance(&mut self, dt: f32) -> f32 {
        self.phase = (self.phase + dt / self.half_period).rem_euclid(2.0);
        self.offset()
    }

    /// Current vertical offset in [0, amplitude].
    pub fn offset(&self) -> f32 {
        // Triangle wave folded through the sine ease: 0 -> 1 -> 0
        let t = if self.phase <= 1.0 {
            self.phase
        } else {
            2.0 - self.phase
        };
        self.amplitude * Easing::SineInOut.evaluate(t)
    }
}

impl Default for Bob {
    fn default() -> Self {
        Self::new(Self::DEFAULT_AMPLITUDE, Self::DEFAULT_HALF_PERIOD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::vec3;

    #[test]
    fn spin_wraps_to_full_turn() {
        let spin = Spin::new(6.0);
        let mut rotation = vec3(0.0, 0.0, 0.0);

        // Exactly one period: every axis comes back to 0 (mod 2pi)
        for _ in 0..60 {
            spin.advance(0.1, &mut rotation);
        }
        assert!(rotation.x < 1e-3 || TAU - rotation.x < 1e-3);
        assert!(rotation.y < 1e-3 || TAU - rotation.y < 1e-3);
    }

    #[test]
    fn spin_stays_in_range() {
        let spin = Spin::default();
        let mut rotation = vec3(5.0, 5.0, 5.0);
        for _ in 0..1000 {
            spin.advance(0.05, &mut rotation);
            assert!((0.0..TAU).contains(&rotation.x));
            assert!((0.0..TAU).contains(&rotation.y));
            assert!((0.0..TAU).contains(&rotation.z));
        }
    }

    #[test]
    fn wrap_angle_negative() {
        assert!((wrap_angle(-0.5) - (TAU - 0.5)).abs() < 1e-6);
        assert_eq!(wrap_angle(0.0), 0.0);
    }

    #[test]
    fn bob_yoyo_returns_to_rest() {
        let mut bob = Bob::new(1.0, 1.2);

        let up = bob.advance(1.2);
        assert!((up - 1.0).abs() < 1e-4, "peak after half period, got {up}");

        let down = bob.advance(1.2);
        assert!(down.abs() < 1e-4, "rest after full cycle, got {down}");
    }

    #[test]
    fn bob_offset_bounded_by_amplitude() {
        let mut bob = Bob::default();
        for _ in 0..500 {
            let offset = bob.advance(0.07);
            assert!((0.0..=Bob::DEFAULT_AMPLITUDE + 1e-6).contains(&offset));
        }
    }
}
