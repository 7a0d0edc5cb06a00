//! Easing curves for timed transitions.
//!
//! Section transitions use `QuadraticOut` (fast start, slow settle), the
//! bob idle driver uses `SineInOut`. All curves map [0, 1] to [0, 1] and
//! clamp their input.

/// Easing function variants for animation curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    /// Linear interpolation (no easing).
    Linear,
    /// Quadratic ease-out (fast start, slow end).
    QuadraticOut,
    /// Sine ease-in-out (gentle at both ends).
    SineInOut,
}

impl Easing {
    /// Evaluate the easing curve at normalized time `t`.
    ///
    /// Input is clamped to [0.0, 1.0]; the result stays in [0.0, 1.0].
    #[inline]
    pub fn evaluate(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match self {
            Easing::Linear => t,
            Easing::QuadraticOut => {
                let omt = 1.0 - t;
                1.0 - omt * omt
            }
            Easing::SineInOut => 0.5 - 0.5 * (std::f32::consts::PI * t).cos(),
        }
    }
}

impl Default for Easing {
    fn default() -> Self {
        Easing::QuadraticOut
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_endpoints() {
        assert_eq!(Easing::Linear.evaluate(0.0), 0.0);
        assert_eq!(Easing::Linear.evaluate(0.5), 0.5);
        assert_eq!(Easing::Linear.evaluate(1.0), 1.0);
    }

    #[test]
    fn quadratic_out_shape() {
        let e = Easing::QuadraticOut;
        assert_eq!(e.evaluate(0.0), 0.0);
        assert_eq!(e.evaluate(0.5), 0.75); // 1 - (1-0.5)^2
        assert_eq!(e.evaluate(1.0), 1.0);
        // Ease-out: early progress outruns linear time
        assert!(e.evaluate(0.25) > 0.25);
    }

    #[test]
    fn sine_in_out_endpoints() {
        let e = Easing::SineInOut;
        assert!(e.evaluate(0.0).abs() < 1e-6);
        assert!((e.evaluate(0.5) - 0.5).abs() < 1e-6);
        assert!((e.evaluate(1.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn input_clamping() {
        for e in [Easing::Linear, Easing::QuadraticOut, Easing::SineInOut] {
            assert_eq!(e.evaluate(-0.5), e.evaluate(0.0));
            assert!((e.evaluate(1.5) - e.evaluate(1.0)).abs() < 1e-6);
        }
    }
}
