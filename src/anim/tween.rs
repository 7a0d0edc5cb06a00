//! Timed, eased interpolation of a vector property toward a target.

use cgmath::Vector3;

use super::easing::Easing;

/// A one-shot tween moving a `Vector3` from its value at issue time to a
/// target over a fixed duration.
///
/// The tween is passive: callers advance it by the frame delta and apply
/// the sampled value. Once `finished()` the sample stays pinned at the
/// target exactly, so properties converge to their literal target values.
#[derive(Debug, Clone)]
pub struct Tween {
    from: Vector3<f32>,
    to: Vector3<f32>,
    duration: f32,
    elapsed: f32,
    easing: Easing,
}

impl Tween {
    /// Starts a tween from `from` to `to` over `duration` seconds.
    ///
    /// A non-positive duration snaps to the target on the first sample.
    pub fn new(from: Vector3<f32>, to: Vector3<f32>, duration: f32, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration: duration.max(0.0),
            elapsed: 0.0,
            easing,
        }
    }

    /// The target this tween converges to.
    pub fn target(&self) -> Vector3<f32> {
        self.to
    }

    /// Advances the play cursor and returns the current value.
    pub fn advance(&mut self, dt: f32) -> Vector3<f32> {
        self.elapsed = (self.elapsed + dt.max(0.0)).min(self.duration);
        self.sample()
    }

    /// Samples the current value without advancing.
    pub fn sample(&self) -> Vector3<f32> {
        if self.finished() {
            return self.to;
        }
        let t = self.easing.evaluate(self.elapsed / self.duration);
        self.from + (self.to - self.from) * t
    }

    /// True once the full duration has elapsed.
    pub fn finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}
