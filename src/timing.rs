//! Frame timing: elapsed-time deltas for the render loop.

use std::time::Instant;

/// Produces the per-frame elapsed-time delta.
///
/// The first tick yields zero, and deltas are capped so a stall (window
/// drag, debugger pause) does not teleport every animation forward.
pub struct FrameClock {
    last_frame: Option<Instant>,
    max_step: f32,
}

impl FrameClock {
    /// Longest delta a single frame may report, in seconds.
    pub const DEFAULT_MAX_STEP: f32 = 0.1;

    pub fn new() -> Self {
        Self {
            last_frame: None,
            max_step: Self::DEFAULT_MAX_STEP,
        }
    }

    /// Returns seconds since the previous tick, capped at the max step.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let dt = match self.last_frame {
            Some(last) => (now - last).as_secs_f32().min(self.max_step),
            None => 0.0,
        };
        self.last_frame = Some(now);
        dt
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_is_zero() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick(), 0.0);
    }

    #[test]
    fn deltas_are_capped() {
        let mut clock = FrameClock::new();
        let _ = clock.tick();
        // Simulate a long stall
        clock.last_frame = Some(Instant::now() - std::time::Duration::from_secs(5));
        assert!(clock.tick() <= FrameClock::DEFAULT_MAX_STEP);
    }

    #[test]
    fn deltas_are_non_negative() {
        let mut clock = FrameClock::new();
        for _ in 0..10 {
            assert!(clock.tick() >= 0.0);
        }
    }
}
