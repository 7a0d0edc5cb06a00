//! Fixed two-light rig: one ambient fill and one directional key light.

/// Uniform fill light applied to every fragment.
#[derive(Debug, Clone, Copy)]
pub struct AmbientLight {
    pub color: [f32; 3],
    pub intensity: f32,
}

/// Sun-style light; only its direction (position toward origin) matters.
#[derive(Debug, Clone, Copy)]
pub struct DirectionalLight {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub intensity: f32,
}

/// The stage's light rig. Fixed at startup, never animated.
#[derive(Debug, Clone, Copy)]
pub struct Lighting {
    pub ambient: AmbientLight,
    pub directional: DirectionalLight,
}

impl Default for Lighting {
    /// Bright white fill and key, key parked high on the +X/+Y/+Z diagonal.
    fn default() -> Self {
        Self {
            ambient: AmbientLight {
                color: [1.0, 1.0, 1.0],
                intensity: 1.8,
            },
            directional: DirectionalLight {
                position: [100.0, 100.0, 100.0],
                color: [1.0, 1.0, 1.0],
                intensity: 1.8,
            },
        }
    }
}
