//! # Graphics Module
//!
//! Rendering for the showcase stage: the fixed camera, the two-light rig,
//! the wgpu render engine, and the scene of loaded models.

pub mod camera;
pub mod lighting;
pub mod render_engine;
pub mod resources;
pub mod scene;

// Re-export main types
pub use camera::{CameraUniform, StageCamera};
pub use lighting::{AmbientLight, DirectionalLight, Lighting};
pub use render_engine::RenderEngine;
pub use scene::{Model, ModelSlot, Scene};
