//! # Scene Management Module
//!
//! Scene state for the stage: the model slots with their explicit
//! loaded-state wrappers, the per-model motion state, and the vertex
//! format shared with the render pipeline.

pub mod model;
pub mod scene;
pub mod vertex;

// Re-export main types
pub use model::{DrawModel, Mesh, Model};
pub use scene::{ModelSlot, Scene};
pub use vertex::Vertex3D;
