//! GPU resource management: global uniforms and texture helpers.

pub mod global_bindings;
pub mod texture_resource;

// Re-export main types
pub use global_bindings::{GlobalBindings, GlobalUBO};
pub use texture_resource::TextureResource;
