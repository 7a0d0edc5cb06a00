//! WGPU utility functions and helpers
//!
//! Provides convenient wrappers for common wgpu operations.

pub mod binding_types;
pub mod uniform_buffer;

// Re-export main types
pub use binding_types::*;
pub use uniform_buffer::UniformBuffer;
