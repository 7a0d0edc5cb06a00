//! # Asset Module
//!
//! Decoding of binary model files (glTF with optional animation clips, OBJ
//! without) into CPU-side model data, plus the fire-and-forget background
//! loader whose completions are joined on the frame loop.

pub mod loader;

// Re-export main types
pub use loader::{AssetError, AssetLoader, MeshData, ModelData, NodeData};
