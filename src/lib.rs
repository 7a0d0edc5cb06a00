// src/lib.rs
//! Scrollstage
//!
//! A scroll-reactive 3D model stage built on wgpu and winit: load models,
//! light them, and retarget them with eased transitions as the page scrolls.

pub mod anim;
pub mod app;
pub mod asset;
pub mod gfx;
pub mod scroll;
pub mod timing;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::ScrollStageApp;
pub use scroll::{ScrollPolicy, ScrollReactor, SectionTable};

/// Creates a stage with the default showcase sections
pub fn default() -> ScrollStageApp {
    ScrollStageApp::new()
}
