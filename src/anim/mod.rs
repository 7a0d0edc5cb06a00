//! # Animation Module
//!
//! Time-driven motion for scene models: eased tweens for section
//! transitions, perpetual idle drivers (spin and bob), and a per-model
//! mixer that plays an asset's baked animation clip.
//!
//! Everything here is advanced once per frame by the elapsed-time delta
//! computed in the frame loop; nothing schedules itself.

pub mod easing;
pub mod idle;
pub mod mixer;
pub mod tween;

// Re-export main types
pub use easing::Easing;
pub use idle::{Bob, Spin};
pub use mixer::{Channel, ChannelTarget, Clip, Interpolation, Mixer, NodePose};
pub use tween::Tween;
