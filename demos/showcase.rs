//! # Showcase Demo
//!
//! The full landing-page stage: two models loaded in the background, lit by
//! the default rig, drifting between the banner / intro / description /
//! contact section targets as you scroll the mouse wheel.
//!
//! ## Usage:
//! ```bash
//! cargo run --example showcase
//! ```
//!
//! Until both models finish loading the stage idles; once they are in, the
//! primary model spins and bobs, and scrolling snaps the pair to the active
//! section's transform.

use cgmath::vec3;
use scrollstage::ScrollStageApp;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut app = ScrollStageApp::new();

    // Primary model: takes the full section transitions
    app.add_model("assets/robot_arm.glb", 0.08, vec3(-2.0, -1.0, -1.0));
    // Secondary: follows the position targets with a fixed x offset
    app.add_model("assets/speaker.glb", 6.0, vec3(0.5, -1.0, -1.0));

    app.run()
}
