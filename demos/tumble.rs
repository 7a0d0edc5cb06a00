//! # Tumble Demo
//!
//! The alternative scroll policy: no section targets, just a continuous
//! rotation on every axis that grows with the accumulated scroll offset.
//!
//! ## Usage:
//! ```bash
//! cargo run --example tumble
//! ```

use cgmath::vec3;
use scrollstage::{ScrollPolicy, ScrollStageApp};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut app = ScrollStageApp::new();
    app.set_scroll_policy(ScrollPolicy::tumble());
    app.add_model("assets/speaker.glb", 6.0, vec3(0.0, -1.0, -1.0));

    app.run()
}
