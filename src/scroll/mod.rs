//! # Scroll Module
//!
//! Maps accumulated scroll offset to model motion. Two mutually exclusive
//! policies sit behind one reactor: eased section-snap transitions driven
//! by a fixed section target table, or a continuous unbounded tumble
//! proportional to the scroll offset.

pub mod reactor;
pub mod section;

// Re-export main types
pub use reactor::{ScrollPolicy, ScrollReactor};
pub use section::{Section, SectionTable, SectionTarget};
