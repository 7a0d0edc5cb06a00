//! Named page sections and their target transforms.
//!
//! The stage models the landing page as a vertical strip of named
//! sections, each with a top edge in page coordinates and a target
//! transform for the primary model. The table is built at startup and
//! never changes.

use cgmath::{vec3, Vector3};

/// Target transform associated with one section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionTarget {
    pub position: Vector3<f32>,
    pub rotation: Vector3<f32>,
}

/// A scroll-addressable region of the page.
#[derive(Debug, Clone)]
pub struct Section {
    pub id: String,
    /// Top edge in page coordinates (pixels from the page start).
    pub top: f32,
    pub height: f32,
    pub target: SectionTarget,
}

/// Fixed, ordered mapping from section to target transform.
#[derive(Debug, Clone)]
pub struct SectionTable {
    sections: Vec<Section>,
}

impl SectionTable {
    /// Height given to each section of the default showcase page.
    pub const DEFAULT_SECTION_HEIGHT: f32 = 900.0;

    pub fn new(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    /// Builds a table from `(id, position, rotation)` triples, stacking
    /// the sections top to bottom at the default height.
    pub fn stacked(entries: &[(&str, [f32; 3], [f32; 3])]) -> Self {
        let sections = entries
            .iter()
            .enumerate()
            .map(|(i, (id, position, rotation))| Section {
                id: (*id).to_string(),
                top: i as f32 * Self::DEFAULT_SECTION_HEIGHT,
                height: Self::DEFAULT_SECTION_HEIGHT,
                target: SectionTarget {
                    position: (*position).into(),
                    rotation: (*rotation).into(),
                },
            })
            .collect();
        Self { sections }
    }

    /// The default showcase page: banner, intro, description, contact.
    pub fn showcase() -> Self {
        Self::stacked(&[
            ("banner", [0.0, -2.0, 0.0], [0.0, 1.5, 0.0]),
            ("intro", [4.0, -2.0, -8.0], [0.5, -0.5, 0.0]),
            ("description", [-4.0, -2.0, -8.0], [0.0, 0.5, 0.0]),
            ("contact", [6.0, -2.0, 0.0], [0.3, -0.5, 0.0]),
        ])
    }

    /// Derives the active section for a scroll offset.
    ///
    /// A section counts once its top edge, relative to the viewport, has
    /// crossed one third of the viewport height; the last matching section
    /// in table order wins. Returns `None` when nothing has crossed.
    pub fn active(&self, scroll_offset: f32, viewport_height: f32) -> Option<&Section> {
        let threshold = viewport_height / 3.0;
        self.sections
            .iter()
            .filter(|section| section.top - scroll_offset <= threshold)
            .next_back()
    }

    pub fn get(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|section| section.id == id)
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Total page height; scroll offsets clamp to it.
    pub fn page_height(&self) -> f32 {
        self.sections
            .iter()
            .map(|section| section.top + section.height)
            .fold(0.0, f32::max)
    }

    /// Scroll offset at which `id` becomes the active section, useful for
    /// jumping the stage straight to a section.
    pub fn offset_for(&self, id: &str, viewport_height: f32) -> Option<f32> {
        self.get(id)
            .map(|section| (section.top - viewport_height / 3.0).max(0.0))
    }
}

impl Default for SectionTable {
    fn default() -> Self {
        Self::showcase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: f32 = 900.0;

    #[test]
    fn nothing_active_before_any_top_crosses_threshold() {
        // Push the first section below the fold
        let mut table = SectionTable::showcase();
        for section in &mut table.sections {
            section.top += 2000.0;
        }
        assert!(table.active(0.0, VIEWPORT).is_none());
    }

    #[test]
    fn banner_active_at_page_top() {
        let table = SectionTable::showcase();
        let active = table.active(0.0, VIEWPORT).unwrap();
        assert_eq!(active.id, "banner");
        assert_eq!(active.target.position, vec3(0.0, -2.0, 0.0));
        assert_eq!(active.target.rotation, vec3(0.0, 1.5, 0.0));
    }

    #[test]
    fn last_crossed_section_wins() {
        let table = SectionTable::showcase();

        // intro top = 900; it crosses once 900 - offset <= 300
        let active = table.active(600.0, VIEWPORT).unwrap();
        assert_eq!(active.id, "intro");

        // Just before that boundary the banner still holds
        let active = table.active(599.0, VIEWPORT).unwrap();
        assert_eq!(active.id, "banner");

        // Deep scroll: everything crossed, the last section wins
        let active = table.active(10_000.0, VIEWPORT).unwrap();
        assert_eq!(active.id, "contact");
    }

    #[test]
    fn threshold_is_exactly_one_third() {
        let table = SectionTable::stacked(&[("only", [0.0; 3], [0.0; 3])]);
        // top = 0: crosses when offset >= -viewport/3, i.e. always
        assert!(table.active(0.0, 600.0).is_some());

        let mut table = table;
        table.sections[0].top = 500.0;
        // 500 - 300 = 200 <= 600/3 = 200: exactly on the threshold counts
        assert!(table.active(300.0, 600.0).is_some());
        assert!(table.active(299.0, 600.0).is_none());
    }

    #[test]
    fn page_height_spans_all_sections() {
        let table = SectionTable::showcase();
        assert_eq!(
            table.page_height(),
            4.0 * SectionTable::DEFAULT_SECTION_HEIGHT
        );
    }

    #[test]
    fn offset_for_lands_on_section() {
        let table = SectionTable::showcase();
        let offset = table.offset_for("description", VIEWPORT).unwrap();
        assert_eq!(table.active(offset, VIEWPORT).unwrap().id, "description");
    }
}
