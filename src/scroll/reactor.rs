//! The scroll reactor: accumulated offset in, model motion out.

use crate::gfx::scene::Scene;

use super::section::SectionTable;

/// How the stage reacts to scrolling.
///
/// The two policies are alternatives, never composed: a page either snaps
/// models between section targets or tumbles them continuously.
pub enum ScrollPolicy {
    /// Eased transitions toward the active section's target transform.
    SectionSnap {
        table: SectionTable,
        /// Transition duration in seconds.
        transition: f32,
        /// X offset added per secondary model so they fan out beside the
        /// primary instead of overlapping it.
        secondary_offset: f32,
    },
    /// Rotation increment proportional to the absolute scroll offset,
    /// added on all three axes of every loaded model. Unbounded, uneased.
    Tumble { coefficient: f32 },
}

impl ScrollPolicy {
    /// Duration of the eased section transition, in seconds.
    pub const DEFAULT_TRANSITION: f32 = 2.5;
    /// Default secondary-model fan-out distance.
    pub const DEFAULT_SECONDARY_OFFSET: f32 = 1.5;
    /// Default tumble coefficient (radians per page unit).
    pub const DEFAULT_TUMBLE_COEFFICIENT: f32 = 0.0015;

    pub fn section_snap(table: SectionTable) -> Self {
        Self::SectionSnap {
            table,
            transition: Self::DEFAULT_TRANSITION,
            secondary_offset: Self::DEFAULT_SECONDARY_OFFSET,
        }
    }

    pub fn tumble() -> Self {
        Self::Tumble {
            coefficient: Self::DEFAULT_TUMBLE_COEFFICIENT,
        }
    }

    /// True for the eased variant, which also carries the idle motion.
    pub fn is_eased(&self) -> bool {
        matches!(self, Self::SectionSnap { .. })
    }
}

/// Consumes scroll deltas and drives the scene's models accordingly.
///
/// All derived state (the accumulated offset and the currently active
/// section) lives here; the scene only ever sees transform targets.
pub struct ScrollReactor {
    policy: ScrollPolicy,
    offset: f32,
    active: Option<String>,
}

impl ScrollReactor {
    pub fn new(policy: ScrollPolicy) -> Self {
        Self {
            policy,
            offset: 0.0,
            active: None,
        }
    }

    /// Reactor with the default showcase section table.
    pub fn showcase() -> Self {
        Self::new(ScrollPolicy::section_snap(SectionTable::showcase()))
    }

    pub fn policy(&self) -> &ScrollPolicy {
        &self.policy
    }

    /// Accumulated scroll offset in page units.
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Currently active section id, if any transition has been issued.
    pub fn active_section(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Handles one scroll event of `delta` page units (positive is down).
    ///
    /// Safe to call at any time: before any model has loaded this derives
    /// state but changes nothing in the scene.
    pub fn handle_scroll(&mut self, delta: f32, viewport_height: f32, scene: &mut Scene) {
        match &self.policy {
            ScrollPolicy::SectionSnap {
                table,
                transition,
                secondary_offset,
            } => {
                let max = (table.page_height() - viewport_height).max(0.0);
                self.offset = (self.offset + delta).clamp(0.0, max);

                let Some(section) = table.active(self.offset, viewport_height) else {
                    return;
                };
                if self.active.as_deref() == Some(section.id.as_str()) {
                    return;
                }
                // Hold off until every model is in: the secondary offsets
                // are relative to the primary, so a partial cast would
                // snap later arrivals out of formation.
                if !scene.all_ready() {
                    return;
                }

                let target = section.target;
                for (index, model) in scene.ready_models_mut().enumerate() {
                    if index == 0 {
                        model.retarget(target.position, target.rotation, *transition);
                    } else {
                        let mut position = target.position;
                        position.x += secondary_offset * index as f32;
                        model.retarget_position(position, *transition);
                    }
                }
                self.active = Some(section.id.clone());
            }
            ScrollPolicy::Tumble { coefficient } => {
                self.offset = (self.offset + delta).max(0.0);
                let increment = self.offset * coefficient;
                for model in scene.ready_models_mut() {
                    model.add_rotation(increment);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::{MeshData, ModelData, NodeData};
    use crate::gfx::{camera::StageCamera, scene::Model};
    use cgmath::vec3;

    const VIEWPORT: f32 = 900.0;

    fn stub_model(name: &str, position: [f32; 3]) -> Model {
        let data = ModelData {
            meshes: vec![MeshData {
                positions: vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
                normals: vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0],
                indices: vec![0, 1, 2],
                base_color: [1.0; 4],
            }],
            nodes: vec![NodeData {
                parent: None,
                translation: [0.0; 3],
                rotation: [0.0, 0.0, 0.0, 1.0],
                scale: [1.0; 3],
                meshes: 0..1,
            }],
            clips: vec![],
        };
        Model::from_data(name, data, 1.0, position.into())
    }

    fn loaded_scene() -> Scene {
        let mut scene = Scene::new(StageCamera::new(1.0));
        scene.reserve_slot("bee", 1.0, vec3(-2.0, -1.0, -1.0));
        scene.reserve_slot("speaker", 1.0, vec3(0.5, -1.0, -1.0));
        scene.fulfil_slot(stub_model("bee", [-2.0, -1.0, -1.0]));
        scene.fulfil_slot(stub_model("speaker", [0.5, -1.0, -1.0]));
        scene
    }

    fn settle(scene: &mut Scene) {
        for _ in 0..200 {
            scene.advance(0.05);
        }
    }

    #[test]
    fn scroll_before_loads_resolve_is_a_noop() {
        let mut scene = Scene::new(StageCamera::new(1.0));
        scene.reserve_slot("bee", 1.0, vec3(0.0, 0.0, 0.0));

        let mut reactor = ScrollReactor::showcase();
        reactor.handle_scroll(500.0, VIEWPORT, &mut scene);

        // Offset is derived, but no section was claimed
        assert!(reactor.offset() > 0.0);
        assert!(reactor.active_section().is_none());
    }

    #[test]
    fn no_section_crossed_means_no_transition() {
        use crate::scroll::section::{Section, SectionTarget};

        // Park the only section far below the fold
        let table = SectionTable::new(vec![Section {
            id: "below".to_string(),
            top: 50_000.0,
            height: 900.0,
            target: SectionTarget {
                position: vec3(1.0, 1.0, 1.0),
                rotation: vec3(0.0, 0.0, 0.0),
            },
        }]);

        let mut scene = loaded_scene();
        let mut reactor = ScrollReactor::new(ScrollPolicy::section_snap(table));
        reactor.handle_scroll(10.0, VIEWPORT, &mut scene);
        settle(&mut scene);

        assert!(reactor.active_section().is_none());
        let bee = scene.ready_models().next().unwrap();
        assert_eq!(bee.position, vec3(-2.0, -1.0, -1.0));
    }

    #[test]
    fn crossing_banner_converges_models_to_table_targets() {
        let mut scene = loaded_scene();
        let mut reactor = ScrollReactor::showcase();

        reactor.handle_scroll(1.0, VIEWPORT, &mut scene);
        assert_eq!(reactor.active_section(), Some("banner"));
        settle(&mut scene);

        let models: Vec<_> = scene.ready_models().collect();
        assert_eq!(models[0].position, vec3(0.0, -2.0, 0.0));
        assert_eq!(models[0].rotation, vec3(0.0, 1.5, 0.0));
        // Secondary fans out by the fixed constant on x only
        assert_eq!(models[1].position, vec3(1.5, -2.0, 0.0));
    }

    #[test]
    fn repeated_scroll_in_same_section_is_idempotent() {
        let mut scene = loaded_scene();
        let mut reactor = ScrollReactor::showcase();

        reactor.handle_scroll(1.0, VIEWPORT, &mut scene);
        for _ in 0..10 {
            scene.advance(0.05);
        }
        let mid: Vec<_> = scene.ready_models().map(|m| m.position).collect();

        // Same section, no movement: nothing restarts
        reactor.handle_scroll(0.0, VIEWPORT, &mut scene);
        let after: Vec<_> = scene.ready_models().map(|m| m.position).collect();
        assert_eq!(mid, after);
    }

    #[test]
    fn scrolling_between_sections_retargets() {
        let mut scene = loaded_scene();
        let mut reactor = ScrollReactor::showcase();

        reactor.handle_scroll(1.0, VIEWPORT, &mut scene);
        assert_eq!(reactor.active_section(), Some("banner"));

        reactor.handle_scroll(700.0, VIEWPORT, &mut scene);
        assert_eq!(reactor.active_section(), Some("intro"));
        settle(&mut scene);

        let bee = scene.ready_models().next().unwrap();
        assert_eq!(bee.position, vec3(4.0, -2.0, -8.0));
        assert_eq!(bee.rotation, vec3(0.5, -0.5, 0.0));
    }

    #[test]
    fn offset_clamps_to_page_bounds() {
        let mut scene = loaded_scene();
        let mut reactor = ScrollReactor::showcase();

        reactor.handle_scroll(-500.0, VIEWPORT, &mut scene);
        assert_eq!(reactor.offset(), 0.0);

        reactor.handle_scroll(1.0e9, VIEWPORT, &mut scene);
        let max = SectionTable::showcase().page_height() - VIEWPORT;
        assert_eq!(reactor.offset(), max);
    }

    #[test]
    fn tumble_adds_offset_scaled_rotation() {
        let mut scene = loaded_scene();
        let mut reactor = ScrollReactor::new(ScrollPolicy::Tumble { coefficient: 0.01 });

        reactor.handle_scroll(100.0, VIEWPORT, &mut scene);
        let bee = scene.ready_models().next().unwrap();
        assert!((bee.rotation.x - 1.0).abs() < 1e-5);
        assert!((bee.rotation.y - 1.0).abs() < 1e-5);
        assert!((bee.rotation.z - 1.0).abs() < 1e-5);

        // Accumulator is unbounded: further scrolling keeps adding
        reactor.handle_scroll(100.0, VIEWPORT, &mut scene);
        let bee = scene.ready_models().next().unwrap();
        assert!(bee.rotation.x > 2.0);
    }

    #[test]
    fn tumble_before_loads_is_safe() {
        let mut scene = Scene::new(StageCamera::new(1.0));
        scene.reserve_slot("bee", 1.0, vec3(0.0, 0.0, 0.0));

        let mut reactor = ScrollReactor::new(ScrollPolicy::tumble());
        reactor.handle_scroll(400.0, VIEWPORT, &mut scene);
        // No panic, nothing to rotate
    }
}
