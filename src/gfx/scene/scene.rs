//! Scene state: camera, lights, and the loaded-model slots.

use cgmath::Vector3;

use crate::gfx::{camera::StageCamera, lighting::Lighting};

use super::model::Model;

/// Explicit loaded-state wrapper for one requested asset.
///
/// Replaces ad hoc "is it null yet" checks: every cross-component access
/// goes through [`Scene::all_ready`] or the ready iterators.
pub enum ModelSlot {
    /// Load requested; scale and initial position to apply on arrival.
    Pending {
        name: String,
        scale: f32,
        position: Vector3<f32>,
    },
    /// Load resolved and the model joined the scene.
    Ready(Model),
    /// Load failed; the stage runs without this model.
    Failed { name: String },
}

impl ModelSlot {
    pub fn name(&self) -> &str {
        match self {
            ModelSlot::Pending { name, .. } | ModelSlot::Failed { name } => name,
            ModelSlot::Ready(model) => &model.name,
        }
    }
}

/// Main scene containing the camera, the light rig, and model slots.
pub struct Scene {
    pub camera: StageCamera,
    pub lighting: Lighting,
    slots: Vec<ModelSlot>,
}

impl Scene {
    pub fn new(camera: StageCamera) -> Self {
        Self {
            camera,
            lighting: Lighting::default(),
            slots: Vec::new(),
        }
    }

    /// Reserves a slot for a requested model, recording the transform to
    /// apply once its load resolves.
    pub fn reserve_slot(&mut self, name: &str, scale: f32, position: Vector3<f32>) {
        self.slots.push(ModelSlot::Pending {
            name: name.to_string(),
            scale,
            position,
        });
    }

    /// Takes the pending parameters for `name`, if that slot is still
    /// waiting. Used when a load resolves.
    pub fn pending_params(&self, name: &str) -> Option<(f32, Vector3<f32>)> {
        self.slots.iter().find_map(|slot| match slot {
            ModelSlot::Pending {
                name: n,
                scale,
                position,
            } if n == name => Some((*scale, *position)),
            _ => None,
        })
    }

    /// Installs a loaded model into its slot.
    pub fn fulfil_slot(&mut self, model: Model) {
        if let Some(slot) = self
            .slots
            .iter_mut()
            .find(|slot| matches!(slot, ModelSlot::Pending { name, .. } if *name == model.name))
        {
            *slot = ModelSlot::Ready(model);
        }
    }

    /// Marks a slot's load as failed.
    pub fn fail_slot(&mut self, name: &str) {
        if let Some(slot) = self
            .slots
            .iter_mut()
            .find(|slot| matches!(slot, ModelSlot::Pending { name: n, .. } if n == name))
        {
            *slot = ModelSlot::Failed {
                name: name.to_string(),
            };
        }
    }

    /// True when every requested model has loaded.
    ///
    /// The section-snap reactor needs all models before it issues a
    /// transition, so a late load cannot join out of formation.
    pub fn all_ready(&self) -> bool {
        !self.slots.is_empty()
            && self
                .slots
                .iter()
                .all(|slot| matches!(slot, ModelSlot::Ready(_)))
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Loaded models in request order.
    pub fn ready_models(&self) -> impl Iterator<Item = &Model> {
        self.slots.iter().filter_map(|slot| match slot {
            ModelSlot::Ready(model) => Some(model),
            _ => None,
        })
    }

    pub fn ready_models_mut(&mut self) -> impl Iterator<Item = &mut Model> {
        self.slots.iter_mut().filter_map(|slot| match slot {
            ModelSlot::Ready(model) => Some(model),
            _ => None,
        })
    }

    /// Advances every loaded model's animation state by `dt`.
    pub fn advance(&mut self, dt: f32) {
        for model in self.ready_models_mut() {
            model.advance(dt);
        }
    }

    /// Syncs every loaded model's world matrices to the GPU.
    pub fn update_transforms(&self, queue: &wgpu::Queue) {
        for model in self.ready_models() {
            model.update_transforms(queue);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::{MeshData, ModelData, NodeData};
    use cgmath::vec3;

    fn stub_model(name: &str) -> Model {
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
        Model::from_data(name, data, 1.0, vec3(0.0, 0.0, 0.0))
    }

    fn test_scene() -> Scene {
        Scene::new(StageCamera::new(1.0))
    }

    #[test]
    fn empty_scene_is_not_ready() {
        assert!(!test_scene().all_ready());
    }

    #[test]
    fn ready_only_after_every_slot_fulfils() {
        let mut scene = test_scene();
        scene.reserve_slot("bee", 0.08, vec3(-2.0, -1.0, -1.0));
        scene.reserve_slot("speaker", 6.0, vec3(0.5, -1.0, -1.0));
        assert!(!scene.all_ready());

        scene.fulfil_slot(stub_model("bee"));
        assert!(!scene.all_ready());

        scene.fulfil_slot(stub_model("speaker"));
        assert!(scene.all_ready());
        assert_eq!(scene.ready_models().count(), 2);
    }

    #[test]
    fn failed_slot_never_becomes_ready() {
        let mut scene = test_scene();
        scene.reserve_slot("bee", 1.0, vec3(0.0, 0.0, 0.0));
        scene.fail_slot("bee");
        assert!(!scene.all_ready());
        assert_eq!(scene.ready_models().count(), 0);
    }

    #[test]
    fn pending_params_round_trip() {
        let mut scene = test_scene();
        scene.reserve_slot("bee", 0.08, vec3(-2.0, -1.0, -1.0));

        let (scale, position) = scene.pending_params("bee").unwrap();
        assert_eq!(scale, 0.08);
        assert_eq!(position, vec3(-2.0, -1.0, -1.0));
        assert!(scene.pending_params("speaker").is_none());
    }

    #[test]
    fn advance_before_any_load_is_a_noop() {
        let mut scene = test_scene();
        scene.reserve_slot("bee", 1.0, vec3(0.0, 0.0, 0.0));
        // Must not panic with nothing loaded
        scene.advance(0.016);
    }
}
