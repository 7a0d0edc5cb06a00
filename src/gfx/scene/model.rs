//! Loaded 3D models and their per-frame motion state.
//!
//! A [`Model`] owns the decoded node hierarchy and meshes of one asset plus
//! the transform the scroll reactor animates: a position vector, a Euler
//! rotation vector, and a uniform scale. Clip playback (mixer), section
//! transition tweens, and the idle spin/bob drivers all live here and are
//! advanced together once per frame.

use std::ops::Range;

use cgmath::{Matrix4, Rad, Vector3};
use wgpu::Device;

use crate::anim::{Bob, Easing, Mixer, NodePose, Spin, Tween};
use crate::asset::ModelData;

use super::vertex::Vertex3D;

pub struct Mesh {
    vertices: Vec<Vertex3D>,
    indices: Vec<u32>,
    base_color: [f32; 4],
    vertex_buffer: Option<wgpu::Buffer>,
    index_buffer: Option<wgpu::Buffer>,
    index_count: u32,
}

impl Mesh {
    pub fn new(positions: &[f32], normals: &[f32], indices: Vec<u32>, base_color: [f32; 4]) -> Self {
        let index_count = indices.len() as u32;

        let mut vertices = Vec::with_capacity(positions.len() / 3);
        for i in 0..positions.len() / 3 {
            vertices.push(Vertex3D {
                position: [positions[i * 3], positions[i * 3 + 1], positions[i * 3 + 2]],
                normal: [normals[i * 3], normals[i * 3 + 1], normals[i * 3 + 2]],
            });
        }

        Self {
            vertices,
            indices,
            base_color,
            vertex_buffer: None,
            index_buffer: None,
            index_count,
        }
    }

    fn init_gpu_resources(&mut self, device: &Device) {
        let vertex_buffer = wgpu::util::DeviceExt::create_buffer_init(
            device,
            &wgpu::util::BufferInitDescriptor {
                label: Some("Vertex Buffer"),
                contents: bytemuck::cast_slice(&self.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            },
        );

        let index_buffer = wgpu::util::DeviceExt::create_buffer_init(
            device,
            &wgpu::util::BufferInitDescriptor {
                label: Some("Index Buffer"),
                contents: bytemuck::cast_slice(&self.indices),
                usage: wgpu::BufferUsages::INDEX,
            },
        );

        self.vertex_buffer = Some(vertex_buffer);
        self.index_buffer = Some(index_buffer);
    }
}

/// Static parent/mesh wiring of one node; the animated part lives in the
/// parallel [`NodePose`] list.
struct NodeTopology {
    parent: Option<usize>,
    meshes: Range<usize>,
}

/// Per-drawable uniform: world matrix plus flat base color.
///
/// MUST match the `Draw` struct in `lit.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct DrawUniform {
    model: [[f32; 4]; 4],
    color: [f32; 4],
}

struct DrawItem {
    node: usize,
    mesh: usize,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// A loaded model in the scene, including everything that moves it.
pub struct Model {
    pub name: String,
    meshes: Vec<Mesh>,
    topology: Vec<NodeTopology>,
    poses: Vec<NodePose>,

    /// Animated root transform, targeted by the scroll reactor.
    pub position: Vector3<f32>,
    /// Euler rotation in radians, applied Z * Y * X.
    pub rotation: Vector3<f32>,
    pub scale: f32,

    mixer: Option<Mixer>,
    spin: Option<Spin>,
    bob: Option<Bob>,
    bob_offset: f32,
    position_tween: Option<Tween>,
    rotation_tween: Option<Tween>,

    draw_items: Vec<DrawItem>,
}

impl Model {
    /// Builds a model from decoded asset data, applying the configured
    /// scale and initial position. The first animation clip, if any, gets a
    /// mixer; assets with zero clips simply play nothing.
    pub fn from_data(
        name: &str,
        data: ModelData,
        scale: f32,
        position: Vector3<f32>,
    ) -> Self {
        let meshes = data
            .meshes
            .iter()
            .map(|m| {
                Mesh::new(
                    &m.positions,
                    &m.normals,
                    m.indices.clone(),
                    m.base_color,
                )
            })
            .collect();

        let mut topology = Vec::with_capacity(data.nodes.len());
        let mut poses = Vec::with_capacity(data.nodes.len());
        for node in &data.nodes {
            topology.push(NodeTopology {
                parent: node.parent,
                meshes: node.meshes.clone(),
            });
            poses.push(NodePose {
                translation: node.translation.into(),
                rotation: cgmath::Quaternion::new(
                    node.rotation[3],
                    node.rotation[0],
                    node.rotation[1],
                    node.rotation[2],
                ),
                scale: node.scale.into(),
            });
        }

        let mixer = data
            .clips
            .into_iter()
            .next()
            .filter(|clip| !clip.channels.is_empty())
            .map(Mixer::new);

        Self {
            name: name.to_string(),
            meshes,
            topology,
            poses,
            position,
            rotation: Vector3::new(0.0, 0.0, 0.0),
            scale,
            mixer,
            spin: None,
            bob: None,
            bob_offset: 0.0,
            position_tween: None,
            rotation_tween: None,
            draw_items: Vec::new(),
        }
    }

    pub fn has_mixer(&self) -> bool {
        self.mixer.is_some()
    }

    /// Registers the perpetual spin-and-bob idle motion (eased variant
    /// only). Spin runs until the first section transition claims the
    /// rotation; the bob offset is additive and never disturbs a tweened
    /// position target.
    pub fn enable_idle_motion(&mut self) {
        self.spin = Some(Spin::default());
        self.bob = Some(Bob::default());
    }

    /// The position this model is headed to (current position when no
    /// transition is active).
    pub fn target_position(&self) -> Vector3<f32> {
        self.position_tween
            .as_ref()
            .map_or(self.position, Tween::target)
    }

    /// The rotation this model is headed to.
    pub fn target_rotation(&self) -> Vector3<f32> {
        self.rotation_tween
            .as_ref()
            .map_or(self.rotation, Tween::target)
    }

    /// Issues an eased transition toward the given transform.
    ///
    /// Re-issuing with an unchanged target is a no-op, so repeated scroll
    /// events inside one section never restart the motion.
    pub fn retarget(&mut self, position: Vector3<f32>, rotation: Vector3<f32>, duration: f32) {
        if self.target_position() != position || self.target_rotation() != rotation {
            self.position_tween = Some(Tween::new(
                self.position,
                position,
                duration,
                Easing::QuadraticOut,
            ));
            self.rotation_tween = Some(Tween::new(
                self.rotation,
                rotation,
                duration,
                Easing::QuadraticOut,
            ));
            // A transition owns the rotation from here on
            self.spin = None;
        }
    }

    /// Issues an eased transition of the position only, leaving rotation
    /// to the idle drivers (used for secondary models).
    pub fn retarget_position(&mut self, position: Vector3<f32>, duration: f32) {
        if self.target_position() != position {
            self.position_tween = Some(Tween::new(
                self.position,
                position,
                duration,
                Easing::QuadraticOut,
            ));
        }
    }

    /// Adds a raw rotation increment on all three axes (tumble policy).
    /// Deliberately unwrapped: the accumulator is unbounded.
    pub fn add_rotation(&mut self, increment: f32) {
        self.rotation.x += increment;
        self.rotation.y += increment;
        self.rotation.z += increment;
    }

    /// Advances clip playback, transitions, and idle motion by `dt`.
    pub fn advance(&mut self, dt: f32) {
        if let Some(mixer) = self.mixer.as_mut() {
            mixer.update(dt, &mut self.poses);
        }

        if let Some(tween) = self.position_tween.as_mut() {
            self.position = tween.advance(dt);
            if tween.finished() {
                self.position = tween.target();
                self.position_tween = None;
            }
        }

        match self.rotation_tween.as_mut() {
            Some(tween) => {
                self.rotation = tween.advance(dt);
                if tween.finished() {
                    self.rotation = tween.target();
                    self.rotation_tween = None;
                }
            }
            None => {
                if let Some(spin) = self.spin {
                    spin.advance(dt, &mut self.rotation);
                }
            }
        }

        if let Some(bob) = self.bob.as_mut() {
            self.bob_offset = bob.advance(dt);
        }
    }

    /// Root world matrix: T(position + bob) * Rz * Ry * Rx * S.
    pub fn root_matrix(&self) -> Matrix4<f32> {
        let lift = Vector3::new(0.0, self.bob_offset, 0.0);
        Matrix4::from_translation(self.position + lift)
            * Matrix4::from_angle_z(Rad(self.rotation.z))
            * Matrix4::from_angle_y(Rad(self.rotation.y))
            * Matrix4::from_angle_x(Rad(self.rotation.x))
            * Matrix4::from_scale(self.scale)
    }

    /// World matrix of one node, walking its parent chain.
    fn node_global(&self, index: usize) -> Matrix4<f32> {
        let mut matrix = pose_matrix(&self.poses[index]);
        let mut current = self.topology[index].parent;
        while let Some(parent) = current {
            matrix = pose_matrix(&self.poses[parent]) * matrix;
            current = self.topology[parent].parent;
        }
        matrix
    }

    /// Uploads vertex/index buffers and creates one uniform + bind group
    /// per drawable node/mesh pair.
    pub fn init_gpu_resources(&mut self, device: &Device, transform_layout: &wgpu::BindGroupLayout) {
        for mesh in self.meshes.iter_mut() {
            mesh.init_gpu_resources(device);
        }

        let mut draw_items = Vec::new();
        for (node, topo) in self.topology.iter().enumerate() {
            for mesh in topo.meshes.clone() {
                let uniform = DrawUniform {
                    model: Matrix4::from_scale(1.0f32).into(),
                    color: self.meshes[mesh].base_color,
                };

                let uniform_buffer = wgpu::util::DeviceExt::create_buffer_init(
                    device,
                    &wgpu::util::BufferInitDescriptor {
                        label: Some("Draw Uniform Buffer"),
                        contents: bytemuck::bytes_of(&uniform),
                        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                    },
                );

                let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("Draw Bind Group"),
                    layout: transform_layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: uniform_buffer.as_entire_binding(),
                    }],
                });

                draw_items.push(DrawItem {
                    node,
                    mesh,
                    uniform_buffer,
                    bind_group,
                });
            }
        }
        self.draw_items = draw_items;
    }

    /// Writes the current world matrices and colors to the GPU.
    pub fn update_transforms(&self, queue: &wgpu::Queue) {
        let root = self.root_matrix();
        for item in &self.draw_items {
            let uniform = DrawUniform {
                model: (root * self.node_global(item.node)).into(),
                color: self.meshes[item.mesh].base_color,
            };
            queue.write_buffer(&item.uniform_buffer, 0, bytemuck::bytes_of(&uniform));
        }
    }
}

fn pose_matrix(pose: &NodePose) -> Matrix4<f32> {
    Matrix4::from_translation(pose.translation)
        * Matrix4::from(pose.rotation)
        * Matrix4::from_nonuniform_scale(pose.scale.x, pose.scale.y, pose.scale.z)
}

pub trait DrawModel<'a> {
    fn draw_model(&mut self, model: &'a Model);
}

impl<'a, 'b> DrawModel<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    fn draw_model(&mut self, model: &'b Model) {
        for item in &model.draw_items {
            let mesh = &model.meshes[item.mesh];
            let (Some(vertex_buffer), Some(index_buffer)) =
                (&mesh.vertex_buffer, &mesh.index_buffer)
            else {
                continue;
            };

            self.set_bind_group(1, &item.bind_group, &[]);
            self.set_vertex_buffer(0, vertex_buffer.slice(..));
            self.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            self.draw_indexed(0..mesh.index_count, 0, 0..1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anim::{Channel, ChannelTarget, Clip, Interpolation};
    use crate::asset::{MeshData, NodeData};
    use cgmath::vec3;

    fn triangle_data(clips: Vec<Clip>) -> ModelData {
        ModelData {
            meshes: vec![MeshData {
                positions: vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
                normals: vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0],
                indices: vec![0, 1, 2],
                base_color: [1.0, 1.0, 1.0, 1.0],
            }],
            nodes: vec![NodeData {
                parent: None,
                translation: [0.0; 3],
                rotation: [0.0, 0.0, 0.0, 1.0],
                scale: [1.0; 3],
                meshes: 0..1,
            }],
            clips,
        }
    }

    fn spin_clip() -> Clip {
        Clip {
            name: "spin".to_string(),
            duration: 1.0,
            channels: vec![Channel {
                node: 0,
                target: ChannelTarget::Translation,
                interpolation: Interpolation::Linear,
                times: vec![0.0, 1.0],
                values: vec![[0.0; 4], [1.0, 0.0, 0.0, 0.0]],
            }],
        }
    }

    #[test]
    fn zero_clip_asset_gets_no_mixer() {
        let model = Model::from_data("prop", triangle_data(vec![]), 1.0, vec3(0.0, 0.0, 0.0));
        assert!(!model.has_mixer());
    }

    #[test]
    fn first_clip_gets_a_mixer() {
        let model = Model::from_data(
            "actor",
            triangle_data(vec![spin_clip()]),
            1.0,
            vec3(0.0, 0.0, 0.0),
        );
        assert!(model.has_mixer());
    }

    #[test]
    fn retarget_converges_to_literal_target() {
        let mut model = Model::from_data("m", triangle_data(vec![]), 1.0, vec3(9.0, 9.0, 9.0));
        let position = vec3(0.0, -2.0, 0.0);
        let rotation = vec3(0.0, 1.5, 0.0);

        model.retarget(position, rotation, 2.5);
        for _ in 0..120 {
            model.advance(1.0 / 30.0);
        }

        assert_eq!(model.position, position);
        assert_eq!(model.rotation, rotation);
    }

    #[test]
    fn retarget_same_target_does_not_restart() {
        let mut model = Model::from_data("m", triangle_data(vec![]), 1.0, vec3(0.0, 0.0, 0.0));
        let target = vec3(4.0, -2.0, -8.0);

        model.retarget(target, vec3(0.5, -0.5, 0.0), 2.5);
        model.advance(1.0);
        let midway = model.position;

        // Same target again: motion continues, it does not snap back
        model.retarget(target, vec3(0.5, -0.5, 0.0), 2.5);
        assert_eq!(model.position, midway);
        model.advance(0.1);
        assert!(model.position.x >= midway.x);
    }

    #[test]
    fn transition_silences_spin() {
        let mut model = Model::from_data("m", triangle_data(vec![]), 1.0, vec3(0.0, 0.0, 0.0));
        model.enable_idle_motion();

        model.advance(0.5);
        assert!(model.rotation.y != 0.0, "idle spin should move rotation");

        model.retarget(vec3(0.0, -2.0, 0.0), vec3(0.0, 1.5, 0.0), 2.5);
        for _ in 0..120 {
            model.advance(0.05);
        }
        // Spin no longer perturbs the settled rotation
        assert_eq!(model.rotation, vec3(0.0, 1.5, 0.0));
    }

    #[test]
    fn bob_is_additive_to_position() {
        let mut model = Model::from_data("m", triangle_data(vec![]), 1.0, vec3(0.0, -1.0, 0.0));
        model.enable_idle_motion();
        model.advance(0.6);

        // Position target is untouched; the lift only shows in the matrix
        assert_eq!(model.position, vec3(0.0, -1.0, 0.0));
        let world_y = model.root_matrix().w.y;
        assert!(world_y > -1.0);
    }

    #[test]
    fn tumble_rotation_is_unbounded() {
        let mut model = Model::from_data("m", triangle_data(vec![]), 1.0, vec3(0.0, 0.0, 0.0));
        for _ in 0..100 {
            model.add_rotation(1.0);
        }
        assert_eq!(model.rotation, vec3(100.0, 100.0, 100.0));
    }
}
