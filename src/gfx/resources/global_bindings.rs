//! Global uniform bindings for camera and lighting data
//!
//! Manages the GPU uniform buffer and bind group for per-frame global
//! rendering state shared by every object: the camera matrices and the
//! fixed two-light rig.

use cgmath::InnerSpace;

use crate::{
    gfx::{camera::CameraUniform, lighting::Lighting},
    wgpu_utils::{binding_types, uniform_buffer::UniformBuffer},
};

/// Global uniform buffer content structure
///
/// MUST match the `Globals` struct in `lit.wgsl` exactly, including the
/// 16-byte alignment of every vec3 field.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUBOContent {
    // Camera data
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],

    // Light rig
    ambient_color: [f32; 3],
    ambient_intensity: f32,
    sun_direction: [f32; 3], // Unit vector from the light toward the origin
    sun_intensity: f32,
    sun_color: [f32; 3],
    _padding: f32,
}
// Total: 16 + 64 + 16 + 16 + 16 = 128 bytes

/// Type alias for the global uniform buffer
pub type GlobalUBO = UniformBuffer<GlobalUBOContent>;

/// Updates the global uniform buffer with camera and light data.
///
/// Called once per frame before rendering.
pub fn update_global_ubo(
    ubo: &mut GlobalUBO,
    queue: &wgpu::Queue,
    camera: CameraUniform,
    lighting: &Lighting,
) {
    let sun = cgmath::Vector3::from(lighting.directional.position);
    let sun_direction = if sun.magnitude2() > 0.0 {
        (-sun).normalize()
    } else {
        -cgmath::Vector3::unit_y()
    };

    let content = GlobalUBOContent {
        view_position: camera.view_position,
        view_proj: camera.view_proj,
        ambient_color: lighting.ambient.color,
        ambient_intensity: lighting.ambient.intensity,
        sun_direction: sun_direction.into(),
        sun_intensity: lighting.directional.intensity,
        sun_color: lighting.directional.color,
        _padding: 0.0,
    };

    ubo.update_content(queue, content);
}

/// Manages the bind group layout and bind group for global uniforms.
///
/// Bound to slot 0 in the render pipeline.
pub struct GlobalBindings {
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: Option<wgpu::BindGroup>,
}

impl GlobalBindings {
    /// Creates the layout; the bind group itself is created once the
    /// uniform buffer exists, via `create_bind_group`.
    pub fn new(device: &wgpu::Device) -> Self {
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Globals Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: binding_types::uniform(),
                count: None,
            }],
        });

        GlobalBindings {
            bind_group_layout,
            bind_group: None,
        }
    }

    pub fn create_bind_group(&mut self, device: &wgpu::Device, ubo: &GlobalUBO) {
        self.bind_group = Some(device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Globals Bind Group"),
            layout: &self.bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.binding_resource(),
            }],
        }));
    }

    /// Returns the bind group layout for pipeline creation.
    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    /// Returns the bind group for rendering.
    ///
    /// # Panics
    /// Panics if `create_bind_group()` hasn't been called yet
    pub fn bind_group(&self) -> &wgpu::BindGroup {
        self.bind_group
            .as_ref()
            .expect("Bind group has not been created yet!")
    }
}
