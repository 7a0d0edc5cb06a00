//! Fixed showcase camera.
//!
//! The stage uses a stationary perspective camera looking down -Z from a
//! short distance, matching a landing-page viewport. Only the aspect ratio
//! ever changes, driven by window resizes.

use cgmath::{perspective, Deg, Matrix4, Point3, Rad, SquareMatrix, Vector3};

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

/// Stationary perspective camera for the showcase stage.
#[derive(Debug, Clone, Copy)]
pub struct StageCamera {
    pub eye: Vector3<f32>,
    pub target: Vector3<f32>,
    pub up: Vector3<f32>,
    pub aspect: f32,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
    pub uniform: CameraUniform,
}

impl StageCamera {
    /// Default eye distance along +Z.
    pub const DEFAULT_DISTANCE: f32 = 10.0;

    /// Creates the stage camera with the showcase defaults: 75 degree
    /// vertical field of view, near 0.1, far 1000, eye at `(0, 0, 10)`.
    pub fn new(aspect: f32) -> Self {
        Self {
            eye: Vector3::new(0.0, 0.0, Self::DEFAULT_DISTANCE),
            target: Vector3::new(0.0, 0.0, 0.0),
            up: Vector3::unit_y(),
            aspect,
            fovy: Deg(75.0).into(),
            znear: 0.1,
            zfar: 1000.0,
            uniform: CameraUniform::default(),
        }
    }

    pub fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        let eye = Point3::new(self.eye.x, self.eye.y, self.eye.z);
        let target = Point3::new(self.target.x, self.target.y, self.target.z);
        let view = Matrix4::look_at_rh(eye, target, self.up);
        let proj =
            OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar);
        proj * view
    }

    /// Recomputes the aspect ratio from new viewport dimensions.
    ///
    /// The projection itself is rebuilt on the next `update_view_proj`.
    pub fn resize_projection(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.aspect = width as f32 / height as f32;
    }

    /// Refreshes the GPU-facing uniform from the current camera state.
    pub fn update_view_proj(&mut self) {
        self.uniform.view_position = [self.eye.x, self.eye.y, self.eye.z, 1.0];
        self.uniform.view_proj = convert_matrix4_to_array(self.build_view_projection_matrix());
    }
}

/// Camera data uploaded to the global uniform buffer.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug)]
pub struct CameraUniform {
    /// The eye position of the camera in homogenous coordinates.
    pub view_position: [f32; 4],
    /// The view projection matrix.
    pub view_proj: [[f32; 4]; 4],
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self {
            view_position: [0.0; 4],
            view_proj: convert_matrix4_to_array(Matrix4::identity()),
        }
    }
}

pub fn convert_matrix4_to_array(matrix4: Matrix4<f32>) -> [[f32; 4]; 4] {
    let mut result = [[0.0; 4]; 4];

    for i in 0..4 {
        for j in 0..4 {
            result[i][j] = matrix4[i][j];
        }
    }

    result
}
