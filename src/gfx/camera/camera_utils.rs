use cgmath::{Deg, EuclideanSpace, Matrix4, Point3, SquareMatrix};

use crate::config::CameraConfig;
use crate::gfx::scene::object::WorldObject;

/// Remaps OpenGL clip depth [-1, 1] to the [0, 1] range wgpu expects.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Perspective lens. The eye itself is a world object; see [`Camera::view_matrix`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub fov_deg: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            fov_deg: 45.0,
            aspect: 1200.0 / 800.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl Camera {
    pub fn from_config(config: &CameraConfig, aspect: f32) -> Self {
        Self {
            fov_deg: config.fov_deg,
            aspect,
            near: config.near,
            far: config.far,
        }
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        let perspective = cgmath::perspective(Deg(self.fov_deg), self.aspect, self.near, self.far);
        OPENGL_TO_WGPU_MATRIX * perspective
    }

    /// Look along the entity's front vector from its position
    pub fn view_matrix(&self, eye: &WorldObject) -> Matrix4<f32> {
        let position = Point3::from_vec(eye.position);
        Matrix4::look_at_rh(position, position + eye.front, eye.up)
    }

    pub fn view_projection(&self, eye: &WorldObject) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix(eye)
    }

    /// Track the surface aspect ratio; zero-sized surfaces are ignored
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug)]
pub struct CameraUniform {
    /// The eye position of the camera in homogenous coordinates.
    ///
    /// Homogenous coordinates are used to fullfill the 16 byte alignment requirement.
    pub view_position: [f32; 4],

    /// Contains the view projection matrix.
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

impl CameraUniform {
    pub fn new(position: cgmath::Vector3<f32>, view_proj: Matrix4<f32>) -> Self {
        Self {
            view_position: [position.x, position.y, position.z, 1.0],
            view_proj: convert_matrix4_to_array(view_proj),
        }
    }
}

pub fn convert_matrix4_to_array(matrix4: Matrix4<f32>) -> [[f32; 4]; 4] {
    matrix4.into()
}
