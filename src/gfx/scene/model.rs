//! Models bind a mesh and a material to render flags and a simple animation.

use cgmath::Vector3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSettings {
    /// Drawn in the lit pass
    pub render: bool,
    /// Drawn in the shadow pass
    pub cast_shadow: bool,
    pub receive_shadow: bool,
    pub receive_lighting: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            render: true,
            cast_shadow: true,
            receive_shadow: true,
            receive_lighting: true,
        }
    }
}

/// Time-driven transform applied on top of the object's own
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Animation {
    /// Spin around `rot_axis` at `rot_speed_factor` radians per second
    pub animate_rot: bool,
    pub rot_axis: Vector3<f32>,
    pub rot_speed_factor: f32,
    /// Oscillate within a 6x6 square in the xz plane
    pub animate_trans: bool,
}

impl Default for Animation {
    fn default() -> Self {
        Self {
            animate_rot: false,
            rot_axis: Vector3::new(0.0, 1.0, 0.0),
            rot_speed_factor: 1.0,
            animate_trans: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub id: String,
    /// Mesh id; `None` draws the scene's default mesh
    pub mesh: Option<String>,
    /// Material id; `None` draws with the scene's default material
    pub material: Option<String>,
    pub render_settings: RenderSettings,
    pub animation: Animation,
}

impl Model {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            mesh: None,
            material: None,
            render_settings: RenderSettings::default(),
            animation: Animation::default(),
        }
    }

    pub fn with_mesh(mut self, mesh: impl Into<String>) -> Self {
        self.mesh = Some(mesh.into());
        self
    }

    pub fn with_material(mut self, material: impl Into<String>) -> Self {
        self.material = Some(material.into());
        self
    }
}
