//! # Frame Planning
//!
//! Everything a frame draws, computed from the scene without touching the
//! GPU: light and camera matrices, one [`ObjectDraw`] per drawable object and
//! the bounding box overlay. The render engine only uploads and executes a
//! plan, so both passes always agree on every transform.

use cgmath::{
    Deg, EuclideanSpace, InnerSpace, Matrix, Matrix4, Point3, Rad, SquareMatrix, Vector3,
};

use crate::config::ShadowSettings;
use crate::gfx::camera::camera_utils::{CameraUniform, OPENGL_TO_WGPU_MATRIX};
use crate::gfx::resources::material::{MaterialId, MaterialUniform};
use crate::gfx::scene::model::Model;
use crate::gfx::scene::object::{WorldObject, CAMERA_TYPE};
use crate::gfx::scene::scene::{Scene, CAMERA_ID, DEFAULT_DIFFUSE_ID, DEFAULT_NORMAL_ID};
use crate::gfx::scene::vertex::LineVertex;

/// Added to the color of the selected object
pub const HIGHLIGHT_COLOR: [f32; 3] = [50.0 / 255.0, 0.0, 0.0];
const NO_HIGHLIGHT: [f32; 3] = [0.0; 3];

pub const COLLIDING_COLOR: [f32; 3] = [1.0, 0.0, 0.0];
pub const RESTING_COLOR: [f32; 3] = [0.0, 0.0, 1.0];

/// View and projection of the shadow-casting light
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSpace {
    pub view: Matrix4<f32>,
    pub projection: Matrix4<f32>,
}

impl LightSpace {
    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection * self.view
    }
}

/// The light is a point at `light_position` aimed at the world origin
pub fn light_space(light_position: Vector3<f32>, settings: &ShadowSettings) -> LightSpace {
    let projection = OPENGL_TO_WGPU_MATRIX
        * cgmath::perspective(Deg(settings.fov_deg), 1.0, settings.near, settings.far);
    let view = Matrix4::look_at_rh(
        Point3::from_vec(light_position),
        Point3::origin(),
        Vector3::unit_y(),
    );
    LightSpace { view, projection }
}

/// Object transform shared by the shadow and lit passes.
///
/// Translate, rotate about x then y then z (degrees), scale, then the
/// model's animation: an oscillation inside a 6x6 square on the xz plane and
/// a spin of `time * rot_speed_factor` radians about `rot_axis`.
pub fn model_matrix(object: &WorldObject, model: &Model, time: f32) -> Matrix4<f32> {
    let mut matrix = Matrix4::from_translation(object.position)
        * Matrix4::from_angle_x(Deg(object.rotation.x))
        * Matrix4::from_angle_y(Deg(object.rotation.y))
        * Matrix4::from_angle_z(Deg(object.rotation.z))
        * Matrix4::from_nonuniform_scale(object.scale.x, object.scale.y, object.scale.z);

    let animation = &model.animation;
    if animation.animate_trans {
        let sin_anim = time.sin() / 2.0 + 0.5;
        let cos_anim = time.cos() / 2.0 + 0.5;
        matrix = matrix
            * Matrix4::from_translation(Vector3::new(
                6.0 * sin_anim - 3.0,
                0.0,
                6.0 * cos_anim - 3.0,
            ));
    }
    if animation.animate_rot && animation.rot_axis.magnitude2() > 0.0 {
        matrix = matrix
            * Matrix4::from_axis_angle(
                animation.rot_axis.normalize(),
                Rad(time * animation.rot_speed_factor),
            );
    }
    matrix
}

/// Inverse transpose of the model matrix; identity when it has no inverse
pub fn normal_matrix(model: &Matrix4<f32>) -> Matrix4<f32> {
    model
        .invert()
        .map(|inverse| inverse.transpose())
        .unwrap_or_else(Matrix4::identity)
}

/// One drawable object with every reference already resolved
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectDraw {
    pub object_id: String,
    pub mesh_id: String,
    pub material_id: MaterialId,
    pub material: MaterialUniform,
    pub diffuse_texture: String,
    pub normal_texture: String,
    pub model_matrix: Matrix4<f32>,
    pub normal_matrix: Matrix4<f32>,
    /// Drawn in the lit pass
    pub render: bool,
    /// Drawn in the shadow pass
    pub cast_shadow: bool,
    pub receive_shadow: bool,
    pub receive_lighting: bool,
    pub highlight: [f32; 3],
}

/// World-space bounding box lines of one object
#[derive(Debug, Clone, PartialEq)]
pub struct Wireframe {
    pub object_id: String,
    pub vertices: [LineVertex; 24],
}

#[derive(Debug, Clone, PartialEq)]
pub struct FramePlan {
    pub light: LightSpace,
    /// Light position, read by the shader as the direction toward the light
    pub light_direction: Vector3<f32>,
    pub shadow_bias: f32,
    pub camera_view: Matrix4<f32>,
    pub camera_projection: Matrix4<f32>,
    pub camera_position: Vector3<f32>,
    /// Sorted by object id
    pub objects: Vec<ObjectDraw>,
    pub wireframes: Vec<Wireframe>,
}

impl FramePlan {
    pub fn build(scene: &Scene, shadow: &ShadowSettings, time: f32) -> Self {
        let fallback_eye;
        let eye = match scene.camera_entity() {
            Some(eye) => eye,
            None => {
                fallback_eye = WorldObject::new(CAMERA_ID, CAMERA_TYPE);
                &fallback_eye
            }
        };

        let objects = scene
            .world_objects
            .values()
            .filter_map(|object| plan_object(scene, object, time))
            .collect();

        let wireframes = scene
            .world_objects
            .values()
            .filter_map(plan_wireframe)
            .collect();

        Self {
            light: light_space(scene.light, shadow),
            light_direction: scene.light,
            shadow_bias: shadow.bias,
            camera_view: scene.camera.view_matrix(eye),
            camera_projection: scene.camera.projection_matrix(),
            camera_position: eye.position,
            objects,
            wireframes,
        }
    }

    /// Objects drawn into the shadow map
    pub fn shadow_casters(&self) -> impl Iterator<Item = &ObjectDraw> {
        self.objects.iter().filter(|draw| draw.cast_shadow)
    }

    /// Objects drawn in the lit pass
    pub fn visible(&self) -> impl Iterator<Item = &ObjectDraw> {
        self.objects.iter().filter(|draw| draw.render)
    }

    pub fn camera_uniform(&self) -> CameraUniform {
        CameraUniform::new(self.camera_position, self.camera_projection * self.camera_view)
    }
}

fn plan_object(scene: &Scene, object: &WorldObject, time: f32) -> Option<ObjectDraw> {
    let model = scene.model_for(object)?;
    let settings = model.render_settings;
    if !settings.render && !settings.cast_shadow {
        return None;
    }

    let mesh = scene.mesh_for(model);
    let material = scene.material_for(model);

    let texture_or = |enabled: bool, id: Option<&String>, default: &str| -> String {
        id.filter(|id| enabled && scene.texture(id).is_some())
            .cloned()
            .unwrap_or_else(|| default.to_string())
    };

    let model_matrix = model_matrix(object, model, time);
    Some(ObjectDraw {
        object_id: object.id.clone(),
        mesh_id: mesh.id.clone(),
        material_id: material.id.clone(),
        material: material.uniform(),
        diffuse_texture: texture_or(
            material.use_diffuse,
            material.diffuse_texture.as_ref(),
            DEFAULT_DIFFUSE_ID,
        ),
        normal_texture: texture_or(
            material.use_normal,
            material.normal_texture.as_ref(),
            DEFAULT_NORMAL_ID,
        ),
        normal_matrix: normal_matrix(&model_matrix),
        model_matrix,
        render: settings.render,
        cast_shadow: settings.cast_shadow,
        receive_shadow: settings.receive_shadow,
        receive_lighting: settings.receive_lighting,
        highlight: if object.selected {
            HIGHLIGHT_COLOR
        } else {
            NO_HIGHLIGHT
        },
    })
}

fn plan_wireframe(object: &WorldObject) -> Option<Wireframe> {
    let aabb = object.aabb.filter(|aabb| aabb.render)?;
    let color = if object.is_colliding {
        COLLIDING_COLOR
    } else {
        RESTING_COLOR
    };

    let offset = object.position;
    let vertices = aabb.wireframe().map(|[x, y, z]| LineVertex {
        position: [x + offset.x, y + offset.y, z + offset.z],
        color,
    });
    Some(Wireframe {
        object_id: object.id.clone(),
        vertices,
    })
}
