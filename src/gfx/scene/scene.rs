use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};

use cgmath::Vector3;
use log::{debug, warn};
use rand::Rng;

use crate::config::CameraConfig;
use crate::gfx::camera::camera_utils::Camera;
use crate::gfx::geometry::create_box_mesh;
use crate::gfx::resources::material::Material;
use crate::gfx::resources::texture_resource::{Texture, TextureKind};
use crate::gfx::scene::description::{
    AssetsDescription, Field, NONE_SENTINEL, MaterialDescription, MeshDescription, ModelDescription,
    SceneDescription, TextureDescription, WorldObjectDescription,
};
use crate::gfx::scene::mesh::Mesh;
use crate::gfx::scene::model::Model;
use crate::gfx::scene::object::{Aabb, ModelRef, WorldObject, CAMERA_TYPE};
use crate::spatial::Bounds;

pub const DEFAULT_MESH_ID: &str = "defaultMesh";
pub const DEFAULT_MATERIAL_ID: &str = "defaultMaterial";
pub const DEFAULT_MODEL_ID: &str = "defaultModel";
pub const DEFAULT_DIFFUSE_ID: &str = "defaultDiffuse";
pub const DEFAULT_NORMAL_ID: &str = "defaultNormal";
/// Id of the synthetic world object the camera observes
pub const CAMERA_ID: &str = "camera";

const RANDOM_ID_RANGE: u32 = 100_000;

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// Outcome of looking up a reference in an asset pool
#[derive(Debug, PartialEq)]
pub enum Resolved<'a, T> {
    Found(&'a T),
    /// A key was given but nothing in the pool carries it
    Missing { key: String },
    /// No key was given
    Unspecified,
    /// The key was the `"none"` sentinel: deliberately no resource
    ExplicitNone,
}

impl<'a, T> Resolved<'a, T> {
    pub fn is_missing(&self) -> bool {
        matches!(self, Resolved::Missing { .. })
    }

    /// The found resource, or `default` for every other outcome
    pub fn or_default(self, default: &'a T) -> &'a T {
        match self {
            Resolved::Found(resource) => resource,
            _ => default,
        }
    }

    /// The found resource, the default for a missing or unspecified key, and
    /// nothing for an explicit `"none"`
    pub fn resolve(self, default: &'a T) -> Option<&'a T> {
        match self {
            Resolved::ExplicitNone => None,
            other => Some(other.or_default(default)),
        }
    }
}

/// Look up `key` in `pool` without falling back
pub fn lookup<'a, T>(pool: &'a HashMap<String, T>, key: Option<&str>) -> Resolved<'a, T> {
    match key {
        None => Resolved::Unspecified,
        Some(NONE_SENTINEL) => Resolved::ExplicitNone,
        Some(key) => match pool.get(key) {
            Some(resource) => Resolved::Found(resource),
            None => Resolved::Missing {
                key: key.to_string(),
            },
        },
    }
}

/// Look up a reference held by a composite record.
///
/// A requested key that is not in the pool is logged with `context`, the
/// record holding the reference. Callers pick the fallback through
/// [`Resolved::or_default`] or [`Resolved::resolve`].
pub fn resolve_reference<'a, T>(
    pool: &'a HashMap<String, T>,
    key: Option<&str>,
    context: &str,
) -> Resolved<'a, T> {
    let resolved = lookup(pool, key);
    if let Resolved::Missing { key } = &resolved {
        warn!("Missing reference '{key}' ({context}), using default");
    }
    resolved
}

/// The id a composite stores for a reference: the key when the pool holds
/// it, otherwise nothing and the default is bound at draw time
fn reference_id<T>(pool: &HashMap<String, T>, key: Option<&str>, context: &str) -> Option<String> {
    match resolve_reference(pool, key, context) {
        Resolved::Found(_) => key.map(str::to_string),
        _ => None,
    }
}

/// Built-in assets every scene can fall back to
#[derive(Debug, Clone)]
pub struct SceneDefaults {
    pub mesh: Mesh,
    pub material: Material,
    pub model: Model,
    pub diffuse: Texture,
    pub normal: Texture,
}

impl Default for SceneDefaults {
    fn default() -> Self {
        let mut material = Material::new(DEFAULT_MATERIAL_ID);
        material.diffuse_texture = Some(DEFAULT_DIFFUSE_ID.to_string());
        material.normal_texture = Some(DEFAULT_NORMAL_ID.to_string());

        Self {
            mesh: create_box_mesh(3.0, 3.0, 3.0).into_mesh(DEFAULT_MESH_ID, "none"),
            material,
            model: Model::new(DEFAULT_MODEL_ID),
            diffuse: Texture::solid(DEFAULT_DIFFUSE_ID, TextureKind::Diffuse, [127, 127, 127, 255]),
            normal: Texture::solid(DEFAULT_NORMAL_ID, TextureKind::Normal, [127, 127, 255, 255]),
        }
    }
}

/// Main scene: world objects, asset pools, camera and light
pub struct Scene {
    pub world_objects: BTreeMap<String, WorldObject>,
    pub meshes: HashMap<String, Mesh>,
    pub textures: HashMap<String, Texture>,
    pub materials: HashMap<String, Material>,
    pub models: HashMap<String, Model>,
    pub camera: Camera,
    /// Position of the shadow-casting light, aimed at the origin
    pub light: Vector3<f32>,
    pub defaults: SceneDefaults,
    generation: u64,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// An empty scene holding only the default assets
    pub fn new() -> Self {
        Self {
            world_objects: BTreeMap::new(),
            meshes: HashMap::new(),
            textures: HashMap::new(),
            materials: HashMap::new(),
            models: HashMap::new(),
            camera: Camera::default(),
            light: Vector3::new(20.0, 14.0, 10.0),
            defaults: SceneDefaults::default(),
            generation: NEXT_GENERATION.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// Distinguishes scene instances so GPU caches can tell a reload apart
    pub fn generation(&self) -> u64 {
        self.generation
    }

    // ----- asset pools -----

    pub fn add_mesh(&mut self, mesh: Mesh) {
        self.meshes.insert(mesh.id.clone(), mesh);
    }

    pub fn add_texture(&mut self, texture: Texture) {
        self.textures.insert(texture.id.clone(), texture);
    }

    pub fn add_material(&mut self, material: Material) {
        self.materials.insert(material.id.clone(), material);
    }

    pub fn add_model(&mut self, model: Model) {
        self.models.insert(model.id.clone(), model);
    }

    /// Mesh by id, including the default mesh
    pub fn mesh(&self, id: &str) -> Option<&Mesh> {
        self.meshes
            .get(id)
            .or_else(|| (id == DEFAULT_MESH_ID).then_some(&self.defaults.mesh))
    }

    /// Texture by id, including the two default textures
    pub fn texture(&self, id: &str) -> Option<&Texture> {
        self.textures.get(id).or_else(|| match id {
            DEFAULT_DIFFUSE_ID => Some(&self.defaults.diffuse),
            DEFAULT_NORMAL_ID => Some(&self.defaults.normal),
            _ => None,
        })
    }

    /// The model an object draws with, `None` if it has none
    pub fn model_for(&self, object: &WorldObject) -> Option<&Model> {
        match object.model.as_ref()? {
            ModelRef::Default => Some(&self.defaults.model),
            ModelRef::Asset(id) => {
                Some(lookup(&self.models, Some(id.as_str())).or_default(&self.defaults.model))
            }
        }
    }

    pub fn mesh_for(&self, model: &Model) -> &Mesh {
        lookup(&self.meshes, model.mesh.as_deref()).or_default(&self.defaults.mesh)
    }

    pub fn material_for(&self, model: &Model) -> &Material {
        lookup(&self.materials, model.material.as_deref()).or_default(&self.defaults.material)
    }

    // ----- composite construction -----

    /// Build a material from its record, resolving texture ids against the pool.
    ///
    /// A texture id the pool does not hold is logged and left empty; the
    /// default texture is bound in its place.
    pub fn instantiate_material(&self, record: &MaterialDescription) -> Material {
        let mut material = Material::new(record.id.clone());
        material.diffuse_texture =
            self.existing_texture(&record.id, record.diffuse_texture.as_deref());
        material.normal_texture =
            self.existing_texture(&record.id, record.normal_texture.as_deref());

        if let Some(scale) = record.scale {
            material.scale = scale;
        }
        if let Some(exponent) = record.specular_exponent {
            material.specular_exponent = exponent;
        }
        if let Some(strength) = record.specular_strength {
            material.specular_strength = strength;
        }
        if let Some(strength) = record.diffuse_strength {
            material.diffuse_strength = strength;
        }
        if let Some(use_diffuse) = record.use_diffuse {
            material.use_diffuse = use_diffuse;
        }
        if let Some(use_normal) = record.use_normal {
            material.use_normal = use_normal;
        }
        material
    }

    fn existing_texture(&self, material_id: &str, key: Option<&str>) -> Option<String> {
        reference_id(&self.textures, key, &format!("texture of material '{material_id}'"))
    }

    /// Build a model from its record.
    ///
    /// A missing or unspecified mesh draws the default box; a missing
    /// material is logged and replaced by the default at draw time.
    pub fn instantiate_model(&self, record: &ModelDescription) -> Model {
        let mut model = Model::new(record.id.clone());

        model.mesh = reference_id(
            &self.meshes,
            record.mesh.as_deref(),
            &format!("mesh of model '{}'", record.id),
        );
        model.material = reference_id(
            &self.materials,
            record.material.as_deref(),
            &format!("material of model '{}'", record.id),
        );

        let settings = &mut model.render_settings;
        if let Some(render) = record.render {
            settings.render = render;
        }
        if let Some(cast) = record.cast_shadow {
            settings.cast_shadow = cast;
        }
        if let Some(receive) = record.receive_shadow {
            settings.receive_shadow = receive;
        }
        if let Some(receive) = record.receive_lighting {
            settings.receive_lighting = receive;
        }

        let animation = &mut model.animation;
        if let Some(animate) = record.animate_rot {
            animation.animate_rot = animate;
        }
        if let Some(axis) = record.rot_axis {
            animation.rot_axis = axis.into();
        }
        if let Some(factor) = record.rot_speed_factor {
            animation.rot_speed_factor = factor;
        }
        if let Some(animate) = record.animate_trans {
            animation.animate_trans = animate;
        }
        model
    }

    /// Build a world object, applying only the fields the record states.
    ///
    /// Model: absent draws the default model, `"none"` draws nothing and an
    /// unknown id is logged and drawn with the default model. Bounding box:
    /// explicit bounds win, `"none"` removes it, and otherwise it is derived
    /// from the model's mesh.
    pub fn instantiate_world_object(&self, record: &WorldObjectDescription) -> WorldObject {
        let mut object = WorldObject::new(record.id.clone(), record.kind.clone());

        object.model = match &record.model {
            Field::Absent => Some(ModelRef::Default),
            Field::None => None,
            Field::Value(id) => {
                let context = format!("model of world object '{}'", record.id);
                match reference_id(&self.models, Some(id.as_str()), &context) {
                    Some(id) => Some(ModelRef::Asset(id)),
                    None => Some(ModelRef::Default),
                }
            }
        };

        object.aabb = match &record.aabb {
            Field::Value(bounds) => Some(Aabb::new(*bounds)),
            Field::None => None,
            Field::Absent => self.derived_aabb(&object),
        };

        if let Some(position) = record.position {
            object.position = position.into();
        }
        if let Some(rotation) = record.rotation {
            object.rotation = rotation.into();
            object.pending_rotation = object.rotation;
        }
        if let Some(scale) = record.scale {
            object.scale = scale.into();
        }
        if let Some(immovable) = record.is_immovable {
            object.is_immovable = immovable;
        }
        if let Some(collision) = record.has_collision {
            object.has_collision = collision;
        }
        if let Some(gravity) = record.has_gravity {
            object.has_gravity = gravity;
        }
        object
    }

    fn derived_aabb(&self, object: &WorldObject) -> Option<Aabb> {
        let model = self.model_for(object)?;
        let bounds = self.mesh_for(model).local_bounds();
        if bounds.is_valid() {
            Some(Aabb::new(bounds))
        } else {
            debug!("Mesh of '{}' has no vertices, leaving it without a box", object.id);
            None
        }
    }

    /// Insert the synthetic camera entity the view is rendered from
    pub fn spawn_camera(&mut self, config: &CameraConfig) {
        let mut camera = WorldObject::new(CAMERA_ID, CAMERA_TYPE);
        camera.position = config.position.into();
        camera.aabb = Some(Aabb::new(Bounds::from_array(config.aabb)));
        camera.flying = config.flying;
        self.world_objects.insert(CAMERA_ID.to_string(), camera);
        self.camera = Camera::from_config(config, self.camera.aspect);
    }

    pub fn camera_entity(&self) -> Option<&WorldObject> {
        self.world_objects.get(CAMERA_ID)
    }

    // ----- editor operations -----

    fn random_id(taken: impl Fn(&str) -> bool) -> String {
        let mut rng = rand::rng();
        loop {
            let id = rng.random_range(0..RANDOM_ID_RANGE).to_string();
            if !taken(&id) {
                return id;
            }
        }
    }

    /// Add a default-model object under a fresh random numeric id
    pub fn add_new_world_object(&mut self) -> String {
        let id = Self::random_id(|id| self.world_objects.contains_key(id));

        let record = WorldObjectDescription::new(id.clone(), "object");
        let object = self.instantiate_world_object(&record);
        self.world_objects.insert(id.clone(), object);
        id
    }

    /// Add a model with default settings under a fresh random numeric id
    pub fn add_new_model(&mut self) -> String {
        let id = Self::random_id(|id| self.models.contains_key(id));
        self.add_model(Model::new(id.clone()));
        id
    }

    /// Add a material with default settings under a fresh random numeric id
    pub fn add_new_material(&mut self) -> String {
        let id = Self::random_id(|id| self.materials.contains_key(id));
        self.add_material(Material::new(id.clone()));
        id
    }

    /// Replace an object's bounds, keeping its overlay toggle
    pub fn set_aabb_bounds(&mut self, object_id: &str, bounds: Bounds) -> bool {
        let Some(object) = self.world_objects.get_mut(object_id) else {
            return false;
        };
        let render = object.aabb.map(|aabb| aabb.render).unwrap_or(false);
        object.aabb = Some(Aabb { bounds, render });
        true
    }

    /// Point an object at another model; `None` stops drawing it
    pub fn set_model(&mut self, object_id: &str, model: Option<ModelRef>) -> bool {
        match self.world_objects.get_mut(object_id) {
            Some(object) => {
                object.model = model;
                true
            }
            None => false,
        }
    }

    /// Select one object, clearing every other selection
    pub fn select(&mut self, object_id: Option<&str>) {
        for (id, object) in self.world_objects.iter_mut() {
            object.selected = Some(id.as_str()) == object_id;
        }
    }

    pub fn selected(&self) -> Option<&WorldObject> {
        self.world_objects.values().find(|object| object.selected)
    }

    // ----- export -----

    /// The scene in its description format, pools sorted by id.
    ///
    /// The camera entity is excluded. An object without a model exports
    /// `"none"` and an object on the default model omits the field.
    pub fn to_description(&self) -> SceneDescription {
        let mut meshes: Vec<_> = self
            .meshes
            .values()
            .map(|mesh| MeshDescription {
                id: mesh.id.clone(),
                path: mesh.path.clone(),
            })
            .collect();
        meshes.sort_by(|a, b| a.id.cmp(&b.id));

        let mut textures: Vec<_> = self
            .textures
            .values()
            .map(|texture| TextureDescription {
                id: texture.id.clone(),
                path: texture.path.clone(),
                kind: texture.kind,
            })
            .collect();
        textures.sort_by(|a, b| a.id.cmp(&b.id));

        let mut materials: Vec<_> = self.materials.values().map(describe_material).collect();
        materials.sort_by(|a, b| a.id.cmp(&b.id));

        let mut models: Vec<_> = self.models.values().map(describe_model).collect();
        models.sort_by(|a, b| a.id.cmp(&b.id));

        let world_objects = self
            .world_objects
            .values()
            .filter(|object| !object.is_camera())
            .map(describe_world_object)
            .collect();

        SceneDescription {
            assets: AssetsDescription {
                meshes,
                textures,
                materials,
                models,
            },
            world_objects,
        }
    }

    /// Gets statistics about the scene
    pub fn get_statistics(&self) -> SceneStatistics {
        let drawn: Vec<&Mesh> = self
            .world_objects
            .values()
            .filter_map(|object| self.model_for(object))
            .map(|model| self.mesh_for(model))
            .collect();

        SceneStatistics {
            object_count: self.world_objects.len(),
            mesh_count: self.meshes.len(),
            texture_count: self.textures.len(),
            material_count: self.materials.len(),
            model_count: self.models.len(),
            total_triangles: drawn.iter().map(|mesh| mesh.triangle_count()).sum(),
            total_vertices: drawn.iter().map(|mesh| mesh.vertex_count()).sum(),
        }
    }
}

fn describe_material(material: &Material) -> MaterialDescription {
    MaterialDescription {
        id: material.id.clone(),
        diffuse_texture: material.diffuse_texture.clone(),
        normal_texture: material.normal_texture.clone(),
        scale: Some(material.scale),
        specular_exponent: Some(material.specular_exponent),
        specular_strength: Some(material.specular_strength),
        diffuse_strength: Some(material.diffuse_strength),
        use_diffuse: Some(material.use_diffuse),
        use_normal: Some(material.use_normal),
    }
}

fn describe_model(model: &Model) -> ModelDescription {
    let settings = &model.render_settings;
    let animation = &model.animation;
    ModelDescription {
        id: model.id.clone(),
        mesh: model.mesh.clone(),
        material: model.material.clone(),
        render: Some(settings.render),
        cast_shadow: Some(settings.cast_shadow),
        receive_shadow: Some(settings.receive_shadow),
        receive_lighting: Some(settings.receive_lighting),
        animate_rot: Some(animation.animate_rot),
        rot_axis: Some(animation.rot_axis.into()),
        rot_speed_factor: Some(animation.rot_speed_factor),
        animate_trans: Some(animation.animate_trans),
    }
}

fn describe_world_object(object: &WorldObject) -> WorldObjectDescription {
    WorldObjectDescription {
        id: object.id.clone(),
        kind: object.kind.clone(),
        model: match &object.model {
            None => Field::None,
            Some(ModelRef::Default) => Field::Absent,
            Some(ModelRef::Asset(id)) => Field::Value(id.clone()),
        },
        aabb: match &object.aabb {
            None => Field::None,
            Some(aabb) => Field::Value(aabb.bounds),
        },
        position: Some(object.position.into()),
        rotation: Some(object.rotation.into()),
        scale: Some(object.scale.into()),
        is_immovable: Some(object.is_immovable),
        has_collision: Some(object.has_collision),
        has_gravity: Some(object.has_gravity),
    }
}

/// Scene statistics for debugging and UI display
#[derive(Debug, Clone, PartialEq)]
pub struct SceneStatistics {
    pub object_count: usize,
    pub mesh_count: usize,
    pub texture_count: usize,
    pub material_count: usize,
    pub model_count: usize,
    pub total_triangles: usize,
    pub total_vertices: usize,
}
