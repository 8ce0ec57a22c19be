//! World objects: the entities a scene simulates and draws.
//!
//! An object carries transform and dynamics state, an optional model
//! reference and an optional bounding box. Orientation is stored twice:
//! `rotation` is what the object currently faces and `pending_rotation` is
//! where input wants it to face. The physics step commits the pending value
//! so collision response never fights an in-progress turn.

use cgmath::{InnerSpace, Vector3};

use crate::spatial::{world_bounds, Bounds};

/// Type tag of the synthetic camera entity
pub const CAMERA_TYPE: &str = "camera";

const WORLD_UP: Vector3<f32> = Vector3::new(0.0, 1.0, 0.0);

/// Which model an object draws with
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelRef {
    /// The scene's built-in default model
    Default,
    /// A model from the scene's model pool
    Asset(String),
}

/// Object-relative bounding box plus the overlay toggle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub bounds: Bounds,
    /// Draw the wireframe overlay for this box
    pub render: bool,
}

impl Aabb {
    pub fn new(bounds: Bounds) -> Self {
        Self {
            bounds,
            render: false,
        }
    }

    /// 24 object-relative line vertices of the wireframe
    pub fn wireframe(&self) -> [[f32; 3]; 24] {
        self.bounds.wireframe_vertices()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorldObject {
    pub id: String,
    /// Free-form tag; `"camera"` marks the synthetic camera entity
    pub kind: String,

    pub position: Vector3<f32>,
    /// Displacement applied per physics tick
    pub velocity: Vector3<f32>,
    /// Pitch, yaw, roll in degrees
    pub rotation: Vector3<f32>,
    pub pending_rotation: Vector3<f32>,
    pub scale: Vector3<f32>,

    pub front: Vector3<f32>,
    pub right: Vector3<f32>,
    pub up: Vector3<f32>,

    pub is_immovable: bool,
    pub has_collision: bool,
    pub has_gravity: bool,
    pub flying: bool,
    pub airborne: bool,
    /// Recomputed every physics tick
    pub is_colliding: bool,
    /// Editor selection, drawn with a highlight
    pub selected: bool,

    /// `None` means the object is not drawn
    pub model: Option<ModelRef>,
    pub aabb: Option<Aabb>,
}

impl WorldObject {
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        let rotation = Vector3::new(0.0, -90.0, 0.0);
        let mut object = Self {
            id: id.into(),
            kind: kind.into(),
            position: Vector3::new(0.0, 0.0, 0.0),
            velocity: Vector3::new(0.0, 0.0, 0.0),
            rotation,
            pending_rotation: rotation,
            scale: Vector3::new(1.0, 1.0, 1.0),
            front: Vector3::new(0.0, 0.0, -1.0),
            right: Vector3::unit_x(),
            up: WORLD_UP,
            is_immovable: true,
            has_collision: true,
            has_gravity: true,
            flying: false,
            airborne: true,
            is_colliding: false,
            selected: false,
            model: None,
            aabb: None,
        };
        object.update_space_vectors();
        object
    }

    pub fn with_position(mut self, x: f32, y: f32, z: f32) -> Self {
        self.position = Vector3::new(x, y, z);
        self
    }

    pub fn with_aabb(mut self, bounds: Bounds) -> Self {
        self.aabb = Some(Aabb::new(bounds));
        self
    }

    pub fn with_model(mut self, model: ModelRef) -> Self {
        self.model = Some(model);
        self
    }

    pub fn movable(mut self) -> Self {
        self.is_immovable = false;
        self
    }

    pub fn is_camera(&self) -> bool {
        self.kind == CAMERA_TYPE
    }

    /// Re-derive right and up from the current front vector
    pub fn update_space_vectors(&mut self) {
        self.front = self.front.normalize();
        self.right = self.front.cross(WORLD_UP).normalize();
        self.up = self.right.cross(self.front).normalize();
    }

    /// Commit the pending rotation if it differs from the current one.
    ///
    /// The front vector is rebuilt from pending pitch and yaw; roll does not
    /// affect the basis. Returns whether anything changed.
    pub fn apply_pending_rotation(&mut self) -> bool {
        if self.pending_rotation == self.rotation {
            return false;
        }

        let pitch = self.pending_rotation.x.to_radians();
        let yaw = self.pending_rotation.y.to_radians();
        self.front = Vector3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos());
        self.update_space_vectors();
        self.rotation = self.pending_rotation;
        true
    }

    /// World-space bounds, or `None` without a usable box
    pub fn world_bounds(&self) -> Option<Bounds> {
        self.aabb
            .filter(|aabb| aabb.bounds.is_valid())
            .map(|aabb| world_bounds(&aabb.bounds, self.position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Vector3<f32>, b: Vector3<f32>) {
        assert!((a - b).magnitude() < 1e-5, "{a:?} != {b:?}");
    }

    #[test]
    fn test_default_basis() {
        let object = WorldObject::new("crate", "prop");
        assert_close(object.front, Vector3::new(0.0, 0.0, -1.0));
        assert_close(object.right, Vector3::new(1.0, 0.0, 0.0));
        assert_close(object.up, Vector3::new(0.0, 1.0, 0.0));
        assert!(object.is_immovable && object.airborne && !object.flying);
    }

    #[test]
    fn test_default_rotation_matches_front() {
        let mut object = WorldObject::new("crate", "prop");
        // current differs from pending, so the default yaw is re-derived
        object.rotation.y = 0.0;
        assert!(object.apply_pending_rotation());
        assert_close(object.front, Vector3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_pending_rotation_turns_front() {
        let mut object = WorldObject::new("player", "player");
        object.pending_rotation = Vector3::new(0.0, 0.0, 0.0);
        assert!(object.apply_pending_rotation());
        assert_close(object.front, Vector3::new(1.0, 0.0, 0.0));
        assert_close(object.right, Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(object.rotation, object.pending_rotation);
        assert!(!object.apply_pending_rotation());
    }

    #[test]
    fn test_world_bounds_follow_position() {
        let object = WorldObject::new("box", "prop")
            .with_position(1.0, 2.0, 3.0)
            .with_aabb(Bounds::default());
        assert_eq!(
            object.world_bounds(),
            Some(Bounds::new(0.0, 2.0, 1.0, 3.0, 2.0, 4.0))
        );
    }

    #[test]
    fn test_invalid_box_is_no_box() {
        let object = WorldObject::new("empty", "prop").with_aabb(Bounds::empty());
        assert_eq!(object.world_bounds(), None);
    }
}
