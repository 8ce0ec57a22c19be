//! # Dynamics and Collision
//!
//! One fixed step per frame: integrate every movable object, then resolve
//! box/box overlaps pair by pair. Velocities are displacements per tick and
//! are not scaled by frame time.

use log::trace;

use crate::config::PhysicsConfig;
use crate::gfx::scene::{Scene, WorldObject};
use crate::spatial::{overlap_with_penetration, Bounds};

const AXIS_Y: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsEngine {
    pub gravity: f32,
    pub friction_factor: f32,
}

impl Default for PhysicsEngine {
    fn default() -> Self {
        Self::new(&PhysicsConfig::default())
    }
}

impl PhysicsEngine {
    pub fn new(config: &PhysicsConfig) -> Self {
        Self {
            gravity: config.gravity,
            friction_factor: config.friction_factor,
        }
    }

    /// Advance the scene by one tick
    pub fn update(&self, scene: &mut Scene) {
        for object in scene.world_objects.values_mut() {
            object.is_colliding = false;
        }

        for object in scene.world_objects.values_mut() {
            if !object.is_immovable {
                self.integrate(object);
            }
        }

        self.resolve_collisions(scene);
    }

    fn integrate(&self, object: &mut WorldObject) {
        object.position += object.velocity;
        object.apply_pending_rotation();

        object.velocity.x *= self.friction_factor;
        object.velocity.z *= self.friction_factor;
        // walking leaves the vertical axis to gravity and collision
        if object.flying {
            object.velocity.y *= self.friction_factor;
        } else if object.has_gravity {
            object.velocity.y -= self.gravity;
        }
    }

    /// Brute-force pass over every unordered pair of colliders
    fn resolve_collisions(&self, scene: &mut Scene) {
        let colliders: Vec<String> = scene
            .world_objects
            .values()
            .filter(|object| object.has_collision && object.world_bounds().is_some())
            .map(|object| object.id.clone())
            .collect();

        for (i, first) in colliders.iter().enumerate() {
            for second in &colliders[i + 1..] {
                self.resolve_pair(scene, first, second);
            }
        }
    }

    fn resolve_pair(&self, scene: &mut Scene, first: &str, second: &str) {
        let (Some((first_bounds, first_fixed)), Some((second_bounds, second_fixed))) =
            (collider(scene, first), collider(scene, second))
        else {
            return;
        };

        // the movable object plays A
        let (a, a_bounds, b, b_bounds, b_fixed) = match (first_fixed, second_fixed) {
            (true, true) => return,
            (true, false) => (second, second_bounds, first, first_bounds, first_fixed),
            _ => (first, first_bounds, second, second_bounds, second_fixed),
        };

        let overlap = overlap_with_penetration(&a_bounds, &b_bounds);
        if !overlap.colliding {
            return;
        }

        let axis = overlap.resolution_axis();
        let depth = overlap.penetration[axis];
        trace!("'{a}' collides with '{b}' on axis {axis} by {depth}");

        if let Some(object) = scene.world_objects.get_mut(b) {
            object.is_colliding = true;
            if !b_fixed {
                object.position[axis] -= depth / 2.0;
            }
        }

        if let Some(object) = scene.world_objects.get_mut(a) {
            object.is_colliding = true;
            object.velocity[axis] = 0.0;
            object.position[axis] += if b_fixed { depth } else { depth / 2.0 };
            if axis == AXIS_Y {
                object.airborne = false;
            }
        }
    }
}

/// Current world bounds and immovability of a collider
fn collider(scene: &Scene, id: &str) -> Option<(Bounds, bool)> {
    let object = scene.world_objects.get(id)?;
    Some((object.world_bounds()?, object.is_immovable))
}
