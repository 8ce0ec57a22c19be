//! # Object Picking
//!
//! Ray casts against world-space bounding boxes. Two entry points:
//!
//! 1. [`cast_ray`] - what the controlled object is looking at, run every frame
//! 2. [`pick_at_screen`] - which object lies under a screen position, for
//!    editor selection
//!
//! Both return the closest hit. The camera entity and the ray's source are
//! never hit.

use cgmath::{InnerSpace, SquareMatrix, Vector3, Vector4};

use crate::gfx::scene::Scene;
use crate::spatial::{intersect_ray_aabb, Ray};

/// Result of a picking query
#[derive(Debug, Clone, PartialEq)]
pub struct PickResult {
    pub object_id: String,
    /// Distance along the ray direction; zero when the ray starts inside
    pub distance: f32,
    /// World space intersection point
    pub intersection_point: Vector3<f32>,
}

/// Closest object hit by `ray`, skipping the camera and `exclude`
pub fn closest_hit(scene: &Scene, ray: &Ray, exclude: Option<&str>) -> Option<PickResult> {
    if ray.is_degenerate() {
        return None;
    }

    let mut closest: Option<PickResult> = None;
    for object in scene.world_objects.values() {
        if object.is_camera() || Some(object.id.as_str()) == exclude {
            continue;
        }
        let Some(bounds) = object.world_bounds() else {
            continue;
        };

        if let Some(distance) = intersect_ray_aabb(ray.origin, ray.direction, &bounds) {
            if closest
                .as_ref()
                .map_or(true, |result| distance < result.distance)
            {
                closest = Some(PickResult {
                    object_id: object.id.clone(),
                    distance,
                    intersection_point: ray.point_at(distance),
                });
            }
        }
    }
    closest
}

/// What the object `from_id` is looking at along its front vector
pub fn cast_ray(scene: &Scene, from_id: &str) -> Option<PickResult> {
    let source = scene.world_objects.get(from_id)?;
    let ray = Ray::new(source.position, source.front);
    closest_hit(scene, &ray, Some(from_id))
}

/// Convert screen coordinates to a world-space ray through the camera entity
pub fn screen_to_ray(
    scene: &Scene,
    screen_pos: (f32, f32),
    screen_size: (f32, f32),
) -> Option<Ray> {
    let eye = scene.camera_entity()?;
    let (mouse_x, mouse_y) = screen_pos;
    let (screen_width, screen_height) = screen_size;
    if screen_width <= 0.0 || screen_height <= 0.0 {
        return None;
    }

    // Convert screen coordinates to normalized device coordinates (-1 to 1)
    let ndc_x = (2.0 * mouse_x) / screen_width - 1.0;
    let ndc_y = 1.0 - (2.0 * mouse_y) / screen_height;

    let inv_view_proj = scene.camera.view_projection(eye).invert()?;

    // wgpu clip depth runs from 0 at the near plane to 1 at the far plane
    let world_near = inv_view_proj * Vector4::new(ndc_x, ndc_y, 0.0, 1.0);
    let world_far = inv_view_proj * Vector4::new(ndc_x, ndc_y, 1.0, 1.0);

    let near_3d = world_near.truncate() / world_near.w;
    let far_3d = world_far.truncate() / world_far.w;

    Some(Ray::new(near_3d, (far_3d - near_3d).normalize()))
}

/// Object under a screen position, seen from the camera entity
pub fn pick_at_screen(
    scene: &Scene,
    screen_pos: (f32, f32),
    screen_size: (f32, f32),
) -> Option<PickResult> {
    let ray = screen_to_ray(scene, screen_pos, screen_size)?;
    closest_hit(scene, &ray, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CameraConfig;
    use crate::gfx::scene::WorldObject;
    use crate::spatial::Bounds;

    fn unit_box(id: &str, x: f32, y: f32, z: f32) -> WorldObject {
        WorldObject::new(id, "prop")
            .with_position(x, y, z)
            .with_aabb(Bounds::new(-1.0, 1.0, -1.0, 1.0, -1.0, 1.0))
    }

    fn scene_with(objects: Vec<WorldObject>) -> Scene {
        let mut scene = Scene::new();
        for object in objects {
            scene.world_objects.insert(object.id.clone(), object);
        }
        scene
    }

    #[test]
    fn test_cast_ray_finds_closest() {
        // default front is -z
        let scene = scene_with(vec![
            unit_box("eye", 0.0, 0.0, 0.0),
            unit_box("near", 0.0, 0.0, -5.0),
            unit_box("far", 0.0, 0.0, -10.0),
            unit_box("behind", 0.0, 0.0, 5.0),
        ]);

        let hit = cast_ray(&scene, "eye").unwrap();
        assert_eq!(hit.object_id, "near");
        assert!((hit.distance - 4.0).abs() < 1e-5);
        assert!((hit.intersection_point.z + 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_cast_ray_ignores_camera_and_boxless_objects() {
        let mut scene = scene_with(vec![
            unit_box("eye", 0.0, 0.0, 20.0),
            WorldObject::new("marker", "prop").with_position(0.0, 0.0, 10.0),
        ]);
        scene.spawn_camera(&CameraConfig::default());

        assert_eq!(cast_ray(&scene, "eye"), None);
        assert_eq!(cast_ray(&scene, "missing"), None);
    }

    #[test]
    fn test_ray_starting_inside_reports_zero() {
        let scene = scene_with(vec![
            unit_box("eye", 0.0, 0.0, 0.0),
            unit_box("around", 0.0, 0.0, -0.5),
        ]);
        let hit = cast_ray(&scene, "eye").unwrap();
        assert_eq!(hit.object_id, "around");
        assert_eq!(hit.distance, 0.0);
    }

    #[test]
    fn test_pick_at_screen_center() {
        // camera sits at z = 10 looking down -z
        let mut scene = scene_with(vec![unit_box("target", 0.0, 0.0, 0.0)]);
        scene.spawn_camera(&CameraConfig::default());

        let hit = pick_at_screen(&scene, (600.0, 400.0), (1200.0, 800.0)).unwrap();
        assert_eq!(hit.object_id, "target");
        assert!((hit.intersection_point.z - 1.0).abs() < 1e-3);

        assert_eq!(pick_at_screen(&scene, (0.0, 0.0), (1200.0, 800.0)), None);
        assert_eq!(pick_at_screen(&scene, (0.0, 0.0), (0.0, 0.0)), None);
    }
}
