//! # Axis-Aligned Bounding Volumes
//!
//! Pure geometry used by dynamics, ray casting and the wireframe overlay.
//! Bounds are stored relative to their owner and translated into world
//! space on demand; rotation and scale are never applied.
//!
//! Ray tests follow IEEE-754: a zero direction component divides to ±∞,
//! which the slab comparisons rely on, and any NaN comparison is a miss.

use cgmath::{InnerSpace, Vector3};
use serde::{Deserialize, Serialize};

/// Six-scalar box: min/max on each axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
    pub min_z: f32,
    pub max_z: f32,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(-1.0, 1.0, -1.0, 1.0, -1.0, 1.0)
    }
}

impl Bounds {
    pub fn new(min_x: f32, max_x: f32, min_y: f32, max_y: f32, min_z: f32, max_z: f32) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
            min_z,
            max_z,
        }
    }

    /// Bounds that contain nothing: +∞ mins and -∞ maxes
    pub fn empty() -> Self {
        Self::new(
            f32::INFINITY,
            f32::NEG_INFINITY,
            f32::INFINITY,
            f32::NEG_INFINITY,
            f32::INFINITY,
            f32::NEG_INFINITY,
        )
    }

    /// Running min/max over a set of points.
    ///
    /// Returns [`Bounds::empty`] for an empty slice; check [`Bounds::is_valid`]
    /// before using the result as a collision volume.
    pub fn from_positions(positions: &[[f32; 3]]) -> Self {
        positions.iter().fold(Self::empty(), |mut bounds, p| {
            bounds.min_x = bounds.min_x.min(p[0]);
            bounds.max_x = bounds.max_x.max(p[0]);
            bounds.min_y = bounds.min_y.min(p[1]);
            bounds.max_y = bounds.max_y.max(p[1]);
            bounds.min_z = bounds.min_z.min(p[2]);
            bounds.max_z = bounds.max_z.max(p[2]);
            bounds
        })
    }

    pub fn from_array(values: [f32; 6]) -> Self {
        Self::new(values[0], values[1], values[2], values[3], values[4], values[5])
    }

    /// True when every axis is finite and min ≤ max
    pub fn is_valid(&self) -> bool {
        let axes = [
            (self.min_x, self.max_x),
            (self.min_y, self.max_y),
            (self.min_z, self.max_z),
        ];
        axes.iter()
            .all(|(min, max)| min.is_finite() && max.is_finite() && min <= max)
    }

    pub fn min(&self) -> Vector3<f32> {
        Vector3::new(self.min_x, self.min_y, self.min_z)
    }

    pub fn max(&self) -> Vector3<f32> {
        Vector3::new(self.max_x, self.max_y, self.max_z)
    }

    pub fn center(&self) -> Vector3<f32> {
        (self.min() + self.max()) * 0.5
    }

    /// Shift every axis by `offset`
    pub fn translated(&self, offset: Vector3<f32>) -> Self {
        Self::new(
            self.min_x + offset.x,
            self.max_x + offset.x,
            self.min_y + offset.y,
            self.max_y + offset.y,
            self.min_z + offset.z,
            self.max_z + offset.z,
        )
    }

    /// 24 line-list vertices, two per edge, covering the 12 box edges
    pub fn wireframe_vertices(&self) -> [[f32; 3]; 24] {
        let (x0, x1) = (self.min_x, self.max_x);
        let (y0, y1) = (self.min_y, self.max_y);
        let (z0, z1) = (self.min_z, self.max_z);

        #[rustfmt::skip]
        let vertices = [
            [x0, y0, z0], [x0, y0, z1],
            [x0, y0, z0], [x0, y1, z0],
            [x0, y0, z0], [x1, y0, z0],
            [x0, y1, z0], [x0, y1, z1],
            [x0, y1, z0], [x1, y1, z0],
            [x0, y1, z1], [x1, y1, z1],
            [x0, y1, z1], [x0, y0, z1],
            [x1, y0, z1], [x0, y0, z1],
            [x1, y0, z1], [x1, y1, z1],
            [x1, y0, z1], [x1, y0, z0],
            [x1, y1, z0], [x1, y1, z1],
            [x1, y1, z0], [x1, y0, z0],
        ];
        vertices
    }
}

/// Translate local bounds into world space by the owner's position
pub fn world_bounds(bounds: &Bounds, position: Vector3<f32>) -> Bounds {
    bounds.translated(position)
}

/// A half-line used for look-at queries
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vector3<f32>,
    pub direction: Vector3<f32>,
}

impl Ray {
    /// Create a ray; the direction is used as given, not normalized
    pub fn new(origin: Vector3<f32>, direction: Vector3<f32>) -> Self {
        Self { origin, direction }
    }

    /// Point at parametric distance `t`
    pub fn point_at(&self, t: f32) -> Vector3<f32> {
        self.origin + self.direction * t
    }

    /// Whether the direction can produce meaningful distances
    pub fn is_degenerate(&self) -> bool {
        self.direction.magnitude2() == 0.0
    }
}

fn slab(origin: f32, direction: f32, min: f32, max: f32) -> (f32, f32) {
    let t0 = (min - origin) / direction;
    let t1 = (max - origin) / direction;
    if t0 > t1 {
        (t1, t0)
    } else {
        (t0, t1)
    }
}

/// Slab-method ray/box test.
///
/// Returns the entry distance along `direction`, `0.0` when `origin` is
/// inside the box, and `None` when the ray misses or the box lies entirely
/// behind the origin.
pub fn intersect_ray_aabb(
    origin: Vector3<f32>,
    direction: Vector3<f32>,
    bounds: &Bounds,
) -> Option<f32> {
    let (mut t_min, mut t_max) = slab(origin.x, direction.x, bounds.min_x, bounds.max_x);

    let (ty_min, ty_max) = slab(origin.y, direction.y, bounds.min_y, bounds.max_y);
    if !(t_min <= ty_max && ty_min <= t_max) {
        return None;
    }
    if ty_min > t_min {
        t_min = ty_min;
    }
    if ty_max < t_max {
        t_max = ty_max;
    }

    let (tz_min, tz_max) = slab(origin.z, direction.z, bounds.min_z, bounds.max_z);
    if !(t_min <= tz_max && tz_min <= t_max) {
        return None;
    }
    if tz_min > t_min {
        t_min = tz_min;
    }
    if tz_max < t_max {
        t_max = tz_max;
    }

    if t_min.is_nan() || t_max.is_nan() || t_max < 0.0 {
        return None;
    }

    Some(t_min.max(0.0))
}

/// Result of a box/box overlap test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overlap {
    pub colliding: bool,
    /// Signed push-out distance per axis that separates A from B fastest
    pub penetration: Vector3<f32>,
}

impl Overlap {
    /// Axis index (0, 1, 2) of minimum absolute penetration.
    ///
    /// Ties keep the earlier axis.
    pub fn resolution_axis(&self) -> usize {
        let p = self.penetration;
        let mut axis = 0;
        let mut smallest = p.x.abs();
        for (index, value) in [(1, p.y.abs()), (2, p.z.abs())] {
            if value < smallest {
                smallest = value;
                axis = index;
            }
        }
        axis
    }
}

fn axis_penetration(a_min: f32, a_max: f32, b_min: f32, b_max: f32) -> (bool, f32) {
    let push_positive = b_max - a_min;
    let push_negative = a_max - b_min;
    let overlaps = push_positive >= 0.0 && push_negative >= 0.0;

    // equal pushes mean a shared centre; the narrower box goes positive
    let positive = if push_positive == push_negative {
        a_max - a_min <= b_max - b_min
    } else {
        push_positive < push_negative
    };
    let depth = if positive { push_positive } else { -push_negative };

    (overlaps, depth)
}

/// Per-axis overlap of two world-space boxes.
///
/// Moving A by `penetration` on any single axis separates the boxes on that
/// axis. Swapping A and B negates the penetration, except on an axis where
/// both boxes have the same extent: there both orders push positive.
pub fn overlap_with_penetration(a: &Bounds, b: &Bounds) -> Overlap {
    let (ox, dx) = axis_penetration(a.min_x, a.max_x, b.min_x, b.max_x);
    let (oy, dy) = axis_penetration(a.min_y, a.max_y, b.min_y, b.max_y);
    let (oz, dz) = axis_penetration(a.min_z, a.max_z, b.min_z, b.max_z);

    Overlap {
        colliding: ox && oy && oz,
        penetration: Vector3::new(dx, dy, dz),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn random_bounds(rng: &mut impl Rng) -> Bounds {
        let mut axis = || {
            let a: f32 = rng.random_range(-10.0..10.0);
            let b: f32 = rng.random_range(-10.0..10.0);
            (a.min(b), a.max(b))
        };
        let (x0, x1) = axis();
        let (y0, y1) = axis();
        let (z0, z1) = axis();
        Bounds::new(x0, x1, y0, y1, z0, z1)
    }

    #[test]
    fn test_world_bounds_translation() {
        let mut rng = rand::rng();
        for _ in 0..200 {
            let bounds = random_bounds(&mut rng);
            let offset = Vector3::new(
                rng.random_range(-50.0..50.0),
                rng.random_range(-50.0..50.0),
                rng.random_range(-50.0..50.0),
            );
            let world = world_bounds(&bounds, offset);

            assert!(world.min_x <= world.max_x);
            assert!(world.min_y <= world.max_y);
            assert!(world.min_z <= world.max_z);
            assert_eq!(world.min_x, bounds.min_x + offset.x);
            assert_eq!(world.max_y, bounds.max_y + offset.y);
            assert_eq!(world.min_z, bounds.min_z + offset.z);
        }
    }

    #[test]
    fn test_overlap_symmetry() {
        let mut rng = rand::rng();
        for _ in 0..500 {
            let a = random_bounds(&mut rng);
            let b = random_bounds(&mut rng);
            let ab = overlap_with_penetration(&a, &b);
            let ba = overlap_with_penetration(&b, &a);

            assert_eq!(ab.colliding, ba.colliding);
            assert_eq!(ab.penetration.x, -ba.penetration.x);
            assert_eq!(ab.penetration.y, -ba.penetration.y);
            assert_eq!(ab.penetration.z, -ba.penetration.z);
        }
    }

    #[test]
    fn test_concentric_boxes_stay_symmetric() {
        let wide = Bounds::new(0.0, 2.0, -1.0, 1.0, 0.0, 4.0);
        let narrow = Bounds::new(0.5, 1.5, -0.5, 0.5, 1.0, 3.0);
        let wide_first = overlap_with_penetration(&wide, &narrow);
        let narrow_first = overlap_with_penetration(&narrow, &wide);

        assert!(wide_first.colliding && narrow_first.colliding);
        assert_eq!(wide_first.penetration, Vector3::new(-1.5, -1.5, -3.0));
        assert_eq!(narrow_first.penetration, -wide_first.penetration);
    }

    #[test]
    fn test_identical_extents_push_positive() {
        let a = Bounds::new(-0.5, 0.5, -0.5, 0.5, -0.5, 0.5);
        let overlap = overlap_with_penetration(&a, &a);

        assert!(overlap.colliding);
        assert_eq!(overlap.penetration, Vector3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_penetration_pushes_apart() {
        let floor = Bounds::new(-5.0, 5.0, -1.0, 0.0, -5.0, 5.0);
        let crate_box = Bounds::new(-0.5, 0.5, -0.25, 0.75, -0.5, 0.5);
        let overlap = overlap_with_penetration(&crate_box, &floor);

        assert!(overlap.colliding);
        assert_eq!(overlap.resolution_axis(), 1);
        assert_eq!(overlap.penetration.y, 0.25);
    }

    #[test]
    fn test_separated_boxes() {
        let a = Bounds::new(0.0, 1.0, 0.0, 1.0, 0.0, 1.0);
        let b = Bounds::new(2.0, 3.0, 0.0, 1.0, 0.0, 1.0);
        assert!(!overlap_with_penetration(&a, &b).colliding);
    }

    #[test]
    fn test_resolution_axis_tie_keeps_earlier() {
        let overlap = Overlap {
            colliding: true,
            penetration: Vector3::new(0.5, -0.5, 0.5),
        };
        assert_eq!(overlap.resolution_axis(), 0);
    }

    #[test]
    fn test_ray_from_inside_hits() {
        let bounds = Bounds::new(-1.0, 1.0, -1.0, 1.0, -1.0, 1.0);
        let origin = Vector3::new(0.2, -0.3, 0.1);
        let axes = [
            Vector3::unit_x(),
            -Vector3::unit_x(),
            Vector3::unit_y(),
            -Vector3::unit_y(),
            Vector3::unit_z(),
            -Vector3::unit_z(),
        ];

        for direction in axes {
            let hit = intersect_ray_aabb(origin, direction, &bounds);
            assert!(matches!(hit, Some(t) if t >= 0.0), "direction {:?}", direction);
        }
    }

    #[test]
    fn test_ray_pointing_away_misses() {
        let bounds = Bounds::new(-1.0, 1.0, -1.0, 1.0, -1.0, 1.0);
        let origin = Vector3::new(3.0, 3.0, 3.0);
        assert_eq!(intersect_ray_aabb(origin, Vector3::new(1.0, 1.0, 1.0), &bounds), None);
        assert_eq!(intersect_ray_aabb(origin, Vector3::new(0.0, 0.0, 1.0), &bounds), None);
    }

    #[test]
    fn test_ray_hit_distance() {
        let bounds = Bounds::new(-1.0, 1.0, -1.0, 1.0, -1.0, 1.0);
        let ray = Ray::new(Vector3::new(0.0, 0.0, 10.0), Vector3::new(0.0, 0.0, -1.0));
        let t = intersect_ray_aabb(ray.origin, ray.direction, &bounds).unwrap();

        assert_eq!(t, 9.0);
        assert_eq!(ray.point_at(t).z, 1.0);
    }

    #[test]
    fn test_zero_direction_is_miss() {
        let bounds = Bounds::new(-1.0, 1.0, -1.0, 1.0, -1.0, 1.0);
        let ray = Ray::new(Vector3::new(5.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 0.0));

        assert!(ray.is_degenerate());
        assert_eq!(intersect_ray_aabb(ray.origin, ray.direction, &bounds), None);
    }

    #[test]
    fn test_empty_positions_are_invalid() {
        let bounds = Bounds::from_positions(&[]);
        assert!(!bounds.is_valid());
        assert_eq!(bounds.min_x, f32::INFINITY);
        assert_eq!(bounds.max_z, f32::NEG_INFINITY);

        let bounds = Bounds::from_positions(&[[1.0, -2.0, 3.0], [-1.0, 4.0, 0.0]]);
        assert!(bounds.is_valid());
        assert_eq!(bounds, Bounds::new(-1.0, 1.0, -2.0, 4.0, 0.0, 3.0));
    }

    #[test]
    fn test_wireframe_edges_are_axis_aligned() {
        let bounds = Bounds::new(-1.0, 2.0, -3.0, 4.0, -5.0, 6.0);
        let vertices = bounds.wireframe_vertices();

        for edge in vertices.chunks(2) {
            let changed = (0..3).filter(|&i| edge[0][i] != edge[1][i]).count();
            assert_eq!(changed, 1);
        }
    }
}
