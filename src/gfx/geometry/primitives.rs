//! # Primitive Shape Generation
//!
//! The default box every under-specified object falls back to. Positions,
//! UVs and tangents are fixed data rather than computed so the default mesh
//! shades identically to the box the scene format was authored against.

use super::GeometryData;

/// Generate a box centered at the origin with the given extents.
///
/// 24 vertices, 12 triangles. Tangents and bitangents are pre-baked and not
/// normalized; the lit shader normalizes them per fragment.
pub fn create_box_mesh(width: f32, height: f32, depth: f32) -> GeometryData {
    let (w, h, d) = (width / 2.0, height / 2.0, depth / 2.0);

    #[rustfmt::skip]
    let vertices = vec![
        [-w,  h, -d], [ w,  h,  d], [ w,  h, -d],
        [ w,  h,  d], [-w, -h,  d], [ w, -h,  d],
        [-w,  h,  d], [-w, -h, -d], [-w, -h,  d],
        [ w, -h, -d], [-w, -h,  d], [-w, -h, -d],
        [ w,  h, -d], [ w, -h,  d], [ w, -h, -d],
        [-w,  h, -d], [ w, -h, -d], [-w, -h, -d],
        [-w,  h,  d], [-w,  h,  d], [-w,  h, -d],
        [ w, -h,  d], [ w,  h,  d], [ w,  h, -d],
    ];

    #[rustfmt::skip]
    let normals = vec![
        [0.0, 1.0, 0.0], [0.0, 1.0, 0.0], [0.0, 1.0, 0.0],
        [0.0, 0.0, 1.0], [0.0, 0.0, 1.0], [0.0, 0.0, 1.0],
        [-1.0, 0.0, 0.0], [-1.0, 0.0, 0.0], [-1.0, 0.0, 0.0],
        [0.0, -1.0, 0.0], [0.0, -1.0, 0.0], [0.0, -1.0, 0.0],
        [1.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 0.0, 0.0],
        [0.0, 0.0, -1.0], [0.0, 0.0, -1.0], [0.0, 0.0, -1.0],
        [0.0, 1.0, 0.0],
        [0.0, 0.0, 1.0],
        [-1.0, 0.0, 0.0],
        [0.0, -1.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.0, 0.0, -1.0],
    ];

    #[rustfmt::skip]
    let tex_coords = vec![
        [0.875, 0.5], [0.625, 0.75], [0.625, 0.5],
        [0.625, 0.75], [0.375, 1.0], [0.375, 0.75],
        [0.625, 0.0], [0.375, 0.25], [0.375, 0.0],
        [0.375, 0.5], [0.125, 0.75], [0.125, 0.5],
        [0.625, 0.5], [0.375, 0.75], [0.375, 0.5],
        [0.625, 0.25], [0.375, 0.5], [0.375, 0.25],
        [0.875, 0.75],
        [0.625, 1.0],
        [0.625, 0.25],
        [0.375, 0.75],
        [0.625, 0.75],
        [0.625, 0.5],
    ];

    #[rustfmt::skip]
    let indices = vec![
        0, 1, 2,
        3, 4, 5,
        6, 7, 8,
        9, 10, 11,
        12, 13, 14,
        15, 16, 17,
        0, 18, 1,
        3, 19, 4,
        6, 20, 7,
        9, 21, 10,
        12, 22, 13,
        15, 23, 16,
    ];

    // one tangent frame per face triangle, then the six closing vertices
    let face_tangents: [([f32; 3], [f32; 3]); 6] = [
        ([-8.0, 0.0, 0.0], [16.0, 0.0, 8.0]),
        ([0.0, 8.0, 0.0], [-8.0, -16.0, 0.0]),
        ([0.0, 8.0, 0.0], [0.0, -16.0, -8.0]),
        ([8.0, 0.0, 0.0], [-16.0, 0.0, 8.0]),
        ([0.0, 8.0, 0.0], [0.0, -16.0, 8.0]),
        ([0.0, 8.0, 0.0], [8.0, -16.0, 0.0]),
    ];
    let closing_tangents: [([f32; 3], [f32; 3]); 6] = [
        ([-8.0, 0.0, 0.0], [0.0, 0.0, 8.0]),
        ([0.0, 8.0, 0.0], [-8.0, 0.0, 0.0]),
        ([0.0, 8.0, 0.0], [0.0, 0.0, -8.0]),
        ([8.0, 0.0, 0.0], [0.0, 0.0, 8.0]),
        ([0.0, 8.0, 0.0], [0.0, 0.0, 8.0]),
        ([0.0, 8.0, 0.0], [8.0, 0.0, 0.0]),
    ];

    let (mut tangents, mut bitangents) = (Vec::with_capacity(24), Vec::with_capacity(24));
    for (tangent, bitangent) in face_tangents {
        tangents.extend([tangent; 3]);
        bitangents.extend([bitangent; 3]);
    }
    for (tangent, bitangent) in closing_tangents {
        tangents.push(tangent);
        bitangents.push(bitangent);
    }

    GeometryData {
        vertices,
        tex_coords,
        normals,
        tangents,
        bitangents,
        indices,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::Bounds;

    #[test]
    fn test_box_shape() {
        let data = create_box_mesh(3.0, 3.0, 3.0);
        assert_eq!(data.vertex_count(), 24);
        assert_eq!(data.triangle_count(), 12);
        assert_eq!(data.tangents.len(), 24);
        assert_eq!(data.bitangents.len(), 24);
        assert!(data.indices.iter().all(|&i| (i as usize) < data.vertex_count()));
    }

    #[test]
    fn test_box_bounds_match_extents() {
        let data = create_box_mesh(2.0, 4.0, 6.0);
        let bounds = Bounds::from_positions(&data.vertices);
        assert_eq!(bounds, Bounds::new(-1.0, 1.0, -2.0, 2.0, -3.0, 3.0));
    }

    #[test]
    fn test_box_normals_are_unit() {
        let data = create_box_mesh(3.0, 3.0, 3.0);
        for n in &data.normals {
            let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
            assert!((len - 1.0).abs() < 1e-6);
        }
    }
}
