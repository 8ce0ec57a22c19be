//! Immutable CPU-side mesh geometry.
//!
//! GPU buffers are owned by the renderer's cache, keyed by [`Mesh::id`]. A
//! mesh is never edited in place; replacing one means inserting a new value
//! under the same id and releasing the cached buffers.

use crate::gfx::scene::vertex::Vertex3D;
use crate::spatial::Bounds;

#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub id: String,
    /// Source path, `"none"` for generated meshes
    pub path: String,
    pub vertices: Vec<Vertex3D>,
    /// Triangle list, three indices per face
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new(
        id: impl Into<String>,
        path: impl Into<String>,
        vertices: Vec<Vertex3D>,
        indices: Vec<u32>,
    ) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
            vertices,
            indices,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Model-space bounds of every vertex position.
    ///
    /// An empty mesh yields inverted bounds; check [`Bounds::is_valid`]
    /// before attaching them to an object.
    pub fn local_bounds(&self) -> Bounds {
        compute_mesh_local_bounds(self)
    }
}

/// Single pass min/max reduction over the mesh's vertex positions
pub fn compute_mesh_local_bounds(mesh: &Mesh) -> Bounds {
    let positions: Vec<[f32; 3]> = mesh.vertices.iter().map(|v| v.position).collect();
    Bounds::from_positions(&positions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertex(position: [f32; 3]) -> Vertex3D {
        Vertex3D {
            position,
            ..Default::default()
        }
    }

    #[test]
    fn test_local_bounds() {
        let mesh = Mesh::new(
            "tri",
            "none",
            vec![
                vertex([-1.0, 0.0, 2.0]),
                vertex([3.0, -2.0, 0.5]),
                vertex([0.0, 4.0, -1.0]),
            ],
            vec![0, 1, 2],
        );

        let bounds = mesh.local_bounds();
        assert_eq!(bounds, Bounds::new(-1.0, 3.0, -2.0, 4.0, -1.0, 2.0));
        assert_eq!(mesh.triangle_count(), 1);
    }

    #[test]
    fn test_empty_mesh_has_no_bounds() {
        let mesh = Mesh::new("empty", "none", Vec::new(), Vec::new());
        let bounds = compute_mesh_local_bounds(&mesh);
        assert!(!bounds.is_valid());
        assert_eq!(bounds.min_x, f32::INFINITY);
        assert_eq!(bounds.max_y, f32::NEG_INFINITY);
    }
}
