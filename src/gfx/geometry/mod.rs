//! # Geometry Generation and Import
//!
//! Produces the flat attribute arrays meshes are built from, either
//! procedurally (the default box) or by parsing OBJ text.
//!
//! ## Supported Sources
//!
//! - **Box**: the 24-vertex default box with baked tangents
//! - **OBJ**: triangulated `v/vt/vn` faces with vertex welding and
//!   per-triangle tangent synthesis

pub mod obj;
pub mod primitives;

pub use obj::{calculate_tangents, parse_obj};
pub use primitives::create_box_mesh;

use crate::gfx::scene::mesh::Mesh;
use crate::gfx::scene::vertex::Vertex3D;

/// Generated or imported geometry ready to become a [`Mesh`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Texture coordinates (u, v)
    pub tex_coords: Vec<[f32; 2]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    pub tangents: Vec<[f32; 3]>,
    pub bitangents: Vec<[f32; 3]>,
    /// Triangle indices
    pub indices: Vec<u32>,
}

impl GeometryData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Interleave the attribute arrays into a mesh.
    ///
    /// Attributes shorter than the position list are padded with zeros.
    pub fn into_mesh(self, id: impl Into<String>, path: impl Into<String>) -> Mesh {
        let vertices = (0..self.vertices.len())
            .map(|i| Vertex3D {
                position: self.vertices[i],
                normal: self.normals.get(i).copied().unwrap_or_default(),
                tex_coords: self.tex_coords.get(i).copied().unwrap_or_default(),
                tangent: self.tangents.get(i).copied().unwrap_or_default(),
                bitangent: self.bitangents.get(i).copied().unwrap_or_default(),
            })
            .collect();

        Mesh::new(id, path, vertices, self.indices)
    }
}
