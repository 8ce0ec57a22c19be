//! GPU copies of scene assets, keyed by asset id
//!
//! Uploads happen lazily the first time a frame needs an asset. Every cached
//! allocation is destroyed explicitly when it is released, so replacing a
//! scene frees the previous scene's buffers and textures right away.

use std::collections::HashMap;

use log::{debug, warn};
use wgpu::util::DeviceExt;

use crate::gfx::resources::texture_resource::TextureResource;
use crate::gfx::scene::{Mesh, Scene};

/// Vertex and index buffers of one mesh
pub struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl GpuMesh {
    pub fn from_mesh(device: &wgpu::Device, mesh: &Mesh) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Vertex Buffer", mesh.id)),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Index Buffer", mesh.id)),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
        }
    }

    pub fn release(self) {
        self.vertex_buffer.destroy();
        self.index_buffer.destroy();
    }
}

#[derive(Default)]
pub struct GpuMeshCache {
    meshes: HashMap<String, GpuMesh>,
}

impl GpuMeshCache {
    /// Upload the scene mesh `id` unless it is already cached.
    ///
    /// Returns false when the scene has no such mesh.
    pub fn ensure(&mut self, device: &wgpu::Device, scene: &Scene, id: &str) -> bool {
        if self.meshes.contains_key(id) {
            return true;
        }
        match scene.mesh(id) {
            Some(mesh) if !mesh.indices.is_empty() => {
                debug!("Uploading mesh '{id}' ({} triangles)", mesh.triangle_count());
                self.meshes.insert(id.to_string(), GpuMesh::from_mesh(device, mesh));
                true
            }
            Some(_) => false,
            None => {
                warn!("Mesh '{id}' is not in the scene");
                false
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&GpuMesh> {
        self.meshes.get(id)
    }

    pub fn clear(&mut self) {
        for (_, mesh) in self.meshes.drain() {
            mesh.release();
        }
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }
}

#[derive(Default)]
pub struct GpuTextureCache {
    textures: HashMap<String, TextureResource>,
}

impl GpuTextureCache {
    /// Upload the scene texture `id` unless it is already cached
    pub fn ensure(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        scene: &Scene,
        id: &str,
    ) -> bool {
        if self.textures.contains_key(id) {
            return true;
        }
        match scene.texture(id) {
            Some(texture) => {
                debug!("Uploading texture '{id}' ({}x{})", texture.width, texture.height);
                self.textures
                    .insert(id.to_string(), TextureResource::from_texture(device, queue, texture));
                true
            }
            None => {
                warn!("Texture '{id}' is not in the scene");
                false
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&TextureResource> {
        self.textures.get(id)
    }

    pub fn clear(&mut self) {
        for (_, texture) in self.textures.drain() {
            texture.release();
        }
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}
