//! Render pass helpers for cached meshes

use wgpu::*;

use super::gpu_cache::GpuMesh;

/// Extension trait for RenderPass to draw uploaded meshes
pub trait RenderPassExt<'a> {
    /// Bind the mesh's buffers and issue one indexed draw
    fn draw_mesh(&mut self, mesh: &'a GpuMesh);
}

impl<'a> RenderPassExt<'a> for RenderPass<'a> {
    fn draw_mesh(&mut self, mesh: &'a GpuMesh) {
        self.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        self.set_index_buffer(mesh.index_buffer.slice(..), IndexFormat::Uint32);
        self.draw_indexed(0..mesh.index_count, 0, 0..1);
    }
}
