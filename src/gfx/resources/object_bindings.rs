//! Per-object uniforms for bind group 1
//!
//! The shadow pass reads only the model matrix; the lit pass also reads the
//! normal matrix, highlight color and receive flags.

use crate::gfx::rendering::frame_plan::ObjectDraw;
use crate::wgpu_utils::{
    binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
    binding_types,
    uniform_buffer::UniformBuffer,
};

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    pub normal: [[f32; 4]; 4],
    /// Added to the shaded color, w unused
    pub highlight: [f32; 4],
    /// x: receive shadow, y: receive lighting (1.0 or 0.0)
    pub flags: [f32; 4],
}

impl ObjectUniform {
    pub fn from_draw(draw: &ObjectDraw) -> Self {
        let flag = |on: bool| if on { 1.0 } else { 0.0 };
        let h = draw.highlight;
        Self {
            model: draw.model_matrix.into(),
            normal: draw.normal_matrix.into(),
            highlight: [h[0], h[1], h[2], 0.0],
            flags: [flag(draw.receive_shadow), flag(draw.receive_lighting), 0.0, 0.0],
        }
    }
}

type ObjectUBO = UniformBuffer<ObjectUniform>;

pub struct ObjectBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
}

impl ObjectBindings {
    pub fn new(device: &wgpu::Device) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform())
            .create(device, "Object Bind Group");

        Self { bind_group_layout }
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }
}

/// Uniform buffer and bind group of one world object
pub struct GpuObject {
    ubo: ObjectUBO,
    bind_group: wgpu::BindGroup,
}

impl GpuObject {
    pub fn new(device: &wgpu::Device, bindings: &ObjectBindings, object_id: &str) -> Self {
        let ubo = ObjectUBO::new(device);
        let bind_group = BindGroupBuilder::new(&bindings.bind_group_layout)
            .resource(ubo.binding_resource())
            .create(device, &format!("Object '{object_id}'"));

        Self { ubo, bind_group }
    }

    pub fn update(&mut self, queue: &wgpu::Queue, uniform: ObjectUniform) {
        self.ubo.update_content(queue, uniform);
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }

    pub fn release(self) {
        self.ubo.release();
    }
}
