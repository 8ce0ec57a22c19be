//! Global uniform bindings for camera, light and shadow data
//!
//! Bind group 0 carries the per-frame globals every pipeline reads. Bind
//! group 3 exposes the shadow map written by the depth pass to the lit pass.

use crate::{
    gfx::rendering::frame_plan::FramePlan,
    gfx::resources::texture_resource::TextureResource,
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

/// Global uniform buffer content structure
///
/// MUST match the `Globals` struct in the shaders exactly.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUBOContent {
    view_position: [f32; 4],        // Camera position (homogeneous coordinates)
    view_proj: [[f32; 4]; 4],       // Camera view-projection matrix
    light_view_proj: [[f32; 4]; 4], // Shared by the shadow and lit passes
    light_direction: [f32; 3],      // Light position, used as a direction toward the light
    shadow_bias: f32,
}
// Total: 16 + 64 + 64 + 12 + 4 = 160 bytes

impl GlobalUBOContent {
    pub fn from_plan(plan: &FramePlan) -> Self {
        let p = plan.camera_position;
        Self {
            view_position: [p.x, p.y, p.z, 1.0],
            view_proj: (plan.camera_projection * plan.camera_view).into(),
            light_view_proj: plan.light.view_projection().into(),
            light_direction: plan.light_direction.into(),
            shadow_bias: plan.shadow_bias,
        }
    }
}

/// Type alias for the global uniform buffer
pub type GlobalUBO = UniformBuffer<GlobalUBOContent>;

/// Uploads this frame's globals
pub fn update_global_ubo(ubo: &mut GlobalUBO, queue: &wgpu::Queue, plan: &FramePlan) {
    ubo.update_content(queue, GlobalUBOContent::from_plan(plan));
}

/// Bind group layout and bind group for global uniforms, bound to slot 0 in
/// every pipeline.
pub struct GlobalBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
    bind_group: wgpu::BindGroup,
}

impl GlobalBindings {
    pub fn new(device: &wgpu::Device, ubo: &GlobalUBO) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform())
            .create(device, "Globals Bind Group");

        let bind_group = BindGroupBuilder::new(&bind_group_layout)
            .resource(ubo.binding_resource())
            .create(device, "Global Bind Group");

        GlobalBindings {
            bind_group_layout,
            bind_group,
        }
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

/// Shadow map exposed to the lit pass as raw depth plus a non-filtering sampler
pub struct ShadowBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
    bind_group: wgpu::BindGroup,
}

impl ShadowBindings {
    pub fn new(device: &wgpu::Device, shadow_map: &TextureResource) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_fragment(binding_types::texture_depth_2d())
            .next_binding_fragment(binding_types::sampler(
                wgpu::SamplerBindingType::NonFiltering,
            ))
            .create(device, "Shadow Bind Group");

        let bind_group = BindGroupBuilder::new(&bind_group_layout)
            .texture(&shadow_map.view)
            .sampler(&shadow_map.sampler)
            .create(device, "Shadow Bind Group");

        ShadowBindings {
            bind_group_layout,
            bind_group,
        }
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}
