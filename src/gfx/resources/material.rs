//! Material system for the lit forward pass
//!
//! [`Material`] is scene data: texture references and shading scalars.
//! [`GpuMaterial`] is the renderer's uniform buffer and bind group for one
//! material, rebuilt whenever the textures it resolves to change.

use wgpu::Device;

use crate::gfx::resources::texture_resource::TextureResource;
use crate::wgpu_utils::{
    binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
    binding_types,
    uniform_buffer::UniformBuffer,
};

/// Material ID for referencing materials
pub type MaterialId = String;

/// Shading parameters and texture references
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub id: MaterialId,
    /// Texture id; `None` samples the scene's default diffuse texture
    pub diffuse_texture: Option<String>,
    /// Texture id; `None` samples the scene's default normal map
    pub normal_texture: Option<String>,
    /// UV tiling factor
    pub scale: f32,
    pub specular_exponent: f32,
    pub specular_strength: f32,
    pub diffuse_strength: f32,
    pub use_diffuse: bool,
    pub use_normal: bool,
}

impl Material {
    pub fn new(id: impl Into<MaterialId>) -> Self {
        Self {
            id: id.into(),
            diffuse_texture: None,
            normal_texture: None,
            scale: 1.0,
            specular_exponent: 32.0,
            specular_strength: 0.0,
            diffuse_strength: 1.0,
            use_diffuse: true,
            use_normal: true,
        }
    }

    /// Builder pattern: Set the diffuse texture id
    pub fn with_diffuse(mut self, texture_id: impl Into<String>) -> Self {
        self.diffuse_texture = Some(texture_id.into());
        self
    }

    /// Builder pattern: Set the normal map texture id
    pub fn with_normal(mut self, texture_id: impl Into<String>) -> Self {
        self.normal_texture = Some(texture_id.into());
        self
    }

    /// Builder pattern: Set the UV tiling factor
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Builder pattern: Set specular exponent and strength
    pub fn with_specular(mut self, exponent: f32, strength: f32) -> Self {
        self.specular_exponent = exponent;
        self.specular_strength = strength;
        self
    }

    pub fn uniform(&self) -> MaterialUniform {
        MaterialUniform {
            scale: self.scale,
            specular_exponent: self.specular_exponent,
            specular_strength: self.specular_strength,
            diffuse_strength: self.diffuse_strength,
        }
    }
}

/// GPU uniform data for materials
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    pub scale: f32,
    pub specular_exponent: f32,
    pub specular_strength: f32,
    pub diffuse_strength: f32,
}

type MaterialUBO = UniformBuffer<MaterialUniform>;

/// Layout of bind group 2: material uniform, diffuse and normal textures, sampler
pub struct MaterialBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
}

impl MaterialBindings {
    pub fn new(device: &Device) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_fragment(binding_types::uniform())
            .next_binding_fragment(binding_types::texture_2d())
            .next_binding_fragment(binding_types::texture_2d())
            .next_binding_fragment(binding_types::sampler(wgpu::SamplerBindingType::Filtering))
            .create(device, "Material Bind Group");

        MaterialBindings { bind_group_layout }
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }

    fn create_bind_group(
        &self,
        device: &Device,
        ubo: &MaterialUBO,
        diffuse: &TextureResource,
        normal: &TextureResource,
        label: &str,
    ) -> wgpu::BindGroup {
        BindGroupBuilder::new(&self.bind_group_layout)
            .resource(ubo.binding_resource())
            .texture(&diffuse.view)
            .texture(&normal.view)
            .sampler(&diffuse.sampler)
            .create(device, label)
    }
}

/// Per-material GPU state cached by the renderer
pub struct GpuMaterial {
    ubo: MaterialUBO,
    bind_group: wgpu::BindGroup,
    /// Diffuse and normal texture ids the bind group was built from
    textures: (String, String),
}

impl GpuMaterial {
    pub fn new(
        device: &Device,
        bindings: &MaterialBindings,
        material_id: &str,
        diffuse: (&str, &TextureResource),
        normal: (&str, &TextureResource),
    ) -> Self {
        let ubo = MaterialUBO::new(device);
        let bind_group = bindings.create_bind_group(
            device,
            &ubo,
            diffuse.1,
            normal.1,
            &format!("Material '{material_id}'"),
        );

        Self {
            ubo,
            bind_group,
            textures: (diffuse.0.to_string(), normal.0.to_string()),
        }
    }

    /// True when the bind group still points at the given textures
    pub fn uses_textures(&self, diffuse_id: &str, normal_id: &str) -> bool {
        self.textures.0 == diffuse_id && self.textures.1 == normal_id
    }

    pub fn update(&mut self, queue: &wgpu::Queue, uniform: MaterialUniform) {
        self.ubo.update_content(queue, uniform);
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }

    pub fn release(self) {
        self.ubo.release();
    }
}
