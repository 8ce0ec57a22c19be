// src/gfx/resources/mod.rs
//! GPU resource management
//!
//! Handles textures, uniform buffers, and bind groups for rendering.

pub mod global_bindings;
pub mod material;
pub mod object_bindings;
pub mod texture_resource;

// Re-export main types
pub use global_bindings::{update_global_ubo, GlobalBindings, GlobalUBO, ShadowBindings};
pub use material::{GpuMaterial, Material, MaterialBindings};
pub use object_bindings::{GpuObject, ObjectBindings, ObjectUniform};
pub use texture_resource::{Texture, TextureKind, TextureResource};
