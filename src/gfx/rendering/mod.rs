// src/gfx/rendering/mod.rs
//! Core rendering functionality
//!
//! [`FramePlan`] turns a scene into per-object draw data without touching the
//! GPU. [`RenderEngine`] uploads what a plan needs and executes it.

pub mod frame_plan;
pub mod gpu_cache;
pub mod pipeline_manager;
pub mod render_engine;
pub mod render_pass_ext;

// Re-export main types
pub use frame_plan::{FramePlan, LightSpace, ObjectDraw, Wireframe, HIGHLIGHT_COLOR};
pub use gpu_cache::{GpuMesh, GpuMeshCache, GpuTextureCache};
pub use pipeline_manager::{PipelineConfig, PipelineManager, PipelineStats};
pub use render_engine::RenderEngine;
