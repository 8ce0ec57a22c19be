//! # Graphics Module
//!
//! Everything between a scene description and pixels: the scene graph and
//! its asset pools, geometry import, camera and controller, picking, and the
//! wgpu renderer.
//!
//! ## Architecture Overview
//!
//! - **Scene** ([`scene`]) - World objects, asset pools, JSON import/export, loading
//! - **Geometry** ([`geometry`]) - OBJ parsing and the built-in box mesh
//! - **Camera System** ([`camera`]) - Possessing controller and perspective camera
//! - **Picking** ([`picking`]) - Ray casts against world-space bounding boxes
//! - **Rendering Pipeline** ([`rendering`]) - Shadow depth pass, lit forward pass, AABB overlay
//! - **Resource Management** ([`resources`]) - Materials, textures, and bind groups
//!
//! Nothing outside [`rendering`] and [`resources`] touches the GPU, so scenes
//! can be loaded, simulated and planned headless.

pub mod camera;
pub mod geometry;
pub mod picking;
pub mod rendering;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use camera::{Camera, Controller, InputState};
pub use rendering::{FramePlan, RenderEngine};
pub use scene::{Scene, SceneDescription, WorldObject};
