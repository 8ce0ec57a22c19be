//! # Scene Management Module
//!
//! World objects, the asset pools they reference, and the description format
//! scenes are loaded from and exported to.
//!
//! ## Key Components
//!
//! - [`Scene`] - Owns world objects, meshes, textures, materials and models
//! - [`WorldObject`] - A simulated entity with an optional model and bounding box
//! - [`SceneDescription`] - The JSON scene format
//! - [`SceneLoader`] - Loads every atomic asset before building composites
//!
//! References between records are resolved through [`resolve_reference`];
//! anything missing falls back to the scene's built-in defaults.

pub mod description;
pub mod loader;
pub mod mesh;
pub mod model;
pub mod object;
pub mod scene;
pub mod vertex;

// Re-export main types
pub use description::{Field, SceneDescription};
pub use loader::{
    load_scene_file, load_scene_from_path, AssetSource, FileSystemSource, LoadingState,
    MemorySource, SceneLoader,
};
pub use mesh::Mesh;
pub use model::{Animation, Model, RenderSettings};
pub use object::{Aabb, ModelRef, WorldObject};
pub use scene::{resolve_reference, Resolved, Scene, SceneStatistics};
pub use vertex::{LineVertex, Vertex3D};
