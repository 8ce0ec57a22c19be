//! # Kelpie Prelude
//!
//! Commonly used types in one import:
//!
//! ```no_run
//! use kelpie::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = EngineConfig::default();
//!     KelpieApp::new(config, Some("scenes/demo/scene.json".into())).run()
//! }
//! ```

pub use crate::app::KelpieApp;
pub use crate::config::{
    CameraConfig, Config, ControllerConfig, EngineConfig, PhysicsConfig, RenderConfig,
    ShadowSettings,
};
pub use crate::engine::Engine;
pub use crate::error::{AssetError, ConfigError, ObjError, RenderError, SceneError};
pub use crate::gfx::camera::{Camera, Controller, InputState};
pub use crate::gfx::picking::PickResult;
pub use crate::gfx::rendering::{FramePlan, RenderEngine};
pub use crate::gfx::scene::{
    AssetSource, Field, FileSystemSource, LoadingState, MemorySource, Model, Scene,
    SceneDescription, SceneLoader, WorldObject,
};
pub use crate::physics::PhysicsEngine;
pub use crate::spatial::{Bounds, Ray};

pub use cgmath::{Vector3, Zero};
