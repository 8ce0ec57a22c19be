// src/lib.rs
//! Kelpie 3D Engine
//!
//! A small real-time scene engine built on wgpu and winit. Scenes are loaded
//! from JSON descriptions, simulated with axis-aligned box dynamics and drawn
//! with a forward renderer lit by a single shadow-casting light.
//!
//! The simulation side ([`Engine`]) runs without a window or GPU; [`KelpieApp`]
//! adds the window, input and renderer.

pub mod app;
pub mod config;
pub mod engine;
pub mod error;
pub mod gfx;
pub mod physics;
pub mod prelude;
pub mod spatial;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::KelpieApp;
pub use config::{Config, EngineConfig};
pub use engine::Engine;

/// Creates a Kelpie application with default settings and no scene
pub fn default() -> KelpieApp {
    KelpieApp::new(EngineConfig::default(), None)
}
