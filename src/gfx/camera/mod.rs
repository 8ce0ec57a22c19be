//! # Camera and Controller
//!
//! The camera is a lens ([`Camera`]) looking out of a world object; the
//! [`Controller`] steers whichever object it possesses, and [`InputState`]
//! collects winit input between frames.

pub mod camera_controller;
pub mod camera_utils;

// Re-export main types
pub use camera_controller::{Controller, InputState};
pub use camera_utils::{Camera, CameraUniform, OPENGL_TO_WGPU_MATRIX};
