//! Error types for the Kelpie engine
//!
//! Each subsystem reports failures through its own enum. Missing optional
//! scene components are not errors; they resolve to defaults and are logged.

use std::path::PathBuf;

/// Failures while reading an OBJ mesh
#[derive(thiserror::Error, Debug)]
pub enum ObjError {
    #[error("OBJ load error: {0}")]
    Load(#[from] tobj::LoadError),

    #[error("OBJ mesh has no vertex data")]
    Empty,

    #[error("OBJ mesh is missing {0}; faces must reference v/vt/vn triplets")]
    MissingAttribute(&'static str),
}

/// Failures while fetching or decoding an atomic asset
#[derive(thiserror::Error, Debug)]
pub enum AssetError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("asset '{0}' not found")]
    NotFound(String),

    #[error("asset '{0}' is not valid UTF-8")]
    InvalidText(String),

    #[error("failed to decode image: {0}")]
    Image(#[from] image::ImageError),

    #[error("failed to parse mesh: {0}")]
    Mesh(#[from] ObjError),
}

/// Failures while reading or writing a scene description
#[derive(thiserror::Error, Debug)]
pub enum SceneError {
    #[error("failed to read scene file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid scene description: {0}")]
    Json(#[from] serde_json::Error),
}

/// Fatal rendering failures surfaced at startup or per frame
#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no compatible GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to acquire GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("surface reports no supported formats")]
    NoSurfaceFormat,

    #[error("pipeline creation failed: {}", .0.join("; "))]
    Pipelines(Vec<String>),

    #[error("pipeline '{0}' is not available")]
    MissingPipeline(&'static str),

    #[error("failed to acquire frame: {0}")]
    Frame(#[from] wgpu::SurfaceError),
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}
