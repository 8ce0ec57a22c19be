//! # Vertex Data Structures
//!
//! GPU-compatible vertex formats shared by the shadow pass, the lit forward
//! pass and the AABB overlay.

/// A mesh vertex carrying everything the lit pass needs for normal mapping.
///
/// # Memory Layout
///
/// The `#[repr(C)]` attribute keeps the field order and packing that
/// [`Vertex3D::desc`] describes to the GPU.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex3D {
    /// Model-space position [x, y, z]
    pub position: [f32; 3],
    /// Model-space normal [nx, ny, nz]
    pub normal: [f32; 3],
    /// Texture coordinate [u, v]
    pub tex_coords: [f32; 2],
    /// Tangent along increasing u, not normalized
    pub tangent: [f32; 3],
    /// Bitangent along increasing v, not normalized
    pub bitangent: [f32; 3],
}

impl Vertex3D {
    /// Returns the vertex buffer layout for wgpu rendering.
    ///
    /// - Attribute 0: Position (Float32x3)
    /// - Attribute 1: Normal (Float32x3)
    /// - Attribute 2: Texture coordinate (Float32x2)
    /// - Attribute 3: Tangent (Float32x3)
    /// - Attribute 4: Bitangent (Float32x3)
    ///
    /// The shadow pass binds the same layout and only reads location 0.
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        const VEC3: wgpu::BufferAddress = mem::size_of::<[f32; 3]>() as wgpu::BufferAddress;
        const VEC2: wgpu::BufferAddress = mem::size_of::<[f32; 2]>() as wgpu::BufferAddress;

        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<Vertex3D>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: VEC3,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: VEC3 * 2,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: VEC3 * 2 + VEC2,
                    shader_location: 3,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: VEC3 * 3 + VEC2,
                    shader_location: 4,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// A colored line vertex for the AABB wireframe overlay
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl LineVertex {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<LineVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}
