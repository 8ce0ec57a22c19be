//! WGPU-based rendering engine
//!
//! Executes a [`FramePlan`] in three steps: a depth-only pass from the light
//! into a square shadow map, a lit forward pass into the surface, and the
//! bounding box overlay drawn as colored lines on top of the lit pass.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use log::{debug, info};
use wgpu::util::DeviceExt;

use crate::config::{RenderConfig, ShadowSettings};
use crate::error::RenderError;
use crate::gfx::{
    resources::{
        global_bindings::{update_global_ubo, GlobalBindings, GlobalUBO, ShadowBindings},
        material::{GpuMaterial, MaterialBindings},
        object_bindings::{GpuObject, ObjectBindings, ObjectUniform},
        texture_resource::TextureResource,
    },
    scene::{LineVertex, Scene},
};

use super::frame_plan::{FramePlan, ObjectDraw};
use super::gpu_cache::{GpuMeshCache, GpuTextureCache};
use super::pipeline_manager::{PipelineConfig, PipelineManager};
use super::render_pass_ext::RenderPassExt;

const SHADOW_PIPELINE: &str = "shadow";
const MAIN_PIPELINE: &str = "main";
const AABB_PIPELINE: &str = "aabb";

/// Growable vertex buffer for the overlay lines
struct LineBuffer {
    buffer: wgpu::Buffer,
    capacity: usize,
}

/// Core rendering engine managing GPU resources and draw calls
///
/// The RenderEngine handles all low-level graphics operations including:
/// - Surface and device management
/// - Pipeline creation
/// - Depth and shadow map targets
/// - Lazily uploaded, explicitly released scene resources
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    clear_color: wgpu::Color,
    depth_texture: TextureResource,
    pipeline_manager: PipelineManager,

    global_ubo: GlobalUBO,
    global_bindings: GlobalBindings,
    shadow_map: TextureResource,
    shadow_bindings: ShadowBindings,
    object_bindings: ObjectBindings,
    material_bindings: MaterialBindings,

    meshes: GpuMeshCache,
    textures: GpuTextureCache,
    materials: HashMap<String, GpuMaterial>,
    objects: HashMap<String, GpuObject>,
    lines: Option<LineBuffer>,
    /// Generation of the scene the caches belong to
    bound_scene: Option<u64>,
}

impl RenderEngine {
    /// Creates a new render engine for the given window
    ///
    /// Initializes wgpu, creates the depth buffer and shadow map, and builds
    /// every pipeline. Shader or pipeline problems are returned here rather
    /// than discovered mid-frame.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        render: &RenderConfig,
        shadow: &ShadowSettings,
    ) -> Result<RenderEngine, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        info!("Using adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: shadow.resolution.max(4096),
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or(RenderError::NoSurfaceFormat)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: if render.vsync {
                wgpu::PresentMode::Fifo
            } else {
                wgpu::PresentMode::Immediate
            },
            alpha_mode: surface_capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture =
            TextureResource::create_depth_texture(&device, &config, "depth_texture");
        let shadow_map = TextureResource::create_shadow_map(&device, shadow.resolution);

        let global_ubo = GlobalUBO::new(&device);
        let global_bindings = GlobalBindings::new(&device, &global_ubo);
        let shadow_bindings = ShadowBindings::new(&device, &shadow_map);
        let object_bindings = ObjectBindings::new(&device);
        let material_bindings = MaterialBindings::new(&device);

        let device: Arc<wgpu::Device> = device.into();
        let queue: Arc<wgpu::Queue> = queue.into();
        let mut pipeline_manager = PipelineManager::new(device.clone());

        let shader_errors: Vec<String> = [
            (MAIN_PIPELINE, include_str!("shaders/main.wgsl")),
            (SHADOW_PIPELINE, include_str!("shaders/shadow.wgsl")),
            (AABB_PIPELINE, include_str!("shaders/aabb.wgsl")),
        ]
        .into_iter()
        .filter_map(|(name, source)| pipeline_manager.load_shader(name, source).err())
        .collect();
        if !shader_errors.is_empty() {
            return Err(RenderError::Pipelines(shader_errors));
        }

        // Both faces go into the shadow map to avoid light leaking through thin geometry
        pipeline_manager.register_pipeline(
            SHADOW_PIPELINE,
            PipelineConfig::default()
                .with_label("Shadow")
                .with_shader(SHADOW_PIPELINE)
                .with_depth(TextureResource::DEPTH_FORMAT, wgpu::CompareFunction::Less)
                .with_cull_mode(None)
                .with_vertex_only()
                .with_bind_group_layouts(vec![
                    global_bindings.bind_group_layout().clone(),
                    object_bindings.bind_group_layout().clone(),
                ]),
        );

        pipeline_manager.register_pipeline(
            MAIN_PIPELINE,
            PipelineConfig::default()
                .with_label("Main")
                .with_shader(MAIN_PIPELINE)
                .with_depth(TextureResource::DEPTH_FORMAT, wgpu::CompareFunction::Less)
                .with_color_format(format)
                .with_bind_group_layouts(vec![
                    global_bindings.bind_group_layout().clone(),
                    object_bindings.bind_group_layout().clone(),
                    material_bindings.bind_group_layout().clone(),
                    shadow_bindings.bind_group_layout().clone(),
                ]),
        );

        pipeline_manager.register_pipeline(
            AABB_PIPELINE,
            PipelineConfig::default()
                .with_label("AABB Overlay")
                .with_shader(AABB_PIPELINE)
                .with_vertex_layout(LineVertex::desc())
                .with_primitive_topology(wgpu::PrimitiveTopology::LineList)
                .with_cull_mode(None)
                .with_depth(TextureResource::DEPTH_FORMAT, wgpu::CompareFunction::LessEqual)
                .with_color_format(format)
                .with_bind_group_layouts(vec![global_bindings.bind_group_layout().clone()]),
        );

        pipeline_manager
            .create_all_pipelines()
            .map_err(RenderError::Pipelines)?;
        debug!("Pipelines ready: {:?}", pipeline_manager.get_stats());

        let [r, g, b, a] = render.clear_color;
        Ok(RenderEngine {
            surface,
            device,
            queue,
            config,
            clear_color: wgpu::Color { r, g, b, a },
            depth_texture,
            pipeline_manager,
            global_ubo,
            global_bindings,
            shadow_map,
            shadow_bindings,
            object_bindings,
            material_bindings,
            meshes: GpuMeshCache::default(),
            textures: GpuTextureCache::default(),
            materials: HashMap::new(),
            objects: HashMap::new(),
            lines: None,
            bound_scene: None,
        })
    }

    /// Make `scene` the source of cached resources.
    ///
    /// Switching to a different scene destroys every buffer and texture
    /// uploaded for the previous one.
    pub fn bind_scene(&mut self, scene: &Scene) {
        if self.bound_scene == Some(scene.generation()) {
            return;
        }
        if self.bound_scene.is_some() {
            info!(
                "Releasing GPU resources of previous scene ({} meshes, {} textures)",
                self.meshes.len(),
                self.textures.len()
            );
        }
        self.release_scene_resources();
        self.bound_scene = Some(scene.generation());
    }

    /// Destroy every cached scene resource now
    pub fn release_scene_resources(&mut self) {
        self.meshes.clear();
        self.textures.clear();
        for (_, material) in self.materials.drain() {
            material.release();
        }
        for (_, object) in self.objects.drain() {
            object.release();
        }
        self.bound_scene = None;
    }

    /// Upload what the plan needs and refresh per-object and material uniforms
    fn prepare(&mut self, scene: &Scene, plan: &FramePlan) {
        let mut planned = HashSet::new();

        for draw in &plan.objects {
            planned.insert(draw.object_id.as_str());
            self.meshes.ensure(&self.device, scene, &draw.mesh_id);
            self.textures
                .ensure(&self.device, &self.queue, scene, &draw.diffuse_texture);
            self.textures
                .ensure(&self.device, &self.queue, scene, &draw.normal_texture);
            self.prepare_material(draw);

            let object = self
                .objects
                .entry(draw.object_id.clone())
                .or_insert_with(|| {
                    GpuObject::new(&self.device, &self.object_bindings, &draw.object_id)
                });
            object.update(&self.queue, ObjectUniform::from_draw(draw));
        }

        let stale: Vec<String> = self
            .objects
            .keys()
            .filter(|id| !planned.contains(id.as_str()))
            .cloned()
            .collect();
        for id in stale {
            if let Some(object) = self.objects.remove(&id) {
                object.release();
            }
        }
    }

    fn prepare_material(&mut self, draw: &ObjectDraw) {
        let (Some(diffuse), Some(normal)) = (
            self.textures.get(&draw.diffuse_texture),
            self.textures.get(&draw.normal_texture),
        ) else {
            return;
        };

        let up_to_date = self
            .materials
            .get(&draw.material_id)
            .is_some_and(|material| {
                material.uses_textures(&draw.diffuse_texture, &draw.normal_texture)
            });
        if !up_to_date {
            let material = GpuMaterial::new(
                &self.device,
                &self.material_bindings,
                &draw.material_id,
                (&draw.diffuse_texture, diffuse),
                (&draw.normal_texture, normal),
            );
            if let Some(previous) = self.materials.insert(draw.material_id.clone(), material) {
                previous.release();
            }
        }

        if let Some(material) = self.materials.get_mut(&draw.material_id) {
            material.update(&self.queue, draw.material);
        }
    }

    /// Upload the overlay lines, returning how many vertices to draw
    fn prepare_lines(&mut self, plan: &FramePlan) -> u32 {
        let vertices: Vec<LineVertex> = plan
            .wireframes
            .iter()
            .flat_map(|wireframe| wireframe.vertices)
            .collect();
        if vertices.is_empty() {
            return 0;
        }

        match &self.lines {
            Some(lines) if lines.capacity >= vertices.len() => {
                self.queue
                    .write_buffer(&lines.buffer, 0, bytemuck::cast_slice(&vertices));
            }
            _ => {
                if let Some(previous) = self.lines.take() {
                    previous.buffer.destroy();
                }
                let buffer = self
                    .device
                    .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("AABB Line Buffer"),
                        contents: bytemuck::cast_slice(&vertices),
                        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                    });
                self.lines = Some(LineBuffer {
                    buffer,
                    capacity: vertices.len(),
                });
            }
        }
        vertices.len() as u32
    }

    /// Renders one frame of `scene` as described by `plan`
    pub fn render_frame(&mut self, scene: &Scene, plan: &FramePlan) -> Result<(), RenderError> {
        self.bind_scene(scene);
        self.prepare(scene, plan);
        let line_count = self.prepare_lines(plan);
        update_global_ubo(&mut self.global_ubo, &self.queue, plan);

        let shadow_pipeline = self
            .pipeline_manager
            .pipeline(SHADOW_PIPELINE)
            .ok_or(RenderError::MissingPipeline(SHADOW_PIPELINE))?;
        let main_pipeline = self
            .pipeline_manager
            .pipeline(MAIN_PIPELINE)
            .ok_or(RenderError::MissingPipeline(MAIN_PIPELINE))?;
        let aabb_pipeline = self
            .pipeline_manager
            .pipeline(AABB_PIPELINE)
            .ok_or(RenderError::MissingPipeline(AABB_PIPELINE))?;

        let surface_texture = self.surface.get_current_texture()?;
        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        // PASS 1: Shadow depth from the light
        {
            let mut shadow_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Shadow Depth Pass"),
                color_attachments: &[],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.shadow_map.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            shadow_pass.set_pipeline(shadow_pipeline);
            shadow_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);

            for draw in plan.shadow_casters() {
                let (Some(object), Some(mesh)) =
                    (self.objects.get(&draw.object_id), self.meshes.get(&draw.mesh_id))
                else {
                    continue;
                };
                shadow_pass.set_bind_group(1, object.bind_group(), &[]);
                shadow_pass.draw_mesh(mesh);
            }
        }

        // PASS 2: Lit forward pass, then the overlay on the same targets
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_pipeline(main_pipeline);
            render_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);
            render_pass.set_bind_group(3, self.shadow_bindings.bind_group(), &[]);

            for draw in plan.visible() {
                let (Some(object), Some(material), Some(mesh)) = (
                    self.objects.get(&draw.object_id),
                    self.materials.get(&draw.material_id),
                    self.meshes.get(&draw.mesh_id),
                ) else {
                    continue;
                };
                render_pass.set_bind_group(1, object.bind_group(), &[]);
                render_pass.set_bind_group(2, material.bind_group(), &[]);
                render_pass.draw_mesh(mesh);
            }

            if let Some(lines) = self.lines.as_ref().filter(|_| line_count > 0) {
                render_pass.set_pipeline(aabb_pipeline);
                render_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);
                render_pass.set_vertex_buffer(0, lines.buffer.slice(..));
                render_pass.draw(0..line_count, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        Ok(())
    }

    /// Resizes the surface and recreates the depth buffer.
    ///
    /// Zero-sized requests (minimized windows) are ignored. The shadow map
    /// keeps its fixed resolution.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);

        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
    }

    /// Reconfigure the surface at its current size, e.g. after it was lost
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }
}

