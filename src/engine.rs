//! # Engine Loop
//!
//! [`Engine`] owns the simulated world and advances it one frame at a time
//! without a window or GPU. The windowed shell in [`crate::app`] drives it and
//! renders the [`FramePlan`] each frame returns.
//!
//! Frame order:
//!
//! 1. drain held keys and mouse motion into the controller
//! 2. one physics tick
//! 3. ray cast from the controlled object along its front vector
//! 4. build the frame plan
//! 5. advance the animation clock

use std::path::Path;

use log::{debug, info};

use crate::config::EngineConfig;
use crate::error::SceneError;
use crate::gfx::camera::{Controller, InputState};
use crate::gfx::picking::{cast_ray, pick_at_screen, PickResult};
use crate::gfx::rendering::FramePlan;
use crate::gfx::scene::scene::CAMERA_ID;
use crate::gfx::scene::{
    load_scene_file, AssetSource, FileSystemSource, LoadingState, Scene, SceneDescription,
    SceneLoader, SceneStatistics,
};
use crate::physics::PhysicsEngine;

pub struct Engine {
    pub config: EngineConfig,
    pub scene: Scene,
    pub physics: PhysicsEngine,
    pub controller: Controller,
    pub input: InputState,
    /// Seconds since the engine started, drives model animation
    pub time: f32,
    pub delta_time: f32,
    /// What the controlled object looked at during the last frame
    pub looking_at: Option<PickResult>,
    loading: LoadingState,
}

impl Engine {
    /// An engine with an empty scene holding only the camera entity
    pub fn new(config: EngineConfig) -> Self {
        let mut scene = Scene::new();
        scene.spawn_camera(&config.camera);

        let mut controller = Controller::new(&config.controller);
        controller.possess(&mut scene, CAMERA_ID);

        Self {
            physics: PhysicsEngine::new(&config.physics),
            config,
            scene,
            controller,
            input: InputState::new(),
            time: 0.0,
            delta_time: 0.0,
            looking_at: None,
            loading: LoadingState {
                done: true,
                ..Default::default()
            },
        }
    }

    /// Replace the current scene with one loaded from `description`.
    ///
    /// Blocks until every asset has been attempted. The controller possesses
    /// the new camera entity.
    pub fn load_scene(
        &mut self,
        description: &SceneDescription,
        source: &dyn AssetSource,
    ) -> LoadingState {
        let loader = SceneLoader::new(self.config.camera);
        let (mut scene, state) = pollster::block_on(loader.load(description, source));
        scene.camera.aspect = self.scene.camera.aspect;

        self.controller.release(&mut self.scene);
        self.scene = scene;
        self.controller.possess(&mut self.scene, CAMERA_ID);
        self.looking_at = None;
        self.loading = state;
        state
    }

    /// Load a scene file, resolving asset paths against its directory
    pub fn load_scene_file(&mut self, path: impl AsRef<Path>) -> Result<LoadingState, SceneError> {
        let path = path.as_ref();
        info!("Loading scene file {}", path.display());
        let description = load_scene_file(path)?;
        let source = FileSystemSource::new(path.parent().unwrap_or_else(|| Path::new(".")));
        Ok(self.load_scene(&description, &source))
    }

    /// Advance one frame of `dt` seconds and plan its rendering
    pub fn frame(&mut self, dt: f32) -> FramePlan {
        self.delta_time = dt;

        self.input.drain(&self.controller, &mut self.scene, dt);
        self.physics.update(&mut self.scene);

        self.looking_at = self
            .controller
            .target()
            .and_then(|id| cast_ray(&self.scene, id));

        let plan = FramePlan::build(&self.scene, &self.config.shadow, self.time);
        self.time += dt;
        plan
    }

    /// Select the object under a screen position, or clear the selection
    pub fn pick(&mut self, screen_pos: (f32, f32), screen_size: (f32, f32)) -> Option<String> {
        let picked = pick_at_screen(&self.scene, screen_pos, screen_size).map(|hit| hit.object_id);
        self.scene.select(picked.as_deref());
        debug!("Picked {picked:?}");
        picked
    }

    /// Select what the controlled object is looking at
    pub fn select_looked_at(&mut self) -> Option<String> {
        let id = self.looking_at.as_ref().map(|hit| hit.object_id.clone());
        self.scene.select(id.as_deref());
        id
    }

    /// Show or hide every bounding box wireframe
    pub fn set_aabb_overlay(&mut self, visible: bool) {
        for object in self.scene.world_objects.values_mut() {
            if let Some(aabb) = object.aabb.as_mut() {
                aabb.render = visible;
            }
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.scene.camera.resize(width, height);
    }

    pub fn export_scene(&self) -> SceneDescription {
        self.scene.to_description()
    }

    pub fn export_json(&self) -> Result<String, SceneError> {
        self.export_scene().to_json_pretty()
    }

    pub fn loading_state(&self) -> LoadingState {
        self.loading
    }

    pub fn statistics(&self) -> SceneStatistics {
        self.scene.get_statistics()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
