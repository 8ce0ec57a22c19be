//! Scene loading
//!
//! Loading happens in two phases. Every atomic asset (OBJ meshes and
//! images) is fetched and decoded as its own future, and all of them are
//! joined before any composite is built. Composites are then constructed in
//! dependency order: materials, models, world objects, and finally the
//! camera entity. Completion order of the atomic loads does not matter.
//!
//! A failed atomic load is logged and leaves its asset absent; anything that
//! referenced it falls back to a default when it is constructed.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use futures::future::{join_all, LocalBoxFuture};
use futures::FutureExt;
use log::{debug, error, info};

use crate::config::CameraConfig;
use crate::error::{AssetError, SceneError};
use crate::gfx::geometry::parse_obj;
use crate::gfx::resources::texture_resource::Texture;
use crate::gfx::scene::description::SceneDescription;
use crate::gfx::scene::mesh::Mesh;
use crate::gfx::scene::scene::Scene;

/// Where asset paths of a scene description are read from
pub trait AssetSource {
    fn load_bytes<'a>(&'a self, path: &'a str) -> LocalBoxFuture<'a, Result<Vec<u8>, AssetError>>;

    fn load_text<'a>(&'a self, path: &'a str) -> LocalBoxFuture<'a, Result<String, AssetError>> {
        async move {
            let bytes = self.load_bytes(path).await?;
            String::from_utf8(bytes).map_err(|_| AssetError::InvalidText(path.to_string()))
        }
        .boxed_local()
    }
}

/// Reads asset paths relative to a root directory
#[derive(Debug, Clone)]
pub struct FileSystemSource {
    root: PathBuf,
}

impl FileSystemSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetSource for FileSystemSource {
    fn load_bytes<'a>(&'a self, path: &'a str) -> LocalBoxFuture<'a, Result<Vec<u8>, AssetError>> {
        let full_path = self.root.join(path);
        async move {
            std::fs::read(&full_path).map_err(|source| AssetError::Io {
                path: full_path,
                source,
            })
        }
        .boxed_local()
    }
}

/// Serves assets from memory, keyed by path
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    entries: HashMap<String, Vec<u8>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(path, bytes);
        self
    }

    pub fn insert(&mut self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.entries.insert(path.into(), bytes.into());
    }
}

impl AssetSource for MemorySource {
    fn load_bytes<'a>(&'a self, path: &'a str) -> LocalBoxFuture<'a, Result<Vec<u8>, AssetError>> {
        let result = self
            .entries
            .get(path)
            .cloned()
            .ok_or_else(|| AssetError::NotFound(path.to_string()));
        futures::future::ready(result).boxed_local()
    }
}

/// Progress counters of a load in flight
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadingState {
    pub current_atomic: usize,
    pub total_atomic: usize,
    pub current_composite: usize,
    pub total_composite: usize,
    pub done: bool,
}

impl LoadingState {
    /// Items loaded so far and items in total, atomic and composite together
    pub fn progress(&self) -> (usize, usize) {
        (
            self.current_atomic + self.current_composite,
            self.total_atomic + self.total_composite,
        )
    }

    pub fn atomics_complete(&self) -> bool {
        self.current_atomic == self.total_atomic
    }
}

enum AtomicAsset {
    Mesh(Mesh),
    Texture(Texture),
}

/// Builds a [`Scene`] from its description
pub struct SceneLoader {
    camera: CameraConfig,
    on_progress: Option<Box<dyn Fn(&LoadingState)>>,
}

impl SceneLoader {
    pub fn new(camera: CameraConfig) -> Self {
        Self {
            camera,
            on_progress: None,
        }
    }

    /// Called after every completed item with the updated counters
    pub fn with_progress(mut self, callback: impl Fn(&LoadingState) + 'static) -> Self {
        self.on_progress = Some(Box::new(callback));
        self
    }

    fn report(&self, state: &LoadingState) {
        if let Some(callback) = &self.on_progress {
            callback(state);
        }
    }

    /// Load every asset of `description` from `source` and assemble the scene
    pub async fn load(
        &self,
        description: &SceneDescription,
        source: &dyn AssetSource,
    ) -> (Scene, LoadingState) {
        let state = RefCell::new(LoadingState {
            total_atomic: description.atomic_count(),
            total_composite: description.composite_count(),
            ..Default::default()
        });
        info!(
            "Loading scene: {} assets, {} composites",
            state.borrow().total_atomic,
            state.borrow().total_composite
        );

        let mesh_loads = description.assets.meshes.iter().map(|record| {
            async move {
                let text = source.load_text(&record.path).await?;
                let mesh = parse_obj(&text)?.into_mesh(record.id.clone(), record.path.clone());
                Ok::<_, AssetError>(AtomicAsset::Mesh(mesh))
            }
            .boxed_local()
        });
        let texture_loads = description.assets.textures.iter().map(|record| {
            async move {
                let bytes = source.load_bytes(&record.path).await?;
                let texture =
                    Texture::decode(record.id.clone(), record.path.clone(), record.kind, &bytes)?;
                Ok::<_, AssetError>(AtomicAsset::Texture(texture))
            }
            .boxed_local()
        });

        let ids = description
            .assets
            .meshes
            .iter()
            .map(|record| (&record.id, &record.path))
            .chain(description.assets.textures.iter().map(|record| (&record.id, &record.path)));

        let tracked = mesh_loads.chain(texture_loads).zip(ids).map(|(load, (id, path))| {
            let state = &state;
            async move {
                let result = load.await;
                match &result {
                    Ok(_) => debug!("Loaded asset '{id}' from '{path}'"),
                    Err(e) => error!("Failed to load asset '{id}' from '{path}': {e}"),
                }
                let snapshot = {
                    let mut state = state.borrow_mut();
                    state.current_atomic += 1;
                    *state
                };
                self.report(&snapshot);
                result
            }
        });

        let results = join_all(tracked).await;

        let mut scene = Scene::new();
        for asset in results.into_iter().flatten() {
            match asset {
                AtomicAsset::Mesh(mesh) => scene.add_mesh(mesh),
                AtomicAsset::Texture(texture) => scene.add_texture(texture),
            }
        }

        self.build_composites(&mut scene, description, &state);
        scene.spawn_camera(&self.camera);

        let mut state = state.into_inner();
        state.done = true;
        self.report(&state);
        info!(
            "Scene ready: {} objects, {} meshes, {} textures",
            scene.world_objects.len(),
            scene.meshes.len(),
            scene.textures.len()
        );
        (scene, state)
    }

    fn build_composites(
        &self,
        scene: &mut Scene,
        description: &SceneDescription,
        state: &RefCell<LoadingState>,
    ) {
        let completed = |state: &RefCell<LoadingState>| {
            let snapshot = {
                let mut state = state.borrow_mut();
                state.current_composite += 1;
                *state
            };
            self.report(&snapshot);
        };

        for record in &description.assets.materials {
            let material = scene.instantiate_material(record);
            scene.add_material(material);
            completed(state);
        }
        for record in &description.assets.models {
            let model = scene.instantiate_model(record);
            scene.add_model(model);
            completed(state);
        }
        for record in &description.world_objects {
            let object = scene.instantiate_world_object(record);
            scene.world_objects.insert(object.id.clone(), object);
            completed(state);
        }
    }
}

/// Read a scene description from disk
pub fn load_scene_file(path: impl AsRef<Path>) -> Result<SceneDescription, SceneError> {
    SceneDescription::from_file(path)
}

/// Read a scene file and load its assets relative to the file's directory
pub fn load_scene_from_path(
    path: impl AsRef<Path>,
    camera: CameraConfig,
) -> Result<Scene, SceneError> {
    let path = path.as_ref();
    let description = load_scene_file(path)?;
    let source = FileSystemSource::new(path.parent().unwrap_or_else(|| Path::new(".")));
    let (scene, _) = pollster::block_on(SceneLoader::new(camera).load(&description, &source));
    Ok(scene)
}

#[cfg(test)]
mod tests {
    use std::pin::Pin;
    use std::rc::Rc;
    use std::task::{Context, Poll};

    use super::*;
    use crate::gfx::resources::texture_resource::TextureKind;
    use crate::gfx::scene::description::{
        MaterialDescription, MeshDescription, ModelDescription, TextureDescription,
        WorldObjectDescription,
    };
    use crate::gfx::scene::scene::CAMERA_ID;

    const TRIANGLE_OBJ: &str = "\
v 0 0 0
v 1 0 0
v 0 1 0
vt 0 0
vt 1 0
vt 0 1
vn 0 0 1
f 1/1/1 2/2/1 3/3/1
";

    /// Pending for a fixed number of polls before resolving
    struct Delay(usize);

    impl std::future::Future for Delay {
        type Output = ();

        fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
            if self.0 == 0 {
                Poll::Ready(())
            } else {
                self.0 -= 1;
                cx.waker().wake_by_ref();
                Poll::Pending
            }
        }
    }

    /// Memory source whose later paths finish first
    struct ReversedSource {
        inner: MemorySource,
        delays: HashMap<String, usize>,
        arrivals: Rc<RefCell<Vec<String>>>,
    }

    impl AssetSource for ReversedSource {
        fn load_bytes<'a>(
            &'a self,
            path: &'a str,
        ) -> LocalBoxFuture<'a, Result<Vec<u8>, AssetError>> {
            let delay = self.delays.get(path).copied().unwrap_or(0);
            async move {
                Delay(delay).await;
                self.arrivals.borrow_mut().push(path.to_string());
                self.inner.load_bytes(path).await
            }
            .boxed_local()
        }
    }

    fn png_bytes() -> Vec<u8> {
        let image = image::RgbaImage::from_pixel(2, 2, image::Rgba([10, 20, 30, 255]));
        let mut bytes = std::io::Cursor::new(Vec::new());
        image
            .write_to(&mut bytes, image::ImageFormat::Png)
            .unwrap();
        bytes.into_inner()
    }

    fn description(mesh_count: usize) -> SceneDescription {
        let mut description = SceneDescription::default();
        for i in 0..mesh_count {
            description.assets.meshes.push(MeshDescription {
                id: format!("mesh{i}"),
                path: format!("meshes/{i}.obj"),
            });
        }
        description.assets.textures.push(TextureDescription {
            id: "brick".to_string(),
            path: "textures/brick.png".to_string(),
            kind: TextureKind::Diffuse,
        });
        description.assets.materials.push(MaterialDescription {
            id: "brickMat".to_string(),
            diffuse_texture: Some("brick".to_string()),
            ..Default::default()
        });
        description.assets.models.push(ModelDescription {
            id: "wall".to_string(),
            mesh: Some("mesh0".to_string()),
            material: Some("brickMat".to_string()),
            ..Default::default()
        });
        let mut object = WorldObjectDescription::new("wall1", "wall");
        object.model = crate::gfx::scene::description::Field::Value("wall".to_string());
        description.world_objects.push(object);
        description
    }

    fn memory_source(mesh_count: usize) -> MemorySource {
        let mut source = MemorySource::new().with_entry("textures/brick.png", png_bytes());
        for i in 0..mesh_count {
            source.insert(format!("meshes/{i}.obj"), TRIANGLE_OBJ);
        }
        source
    }

    #[test]
    fn test_composites_wait_for_out_of_order_loads() {
        let mesh_count = 5;
        let mut delays: HashMap<String, usize> = (0..mesh_count)
            .map(|i| (format!("meshes/{i}.obj"), 2 * (mesh_count - i)))
            .collect();
        delays.insert("textures/brick.png".to_string(), 0);

        let arrivals = Rc::new(RefCell::new(Vec::new()));
        let source = ReversedSource {
            inner: memory_source(mesh_count),
            delays,
            arrivals: arrivals.clone(),
        };

        let (scene, state) = pollster::block_on(
            SceneLoader::new(CameraConfig::default()).load(&description(mesh_count), &source),
        );

        let arrivals = arrivals.borrow();
        assert_eq!(arrivals.len(), mesh_count + 1);
        assert_eq!(arrivals.first().map(String::as_str), Some("textures/brick.png"));
        assert_eq!(arrivals.last().map(String::as_str), Some("meshes/0.obj"));

        assert_eq!(state.current_atomic, mesh_count + 1);
        assert!(state.atomics_complete());
        assert_eq!(state.current_composite, 3);
        assert!(state.done);

        assert_eq!(scene.meshes.len(), mesh_count);
        assert_eq!(scene.models["wall"].mesh.as_deref(), Some("mesh0"));
        assert_eq!(scene.materials["brickMat"].diffuse_texture.as_deref(), Some("brick"));
        assert!(scene.world_objects.contains_key("wall1"));
        assert!(scene.world_objects.contains_key(CAMERA_ID));
    }

    #[test]
    fn test_failed_load_does_not_stall() {
        let mut source = memory_source(1);
        source.entries.remove("textures/brick.png");

        let (scene, state) = pollster::block_on(
            SceneLoader::new(CameraConfig::default()).load(&description(1), &source),
        );

        assert!(state.done);
        assert_eq!(state.current_atomic, 2);
        assert!(scene.textures.is_empty());
        // the material still exists and draws with the default texture
        assert_eq!(scene.materials["brickMat"].diffuse_texture, None);
    }

    #[test]
    fn test_progress_callback_sees_every_item() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let recorder = seen.clone();
        let loader = SceneLoader::new(CameraConfig::default())
            .with_progress(move |state| recorder.borrow_mut().push(state.progress()));

        pollster::block_on(loader.load(&description(2), &memory_source(2)));

        let seen = seen.borrow();
        // 3 atomic + 3 composite completions and the final report
        assert_eq!(seen.len(), 7);
        assert_eq!(seen.last(), Some(&(6, 6)));
        assert!(seen.windows(2).all(|pair| pair[0].0 <= pair[1].0));
    }

    #[test]
    fn test_invalid_text_is_an_error() {
        let source = MemorySource::new().with_entry("bad.obj", vec![0xff, 0xfe]);
        let result = pollster::block_on(source.load_text("bad.obj"));
        assert!(matches!(result, Err(AssetError::InvalidText(_))));
    }
}
