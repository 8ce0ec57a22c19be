use std::cell::RefCell;
use std::collections::HashMap;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use futures::future::LocalBoxFuture;
use futures::FutureExt;
use kelpie::config::CameraConfig;
use kelpie::error::AssetError;
use kelpie::gfx::geometry::parse_obj;
use kelpie::gfx::scene::description::{MeshDescription, ModelDescription};
use kelpie::gfx::scene::{AssetSource, MemorySource, SceneDescription, SceneLoader};
use rand::seq::SliceRandom;

const TRIANGLE_OBJ: &str = "\
v 0 0 0
v 2 0 0
v 0 3 0
vt 0 0
vt 1 0
vt 0 1
vn 0 0 1
f 1/1/1 2/2/1 3/3/1
";

struct Yield(usize);

impl std::future::Future for Yield {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.0 == 0 {
            return Poll::Ready(());
        }
        self.0 -= 1;
        cx.waker().wake_by_ref();
        Poll::Pending
    }
}

/// Finishes each path after its own number of polls
struct ShuffledSource {
    inner: MemorySource,
    delays: HashMap<String, usize>,
    completed: Rc<RefCell<Vec<String>>>,
}

impl AssetSource for ShuffledSource {
    fn load_bytes<'a>(&'a self, path: &'a str) -> LocalBoxFuture<'a, Result<Vec<u8>, AssetError>> {
        async move {
            Yield(self.delays.get(path).copied().unwrap_or(0)).await;
            self.completed.borrow_mut().push(path.to_string());
            self.inner.load_bytes(path).await
        }
        .boxed_local()
    }
}

#[test]
fn composites_wait_for_every_atomic_load_in_any_order() {
    let count = 12;
    let mut rng = rand::rng();
    let mut delays: Vec<usize> = (0..count).collect();
    delays.shuffle(&mut rng);

    let mut description = SceneDescription::default();
    let mut inner = MemorySource::new();
    let mut delay_map = HashMap::new();
    for (i, delay) in delays.into_iter().enumerate() {
        let path = format!("meshes/{i}.obj");
        description.assets.meshes.push(MeshDescription {
            id: format!("mesh{i}"),
            path: path.clone(),
        });
        description.assets.models.push(ModelDescription {
            id: format!("model{i}"),
            mesh: Some(format!("mesh{i}")),
            ..Default::default()
        });
        inner.insert(path.clone(), TRIANGLE_OBJ);
        delay_map.insert(path, delay);
    }

    let completed = Rc::new(RefCell::new(Vec::new()));
    let source = ShuffledSource {
        inner,
        delays: delay_map,
        completed: completed.clone(),
    };

    let (scene, state) = pollster::block_on(
        SceneLoader::new(CameraConfig::default()).load(&description, &source),
    );

    assert_eq!(completed.borrow().len(), count);
    assert_eq!(state.current_atomic, count);
    assert_eq!(state.current_composite, count);
    assert!(state.done);

    // every model found its mesh, so none was built before its mesh arrived
    for i in 0..count {
        assert_eq!(
            scene.models[&format!("model{i}")].mesh.as_deref(),
            Some(format!("mesh{i}").as_str())
        );
    }
}

#[test]
fn obj_parse_is_idempotent() {
    let first = parse_obj(TRIANGLE_OBJ).unwrap();
    let second = parse_obj(TRIANGLE_OBJ).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.vertex_count(), 3);
    assert_eq!(first.indices, vec![0, 1, 2]);
}
