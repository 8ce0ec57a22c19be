use kelpie::config::CameraConfig;
use kelpie::gfx::scene::scene::{CAMERA_ID, DEFAULT_MODEL_ID};
use kelpie::gfx::scene::{Field, MemorySource, ModelRef, Scene, SceneDescription, SceneLoader};

const CUBE_OBJ: &str = "\
v -1 -1 0
v 1 -1 0
v 1 1 0
v -1 1 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
vn 0 0 1
f 1/1/1 2/2/1 3/3/1
f 1/1/1 3/3/1 4/4/1
";

const SCENE: &str = r#"{
    "assets": {
        "meshes": [{ "id": "quad", "path": "meshes/quad.obj" }],
        "textures": [],
        "materials": [{ "id": "stone", "scale": 4, "specularStrength": 0.5 }],
        "models": [
            { "id": "wall", "mesh": "quad", "material": "stone", "recieveShadow": false },
            { "id": "spinner", "animateRot": true, "rotAxis": [1, 0, 0] }
        ]
    },
    "worldObjects": [
        { "id": "wall1", "type": "wall", "model": "wall", "position": [0, 0, -5] },
        { "id": "crate", "type": "prop", "position": [3, 1, 0], "isImmovable": false },
        { "id": "trigger", "type": "volume", "model": "none",
          "AABB": { "minX": -1, "maxX": 1, "minY": 0, "maxY": 2, "minZ": -1, "maxZ": 1 } },
        { "id": "lost", "type": "prop", "model": "nonexistent" }
    ]
}"#;

fn load(description: &SceneDescription) -> Scene {
    let source = MemorySource::new().with_entry("meshes/quad.obj", CUBE_OBJ);
    let (scene, state) =
        pollster::block_on(SceneLoader::new(CameraConfig::default()).load(description, &source));
    assert!(state.done);
    scene
}

#[test]
fn export_then_import_preserves_objects_and_bindings() {
    let original = load(&SceneDescription::from_json(SCENE).unwrap());

    let json = original.to_description().to_json_pretty().unwrap();
    let reloaded = load(&SceneDescription::from_json(&json).unwrap());

    let ids = |scene: &Scene| -> Vec<String> {
        scene
            .world_objects
            .keys()
            .filter(|id| id.as_str() != CAMERA_ID)
            .cloned()
            .collect()
    };
    assert_eq!(ids(&original), ids(&reloaded));

    for (id, object) in &original.world_objects {
        let copy = &reloaded.world_objects[id];
        assert_eq!(object.position, copy.position, "position of {id}");
        assert_eq!(object.model, copy.model, "model of {id}");
        assert_eq!(object.aabb, copy.aabb, "box of {id}");
        assert_eq!(object.is_immovable, copy.is_immovable, "immovability of {id}");
    }

    assert_eq!(original.models["wall"].mesh, reloaded.models["wall"].mesh);
    assert_eq!(original.models["wall"].material, reloaded.models["wall"].material);
    assert_eq!(original.models["spinner"], reloaded.models["spinner"]);
    assert_eq!(original.materials["stone"], reloaded.materials["stone"]);
    assert_eq!(original.meshes["quad"].vertices, reloaded.meshes["quad"].vertices);
}

#[test]
fn export_uses_none_sentinels_and_skips_camera() {
    let scene = load(&SceneDescription::from_json(SCENE).unwrap());
    let exported = scene.to_description();

    assert!(exported.world_objects.iter().all(|object| object.id != CAMERA_ID));
    let trigger = exported
        .world_objects
        .iter()
        .find(|object| object.id == "trigger")
        .unwrap();
    assert_eq!(trigger.model, Field::None);

    let json: serde_json::Value =
        serde_json::from_str(&exported.to_json_pretty().unwrap()).unwrap();
    let models = json["assets"]["models"].as_array().unwrap();
    assert!(models.iter().any(|model| model["recieveShadow"] == false));
}

#[test]
fn nonexistent_model_resolves_to_default() {
    let scene = load(&SceneDescription::from_json(SCENE).unwrap());
    let lost = &scene.world_objects["lost"];

    assert_eq!(lost.model, Some(ModelRef::Default));
    assert_eq!(scene.model_for(lost).unwrap().id, DEFAULT_MODEL_ID);
    assert!(lost.aabb.is_some());
}

#[test]
fn missing_mesh_falls_back_without_failing() {
    let description = SceneDescription::from_json(SCENE).unwrap();
    let (scene, state) = pollster::block_on(
        SceneLoader::new(CameraConfig::default()).load(&description, &MemorySource::new()),
    );

    assert!(state.done);
    assert!(scene.meshes.is_empty());
    // the model lost its mesh and draws the default box
    assert_eq!(scene.models["wall"].mesh, None);
    assert!(scene.world_objects["wall1"].aabb.is_some());
}

#[test]
fn demo_scene_loads_from_disk_and_settles() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("scenes/demo/scene.json");
    let mut engine = kelpie::Engine::default();
    let state = engine.load_scene_file(&path).unwrap();

    assert!(state.done);
    assert_eq!(state.current_atomic, 1);
    assert_eq!(state.total_atomic, 1);
    assert_eq!(engine.scene.mesh("pyramid").unwrap().triangle_count(), 6);

    let start = engine.scene.world_objects["box"].position.y;
    for _ in 0..240 {
        engine.frame(1.0 / 60.0);
    }
    let box_y = engine.scene.world_objects["box"].position.y;
    assert!(box_y < start);
    assert!(box_y > 0.0);
}
