use cgmath::Vector3;
use kelpie::config::PhysicsConfig;
use kelpie::gfx::scene::{Scene, WorldObject};
use kelpie::physics::PhysicsEngine;
use kelpie::spatial::{intersect_ray_aabb, overlap_with_penetration, world_bounds, Bounds};
use rand::Rng;

fn random_bounds(rng: &mut impl Rng) -> Bounds {
    let mut axis = || {
        let a: f32 = rng.random_range(-10.0..10.0);
        let b: f32 = rng.random_range(-10.0..10.0);
        (a.min(b), a.max(b))
    };
    let (min_x, max_x) = axis();
    let (min_y, max_y) = axis();
    let (min_z, max_z) = axis();
    Bounds::new(min_x, max_x, min_y, max_y, min_z, max_z)
}

fn random_point(rng: &mut impl Rng) -> Vector3<f32> {
    Vector3::new(
        rng.random_range(-20.0..20.0),
        rng.random_range(-20.0..20.0),
        rng.random_range(-20.0..20.0),
    )
}

#[test]
fn world_bounds_is_a_translation() {
    let mut rng = rand::rng();
    for _ in 0..200 {
        let bounds = random_bounds(&mut rng);
        let offset = random_point(&mut rng);
        let world = world_bounds(&bounds, offset);

        assert!(world.min_x <= world.max_x);
        assert!(world.min_y <= world.max_y);
        assert!(world.min_z <= world.max_z);
        assert_eq!(world.min_x, bounds.min_x + offset.x);
        assert_eq!(world.max_z, bounds.max_z + offset.z);
    }
}

#[test]
fn overlap_is_symmetric() {
    let mut rng = rand::rng();
    for _ in 0..200 {
        let a = random_bounds(&mut rng);
        let b = random_bounds(&mut rng);
        let ab = overlap_with_penetration(&a, &b);
        let ba = overlap_with_penetration(&b, &a);

        assert_eq!(ab.colliding, ba.colliding);
        let sum = ab.penetration + ba.penetration;
        assert!(sum.x.abs() < 1e-4 && sum.y.abs() < 1e-4 && sum.z.abs() < 1e-4);
    }
}

#[test]
fn ray_from_inside_hits_along_every_axis() {
    let bounds = Bounds::new(-1.0, 1.0, -2.0, 2.0, -3.0, 3.0);
    let origin = Vector3::new(0.2, -0.5, 1.0);
    let axes = [
        Vector3::unit_x(),
        Vector3::unit_y(),
        Vector3::unit_z(),
        -Vector3::unit_x(),
        -Vector3::unit_y(),
        -Vector3::unit_z(),
    ];
    for direction in axes {
        let hit = intersect_ray_aabb(origin, direction, &bounds);
        assert!(matches!(hit, Some(t) if t >= 0.0), "{direction:?}");
    }
}

#[test]
fn ray_pointing_away_misses() {
    let bounds = Bounds::new(-1.0, 1.0, -1.0, 1.0, -1.0, 1.0);
    let origin = Vector3::new(0.0, 0.0, 5.0);
    assert_eq!(intersect_ray_aabb(origin, Vector3::unit_z(), &bounds), None);
    assert!(intersect_ray_aabb(origin, -Vector3::unit_z(), &bounds).is_some());
}

fn unit_box(id: &str) -> WorldObject {
    WorldObject::new(id, "prop").with_aabb(Bounds::new(-1.0, 1.0, -1.0, 1.0, -1.0, 1.0))
}

#[test]
fn falling_box_comes_to_rest_on_immovable_floor() {
    let mut scene = Scene::new();
    scene.world_objects.insert("floor".into(), unit_box("floor"));
    scene.world_objects.insert(
        "box".into(),
        unit_box("box").movable().with_position(0.0, 4.0, 0.0),
    );

    let physics = PhysicsEngine::new(&PhysicsConfig::default());
    let mut landed = false;
    for _ in 0..100 {
        physics.update(&mut scene);
        let falling = &scene.world_objects["box"];
        if falling.is_colliding {
            assert_eq!(falling.velocity.y, 0.0);
            assert!(!falling.airborne);
            assert!((falling.position.y - 2.0).abs() < 1e-4);
            landed = true;
            break;
        }
    }
    assert!(landed);
    assert_eq!(scene.world_objects["floor"].position, Vector3::new(0.0, 0.0, 0.0));
}

#[test]
fn overlapping_unit_cube_is_pushed_out_below() {
    let cube = Bounds::new(-0.5, 0.5, -0.5, 0.5, -0.5, 0.5);
    let mut scene = Scene::new();
    scene.world_objects.insert("a".into(), WorldObject::new("a", "prop").with_aabb(cube));
    let mut b = WorldObject::new("b", "prop")
        .with_aabb(cube)
        .movable()
        .with_position(0.0, 0.5, 0.0);
    b.velocity = Vector3::new(0.0, -1.0, 0.0);
    scene.world_objects.insert("b".into(), b);

    PhysicsEngine::new(&PhysicsConfig::default()).update(&mut scene);

    // after the step B sits at y = -0.5; the shallowest way out is downward
    let b = &scene.world_objects["b"];
    assert_eq!(b.velocity.y, 0.0);
    assert!(!b.airborne);
    assert_eq!(b.position, Vector3::new(0.0, -1.0, 0.0));
    assert_eq!(scene.world_objects["a"].position, Vector3::new(0.0, 0.0, 0.0));

    let a_bounds = scene.world_objects["a"].world_bounds().unwrap();
    let b_bounds = b.world_bounds().unwrap();
    assert_eq!(b_bounds.max_y, a_bounds.min_y);
}

#[test]
fn concentric_overlap_is_symmetric() {
    let outer = Bounds::new(-2.0, 2.0, 0.0, 2.0, -1.0, 1.0);
    let inner = Bounds::new(-1.0, 1.0, 0.5, 1.5, -0.25, 0.25);
    let ab = overlap_with_penetration(&outer, &inner);
    let ba = overlap_with_penetration(&inner, &outer);

    assert!(ab.colliding && ba.colliding);
    assert_eq!(ab.penetration, -ba.penetration);
}

#[test]
fn flying_friction_halves_velocity() {
    let mut scene = Scene::new();
    let mut flyer = WorldObject::new("flyer", "player").movable();
    flyer.flying = true;
    flyer.velocity = Vector3::new(1.0, 1.0, 1.0);
    scene.world_objects.insert("flyer".into(), flyer);

    PhysicsEngine::new(&PhysicsConfig::default()).update(&mut scene);
    assert_eq!(scene.world_objects["flyer"].velocity, Vector3::new(0.5, 0.5, 0.5));
}
