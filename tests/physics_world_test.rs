use std::rc::Rc;

use cgmath::Vector3;
use tumble_ngin::resources::mesh::Model;
use tumble_ngin::resources::texture::Texture;
use tumble_ngin::{CollisionShape, ObjectFlags, PhysicsWorld, SpatialObject};

const FRAME: f32 = 1.0 / 60.0;

fn dummy_model() -> Rc<Model> {
    Rc::new(Model { meshes: vec![] })
}

fn dummy_texture() -> Rc<Texture> {
    Rc::new(Texture {
        width: 1,
        height: 1,
        pixels: vec![0; 4],
    })
}

fn object_at(
    position: Vector3<f32>,
    shape: Option<CollisionShape>,
    mass: f32,
) -> SpatialObject {
    let mut object =
        SpatialObject::new(dummy_model(), dummy_texture(), "test", ObjectFlags::default());
    object.set_position(position);
    object.set_collision_shape(shape);
    object.set_mass(mass);
    object
}

fn unit_box() -> Option<CollisionShape> {
    Some(CollisionShape::Box {
        half_extents: Vector3::new(0.5, 0.5, 0.5),
    })
}

fn floor() -> SpatialObject {
    // Top surface at y = 0.
    object_at(
        Vector3::new(0.0, -0.5, 0.0),
        Some(CollisionShape::Box {
            half_extents: Vector3::new(10.0, 0.5, 10.0),
        }),
        0.0,
    )
}

#[test]
fn static_bodies_do_not_move() {
    let positions = [
        Vector3::new(0.0, 0.0, 0.0),
        Vector3::new(5.0, 2.0, -3.0),
        Vector3::new(-7.0, 11.0, 4.0),
    ];
    let mut objects = positions
        .iter()
        .map(|p| object_at(*p, Some(CollisionShape::Sphere { radius: 1.0 }), 0.0))
        .collect::<Vec<_>>();

    let mut world = PhysicsWorld::new();
    for (i, object) in objects.iter_mut().enumerate() {
        assert!(world.add_object(i, object).is_some());
    }
    assert_eq!(world.body_count(), 3);

    for _ in 0..60 {
        world.step_simulation(FRAME);
    }
    world.apply_transforms(&mut objects);

    for (object, expected) in objects.iter().zip(positions.iter()) {
        let d = object.position() - expected;
        assert!(
            d.x.abs() < 1e-4 && d.y.abs() < 1e-4 && d.z.abs() < 1e-4,
            "static body drifted from {expected:?} to {:?}",
            object.position()
        );
    }
}

#[test]
fn dynamic_body_falls_and_settles_on_the_floor() {
    let mut objects = vec![floor(), object_at(Vector3::new(0.0, 10.0, 0.0), unit_box(), 1.0)];

    let mut world = PhysicsWorld::new();
    for (i, object) in objects.iter_mut().enumerate() {
        world.add_object(i, object);
    }

    // Free fall: strictly decreasing height over the first few frames.
    let mut last_y = objects[1].position().y;
    for _ in 0..20 {
        world.step_simulation(FRAME);
        world.apply_transforms(&mut objects);
        let y = objects[1].position().y;
        assert!(y < last_y, "falling body did not descend ({y} >= {last_y})");
        last_y = y;
    }

    // Let it land and come to rest.
    for _ in 0..600 {
        world.step_simulation(FRAME);
    }
    world.apply_transforms(&mut objects);

    let y = objects[1].position().y;
    assert!(y < 10.0);
    // Resting center of a unit box on a floor whose top is y = 0.
    assert!(
        (0.4..0.7).contains(&y),
        "body should rest on the floor, center at y = {y}"
    );
    // The floor itself must not have moved.
    assert!((objects[0].position().y - (-0.5)).abs() < 1e-4);
}

#[test]
fn read_back_goes_through_setters_and_recomputes_the_matrix() {
    let mut objects = vec![object_at(Vector3::new(0.0, 5.0, 0.0), unit_box(), 1.0)];

    let mut world = PhysicsWorld::new();
    world.add_object(0, &mut objects[0]);
    for _ in 0..30 {
        world.step_simulation(FRAME);
    }
    world.apply_transforms(&mut objects);

    let position = objects[0].position();
    assert!(position.y < 5.0);
    let column = objects[0].transform().w;
    assert!((column.x - position.x).abs() < 1e-6);
    assert!((column.y - position.y).abs() < 1e-6);
    assert!((column.z - position.z).abs() < 1e-6);
}

#[test]
fn unshaped_objects_get_no_body_and_are_left_alone() {
    let mut objects = vec![
        object_at(Vector3::new(0.0, 3.0, 0.0), None, 0.0),
        object_at(Vector3::new(2.0, 5.0, 0.0), unit_box(), 1.0),
    ];

    let mut world = PhysicsWorld::new();
    assert!(world.add_object(0, &mut objects[0]).is_none());
    assert!(world.add_object(1, &mut objects[1]).is_some());
    assert_eq!(world.body_count(), 1);

    for _ in 0..30 {
        world.step_simulation(FRAME);
    }
    world.apply_transforms(&mut objects);

    // The shapeless object keeps its scene-setup position; the dynamic one
    // fell, even though their slots are not contiguous body indices.
    assert_eq!(objects[0].position(), Vector3::new(0.0, 3.0, 0.0));
    assert!(objects[1].position().y < 5.0);
}

#[test]
fn raycast_push_wakes_and_moves_the_hit_body() {
    let mut objects = vec![floor(), object_at(Vector3::new(0.0, 0.5, 0.0), unit_box(), 1.0)];

    let mut world = PhysicsWorld::new();
    for (i, object) in objects.iter_mut().enumerate() {
        world.add_object(i, object);
    }

    // From roughly camera height, looking down -Z. Grazes above the floor
    // and hits the box front face.
    let hit = world.push_with_ray(Vector3::new(0.0, 0.5, 10.0), Vector3::new(0.0, 0.0, -1.0));
    assert_eq!(hit, Some(1));

    for _ in 0..30 {
        world.step_simulation(FRAME);
    }
    world.apply_transforms(&mut objects);
    assert!(
        objects[1].position().z < -0.05,
        "pushed body did not move, z = {}",
        objects[1].position().z
    );
}

#[test]
fn raycast_miss_returns_none() {
    let mut objects = vec![object_at(Vector3::new(0.0, 0.0, 0.0), unit_box(), 1.0)];
    let mut world = PhysicsWorld::new();
    world.add_object(0, &mut objects[0]);

    let hit = world.push_with_ray(Vector3::new(0.0, 50.0, 0.0), Vector3::new(0.0, 1.0, 0.0));
    assert_eq!(hit, None);
}

#[test]
#[should_panic]
fn apply_transforms_rejects_a_too_short_object_list() {
    let mut objects = vec![
        object_at(Vector3::new(0.0, 0.0, 0.0), unit_box(), 0.0),
        object_at(Vector3::new(3.0, 0.0, 0.0), unit_box(), 0.0),
    ];
    let mut world = PhysicsWorld::new();
    for (i, object) in objects.iter_mut().enumerate() {
        world.add_object(i, object);
    }

    let mut truncated = objects.split_off(1);
    assert_eq!(truncated.len(), 1);
    world.apply_transforms(&mut truncated);
}

#[test]
fn debug_lines_are_collected_only_when_enabled() {
    use tumble_ngin::physics::debug::{debug_toggles, DebugRenderMode};

    let mut objects = vec![object_at(Vector3::new(0.0, 0.0, 0.0), unit_box(), 0.0)];
    let mut world = PhysicsWorld::new();
    world.add_object(0, &mut objects[0]);

    world.step_simulation(FRAME);
    assert!(world.debug_lines().is_empty());

    let wireframes = debug_toggles()
        .iter()
        .find(|t| t.label() == "Collider wireframes")
        .unwrap();
    assert!(!wireframes.is_enabled(&world));
    wireframes.toggle(&mut world);
    assert!(wireframes.is_enabled(&world));
    assert_eq!(world.debug_mode(), DebugRenderMode::COLLIDER_SHAPES);

    world.step_simulation(FRAME);
    assert!(!world.debug_lines().is_empty());

    wireframes.toggle(&mut world);
    world.step_simulation(FRAME);
    assert!(world.debug_lines().is_empty());
}
