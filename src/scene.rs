//! Scene assembly and per-frame ordering.
//!
//! A [`Scene`] ties the pieces together: map descriptors are resolved to
//! shared asset handles through the caches, turned into scene objects and
//! registered with a fresh physics world, each at its slot index in the
//! object list.
//!
//! # Frame order
//!
//! [`Scene::update`] enforces the one ordering that matters: the simulation
//! steps first, transforms are read back second, and only then may the
//! caller submit anything to the render layer.

use cgmath::{Deg, Euler, Quaternion, Vector3};

use crate::data_structures::object::SpatialObject;
use crate::physics::PhysicsWorld;
use crate::render::RenderBackend;
use crate::resources::cache::AssetCache;
use crate::resources::map::{Map, ObjectDescriptor};
use crate::resources::{mesh::Model, texture::Texture};

/// A loaded scene: the object list and the physics world driving it.
pub struct Scene {
    objects: Vec<SpatialObject>,
    physics: PhysicsWorld,
}

impl Scene {
    /// Build a scene from a parsed map.
    ///
    /// Asset resolution is isolated per object: a bad model or texture name
    /// substitutes the cache's placeholder (when configured) and the rest of
    /// the scene still loads.
    pub fn from_map(
        map: &Map,
        models: &mut AssetCache<Model>,
        textures: &mut AssetCache<Texture>,
    ) -> Self {
        let mut physics = PhysicsWorld::new();
        let mut objects = Vec::with_capacity(map.objects.len());
        for descriptor in &map.objects {
            let mut object = build_object(descriptor, models, textures);
            physics.add_object(objects.len(), &mut object);
            objects.push(object);
        }
        log::info!(
            "Built scene \"{}\": {} objects, {} bodies",
            map.name,
            objects.len(),
            physics.body_count()
        );
        Self { objects, physics }
    }

    pub fn objects(&self) -> &[SpatialObject] {
        &self.objects
    }

    pub fn objects_mut(&mut self) -> &mut [SpatialObject] {
        &mut self.objects
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    pub fn physics_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.physics
    }

    /// Advance the simulation and read the resulting transforms back into
    /// the objects, in that order.
    pub fn update(&mut self, delta_seconds: f32) {
        self.physics.step_simulation(delta_seconds);
        self.physics.apply_transforms(&mut self.objects);
    }

    /// Draw every object; returns the total vertex count submitted.
    pub fn draw(&self, backend: &mut dyn RenderBackend) -> u32 {
        self.objects.iter().map(|object| object.draw(backend)).sum()
    }

    /// Raycast interaction: shove the first body along `direction` from
    /// `origin` (typically the camera position and facing direction).
    /// Returns the index of the hit object.
    pub fn push_at(&mut self, origin: Vector3<f32>, direction: Vector3<f32>) -> Option<usize> {
        self.physics.push_with_ray(origin, direction)
    }
}

/// Resolve one descriptor into a scene object, physics fields included.
fn build_object(
    descriptor: &ObjectDescriptor,
    models: &mut AssetCache<Model>,
    textures: &mut AssetCache<Texture>,
) -> SpatialObject {
    let model = models.open(&descriptor.model_name);
    let texture = textures.open(&descriptor.texture_name);

    let mut object = SpatialObject::new(model, texture, &descriptor.name, descriptor.flags);
    object.set_position(descriptor.position);
    object.set_scale(descriptor.scale);
    object.set_model_rotation(Quaternion::from(Euler::new(
        Deg(descriptor.model_rotation_deg.x),
        Deg(descriptor.model_rotation_deg.y),
        Deg(descriptor.model_rotation_deg.z),
    )));
    object.set_collision_shape(descriptor.shape.clone());
    object.set_mass(descriptor.mass);
    object
}
