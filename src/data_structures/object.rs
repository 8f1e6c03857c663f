//! Scene objects and their spatial state.
//!
//! A [`SpatialObject`] is a flat, independently transformed scene entity. It
//! owns its position/rotation/scale, a derived model matrix, shared handles
//! to a model and a texture (deduplicated via the asset cache) and an
//! optional collision shape + mass describing its physics participation.
//!
//! The physics layer never pokes at object fields directly. It goes through
//! [`PhysicsBinding`], a narrow capability handed out by the object that
//! exposes exactly the operations registration and per-step read-back need.

use std::rc::Rc;

use bitflags::bitflags;
use cgmath::{Matrix4, One, Quaternion, Rad, Rotation3, SquareMatrix, Vector3};

use crate::render::RenderBackend;
use crate::resources::{mesh::Model, texture::Texture};

bitflags! {
    /// Per-object flag set. Only visibility exists so far.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ObjectFlags: u8 {
        const VISIBLE = 1 << 0;
    }
}

impl Default for ObjectFlags {
    fn default() -> Self {
        ObjectFlags::VISIBLE
    }
}

/// Collision geometry an object contributes to the physics world.
///
/// The shape lives on the object only until registration: the physics world
/// takes it out through the [`PhysicsBinding`] and becomes its sole owner.
#[derive(Debug, Clone, PartialEq)]
pub enum CollisionShape {
    Sphere { radius: f32 },
    Box { half_extents: Vector3<f32> },
}

/// Mass value marking an object as static (immovable, no gravity response).
pub const MASS_STATIC: f32 = 0.0;

/// A flat scene object: shared render assets plus owned spatial state.
///
/// The model matrix is a pure function of position, rotation, the model-local
/// rotation offset and scale. Every spatial mutator recomputes it, including
/// the setters the physics world calls during read-back, so the matrix is
/// always in sync without a per-frame recompute pass.
///
/// Objects are not `Clone`: identity matters once one is registered with the
/// physics world.
#[derive(Debug)]
pub struct SpatialObject {
    model: Rc<Model>,
    texture: Rc<Texture>,
    name: String,
    flags: ObjectFlags,

    position: Vector3<f32>,
    rotation: Quaternion<f32>,
    /// Compensates for asset authoring orientation; applied before the
    /// runtime rotation and never touched by the physics layer.
    model_rotation: Quaternion<f32>,
    scale: Vector3<f32>,
    transform: Matrix4<f32>,

    shape: Option<CollisionShape>,
    mass: f32,
}

impl SpatialObject {
    pub fn new(model: Rc<Model>, texture: Rc<Texture>, name: &str, flags: ObjectFlags) -> Self {
        let mut object = Self {
            model,
            texture,
            name: name.to_string(),
            flags,
            position: Vector3::new(0.0, 0.0, 0.0),
            rotation: Quaternion::one(),
            model_rotation: Quaternion::one(),
            scale: Vector3::new(1.0, 1.0, 1.0),
            transform: Matrix4::identity(),
            shape: None,
            mass: MASS_STATIC,
        };
        object.update_transform();
        object
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn flags(&self) -> ObjectFlags {
        self.flags
    }

    pub fn flags_mut(&mut self) -> &mut ObjectFlags {
        &mut self.flags
    }

    pub fn position(&self) -> Vector3<f32> {
        self.position
    }

    pub fn rotation(&self) -> Quaternion<f32> {
        self.rotation
    }

    pub fn scale(&self) -> Vector3<f32> {
        self.scale
    }

    /// The combined model matrix:
    /// translation * rotation * model-local rotation * non-uniform scale.
    pub fn transform(&self) -> Matrix4<f32> {
        self.transform
    }

    pub fn model(&self) -> &Rc<Model> {
        &self.model
    }

    pub fn texture(&self) -> &Rc<Texture> {
        &self.texture
    }

    /// Mass in kilograms; [`MASS_STATIC`] marks the object as immovable.
    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn set_mass(&mut self, mass: f32) {
        self.mass = mass;
    }

    /// The collision shape, while this object still owns one. `None` either
    /// means "never had one" or "already transferred to the physics world".
    pub fn collision_shape(&self) -> Option<&CollisionShape> {
        self.shape.as_ref()
    }

    pub fn set_collision_shape(&mut self, shape: Option<CollisionShape>) {
        self.shape = shape;
    }

    pub fn set_model_rotation(&mut self, rotation: Quaternion<f32>) {
        self.model_rotation = rotation;
        self.update_transform();
    }

    pub fn translate(&mut self, offset: Vector3<f32>) {
        self.position += offset;
        self.update_transform();
    }

    pub fn rotate<A: Into<Rad<f32>>>(&mut self, angle: A, axis: Vector3<f32>) {
        self.rotation = Quaternion::from_axis_angle(axis, angle) * self.rotation;
        self.update_transform();
    }

    /// Multiplies the current scale component-wise.
    pub fn scale_by(&mut self, factor: Vector3<f32>) {
        self.scale.x *= factor.x;
        self.scale.y *= factor.y;
        self.scale.z *= factor.z;
        self.update_transform();
    }

    pub fn set_position(&mut self, position: Vector3<f32>) {
        self.position = position;
        self.update_transform();
    }

    pub fn set_rotation(&mut self, rotation: Quaternion<f32>) {
        self.rotation = rotation;
        self.update_transform();
    }

    pub fn set_scale(&mut self, scale: Vector3<f32>) {
        self.scale = scale;
        self.update_transform();
    }

    fn update_transform(&mut self) {
        self.transform = Matrix4::from_translation(self.position)
            * Matrix4::from(self.rotation)
            * Matrix4::from(self.model_rotation)
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z);
    }

    /// Submit this object to the render layer.
    ///
    /// No-op returning 0 when the object is invisible. Otherwise sets the
    /// model matrix, binds the texture, draws the model and returns the
    /// number of vertices submitted (telemetry for the caller).
    pub fn draw(&self, backend: &mut dyn RenderBackend) -> u32 {
        if !self.flags.contains(ObjectFlags::VISIBLE) {
            return 0;
        }
        backend.set_model_matrix(self.transform);
        backend.bind_texture(&self.texture);
        backend.draw_model(&self.model)
    }

    /// The narrow interface the physics world uses during registration and
    /// per-step read-back. Nothing else should need this.
    pub fn physics_binding(&mut self) -> PhysicsBinding<'_> {
        PhysicsBinding { object: self }
    }
}

/// Capability granted to the physics layer: exactly the shape/mass/transform
/// accessors it needs, nothing more.
///
/// Read-back goes through the same setters as any other caller so the model
/// matrix is recomputed as a side effect.
pub struct PhysicsBinding<'a> {
    object: &'a mut SpatialObject,
}

impl PhysicsBinding<'_> {
    pub fn shape(&self) -> Option<&CollisionShape> {
        self.object.shape.as_ref()
    }

    /// Transfers shape ownership out of the object. Returns `None` when the
    /// object carries no shape (or it was already taken).
    pub fn take_shape(&mut self) -> Option<CollisionShape> {
        self.object.shape.take()
    }

    pub fn mass(&self) -> f32 {
        self.object.mass
    }

    pub fn position(&self) -> Vector3<f32> {
        self.object.position
    }

    pub fn set_position(&mut self, position: Vector3<f32>) {
        self.object.set_position(position);
    }

    pub fn set_rotation(&mut self, rotation: Quaternion<f32>) {
        self.object.set_rotation(rotation);
    }
}
