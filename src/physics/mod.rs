//! Physics simulation and the bridge between bodies and scene objects.
//!
//! [`PhysicsWorld`] owns every piece of rapier state for one engine session.
//! Scene objects are registered once; their collision shape moves into the
//! world and the object's slot index in the caller's list is stored in the
//! body's user-data, so read-back resolves bodies to objects by direct
//! lookup instead of relying on "same order, same length" between two lists.
//!
//! The per-frame contract is fixed: [`PhysicsWorld::step_simulation`] first,
//! [`PhysicsWorld::apply_transforms`] second, render submission last.

pub mod debug;

use cgmath::{InnerSpace, Quaternion, Vector3};
use rapier3d::pipeline::DebugRenderPipeline;
use rapier3d::prelude::*;

use crate::data_structures::object::{CollisionShape, SpatialObject, MASS_STATIC};
use crate::physics::debug::{DebugLine, LineCollector};

/// Fixed solver sub-step count per simulation step.
const SUB_STEPS: u32 = 10;
/// Contact skin applied to every collider; keeps zero-thickness shapes from
/// jittering.
const COLLISION_MARGIN: f32 = 0.001;
/// How far the interaction raycast reaches.
const RAY_LENGTH: f32 = 100.0;
/// Impulse magnitude applied along the ray on a hit.
const PUSH_FORCE: f32 = 2.5;

/// Owns the simulation and keeps registered scene objects in sync with it.
pub struct PhysicsWorld {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,

    /// (object slot index, body) for every registered object. The index is
    /// also mirrored in the body's user-data.
    registered: Vec<(usize, RigidBodyHandle)>,

    debug_pipeline: DebugRenderPipeline,
    debug_lines: Vec<DebugLine>,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld {
    pub fn new() -> Self {
        Self {
            gravity: vector![0.0, -10.0, 0.0],
            integration_parameters: IntegrationParameters::default(),
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            registered: Vec::new(),
            // Debug drawing starts disabled; toggles flip mode bits at runtime.
            debug_pipeline: DebugRenderPipeline::new(
                Default::default(),
                debug::DebugRenderMode::empty(),
            ),
            debug_lines: Vec::new(),
        }
    }

    /// Register a scene object with the simulation.
    ///
    /// `index` is the slot the object occupies (or will occupy) in the list
    /// later passed to [`apply_transforms`](Self::apply_transforms); it is
    /// stored in the body's user-data for read-back and raycast resolution.
    ///
    /// Objects without a collision shape are skipped entirely and get no
    /// body. That is safe here because read-back resolves objects through
    /// the stored index, not through positional correspondence of two lists.
    ///
    /// The collision shape moves out of the object into this world. Mass 0
    /// creates a fixed body (no gravity, immovable to impulses); any other
    /// mass creates a dynamic body with inertia derived from shape and mass.
    pub fn add_object(&mut self, index: usize, object: &mut SpatialObject) -> Option<RigidBodyHandle> {
        let taken = object.physics_binding().take_shape();
        let shape = match taken {
            Some(shape) => shape,
            None => {
                log::debug!("Object \"{}\" has no collision shape, skipping", object.name());
                return None;
            }
        };
        let binding = object.physics_binding();
        let mass = binding.mass();
        let position = binding.position();

        // Identity rotation at the object's current position.
        let builder = if mass != MASS_STATIC {
            RigidBodyBuilder::dynamic()
        } else {
            RigidBodyBuilder::fixed()
        };
        let body = builder
            .translation(vector![position.x, position.y, position.z])
            .user_data(index as u128)
            .build();
        let handle = self.bodies.insert(body);

        let collider = match shape {
            CollisionShape::Sphere { radius } => ColliderBuilder::ball(radius),
            CollisionShape::Box { half_extents } => {
                ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            }
        }
        .contact_skin(COLLISION_MARGIN)
        .mass(mass)
        .build();
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);

        self.registered.push((index, handle));
        log::debug!(
            "Registered object slot {index} as {} body",
            if mass != MASS_STATIC { "dynamic" } else { "static" }
        );
        Some(handle)
    }

    /// Number of bodies in the simulation.
    pub fn body_count(&self) -> usize {
        self.registered.len()
    }

    /// Advance the simulation by `delta_seconds`, split into a fixed number
    /// of sub-steps for solver stability regardless of the outer frame rate.
    ///
    /// Collects debug lines as a side effect when a debug mode is enabled.
    pub fn step_simulation(&mut self, delta_seconds: f32) {
        self.integration_parameters.dt = delta_seconds / SUB_STEPS as f32;
        for _ in 0..SUB_STEPS {
            self.pipeline.step(
                &self.gravity,
                &self.integration_parameters,
                &mut self.islands,
                &mut self.broad_phase,
                &mut self.narrow_phase,
                &mut self.bodies,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                &mut self.ccd_solver,
                Some(&mut self.query_pipeline),
                &(),
                &(),
            );
        }
        self.collect_debug_lines();
    }

    /// Write every registered body's world transform back into its object.
    ///
    /// Must run after [`step_simulation`](Self::step_simulation) and before
    /// render submission in the same frame. Goes through the objects' own
    /// setters so their model matrices are recomputed.
    ///
    /// # Panics
    ///
    /// When `objects` is too short to contain every registered slot index.
    /// A silent mismatch here would hand one object another object's
    /// transform, so it is checked up front.
    pub fn apply_transforms(&mut self, objects: &mut [SpatialObject]) {
        for (index, handle) in &self.registered {
            assert!(
                *index < objects.len(),
                "object list ({} entries) does not cover registered slot {index}",
                objects.len(),
            );
            let body = &self.bodies[*handle];
            let translation = body.translation();
            let rotation = body.rotation();
            let mut binding = objects[*index].physics_binding();
            binding.set_position(Vector3::new(translation.x, translation.y, translation.z));
            binding.set_rotation(Quaternion::new(rotation.w, rotation.i, rotation.j, rotation.k));
        }
    }

    /// Cast a ray and shove the first body it hits.
    ///
    /// Finds the closest intersecting body within a fixed length, wakes it
    /// and applies an impulse along the ray direction at the hit point.
    /// Returns the slot index of the hit object, or `None` on a miss (or
    /// when the hit collider has no parent body).
    pub fn push_with_ray(
        &mut self,
        origin: Vector3<f32>,
        direction: Vector3<f32>,
    ) -> Option<usize> {
        let dir = direction.normalize();
        let ray = Ray::new(
            point![origin.x, origin.y, origin.z],
            vector![dir.x, dir.y, dir.z],
        );

        // Keeps raycasts valid even before the first simulation step.
        self.query_pipeline.update(&self.colliders);

        let (collider_handle, toi) = self.query_pipeline.cast_ray(
            &self.bodies,
            &self.colliders,
            &ray,
            RAY_LENGTH,
            true,
            QueryFilter::default(),
        )?;
        let body_handle = self.colliders[collider_handle].parent()?;
        let hit_point = ray.point_at(toi);

        let body = self.bodies.get_mut(body_handle)?;
        let index = body.user_data as usize;
        body.wake_up(true);
        body.apply_impulse_at_point(ray.dir * PUSH_FORCE, hit_point, true);
        log::debug!("Ray hit object slot {index} at distance {toi}");
        Some(index)
    }

    /// Current debug-draw mode bitmask.
    pub fn debug_mode(&self) -> debug::DebugRenderMode {
        self.debug_pipeline.mode
    }

    pub fn set_debug_mode(&mut self, mode: debug::DebugRenderMode) {
        self.debug_pipeline.mode = mode;
    }

    /// Lines collected by the last step while debug drawing was enabled.
    /// Empty when disabled. Rendering them is the caller's concern.
    pub fn debug_lines(&self) -> &[DebugLine] {
        &self.debug_lines
    }

    fn collect_debug_lines(&mut self) {
        self.debug_lines.clear();
        if self.debug_pipeline.mode.is_empty() {
            return;
        }
        let mut collector = LineCollector::new(&mut self.debug_lines);
        self.debug_pipeline.render(
            &mut collector,
            &self.bodies,
            &self.colliders,
            &self.impulse_joints,
            &self.multibody_joints,
            &self.narrow_phase,
        );
    }
}
