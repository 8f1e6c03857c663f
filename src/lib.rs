//! tumble-ngin
//!
//! A small rigid-body game engine core. This crate exposes the pieces that
//! sit between a physics simulation and a render layer: scene objects with
//! position/rotation/scale state, a physics world that owns the simulation
//! and writes resulting transforms back into the scene, a deduplicating
//! asset cache and a declarative JSON map format for describing scenes.
//!
//! Rendering, windowing and input are deliberately not part of this crate.
//! The render layer is reached through the [`render::RenderBackend`] trait
//! and everything else is plain CPU-side state.
//!
//! High-level modules
//! - `data_structures`: scene object state (transforms, flags, collision shapes)
//! - `physics`: physics world, raycast interaction and debug-line collection
//! - `resources`: asset cache, CPU mesh/texture loaders and the map loader
//! - `scene`: assembly of maps + caches + physics into a steppable scene
//! - `render`: the consumed interface towards the external render layer
//!

pub mod data_structures;
pub mod physics;
pub mod render;
pub mod resources;
pub mod scene;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::*;
pub use data_structures::object::{CollisionShape, ObjectFlags, SpatialObject};
pub use physics::PhysicsWorld;
pub use resources::cache::{Asset, AssetCache};
pub use resources::map::{Map, MapError, ObjectDescriptor};
pub use scene::Scene;
