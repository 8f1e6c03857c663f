//! Engine data structures: scene objects and their spatial state.
//!
//! - `object` holds [`object::SpatialObject`], the flat (non-hierarchical)
//!   scene object with position/rotation/scale, a derived transform matrix,
//!   shared asset handles and optional physics participation.

pub mod object;
