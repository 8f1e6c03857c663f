//! The consumed interface towards the external render layer.
//!
//! This crate never talks to a GPU. Whatever does (wgpu, OpenGL, a test
//! recorder) implements [`RenderBackend`] and receives the object's model
//! matrix, texture and mesh data in draw order.

use cgmath::Matrix4;

use crate::resources::{mesh::Model, texture::Texture};

/// Implemented by the render layer; consumed by [`crate::SpatialObject::draw`].
pub trait RenderBackend {
    /// Upload the model matrix for the next draw (typically a shader uniform).
    fn set_model_matrix(&mut self, matrix: Matrix4<f32>);

    /// Bind the texture for the next draw.
    fn bind_texture(&mut self, texture: &Texture);

    /// Draw the model with whatever matrix/texture was set last.
    /// Returns the number of vertices submitted.
    fn draw_model(&mut self, model: &Model) -> u32;
}
