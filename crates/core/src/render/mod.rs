//! Minimal WebGL wrapper for fullscreen fragment-shader effects.
//!
//! # Module overview
//!
//! - [`gl`] -- the `Gl` trait, the narrow GL surface everything else uses.
//! - [`context`] -- context acquisition with tier fallback, DPR clamping, resize.
//! - [`shader`] -- compile/link, legacy downgrade, uniform upload.
//! - [`uniform`] -- tagged uniform values and the CPU-side uniform table.
//! - [`mesh`] -- vertex buffers and the draw call.
//! - [`fullscreen`] -- the fullscreen triangle geometry and vertex shader.
//!
//! The `glow` backend is only compiled with the `render` feature.

pub mod context;
pub mod fullscreen;
pub mod gl;
pub mod mesh;
pub mod shader;
pub mod uniform;

#[cfg(feature = "render")]
mod glow_backend;

#[cfg(test)]
pub(crate) mod mock;

pub use context::{
    ApiTier, ContextAttributes, ContextKind, GraphicsContext, RendererOptions, Surface,
    TierPreference,
};
pub use fullscreen::{FullscreenTriangle, FULLSCREEN_VERTEX_SHADER};
pub use gl::Gl;
pub use mesh::{Geometry, Mesh};
pub use shader::{
    downgrade_source, format_shader_error, source_for_tier, ShaderProgram, ShaderStage,
};
pub use uniform::{UniformValue, Uniforms};
