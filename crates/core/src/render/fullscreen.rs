//! Fullscreen triangle geometry.
//!
//! A single oversized triangle covers the viewport without the diagonal
//! seam of a two-triangle quad. Two of its corners sit outside clip space
//! at 3.0; the GPU clips them for free. Texture coordinates scale with the
//! positions, so they interpolate to exactly [0, 1] over the visible area.

use super::mesh::Geometry;

/// Clip-space positions, two floats per vertex.
pub const POSITIONS: [f32; 6] = [-1.0, -1.0, 3.0, -1.0, -1.0, 3.0];

/// Texture coordinates matching [`POSITIONS`].
pub const UVS: [f32; 6] = [0.0, 0.0, 2.0, 0.0, 0.0, 2.0];

/// GLSL ES 3.00 vertex shader for the triangle: forwards `uv` as `vUv`.
///
/// Uses only constructs covered by the legacy downgrade table.
pub const FULLSCREEN_VERTEX_SHADER: &str = "#version 300 es
precision highp float;
in vec2 position;
in vec2 uv;
out vec2 vUv;
void main() {
  vUv = uv;
  gl_Position = vec4(position, 0.0, 1.0);
}
";

pub struct FullscreenTriangle;

impl FullscreenTriangle {
    pub fn geometry() -> Geometry {
        Geometry {
            positions: POSITIONS.to_vec(),
            uvs: Some(UVS.to_vec()),
            count: Some(3),
        }
    }
}
