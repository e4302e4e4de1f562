//! Vertex buffers and the draw call.

use super::gl::Gl;
use super::shader::ShaderProgram;
use crate::error::FxError;

/// Vertex count used when a geometry does not state one.
pub const DEFAULT_VERTEX_COUNT: u32 = 3;

/// Attribute name bound to the position buffer.
pub const POSITION_ATTRIBUTE: &str = "position";
/// Attribute name bound to the texture-coordinate buffer.
pub const UV_ATTRIBUTE: &str = "uv";

/// CPU-side vertex data: 2D positions and optional 2D texture coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    pub positions: Vec<f32>,
    pub uvs: Option<Vec<f32>>,
    pub count: Option<u32>,
}

/// GPU-resident vertex buffers for one [`Geometry`].
pub struct Mesh<G: Gl> {
    position_buffer: G::Buffer,
    uv_buffer: Option<G::Buffer>,
    count: u32,
}

impl<G: Gl> Mesh<G> {
    /// Creates one static buffer per attribute array present in `geometry`.
    ///
    /// # Errors
    ///
    /// `FxError::Resource` if the driver refuses a buffer; buffers created
    /// before the failure are deleted.
    pub fn upload(gl: &G, geometry: &Geometry) -> Result<Self, FxError> {
        let position_buffer = create_filled(gl, &geometry.positions)?;
        let uv_buffer = match geometry.uvs.as_deref().map(|uvs| create_filled(gl, uvs)) {
            Some(Err(e)) => {
                gl.delete_buffer(position_buffer);
                return Err(e);
            }
            Some(Ok(b)) => Some(b),
            None => None,
        };

        Ok(Self {
            position_buffer,
            uv_buffer,
            count: geometry.count.unwrap_or(DEFAULT_VERTEX_COUNT),
        })
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn has_uvs(&self) -> bool {
        self.uv_buffer.is_some()
    }

    /// Draws the mesh as a triangle list through `program`.
    ///
    /// Binds the program, enables source-over blending, pushes the current
    /// uniforms, and wires up each buffer whose attribute the program
    /// actually declares. Attributes the program lacks are skipped.
    pub fn draw(&self, gl: &G, program: &ShaderProgram<G>) {
        let handle = program.program();
        gl.use_program(Some(handle));
        gl.enable_alpha_blending();
        program.update_uniforms(gl);

        let attributes = [
            (POSITION_ATTRIBUTE, Some(self.position_buffer)),
            (UV_ATTRIBUTE, self.uv_buffer),
        ];
        for (name, buffer) in attributes {
            let Some(buffer) = buffer else { continue };
            if let Some(index) = gl.attrib_location(handle, name) {
                gl.bind_array_buffer(Some(buffer));
                gl.float_attrib_pointer(index, 2);
            }
        }

        gl.draw_triangles(0, self.count as i32);
    }

    /// Deletes the vertex buffers.
    pub fn release(self, gl: &G) {
        gl.delete_buffer(self.position_buffer);
        if let Some(uv) = self.uv_buffer {
            gl.delete_buffer(uv);
        }
    }
}

fn create_filled<G: Gl>(gl: &G, data: &[f32]) -> Result<G::Buffer, FxError> {
    let buffer = gl.create_buffer().map_err(|reason| FxError::Resource {
        object: "vertex buffer",
        reason,
    })?;
    gl.upload_array_buffer(buffer, data);
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::mock::{Call, MockGl};
    use crate::render::{ApiTier, FullscreenTriangle, Uniforms};

    const VERT_WITH_UV: &str = "#version 300 es\nin vec2 position;\nin vec2 uv;\nout vec2 vUv;\nvoid main() { vUv = uv; gl_Position = vec4(position, 0.0, 1.0); }\n";
    const VERT_NO_UV: &str = "#version 300 es\nin vec2 position;\nvoid main() { gl_Position = vec4(position, 0.0, 1.0); }\n";
    const FRAG: &str = "#version 300 es\nprecision highp float;\nuniform float uOpacity;\nout vec4 fragColor;\nvoid main() { fragColor = vec4(1.0, 1.0, 1.0, uOpacity); }\n";

    fn program(gl: &MockGl, vertex: &str) -> ShaderProgram<MockGl> {
        let uniforms = Uniforms::new().with("uOpacity", 0.5_f32);
        ShaderProgram::compile(gl, ApiTier::High, vertex, FRAG, uniforms).unwrap()
    }

    #[test]
    fn upload_creates_one_buffer_per_attribute_array() {
        let gl = MockGl::new();
        let mesh = Mesh::upload(&gl, &FullscreenTriangle::geometry()).unwrap();
        assert_eq!(gl.live_buffers(), 2);
        assert!(mesh.has_uvs());
        assert_eq!(mesh.count(), 3);
    }

    #[test]
    fn upload_without_uvs_creates_only_position_buffer() {
        let gl = MockGl::new();
        let geometry = Geometry {
            positions: vec![0.0; 12],
            uvs: None,
            count: None,
        };
        let mesh = Mesh::upload(&gl, &geometry).unwrap();
        assert_eq!(gl.live_buffers(), 1);
        assert!(!mesh.has_uvs());
        assert_eq!(mesh.count(), DEFAULT_VERTEX_COUNT);
    }

    #[test]
    fn draw_binds_program_blends_uploads_uniforms_and_draws() {
        let gl = MockGl::new();
        let program = program(&gl, VERT_WITH_UV);
        let mesh = Mesh::upload(&gl, &FullscreenTriangle::geometry()).unwrap();
        gl.clear_calls();

        mesh.draw(&gl, &program);

        let calls = gl.calls();
        assert_eq!(calls[0], Call::UseProgram(Some(program.program())));
        assert_eq!(calls[1], Call::Blend);
        assert_eq!(calls[2], Call::Uniform1("uOpacity".into(), 0.5));
        assert!(calls.contains(&Call::AttribPointer(0, 2)));
        assert!(calls.contains(&Call::AttribPointer(1, 2)));
        assert_eq!(calls.last(), Some(&Call::Draw(0, 3)));
    }

    #[test]
    fn draw_skips_attributes_the_program_does_not_declare() {
        let gl = MockGl::new();
        let program = program(&gl, VERT_NO_UV);
        let mesh = Mesh::upload(&gl, &FullscreenTriangle::geometry()).unwrap();
        gl.clear_calls();

        mesh.draw(&gl, &program);

        let pointers: Vec<Call> = gl
            .calls()
            .into_iter()
            .filter(|c| matches!(c, Call::AttribPointer(..)))
            .collect();
        assert_eq!(pointers, vec![Call::AttribPointer(0, 2)]);
        assert_eq!(gl.draw_count(), 1);
    }

    #[test]
    fn release_deletes_buffers() {
        let gl = MockGl::new();
        let mesh = Mesh::upload(&gl, &FullscreenTriangle::geometry()).unwrap();
        mesh.release(&gl);
        assert_eq!(gl.live_buffers(), 0);
    }
}
