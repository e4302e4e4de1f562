//! [`Gl`] implementation for `glow::Context`.
//!
//! Works for both WebGL tiers: `glow` wraps a WebGL1 or WebGL2 context
//! behind the same API, and the calls used here exist in both.

use super::gl::Gl;
use super::shader::ShaderStage;
use glow::HasContext;

// SAFETY (applies to every block below): glow marks raw GL calls unsafe.
// Handles passed in were obtained from this same context and are deleted
// exactly once by their owning `ShaderProgram` / `Mesh`; enum arguments are
// the fixed constants spelled out at each call site.
#[allow(unsafe_code)]
impl Gl for glow::Context {
    type Shader = glow::Shader;
    type Program = glow::Program;
    type Buffer = glow::Buffer;
    type UniformLocation = glow::UniformLocation;

    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, String> {
        let shader_type = match stage {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        };
        unsafe { HasContext::create_shader(self, shader_type) }
    }

    fn shader_source(&self, shader: Self::Shader, source: &str) {
        unsafe { HasContext::shader_source(self, shader, source) }
    }

    fn compile_shader(&self, shader: Self::Shader) {
        unsafe { HasContext::compile_shader(self, shader) }
    }

    fn shader_compile_status(&self, shader: Self::Shader) -> bool {
        unsafe { self.get_shader_compile_status(shader) }
    }

    fn shader_info_log(&self, shader: Self::Shader) -> String {
        unsafe { self.get_shader_info_log(shader) }
    }

    fn delete_shader(&self, shader: Self::Shader) {
        unsafe { HasContext::delete_shader(self, shader) }
    }

    fn create_program(&self) -> Result<Self::Program, String> {
        unsafe { HasContext::create_program(self) }
    }

    fn attach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe { HasContext::attach_shader(self, program, shader) }
    }

    fn link_program(&self, program: Self::Program) {
        unsafe { HasContext::link_program(self, program) }
    }

    fn program_link_status(&self, program: Self::Program) -> bool {
        unsafe { self.get_program_link_status(program) }
    }

    fn program_info_log(&self, program: Self::Program) -> String {
        unsafe { self.get_program_info_log(program) }
    }

    fn use_program(&self, program: Option<Self::Program>) {
        unsafe { HasContext::use_program(self, program) }
    }

    fn delete_program(&self, program: Self::Program) {
        unsafe { HasContext::delete_program(self, program) }
    }

    fn uniform_location(
        &self,
        program: Self::Program,
        name: &str,
    ) -> Option<Self::UniformLocation> {
        unsafe { self.get_uniform_location(program, name) }
    }

    fn attrib_location(&self, program: Self::Program, name: &str) -> Option<u32> {
        unsafe { self.get_attrib_location(program, name) }
    }

    fn uniform_1_f32(&self, location: &Self::UniformLocation, x: f32) {
        unsafe { HasContext::uniform_1_f32(self, Some(location), x) }
    }

    fn uniform_2_f32(&self, location: &Self::UniformLocation, x: f32, y: f32) {
        unsafe { HasContext::uniform_2_f32(self, Some(location), x, y) }
    }

    fn uniform_3_f32(&self, location: &Self::UniformLocation, x: f32, y: f32, z: f32) {
        unsafe { HasContext::uniform_3_f32(self, Some(location), x, y, z) }
    }

    fn create_buffer(&self) -> Result<Self::Buffer, String> {
        unsafe { HasContext::create_buffer(self) }
    }

    fn upload_array_buffer(&self, buffer: Self::Buffer, data: &[f32]) {
        unsafe {
            self.bind_buffer(glow::ARRAY_BUFFER, Some(buffer));
            self.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(data),
                glow::STATIC_DRAW,
            );
        }
    }

    fn bind_array_buffer(&self, buffer: Option<Self::Buffer>) {
        unsafe { self.bind_buffer(glow::ARRAY_BUFFER, buffer) }
    }

    fn delete_buffer(&self, buffer: Self::Buffer) {
        unsafe { HasContext::delete_buffer(self, buffer) }
    }

    fn float_attrib_pointer(&self, index: u32, size: i32) {
        unsafe {
            self.enable_vertex_attrib_array(index);
            self.vertex_attrib_pointer_f32(index, size, glow::FLOAT, false, 0, 0);
        }
    }

    fn enable_alpha_blending(&self) {
        unsafe {
            self.enable(glow::BLEND);
            self.blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);
        }
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { HasContext::viewport(self, x, y, width, height) }
    }

    fn clear_color_buffer(&self, r: f32, g: f32, b: f32, a: f32) {
        unsafe {
            self.clear_color(r, g, b, a);
            self.clear(glow::COLOR_BUFFER_BIT);
        }
    }

    fn draw_triangles(&self, first: i32, count: i32) {
        unsafe { self.draw_arrays(glow::TRIANGLES, first, count) }
    }
}
