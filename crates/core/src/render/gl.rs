//! The narrow slice of the GL API the effects need.
//!
//! Everything above this trait (context negotiation, programs, meshes,
//! controllers) is written against `Gl` rather than a concrete binding, so
//! the same code drives `glow` in the browser and a recording mock in tests.
//! The `glow` implementation lives in `glow_backend` behind the `render`
//! feature.

use super::shader::ShaderStage;

/// GL entry points used by the studio-fx core.
///
/// Object handles are plain copyable keys; the caller owns their lifetime
/// and must delete them through the matching `delete_*` call.
pub trait Gl {
    type Shader: Copy;
    type Program: Copy;
    type Buffer: Copy;
    type UniformLocation;

    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, String>;
    fn shader_source(&self, shader: Self::Shader, source: &str);
    fn compile_shader(&self, shader: Self::Shader);
    fn shader_compile_status(&self, shader: Self::Shader) -> bool;
    fn shader_info_log(&self, shader: Self::Shader) -> String;
    fn delete_shader(&self, shader: Self::Shader);

    fn create_program(&self) -> Result<Self::Program, String>;
    fn attach_shader(&self, program: Self::Program, shader: Self::Shader);
    fn link_program(&self, program: Self::Program);
    fn program_link_status(&self, program: Self::Program) -> bool;
    fn program_info_log(&self, program: Self::Program) -> String;
    fn use_program(&self, program: Option<Self::Program>);
    fn delete_program(&self, program: Self::Program);

    /// `None` when the program does not declare (or the compiler removed) the uniform.
    fn uniform_location(&self, program: Self::Program, name: &str)
        -> Option<Self::UniformLocation>;
    /// `None` when the program does not declare the attribute.
    fn attrib_location(&self, program: Self::Program, name: &str) -> Option<u32>;
    fn uniform_1_f32(&self, location: &Self::UniformLocation, x: f32);
    fn uniform_2_f32(&self, location: &Self::UniformLocation, x: f32, y: f32);
    fn uniform_3_f32(&self, location: &Self::UniformLocation, x: f32, y: f32, z: f32);

    fn create_buffer(&self) -> Result<Self::Buffer, String>;
    /// Binds `buffer` as the array buffer and fills it with static data.
    fn upload_array_buffer(&self, buffer: Self::Buffer, data: &[f32]);
    fn bind_array_buffer(&self, buffer: Option<Self::Buffer>);
    fn delete_buffer(&self, buffer: Self::Buffer);
    /// Enables attribute `index` and points it at tightly packed float tuples
    /// of `size` components in the bound array buffer.
    fn float_attrib_pointer(&self, index: u32, size: i32);

    /// Enables blending with source-over compositing (`SRC_ALPHA`, `ONE_MINUS_SRC_ALPHA`).
    fn enable_alpha_blending(&self);
    fn viewport(&self, x: i32, y: i32, width: i32, height: i32);
    fn clear_color_buffer(&self, r: f32, g: f32, b: f32, a: f32);
    fn draw_triangles(&self, first: i32, count: i32);
}
