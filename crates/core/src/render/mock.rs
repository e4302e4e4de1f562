//! Recording [`Gl`] double for unit tests.
//!
//! Shaders "compile" unless their stage is configured to fail. A linked
//! program exposes the uniforms and attributes its attached sources
//! declare, which is close enough to a driver's active-variable list for
//! the GLSL used here.

use super::gl::Gl;
use super::shader::ShaderStage;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    UseProgram(Option<u32>),
    Uniform1(String, f32),
    Uniform2(String, f32, f32),
    Uniform3(String, f32, f32, f32),
    Upload(u32, Vec<f32>),
    BindBuffer(Option<u32>),
    AttribPointer(u32, i32),
    Blend,
    Viewport(i32, i32, i32, i32),
    Clear([f32; 4]),
    Draw(i32, i32),
}

#[derive(Default)]
pub struct MockGl {
    next_id: Cell<u32>,
    failing_stage: Option<ShaderStage>,
    failing_link: bool,
    optimized_out: HashSet<String>,
    shaders: RefCell<HashMap<u32, (ShaderStage, String)>>,
    programs: RefCell<HashMap<u32, Vec<u32>>>,
    buffers: RefCell<HashSet<u32>>,
    sources: RefCell<Vec<String>>,
    calls: RefCell<Vec<Call>>,
}

impl MockGl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_stage(mut self, stage: ShaderStage) -> Self {
        self.failing_stage = Some(stage);
        self
    }

    pub fn failing_link(mut self) -> Self {
        self.failing_link = true;
        self
    }

    /// Pretends the compiler eliminated `name` even though it is declared.
    pub fn optimizing_out(mut self, name: &str) -> Self {
        self.optimized_out.insert(name.to_owned());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn uniform_uploads(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| {
                matches!(
                    c,
                    Call::Uniform1(..) | Call::Uniform2(..) | Call::Uniform3(..)
                )
            })
            .collect()
    }

    pub fn draw_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Draw(..)))
            .count()
    }

    /// Every source string handed to `shader_source`, in order.
    pub fn shader_sources(&self) -> Vec<String> {
        self.sources.borrow().clone()
    }

    pub fn live_shaders(&self) -> usize {
        self.shaders.borrow().len()
    }

    pub fn live_programs(&self) -> usize {
        self.programs.borrow().len()
    }

    pub fn live_buffers(&self) -> usize {
        self.buffers.borrow().len()
    }

    fn id(&self) -> u32 {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        id
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn declarations(&self, program: u32, qualifiers: &[&str]) -> Vec<String> {
        let programs = self.programs.borrow();
        let shaders = self.shaders.borrow();
        programs
            .get(&program)
            .into_iter()
            .flatten()
            .filter_map(|id| shaders.get(id))
            .flat_map(|(_, src)| src.lines())
            .filter_map(|line| {
                let line = line.trim().strip_suffix(';')?;
                let mut words = line.split_whitespace();
                let qualifier = words.next()?;
                if !qualifiers.contains(&qualifier) {
                    return None;
                }
                words.last().map(str::to_owned)
            })
            .collect()
    }
}

impl Gl for MockGl {
    type Shader = u32;
    type Program = u32;
    type Buffer = u32;
    type UniformLocation = String;

    fn create_shader(&self, stage: ShaderStage) -> Result<u32, String> {
        let id = self.id();
        self.shaders.borrow_mut().insert(id, (stage, String::new()));
        Ok(id)
    }

    fn shader_source(&self, shader: u32, source: &str) {
        self.sources.borrow_mut().push(source.to_owned());
        if let Some((_, slot)) = self.shaders.borrow_mut().get_mut(&shader) {
            *slot = source.to_owned();
        }
    }

    fn compile_shader(&self, _shader: u32) {}

    fn shader_compile_status(&self, shader: u32) -> bool {
        match self.shaders.borrow().get(&shader) {
            Some((stage, _)) => self.failing_stage != Some(*stage),
            None => false,
        }
    }

    fn shader_info_log(&self, _shader: u32) -> String {
        "ERROR: 0:1: mock compile failure".to_owned()
    }

    fn delete_shader(&self, shader: u32) {
        self.shaders.borrow_mut().remove(&shader);
    }

    fn create_program(&self) -> Result<u32, String> {
        let id = self.id();
        self.programs.borrow_mut().insert(id, Vec::new());
        Ok(id)
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        if let Some(attached) = self.programs.borrow_mut().get_mut(&program) {
            attached.push(shader);
        }
    }

    fn link_program(&self, _program: u32) {}

    fn program_link_status(&self, program: u32) -> bool {
        !self.failing_link && self.programs.borrow().contains_key(&program)
    }

    fn program_info_log(&self, _program: u32) -> String {
        "mock link failure".to_owned()
    }

    fn use_program(&self, program: Option<u32>) {
        self.record(Call::UseProgram(program));
    }

    fn delete_program(&self, program: u32) {
        self.programs.borrow_mut().remove(&program);
    }

    fn uniform_location(&self, program: u32, name: &str) -> Option<String> {
        if self.optimized_out.contains(name) {
            return None;
        }
        self.declarations(program, &["uniform"])
            .into_iter()
            .find(|n| n == name)
    }

    fn attrib_location(&self, program: u32, name: &str) -> Option<u32> {
        self.declarations(program, &["in", "attribute"])
            .iter()
            .position(|n| n == name)
            .map(|i| i as u32)
    }

    fn uniform_1_f32(&self, location: &String, x: f32) {
        self.record(Call::Uniform1(location.clone(), x));
    }

    fn uniform_2_f32(&self, location: &String, x: f32, y: f32) {
        self.record(Call::Uniform2(location.clone(), x, y));
    }

    fn uniform_3_f32(&self, location: &String, x: f32, y: f32, z: f32) {
        self.record(Call::Uniform3(location.clone(), x, y, z));
    }

    fn create_buffer(&self) -> Result<u32, String> {
        let id = self.id();
        self.buffers.borrow_mut().insert(id);
        Ok(id)
    }

    fn upload_array_buffer(&self, buffer: u32, data: &[f32]) {
        self.record(Call::Upload(buffer, data.to_vec()));
    }

    fn bind_array_buffer(&self, buffer: Option<u32>) {
        self.record(Call::BindBuffer(buffer));
    }

    fn delete_buffer(&self, buffer: u32) {
        self.buffers.borrow_mut().remove(&buffer);
    }

    fn float_attrib_pointer(&self, index: u32, size: i32) {
        self.record(Call::AttribPointer(index, size));
    }

    fn enable_alpha_blending(&self) {
        self.record(Call::Blend);
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.record(Call::Viewport(x, y, width, height));
    }

    fn clear_color_buffer(&self, r: f32, g: f32, b: f32, a: f32) {
        self.record(Call::Clear([r, g, b, a]));
    }

    fn draw_triangles(&self, first: i32, count: i32) {
        self.record(Call::Draw(first, count));
    }
}
