//! Shader compilation, legacy-tier downgrade, and uniform management.
//!
//! Effects author their shaders for the high tier (GLSL ES 3.00). When the
//! context only offers the legacy tier, sources pass through a fixed
//! textual rewrite ([`downgrade_source`]) before compilation. The rewrite
//! does not parse GLSL: it only knows the patterns listed in
//! [`VERTEX_REWRITES`] and [`FRAGMENT_REWRITES`] plus the `fragColor`
//! assignment. Shaders that must run on the legacy tier may only use
//! high-tier syntax that appears in those tables; anything else survives
//! the rewrite untouched and fails to compile.

use super::context::ApiTier;
use super::gl::Gl;
use super::uniform::{UniformValue, Uniforms};
use crate::error::FxError;
use std::fmt;

/// The two programmable pipeline stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        })
    }
}

/// High-tier version pragma and its legacy replacement.
pub const VERSION_REWRITE: (&str, &str) = ("#version 300 es", "#version 100");

/// Vertex-stage rewrites, applied to the first occurrence of each pattern.
pub const VERTEX_REWRITES: &[(&str, &str)] = &[
    VERSION_REWRITE,
    ("in vec2 position;", "attribute vec2 position;"),
    ("in vec2 uv;", "attribute vec2 uv;"),
    ("out vec2 vUv;", "varying vec2 vUv;"),
];

/// Fragment-stage rewrites, applied to the first occurrence of each pattern.
/// Every `fragColor =` assignment is then rewritten to `gl_FragColor =`.
pub const FRAGMENT_REWRITES: &[(&str, &str)] = &[
    VERSION_REWRITE,
    ("in vec2 vUv;", "varying vec2 vUv;"),
    ("out vec4 fragColor;", ""),
];

const FRAG_OUTPUT: &str = "fragColor";
const LEGACY_FRAG_OUTPUT: &str = "gl_FragColor =";

/// Rewrites high-tier shader source into its legacy-tier equivalent.
///
/// Idempotent: legacy source contains none of the high-tier patterns, so
/// applying the rewrite again returns it unchanged.
pub fn downgrade_source(stage: ShaderStage, source: &str) -> String {
    let table = match stage {
        ShaderStage::Vertex => VERTEX_REWRITES,
        ShaderStage::Fragment => FRAGMENT_REWRITES,
    };
    let rewritten = table
        .iter()
        .fold(source.to_owned(), |src, (from, to)| src.replacen(from, to, 1));
    match stage {
        ShaderStage::Vertex => rewritten,
        ShaderStage::Fragment => rewrite_output_assignments(&rewritten),
    }
}

/// Replaces every `fragColor<whitespace>*=` with `gl_FragColor =`.
fn rewrite_output_assignments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut rest = source;
    while let Some(idx) = rest.find(FRAG_OUTPUT) {
        let after = &rest[idx + FRAG_OUTPUT.len()..];
        let trimmed = after.trim_start();
        if let Some(tail) = trimmed.strip_prefix('=') {
            out.push_str(&rest[..idx]);
            out.push_str(LEGACY_FRAG_OUTPUT);
            rest = tail;
        } else {
            out.push_str(&rest[..idx + FRAG_OUTPUT.len()]);
            rest = after;
        }
    }
    out.push_str(rest);
    out
}

/// Returns the source to hand to the driver for `tier`.
pub fn source_for_tier(tier: ApiTier, stage: ShaderStage, source: &str) -> String {
    match tier {
        ApiTier::High => source.to_owned(),
        ApiTier::Legacy => downgrade_source(stage, source),
    }
}

/// Formats a shader compilation error for human-readable debugging.
///
/// Prepends right-aligned line numbers to each line of `source`, then
/// appends the driver's error `log`, so line references in the log can be
/// matched against the GLSL.
pub fn format_shader_error(source: &str, log: &str) -> String {
    let lines: Vec<&str> = source.lines().collect();
    let width = lines.len().max(1).to_string().len();

    let numbered = lines
        .iter()
        .enumerate()
        .map(|(i, line)| format!("{:>width$}: {line}", i + 1))
        .collect::<Vec<_>>()
        .join("\n");

    match (numbered.is_empty(), log.is_empty()) {
        (true, true) => String::new(),
        (true, false) => log.to_owned(),
        (false, true) => numbered,
        (false, false) => format!("{numbered}\n\n{log}"),
    }
}

/// Compiles a single stage.
///
/// # Errors
///
/// Returns `FxError::CompileError` carrying the numbered source and driver
/// log; the shader object is deleted before returning.
pub fn compile_shader<G: Gl>(
    gl: &G,
    stage: ShaderStage,
    source: &str,
) -> Result<G::Shader, FxError> {
    let shader = gl.create_shader(stage).map_err(|reason| FxError::Resource {
        object: "shader",
        reason,
    })?;
    gl.shader_source(shader, source);
    gl.compile_shader(shader);

    if gl.shader_compile_status(shader) {
        return Ok(shader);
    }

    let info_log = gl.shader_info_log(shader);
    gl.delete_shader(shader);
    log::error!("{stage} shader failed to compile: {info_log}");
    log::debug!("offending {stage} source:\n{source}");
    Err(FxError::CompileError {
        stage,
        log: format_shader_error(source, &info_log),
        shader_source: source.to_owned(),
    })
}

struct UniformSlot<L> {
    name: String,
    location: Option<L>,
}

/// A linked vertex/fragment program plus its tracked uniforms.
///
/// The program keeps both shader objects attached for its whole lifetime
/// and deletes all three in [`ShaderProgram::release`].
pub struct ShaderProgram<G: Gl> {
    program: G::Program,
    vertex: G::Shader,
    fragment: G::Shader,
    uniforms: Uniforms,
    slots: Vec<UniformSlot<G::UniformLocation>>,
}

impl<G: Gl> ShaderProgram<G> {
    /// Compiles both stages for `tier`, links them, and resolves a location
    /// for every uniform in `uniforms`.
    ///
    /// Uniforms the linked program does not expose (misspelled, or removed
    /// by the compiler) keep their CPU value but never upload.
    ///
    /// # Errors
    ///
    /// `FxError::CompileError` if either stage fails, `FxError::LinkError`
    /// if linking fails. Objects created up to that point are deleted.
    pub fn compile(
        gl: &G,
        tier: ApiTier,
        vertex_src: &str,
        fragment_src: &str,
        uniforms: Uniforms,
    ) -> Result<Self, FxError> {
        let vertex_src = source_for_tier(tier, ShaderStage::Vertex, vertex_src);
        let fragment_src = source_for_tier(tier, ShaderStage::Fragment, fragment_src);

        let vertex = compile_shader(gl, ShaderStage::Vertex, &vertex_src)?;
        let fragment = match compile_shader(gl, ShaderStage::Fragment, &fragment_src) {
            Ok(f) => f,
            Err(e) => {
                gl.delete_shader(vertex);
                return Err(e);
            }
        };

        let program = match link(gl, vertex, fragment) {
            Ok(p) => p,
            Err(e) => {
                gl.delete_shader(vertex);
                gl.delete_shader(fragment);
                return Err(e);
            }
        };

        gl.use_program(Some(program));
        let slots = uniforms
            .iter()
            .map(|(name, _)| {
                let location = gl.uniform_location(program, name);
                if location.is_none() {
                    log::debug!("uniform {name} is not active in the linked program");
                }
                UniformSlot {
                    name: name.to_owned(),
                    location,
                }
            })
            .collect();

        Ok(Self {
            program,
            vertex,
            fragment,
            uniforms,
            slots,
        })
    }

    pub fn program(&self) -> G::Program {
        self.program
    }

    pub fn uniforms(&self) -> &Uniforms {
        &self.uniforms
    }

    /// Mutable access to the tracked values; changes reach the GPU on the
    /// next [`ShaderProgram::update_uniforms`].
    pub fn uniforms_mut(&mut self) -> &mut Uniforms {
        &mut self.uniforms
    }

    /// True when `name` is tracked and resolved to a location.
    pub fn is_active(&self, name: &str) -> bool {
        self.slot(name).is_some_and(|s| s.location.is_some())
    }

    /// Stores `value` for `name` and uploads it immediately.
    ///
    /// A no-op for names that are untracked or have no location.
    pub fn set_uniform(&mut self, gl: &G, name: &str, value: impl Into<UniformValue>) {
        let value = value.into();
        if !self.uniforms.set(name, value) {
            return;
        }
        if let Some(location) = self.slot(name).and_then(|s| s.location.as_ref()) {
            value.upload(gl, location);
        }
    }

    /// Uploads every resolved uniform's current value, changed or not.
    pub fn update_uniforms(&self, gl: &G) {
        for slot in &self.slots {
            let (Some(location), Some(value)) = (&slot.location, self.uniforms.get(&slot.name))
            else {
                continue;
            };
            value.upload(gl, location);
        }
    }

    /// Deletes the program and both shader objects.
    pub fn release(self, gl: &G) {
        gl.delete_program(self.program);
        gl.delete_shader(self.vertex);
        gl.delete_shader(self.fragment);
    }

    fn slot(&self, name: &str) -> Option<&UniformSlot<G::UniformLocation>> {
        self.slots.iter().find(|s| s.name == name)
    }
}

fn link<G: Gl>(gl: &G, vertex: G::Shader, fragment: G::Shader) -> Result<G::Program, FxError> {
    let program = gl.create_program().map_err(|reason| FxError::Resource {
        object: "program",
        reason,
    })?;
    gl.attach_shader(program, vertex);
    gl.attach_shader(program, fragment);
    gl.link_program(program);

    if gl.program_link_status(program) {
        return Ok(program);
    }

    let info_log = gl.program_info_log(program);
    gl.delete_program(program);
    log::error!("shader program failed to link: {info_log}");
    Err(FxError::LinkError { log: info_log })
}
