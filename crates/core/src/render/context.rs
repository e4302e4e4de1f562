//! Graphics context negotiation and drawable-surface sizing.
//!
//! [`GraphicsContext::acquire`] walks a fixed preference chain of context
//! kinds and attribute sets until the surface hands back a context. The tier
//! selected there is fixed for the context's lifetime.

use super::gl::Gl;
use super::mesh::Mesh;
use super::shader::ShaderProgram;
use crate::error::FxError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default upper bound on the device pixel ratio.
pub const DEFAULT_DPR_CAP: f64 = 2.0;

/// Capability tier of an acquired context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiTier {
    /// WebGL1 / GLSL ES 1.00.
    Legacy,
    /// WebGL2 / GLSL ES 3.00.
    High,
}

impl fmt::Display for ApiTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ApiTier::Legacy => "legacy",
            ApiTier::High => "high",
        })
    }
}

/// Context identifiers a surface is asked for, in the names the browser uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextKind {
    WebGl2,
    WebGl,
    /// Deprecated alias some older browsers still require.
    ExperimentalWebGl,
}

impl ContextKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ContextKind::WebGl2 => "webgl2",
            ContextKind::WebGl => "webgl",
            ContextKind::ExperimentalWebGl => "experimental-webgl",
        }
    }

    pub fn tier(self) -> ApiTier {
        match self {
            ContextKind::WebGl2 => ApiTier::High,
            ContextKind::WebGl | ContextKind::ExperimentalWebGl => ApiTier::Legacy,
        }
    }
}

/// Context creation attributes requested by the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextAttributes {
    pub alpha: bool,
    pub antialias: bool,
    pub premultiplied_alpha: bool,
    pub preserve_drawing_buffer: bool,
    pub fail_if_major_performance_caveat: bool,
    pub power_preference: &'static str,
}

impl Default for ContextAttributes {
    fn default() -> Self {
        Self {
            alpha: false,
            antialias: true,
            premultiplied_alpha: false,
            preserve_drawing_buffer: false,
            fail_if_major_performance_caveat: false,
            power_preference: "default",
        }
    }
}

/// Which tiers the caller accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TierPreference {
    /// Prefer the high tier, fall back to legacy.
    #[default]
    Any,
    /// High tier only; fail without trying anything else.
    RequireHigh,
}

impl TierPreference {
    pub fn allows(self, tier: ApiTier) -> bool {
        match self {
            TierPreference::Any => true,
            TierPreference::RequireHigh => tier == ApiTier::High,
        }
    }
}

/// Options for [`GraphicsContext::acquire`].
#[derive(Debug, Clone, PartialEq)]
pub struct RendererOptions {
    pub tier: TierPreference,
    pub alpha: bool,
    pub antialias: bool,
    /// Upper bound applied to the system device pixel ratio.
    pub dpr_cap: f64,
}

impl Default for RendererOptions {
    fn default() -> Self {
        Self {
            tier: TierPreference::Any,
            alpha: false,
            antialias: true,
            dpr_cap: DEFAULT_DPR_CAP,
        }
    }
}

impl RendererOptions {
    pub fn attributes(&self) -> ContextAttributes {
        ContextAttributes {
            alpha: self.alpha,
            antialias: self.antialias,
            ..ContextAttributes::default()
        }
    }
}

/// A drawable surface able to hand out graphics contexts.
pub trait Surface {
    type Gl: Gl;

    /// Attempts to create a context of `kind`. `None` for `attributes`
    /// means the platform defaults.
    fn try_context(
        &mut self,
        kind: ContextKind,
        attributes: Option<&ContextAttributes>,
    ) -> Option<Self::Gl>;

    /// System device pixel ratio; 1.0 when unknown.
    fn device_pixel_ratio(&self) -> f64;

    /// Sets the backing-buffer size in physical pixels.
    fn set_backing_size(&mut self, width: u32, height: u32);

    /// Removes the surface from its host. Called once, on dispose.
    fn detach(&mut self);
}

/// One step of the acquisition chain.
type Attempt = (ContextKind, bool);

/// Preference chain when any tier is allowed. `true` means "with the
/// requested attributes", `false` means platform defaults.
const FALLBACK_CHAIN: &[Attempt] = &[
    (ContextKind::WebGl2, true),
    (ContextKind::WebGl, true),
    (ContextKind::ExperimentalWebGl, true),
    (ContextKind::WebGl2, false),
    (ContextKind::WebGl, false),
    (ContextKind::ExperimentalWebGl, false),
];

const HIGH_ONLY: &[Attempt] = &[(ContextKind::WebGl2, true)];

/// A surface paired with the context acquired from it.
pub struct GraphicsContext<S: Surface> {
    surface: S,
    gl: S::Gl,
    tier: ApiTier,
    dpr: f64,
    logical_size: (u32, u32),
    backing_size: (u32, u32),
}

impl<S: Surface> GraphicsContext<S> {
    /// Acquires a context from `surface` following `options.tier`.
    ///
    /// # Errors
    ///
    /// `FxError::UnsupportedTier` when the high tier is required and the
    /// single attempt fails; `FxError::ContextUnavailable` when the whole
    /// fallback chain is exhausted.
    pub fn acquire(mut surface: S, options: &RendererOptions) -> Result<Self, FxError> {
        let attributes = options.attributes();
        let chain = match options.tier {
            TierPreference::Any => FALLBACK_CHAIN,
            TierPreference::RequireHigh => HIGH_ONLY,
        };

        let mut acquired = None;
        for &(kind, with_attributes) in chain {
            let attrs = with_attributes.then_some(&attributes);
            if let Some(gl) = surface.try_context(kind, attrs) {
                acquired = Some((gl, kind));
                break;
            }
            log::debug!(
                "{} context unavailable ({} attributes)",
                kind.as_str(),
                if with_attributes { "requested" } else { "default" }
            );
        }

        let Some((gl, kind)) = acquired else {
            return Err(match options.tier {
                TierPreference::RequireHigh => FxError::UnsupportedTier {
                    required: ApiTier::High,
                },
                TierPreference::Any => FxError::ContextUnavailable {
                    attempts: chain.len(),
                },
            });
        };

        let system_dpr = surface.device_pixel_ratio();
        let system_dpr = if system_dpr > 0.0 { system_dpr } else { 1.0 };
        let dpr = system_dpr.min(options.dpr_cap);
        log::info!(
            "acquired {} context ({} tier, dpr {dpr})",
            kind.as_str(),
            kind.tier()
        );

        Ok(Self {
            surface,
            gl,
            tier: kind.tier(),
            dpr,
            logical_size: (0, 0),
            backing_size: (0, 0),
        })
    }

    pub fn gl(&self) -> &S::Gl {
        &self.gl
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn tier(&self) -> ApiTier {
        self.tier
    }

    pub fn dpr(&self) -> f64 {
        self.dpr
    }

    pub fn logical_size(&self) -> (u32, u32) {
        self.logical_size
    }

    /// Backing-buffer size in physical pixels (the drawing-buffer size).
    pub fn backing_size(&self) -> (u32, u32) {
        self.backing_size
    }

    /// Sizes the backing buffer to `logical × dpr` and matches the viewport.
    ///
    /// Always reallocates; callers skip repeated sizes themselves.
    pub fn resize(&mut self, width: u32, height: u32) {
        let backing_w = (f64::from(width) * self.dpr) as u32;
        let backing_h = (f64::from(height) * self.dpr) as u32;
        self.surface.set_backing_size(backing_w, backing_h);
        self.gl.viewport(0, 0, backing_w as i32, backing_h as i32);
        self.logical_size = (width, height);
        self.backing_size = (backing_w, backing_h);
    }

    /// Clears to transparent black and draws `mesh` with `program`.
    pub fn render(&self, program: &ShaderProgram<S::Gl>, mesh: &Mesh<S::Gl>) {
        self.gl.clear_color_buffer(0.0, 0.0, 0.0, 0.0);
        mesh.draw(&self.gl, program);
    }
}
