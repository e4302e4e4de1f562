//! Fullscreen shader effects.
//!
//! An [`Effect`] supplies shader sources, renderer options and uniforms,
//! and reacts to frame, resize and pointer events by editing its uniform
//! table. The [`EffectController`](crate::controller::EffectController)
//! owns the GPU side and calls these hooks.

pub mod plasma;
pub mod silk;

use crate::render::{RendererOptions, Uniforms};

pub use plasma::{Plasma, PlasmaConfig};
pub use silk::{Silk, SilkConfig};

/// Timing for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameClock {
    /// Scheduler timestamp of this frame, in milliseconds.
    pub timestamp_ms: f64,
    /// Seconds since the controller was created.
    pub elapsed_secs: f64,
}

/// A fullscreen fragment-shader effect.
pub trait Effect {
    fn name(&self) -> &'static str;

    /// High-tier vertex source.
    fn vertex_source(&self) -> &'static str;

    /// High-tier fragment source.
    fn fragment_source(&self) -> &'static str;

    fn renderer_options(&self) -> RendererOptions;

    /// Uniforms the program starts with, kinds fixed from here on.
    fn initial_uniforms(&self) -> Uniforms;

    /// Whether the host should forward pointer moves at all.
    fn pointer_interactive(&self) -> bool {
        false
    }

    /// Whether a container smaller than one pixel leaves the last size in
    /// place instead of shrinking the backing buffer to 1x1.
    fn keeps_size_when_collapsed(&self) -> bool {
        false
    }

    /// Per-frame uniform update.
    fn on_frame(&mut self, clock: FrameClock, uniforms: &mut Uniforms);

    /// Called after the backing buffer changed size (physical pixels).
    fn on_resize(&mut self, _backing_size: (u32, u32), _uniforms: &mut Uniforms) {}

    /// Pointer position relative to the effect's container, CSS pixels.
    fn on_pointer_move(&mut self, _x: f32, _y: f32, _uniforms: &mut Uniforms) {}
}

/// All available effect names.
const EFFECT_NAMES: &[&str] = &[plasma::NAME, silk::NAME];

/// Effects selectable by name (CLI, JS configuration).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    Plasma,
    Silk,
}

impl EffectKind {
    /// Returns `None` if the name is not recognized.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            plasma::NAME => Some(EffectKind::Plasma),
            silk::NAME => Some(EffectKind::Silk),
            _ => None,
        }
    }

    pub fn list() -> &'static [&'static str] {
        EFFECT_NAMES
    }

    pub fn name(self) -> &'static str {
        match self {
            EffectKind::Plasma => plasma::NAME,
            EffectKind::Silk => silk::NAME,
        }
    }

    pub fn vertex_source(self) -> &'static str {
        match self {
            EffectKind::Plasma => plasma::VERTEX_SHADER,
            EffectKind::Silk => silk::VERTEX_SHADER,
        }
    }

    pub fn fragment_source(self) -> &'static str {
        match self {
            EffectKind::Plasma => plasma::FRAGMENT_SHADER,
            EffectKind::Silk => silk::FRAGMENT_SHADER,
        }
    }

    /// Renderer options of the effect's default configuration.
    pub fn renderer_options(self) -> RendererOptions {
        match self {
            EffectKind::Plasma => Plasma::default().renderer_options(),
            EffectKind::Silk => Silk::default().renderer_options(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_name_resolves() {
        for name in EffectKind::list() {
            let kind = EffectKind::from_name(name).unwrap();
            assert_eq!(kind.name(), *name);
        }
    }

    #[test]
    fn unknown_name_is_none() {
        assert_eq!(EffectKind::from_name("aurora"), None);
    }

    #[test]
    fn kind_sources_match_effect_sources() {
        assert_eq!(
            EffectKind::Plasma.fragment_source(),
            Plasma::default().fragment_source()
        );
        assert_eq!(
            EffectKind::Silk.vertex_source(),
            Silk::default().vertex_source()
        );
    }
}
