#![deny(unsafe_code)]
//! Core of the studio-fx page effects.
//!
//! Provides the `Gl`/`Surface` seams with context fallback and shader
//! downgrade (`render`), the `Effect` trait with the plasma and silk
//! effects, the `EffectController` lifecycle, hex color parsing and the
//! ping-pong animation clock.
//!
//! Everything here is platform-neutral. The `render` feature adds the
//! `glow::Context` backend used by the browser crate.

pub mod color;
pub mod controller;
pub mod effect;
pub mod error;
pub mod ping_pong;
pub mod render;
pub mod scheduler;

pub use color::{hex_to_rgb, hex_to_rgb_or_fallback};
pub use controller::{EffectController, LoopState};
pub use effect::{Effect, EffectKind, FrameClock, Plasma, PlasmaConfig, Silk, SilkConfig};
pub use error::FxError;
pub use ping_pong::{Direction, PingPong};
pub use render::{ApiTier, RendererOptions, Surface, TierPreference};
pub use scheduler::FrameScheduler;
