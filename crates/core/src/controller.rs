//! Per-mount lifecycle: context, program, mesh and animation loop.
//!
//! ```text
//! Uninitialized --visible--> Running <--visible/hidden--> Paused
//!        \                      |                          /
//!         `------------------ dispose ---------------------'--> Disposed
//! ```
//!
//! The host drives everything: it forwards visibility, size and pointer
//! events, and calls [`EffectController::tick`] from the frame callback it
//! scheduled through the [`FrameScheduler`].

use crate::effect::{Effect, FrameClock};
use crate::error::FxError;
use crate::render::{FullscreenTriangle, GraphicsContext, Mesh, ShaderProgram, Surface};
use crate::scheduler::FrameScheduler;

/// Animation-loop state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Set up, waiting for the first visibility signal.
    Uninitialized,
    Running,
    Paused,
    /// Terminal. GPU objects released, surface detached.
    Disposed,
}

/// GPU objects owned by a live controller.
struct Resources<S: Surface> {
    program: ShaderProgram<S::Gl>,
    mesh: Mesh<S::Gl>,
}

pub struct EffectController<S: Surface, E: Effect, F: FrameScheduler> {
    context: GraphicsContext<S>,
    resources: Option<Resources<S>>,
    effect: E,
    scheduler: F,
    state: LoopState,
    pending: Option<F::Handle>,
    origin_ms: f64,
    last_size: Option<(u32, u32)>,
    frames: u64,
}

impl<S: Surface, E: Effect, F: FrameScheduler> EffectController<S, E, F> {
    /// Acquires a context from `surface`, compiles the effect and uploads
    /// the fullscreen triangle. No frame is scheduled until the first
    /// [`set_visible(true)`](Self::set_visible) or [`start`](Self::start).
    ///
    /// # Errors
    ///
    /// Any acquisition, compile, link or buffer error. Partially created GPU
    /// objects are released before returning.
    pub fn new(surface: S, effect: E, scheduler: F) -> Result<Self, FxError> {
        let context = GraphicsContext::acquire(surface, &effect.renderer_options())?;
        let gl = context.gl();
        let program = ShaderProgram::compile(
            gl,
            context.tier(),
            effect.vertex_source(),
            effect.fragment_source(),
            effect.initial_uniforms(),
        )?;
        let mesh = match Mesh::upload(gl, &FullscreenTriangle::geometry()) {
            Ok(mesh) => mesh,
            Err(e) => {
                program.release(gl);
                return Err(e);
            }
        };

        log::info!("{} effect ready ({} tier)", effect.name(), context.tier());
        let origin_ms = scheduler.now_ms();
        Ok(Self {
            context,
            resources: Some(Resources { program, mesh }),
            effect,
            scheduler,
            state: LoopState::Uninitialized,
            pending: None,
            origin_ms,
            last_size: None,
            frames: 0,
        })
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    pub fn effect(&self) -> &E {
        &self.effect
    }

    pub fn context(&self) -> &GraphicsContext<S> {
        &self.context
    }

    pub fn scheduler(&self) -> &F {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut F {
        &mut self.scheduler
    }

    /// Frames drawn since creation.
    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }

    /// Starts the loop unconditionally, for hosts that cannot report
    /// visibility.
    pub fn start(&mut self) {
        self.set_visible(true);
    }

    /// Starts or stops the loop. Hiding cancels the pending frame request,
    /// so at most the tick already in flight still runs, and it draws nothing.
    pub fn set_visible(&mut self, visible: bool) {
        match (self.state, visible) {
            (LoopState::Uninitialized | LoopState::Paused, true) => {
                log::debug!("{}: loop started", self.effect.name());
                self.state = LoopState::Running;
                self.schedule();
            }
            (LoopState::Running, false) => {
                log::debug!("{}: loop paused", self.effect.name());
                self.state = LoopState::Paused;
                self.cancel_pending();
            }
            _ => {}
        }
    }

    /// Applies a container size in CSS pixels. Sizes are floored and
    /// clamped to at least 1. Returns `false` when the floored size equals
    /// the last applied one, in which case nothing is reallocated.
    ///
    /// Effects that keep their size when collapsed ignore sizes below one
    /// pixel on either axis.
    pub fn resize(&mut self, width: f64, height: f64) -> bool {
        if self.state == LoopState::Disposed {
            return false;
        }
        if self.effect.keeps_size_when_collapsed() && !(width >= 1.0 && height >= 1.0) {
            log::trace!("{}: ignoring collapsed size {width}x{height}", self.effect.name());
            return false;
        }
        let size = (floor_dimension(width), floor_dimension(height));
        if self.last_size == Some(size) {
            return false;
        }
        self.last_size = Some(size);

        self.context.resize(size.0, size.1);
        if let Some(res) = self.resources.as_mut() {
            self.effect
                .on_resize(self.context.backing_size(), res.program.uniforms_mut());
        }
        log::debug!(
            "{}: resized to {}x{} (backing {:?})",
            self.effect.name(),
            size.0,
            size.1,
            self.context.backing_size()
        );
        true
    }

    /// Forwards a pointer position relative to the container. Ignored when
    /// the effect is not interactive.
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        if !self.effect.pointer_interactive() {
            return;
        }
        if let Some(res) = self.resources.as_mut() {
            self.effect.on_pointer_move(x, y, res.program.uniforms_mut());
        }
    }

    /// Frame callback. Draws one frame and requests the next while
    /// running; returns whether anything was drawn.
    pub fn tick(&mut self, timestamp_ms: f64) -> bool {
        self.pending = None;
        if self.state != LoopState::Running {
            return false;
        }
        let Some(res) = self.resources.as_mut() else {
            return false;
        };

        let clock = FrameClock {
            timestamp_ms,
            elapsed_secs: (timestamp_ms - self.origin_ms) * 0.001,
        };
        self.effect.on_frame(clock, res.program.uniforms_mut());
        self.context.render(&res.program, &res.mesh);
        self.frames += 1;

        self.schedule();
        true
    }

    /// Stops the loop, releases GPU objects and detaches the surface.
    /// Further calls are no-ops.
    pub fn dispose(&mut self) {
        if self.state == LoopState::Disposed {
            return;
        }
        self.cancel_pending();
        if let Some(Resources { program, mesh }) = self.resources.take() {
            let gl = self.context.gl();
            mesh.release(gl);
            program.release(gl);
        }
        self.context.surface_mut().detach();
        self.state = LoopState::Disposed;
        log::info!(
            "{}: disposed after {} frames",
            self.effect.name(),
            self.frames
        );
    }

    fn schedule(&mut self) {
        match self.scheduler.request_frame() {
            Some(handle) => self.pending = Some(handle),
            None => {
                log::warn!(
                    "{}: frame request refused, pausing",
                    self.effect.name()
                );
                self.state = LoopState::Paused;
            }
        }
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
    }
}

impl<S: Surface, E: Effect, F: FrameScheduler> Drop for EffectController<S, E, F> {
    fn drop(&mut self) {
        self.dispose();
    }
}

fn floor_dimension(v: f64) -> u32 {
    if v.is_finite() && v >= 1.0 {
        v.floor().min(f64::from(u32::MAX)) as u32
    } else {
        1
    }
}
