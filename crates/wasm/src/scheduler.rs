//! `requestAnimationFrame` as a [`FrameScheduler`].

use std::cell::RefCell;
use std::rc::Rc;

use studio_fx_core::FrameScheduler;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Performance, Window};

/// Slot for the per-frame callback. Filled once the controller that the
/// callback drives exists; emptied on dispose.
pub type FrameSlot = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

pub struct RafScheduler {
    window: Window,
    performance: Option<Performance>,
    callback: FrameSlot,
}

impl RafScheduler {
    pub fn new(window: Window, callback: FrameSlot) -> Self {
        let performance = window.performance();
        Self {
            window,
            performance,
            callback,
        }
    }
}

impl FrameScheduler for RafScheduler {
    type Handle = i32;

    fn request_frame(&mut self) -> Option<i32> {
        let slot = self.callback.borrow();
        let callback = slot.as_ref()?;
        match self
            .window
            .request_animation_frame(callback.as_ref().unchecked_ref())
        {
            Ok(handle) => Some(handle),
            Err(e) => {
                log::warn!("requestAnimationFrame failed: {e:?}");
                None
            }
        }
    }

    fn cancel_frame(&mut self, handle: i32) {
        if let Err(e) = self.window.cancel_animation_frame(handle) {
            log::debug!("cancelAnimationFrame({handle}) failed: {e:?}");
        }
    }

    fn now_ms(&self) -> f64 {
        self.performance.as_ref().map_or(0.0, Performance::now)
    }
}
