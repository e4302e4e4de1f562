//! Wiring between a page element and an [`EffectController`].
//!
//! A mount owns the controller plus every browser object that feeds it:
//! the frame callback, the resize and intersection observers and the
//! pointer listener. Closures hold weak references to the controller so
//! dropping the mount is enough to free everything.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use js_sys::Array;
use studio_fx_core::{Effect, EffectController, Plasma, PlasmaConfig, Silk, SilkConfig};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, HtmlCanvasElement, HtmlElement, IntersectionObserver,
    IntersectionObserverEntry, MouseEvent, ResizeObserver, ResizeObserverEntry, Window,
};

use crate::canvas::CanvasSurface;
use crate::error::HostError;
use crate::options::{
    usable_size, FILL_STYLE, PLASMA_CONTAINER_CLASS, PLASMA_FALLBACK_CLASS,
    PLASMA_POINTER_SELECTOR, SILK_WRAPPER_CLASS,
};
use crate::scheduler::{FrameSlot, RafScheduler};

/// The controller operations the browser callbacks need, with the effect
/// type erased.
trait Lifecycle {
    fn start(&mut self);
    fn set_visible(&mut self, visible: bool);
    fn resize(&mut self, width: f64, height: f64) -> bool;
    fn pointer_move(&mut self, x: f32, y: f32);
    fn tick(&mut self, timestamp_ms: f64) -> bool;
    fn dispose(&mut self);
}

impl<E: Effect> Lifecycle for EffectController<CanvasSurface, E, RafScheduler> {
    fn start(&mut self) {
        EffectController::start(self);
    }

    fn set_visible(&mut self, visible: bool) {
        EffectController::set_visible(self, visible);
    }

    fn resize(&mut self, width: f64, height: f64) -> bool {
        EffectController::resize(self, width, height)
    }

    fn pointer_move(&mut self, x: f32, y: f32) {
        EffectController::pointer_move(self, x, y);
    }

    fn tick(&mut self, timestamp_ms: f64) -> bool {
        EffectController::tick(self, timestamp_ms)
    }

    fn dispose(&mut self) {
        EffectController::dispose(self);
    }
}

type Shared = Rc<RefCell<dyn Lifecycle>>;
type ObserverCallback = Closure<dyn FnMut(Array)>;

/// Where an effect goes in the page.
struct MountTarget {
    /// Receives the canvas; its size drives the backing buffer.
    container: HtmlElement,
    /// Observed for visibility.
    visibility: Element,
    /// Receives `mousemove` listeners for interactive effects.
    pointer: Element,
    /// Element created for this mount, removed on dispose.
    wrapper: Option<Element>,
    fill_container: bool,
}

/// One live effect in the page.
pub struct Mount {
    name: &'static str,
    controller: Shared,
    frame: FrameSlot,
    resize: Option<(ResizeObserver, ObserverCallback)>,
    visibility: Option<(IntersectionObserver, ObserverCallback)>,
    pointer: Option<(Element, Closure<dyn FnMut(MouseEvent)>)>,
    wrapper: Option<Element>,
}

impl Mount {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Stops the loop, disconnects observers and listeners, releases GPU
    /// objects and removes the canvas. Idempotent.
    pub fn dispose(&mut self) {
        if let Some((observer, _callback)) = self.visibility.take() {
            observer.disconnect();
        }
        if let Some((observer, _callback)) = self.resize.take() {
            observer.disconnect();
        }
        if let Some((target, callback)) = self.pointer.take() {
            if let Err(e) = target
                .remove_event_listener_with_callback("mousemove", callback.as_ref().unchecked_ref())
            {
                log::warn!("{}: removing pointer listener failed: {e:?}", self.name);
            }
        }
        self.controller.borrow_mut().dispose();
        self.frame.borrow_mut().take();
        if let Some(wrapper) = self.wrapper.take() {
            wrapper.remove();
        }
    }
}

impl Drop for Mount {
    fn drop(&mut self) {
        self.dispose();
    }
}

fn create_canvas(document: &Document) -> Result<HtmlCanvasElement, HostError> {
    document
        .create_element("canvas")?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| HostError::Dom("created element is not a canvas".to_owned()))
}

fn fill_container(canvas: &HtmlCanvasElement) -> Result<(), JsValue> {
    let style = canvas.style();
    for (property, value) in FILL_STYLE {
        style.set_property(property, value)?;
    }
    Ok(())
}

fn attach_canvas(
    document: &Document,
    target: &MountTarget,
) -> Result<HtmlCanvasElement, HostError> {
    let canvas = create_canvas(document)?;
    if target.fill_container {
        fill_container(&canvas)?;
    }
    target.container.append_child(&canvas)?;
    Ok(canvas)
}

fn has_intersection_observer(window: &Window) -> bool {
    js_sys::Reflect::has(window, &JsValue::from_str("IntersectionObserver")).unwrap_or(false)
}

fn mount<E: Effect + 'static>(
    window: &Window,
    document: &Document,
    target: MountTarget,
    effect: E,
) -> Result<Mount, HostError> {
    let name = effect.name();
    let canvas = match attach_canvas(document, &target) {
        Ok(canvas) => canvas,
        Err(e) => {
            if let Some(wrapper) = &target.wrapper {
                wrapper.remove();
            }
            return Err(e);
        }
    };

    let interactive = effect.pointer_interactive();
    let frame = FrameSlot::default();
    let surface = CanvasSurface::new(canvas.clone(), window.clone());
    let scheduler = RafScheduler::new(window.clone(), Rc::clone(&frame));
    let controller = match EffectController::new(surface, effect, scheduler) {
        Ok(controller) => controller,
        Err(e) => {
            canvas.remove();
            if let Some(wrapper) = &target.wrapper {
                wrapper.remove();
            }
            return Err(e.into());
        }
    };
    let controller: Shared = Rc::new(RefCell::new(controller));

    let weak = Rc::downgrade(&controller);
    *frame.borrow_mut() = Some(Closure::<dyn FnMut(f64)>::new(move |timestamp: f64| {
        if let Some(c) = weak.upgrade() {
            c.borrow_mut().tick(timestamp);
        }
    }));

    // From here on, dropping `mount` on an early return tears down whatever
    // was already connected.
    let mut mount = Mount {
        name,
        controller,
        frame,
        resize: None,
        visibility: None,
        pointer: None,
        wrapper: target.wrapper,
    };

    let rect = target.container.get_bounding_client_rect();
    if let Some((w, h)) = usable_size(rect.width(), rect.height()) {
        mount.controller.borrow_mut().resize(w, h);
    }
    mount.resize = Some(observe_size(&mount.controller, &target.container)?);

    if interactive {
        mount.pointer = Some(listen_pointer(
            &mount.controller,
            &target.pointer,
            target.container.clone(),
        )?);
    }

    if has_intersection_observer(window) {
        mount.visibility = Some(observe_visibility(&mount.controller, &target.visibility)?);
    } else {
        mount.controller.borrow_mut().start();
    }

    log::info!("{name} effect mounted");
    Ok(mount)
}

fn observe_size(
    controller: &Shared,
    container: &HtmlElement,
) -> Result<(ResizeObserver, ObserverCallback), HostError> {
    let weak: Weak<RefCell<dyn Lifecycle>> = Rc::downgrade(controller);
    let callback = Closure::<dyn FnMut(Array)>::new(move |entries: Array| {
        let Some(c) = weak.upgrade() else { return };
        for entry in entries.iter() {
            if let Ok(entry) = entry.dyn_into::<ResizeObserverEntry>() {
                let rect = entry.content_rect();
                c.borrow_mut().resize(rect.width(), rect.height());
            }
        }
    });
    let observer = ResizeObserver::new(callback.as_ref().unchecked_ref())?;
    observer.observe(container);
    Ok((observer, callback))
}

fn observe_visibility(
    controller: &Shared,
    element: &Element,
) -> Result<(IntersectionObserver, ObserverCallback), HostError> {
    let weak: Weak<RefCell<dyn Lifecycle>> = Rc::downgrade(controller);
    let callback = Closure::<dyn FnMut(Array)>::new(move |entries: Array| {
        let Some(c) = weak.upgrade() else { return };
        for entry in entries.iter() {
            if let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() {
                c.borrow_mut().set_visible(entry.is_intersecting());
            }
        }
    });
    let observer = IntersectionObserver::new(callback.as_ref().unchecked_ref())?;
    observer.observe(element);
    Ok((observer, callback))
}

fn listen_pointer(
    controller: &Shared,
    target: &Element,
    origin: HtmlElement,
) -> Result<(Element, Closure<dyn FnMut(MouseEvent)>), HostError> {
    let weak: Weak<RefCell<dyn Lifecycle>> = Rc::downgrade(controller);
    let callback = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
        let Some(c) = weak.upgrade() else { return };
        let rect = origin.get_bounding_client_rect();
        let x = f64::from(event.client_x()) - rect.left();
        let y = f64::from(event.client_y()) - rect.top();
        c.borrow_mut().pointer_move(x as f32, y as f32);
    });
    target.add_event_listener_with_callback("mousemove", callback.as_ref().unchecked_ref())?;
    Ok((target.clone(), callback))
}

/// Mounts the plasma into `container`, replacing its contents.
pub fn mount_plasma(
    window: &Window,
    document: &Document,
    container: Element,
    config: PlasmaConfig,
) -> Result<Mount, HostError> {
    container.set_inner_html("");
    let classes = container.class_list();
    classes.add_1(PLASMA_CONTAINER_CLASS)?;
    classes.remove_1(PLASMA_FALLBACK_CLASS)?;

    let pointer = container
        .closest(PLASMA_POINTER_SELECTOR)?
        .unwrap_or_else(|| container.clone());
    let container = container
        .dyn_into::<HtmlElement>()
        .map_err(|_| HostError::Dom("plasma container is not an HTML element".to_owned()))?;

    let target = MountTarget {
        visibility: container.clone().into(),
        container,
        pointer,
        wrapper: None,
        fill_container: true,
    };
    mount(window, document, target, Plasma::new(config))
}

/// Mounts a silk fill as the first child of `button`.
pub fn mount_silk(
    window: &Window,
    document: &Document,
    button: Element,
    config: SilkConfig,
) -> Result<Mount, HostError> {
    let wrapper = document
        .create_element("div")?
        .dyn_into::<HtmlElement>()
        .map_err(|_| HostError::Dom("created element is not an HTML element".to_owned()))?;
    wrapper.set_class_name(SILK_WRAPPER_CLASS);
    button.insert_before(&wrapper, button.first_child().as_ref())?;

    let target = MountTarget {
        container: wrapper.clone(),
        pointer: button.clone(),
        visibility: button,
        wrapper: Some(wrapper.into()),
        fill_container: false,
    };
    mount(window, document, target, Silk::new(config))
}
