//! `HtmlCanvasElement` as a [`Surface`].

use js_sys::{Object, Reflect};
use studio_fx_core::render::{ContextAttributes, ContextKind, Surface};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{HtmlCanvasElement, WebGl2RenderingContext, WebGlRenderingContext, Window};

use crate::options::{attribute_entries, AttrValue};

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    window: Window,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement, window: Window) -> Self {
        Self { canvas, window }
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }
}

fn context_options(attrs: &ContextAttributes) -> Result<JsValue, JsValue> {
    let options = Object::new();
    for (key, value) in attribute_entries(attrs) {
        let value = match value {
            AttrValue::Bool(b) => JsValue::from_bool(b),
            AttrValue::Str(s) => JsValue::from_str(s),
        };
        Reflect::set(&options, &JsValue::from_str(key), &value)?;
    }
    Ok(options.into())
}

impl Surface for CanvasSurface {
    type Gl = glow::Context;

    fn try_context(
        &mut self,
        kind: ContextKind,
        attributes: Option<&ContextAttributes>,
    ) -> Option<glow::Context> {
        let raw = match attributes {
            Some(attrs) => context_options(attrs).and_then(|options| {
                self.canvas
                    .get_context_with_context_options(kind.as_str(), &options)
            }),
            None => self.canvas.get_context(kind.as_str()),
        };
        let object = match raw {
            Ok(Some(object)) => object,
            Ok(None) => return None,
            Err(e) => {
                log::debug!("getContext({}) threw: {e:?}", kind.as_str());
                return None;
            }
        };

        match kind {
            ContextKind::WebGl2 => object
                .dyn_into::<WebGl2RenderingContext>()
                .ok()
                .map(glow::Context::from_webgl2_context),
            ContextKind::WebGl | ContextKind::ExperimentalWebGl => object
                .dyn_into::<WebGlRenderingContext>()
                .ok()
                .map(glow::Context::from_webgl1_context),
        }
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.window.device_pixel_ratio()
    }

    fn set_backing_size(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn detach(&mut self) {
        self.canvas.remove();
    }
}
