//! Browser host for the studio-fx effects.
//!
//! Exposes `mount_plasma`, `mount_silk_buttons` and `mount_all` through
//! `wasm-bindgen`. Each returns an [`EffectHandle`] whose `dispose()` stops
//! the effects, releases their GPU objects and restores the page. Failures
//! are logged to the console and never propagate to the page script.

pub mod options;

#[cfg(target_arch = "wasm32")]
mod canvas;
#[cfg(target_arch = "wasm32")]
mod error;
#[cfg(target_arch = "wasm32")]
mod host;
#[cfg(target_arch = "wasm32")]
mod scheduler;

#[cfg(target_arch = "wasm32")]
pub use bindings::*;

#[cfg(target_arch = "wasm32")]
mod bindings {
    use studio_fx_core::{PlasmaConfig, SilkConfig};
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;
    use web_sys::Element;

    use crate::host::{self, Mount};
    use crate::options::{parse_config, PLASMA_CONTAINER_ID, SILK_BUTTON_SELECTOR};

    #[wasm_bindgen(start)]
    pub fn start() {
        console_error_panic_hook::set_once();
        wasm_logger::init(wasm_logger::Config::new(log::Level::Info));
    }

    /// Live effects created by one mount call.
    #[wasm_bindgen]
    pub struct EffectHandle {
        mounts: Vec<Mount>,
    }

    #[wasm_bindgen]
    impl EffectHandle {
        /// Number of effects still attached.
        #[wasm_bindgen(getter)]
        pub fn count(&self) -> usize {
            self.mounts.len()
        }

        pub fn dispose(&mut self) {
            for mut mount in self.mounts.drain(..) {
                log::debug!("disposing {}", mount.name());
                mount.dispose();
            }
        }
    }

    fn parse<T: serde::de::DeserializeOwned + Default>(
        what: &str,
        json: Option<String>,
    ) -> Option<T> {
        match parse_config(json.as_deref()) {
            Ok(config) => Some(config),
            Err(e) => {
                log::error!("invalid {what} config: {e}");
                None
            }
        }
    }

    /// Mounts the plasma into `#aboutAurora`. `config` is optional JSON in
    /// the shape of `PlasmaConfig`. Returns `undefined` when nothing was
    /// mounted.
    #[wasm_bindgen]
    pub fn mount_plasma(config: Option<String>) -> Option<EffectHandle> {
        let config: PlasmaConfig = parse("plasma", config)?;
        let window = web_sys::window()?;
        let document = window.document()?;
        let Some(container) = document.get_element_by_id(PLASMA_CONTAINER_ID) else {
            log::error!("plasma container #{PLASMA_CONTAINER_ID} not found");
            return None;
        };

        match host::mount_plasma(&window, &document, container, config) {
            Ok(mount) => Some(EffectHandle {
                mounts: vec![mount],
            }),
            Err(e) => {
                log::error!("plasma effect failed: {e}");
                None
            }
        }
    }

    /// Mounts a silk fill into every `.btn--primary`. Buttons that fail are
    /// skipped.
    #[wasm_bindgen]
    pub fn mount_silk_buttons(config: Option<String>) -> EffectHandle {
        let mut handle = EffectHandle { mounts: Vec::new() };
        let Some(config) = parse::<SilkConfig>("silk", config) else {
            return handle;
        };
        let Some(window) = web_sys::window() else {
            return handle;
        };
        let Some(document) = window.document() else {
            return handle;
        };
        let buttons = match document.query_selector_all(SILK_BUTTON_SELECTOR) {
            Ok(list) => list,
            Err(e) => {
                log::error!("querying {SILK_BUTTON_SELECTOR} failed: {e:?}");
                return handle;
            }
        };

        for i in 0..buttons.length() {
            let Some(button) = buttons.get(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            match host::mount_silk(&window, &document, button, config.clone()) {
                Ok(mount) => handle.mounts.push(mount),
                Err(e) => log::error!("silk effect failed: {e}"),
            }
        }
        log::info!("{} silk buttons mounted", handle.mounts.len());
        handle
    }

    /// Mounts both effects with their default configuration.
    #[wasm_bindgen]
    pub fn mount_all() -> EffectHandle {
        let mut handle = mount_silk_buttons(None);
        if let Some(mut plasma) = mount_plasma(None) {
            handle.mounts.append(&mut plasma.mounts);
        }
        handle
    }
}
