use studio_fx_core::FxError;
use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failure while mounting an effect into the page.
#[derive(Debug, Error)]
pub enum HostError {
    #[error(transparent)]
    Effect(#[from] FxError),

    #[error("DOM call failed: {0}")]
    Dom(String),
}

impl From<JsValue> for HostError {
    fn from(value: JsValue) -> Self {
        HostError::Dom(
            value
                .as_string()
                .unwrap_or_else(|| format!("{value:?}")),
        )
    }
}
