//! Error type for fallible browser and configuration calls.
//!
//! Behaviors never surface these to the user. The page binding logs them and
//! carries on, so one missing element or rejected call cannot stop the rest
//! of the page from wiring up.

#[derive(Debug, thiserror::Error)]
pub enum UiError {
    #[error("browser window unavailable")]
    MissingWindow,
    #[error("document unavailable")]
    MissingDocument,
    #[error("javascript error: {0}")]
    Js(String),
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

#[cfg(feature = "hydrate")]
impl From<wasm_bindgen::JsValue> for UiError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        Self::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}
