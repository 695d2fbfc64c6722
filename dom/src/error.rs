//!
//! Errors return by the [`chart_loader_dom`](super) module
//!
use chart_loader_core::channel::RecvError;
use thiserror::Error;
use wasm_bindgen::JsValue;

/// Errors return by the [`chart_loader_dom`](super) module
#[derive(Error, Debug, Clone)]
pub enum Error {
    /// Custom string error
    #[error("{0}")]
    String(String),
    /// Error containing [`wasm_bindgen::JsValue`] value
    #[error("{0:?}")]
    JsValue(JsValue),
    /// A `<script>` element reported a transfer failure
    #[error("unable to load `{src}`: {reason}")]
    Load { src: String, reason: String },
    #[error(transparent)]
    RecvError(#[from] RecvError),
}

impl From<String> for Error {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Error {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<JsValue> for Error {
    fn from(v: JsValue) -> Self {
        Self::JsValue(v)
    }
}

impl From<Error> for JsValue {
    fn from(err: Error) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
