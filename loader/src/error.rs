//!
//! Errors produced by the [`chart_loader`](super) crate
//!
use crate::library::Operation;
use chart_loader_core::channel::RecvError;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum Error {
    #[error("{0}")]
    Custom(String),

    /// A source could not be transferred
    #[error("failed to load `{url}`: {reason}")]
    Transfer { url: String, reason: String },

    #[error("Chart.js loaded from fallback but Chart is not defined.")]
    FallbackUnusable,

    #[error("Failed to load Chart.js from both primary and fallback CDNs.")]
    BothSourcesFailed,

    #[error("readiness event received but Chart is not defined")]
    SignalWithoutLibrary,

    /// The library global was used before it finished loading
    #[error("{0}")]
    PrematureUse(Operation),

    #[error("unable to bind the guard stub under `{0}`")]
    GuardRejected(String),

    #[error("the library global is already bound to a loaded library")]
    AlreadyBound,

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("loader context `{0}` was created for a different host type")]
    ContextMismatch(String),

    #[error("readiness channel closed before an outcome was settled")]
    RecvError(#[from] RecvError),

    #[cfg(target_arch = "wasm32")]
    #[error(transparent)]
    Dom(#[from] chart_loader_dom::error::Error),

    #[cfg(target_arch = "wasm32")]
    #[error("{0:?}")]
    JsValue(wasm_bindgen::JsValue),
}

impl From<String> for Error {
    fn from(err: String) -> Self {
        Self::Custom(err)
    }
}

impl From<&str> for Error {
    fn from(err: &str) -> Self {
        Self::Custom(err.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for Error {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        Self::JsValue(value)
    }
}

#[cfg(target_arch = "wasm32")]
impl From<Error> for wasm_bindgen::JsValue {
    fn from(err: Error) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}
