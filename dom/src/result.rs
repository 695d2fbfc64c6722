//! Result type used by the [`chart_loader_dom`](super) module
use wasm_bindgen::JsValue;

pub type JsResult<T> = std::result::Result<T, JsValue>;
pub type Result<T> = std::result::Result<T, crate::error::Error>;
