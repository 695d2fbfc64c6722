//! Helper functions for accessing DOM environment
use crate::result::Result;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Window};

/// Return the current browser [`web_sys::Window`] element
pub fn window() -> Result<Window> {
    Ok(web_sys::window().ok_or("Unable to obtain window object")?)
}

/// Return the current browser [`web_sys::Document`] element
pub fn document() -> Result<Document> {
    Ok(window()?
        .document()
        .ok_or("Unable to obtain document object")?)
}

/// Return the `head` element of the current document,
/// falling back to `body` for documents without one.
pub fn head() -> Result<Element> {
    let document = document()?;
    if let Some(head) = document.head() {
        return Ok(head.unchecked_into());
    }
    Ok(document
        .query_selector("body")?
        .ok_or("Unable to locate head or body element")?)
}

/// Returns true if a `<script>` element carrying `attribute` exists in the document
pub fn has_script_with_attribute(attribute: &str) -> Result<bool> {
    let selector = format!("script[{attribute}]");
    Ok(document()?.query_selector(&selector)?.is_some())
}

/// Return the JavaScript global object (`window` in browsers)
pub fn global() -> js_sys::Object {
    js_sys::global()
}
