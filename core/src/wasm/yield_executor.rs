//!
//! Implements `async fn yield_executor()` backed by `setTimeout(0)`, giving the
//! browser one full macrotask turn (scripts that finished loading get to run
//! their top-level initialisation before the caller resumes).
//!

use js_sys::{Function, Promise};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = setTimeout)]
    fn set_timeout(callback: &Function, millis: i32) -> JsValue;
}

pub async fn yield_executor() {
    let promise = Promise::new(&mut |resolve: Function, _reject: Function| {
        set_timeout(&resolve, 0);
    });
    // `resolve` never rejects
    let _ = JsFuture::from(promise).await;
}
