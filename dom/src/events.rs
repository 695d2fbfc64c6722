//!
//! Window-level event dispatch and scoped listeners.
//!

use crate::result::Result;
use crate::utils::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::Event;

/// Dispatch a plain [`Event`] named `name` on `window`.
pub fn dispatch_event(name: &str) -> Result<()> {
    let event = Event::new(name)?;
    window()?.dispatch_event(&event)?;
    Ok(())
}

/// A `window` event listener that is registered on creation and
/// removed when dropped.
pub struct EventListener {
    name: String,
    closure: Closure<dyn FnMut(Event)>,
}

impl EventListener {
    pub fn try_new<F>(name: &str, mut callback: F) -> Result<Self>
    where
        F: FnMut() + 'static,
    {
        let closure = Closure::<dyn FnMut(Event)>::new(move |_event: Event| callback());
        window()?.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())?;
        Ok(EventListener {
            name: name.to_string(),
            closure,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for EventListener {
    fn drop(&mut self) {
        if let Ok(window) = window() {
            let _ = window
                .remove_event_listener_with_callback(&self.name, self.closure.as_ref().unchecked_ref());
        }
    }
}
