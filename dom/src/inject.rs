//!
//! DOM injection of remote `<script>` elements.
//!
//! [`inject_script`] appends the element synchronously (so that a repeated
//! caller can immediately find it by its marker attribute) and returns a
//! [`PendingScript`] whose [`completion`](PendingScript::completion) resolves
//! on the element's `load` event or fails on its `error` event.
//!

use crate::error::Error;
use crate::result::Result;
use crate::utils::*;
use chart_loader_core::channel::{oneshot, Receiver};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event};

type EventClosure = Closure<dyn FnMut(Event)>;

/// Attributes of a `<script>` element to inject
#[derive(Debug, Clone)]
pub struct Script<'script> {
    pub src: &'script str,
    pub marker: Option<&'script str>,
    pub is_async: bool,
}

impl<'script> Script<'script> {
    pub fn new(src: &'script str) -> Self {
        Script {
            src,
            marker: None,
            is_async: true,
        }
    }

    pub fn with_marker(mut self, attribute: &'script str) -> Self {
        self.marker = Some(attribute);
        self
    }

    pub fn with_async(mut self, is_async: bool) -> Self {
        self.is_async = is_async;
        self
    }
}

/// An injected `<script>` element whose transfer has not completed yet.
/// Holds the `load` and `error` listeners alive until completion.
pub struct PendingScript {
    src: String,
    element: Element,
    receiver: Receiver<std::result::Result<(), String>>,
    on_load: EventClosure,
    on_error: EventClosure,
}

impl PendingScript {
    pub fn element(&self) -> &Element {
        &self.element
    }

    /// Waits for the transfer outcome and detaches the listeners.
    pub async fn completion(self) -> Result<()> {
        let outcome = self.receiver.recv().await?;
        self.element
            .remove_event_listener_with_callback("load", self.on_load.as_ref().unchecked_ref())?;
        self.element
            .remove_event_listener_with_callback("error", self.on_error.as_ref().unchecked_ref())?;
        outcome.map_err(|reason| Error::Load {
            src: self.src,
            reason,
        })
    }
}

/// Inject a `<script src=..>` element into the document `head`.
pub fn inject_script(script: &Script) -> Result<PendingScript> {
    let element = document()?.create_element("script")?;
    element.set_attribute("src", script.src)?;
    if script.is_async {
        element.set_attribute("async", "")?;
    }
    if let Some(marker) = script.marker {
        element.set_attribute(marker, "true")?;
    }

    let (sender, receiver) = oneshot();
    let on_load = {
        let sender = sender.clone();
        EventClosure::new(move |_event: Event| {
            let _ = sender.try_send(Ok(()));
        })
    };
    let on_error = EventClosure::new(move |event: Event| {
        let _ = sender.try_send(Err(format!("`{}` event", event.type_())));
    });

    element.add_event_listener_with_callback("load", on_load.as_ref().unchecked_ref())?;
    element.add_event_listener_with_callback("error", on_error.as_ref().unchecked_ref())?;
    head()?.append_child(&element)?;

    Ok(PendingScript {
        src: script.src.to_string(),
        element,
        receiver,
        on_load,
        on_error,
    })
}
