//!
//! [`Host`] backed by the browser page (WASM only).
//!
//! The library global is `window[global_name]`, fetch directives are
//! `<script async>` elements appended to `<head>`, the notification bus is
//! `window` itself and the readiness future is published as a JS `Promise`
//! under `window[promise_name]`.
//!

use crate::imports::*;
use chart_loader_dom::events::{dispatch_event, EventListener};
use chart_loader_dom::inject::{inject_script, Script};
use chart_loader_dom::utils::{global, has_script_with_attribute};
use js_sys::{Array, Function, Object, Promise, Proxy, Reflect, Symbol};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{future_to_promise, JsFuture};

/// Context key used by [`bootstrap_chartjs`]
pub const DEFAULT_CONTEXT: &str = "chartjs";
/// Registry symbol answered by the guard stub's `get` trap
const GUARD_SYMBOL: &str = "chart-loader.guard";

/// Handle to the real Chart.js constructor
#[derive(Debug, Clone, PartialEq)]
pub struct ChartJs(JsValue);

impl ChartJs {
    pub fn as_js_value(&self) -> &JsValue {
        &self.0
    }

    pub fn into_js_value(self) -> JsValue {
        self.0
    }
}

impl LibraryApi for ChartJs {
    type Value = JsValue;

    fn call(&self, args: &[JsValue]) -> Result<JsValue> {
        let args = args.iter().collect::<Array>();
        Ok(Reflect::apply(self.0.unchecked_ref::<Function>(), &JsValue::UNDEFINED, &args)?)
    }

    fn construct(&self, args: &[JsValue]) -> Result<JsValue> {
        let args = args.iter().collect::<Array>();
        Ok(Reflect::construct(self.0.unchecked_ref::<Function>(), &args)?.into())
    }

    fn get(&self, property: &str) -> Option<JsValue> {
        Reflect::get(&self.0, &JsValue::from_str(property))
            .ok()
            .filter(|value| !value.is_undefined())
    }
}

fn guard_symbol() -> JsValue {
    Symbol::for_(GUARD_SYMBOL).into()
}

fn is_guard(value: &JsValue) -> bool {
    Reflect::get(value, &guard_symbol())
        .map(|marker| marker.is_truthy())
        .unwrap_or(false)
}

/// A callable `Proxy` refusing calls and construction with the
/// [`Operation`] messages. Every property read yields `undefined`.
fn guard() -> Result<JsValue> {
    let refuse = |operation: Operation| {
        Closure::<dyn Fn() -> std::result::Result<JsValue, JsValue>>::new(move || {
            Err(js_sys::Error::new(&operation.to_string()).into())
        })
    };
    let apply = refuse(Operation::Call);
    let construct = refuse(Operation::Construct);
    let symbol = guard_symbol();
    let get = Closure::<dyn Fn(JsValue, JsValue) -> JsValue>::new(move |_target, property| {
        if property == symbol {
            JsValue::TRUE
        } else {
            JsValue::UNDEFINED
        }
    });

    let handler = Object::new();
    Reflect::set(&handler, &"apply".into(), apply.as_ref())?;
    Reflect::set(&handler, &"construct".into(), construct.as_ref())?;
    Reflect::set(&handler, &"get".into(), get.as_ref())?;
    // the traps live as long as the page
    apply.forget();
    construct.forget();
    get.forget();

    let target = Function::new_no_args("");
    Ok(Proxy::new(&target, &handler).into())
}

pub struct BrowserHost {
    settings: Settings,
    listeners: RefCell<HashMap<ListenerId, EventListener>>,
    last_listener: Cell<ListenerId>,
    /// Last seen `window[promise_name]` and the future wrapping it
    published: RefCell<Option<(JsValue, ReadinessFuture<ChartJs>)>>,
}

impl BrowserHost {
    pub fn new(settings: Settings) -> Self {
        BrowserHost {
            settings,
            listeners: RefCell::new(HashMap::new()),
            last_listener: Cell::new(0),
            published: RefCell::new(None),
        }
    }

    fn binding(&self) -> Result<JsValue> {
        Ok(Reflect::get(&global(), &JsValue::from_str(&self.settings.global_name))?)
    }
}

#[async_trait(?Send)]
impl Host for BrowserHost {
    type Library = ChartJs;

    fn library(&self) -> Option<ChartJs> {
        let value = self.binding().ok()?;
        (value.is_function() && !is_guard(&value)).then(|| ChartJs(value))
    }

    fn install_stub(&self) -> Result<()> {
        let current = self.binding()?;
        if !current.is_undefined() && !current.is_null() {
            return Ok(());
        }

        let descriptor = Object::new();
        Reflect::set(&descriptor, &"configurable".into(), &JsValue::TRUE)?;
        Reflect::set(&descriptor, &"writable".into(), &JsValue::TRUE)?;
        Reflect::set(&descriptor, &"value".into(), &guard()?)?;
        let defined = Reflect::define_property(
            &global(),
            &JsValue::from_str(&self.settings.global_name),
            &descriptor,
        )?;
        if !defined {
            return Err(Error::GuardRejected(self.settings.global_name.clone()));
        }
        Ok(())
    }

    fn has_marker(&self, attribute: &str) -> Result<bool> {
        Ok(has_script_with_attribute(attribute)?)
    }

    fn fetch(&self, directive: &FetchDirective) -> Result<Transfer> {
        let mut script = Script::new(&directive.url).with_async(directive.is_async);
        if let Some(marker) = directive.marker.as_deref() {
            script = script.with_marker(marker);
        }
        let pending = inject_script(&script)?;
        let url = directive.url.clone();

        Ok(Box::pin(async move {
            pending.completion().await.map_err(|err| Error::Transfer {
                url,
                reason: err.to_string(),
            })
        }))
    }

    async fn yield_turn(&self) {
        task::yield_executor().await;
    }

    fn dispatch(&self, event: &str) -> Result<()> {
        Ok(dispatch_event(event)?)
    }

    fn subscribe(&self, event: &str, mut listener: Listener) -> Result<ListenerId> {
        let id = self.last_listener.get() + 1;
        self.last_listener.set(id);
        let handle = EventListener::try_new(event, move || listener())?;
        self.listeners.borrow_mut().insert(id, handle);
        Ok(id)
    }

    fn unsubscribe(&self, id: ListenerId) {
        let handle = self.listeners.borrow_mut().remove(&id);
        drop(handle);
    }

    fn publish(&self, readiness: &ReadinessFuture<ChartJs>) -> Result<()> {
        let window = global();
        let key = JsValue::from_str(&self.settings.promise_name);
        if !Reflect::get(&window, &key)?.is_undefined() {
            return Ok(());
        }

        let future = readiness.clone();
        let promise: JsValue = future_to_promise(async move {
            future
                .await
                .map(ChartJs::into_js_value)
                .map_err(JsValue::from)
        })
        .into();
        Reflect::set(&window, &key, &promise)?;
        *self.published.borrow_mut() = Some((promise, readiness.clone()));
        Ok(())
    }

    fn published(&self) -> Option<ReadinessFuture<ChartJs>> {
        let promise = Reflect::get(&global(), &JsValue::from_str(&self.settings.promise_name)).ok()?;
        if promise.is_undefined() || promise.is_null() {
            return None;
        }
        if let Some((known, readiness)) = self.published.borrow().as_ref() {
            if *known == promise {
                return Some(readiness.clone());
            }
        }

        let settlement = JsFuture::from(Promise::resolve(&promise));
        let readiness = ReadinessFuture::from_future(async move {
            let value = settlement.await?;
            if value.is_function() && !is_guard(&value) {
                Ok(ChartJs(value))
            } else {
                Err(Error::Custom(
                    "published readiness promise resolved without a usable library".to_string(),
                ))
            }
        });
        *self.published.borrow_mut() = Some((promise, readiness.clone()));
        Some(readiness)
    }
}

/// Runs the loader for the page and returns the readiness promise.
///
/// `options` is an optional object with the [`Settings`] fields in
/// camelCase; absent fields keep their defaults.
#[wasm_bindgen(js_name = bootstrapChartJs)]
pub fn bootstrap_chartjs(options: JsValue) -> std::result::Result<Promise, JsValue> {
    let settings: Settings = if options.is_undefined() || options.is_null() {
        Settings::default()
    } else {
        serde_wasm_bindgen::from_value(options)?
    };

    let host_settings = settings.clone();
    let readiness = crate::context::bootstrap(DEFAULT_CONTEXT, settings, move || {
        BrowserHost::new(host_settings)
    })?;

    Ok(future_to_promise(async move {
        readiness
            .await
            .map(ChartJs::into_js_value)
            .map_err(JsValue::from)
    }))
}
