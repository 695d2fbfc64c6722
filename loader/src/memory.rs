//!
//! In-process [`Host`] used on native targets and in tests.
//!
//! Models a single page: the library global, a document that records
//! inserted fetch directives, an event bus and a turn counter. What a
//! given URL does when fetched is scripted with [`Script`].
//!

use crate::imports::*;
use crate::settings::GLOBAL_NAME;

/// Stand-in for the rendering library
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryLibrary {
    pub name: String,
    pub version: String,
}

impl MemoryLibrary {
    pub fn new(name: &str, version: &str) -> Self {
        MemoryLibrary {
            name: name.to_string(),
            version: version.to_string(),
        }
    }
}

impl LibraryApi for MemoryLibrary {
    type Value = String;

    fn call(&self, args: &[String]) -> Result<String> {
        Ok(format!("{}({})", self.name, args.join(", ")))
    }

    fn construct(&self, args: &[String]) -> Result<String> {
        Ok(format!("new {}({})", self.name, args.join(", ")))
    }

    fn get(&self, property: &str) -> Option<String> {
        match property {
            "name" => Some(self.name.clone()),
            "version" => Some(self.version.clone()),
            _ => None,
        }
    }
}

/// What happens when a URL is fetched
#[derive(Debug, Clone)]
pub enum Script {
    /// The transfer fails
    Fail(String),
    /// The transfer succeeds but never defines the global
    Unusable,
    /// The transfer succeeds and defines the global `after_turns`
    /// scheduling turns later (0 = while executing)
    Usable {
        library: MemoryLibrary,
        after_turns: usize,
    },
}

struct Registration {
    id: ListenerId,
    event: String,
    listener: Rc<RefCell<Listener>>,
}

#[derive(Default)]
struct Inner {
    global: GlobalBinding<MemoryLibrary>,
    scripts: RefCell<HashMap<String, Script>>,
    directives: RefCell<Vec<FetchDirective>>,
    registrations: RefCell<Vec<Registration>>,
    last_listener: Cell<ListenerId>,
    dispatched: RefCell<Vec<String>>,
    deferred: RefCell<Vec<(usize, MemoryLibrary)>>,
    readiness: RefCell<Option<ReadinessFuture<MemoryLibrary>>>,
    locked: Cell<bool>,
}

impl Inner {
    fn define(&self, library: MemoryLibrary) {
        if let Err(err) = self.global.set(library) {
            log_debug!("script did not rebind the global: {err}");
        }
    }

    fn advance(&self) {
        let due = {
            let mut deferred = self.deferred.borrow_mut();
            deferred.iter_mut().for_each(|(turns, _)| *turns -= 1);
            let (due, pending): (Vec<_>, Vec<_>) =
                deferred.drain(..).partition(|(turns, _)| *turns == 0);
            *deferred = pending;
            due
        };
        for (_, library) in due {
            self.define(library);
        }
    }
}

/// Cloning yields another handle onto the same page
#[derive(Clone, Default)]
pub struct MemoryHost {
    inner: Rc<Inner>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Page where the library is already loaded
    pub fn with_library(self, library: MemoryLibrary) -> Self {
        self.inner.define(library);
        self
    }

    /// Page whose global cannot be redefined while unbound, like a
    /// top-level `var Chart;`. Assignment still works; the guard stub is refused.
    pub fn with_locked_global(self) -> Self {
        self.inner.locked.set(true);
        self
    }

    pub fn with_script(self, url: &str, script: Script) -> Self {
        self.inner
            .scripts
            .borrow_mut()
            .insert(url.to_string(), script);
        self
    }

    /// Current state of the library global binding
    pub fn binding(&self) -> Option<Library<MemoryLibrary>> {
        self.inner.global.get()
    }

    pub fn directives(&self) -> Vec<FetchDirective> {
        self.inner.directives.borrow().clone()
    }

    pub fn directives_for(&self, url: &str) -> usize {
        self.inner
            .directives
            .borrow()
            .iter()
            .filter(|directive| directive.url == url)
            .count()
    }

    /// Number of times `event` was dispatched
    pub fn dispatched(&self, event: &str) -> usize {
        self.inner
            .dispatched
            .borrow()
            .iter()
            .filter(|name| name.as_str() == event)
            .count()
    }

    /// Number of currently registered listeners
    pub fn listeners(&self) -> usize {
        self.inner.registrations.borrow().len()
    }
}

#[async_trait(?Send)]
impl Host for MemoryHost {
    type Library = MemoryLibrary;

    fn library(&self) -> Option<MemoryLibrary> {
        self.inner.global.handle()
    }

    fn install_stub(&self) -> Result<()> {
        if self.inner.locked.get() && self.inner.global.get().is_none() {
            return Err(Error::GuardRejected(GLOBAL_NAME.to_string()));
        }
        self.inner.global.install_stub();
        Ok(())
    }

    fn has_marker(&self, attribute: &str) -> Result<bool> {
        Ok(self
            .inner
            .directives
            .borrow()
            .iter()
            .any(|directive| directive.marker.as_deref() == Some(attribute)))
    }

    fn fetch(&self, directive: &FetchDirective) -> Result<Transfer> {
        self.inner.directives.borrow_mut().push(directive.clone());
        let script = self.inner.scripts.borrow().get(&directive.url).cloned();
        let url = directive.url.clone();
        let inner = self.inner.clone();

        Ok(Box::pin(async move {
            // network completion is never synchronous
            task::yield_now().await;
            match script {
                None => Err(Error::Transfer {
                    url,
                    reason: "404 Not Found".to_string(),
                }),
                Some(Script::Fail(reason)) => Err(Error::Transfer { url, reason }),
                Some(Script::Unusable) => Ok(()),
                Some(Script::Usable {
                    library,
                    after_turns: 0,
                }) => {
                    inner.define(library);
                    Ok(())
                }
                Some(Script::Usable {
                    library,
                    after_turns,
                }) => {
                    inner.deferred.borrow_mut().push((after_turns, library));
                    Ok(())
                }
            }
        }))
    }

    async fn yield_turn(&self) {
        self.inner.advance();
        task::yield_now().await;
    }

    fn dispatch(&self, event: &str) -> Result<()> {
        self.inner.dispatched.borrow_mut().push(event.to_string());
        // listeners may unsubscribe while being invoked
        let listeners = self
            .inner
            .registrations
            .borrow()
            .iter()
            .filter(|registration| registration.event == event)
            .map(|registration| registration.listener.clone())
            .collect::<Vec<_>>();
        for listener in listeners {
            let mut listener = listener.borrow_mut();
            (&mut *listener)();
        }
        Ok(())
    }

    fn subscribe(&self, event: &str, listener: Listener) -> Result<ListenerId> {
        let id = self.inner.last_listener.get() + 1;
        self.inner.last_listener.set(id);
        self.inner.registrations.borrow_mut().push(Registration {
            id,
            event: event.to_string(),
            listener: Rc::new(RefCell::new(listener)),
        });
        Ok(id)
    }

    fn unsubscribe(&self, id: ListenerId) {
        self.inner
            .registrations
            .borrow_mut()
            .retain(|registration| registration.id != id);
    }

    fn publish(&self, readiness: &ReadinessFuture<MemoryLibrary>) -> Result<()> {
        let mut slot = self.inner.readiness.borrow_mut();
        if slot.is_none() {
            *slot = Some(readiness.clone());
        }
        Ok(())
    }

    fn published(&self) -> Option<ReadinessFuture<MemoryLibrary>> {
        self.inner.readiness.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::task::LocalSet;

    #[test]
    fn listeners_can_unsubscribe_while_dispatching() {
        let host = MemoryHost::new();
        let calls = Rc::new(Cell::new(0));
        let registration = Rc::new(Cell::new(None));

        let id = {
            let host = host.clone();
            let calls = calls.clone();
            let registration = registration.clone();
            host.clone()
                .subscribe(
                    "chartjs:ready",
                    Box::new(move || {
                        calls.set(calls.get() + 1);
                        if let Some(id) = registration.take() {
                            host.unsubscribe(id);
                        }
                    }),
                )
                .unwrap()
        };
        registration.set(Some(id));

        host.dispatch("chartjs:ready").unwrap();
        host.dispatch("chartjs:ready").unwrap();
        assert_eq!(calls.get(), 1);
        assert_eq!(host.listeners(), 0);
        assert_eq!(host.dispatched("chartjs:ready"), 2);
    }

    #[test]
    fn marker_lookup_only_sees_tagged_directives() {
        let host = MemoryHost::new();
        let _transfer = host.fetch(&FetchDirective::new("https://b.example/chart.js"));
        assert!(!host.has_marker("data-chartjs-loader").unwrap());
        let _transfer = host
            .fetch(&FetchDirective::new("https://a.example/chart.js").with_marker("data-chartjs-loader"));
        assert!(host.has_marker("data-chartjs-loader").unwrap());
        assert_eq!(host.directives().len(), 2);
    }

    #[tokio::test]
    async fn deferred_scripts_define_the_global_on_later_turns() {
        LocalSet::new()
            .run_until(async {
                let chart = MemoryLibrary::new("Chart", "4.4.1");
                let host = MemoryHost::new().with_script(
                    "https://a.example/chart.js",
                    Script::Usable {
                        library: chart.clone(),
                        after_turns: 2,
                    },
                );
                assert!(host.install_stub().is_ok());
                host.fetch(&FetchDirective::new("https://a.example/chart.js"))
                    .unwrap()
                    .await
                    .unwrap();
                assert_eq!(host.binding(), Some(Library::NotReady));
                host.yield_turn().await;
                assert_eq!(host.library(), None);
                host.yield_turn().await;
                assert_eq!(host.library(), Some(chart.clone()));
                assert_eq!(host.binding(), Some(Library::Ready(chart)));
            })
            .await;
    }

    #[test]
    fn only_the_first_published_future_is_kept() {
        let host = MemoryHost::new();
        assert!(host.published().is_none());

        let first = ReadinessFuture::resolved(MemoryLibrary::new("Chart", "4.4.1"));
        let second = ReadinessFuture::resolved(MemoryLibrary::new("Chart", "4.4.0"));
        host.publish(&first).unwrap();
        host.publish(&second).unwrap();
        assert!(host.clone().published().unwrap().ptr_eq(&first));
    }

    #[test]
    fn locked_global_refuses_the_guard_but_accepts_the_library() {
        let host = MemoryHost::new().with_locked_global();
        assert!(matches!(host.install_stub(), Err(Error::GuardRejected(name)) if name == "Chart"));
        assert_eq!(host.binding(), None);

        let host = host.with_library(MemoryLibrary::new("Chart", "4.4.1"));
        assert!(host.install_stub().is_ok());
        assert!(host.binding().unwrap().is_ready());
    }

    #[tokio::test]
    async fn unknown_urls_fail_to_transfer() {
        let host = MemoryHost::new();
        let result = host
            .fetch(&FetchDirective::new("https://missing.example/chart.js"))
            .unwrap()
            .await;
        assert!(matches!(result, Err(Error::Transfer { .. })));
    }
}
