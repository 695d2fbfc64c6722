//!
//! The [`Loader`] state machine.
//!
//! [`Loader::bootstrap`] runs the stages strictly in order:
//! presence check, duplicate-load guard, fetch pipeline. The fetch pipeline
//! runs as a dispatched task; everything before it is synchronous, so a
//! second call made right after the first one already observes the
//! inserted marker and the adopted readiness future.
//!
//! A readiness future published in the page by any loader is adopted
//! before anything else, so separate loaders sharing a page (a snippet
//! embedded twice, two WASM modules) see one future and one signal.
//!

use crate::imports::*;
use crate::readiness;

pub struct Loader<H: Host> {
    key: String,
    host: Rc<H>,
    settings: Settings,
    readiness: RefCell<Option<ReadinessFuture<H::Library>>>,
}

impl<H: Host> Loader<H> {
    pub fn try_new(key: &str, settings: Settings, host: H) -> Result<Self> {
        settings.validate()?;
        Ok(Loader {
            key: key.to_string(),
            host: Rc::new(host),
            settings,
            readiness: RefCell::new(None),
        })
    }

    /// Context key of this loader, also used as the log target
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn host(&self) -> &Rc<H> {
        &self.host
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The readiness future, once a bootstrap created or adopted one
    pub fn readiness(&self) -> Option<ReadinessFuture<H::Library>> {
        self.readiness.borrow().clone()
    }

    /// The library global as currently bound
    pub fn library(&self) -> Option<H::Library> {
        self.host.library()
    }

    /// Register a listener for the readiness signal. Listeners registered
    /// after the signal fired are not called and must use the future.
    pub fn subscribe(&self, listener: Listener) -> Result<ListenerId> {
        self.host.subscribe(&self.settings.event_name, listener)
    }

    fn target(&self) -> &str {
        &self.key
    }

    pub fn bootstrap(&self) -> Result<ReadinessFuture<H::Library>> {
        if let Some(readiness) = self.existing() {
            return Ok(readiness);
        }

        if let Some(library) = self.host.library() {
            log_debug!(target: self.target(), "`{}` is already present", self.settings.global_name);
            return Ok(self.present(library));
        }

        if self.host.has_marker(&self.settings.marker_attribute)? {
            log_debug!(
                target: self.target(),
                "loader marker found, waiting for `{}`",
                self.settings.event_name
            );
            return self.attach();
        }

        self.fetch()
    }

    /// This loader's readiness future, or the one another loader
    /// already published in the page
    fn existing(&self) -> Option<ReadinessFuture<H::Library>> {
        if let Some(readiness) = self.readiness() {
            return Some(readiness);
        }
        let published = self.host.published()?;
        log_debug!(target: self.target(), "reusing the readiness future published in the page");
        *self.readiness.borrow_mut() = Some(published.clone());
        Some(published)
    }

    fn adopt(&self, readiness: &ReadinessFuture<H::Library>) {
        *self.readiness.borrow_mut() = Some(readiness.clone());
        if let Err(err) = self.host.publish(readiness) {
            log_warning!(target: self.target(), "unable to publish the readiness future: {err}");
        }
    }

    fn present(&self, library: H::Library) -> ReadinessFuture<H::Library> {
        let readiness = ReadinessFuture::resolved(library);
        self.adopt(&readiness);

        let host = self.host.clone();
        let event = self.settings.event_name.clone();
        let key = self.key.clone();
        task::dispatch(async move {
            host.yield_turn().await;
            broadcast(host.as_ref(), &event, &key);
        });

        readiness
    }

    fn attach(&self) -> Result<ReadinessFuture<H::Library>> {
        let (resolver, readiness) = readiness::channel();
        let registration = Rc::new(Cell::new(None::<ListenerId>));

        let listener: Listener = {
            let host = Rc::downgrade(&self.host);
            let registration = registration.clone();
            let mut resolver = Some(resolver);
            Box::new(move || {
                let Some(host) = host.upgrade() else {
                    return;
                };
                if let Some(id) = registration.take() {
                    host.unsubscribe(id);
                }
                if let Some(resolver) = resolver.take() {
                    match host.library() {
                        Some(library) => resolver.resolve(library),
                        None => resolver.reject(Error::SignalWithoutLibrary),
                    }
                }
            })
        };

        let id = self.host.subscribe(&self.settings.event_name, listener)?;
        registration.set(Some(id));
        self.adopt(&readiness);
        Ok(readiness)
    }

    fn fetch(&self) -> Result<ReadinessFuture<H::Library>> {
        let (resolver, readiness) = readiness::channel();
        self.adopt(&readiness);

        let primary = self.settings.primary();
        log_debug!(target: self.target(), "fetching `{}`", primary.url);
        let transfer = self.host.fetch(&primary);

        let pipeline = Pipeline {
            key: self.key.clone(),
            host: self.host.clone(),
            settings: self.settings.clone(),
        };
        task::dispatch(pipeline.run(transfer, resolver));

        if let Err(err) = self.host.install_stub() {
            log_warning!(
                target: self.target(),
                "unable to install the `{}` guard: {err}",
                self.settings.global_name
            );
        }

        Ok(readiness)
    }
}

/// Primary then fallback, settling the readiness future exactly once
struct Pipeline<H: Host> {
    key: String,
    host: Rc<H>,
    settings: Settings,
}

impl<H: Host> Pipeline<H> {
    fn target(&self) -> &str {
        &self.key
    }

    async fn run(self, primary: Result<Transfer>, resolver: Resolver<H::Library>) {
        match self.attempt(primary).await {
            Ok(Some(library)) => return self.settle(resolver, library),
            Ok(None) => log_warning!(
                target: self.target(),
                "Chart.js loaded but Chart is not defined. Trying fallback CDN."
            ),
            Err(err) => log_warning!(
                target: self.target(),
                "Failed to load Chart.js from primary CDN: {} ({err})",
                self.settings.primary_url
            ),
        }

        let fallback = self.settings.fallback();
        log_debug!(target: self.target(), "fetching `{}`", fallback.url);
        let transfer = self.host.fetch(&fallback);
        match self.attempt(transfer).await {
            Ok(Some(library)) => self.settle(resolver, library),
            Ok(None) => {
                log_warning!(target: self.target(), "{}", Error::FallbackUnusable);
                resolver.reject(Error::FallbackUnusable);
            }
            Err(err) => {
                log_warning!(target: self.target(), "Chart.js fallback load failed: {err}");
                resolver.reject(Error::BothSourcesFailed);
            }
        }
    }

    /// Waits for the transfer, then gives the fetched code up to
    /// `usability_checks` turns to define the global.
    async fn attempt(&self, transfer: Result<Transfer>) -> Result<Option<H::Library>> {
        transfer?.await?;
        for _ in 0..self.settings.usability_checks {
            self.host.yield_turn().await;
            if let Some(library) = self.host.library() {
                return Ok(Some(library));
            }
        }
        Ok(None)
    }

    fn settle(&self, resolver: Resolver<H::Library>, library: H::Library) {
        resolver.resolve(library);
        broadcast(self.host.as_ref(), &self.settings.event_name, self.target());
    }
}

fn broadcast<H: Host>(host: &H, event: &str, target: &str) {
    log_trace!(target: target, "dispatching `{event}`");
    if let Err(err) = host.dispatch(event) {
        log_warning!(target: target, "unable to dispatch `{event}`: {err}");
    }
}
