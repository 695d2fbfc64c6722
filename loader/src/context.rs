//!
//! Per-thread memoization of [`Loader`] instances.
//!
//! There is exactly one loader per context key in a runtime context, so
//! every caller using the same key observes the same readiness future.
//! The first call creates the loader (and its host); later calls with the
//! same key ignore the supplied settings and host factory.
//!

use crate::imports::*;
use crate::loader::Loader;
use std::any::Any;

thread_local! {
    static CONTEXTS: RefCell<HashMap<String, Rc<dyn Any>>> = RefCell::new(HashMap::new());
}

/// Returns the loader registered under `key`, creating it with `host` on first use
pub fn context<H, F>(key: &str, settings: Settings, host: F) -> Result<Rc<Loader<H>>>
where
    H: Host,
    F: FnOnce() -> H,
{
    if let Some(existing) = CONTEXTS.with(|contexts| contexts.borrow().get(key).cloned()) {
        return existing
            .downcast::<Loader<H>>()
            .map_err(|_| Error::ContextMismatch(key.to_string()));
    }

    let loader = Rc::new(Loader::try_new(key, settings, host())?);
    CONTEXTS.with(|contexts| {
        contexts
            .borrow_mut()
            .insert(key.to_string(), loader.clone() as Rc<dyn Any>)
    });
    Ok(loader)
}

/// Bootstraps the loader registered under `key` and returns its readiness future
pub fn bootstrap<H, F>(key: &str, settings: Settings, host: F) -> Result<ReadinessFuture<H::Library>>
where
    H: Host,
    F: FnOnce() -> H,
{
    context(key, settings, host)?.bootstrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryHost;

    #[test]
    fn same_key_yields_same_loader() {
        let first = context("context::same", Settings::default(), MemoryHost::new).unwrap();
        let second = context("context::same", Settings::default(), || -> MemoryHost {
            panic!("factory must not run twice")
        })
        .unwrap();
        assert!(Rc::ptr_eq(&first, &second));

        let other = context("context::other", Settings::default(), MemoryHost::new).unwrap();
        assert!(!Rc::ptr_eq(&first, &other));
    }

    #[test]
    fn key_bound_to_another_host_type_is_refused() {
        struct Detached;

        #[async_trait(?Send)]
        impl Host for Detached {
            type Library = crate::memory::MemoryLibrary;
            fn library(&self) -> Option<Self::Library> {
                None
            }
            fn install_stub(&self) -> Result<()> {
                Ok(())
            }
            fn has_marker(&self, _attribute: &str) -> Result<bool> {
                Ok(false)
            }
            fn fetch(&self, _directive: &FetchDirective) -> Result<Transfer> {
                Err("detached".into())
            }
            async fn yield_turn(&self) {}
            fn dispatch(&self, _event: &str) -> Result<()> {
                Ok(())
            }
            fn subscribe(&self, _event: &str, _listener: Listener) -> Result<ListenerId> {
                Err("detached".into())
            }
            fn unsubscribe(&self, _id: ListenerId) {}
            fn publish(&self, _readiness: &ReadinessFuture<Self::Library>) -> Result<()> {
                Ok(())
            }
            fn published(&self) -> Option<ReadinessFuture<Self::Library>> {
                None
            }
        }

        context("context::mismatch", Settings::default(), MemoryHost::new).unwrap();
        let result = context("context::mismatch", Settings::default(), || Detached);
        assert!(matches!(result, Err(Error::ContextMismatch(key)) if key == "context::mismatch"));
    }

    #[test]
    fn invalid_settings_do_not_register_a_context() {
        let settings = Settings::default().with_event_name("");
        let result = context("context::invalid", settings, MemoryHost::new);
        assert!(matches!(result, Err(Error::InvalidSettings(_))));
        assert!(context("context::invalid", Settings::default(), MemoryHost::new).is_ok());
    }
}
