//!
//! The library handle as seen through the global binding.
//!
//! Before the library finishes loading, the binding holds
//! [`Library::NotReady`], a guard that exposes the same capability surface
//! as the real library ([`LibraryApi`]) but fails every call or
//! construction with [`Error::PrematureUse`], while property probes
//! quietly yield `None` so that feature detection keeps working.
//!

use crate::imports::*;
use std::fmt;

/// Capability surface of the rendering library.
pub trait LibraryApi: Clone + 'static {
    type Value;

    /// Invoke the library as a function
    fn call(&self, args: &[Self::Value]) -> Result<Self::Value>;
    /// Invoke the library as a constructor
    fn construct(&self, args: &[Self::Value]) -> Result<Self::Value>;
    /// Read a property; `None` when it is absent
    fn get(&self, property: &str) -> Option<Self::Value>;
}

/// Operations that the guard stub refuses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Call,
    Construct,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let purpose = match self {
            Operation::Call => "creating charts",
            Operation::Construct => "constructing Chart instances",
        };
        write!(
            f,
            "Chart.js not loaded yet. Await window.ChartReadyPromise or listen for the \"chartjs:ready\" event before {purpose}."
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Library<H> {
    /// Guard stub installed before the library is available
    NotReady,
    Ready(H),
}

impl<H> Library<H> {
    pub fn is_ready(&self) -> bool {
        matches!(self, Library::Ready(_))
    }

    pub fn handle(&self) -> Option<&H> {
        match self {
            Library::Ready(handle) => Some(handle),
            Library::NotReady => None,
        }
    }
}

impl<H: LibraryApi> LibraryApi for Library<H> {
    type Value = H::Value;

    fn call(&self, args: &[Self::Value]) -> Result<Self::Value> {
        match self {
            Library::Ready(handle) => handle.call(args),
            Library::NotReady => Err(Error::PrematureUse(Operation::Call)),
        }
    }

    fn construct(&self, args: &[Self::Value]) -> Result<Self::Value> {
        match self {
            Library::Ready(handle) => handle.construct(args),
            Library::NotReady => Err(Error::PrematureUse(Operation::Construct)),
        }
    }

    fn get(&self, property: &str) -> Option<Self::Value> {
        match self {
            Library::Ready(handle) => handle.get(property),
            Library::NotReady => None,
        }
    }
}

/// A global name binding: absent, holding the guard stub, or holding
/// the real library. Once real, the binding never changes again.
#[derive(Debug)]
pub struct GlobalBinding<H> {
    slot: RefCell<Option<Library<H>>>,
}

impl<H> Default for GlobalBinding<H> {
    fn default() -> Self {
        GlobalBinding {
            slot: RefCell::new(None),
        }
    }
}

impl<H: Clone> GlobalBinding<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<Library<H>> {
        self.slot.borrow().clone()
    }

    /// The real library, if bound
    pub fn handle(&self) -> Option<H> {
        self.slot.borrow().as_ref().and_then(Library::handle).cloned()
    }

    /// Binds the guard stub when nothing is bound yet.
    /// Returns `true` if the stub was installed.
    pub fn install_stub(&self) -> bool {
        let mut slot = self.slot.borrow_mut();
        if slot.is_none() {
            *slot = Some(Library::NotReady);
            true
        } else {
            false
        }
    }

    /// Binds the real library, replacing the stub if present.
    pub fn set(&self, handle: H) -> Result<()> {
        let mut slot = self.slot.borrow_mut();
        if let Some(Library::Ready(_)) = *slot {
            return Err(Error::AlreadyBound);
        }
        *slot = Some(Library::Ready(handle));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Echo;

    impl LibraryApi for Echo {
        type Value = String;

        fn call(&self, args: &[String]) -> Result<String> {
            Ok(args.join(","))
        }

        fn construct(&self, args: &[String]) -> Result<String> {
            Ok(format!("new {}", args.join(",")))
        }

        fn get(&self, property: &str) -> Option<String> {
            (property == "version").then(|| "4".to_string())
        }
    }

    #[test]
    fn not_ready_fails_loudly_but_tolerates_probing() {
        let stub = Library::<Echo>::NotReady;
        let err = stub.call(&[]).unwrap_err();
        let message = err.to_string();
        assert!(matches!(err, Error::PrematureUse(Operation::Call)));
        assert!(message.contains("window.ChartReadyPromise"));
        assert!(message.contains("\"chartjs:ready\""));

        let err = stub.construct(&["canvas".to_string()]).unwrap_err();
        assert!(err.to_string().contains("constructing Chart instances"));

        assert_eq!(stub.get("version"), None);
        assert_eq!(stub.get("register"), None);
    }

    #[test]
    fn ready_delegates() {
        let ready = Library::Ready(Echo);
        assert_eq!(ready.call(&["a".into(), "b".into()]).unwrap(), "a,b");
        assert_eq!(ready.construct(&["c".into()]).unwrap(), "new c");
        assert_eq!(ready.get("version").as_deref(), Some("4"));
    }

    #[test]
    fn binding_is_overwritten_once_and_never_again() {
        let binding = GlobalBinding::<Echo>::new();
        assert_eq!(binding.get(), None);
        assert!(binding.install_stub());
        assert!(!binding.install_stub());
        assert_eq!(binding.get(), Some(Library::NotReady));
        assert_eq!(binding.handle(), None);

        binding.set(Echo).unwrap();
        assert_eq!(binding.handle(), Some(Echo));
        assert!(!binding.install_stub());
        assert!(matches!(binding.set(Echo), Err(Error::AlreadyBound)));
    }
}
