pub use crate::context::{bootstrap, context};
pub use crate::error::Error;
pub use crate::host::{FetchDirective, Host, Listener, ListenerId};
pub use crate::library::{Library, LibraryApi};
pub use crate::loader::Loader;
pub use crate::memory::{MemoryHost, MemoryLibrary, Script};
pub use crate::readiness::ReadinessFuture;
pub use crate::result::Result;
pub use crate::settings::Settings;

#[cfg(target_arch = "wasm32")]
pub use crate::browser::{bootstrap_chartjs, BrowserHost, ChartJs};
