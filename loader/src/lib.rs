//!
//! Resilient, idempotent Chart.js bootstrap loader.
//!
//! A [`Loader`](loader::Loader) makes the `Chart` global available exactly
//! once per page context, no matter whether the library is already present,
//! the loader runs more than once, or the primary CDN fails:
//!
//! - if `Chart` is already loaded, the readiness future resolves
//!   immediately and `chartjs:ready` is dispatched on the next turn;
//! - if another execution already inserted the tagged `<script>`, the
//!   loader waits for its `chartjs:ready` event instead of fetching again;
//! - otherwise the primary CDN is fetched, falling back once to the
//!   secondary CDN if the transfer fails or `Chart` stays undefined.
//!
//! Until the library is ready, `Chart` is bound to a guard
//! ([`Library::NotReady`](library::Library)) whose calls fail with a
//! message pointing at `window.ChartReadyPromise` and `chartjs:ready`.
//!
//! The page environment is abstracted by [`Host`](host::Host):
//! [`MemoryHost`](memory::MemoryHost) runs in process,
//! `browser::BrowserHost` drives the real page in WASM.
//!
//! ```ignore
//! let readiness = bootstrap("chartjs", Settings::default(), MemoryHost::new)?;
//! let chart = readiness.await?;
//! ```
//!

extern crate self as chart_loader;

pub mod context;
pub mod error;
pub mod host;
mod imports;
pub mod library;
pub mod loader;
pub mod memory;
pub mod prelude;
pub mod readiness;
pub mod result;
pub mod settings;

#[cfg(target_arch = "wasm32")]
pub mod browser;


pub use context::{bootstrap, context};
pub use error::Error;
pub use result::Result;
