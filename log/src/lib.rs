//!
//! Logging for the chart loader workspace.
//!
//! When built natively, macros such as `log_info!()` invoke `println!()`;
//! in WASM they invoke `console.log()` (and `console.warn()` / `console.error()`
//! for the respective levels).
//!
//! The following macros are available:
//! - `log_trace!()`
//! - `log_debug!()`
//! - `log_info!()`
//! - `log_warning!()`
//! - `log_error!()`
//!
//! Each macro optionally accepts a `target: <&str>,` prefix that is handed
//! to the installed [`Sink`].
//!
//! # Redirecting log output
//!
//! A log sink receiving all messages can be installed using [`pipe`]. The
//! [`Sink::write`] function returns `true` to consume the message or
//! `false` to let it continue to the console.
//!
//! ```ignore
//! use chart_loader_log::*;
//! struct Collector;
//! impl Sink for Collector {
//!     fn write(&self, _target: Option<&str>, _level: Level, _args: &std::fmt::Arguments<'_>) -> bool {
//!         false
//!     }
//! }
//! pipe(Some(Arc::new(Collector)));
//! ```

mod log;
pub use self::log::*;

mod console;

pub mod prelude {
    pub use super::log::*;
    pub use super::{log_debug, log_error, log_info, log_trace, log_warning};
}
