//!
//! Platform-uniform (native and WASM) primitives used by the chart loader:
//! - async channels ([`channel`])
//! - local task dispatch and cooperative yielding ([`task`])
//!
//! Everything in this crate assumes a single-threaded cooperative executor:
//! the browser event loop in WASM, or a `tokio::task::LocalSet` natively.

extern crate self as chart_loader_core;

pub mod channel;
pub mod prelude;
pub mod task;

mod wasm;
