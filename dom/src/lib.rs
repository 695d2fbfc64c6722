//!
//! DOM manipulation utilities used by the chart loader in the browser.
//!
//! Provides injection of remote `<script>` elements that complete on their
//! `load` / `error` events, detection of previously injected elements by
//! marker attribute, and dispatch / subscription of window-level events.
//!
//! Example:
//!
//! ```rust ignore
//! use chart_loader_dom::inject::{inject_script, Script};
//!
//! let pending = inject_script(&Script::new(url).with_marker("data-my-loader"))?;
//! pending.completion().await?;
//! ```

pub mod error;
pub mod events;
pub mod inject;
pub mod result;
pub mod utils;
