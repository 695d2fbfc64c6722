//!
//! [`task`](self) module provides helpers that *operate uniformly* in native
//! ([`tokio`](https://crates.io/crates/tokio)-backed) and WASM (browser event loop)
//! environments:
//! - [`dispatch()`] - non-blocking spawn of a future that is not `Send`
//! - [`yield_now()`] - yields a single cooperative turn
//! - [`yield_executor()`] - yields to the top-level executor (browser event loop)
//!
//! Natively, [`dispatch()`] must be called from within a `tokio::task::LocalSet`.
//!

use cfg_if::cfg_if;
use std::future::Future;

cfg_if! {
    if #[cfg(not(target_arch = "wasm32"))] {

        pub mod native {
            //! native implementation
            pub use super::*;

            pub use tokio::task::yield_now;
            pub use tokio::task::yield_now as yield_executor;

            /// Spawns `future` on the current `LocalSet`.
            pub fn dispatch<F>(future: F)
            where
                F: Future<Output = ()> + 'static,
            {
                tokio::task::spawn_local(future);
            }
        }

        pub use native::*;

    } else {

        pub mod wasm {
            //! WASM implementation
            pub use super::*;

            pub use crate::wasm::yield_executor::yield_executor;
            pub use crate::wasm::yield_executor::yield_executor as yield_now;

            /// Spawns `future` on the browser microtask queue.
            pub fn dispatch<F>(future: F)
            where
                F: Future<Output = ()> + 'static,
            {
                wasm_bindgen_futures::spawn_local(future);
            }
        }

        pub use wasm::*;
    }
}
