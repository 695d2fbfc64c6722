//! Browser-only scheduling shims.
#[cfg(target_arch = "wasm32")]
pub mod yield_executor;
