//! Result type used by the [`chart_loader`](super) crate
pub type Result<T> = std::result::Result<T, crate::error::Error>;
