//! Commonly used channel and task items.
pub use crate::channel::{oneshot, Receiver, RecvError, Sender};
pub use crate::task::{dispatch, yield_executor, yield_now};
