pub use crate::error::Error;
pub use crate::host::{FetchDirective, Host, Listener, ListenerId, Transfer};
pub use crate::library::{GlobalBinding, Library, LibraryApi, Operation};
pub use crate::readiness::{ReadinessFuture, Resolver};
pub use crate::result::Result;
pub use crate::settings::Settings;
pub use async_trait::async_trait;
pub use chart_loader_core::task;
pub use chart_loader_log::prelude::*;
pub use serde::{Deserialize, Serialize};
pub use std::cell::{Cell, RefCell};
pub use std::collections::HashMap;
pub use std::rc::Rc;
