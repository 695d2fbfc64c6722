//!
//! The page environment the loader operates in.
//!
//! A [`Host`] owns the library global binding, the document into which
//! fetch directives are inserted, the notification bus and the
//! cooperative scheduler. [`MemoryHost`](crate::memory::MemoryHost) keeps
//! all of this in process; [`BrowserHost`](crate::browser::BrowserHost)
//! maps it onto `window` and the DOM.
//!

use crate::imports::*;
use futures::future::LocalBoxFuture;

pub type ListenerId = u64;
pub type Listener = Box<dyn FnMut()>;
/// Completion of an inserted fetch directive
pub type Transfer = LocalBoxFuture<'static, Result<()>>;

/// An instruction to retrieve and execute a remote script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchDirective {
    pub url: String,
    /// Attribute marking the directive as inserted by the loader
    pub marker: Option<String>,
    pub is_async: bool,
}

impl FetchDirective {
    pub fn new(url: impl Into<String>) -> Self {
        FetchDirective {
            url: url.into(),
            marker: None,
            is_async: true,
        }
    }

    pub fn with_marker(mut self, attribute: impl Into<String>) -> Self {
        self.marker = Some(attribute.into());
        self
    }
}

#[async_trait(?Send)]
pub trait Host: 'static {
    type Library: LibraryApi;

    /// The library global, if it holds a usable library (the guard stub never counts)
    fn library(&self) -> Option<Self::Library>;

    /// Bind the guard stub under the global name unless something is already bound
    fn install_stub(&self) -> Result<()>;

    /// Whether a fetch directive carrying `attribute` exists in the document
    fn has_marker(&self, attribute: &str) -> Result<bool>;

    /// Insert `directive` into the document. Insertion happens before this
    /// returns; the returned [`Transfer`] completes when the transfer does.
    fn fetch(&self, directive: &FetchDirective) -> Result<Transfer>;

    /// Give up one cooperative scheduling turn
    async fn yield_turn(&self);

    fn dispatch(&self, event: &str) -> Result<()>;

    fn subscribe(&self, event: &str, listener: Listener) -> Result<ListenerId>;

    fn unsubscribe(&self, id: ListenerId);

    /// Expose the readiness future to other consumers in the page.
    /// A future published earlier stays in place.
    fn publish(&self, readiness: &ReadinessFuture<Self::Library>) -> Result<()>;

    /// The readiness future published in the page, if any
    fn published(&self) -> Option<ReadinessFuture<Self::Library>>;
}
