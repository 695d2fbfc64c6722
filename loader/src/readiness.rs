//!
//! The readiness future and its resolver.
//!
//! [`channel()`] produces a [`Resolver`] and a cloneable [`ReadinessFuture`].
//! All clones observe the same outcome. The resolver is consumed by
//! [`Resolver::resolve`] or [`Resolver::reject`], so an outcome can be
//! settled at most once.
//!

use crate::imports::*;
use chart_loader_core::prelude::{oneshot, Sender};
use futures::future::{self, FutureExt, LocalBoxFuture, Shared};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

type Outcome<T> = Rc<RefCell<Option<Result<T>>>>;

pub fn channel<T>() -> (Resolver<T>, ReadinessFuture<T>)
where
    T: Clone + 'static,
{
    let (sender, receiver) = oneshot::<Result<T>>();
    let outcome: Outcome<T> = Rc::new(RefCell::new(None));
    let inner = async move {
        match receiver.recv().await {
            Ok(outcome) => outcome,
            Err(err) => Err(Error::from(err)),
        }
    }
    .boxed_local()
    .shared();

    let resolver = Resolver {
        sender,
        outcome: outcome.clone(),
    };
    (resolver, ReadinessFuture { inner, outcome })
}

/// Settles the paired [`ReadinessFuture`]
pub struct Resolver<T> {
    sender: Sender<Result<T>>,
    outcome: Outcome<T>,
}

impl<T: Clone> Resolver<T> {
    pub fn resolve(self, value: T) {
        self.settle(Ok(value))
    }

    pub fn reject(self, err: Error) {
        self.settle(Err(err))
    }

    fn settle(self, outcome: Result<T>) {
        *self.outcome.borrow_mut() = Some(outcome.clone());
        // the receiver lives inside the shared future and is never dropped first
        let _ = self.sender.try_send(outcome);
    }
}

/// Shared deferred value resolving to the library handle
#[derive(Clone)]
pub struct ReadinessFuture<T: Clone> {
    inner: Shared<LocalBoxFuture<'static, Result<T>>>,
    outcome: Outcome<T>,
}

impl<T> ReadinessFuture<T>
where
    T: Clone + 'static,
{
    /// A future that is already resolved with `value`
    pub fn resolved(value: T) -> Self {
        ReadinessFuture {
            inner: future::ready(Ok(value.clone())).boxed_local().shared(),
            outcome: Rc::new(RefCell::new(Some(Ok(value)))),
        }
    }

    /// Wraps a foreign future (e.g. a promise published by another
    /// loader). The outcome becomes visible to [`peek`](Self::peek) once
    /// some clone has polled it to completion.
    pub fn from_future<F>(future: F) -> Self
    where
        F: Future<Output = Result<T>> + 'static,
    {
        let outcome: Outcome<T> = Rc::new(RefCell::new(None));
        let settled = outcome.clone();
        let inner = async move {
            let result = future.await;
            *settled.borrow_mut() = Some(result.clone());
            result
        }
        .boxed_local()
        .shared();
        ReadinessFuture { inner, outcome }
    }

    /// The settled outcome, or `None` while pending
    pub fn peek(&self) -> Option<Result<T>> {
        self.outcome.borrow().clone()
    }

    pub fn is_settled(&self) -> bool {
        self.outcome.borrow().is_some()
    }

    /// Returns true if both values are clones of the same future
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.outcome, &other.outcome)
    }
}

impl<T: Clone> Future for ReadinessFuture<T> {
    type Output = Result<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.inner.poll_unpin(cx)
    }
}

impl<T: Clone> fmt::Debug for ReadinessFuture<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadinessFuture")
            .field("settled", &self.outcome.borrow().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn every_clone_observes_the_same_resolution() {
        let (resolver, readiness) = channel::<u32>();
        let other = readiness.clone();
        assert!(other.ptr_eq(&readiness));
        assert!(!readiness.is_settled());

        resolver.resolve(42);
        assert_eq!(readiness.peek().unwrap().unwrap(), 42);
        assert_eq!(readiness.await.unwrap(), 42);
        assert_eq!(other.await.unwrap(), 42);
    }

    #[tokio::test]
    async fn rejection_is_shared() {
        let (resolver, readiness) = channel::<u32>();
        resolver.reject(Error::BothSourcesFailed);
        assert!(matches!(readiness.clone().await, Err(Error::BothSourcesFailed)));
        assert!(matches!(readiness.await, Err(Error::BothSourcesFailed)));
    }

    #[tokio::test]
    async fn pending_until_settled() {
        let (resolver, readiness) = channel::<u32>();
        assert!(readiness.clone().now_or_never().is_none());
        resolver.resolve(1);
        assert_eq!(readiness.now_or_never().unwrap().unwrap(), 1);
    }

    #[tokio::test]
    async fn dropped_resolver_surfaces_channel_error() {
        let (resolver, readiness) = channel::<u32>();
        drop(resolver);
        assert!(matches!(readiness.await, Err(Error::RecvError(_))));
    }

    #[tokio::test]
    async fn wrapped_future_records_its_outcome() {
        let (resolver, source) = channel::<u32>();
        let wrapped = ReadinessFuture::from_future(source);
        assert!(!wrapped.ptr_eq(&ReadinessFuture::from_future(future::ready(Ok(1)))));
        assert!(wrapped.clone().now_or_never().is_none());

        resolver.reject(Error::FallbackUnusable);
        assert!(matches!(wrapped.clone().await, Err(Error::FallbackUnusable)));
        assert!(matches!(wrapped.peek(), Some(Err(Error::FallbackUnusable))));
    }

    #[tokio::test]
    async fn resolved_future_is_settled_immediately() {
        let readiness = ReadinessFuture::resolved("chart");
        assert!(readiness.is_settled());
        assert_eq!(readiness.await.unwrap(), "chart");
    }
}
