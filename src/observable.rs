//! The producer side of a stream, and the subscribe entry points.
//!
//! [`Observable`] is the core contract: handing an observer to
//! `actual_subscribe` starts delivery and returns the cancellation handle.
//! The [`Subscribe`] extension supplies the closure-based entry points every
//! stream type gets for free.

use crate::{
  observer::CallbackObserver,
  subscription::Subscription,
};

pub mod connectable;
mod create;
mod from_iter;
mod trivial;

pub use connectable::{ConnectableObservable, Connection};
pub use create::{create, Create};
pub use from_iter::{from_iter, of, FromIter, Of};
pub use trivial::{empty, never, throw, Empty, Never, Throw};

/// A push producer that delivers to the observer it is subscribed with.
///
/// Subscribing consumes the observable; producers meant to be subscribed
/// several times are `Clone` and each subscription runs independently.
pub trait Observable<O>: Sized {
  type Unsub: Subscription;

  fn actual_subscribe(self, observer: O) -> Self::Unsub;

  /// Subscribe with a hand-written [`Observer`](crate::observer::Observer).
  fn subscribe_with(self, observer: O) -> Self::Unsub { self.actual_subscribe(observer) }
}

/// Closure-based subscribe entry points, available on every observable.
///
/// `subscribe` alone ignores terminal notifications; use the `_err` /
/// `_complete` / `_all` variants to handle them.
pub trait Subscribe<Item, Err>: Sized {
  fn subscribe<N>(
    self, next: N,
  ) -> <Self as Observable<CallbackObserver<N, fn(Err), fn()>>>::Unsub
  where
    N: FnMut(Item),
    Self: Observable<CallbackObserver<N, fn(Err), fn()>>,
  {
    self.actual_subscribe(CallbackObserver { next, error: None, complete: None })
  }

  fn subscribe_err<N, E>(
    self, next: N, error: E,
  ) -> <Self as Observable<CallbackObserver<N, E, fn()>>>::Unsub
  where
    N: FnMut(Item),
    E: FnOnce(Err),
    Self: Observable<CallbackObserver<N, E, fn()>>,
  {
    self.actual_subscribe(CallbackObserver { next, error: Some(error), complete: None })
  }

  fn subscribe_complete<N, C>(
    self, next: N, complete: C,
  ) -> <Self as Observable<CallbackObserver<N, fn(Err), C>>>::Unsub
  where
    N: FnMut(Item),
    C: FnOnce(),
    Self: Observable<CallbackObserver<N, fn(Err), C>>,
  {
    self.actual_subscribe(CallbackObserver { next, error: None, complete: Some(complete) })
  }

  fn subscribe_all<N, E, C>(
    self, next: N, error: E, complete: C,
  ) -> <Self as Observable<CallbackObserver<N, E, C>>>::Unsub
  where
    N: FnMut(Item),
    E: FnOnce(Err),
    C: FnOnce(),
    Self: Observable<CallbackObserver<N, E, C>>,
  {
    self.actual_subscribe(CallbackObserver { next, error: Some(error), complete: Some(complete) })
  }
}

impl<Item, Err, T> Subscribe<Item, Err> for T {}
