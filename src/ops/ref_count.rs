//! Connect while anyone is listening, disconnect when nobody is.
//!
//! [`RefCount`] makes a
//! [`ConnectableObservable`](crate::observable::ConnectableObservable) behave
//! like an ordinary observable: the first subscriber triggers `connect`, and
//! the connection is cancelled the moment the live-subscriber count falls
//! back to zero. Everything in between shares the one execution.
//!
//! Two transitions matter:
//!
//! - **Explicit cancellation** of a subscriber handle decrements the count
//!   and, on 1→0, cancels the connection. A later subscriber starts a fresh
//!   execution into the same subject.
//! - **Terminal delivery** decrements the count but leaves the connection
//!   cell alone — the execution is already over. Because the subject retains
//!   its terminal state, any later subscriber gets that notification
//!   replayed immediately and no new execution ever starts. Retry-style
//!   re-subscription downstream therefore cannot restart a stopped shared
//!   stream; sharing one execution is the whole point.

use crate::{
  observable::{
    connectable::{ConnectableObservable, Connection},
    Observable,
  },
  observer::{BoxedObserver, BoxedObserverSend, Observer},
  rc::{MutArc, MutRc, RcDeref, RcDerefMut},
  subject::{Sinks, Subject},
  subscription::Subscription,
};

/// Shared state of one ref-counting wrapper: the live-subscriber count and
/// the connection of the current cycle.
pub struct RefCountState<R> {
  live: usize,
  connection: Option<Connection<R>>,
}

impl<R> Default for RefCountState<R> {
  fn default() -> Self { Self { live: 0, connection: None } }
}

/// An observable that connects its underlying connectable on demand; see the
/// module docs.
pub struct RefCount<S, P, R, N> {
  connectable: ConnectableObservable<S, P, R>,
  state: N,
}

impl<S: Clone, P: Clone, R: Clone, N: Clone> Clone for RefCount<S, P, R, N> {
  fn clone(&self) -> Self {
    Self { connectable: self.connectable.clone(), state: self.state.clone() }
  }
}

/// Single-threaded ref-counting wrapper.
pub type LocalRefCount<'a, S, Item, Err, U> = RefCount<
  S,
  MutRc<Sinks<BoxedObserver<'a, Item, Err>, Err>>,
  MutRc<Option<U>>,
  MutRc<RefCountState<MutRc<Option<U>>>>,
>;

/// Thread-safe ref-counting wrapper.
pub type SharedRefCount<'a, S, Item, Err, U> = RefCount<
  S,
  MutArc<Sinks<BoxedObserverSend<'a, Item, Err>, Err>>,
  MutArc<Option<U>>,
  MutArc<RefCountState<MutArc<Option<U>>>>,
>;

impl<'a, S, Item, Err, U>
  ConnectableObservable<S, MutRc<Sinks<BoxedObserver<'a, Item, Err>, Err>>, MutRc<Option<U>>>
{
  /// Wrap this connectable so it connects and disconnects with its
  /// subscriber count.
  pub fn ref_count(self) -> LocalRefCount<'a, S, Item, Err, U> {
    RefCount { connectable: self, state: MutRc::from(RefCountState::default()) }
  }
}

impl<'a, S, Item, Err, U>
  ConnectableObservable<S, MutArc<Sinks<BoxedObserverSend<'a, Item, Err>, Err>>, MutArc<Option<U>>>
{
  /// Wrap this connectable so it connects and disconnects with its
  /// subscriber count.
  pub fn ref_count(self) -> SharedRefCount<'a, S, Item, Err, U> {
    RefCount { connectable: self, state: MutArc::from(RefCountState::default()) }
  }
}

impl<S, P, R, N, Ob> Observable<Ob> for RefCount<S, P, R, N>
where
  S: Observable<Subject<P>> + Clone,
  P: Clone,
  R: RcDerefMut<Target = Option<<S as Observable<Subject<P>>>::Unsub>> + Clone,
  N: RcDerefMut<Target = RefCountState<R>> + Clone,
  Subject<P>: Observable<CountedObserver<Ob, N>>,
{
  type Unsub =
    RefCountSubscription<<Subject<P> as Observable<CountedObserver<Ob, N>>>::Unsub, N>;

  fn actual_subscribe(self, observer: Ob) -> Self::Unsub {
    self.state.rc_deref_mut().live += 1;
    let counted = CountedObserver { inner: observer, state: self.state.clone() };
    let sub = self.connectable.subject().actual_subscribe(counted);
    // A handle that comes back closed means the subject had already stopped
    // and replayed its terminal notification; connecting would start an
    // execution nobody can observe.
    if !sub.is_closed() {
      let needs_connect = self.state.rc_deref().connection.is_none();
      if needs_connect {
        let connection = self.connectable.connect();
        self.state.rc_deref_mut().connection = Some(connection);
      }
    }
    RefCountSubscription { sub, state: self.state }
  }
}

/// Observer wrapper that keeps the live count in step with terminal
/// deliveries.
pub struct CountedObserver<O, N> {
  inner: O,
  state: N,
}

impl<Item, Err, O, N, R> Observer<Item, Err> for CountedObserver<O, N>
where
  O: Observer<Item, Err>,
  N: RcDerefMut<Target = RefCountState<R>>,
{
  fn next(&mut self, value: Item) { self.inner.next(value) }

  fn error(self, err: Err) {
    self.state.rc_deref_mut().live -= 1;
    self.inner.error(err)
  }

  fn complete(self) {
    self.state.rc_deref_mut().live -= 1;
    self.inner.complete()
  }

  fn is_closed(&self) -> bool { self.inner.is_closed() }
}

/// Handle for one subscriber of a ref-counted stream.
pub struct RefCountSubscription<S, N> {
  sub: S,
  state: N,
}

impl<S, N, R, U> Subscription for RefCountSubscription<S, N>
where
  S: Subscription,
  N: RcDerefMut<Target = RefCountState<R>>,
  R: RcDerefMut<Target = Option<U>>,
  U: Subscription,
{
  fn unsubscribe(self) {
    // Already torn down by a terminal delivery; the count is settled.
    if self.sub.is_closed() {
      return;
    }
    self.sub.unsubscribe();
    let connection = {
      let mut state = self.state.rc_deref_mut();
      state.live -= 1;
      if state.live == 0 { state.connection.take() } else { None }
    };
    if let Some(connection) = connection {
      connection.unsubscribe();
    }
  }

  fn is_closed(&self) -> bool { self.sub.is_closed() }
}
