//! Deferred activation: decouple subscribing from starting the source.
//!
//! A [`ConnectableObservable`] pairs a source observable with a subject.
//! Subscribing only registers on the subject — nothing starts. A separate
//! [`connect`](ConnectableObservable::connect) subscribes the subject itself
//! to the source, so however many observers registered beforehand share that
//! single execution.
//!
//! Cancelling the returned [`Connection`] stops the source but does **not**
//! notify the subject: registered observers simply stop receiving, their own
//! handles stay valid, and a later `connect` starts a fresh execution into
//! the same subject. That is deliberately different from the source
//! terminating on its own, which stops the subject and reaches every
//! observer.
//!
//! # Example
//!
//! ```rust
//! use std::{cell::RefCell, rc::Rc};
//!
//! use hotcast::prelude::*;
//!
//! let numbers = observable::from_iter(1..=4).publish();
//!
//! let first = Rc::new(RefCell::new(Vec::new()));
//! let second = Rc::new(RefCell::new(Vec::new()));
//! let c_first = first.clone();
//! let c_second = second.clone();
//! numbers.clone().subscribe(move |v| c_first.borrow_mut().push(v));
//! numbers.clone().subscribe(move |v| c_second.borrow_mut().push(v));
//!
//! // Nothing delivered yet; the source starts here.
//! numbers.connect();
//!
//! assert_eq!(*first.borrow(), vec![1, 2, 3, 4]);
//! assert_eq!(*second.borrow(), vec![1, 2, 3, 4]);
//! ```

use crate::{
  observable::Observable,
  rc::{MutArc, MutRc, RcDeref, RcDerefMut},
  subject::{LocalSinks, SharedSinks, Subject},
  subscription::Subscription,
};

/// An observable whose subscription is decoupled from its activation.
///
/// Built through [`Publish::publish`](crate::ops::publish::Publish::publish);
/// see the module docs for the lifecycle.
pub struct ConnectableObservable<S, P, R> {
  source: S,
  subject: Subject<P>,
  connection: R,
}

/// Single-threaded connectable; `U` is the source-side subscription type.
pub type LocalConnectable<'a, S, Item, Err, U> =
  ConnectableObservable<S, LocalSinks<'a, Item, Err>, MutRc<Option<U>>>;

/// Thread-safe connectable; `U` is the source-side subscription type.
pub type SharedConnectable<'a, S, Item, Err, U> =
  ConnectableObservable<S, SharedSinks<'a, Item, Err>, MutArc<Option<U>>>;

impl<S: Clone, P: Clone, R: Clone> Clone for ConnectableObservable<S, P, R> {
  fn clone(&self) -> Self {
    Self {
      source: self.source.clone(),
      subject: self.subject.clone(),
      connection: self.connection.clone(),
    }
  }
}

impl<S, P, R> ConnectableObservable<S, P, R> {
  pub fn new(source: S) -> Self
  where
    Subject<P>: Default,
    R: Default,
  {
    Self { source, subject: Subject::default(), connection: R::default() }
  }

  /// The subject observers register on. All clones of this connectable share
  /// it, so anything subscribed to it rides the same connection.
  pub fn subject(&self) -> Subject<P>
  where
    P: Clone,
  {
    self.subject.clone()
  }
}

impl<S, P, R> ConnectableObservable<S, P, R>
where
  S: Observable<Subject<P>> + Clone,
  P: Clone,
  R: RcDerefMut<Target = Option<S::Unsub>> + Clone,
{
  /// Subscribe the subject to the source, starting delivery.
  ///
  /// Idempotent while a connection exists: repeated calls start nothing and
  /// return the same shared handle. After that handle is cancelled, the next
  /// `connect` starts a fresh execution into the same subject.
  pub fn connect(&self) -> Connection<R> {
    if self.connection.rc_deref().is_none() {
      let unsub = self.source.clone().actual_subscribe(self.subject.clone());
      *self.connection.rc_deref_mut() = Some(unsub);
    }
    Connection { cell: self.connection.clone() }
  }
}

// Subscribing delegates to the subject and never touches the source.
impl<S, P, R, Ob> Observable<Ob> for ConnectableObservable<S, P, R>
where
  Subject<P>: Observable<Ob>,
{
  type Unsub = <Subject<P> as Observable<Ob>>::Unsub;

  fn actual_subscribe(self, observer: Ob) -> Self::Unsub {
    self.subject.actual_subscribe(observer)
  }
}

/// Shared handle for the source-side registration of a connectable.
///
/// Every `connect` call on the same (or a cloned) connectable hands back a
/// handle over the same cell, so cancelling any of them disconnects the one
/// execution.
pub struct Connection<R> {
  cell: R,
}

impl<R: Clone> Clone for Connection<R> {
  fn clone(&self) -> Self { Self { cell: self.cell.clone() } }
}

impl<R, U> Subscription for Connection<R>
where
  R: RcDerefMut<Target = Option<U>>,
  U: Subscription,
{
  fn unsubscribe(self) {
    let unsub = self.cell.rc_deref_mut().take();
    if let Some(unsub) = unsub {
      unsub.unsubscribe();
    }
  }

  fn is_closed(&self) -> bool { self.cell.rc_deref().is_none() }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, convert::Infallible, rc::Rc};

  use super::*;
  use crate::{
    observable::{self, Subscribe},
    observer::{Emitter, Observer},
    ops::publish::Publish,
    subject::LocalSubject,
  };

  #[test]
  fn nothing_starts_without_connect() {
    let started = Rc::new(RefCell::new(false));

    let flag = started.clone();
    let numbers = observable::create(move |emitter: &mut dyn Emitter<i32, Infallible>| {
      *flag.borrow_mut() = true;
      emitter.next(1);
      emitter.complete();
    })
    .publish();

    numbers.clone().subscribe(|_| {});
    assert!(!*started.borrow());

    numbers.connect();
    assert!(*started.borrow());
  }

  #[test]
  fn connect_runs_the_source_once_for_all_subscribers() {
    let subscriptions = Rc::new(RefCell::new(0));

    let count = subscriptions.clone();
    let numbers = observable::create(move |emitter: &mut dyn Emitter<i32, Infallible>| {
      *count.borrow_mut() += 1;
      emitter.next(1);
      emitter.next(2);
      emitter.complete();
    })
    .publish();

    let first = Rc::new(RefCell::new(Vec::new()));
    let second = Rc::new(RefCell::new(Vec::new()));
    let c_first = first.clone();
    let c_second = second.clone();
    numbers.clone().subscribe(move |v| c_first.borrow_mut().push(v));
    numbers.clone().subscribe(move |v| c_second.borrow_mut().push(v));

    numbers.connect();

    assert_eq!(*first.borrow(), vec![1, 2]);
    assert_eq!(*second.borrow(), vec![1, 2]);
    assert_eq!(*subscriptions.borrow(), 1);
  }

  #[test]
  fn connect_is_idempotent_while_connected() {
    let mut source = LocalSubject::<i32, Infallible>::local();
    let published = source.clone().publish();

    let seen = Rc::new(RefCell::new(Vec::new()));
    let c_seen = seen.clone();
    published.clone().subscribe(move |v| c_seen.borrow_mut().push(v));

    let first = published.connect();
    let second = published.connect();
    source.next(1);

    // One registration on the source, shared by both handles.
    assert_eq!(source.subscriber_count(), 1);
    assert_eq!(*seen.borrow(), vec![1]);

    second.unsubscribe();
    assert!(first.is_closed());
    assert_eq!(source.subscriber_count(), 0);
  }

  #[test]
  fn disconnect_stalls_without_a_terminal_notification() {
    let mut source = LocalSubject::<i32, Infallible>::local();
    let published = source.clone().publish();

    let seen = Rc::new(RefCell::new(Vec::new()));
    let completed = Rc::new(RefCell::new(false));
    let c_seen = seen.clone();
    let c_completed = completed.clone();
    let observer_handle = published
      .clone()
      .subscribe_complete(move |v| c_seen.borrow_mut().push(v), move || {
        *c_completed.borrow_mut() = true
      });

    let connection = published.connect();
    source.next(1);
    connection.unsubscribe();
    source.next(2);

    assert_eq!(*seen.borrow(), vec![1]);
    assert!(!*completed.borrow());
    // The consumer registration outlives the connection.
    assert!(!observer_handle.is_closed());
    observer_handle.unsubscribe();
  }

  #[test]
  fn reconnect_after_disconnect_starts_a_fresh_execution() {
    let subscriptions = Rc::new(RefCell::new(0));

    let count = subscriptions.clone();
    let numbers = observable::create(move |emitter: &mut dyn Emitter<i32, Infallible>| {
      *count.borrow_mut() += 1;
      emitter.next(1);
    })
    .publish();

    let seen = Rc::new(RefCell::new(Vec::new()));
    let c_seen = seen.clone();
    numbers.clone().subscribe(move |v| c_seen.borrow_mut().push(v));

    numbers.connect().unsubscribe();
    numbers.connect();

    assert_eq!(*subscriptions.borrow(), 2);
    assert_eq!(*seen.borrow(), vec![1, 1]);
  }

  #[test]
  fn subscriber_after_completion_gets_only_the_completion() {
    let numbers = observable::from_iter(1..=4).publish();

    let early = Rc::new(RefCell::new(Vec::new()));
    let c_early = early.clone();
    numbers.clone().subscribe(move |v| c_early.borrow_mut().push(v));

    numbers.connect();
    assert_eq!(*early.borrow(), vec![1, 2, 3, 4]);

    let late = Rc::new(RefCell::new(Vec::new()));
    let completed = Rc::new(RefCell::new(false));
    let c_late = late.clone();
    let c_completed = completed.clone();
    numbers
      .clone()
      .subscribe_complete(move |v| c_late.borrow_mut().push(v), move || {
        *c_completed.borrow_mut() = true
      });

    assert!(late.borrow().is_empty());
    assert!(*completed.borrow());
  }

  #[test]
  fn subject_accessor_shares_the_connection() {
    let numbers = observable::from_iter(1..=2).publish();

    let seen = Rc::new(RefCell::new(Vec::new()));
    let c_seen = seen.clone();
    numbers.subject().subscribe(move |v| c_seen.borrow_mut().push(v));

    numbers.connect();
    assert_eq!(*seen.borrow(), vec![1, 2]);
  }
}
