//! The multicast hub.
//!
//! A [`Subject`] is both an [`Observer`] and an observable: every event
//! pushed into it fans out synchronously to every currently registered
//! observer, in registration order. It buffers nothing — a late registration
//! only sees events pushed after it.
//!
//! # Terminal state
//!
//! `error`/`complete` stop the subject permanently. The live set is drained,
//! every drained observer receives the terminal notification, and the
//! notification is retained: an observer registering *after* the stop is not
//! added to the live set — it synchronously receives the retained terminal
//! notification and gets back an already-inert handle. A stopped subject
//! silently drops any further `next`.
//!
//! # Re-entrancy
//!
//! Value broadcasts hold the registry borrow while they run. Emitting on,
//! subscribing to, or unsubscribing from the same subject inside one of its
//! callbacks during a value broadcast panics with a diagnostic. Terminal
//! broadcasts release the borrow before delivering, so tearing down other
//! registrations from an `error`/`complete` callback is fine.
//!
//! # Example
//!
//! ```rust
//! use std::{cell::RefCell, convert::Infallible, rc::Rc};
//!
//! use hotcast::prelude::*;
//!
//! let subject = LocalSubject::<i32, Infallible>::local();
//! let seen = Rc::new(RefCell::new(Vec::new()));
//!
//! let c_seen = seen.clone();
//! subject.clone().subscribe(move |v| c_seen.borrow_mut().push(v));
//!
//! subject.clone().next(1);
//! subject.clone().next(2);
//! assert_eq!(*seen.borrow(), vec![1, 2]);
//! ```

use smallvec::SmallVec;

use crate::{
  observable::Observable,
  observer::{BoxedObserver, BoxedObserverSend, IntoBoxedObserver, Observer},
  rc::{MutArc, MutRc, RcDeref, RcDerefMut},
  subscription::Subscription,
};

// ============================================================================
// Registry
// ============================================================================

enum SubjectState<Err> {
  Active,
  Completed,
  Errored(Err),
}

/// The registry behind a subject: the ordered live set plus the one-shot
/// terminal state.
pub struct Sinks<O, Err> {
  next_id: usize,
  live: SmallVec<[(usize, O); 2]>,
  state: SubjectState<Err>,
}

impl<O, Err> Default for Sinks<O, Err> {
  fn default() -> Self {
    Self { next_id: 0, live: SmallVec::new(), state: SubjectState::Active }
  }
}

impl<O, Err> Sinks<O, Err> {
  fn add(&mut self, observer: O) -> usize {
    let id = self.next_id;
    self.next_id += 1;
    self.live.push((id, observer));
    id
  }

  fn remove(&mut self, id: usize) -> Option<O> {
    self
      .live
      .iter()
      .position(|(i, _)| *i == id)
      .map(|pos| self.live.remove(pos).1)
  }

  fn contains(&self, id: usize) -> bool { self.live.iter().any(|(i, _)| *i == id) }

  fn len(&self) -> usize { self.live.len() }

  fn is_stopped(&self) -> bool { !matches!(self.state, SubjectState::Active) }

  fn retained_error(&self) -> Option<Err>
  where
    Err: Clone,
  {
    match &self.state {
      SubjectState::Errored(err) => Some(err.clone()),
      _ => None,
    }
  }

  /// Flip to a terminal state and hand back the drained live set.
  fn seal(&mut self, state: SubjectState<Err>) -> SmallVec<[(usize, O); 2]> {
    self.state = state;
    self.live.drain(..).collect()
  }

  /// Fan a value out to the live set. The last observer receives the value
  /// by move, every earlier one a clone.
  fn broadcast<Item>(&mut self, value: Item)
  where
    O: Observer<Item, Err>,
    Item: Clone,
  {
    let mut iter = self.live.iter_mut().peekable();
    while let Some((_, observer)) = iter.next() {
      if iter.peek().is_some() {
        observer.next(value.clone());
      } else {
        observer.next(value);
        break;
      }
    }
  }
}

fn mid_broadcast_mutation() -> ! {
  panic!(
    "subject registry is borrowed by an in-progress broadcast; emitting, subscribing, or \
     unsubscribing from inside a subject callback is not supported"
  );
}

// ============================================================================
// Subject
// ============================================================================

/// A multicast relay, parameterized over the pointer that holds its
/// registry.
///
/// Use the [`LocalSubject`] / [`SharedSubject`] aliases; the pointer type is
/// the only difference between them.
pub struct Subject<P> {
  sinks: P,
}

/// Registry pointer of the single-threaded subject flavor.
pub type LocalSinks<'a, Item, Err> = MutRc<Sinks<BoxedObserver<'a, Item, Err>, Err>>;

/// Registry pointer of the thread-safe subject flavor.
pub type SharedSinks<'a, Item, Err> = MutArc<Sinks<BoxedObserverSend<'a, Item, Err>, Err>>;

/// Single-threaded subject.
pub type LocalSubject<'a, Item, Err> = Subject<LocalSinks<'a, Item, Err>>;

/// Thread-safe subject; observers and handles are `Send`.
pub type SharedSubject<'a, Item, Err> = Subject<SharedSinks<'a, Item, Err>>;

impl<P: Clone> Clone for Subject<P> {
  fn clone(&self) -> Self { Self { sinks: self.sinks.clone() } }
}

impl<O, Err, P> Default for Subject<P>
where
  P: RcDeref<Target = Sinks<O, Err>> + From<Sinks<O, Err>>,
{
  fn default() -> Self { Self { sinks: P::from(Sinks::default()) } }
}

impl<O, Err, P> Subject<P>
where
  P: RcDeref<Target = Sinks<O, Err>>,
{
  /// Number of currently registered observers.
  pub fn subscriber_count(&self) -> usize { self.sinks.rc_deref().len() }

  pub fn is_empty(&self) -> bool { self.subscriber_count() == 0 }
}

impl<'a, Item, Err> Subject<MutRc<Sinks<BoxedObserver<'a, Item, Err>, Err>>> {
  /// Create a single-threaded subject.
  pub fn local() -> Self { Self::default() }
}

impl<'a, Item, Err> Subject<MutArc<Sinks<BoxedObserverSend<'a, Item, Err>, Err>>> {
  /// Create a thread-safe subject.
  pub fn shared() -> Self { Self::default() }
}

// Observer + Observable per registry flavor. The bodies are identical; only
// the pointer and the boxed observer type differ.
macro_rules! impl_subject_for {
  ($ptr:ident, $boxed:ident) => {
    impl<'a, Item, Err> Observer<Item, Err> for Subject<$ptr<Sinks<$boxed<'a, Item, Err>, Err>>>
    where
      Item: Clone,
      Err: Clone,
    {
      fn next(&mut self, value: Item) {
        let Some(mut sinks) = self.sinks.try_rc_deref_mut() else { mid_broadcast_mutation() };
        if sinks.is_stopped() {
          return;
        }
        sinks.broadcast(value);
      }

      fn error(self, err: Err) {
        let drained = {
          let Some(mut sinks) = self.sinks.try_rc_deref_mut() else { mid_broadcast_mutation() };
          if sinks.is_stopped() {
            return;
          }
          sinks.seal(SubjectState::Errored(err.clone()))
        };
        let mut iter = drained.into_iter().peekable();
        while let Some((_, observer)) = iter.next() {
          if iter.peek().is_some() {
            observer.error(err.clone());
          } else {
            observer.error(err);
            break;
          }
        }
      }

      fn complete(self) {
        let drained = {
          let Some(mut sinks) = self.sinks.try_rc_deref_mut() else { mid_broadcast_mutation() };
          if sinks.is_stopped() {
            return;
          }
          sinks.seal(SubjectState::Completed)
        };
        for (_, observer) in drained {
          observer.complete();
        }
      }

      fn is_closed(&self) -> bool { self.sinks.rc_deref().is_stopped() }
    }

    impl<'a, Item, Err, Ob> Observable<Ob> for Subject<$ptr<Sinks<$boxed<'a, Item, Err>, Err>>>
    where
      Ob: IntoBoxedObserver<$boxed<'a, Item, Err>>,
      Err: Clone,
    {
      type Unsub = SubjectSubscription<$ptr<Sinks<$boxed<'a, Item, Err>, Err>>>;

      fn actual_subscribe(self, observer: Ob) -> Self::Unsub {
        let boxed = observer.into_boxed();
        let Some(mut sinks) = self.sinks.try_rc_deref_mut() else { mid_broadcast_mutation() };
        if !sinks.is_stopped() {
          let id = sinks.add(boxed);
          drop(sinks);
          return SubjectSubscription::active(self.sinks, id);
        }
        let retained = sinks.retained_error();
        drop(sinks);
        match retained {
          Some(err) => boxed.error(err),
          None => boxed.complete(),
        }
        SubjectSubscription::stopped()
      }
    }
  };
}

impl_subject_for!(MutRc, BoxedObserver);
impl_subject_for!(MutArc, BoxedObserverSend);

// ============================================================================
// SubjectSubscription
// ============================================================================

/// Handle for one registration on a subject.
///
/// Removing the registration touches only the registry; the subject itself
/// and its other registrations are unaffected. The handle reports closed
/// once its registration is gone, whether through this handle or through a
/// terminal drain.
pub struct SubjectSubscription<P> {
  sinks: Option<P>,
  id: usize,
}

impl<P> SubjectSubscription<P> {
  fn active(sinks: P, id: usize) -> Self { Self { sinks: Some(sinks), id } }

  fn stopped() -> Self { Self { sinks: None, id: 0 } }
}

impl<O, Err, P> Subscription for SubjectSubscription<P>
where
  P: RcDerefMut<Target = Sinks<O, Err>>,
{
  fn unsubscribe(self) {
    if let Some(sinks) = self.sinks {
      let Some(mut sinks) = sinks.try_rc_deref_mut() else { mid_broadcast_mutation() };
      sinks.remove(self.id);
    }
  }

  fn is_closed(&self) -> bool {
    match &self.sinks {
      Some(sinks) => !sinks.rc_deref().contains(self.id),
      None => true,
    }
  }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, convert::Infallible, rc::Rc};

  use super::*;
  use crate::observable::Subscribe;

  #[test]
  fn broadcasts_to_every_registered_observer() {
    let subject = LocalSubject::<i32, Infallible>::local();
    let first = Rc::new(RefCell::new(Vec::new()));
    let second = Rc::new(RefCell::new(Vec::new()));

    let c_first = first.clone();
    subject.clone().subscribe(move |v| c_first.borrow_mut().push(v));

    subject.clone().next(1);

    let c_second = second.clone();
    subject.clone().subscribe(move |v| c_second.borrow_mut().push(v));

    subject.clone().next(2);

    assert_eq!(*first.borrow(), vec![1, 2]);
    assert_eq!(*second.borrow(), vec![2]);
  }

  #[test]
  fn unsubscribe_removes_only_that_registration() {
    let subject = LocalSubject::<i32, Infallible>::local();
    let kept = Rc::new(RefCell::new(Vec::new()));
    let dropped = Rc::new(RefCell::new(Vec::new()));

    let c_kept = kept.clone();
    subject.clone().subscribe(move |v| c_kept.borrow_mut().push(v));
    let c_dropped = dropped.clone();
    let handle = subject.clone().subscribe(move |v| c_dropped.borrow_mut().push(v));

    subject.clone().next(1);
    assert!(!handle.is_closed());
    handle.unsubscribe();
    subject.clone().next(2);

    assert_eq!(*kept.borrow(), vec![1, 2]);
    assert_eq!(*dropped.borrow(), vec![1]);
    assert_eq!(subject.subscriber_count(), 1);
  }

  #[test]
  fn complete_reaches_all_and_clears_the_live_set() {
    let subject = LocalSubject::<i32, Infallible>::local();
    let completions = Rc::new(RefCell::new(0));

    for _ in 0..3 {
      let c = completions.clone();
      subject
        .clone()
        .subscribe_complete(|_v: i32| {}, move || *c.borrow_mut() += 1);
    }

    subject.clone().complete();
    assert_eq!(*completions.borrow(), 3);
    assert!(subject.is_empty());
  }

  #[test]
  fn late_registration_replays_retained_completion() {
    let subject = LocalSubject::<i32, Infallible>::local();
    subject.clone().complete();

    let values = Rc::new(RefCell::new(Vec::new()));
    let completed = Rc::new(RefCell::new(false));
    let c_values = values.clone();
    let c_completed = completed.clone();
    let handle = subject
      .clone()
      .subscribe_complete(move |v| c_values.borrow_mut().push(v), move || {
        *c_completed.borrow_mut() = true
      });

    assert!(values.borrow().is_empty());
    assert!(*completed.borrow());
    assert!(handle.is_closed());
    assert!(subject.is_empty());
  }

  #[test]
  fn late_registration_replays_retained_error() {
    let subject = LocalSubject::<i32, &str>::local();
    subject.clone().error("boom");

    let caught = Rc::new(RefCell::new(None));
    let c_caught = caught.clone();
    subject
      .clone()
      .subscribe_err(|_v: i32| {}, move |e| *c_caught.borrow_mut() = Some(e));

    assert_eq!(*caught.borrow(), Some("boom"));
  }

  #[test]
  fn next_after_stop_is_dropped() {
    let subject = LocalSubject::<i32, Infallible>::local();
    let seen = Rc::new(RefCell::new(Vec::new()));

    let c_seen = seen.clone();
    subject.clone().subscribe(move |v| c_seen.borrow_mut().push(v));
    subject.clone().next(1);
    subject.clone().complete();
    subject.clone().next(2);

    assert_eq!(*seen.borrow(), vec![1]);
  }

  #[test]
  fn terminal_transition_is_one_shot() {
    let subject = LocalSubject::<i32, &str>::local();
    subject.clone().error("first");
    subject.clone().complete();

    let caught = Rc::new(RefCell::new(None));
    let c_caught = caught.clone();
    subject
      .clone()
      .subscribe_err(|_v: i32| {}, move |e| *c_caught.borrow_mut() = Some(e));
    assert_eq!(*caught.borrow(), Some("first"));
  }

  #[test]
  fn reentrant_emission_panics() {
    use std::panic::{catch_unwind, AssertUnwindSafe};

    let subject = LocalSubject::<i32, Infallible>::local();
    let reentrant = subject.clone();
    subject.clone().subscribe(move |_| {
      reentrant.clone().next(2);
    });

    let result = catch_unwind(AssertUnwindSafe(|| {
      subject.clone().next(1);
    }));
    assert!(result.is_err());
  }

  #[test]
  fn shared_subject_broadcasts_across_threads() {
    use std::sync::{Arc, Mutex};

    let subject = SharedSubject::<i32, Infallible>::shared();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let c_seen = seen.clone();
    subject.clone().subscribe(move |v| c_seen.lock().unwrap().push(v));

    let producer = subject.clone();
    std::thread::spawn(move || {
      producer.clone().next(7);
      producer.clone().complete();
    })
    .join()
    .unwrap();

    assert_eq!(*seen.lock().unwrap(), vec![7]);
    assert!(subject.is_empty());
  }
}
