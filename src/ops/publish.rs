//! Turn a cold observable hot.
//!
//! `publish()` wraps a source in a
//! [`ConnectableObservable`](crate::observable::ConnectableObservable):
//! subscribers register up front, and a later
//! [`connect`](crate::observable::ConnectableObservable::connect) runs the
//! source once for all of them. `publish_with` is the selector form: the
//! caller transforms the multicast subject into the stream that is actually
//! exposed, and every subscription drives one shared source execution
//! through that pipeline.

use std::marker::PhantomData;

use crate::{
  observable::{
    connectable::{ConnectableObservable, LocalConnectable, SharedConnectable},
    Observable,
  },
  subject::{LocalSubject, SharedSubject},
};

pub trait Publish<'a, Item, Err>: Sized {
  /// Multicast this source through a single-threaded subject.
  fn publish(
    self,
  ) -> LocalConnectable<'a, Self, Item, Err, <Self as Observable<LocalSubject<'a, Item, Err>>>::Unsub>
  where
    Self: Observable<LocalSubject<'a, Item, Err>>,
  {
    ConnectableObservable::new(self)
  }

  /// Multicast this source through a thread-safe subject.
  fn publish_shared(
    self,
  ) -> SharedConnectable<'a, Self, Item, Err, <Self as Observable<SharedSubject<'a, Item, Err>>>::Unsub>
  where
    Self: Observable<SharedSubject<'a, Item, Err>>,
  {
    ConnectableObservable::new(self)
  }

  /// Multicast through a selector instead of exposing the connectable.
  ///
  /// Each subscription gets a fresh subject, runs it through `selector`, and
  /// starts its own source execution into that subject — so however many
  /// times the selector taps the subject, the source is subscribed exactly
  /// once per downstream subscription.
  fn publish_with<F, T>(self, selector: F) -> PublishSelector<Self, F, LocalSubject<'a, Item, Err>>
  where
    F: FnOnce(LocalSubject<'a, Item, Err>) -> T,
  {
    PublishSelector { source: self, selector, _subject: PhantomData }
  }
}

impl<'a, Item, Err, T> Publish<'a, Item, Err> for T {}

/// The selector form of [`Publish::publish_with`].
pub struct PublishSelector<S, F, Sub> {
  source: S,
  selector: F,
  _subject: PhantomData<Sub>,
}

impl<S: Clone, F: Clone, Sub> Clone for PublishSelector<S, F, Sub> {
  fn clone(&self) -> Self {
    Self { source: self.source.clone(), selector: self.selector.clone(), _subject: PhantomData }
  }
}

impl<S, F, Sub, T, O> Observable<O> for PublishSelector<S, F, Sub>
where
  S: Observable<Sub>,
  Sub: Default + Clone,
  F: FnOnce(Sub) -> T,
  T: Observable<O>,
{
  type Unsub = (T::Unsub, S::Unsub);

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let subject = Sub::default();
    let pipeline = (self.selector)(subject.clone());
    let downstream = pipeline.actual_subscribe(observer);
    let connection = self.source.actual_subscribe(subject);
    (downstream, connection)
  }
}
