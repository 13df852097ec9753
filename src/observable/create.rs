//! Wrap a closure as a push producer.

use std::marker::PhantomData;

use crate::{
  observable::Observable,
  observer::{Emitter, Observer},
  subscription::Subscription,
};

/// Observable created from a function; see [`create`].
pub struct Create<F, Item, Err> {
  f: F,
  _marker: PhantomData<(Item, Err)>,
}

impl<F: Clone, Item, Err> Clone for Create<F, Item, Err> {
  fn clone(&self) -> Self { Create { f: self.f.clone(), _marker: PhantomData } }
}

/// Create an observable from scratch.
///
/// The closure runs once per subscription, pushing through the emitter it
/// is handed. Whatever it returns becomes the subscription's teardown —
/// return `()` when there is nothing to release, or a
/// [`ClosureSubscription`](crate::subscription::ClosureSubscription) to run
/// cleanup on cancellation.
///
/// ```rust
/// use hotcast::prelude::*;
///
/// let mut sum = 0;
/// observable::create(|emitter: &mut dyn Emitter<i32, &'static str>| {
///   emitter.next(1);
///   emitter.next(2);
///   emitter.complete();
/// })
/// .subscribe(|v| sum += v);
/// assert_eq!(sum, 3);
/// ```
pub fn create<F, Item, Err, U>(f: F) -> Create<F, Item, Err>
where
  F: FnOnce(&mut dyn Emitter<Item, Err>) -> U,
{
  Create { f, _marker: PhantomData }
}

/// Adapts the subscribed observer to the `&mut dyn` emitter handed to the
/// closure. The first terminal call consumes the observer; later calls are
/// ignored.
struct CreateEmitter<O>(Option<O>);

impl<O, Item, Err> Emitter<Item, Err> for CreateEmitter<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    if let Some(observer) = &mut self.0 {
      observer.next(value);
    }
  }

  fn error(&mut self, err: Err) {
    if let Some(observer) = self.0.take() {
      observer.error(err);
    }
  }

  fn complete(&mut self) {
    if let Some(observer) = self.0.take() {
      observer.complete();
    }
  }
}

impl<F, Item, Err, O, U> Observable<O> for Create<F, Item, Err>
where
  F: FnOnce(&mut dyn Emitter<Item, Err>) -> U,
  O: Observer<Item, Err>,
  U: Subscription,
{
  type Unsub = U;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let mut emitter = CreateEmitter(Some(observer));
    (self.f)(&mut emitter)
  }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use super::*;
  use crate::{observable::Subscribe, subscription::ClosureSubscription};

  #[test]
  fn values_then_complete() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let completed = Rc::new(RefCell::new(false));

    let c_seen = seen.clone();
    let c_completed = completed.clone();
    create(|emitter: &mut dyn Emitter<i32, &'static str>| {
      emitter.next(1);
      emitter.next(2);
      emitter.complete();
      emitter.next(3);
    })
    .subscribe_complete(move |v| c_seen.borrow_mut().push(v), move || {
      *c_completed.borrow_mut() = true
    });

    assert_eq!(*seen.borrow(), vec![1, 2]);
    assert!(*completed.borrow());
  }

  #[test]
  fn error_consumes_the_observer() {
    let caught = Rc::new(RefCell::new(None));

    let c_caught = caught.clone();
    create(|emitter: &mut dyn Emitter<i32, &'static str>| {
      emitter.error("oops");
      emitter.next(1);
    })
    .subscribe_err(|_| {}, move |e| *c_caught.borrow_mut() = Some(e));

    assert_eq!(*caught.borrow(), Some("oops"));
  }

  #[test]
  fn returned_teardown_runs_on_unsubscribe() {
    let torn_down = Rc::new(RefCell::new(false));

    let flag = torn_down.clone();
    let subscription = create(move |emitter: &mut dyn Emitter<i32, &'static str>| {
      emitter.next(1);
      let flag = flag.clone();
      ClosureSubscription(move || *flag.borrow_mut() = true)
    })
    .subscribe(|_| {});

    assert!(!*torn_down.borrow());
    subscription.unsubscribe();
    assert!(*torn_down.borrow());
  }
}
