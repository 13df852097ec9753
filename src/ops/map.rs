//! Transform each value with a closure.

use crate::{observable::Observable, observer::Observer};

pub trait Map: Sized {
  /// Create a stream that applies `func` to every value of this one.
  fn map<F>(self, func: F) -> MapOp<Self, F> { MapOp { source: self, func } }
}

impl<T> Map for T {}

pub struct MapOp<S, F> {
  source: S,
  func: F,
}

impl<S: Clone, F: Clone> Clone for MapOp<S, F> {
  fn clone(&self) -> Self { Self { source: self.source.clone(), func: self.func.clone() } }
}

impl<S, F, O> Observable<O> for MapOp<S, F>
where
  S: Observable<MapObserver<O, F>>,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    self
      .source
      .actual_subscribe(MapObserver { observer, func: self.func })
  }
}

pub struct MapObserver<O, F> {
  observer: O,
  func: F,
}

impl<Item, Out, Err, O, F> Observer<Item, Err> for MapObserver<O, F>
where
  O: Observer<Out, Err>,
  F: FnMut(Item) -> Out,
{
  fn next(&mut self, value: Item) { self.observer.next((self.func)(value)) }

  fn error(self, err: Err) { self.observer.error(err) }

  fn complete(self) { self.observer.complete() }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}
