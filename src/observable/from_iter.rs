//! Producers backed by iterators.

use std::convert::Infallible;

use crate::{observable::Observable, observer::Observer};

/// Observable over an iterator; see [`from_iter`].
#[derive(Clone)]
pub struct FromIter<I>(I);

/// Emit every element of `iter`, then complete. Never errors.
pub fn from_iter<I>(iter: I) -> FromIter<I::IntoIter>
where
  I: IntoIterator,
{
  FromIter(iter.into_iter())
}

impl<I, O> Observable<O> for FromIter<I>
where
  I: Iterator,
  O: Observer<I::Item, Infallible>,
{
  type Unsub = ();

  fn actual_subscribe(self, mut observer: O) -> Self::Unsub {
    for value in self.0 {
      if observer.is_closed() {
        return;
      }
      observer.next(value);
    }
    observer.complete();
  }
}

/// Observable of exactly one value; see [`of`].
#[derive(Clone)]
pub struct Of<Item>(Item);

/// Emit a single value, then complete.
pub fn of<Item>(value: Item) -> Of<Item> { Of(value) }

impl<Item, O> Observable<O> for Of<Item>
where
  O: Observer<Item, Infallible>,
{
  type Unsub = ();

  fn actual_subscribe(self, mut observer: O) -> Self::Unsub {
    observer.next(self.0);
    observer.complete();
  }
}
