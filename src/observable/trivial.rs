//! Degenerate producers: immediate completion, immediate failure, silence.

use std::marker::PhantomData;

use crate::{observable::Observable, observer::Observer};

/// Observable that completes without emitting; see [`empty`].
pub struct Empty<Item, Err>(PhantomData<(Item, Err)>);

/// Emit nothing and complete immediately.
pub fn empty<Item, Err>() -> Empty<Item, Err> { Empty(PhantomData) }

impl<Item, Err> Clone for Empty<Item, Err> {
  fn clone(&self) -> Self { Empty(PhantomData) }
}

impl<Item, Err, O> Observable<O> for Empty<Item, Err>
where
  O: Observer<Item, Err>,
{
  type Unsub = ();

  fn actual_subscribe(self, observer: O) -> Self::Unsub { observer.complete() }
}

/// Observable that never notifies at all; see [`never`].
pub struct Never<Item, Err>(PhantomData<(Item, Err)>);

/// Emit nothing, never terminate.
pub fn never<Item, Err>() -> Never<Item, Err> { Never(PhantomData) }

impl<Item, Err> Clone for Never<Item, Err> {
  fn clone(&self) -> Self { Never(PhantomData) }
}

impl<Item, Err, O> Observable<O> for Never<Item, Err>
where
  O: Observer<Item, Err>,
{
  type Unsub = ();

  fn actual_subscribe(self, _observer: O) -> Self::Unsub {}
}

/// Observable that fails without emitting; see [`throw`].
pub struct Throw<Item, Err> {
  err: Err,
  _marker: PhantomData<Item>,
}

/// Emit nothing and fail immediately with `err`.
pub fn throw<Item, Err>(err: Err) -> Throw<Item, Err> { Throw { err, _marker: PhantomData } }

impl<Item, Err: Clone> Clone for Throw<Item, Err> {
  fn clone(&self) -> Self { Throw { err: self.err.clone(), _marker: PhantomData } }
}

impl<Item, Err, O> Observable<O> for Throw<Item, Err>
where
  O: Observer<Item, Err>,
{
  type Unsub = ();

  fn actual_subscribe(self, observer: O) -> Self::Unsub { observer.error(self.err) }
}
