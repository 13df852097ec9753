//! The consumer side of a stream.
//!
//! An [`Observer`] receives zero or more values through `next`, then at most
//! one terminal notification: `error` or `complete`. The terminal methods
//! consume the observer, so the type system rules out delivery after a
//! terminal notification.

// ============================================================================
// Observer
// ============================================================================

/// A three-callback consumer of a push stream.
pub trait Observer<Item, Err> {
  /// Receive the next value.
  fn next(&mut self, value: Item);

  /// Receive the failure that ends the stream. Consumes the observer.
  fn error(self, err: Err);

  /// Receive the successful end of the stream. Consumes the observer.
  fn complete(self);

  /// `true` once the observer will not accept further values.
  ///
  /// Producers use this to stop emitting early.
  fn is_closed(&self) -> bool;
}

// ============================================================================
// Object-safe observers
// ============================================================================

/// Object-safe mirror of [`Observer`].
///
/// `Observer::error`/`Observer::complete` take `self` by value, so the trait
/// itself cannot go behind a vtable. `DynObserver` moves the terminal
/// receivers onto `Box<Self>`, which is object-safe, and the blanket impl
/// below forwards to the real observer.
pub trait DynObserver<Item, Err> {
  fn dyn_next(&mut self, value: Item);
  fn dyn_error(self: Box<Self>, err: Err);
  fn dyn_complete(self: Box<Self>);
  fn dyn_is_closed(&self) -> bool;
}

impl<T, Item, Err> DynObserver<Item, Err> for T
where
  T: Observer<Item, Err>,
{
  fn dyn_next(&mut self, value: Item) { self.next(value); }

  fn dyn_error(self: Box<Self>, err: Err) { self.error(err); }

  fn dyn_complete(self: Box<Self>) { self.complete(); }

  fn dyn_is_closed(&self) -> bool { self.is_closed() }
}

/// Boxed observer for the single-threaded flavor.
pub type BoxedObserver<'a, Item, Err> = Box<dyn DynObserver<Item, Err> + 'a>;

/// Boxed observer for the thread-safe flavor.
pub type BoxedObserverSend<'a, Item, Err> = Box<dyn DynObserver<Item, Err> + Send + 'a>;

impl<'a, Item, Err> Observer<Item, Err> for BoxedObserver<'a, Item, Err> {
  #[inline]
  fn next(&mut self, value: Item) { (**self).dyn_next(value) }

  #[inline]
  fn error(self, err: Err) { self.dyn_error(err) }

  #[inline]
  fn complete(self) { self.dyn_complete() }

  #[inline]
  fn is_closed(&self) -> bool { (**self).dyn_is_closed() }
}

impl<'a, Item, Err> Observer<Item, Err> for BoxedObserverSend<'a, Item, Err> {
  #[inline]
  fn next(&mut self, value: Item) { (**self).dyn_next(value) }

  #[inline]
  fn error(self, err: Err) { self.dyn_error(err) }

  #[inline]
  fn complete(self) { self.dyn_complete() }

  #[inline]
  fn is_closed(&self) -> bool { (**self).dyn_is_closed() }
}

/// Conversion into the boxed observer a registry stores.
///
/// Implemented for every observer; the target type decides whether a `Send`
/// bound is required, so the same subscribe code serves both flavors.
pub trait IntoBoxedObserver<Target> {
  fn into_boxed(self) -> Target;
}

impl<'a, Item, Err, O> IntoBoxedObserver<BoxedObserver<'a, Item, Err>> for O
where
  O: Observer<Item, Err> + 'a,
{
  fn into_boxed(self) -> BoxedObserver<'a, Item, Err> { Box::new(self) }
}

impl<'a, Item, Err, O> IntoBoxedObserver<BoxedObserverSend<'a, Item, Err>> for O
where
  O: Observer<Item, Err> + Send + 'a,
{
  fn into_boxed(self) -> BoxedObserverSend<'a, Item, Err> { Box::new(self) }
}

// ============================================================================
// Closure adapters
// ============================================================================

/// Observer assembled from plain closures.
///
/// The `next` handler is mandatory; the terminal handlers are optional and a
/// missing one drops the corresponding notification on the floor.
pub struct CallbackObserver<N, E, C> {
  pub(crate) next: N,
  pub(crate) error: Option<E>,
  pub(crate) complete: Option<C>,
}

impl<Item, Err, N, E, C> Observer<Item, Err> for CallbackObserver<N, E, C>
where
  N: FnMut(Item),
  E: FnOnce(Err),
  C: FnOnce(),
{
  #[inline]
  fn next(&mut self, value: Item) { (self.next)(value) }

  fn error(self, err: Err) {
    if let Some(handler) = self.error {
      handler(err);
    }
  }

  fn complete(self) {
    if let Some(handler) = self.complete {
      handler();
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { false }
}

// ============================================================================
// Emitter
// ============================================================================

/// Mutable-reference facade over an observer, used by `observable::create`.
///
/// A `create` closure receives `&mut dyn Emitter` instead of the concrete
/// downstream observer: the closure stays independent of whatever observer
/// type ends up subscribed, and no heap allocation is needed to erase it.
/// Terminal calls take `&mut self` here; the adapter behind the facade
/// consumes its observer on the first terminal call and ignores the rest.
pub trait Emitter<Item, Err> {
  fn next(&mut self, value: Item);
  fn error(&mut self, err: Err);
  fn complete(&mut self);
}
