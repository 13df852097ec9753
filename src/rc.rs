//! Interior-mutability pointers shared by the local and thread-safe flavors
//! of the crate.
//!
//! Everything stateful in this crate (the subject's registry, the connection
//! cell, the ref-count state) is written once against the [`RcDeref`] /
//! [`RcDerefMut`] traits and instantiated with [`MutRc`] (single-threaded,
//! `Rc<RefCell<_>>`) or [`MutArc`] (thread-safe, `Arc<Mutex<_>>`).

use std::{
  cell::{Ref, RefCell, RefMut},
  ops::{Deref, DerefMut},
  rc::Rc,
  sync::{Arc, Mutex, MutexGuard},
};

/// Shared read access through a reference-counted pointer.
pub trait RcDeref {
  type Target;
  type Guard<'a>: Deref<Target = Self::Target>
  where
    Self: 'a;

  fn rc_deref(&self) -> Self::Guard<'_>;
}

/// Shared write access through a reference-counted pointer.
pub trait RcDerefMut: RcDeref {
  type GuardMut<'a>: DerefMut<Target = Self::Target>
  where
    Self: 'a;

  fn rc_deref_mut(&self) -> Self::GuardMut<'_>;

  /// Non-blocking variant of [`rc_deref_mut`](RcDerefMut::rc_deref_mut).
  ///
  /// Returns `None` when the pointee is already borrowed or locked, which is
  /// how the subject detects re-entrant mutation during a broadcast.
  fn try_rc_deref_mut(&self) -> Option<Self::GuardMut<'_>>;
}

/// `Rc<RefCell<T>>` behind the [`RcDerefMut`] interface.
#[derive(Default)]
pub struct MutRc<T>(Rc<RefCell<T>>);

/// `Arc<Mutex<T>>` behind the [`RcDerefMut`] interface.
#[derive(Default)]
pub struct MutArc<T>(Arc<Mutex<T>>);

impl<T> From<T> for MutRc<T> {
  fn from(value: T) -> Self { Self(Rc::new(RefCell::new(value))) }
}

impl<T> From<T> for MutArc<T> {
  fn from(value: T) -> Self { Self(Arc::new(Mutex::new(value))) }
}

impl<T> Clone for MutRc<T> {
  #[inline]
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<T> Clone for MutArc<T> {
  #[inline]
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<T> RcDeref for MutRc<T> {
  type Target = T;
  type Guard<'a>
    = Ref<'a, T>
  where
    Self: 'a;

  #[inline]
  fn rc_deref(&self) -> Self::Guard<'_> { self.0.borrow() }
}

impl<T> RcDerefMut for MutRc<T> {
  type GuardMut<'a>
    = RefMut<'a, T>
  where
    Self: 'a;

  #[inline]
  fn rc_deref_mut(&self) -> Self::GuardMut<'_> { self.0.borrow_mut() }

  #[inline]
  fn try_rc_deref_mut(&self) -> Option<Self::GuardMut<'_>> { self.0.try_borrow_mut().ok() }
}

impl<T> RcDeref for MutArc<T> {
  type Target = T;
  type Guard<'a>
    = MutexGuard<'a, T>
  where
    Self: 'a;

  #[inline]
  fn rc_deref(&self) -> Self::Guard<'_> { self.0.lock().unwrap() }
}

impl<T> RcDerefMut for MutArc<T> {
  type GuardMut<'a>
    = MutexGuard<'a, T>
  where
    Self: 'a;

  #[inline]
  fn rc_deref_mut(&self) -> Self::GuardMut<'_> { self.0.lock().unwrap() }

  #[inline]
  fn try_rc_deref_mut(&self) -> Option<Self::GuardMut<'_>> { self.0.try_lock().ok() }
}
