//! # hotcast: share one execution among many subscribers
//!
//! A cold push stream runs once per subscriber. `hotcast` converts it into a
//! hot one: a [`Subject`] multicasts a single execution to every registered
//! observer, a [`ConnectableObservable`] decouples subscribing from starting
//! that execution, and [`ref_count`](crate::ops::ref_count) manages the
//! start/stop automatically from the live-subscriber count.
//!
//! ## Quick start
//!
//! ```rust
//! use std::{cell::RefCell, rc::Rc};
//!
//! use hotcast::prelude::*;
//!
//! let ticks = observable::create(|emitter: &mut dyn Emitter<i32, &'static str>| {
//!   emitter.next(1);
//!   emitter.next(2);
//!   emitter.complete();
//! })
//! .publish();
//!
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let also = Rc::new(RefCell::new(Vec::new()));
//!
//! let c_seen = seen.clone();
//! ticks.clone().subscribe(move |v| c_seen.borrow_mut().push(v));
//! let c_also = also.clone();
//! ticks.clone().subscribe(move |v| c_also.borrow_mut().push(v));
//!
//! // One source execution, fanned out to both subscribers.
//! ticks.connect();
//!
//! assert_eq!(*seen.borrow(), vec![1, 2]);
//! assert_eq!(*also.borrow(), vec![1, 2]);
//! ```
//!
//! ## Key types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Observer`] | Consumes `next`, `error`, and `complete` notifications |
//! | [`Subject`] | Multicast relay: observer and observable at once |
//! | [`ConnectableObservable`] | Subscribing registers; `connect()` starts the source |
//! | [`RefCount`] | Connects on the first subscriber, disconnects on the last |
//! | [`Subscription`] | Handle to cancel a registration |
//!
//! Every stateful type comes in a single-threaded flavor (`Local*`, built on
//! `Rc`/`RefCell`) and a thread-safe one (`Shared*`, built on `Arc`/`Mutex`)
//! with identical semantics.
//!
//! Delivery is synchronous and single-threaded: a producer call to `next`
//! returns after every registered observer has seen the value. There is no
//! scheduler, no buffering, and no replay — late subscribers only observe
//! events from their registration on, except for the retained terminal
//! notification of an already-stopped subject.

pub mod observable;
pub mod observer;
pub mod ops;
pub mod prelude;
pub mod rc;
pub mod subject;
pub mod subscription;

pub use prelude::*;
