pub use crate::{
  observable,
  observable::{ConnectableObservable, Connection, Observable, Subscribe},
  observer::{
    BoxedObserver, BoxedObserverSend, CallbackObserver, DynObserver, Emitter, IntoBoxedObserver,
    Observer,
  },
  ops::{
    map::Map,
    publish::{Publish, PublishSelector},
    ref_count::{LocalRefCount, RefCount, SharedRefCount},
  },
  rc::{MutArc, MutRc, RcDeref, RcDerefMut},
  subject::{LocalSubject, SharedSubject, Subject, SubjectSubscription},
  subscription::{ClosureSubscription, Subscription, SubscriptionGuard},
};
