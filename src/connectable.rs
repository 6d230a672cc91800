//! Connectable signals: multicast with an explicitly started upstream.

use std::sync::{Arc, Mutex};

use crate::{
  cancellation::Cancellation,
  observer::Observer,
  signal::Signal,
  subject::PassthroughSubject,
  subscriber::Subscriber,
};

/// A signal whose upstream subscription is started by [`connect`] and
/// shared among all observers.
///
/// Observers attach to the interposed subject and receive nothing until
/// `connect()` subscribes the source exactly once; from then on the
/// subject fans the single upstream out. Which events a late observer sees
/// is the subject's call (passthrough, replay, ...).
///
/// [`connect`]: ConnectableSignal::connect
///
/// ```
/// use rivulet::prelude::*;
/// use std::sync::{Arc, Mutex};
///
/// let out = Arc::new(Mutex::new(Vec::new()));
/// let c_out = out.clone();
///
/// let connectable = signal::from_iter([1, 2, 3]).publish();
/// connectable.fork().subscribe(move |v| c_out.lock().unwrap().push(v));
///
/// assert!(out.lock().unwrap().is_empty());
/// connectable.connect();
/// assert_eq!(*out.lock().unwrap(), vec![1, 2, 3]);
/// ```
#[derive(Clone)]
pub struct ConnectableSignal<S, Sub> {
  source: S,
  subject: Sub,
}

impl<S, Sub> ConnectableSignal<S, Sub> {
  pub fn new(source: S, subject: Sub) -> Self { ConnectableSignal { source, subject } }

  /// Another handle onto the same multicast.
  pub fn fork(&self) -> Self
  where
    S: Clone,
    Sub: Clone,
  {
    self.clone()
  }
}

impl<S, Sub> ConnectableSignal<S, Sub>
where
  S: Signal + Clone,
  Sub: Observer<S::Item, S::Err> + Clone + Send + 'static,
{
  /// Subscribe the source once, feeding the subject. Returns the upstream
  /// subscription's cancellation.
  pub fn connect(&self) -> Cancellation {
    let cancel = Cancellation::default();
    self
      .source
      .clone()
      .actual_observe(Subscriber { observer: self.subject.clone(), cancel: cancel.clone() });
    cancel
  }
}

impl<S, Sub> Signal for ConnectableSignal<S, Sub>
where
  S: Signal,
  Sub: Signal,
{
  type Item = Sub::Item;
  type Err = Sub::Err;

  fn actual_observe<O>(self, subscriber: Subscriber<O>)
  where
    O: Observer<Sub::Item, Sub::Err> + Send + 'static,
  {
    self.subject.actual_observe(subscriber);
  }
}

struct RefCountInner<S: Signal> {
  connectable: ConnectableSignal<S, PassthroughSubject<S::Item, S::Err>>,
  connection: Option<Cancellation>,
  connecting: bool,
  observers: usize,
}

/// `publish` with automatic reference counting: the upstream is subscribed
/// when the first observer arrives and cancelled when the last one leaves.
pub struct RefCountSignal<S: Signal> {
  inner: Arc<Mutex<RefCountInner<S>>>,
}

impl<S: Signal> Clone for RefCountSignal<S> {
  fn clone(&self) -> Self { RefCountSignal { inner: self.inner.clone() } }
}

impl<S: Signal> RefCountSignal<S> {
  pub fn new(connectable: ConnectableSignal<S, PassthroughSubject<S::Item, S::Err>>) -> Self {
    RefCountSignal {
      inner: Arc::new(Mutex::new(RefCountInner {
        connectable,
        connection: None,
        connecting: false,
        observers: 0,
      })),
    }
  }
}

impl<S> Signal for RefCountSignal<S>
where
  S: Signal + Clone + Send + 'static,
  S::Item: Clone,
  S::Err: Clone,
{
  type Item = S::Item;
  type Err = S::Err;

  fn actual_observe<O>(self, subscriber: Subscriber<O>)
  where
    O: Observer<S::Item, S::Err> + Send + 'static,
  {
    let Subscriber { observer, cancel } = subscriber;

    let (connectable, must_connect) = {
      let mut inner = self.inner.lock().unwrap();
      inner.observers += 1;
      let must_connect = inner.connection.is_none() && !inner.connecting;
      if must_connect {
        inner.connecting = true;
      }
      (inner.connectable.clone(), must_connect)
    };

    connectable
      .clone()
      .actual_observe(Subscriber { observer, cancel: cancel.clone() });

    {
      let weak = self.inner.clone();
      cancel.on_dispose(move || {
        let stale = {
          let mut inner = weak.lock().unwrap();
          inner.observers -= 1;
          if inner.observers == 0 { inner.connection.take() } else { None }
        };
        if let Some(connection) = stale {
          connection.dispose();
        }
      });
    }

    if must_connect {
      let connection = connectable.connect();
      let orphaned = {
        let mut inner = self.inner.lock().unwrap();
        inner.connecting = false;
        if inner.observers > 0 {
          inner.connection = Some(connection);
          None
        } else {
          Some(connection)
        }
      };
      if let Some(connection) = orphaned {
        connection.dispose();
      }
    }
  }
}
