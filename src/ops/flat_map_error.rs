//! FlatMapError operator: recover from failure with another signal.

use crate::{
  cancellation::Cancellation,
  observer::Observer,
  signal::Signal,
  subscriber::Subscriber,
};

/// Pipes the upstream; on failure, builds a signal from the error and pipes
/// that instead. The resulting failure type is the fallback signal's.
#[derive(Clone)]
pub struct FlatMapErrorOp<S, F> {
  pub(crate) source: S,
  pub(crate) func: F,
}

impl<S, S2, F> Signal for FlatMapErrorOp<S, F>
where
  S: Signal,
  S2: Signal<Item = S::Item> + Send + 'static,
  F: FnMut(S::Err) -> S2 + Send + 'static,
{
  type Item = S::Item;
  type Err = S2::Err;

  fn actual_observe<O>(self, subscriber: Subscriber<O>)
  where
    O: Observer<S::Item, S2::Err> + Send + 'static,
  {
    let FlatMapErrorOp { source, func } = self;
    let Subscriber { observer, cancel } = subscriber;
    source.actual_observe(Subscriber {
      observer: FlatMapErrorObserver { observer, func, chain: cancel.clone() },
      cancel,
    });
  }
}

pub struct FlatMapErrorObserver<O, F> {
  observer: O,
  func: F,
  chain: Cancellation,
}

impl<Item, Err, O, F, S2> Observer<Item, Err> for FlatMapErrorObserver<O, F>
where
  F: FnMut(Err) -> S2,
  S2: Signal<Item = Item> + Send + 'static,
  O: Observer<Item, S2::Err> + Send + 'static,
  Item: Send + 'static,
{
  fn next(&mut self, value: Item) { self.observer.next(value); }

  fn error(self, err: Err) {
    let FlatMapErrorObserver { observer, mut func, chain } = self;
    let fallback = func(err);
    fallback.actual_observe(Subscriber { observer, cancel: chain });
  }

  fn complete(self) { self.observer.complete(); }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

#[cfg(test)]
mod test {
  use crate::prelude::*;
  use std::sync::{Arc, Mutex};

  #[test]
  fn failure_switches_to_the_fallback() {
    let out = Arc::new(Mutex::new(Vec::new()));
    let completed = Arc::new(Mutex::new(false));
    let c_out = out.clone();
    let c_completed = completed.clone();

    signal::create(|mut subscriber: Subscriber<_>| {
      subscriber.next(1);
      subscriber.error("boom");
    })
    .flat_map_error(|_e: &'static str| signal::from_iter([8, 9]))
    .on_complete(move || *c_completed.lock().unwrap() = true)
    .subscribe(move |v: i32| c_out.lock().unwrap().push(v));

    assert_eq!(*out.lock().unwrap(), vec![1, 8, 9]);
    assert!(*completed.lock().unwrap());
  }

  #[test]
  fn completion_never_invokes_the_fallback() {
    let out = Arc::new(Mutex::new(Vec::new()));
    let c_out = out.clone();

    signal::from_iter([1, 2])
      .flat_map_error(|_e| signal::from_iter([99]))
      .subscribe(move |v| c_out.lock().unwrap().push(v));

    assert_eq!(*out.lock().unwrap(), vec![1, 2]);
  }
}
