//! OnError operator: consume the failure, yielding a non-failing signal.

use crate::{
  event::Never,
  is_closed_proxy_impl,
  observer::Observer,
  signal::Signal,
  subscriber::Subscriber,
  type_hint::TypeHint,
};

/// Hands an upstream failure to `func` instead of the downstream, then
/// completes. Downstream observers never see the failure itself, so the
/// output's failure type is [`Never`]; the completion keeps the
/// subscription's release-on-terminal contract intact.
#[derive(Clone)]
pub struct OnErrorOp<S, F> {
  pub(crate) source: S,
  pub(crate) func: F,
}

impl<S, F> Signal for OnErrorOp<S, F>
where
  S: Signal,
  F: FnOnce(S::Err) + Send + 'static,
{
  type Item = S::Item;
  type Err = Never;

  fn actual_observe<O>(self, subscriber: Subscriber<O>)
  where
    O: Observer<S::Item, Never> + Send + 'static,
  {
    let OnErrorOp { source, func } = self;
    let Subscriber { observer, cancel } = subscriber;
    source.actual_observe(Subscriber {
      observer: OnErrorObserver { observer, func, _hint: TypeHint::new() },
      cancel,
    });
  }
}

pub struct OnErrorObserver<O, F, Err> {
  observer: O,
  func: F,
  _hint: TypeHint<Err>,
}

impl<Item, Err, O, F> Observer<Item, Err> for OnErrorObserver<O, F, Err>
where
  O: Observer<Item, Never>,
  F: FnOnce(Err),
{
  fn next(&mut self, value: Item) { self.observer.next(value); }

  fn error(self, err: Err) {
    (self.func)(err);
    self.observer.complete();
  }

  fn complete(self) { self.observer.complete(); }

  is_closed_proxy_impl!(observer);
}

#[cfg(test)]
mod test {
  use crate::prelude::*;
  use std::sync::{Arc, Mutex};

  #[test]
  fn the_handler_receives_the_failure() {
    let got = Arc::new(Mutex::new(None));
    let c_got = got.clone();

    signal::throw::<i32, _>("boom")
      .on_error(move |e| *c_got.lock().unwrap() = Some(e))
      .subscribe(|_| {});

    assert_eq!(*got.lock().unwrap(), Some("boom"));
  }

  #[test]
  fn a_handled_failure_still_releases_the_subscription() {
    let finalized = Arc::new(Mutex::new(false));
    let c_finalized = finalized.clone();

    let subscription = signal::throw::<i32, _>("boom")
      .finalize(move || *c_finalized.lock().unwrap() = true)
      .on_error(|_| {})
      .subscribe(|_| {});

    assert!(subscription.is_disposed());
    assert!(*finalized.lock().unwrap());
  }

  #[test]
  fn values_and_completion_pass_through() {
    let out = Arc::new(Mutex::new(Vec::new()));
    let completed = Arc::new(Mutex::new(false));
    let c_out = out.clone();
    let c_completed = completed.clone();

    signal::create(|mut subscriber: Subscriber<_>| {
      subscriber.next(1);
      subscriber.complete();
    })
    .on_error(|_: &'static str| panic!("no failure occurred"))
    .on_complete(move || *c_completed.lock().unwrap() = true)
    .subscribe(move |v: i32| c_out.lock().unwrap().push(v));

    assert_eq!(*out.lock().unwrap(), vec![1]);
    assert!(*completed.lock().unwrap());
  }
}
