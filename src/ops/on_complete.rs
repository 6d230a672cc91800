//! OnComplete operator: a callback for successful termination.

use crate::{
  error_proxy_impl, is_closed_proxy_impl,
  observer::Observer,
  signal::Signal,
  subscriber::Subscriber,
};

#[derive(Clone)]
pub struct OnCompleteOp<S, F> {
  pub(crate) source: S,
  pub(crate) func: F,
}

impl<S, F> Signal for OnCompleteOp<S, F>
where
  S: Signal,
  F: FnOnce() + Send + 'static,
{
  type Item = S::Item;
  type Err = S::Err;

  fn actual_observe<O>(self, subscriber: Subscriber<O>)
  where
    O: Observer<S::Item, S::Err> + Send + 'static,
  {
    let OnCompleteOp { source, func } = self;
    let Subscriber { observer, cancel } = subscriber;
    source.actual_observe(Subscriber { observer: OnCompleteObserver { observer, func }, cancel });
  }
}

pub struct OnCompleteObserver<O, F> {
  observer: O,
  func: F,
}

impl<Item, Err, O, F> Observer<Item, Err> for OnCompleteObserver<O, F>
where
  O: Observer<Item, Err>,
  F: FnOnce(),
{
  fn next(&mut self, value: Item) { self.observer.next(value); }

  error_proxy_impl!(Err, observer);

  fn complete(self) {
    (self.func)();
    self.observer.complete();
  }

  is_closed_proxy_impl!(observer);
}
