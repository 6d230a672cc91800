//! Tap operator: observe values without consuming them.

use crate::{
  complete_proxy_impl, error_proxy_impl, is_closed_proxy_impl,
  observer::Observer,
  signal::Signal,
  subscriber::Subscriber,
};

#[derive(Clone)]
pub struct TapOp<S, F> {
  pub(crate) source: S,
  pub(crate) func: F,
}

impl<S, F> Signal for TapOp<S, F>
where
  S: Signal,
  F: FnMut(&S::Item) + Send + 'static,
{
  type Item = S::Item;
  type Err = S::Err;

  fn actual_observe<O>(self, subscriber: Subscriber<O>)
  where
    O: Observer<S::Item, S::Err> + Send + 'static,
  {
    let TapOp { source, func } = self;
    let Subscriber { observer, cancel } = subscriber;
    source.actual_observe(Subscriber { observer: TapObserver { observer, func }, cancel });
  }
}

pub struct TapObserver<O, F> {
  observer: O,
  func: F,
}

impl<Item, Err, O, F> Observer<Item, Err> for TapObserver<O, F>
where
  O: Observer<Item, Err>,
  F: FnMut(&Item),
{
  fn next(&mut self, value: Item) {
    (self.func)(&value);
    self.observer.next(value);
  }

  error_proxy_impl!(Err, observer);
  complete_proxy_impl!(observer);
  is_closed_proxy_impl!(observer);
}
