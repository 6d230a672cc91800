//! FilterMap operator: map and filter in a single pass.

use crate::{
  complete_proxy_impl, error_proxy_impl, is_closed_proxy_impl,
  observer::Observer,
  signal::Signal,
  subscriber::Subscriber,
};

#[derive(Clone)]
pub struct FilterMapOp<S, F> {
  pub(crate) source: S,
  pub(crate) func: F,
}

impl<S, F, B> Signal for FilterMapOp<S, F>
where
  S: Signal,
  F: FnMut(S::Item) -> Option<B> + Send + 'static,
  B: Send + 'static,
{
  type Item = B;
  type Err = S::Err;

  fn actual_observe<O>(self, subscriber: Subscriber<O>)
  where
    O: Observer<B, S::Err> + Send + 'static,
  {
    let FilterMapOp { source, func } = self;
    let Subscriber { observer, cancel } = subscriber;
    source.actual_observe(Subscriber { observer: FilterMapObserver { observer, func }, cancel });
  }
}

pub struct FilterMapObserver<O, F> {
  observer: O,
  func: F,
}

impl<Item, Err, B, O, F> Observer<Item, Err> for FilterMapObserver<O, F>
where
  O: Observer<B, Err>,
  F: FnMut(Item) -> Option<B>,
{
  fn next(&mut self, value: Item) {
    if let Some(mapped) = (self.func)(value) {
      self.observer.next(mapped);
    }
  }

  error_proxy_impl!(Err, observer);
  complete_proxy_impl!(observer);
  is_closed_proxy_impl!(observer);
}
