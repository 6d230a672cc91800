//! Pairwise operator: each value together with its predecessor.

use crate::{
  complete_proxy_impl, error_proxy_impl, is_closed_proxy_impl,
  observer::Observer,
  signal::Signal,
  subscriber::Subscriber,
};

/// Emits `(previous, current)` pairs starting with the very first value,
/// whose `previous` is `None`.
#[derive(Clone)]
pub struct PairwiseOp<S> {
  pub(crate) source: S,
}

impl<S> Signal for PairwiseOp<S>
where
  S: Signal,
  S::Item: Clone,
{
  type Item = (Option<S::Item>, S::Item);
  type Err = S::Err;

  fn actual_observe<O>(self, subscriber: Subscriber<O>)
  where
    O: Observer<(Option<S::Item>, S::Item), S::Err> + Send + 'static,
  {
    let Subscriber { observer, cancel } = subscriber;
    self
      .source
      .actual_observe(Subscriber { observer: PairwiseObserver { observer, prev: None }, cancel });
  }
}

pub struct PairwiseObserver<O, Item> {
  observer: O,
  prev: Option<Item>,
}

impl<Item, Err, O> Observer<Item, Err> for PairwiseObserver<O, Item>
where
  O: Observer<(Option<Item>, Item), Err>,
  Item: Clone,
{
  fn next(&mut self, value: Item) {
    let prev = self.prev.replace(value.clone());
    self.observer.next((prev, value));
  }

  error_proxy_impl!(Err, observer);
  complete_proxy_impl!(observer);
  is_closed_proxy_impl!(observer);
}
