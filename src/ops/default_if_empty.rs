//! DefaultIfEmpty operator: a fallback for value-less completions.

use crate::{
  is_closed_proxy_impl,
  observer::Observer,
  signal::Signal,
  subscriber::Subscriber,
};

#[derive(Clone)]
pub struct DefaultIfEmptyOp<S, Item> {
  pub(crate) source: S,
  pub(crate) default: Item,
}

impl<S, Item> Signal for DefaultIfEmptyOp<S, Item>
where
  S: Signal<Item = Item>,
  Item: Send + 'static,
{
  type Item = Item;
  type Err = S::Err;

  fn actual_observe<O>(self, subscriber: Subscriber<O>)
  where
    O: Observer<Item, S::Err> + Send + 'static,
  {
    let DefaultIfEmptyOp { source, default } = self;
    let Subscriber { observer, cancel } = subscriber;
    source.actual_observe(Subscriber {
      observer: DefaultIfEmptyObserver { observer, default: Some(default) },
      cancel,
    });
  }
}

pub struct DefaultIfEmptyObserver<O, Item> {
  observer: O,
  default: Option<Item>,
}

impl<Item, Err, O> Observer<Item, Err> for DefaultIfEmptyObserver<O, Item>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    self.default = None;
    self.observer.next(value);
  }

  fn error(self, err: Err) { self.observer.error(err); }

  fn complete(mut self) {
    if let Some(default) = self.default.take() {
      self.observer.next(default);
    }
    self.observer.complete();
  }

  is_closed_proxy_impl!(observer);
}
