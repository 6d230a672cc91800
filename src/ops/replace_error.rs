//! ReplaceError operator: substitutes a fallback value for a failure.

use crate::{
  event::Never,
  is_closed_proxy_impl,
  observer::Observer,
  signal::Signal,
  subscriber::Subscriber,
};

#[derive(Clone)]
pub struct ReplaceErrorOp<S, Item> {
  pub(crate) source: S,
  pub(crate) value: Item,
}

impl<S, Item> Signal for ReplaceErrorOp<S, Item>
where
  S: Signal<Item = Item>,
  Item: Send + 'static,
{
  type Item = Item;
  type Err = Never;

  fn actual_observe<O>(self, subscriber: Subscriber<O>)
  where
    O: Observer<Item, Never> + Send + 'static,
  {
    let ReplaceErrorOp { source, value } = self;
    let Subscriber { observer, cancel } = subscriber;
    source.actual_observe(Subscriber { observer: ReplaceErrorObserver { observer, value }, cancel });
  }
}

pub struct ReplaceErrorObserver<O, Item> {
  observer: O,
  value: Item,
}

impl<Item, Err, O> Observer<Item, Err> for ReplaceErrorObserver<O, Item>
where
  O: Observer<Item, Never>,
{
  fn next(&mut self, value: Item) { self.observer.next(value); }

  fn error(mut self, _err: Err) {
    self.observer.next(self.value);
    self.observer.complete();
  }

  fn complete(self) { self.observer.complete(); }

  is_closed_proxy_impl!(observer);
}
