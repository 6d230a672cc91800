use crate::{event::Never, observer::Observer, signal::Signal, subscriber::Subscriber};

/// Emits each element of `iter`, then completes.
pub fn from_iter<I>(iter: I) -> FromIter<I>
where
  I: IntoIterator,
{
  FromIter { iter }
}

/// Emits `value`, then completes.
pub fn of<Item>(value: Item) -> Of<Item> { Of { value } }

#[derive(Clone)]
pub struct FromIter<I> {
  iter: I,
}

impl<I> Signal for FromIter<I>
where
  I: IntoIterator,
  I::Item: Send + 'static,
{
  type Item = I::Item;
  type Err = Never;

  fn actual_observe<O>(self, mut subscriber: Subscriber<O>)
  where
    O: Observer<I::Item, Never> + Send + 'static,
  {
    for v in self.iter {
      if subscriber.is_disposed() {
        return;
      }
      subscriber.next(v);
    }
    subscriber.complete();
  }
}

#[derive(Clone)]
pub struct Of<Item> {
  value: Item,
}

impl<Item> Signal for Of<Item>
where
  Item: Send + 'static,
{
  type Item = Item;
  type Err = Never;

  fn actual_observe<O>(self, mut subscriber: Subscriber<O>)
  where
    O: Observer<Item, Never> + Send + 'static,
  {
    subscriber.next(self.value);
    subscriber.complete();
  }
}
