//! BufferCount operator: fixed-size chunks of the upstream.

use crate::{
  is_closed_proxy_impl,
  observer::Observer,
  signal::Signal,
  subscriber::Subscriber,
};

/// Emits `Vec`s of exactly `size` values. A partial chunk left over at
/// completion is dropped, not flushed.
#[derive(Clone)]
pub struct BufferCountOp<S> {
  pub(crate) source: S,
  pub(crate) size: usize,
}

impl<S> Signal for BufferCountOp<S>
where
  S: Signal,
{
  type Item = Vec<S::Item>;
  type Err = S::Err;

  fn actual_observe<O>(self, subscriber: Subscriber<O>)
  where
    O: Observer<Vec<S::Item>, S::Err> + Send + 'static,
  {
    let BufferCountOp { source, size } = self;
    let Subscriber { observer, cancel } = subscriber;
    source.actual_observe(Subscriber {
      observer: BufferCountObserver { observer, buffer: Vec::new(), size },
      cancel,
    });
  }
}

pub struct BufferCountObserver<O, Item> {
  observer: O,
  buffer: Vec<Item>,
  size: usize,
}

impl<Item, Err, O> Observer<Item, Err> for BufferCountObserver<O, Item>
where
  O: Observer<Vec<Item>, Err>,
{
  fn next(&mut self, value: Item) {
    if self.size == 0 {
      return;
    }
    self.buffer.push(value);
    if self.buffer.len() == self.size {
      let chunk = std::mem::replace(&mut self.buffer, Vec::with_capacity(self.size));
      self.observer.next(chunk);
    }
  }

  fn error(self, err: Err) { self.observer.error(err); }

  fn complete(self) { self.observer.complete(); }

  is_closed_proxy_impl!(observer);
}
