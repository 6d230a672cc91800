//! TakeLast operator: the trailing `count` values, emitted on completion.

use std::collections::VecDeque;

use crate::{
  is_closed_proxy_impl,
  observer::Observer,
  signal::Signal,
  subscriber::Subscriber,
};

/// Buffers the last `count` values in a size-bounded ring and flushes them
/// when the upstream completes.
#[derive(Clone)]
pub struct TakeLastOp<S> {
  pub(crate) source: S,
  pub(crate) count: usize,
}

impl<S> Signal for TakeLastOp<S>
where
  S: Signal,
{
  type Item = S::Item;
  type Err = S::Err;

  fn actual_observe<O>(self, subscriber: Subscriber<O>)
  where
    O: Observer<S::Item, S::Err> + Send + 'static,
  {
    let TakeLastOp { source, count } = self;
    let Subscriber { observer, cancel } = subscriber;
    source.actual_observe(Subscriber {
      observer: TakeLastObserver { observer, buffer: VecDeque::new(), count },
      cancel,
    });
  }
}

pub struct TakeLastObserver<O, Item> {
  observer: O,
  buffer: VecDeque<Item>,
  count: usize,
}

impl<Item, Err, O> Observer<Item, Err> for TakeLastObserver<O, Item>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    if self.count == 0 {
      return;
    }
    self.buffer.push_back(value);
    if self.buffer.len() > self.count {
      self.buffer.pop_front();
    }
  }

  fn error(self, err: Err) { self.observer.error(err); }

  fn complete(mut self) {
    for v in self.buffer {
      self.observer.next(v);
    }
    self.observer.complete();
  }

  is_closed_proxy_impl!(observer);
}

#[cfg(test)]
mod test {
  use crate::prelude::*;
  use std::sync::{Arc, Mutex};

  #[test]
  fn emits_the_trailing_values() {
    let out = Arc::new(Mutex::new(Vec::new()));
    let c_out = out.clone();

    signal::from_iter(1..=5)
      .take_last(2)
      .subscribe(move |v| c_out.lock().unwrap().push(v));

    assert_eq!(*out.lock().unwrap(), vec![4, 5]);
  }

  #[test]
  fn shorter_upstream_yields_everything() {
    let out = Arc::new(Mutex::new(Vec::new()));
    let c_out = out.clone();

    signal::from_iter([1, 2])
      .take_last(5)
      .subscribe(move |v| c_out.lock().unwrap().push(v));

    assert_eq!(*out.lock().unwrap(), vec![1, 2]);
  }

  #[test]
  fn last_is_take_last_one() {
    let out = Arc::new(Mutex::new(Vec::new()));
    let c_out = out.clone();

    signal::from_iter([1, 2, 3])
      .last()
      .subscribe(move |v| c_out.lock().unwrap().push(v));

    assert_eq!(*out.lock().unwrap(), vec![3]);
  }

  #[test]
  fn failure_discards_the_buffer() {
    let out = Arc::new(Mutex::new(Vec::new()));
    let got = Arc::new(Mutex::new(None));
    let c_out = out.clone();
    let c_got = got.clone();

    signal::create(|mut subscriber: Subscriber<_>| {
      subscriber.next(1);
      subscriber.error("boom");
    })
    .take_last(2)
    .on_error(move |e| *c_got.lock().unwrap() = Some(e))
    .subscribe(move |v: i32| c_out.lock().unwrap().push(v));

    assert!(out.lock().unwrap().is_empty());
    assert_eq!(*got.lock().unwrap(), Some("boom"));
  }
}
