//! SkipLast operator: suppresses the trailing `count` values.

use std::collections::VecDeque;

use crate::{
  complete_proxy_impl, error_proxy_impl, is_closed_proxy_impl,
  observer::Observer,
  signal::Signal,
  subscriber::Subscriber,
};

/// Holds `count` values back; once the buffer overflows, the oldest value
/// is released downstream. Whatever remains at completion is dropped.
#[derive(Clone)]
pub struct SkipLastOp<S> {
  pub(crate) source: S,
  pub(crate) count: usize,
}

impl<S> Signal for SkipLastOp<S>
where
  S: Signal,
{
  type Item = S::Item;
  type Err = S::Err;

  fn actual_observe<O>(self, subscriber: Subscriber<O>)
  where
    O: Observer<S::Item, S::Err> + Send + 'static,
  {
    let SkipLastOp { source, count } = self;
    let Subscriber { observer, cancel } = subscriber;
    source.actual_observe(Subscriber {
      observer: SkipLastObserver { observer, buffer: VecDeque::new(), count },
      cancel,
    });
  }
}

pub struct SkipLastObserver<O, Item> {
  observer: O,
  buffer: VecDeque<Item>,
  count: usize,
}

impl<Item, Err, O> Observer<Item, Err> for SkipLastObserver<O, Item>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    self.buffer.push_back(value);
    if self.buffer.len() > self.count {
      if let Some(v) = self.buffer.pop_front() {
        self.observer.next(v);
      }
    }
  }

  error_proxy_impl!(Err, observer);
  complete_proxy_impl!(observer);
  is_closed_proxy_impl!(observer);
}

#[cfg(test)]
mod test {
  use crate::prelude::*;
  use std::sync::{Arc, Mutex};

  #[test]
  fn suppresses_the_tail() {
    let out = Arc::new(Mutex::new(Vec::new()));
    let c_out = out.clone();

    signal::from_iter(0..5)
      .skip_last(2)
      .subscribe(move |v| c_out.lock().unwrap().push(v));

    assert_eq!(*out.lock().unwrap(), vec![0, 1, 2]);
  }

  #[test]
  fn short_upstream_is_swallowed_whole() {
    let completed = Arc::new(Mutex::new(false));
    let c_completed = completed.clone();

    signal::from_iter(0..2)
      .skip_last(5)
      .on_complete(move || *c_completed.lock().unwrap() = true)
      .subscribe(|_| panic!("the whole sequence should be suppressed"));

    assert!(*completed.lock().unwrap());
  }
}
