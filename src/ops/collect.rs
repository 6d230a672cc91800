//! Collect operator: gathers the whole sequence into one `Vec`.

use crate::{
  is_closed_proxy_impl,
  observer::Observer,
  signal::Signal,
  subscriber::Subscriber,
};

#[derive(Clone)]
pub struct CollectOp<S> {
  pub(crate) source: S,
}

impl<S> Signal for CollectOp<S>
where
  S: Signal,
{
  type Item = Vec<S::Item>;
  type Err = S::Err;

  fn actual_observe<O>(self, subscriber: Subscriber<O>)
  where
    O: Observer<Vec<S::Item>, S::Err> + Send + 'static,
  {
    let Subscriber { observer, cancel } = subscriber;
    self
      .source
      .actual_observe(Subscriber { observer: CollectObserver { observer, buffer: Vec::new() }, cancel });
  }
}

pub struct CollectObserver<O, Item> {
  observer: O,
  buffer: Vec<Item>,
}

impl<Item, Err, O> Observer<Item, Err> for CollectObserver<O, Item>
where
  O: Observer<Vec<Item>, Err>,
{
  fn next(&mut self, value: Item) { self.buffer.push(value); }

  fn error(self, err: Err) { self.observer.error(err); }

  fn complete(mut self) {
    self.observer.next(self.buffer);
    self.observer.complete();
  }

  is_closed_proxy_impl!(observer);
}

#[cfg(test)]
mod test {
  use crate::prelude::*;
  use std::sync::{Arc, Mutex};

  #[test]
  fn everything_arrives_at_once() {
    let out = Arc::new(Mutex::new(Vec::new()));
    let c_out = out.clone();

    signal::from_iter(1..=4)
      .collect()
      .subscribe(move |v| c_out.lock().unwrap().push(v));

    assert_eq!(*out.lock().unwrap(), vec![vec![1, 2, 3, 4]]);
  }

  #[test]
  fn empty_upstream_collects_an_empty_list() {
    let out = Arc::new(Mutex::new(Vec::new()));
    let c_out = out.clone();

    signal::empty::<i32>()
      .collect()
      .subscribe(move |v| c_out.lock().unwrap().push(v));

    assert_eq!(*out.lock().unwrap(), vec![Vec::<i32>::new()]);
  }
}
