//! IgnoreElements operator: swallows values, forwards only terminals.

use crate::{
  complete_proxy_impl, error_proxy_impl, is_closed_proxy_impl,
  observer::Observer,
  signal::Signal,
  subscriber::Subscriber,
};

#[derive(Clone)]
pub struct IgnoreElementsOp<S> {
  pub(crate) source: S,
}

impl<S> Signal for IgnoreElementsOp<S>
where
  S: Signal,
{
  type Item = S::Item;
  type Err = S::Err;

  fn actual_observe<O>(self, subscriber: Subscriber<O>)
  where
    O: Observer<S::Item, S::Err> + Send + 'static,
  {
    let Subscriber { observer, cancel } = subscriber;
    self
      .source
      .actual_observe(Subscriber { observer: IgnoreElementsObserver { observer }, cancel });
  }
}

pub struct IgnoreElementsObserver<O> {
  observer: O,
}

impl<Item, Err, O> Observer<Item, Err> for IgnoreElementsObserver<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, _value: Item) {}

  error_proxy_impl!(Err, observer);
  complete_proxy_impl!(observer);
  is_closed_proxy_impl!(observer);
}

#[cfg(test)]
mod test {
  use crate::prelude::*;
  use std::sync::{Arc, Mutex};

  #[test]
  fn only_the_terminal_gets_through() {
    let completed = Arc::new(Mutex::new(false));
    let c_completed = completed.clone();

    signal::from_iter(0..100)
      .ignore_elements()
      .on_complete(move || *c_completed.lock().unwrap() = true)
      .subscribe(|_| panic!("values must be swallowed"));

    assert!(*completed.lock().unwrap());
  }
}
