//! Filter operator: emits only values satisfying a predicate.

use crate::{
  complete_proxy_impl, error_proxy_impl, is_closed_proxy_impl,
  observer::Observer,
  signal::Signal,
  subscriber::Subscriber,
};

#[derive(Clone)]
pub struct FilterOp<S, F> {
  pub(crate) source: S,
  pub(crate) predicate: F,
}

impl<S, F> Signal for FilterOp<S, F>
where
  S: Signal,
  F: FnMut(&S::Item) -> bool + Send + 'static,
{
  type Item = S::Item;
  type Err = S::Err;

  fn actual_observe<O>(self, subscriber: Subscriber<O>)
  where
    O: Observer<S::Item, S::Err> + Send + 'static,
  {
    let FilterOp { source, predicate } = self;
    let Subscriber { observer, cancel } = subscriber;
    source.actual_observe(Subscriber { observer: FilterObserver { observer, predicate }, cancel });
  }
}

pub struct FilterObserver<O, F> {
  observer: O,
  predicate: F,
}

impl<Item, Err, O, F> Observer<Item, Err> for FilterObserver<O, F>
where
  O: Observer<Item, Err>,
  F: FnMut(&Item) -> bool,
{
  fn next(&mut self, value: Item) {
    if (self.predicate)(&value) {
      self.observer.next(value);
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
  fn keeps_matching_values() {
    let out = Arc::new(Mutex::new(Vec::new()));
    let c_out = out.clone();

    signal::from_iter(0..10)
      .filter(|v| v % 2 == 0)
      .subscribe(move |v| c_out.lock().unwrap().push(v));

    assert_eq!(*out.lock().unwrap(), vec![0, 2, 4, 6, 8]);
  }

  #[test]
  fn completion_passes_through() {
    let completed = Arc::new(Mutex::new(false));
    let c_completed = completed.clone();

    signal::from_iter(0..3)
      .filter(|_| false)
      .on_complete(move || *c_completed.lock().unwrap() = true)
      .subscribe(|_| panic!("nothing should pass"));

    assert!(*completed.lock().unwrap());
  }
}
