//! Skip operator: discards the leading `count` values.

use crate::{
  complete_proxy_impl, error_proxy_impl, is_closed_proxy_impl,
  observer::Observer,
  signal::Signal,
  subscriber::Subscriber,
};

#[derive(Clone)]
pub struct SkipOp<S> {
  pub(crate) source: S,
  pub(crate) count: usize,
}

impl<S> Signal for SkipOp<S>
where
  S: Signal,
{
  type Item = S::Item;
  type Err = S::Err;

  fn actual_observe<O>(self, subscriber: Subscriber<O>)
  where
    O: Observer<S::Item, S::Err> + Send + 'static,
  {
    let SkipOp { source, count } = self;
    let Subscriber { observer, cancel } = subscriber;
    source.actual_observe(Subscriber { observer: SkipObserver { observer, remaining: count }, cancel });
  }
}

pub struct SkipObserver<O> {
  observer: O,
  remaining: usize,
}

impl<Item, Err, O> Observer<Item, Err> for SkipObserver<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    if self.remaining > 0 {
      self.remaining -= 1;
    } else {
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
  fn drops_the_leading_values() {
    let out = Arc::new(Mutex::new(Vec::new()));
    let c_out = out.clone();

    signal::from_iter(0..5)
      .skip(2)
      .subscribe(move |v| c_out.lock().unwrap().push(v));

    assert_eq!(*out.lock().unwrap(), vec![2, 3, 4]);
  }

  #[test]
  fn skipping_more_than_the_length_yields_nothing() {
    let completed = Arc::new(Mutex::new(false));
    let c_completed = completed.clone();

    signal::from_iter(0..3)
      .skip(10)
      .on_complete(move || *c_completed.lock().unwrap() = true)
      .subscribe(|_| panic!("everything should be skipped"));

    assert!(*completed.lock().unwrap());
  }
}
