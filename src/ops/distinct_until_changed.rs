//! DistinctUntilChanged operator: suppresses consecutive duplicates.

use crate::{
  complete_proxy_impl, error_proxy_impl, is_closed_proxy_impl,
  observer::Observer,
  signal::Signal,
  subscriber::Subscriber,
};

/// Emits a value only if the comparer says it differs from the previously
/// emitted one; the first value is always emitted.
#[derive(Clone)]
pub struct DistinctUntilChangedOp<S, F> {
  pub(crate) source: S,
  pub(crate) comparer: F,
}

impl<S, F> Signal for DistinctUntilChangedOp<S, F>
where
  S: Signal,
  S::Item: Clone,
  F: FnMut(&S::Item, &S::Item) -> bool + Send + 'static,
{
  type Item = S::Item;
  type Err = S::Err;

  fn actual_observe<O>(self, subscriber: Subscriber<O>)
  where
    O: Observer<S::Item, S::Err> + Send + 'static,
  {
    let DistinctUntilChangedOp { source, comparer } = self;
    let Subscriber { observer, cancel } = subscriber;
    source.actual_observe(Subscriber {
      observer: DistinctUntilChangedObserver { observer, comparer, last: None },
      cancel,
    });
  }
}

pub struct DistinctUntilChangedObserver<O, F, Item> {
  observer: O,
  comparer: F,
  last: Option<Item>,
}

impl<Item, Err, O, F> Observer<Item, Err> for DistinctUntilChangedObserver<O, F, Item>
where
  O: Observer<Item, Err>,
  F: FnMut(&Item, &Item) -> bool,
  Item: Clone,
{
  fn next(&mut self, value: Item) {
    let duplicate = match self.last.as_ref() {
      Some(last) => (self.comparer)(last, &value),
      None => false,
    };
    if !duplicate {
      self.last = Some(value.clone());
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
  fn consecutive_duplicates_are_dropped() {
    let out = Arc::new(Mutex::new(Vec::new()));
    let c_out = out.clone();

    signal::from_iter([1, 1, 2, 2, 2, 1, 3])
      .distinct_until_changed()
      .subscribe(move |v| c_out.lock().unwrap().push(v));

    assert_eq!(*out.lock().unwrap(), vec![1, 2, 1, 3]);
  }

  #[test]
  fn custom_comparer_decides_equality() {
    let out = Arc::new(Mutex::new(Vec::new()));
    let c_out = out.clone();

    signal::from_iter(["a", "A", "b", "B"])
      .distinct_until_changed_by(|a, b| a.eq_ignore_ascii_case(b))
      .subscribe(move |v| c_out.lock().unwrap().push(v));

    assert_eq!(*out.lock().unwrap(), vec!["a", "b"]);
  }
}
