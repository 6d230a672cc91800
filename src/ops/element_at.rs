//! ElementAt operator: a single value picked by position.

use crate::{
  observer::Observer,
  signal::Signal,
  subscriber::Subscriber,
};

/// Emits the value at zero-based `index`, then completes (which releases
/// the subscription and cancels upstream). Completes empty if the upstream
/// is shorter than `index + 1`.
#[derive(Clone)]
pub struct ElementAtOp<S> {
  pub(crate) source: S,
  pub(crate) index: usize,
}

impl<S> Signal for ElementAtOp<S>
where
  S: Signal,
{
  type Item = S::Item;
  type Err = S::Err;

  fn actual_observe<O>(self, subscriber: Subscriber<O>)
  where
    O: Observer<S::Item, S::Err> + Send + 'static,
  {
    let ElementAtOp { source, index } = self;
    let Subscriber { observer, cancel } = subscriber;
    source.actual_observe(Subscriber {
      observer: ElementAtObserver { observer: Some(observer), remaining: index },
      cancel,
    });
  }
}

pub struct ElementAtObserver<O> {
  observer: Option<O>,
  remaining: usize,
}

impl<Item, Err, O> Observer<Item, Err> for ElementAtObserver<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    if self.remaining > 0 {
      self.remaining -= 1;
      return;
    }
    if let Some(mut observer) = self.observer.take() {
      observer.next(value);
      observer.complete();
    }
  }

  fn error(self, err: Err) {
    if let Some(observer) = self.observer {
      observer.error(err);
    }
  }

  fn complete(self) {
    if let Some(observer) = self.observer {
      observer.complete();
    }
  }

  fn is_closed(&self) -> bool {
    self.observer.as_ref().map_or(true, |o| o.is_closed())
  }
}

#[cfg(test)]
mod test {
  use crate::prelude::*;
  use std::sync::{Arc, Mutex};

  #[test]
  fn picks_by_position() {
    let out = Arc::new(Mutex::new(Vec::new()));
    let c_out = out.clone();

    signal::from_iter([10, 20, 30, 40])
      .element_at(2)
      .subscribe(move |v| c_out.lock().unwrap().push(v));

    assert_eq!(*out.lock().unwrap(), vec![30]);
  }

  #[test]
  fn out_of_range_completes_empty() {
    let completed = Arc::new(Mutex::new(false));
    let c_completed = completed.clone();

    signal::from_iter([1, 2])
      .element_at(5)
      .on_complete(move || *c_completed.lock().unwrap() = true)
      .subscribe(|_| panic!("index is out of range"));

    assert!(*completed.lock().unwrap());
  }
}
