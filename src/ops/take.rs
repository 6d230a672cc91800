//! Take operator: the first `count` values, then completion.

use crate::{
  observer::Observer,
  signal::Signal,
  subscriber::Subscriber,
};

/// Emits only the first `count` values, then completes. Completing early
/// releases the subscription, which cancels the upstream producer.
/// `count == 0` completes without subscribing upstream at all.
#[derive(Clone)]
pub struct TakeOp<S> {
  pub(crate) source: S,
  pub(crate) count: usize,
}

impl<S> Signal for TakeOp<S>
where
  S: Signal,
{
  type Item = S::Item;
  type Err = S::Err;

  fn actual_observe<O>(self, subscriber: Subscriber<O>)
  where
    O: Observer<S::Item, S::Err> + Send + 'static,
  {
    let TakeOp { source, count } = self;
    if count == 0 {
      subscriber.complete();
      return;
    }
    let Subscriber { observer, cancel } = subscriber;
    source.actual_observe(Subscriber {
      observer: TakeObserver { observer: Some(observer), remaining: count },
      cancel,
    });
  }
}

pub struct TakeObserver<O> {
  observer: Option<O>,
  remaining: usize,
}

impl<Item, Err, O> Observer<Item, Err> for TakeObserver<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    if self.remaining == 0 {
      return;
    }
    if let Some(observer) = self.observer.as_mut() {
      observer.next(value);
      self.remaining -= 1;
    }
    if self.remaining == 0 {
      if let Some(observer) = self.observer.take() {
        observer.complete();
      }
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
  fn emits_the_requested_count() {
    let out = Arc::new(Mutex::new(Vec::new()));
    let completed = Arc::new(Mutex::new(false));
    let c_out = out.clone();
    let c_completed = completed.clone();

    signal::from_iter([1, 2, 3, 4, 5])
      .take(3)
      .on_complete(move || *c_completed.lock().unwrap() = true)
      .subscribe(move |v| c_out.lock().unwrap().push(v));

    assert_eq!(*out.lock().unwrap(), vec![1, 2, 3]);
    assert!(*completed.lock().unwrap());
  }

  #[test]
  fn zero_completes_without_subscribing() {
    let runs = Arc::new(Mutex::new(0));
    let completed = Arc::new(Mutex::new(false));
    let c_runs = runs.clone();
    let c_completed = completed.clone();

    signal::create(move |_subscriber: Subscriber<BoxedObserver<i32, Never>>| {
      *c_runs.lock().unwrap() += 1;
    })
    .take(0)
    .on_complete(move || *c_completed.lock().unwrap() = true)
    .subscribe(|_| {});

    assert_eq!(*runs.lock().unwrap(), 0);
    assert!(*completed.lock().unwrap());
  }

  #[test]
  fn shorter_upstream_completes_naturally() {
    let out = Arc::new(Mutex::new(Vec::new()));
    let c_out = out.clone();

    signal::from_iter([1, 2])
      .take(10)
      .subscribe(move |v| c_out.lock().unwrap().push(v));

    assert_eq!(*out.lock().unwrap(), vec![1, 2]);
  }

  #[test]
  fn chained_takes_use_the_smaller_bound() {
    let out = Arc::new(Mutex::new(Vec::new()));
    let c_out = out.clone();

    signal::from_iter(1..100)
      .take(3)
      .take(2)
      .subscribe(move |v| c_out.lock().unwrap().push(v));

    assert_eq!(*out.lock().unwrap(), vec![1, 2]);
  }

  #[test]
  fn first_is_take_one() {
    let out = Arc::new(Mutex::new(Vec::new()));
    let c_out = out.clone();

    signal::from_iter([7, 8, 9])
      .first()
      .subscribe(move |v| c_out.lock().unwrap().push(v));

    assert_eq!(*out.lock().unwrap(), vec![7]);
  }

  #[test]
  fn reaching_the_bound_cancels_upstream() {
    let subject = PassthroughSubject::<i32, Never>::new();
    let out = Arc::new(Mutex::new(Vec::new()));
    let c_out = out.clone();

    subject
      .clone()
      .take(1)
      .subscribe(move |v| c_out.lock().unwrap().push(v));
    assert_eq!(subject.observer_count(), 1);

    subject.clone().next(1);
    subject.clone().next(2);

    assert_eq!(*out.lock().unwrap(), vec![1]);
    assert_eq!(subject.observer_count(), 0);
  }
}
