//! Concat operator: a second signal appended after the first completes.

use crate::{
  cancellation::Cancellation,
  observer::Observer,
  signal::Signal,
  subscriber::Subscriber,
};

/// Pipes `first` until it completes, then subscribes `second` and pipes it.
/// A failure on either side terminates immediately.
#[derive(Clone)]
pub struct ConcatOp<A, B> {
  pub(crate) first: A,
  pub(crate) second: B,
}

impl<A, B> Signal for ConcatOp<A, B>
where
  A: Signal,
  B: Signal<Item = A::Item, Err = A::Err> + Send + 'static,
{
  type Item = A::Item;
  type Err = A::Err;

  fn actual_observe<O>(self, subscriber: Subscriber<O>)
  where
    O: Observer<A::Item, A::Err> + Send + 'static,
  {
    let ConcatOp { first, second } = self;
    let Subscriber { observer, cancel } = subscriber;
    first.actual_observe(Subscriber {
      observer: ConcatObserver { observer, second, cancel: cancel.clone() },
      cancel,
    });
  }
}

pub struct ConcatObserver<O, B> {
  observer: O,
  second: B,
  cancel: Cancellation,
}

impl<Item, Err, O, B> Observer<Item, Err> for ConcatObserver<O, B>
where
  O: Observer<Item, Err> + Send + 'static,
  B: Signal<Item = Item, Err = Err>,
  Item: Send + 'static,
  Err: Send + 'static,
{
  fn next(&mut self, value: Item) { self.observer.next(value); }

  fn error(self, err: Err) { self.observer.error(err); }

  fn complete(self) {
    let ConcatObserver { observer, second, cancel } = self;
    second.actual_observe(Subscriber { observer, cancel });
  }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

#[cfg(test)]
mod test {
  use crate::prelude::*;
  use std::sync::{Arc, Mutex};

  #[test]
  fn second_signal_follows_the_first() {
    let out = Arc::new(Mutex::new(Vec::new()));
    let completed = Arc::new(Mutex::new(false));
    let c_out = out.clone();
    let c_completed = completed.clone();

    signal::from_iter([1, 2])
      .concat(signal::from_iter([3, 4]))
      .on_complete(move || *c_completed.lock().unwrap() = true)
      .subscribe(move |v| c_out.lock().unwrap().push(v));

    assert_eq!(*out.lock().unwrap(), vec![1, 2, 3, 4]);
    assert!(*completed.lock().unwrap());
  }

  #[test]
  fn failure_on_the_first_side_skips_the_second() {
    let out = Arc::new(Mutex::new(Vec::new()));
    let got = Arc::new(Mutex::new(None));
    let c_out = out.clone();
    let c_got = got.clone();

    signal::create(|mut subscriber: Subscriber<_>| {
      subscriber.next(1);
      subscriber.error("boom");
    })
    .concat(signal::create(|mut subscriber: Subscriber<_>| {
      subscriber.next(2);
      subscriber.complete();
    }))
    .on_error(move |e: &'static str| *c_got.lock().unwrap() = Some(e))
    .subscribe(move |v: i32| c_out.lock().unwrap().push(v));

    assert_eq!(*out.lock().unwrap(), vec![1]);
    assert_eq!(*got.lock().unwrap(), Some("boom"));
  }
}
