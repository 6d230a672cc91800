//! StartWith operator: one value injected ahead of the upstream.

use crate::{
  observer::Observer,
  signal::Signal,
  subscriber::Subscriber,
};

#[derive(Clone)]
pub struct StartWithOp<S, Item> {
  pub(crate) source: S,
  pub(crate) value: Item,
}

impl<S, Item> Signal for StartWithOp<S, Item>
where
  S: Signal<Item = Item>,
  Item: Send + 'static,
{
  type Item = Item;
  type Err = S::Err;

  fn actual_observe<O>(self, mut subscriber: Subscriber<O>)
  where
    O: Observer<Item, S::Err> + Send + 'static,
  {
    let StartWithOp { source, value } = self;
    subscriber.next(value);
    source.actual_observe(subscriber);
  }
}

#[cfg(test)]
mod test {
  use crate::prelude::*;
  use std::sync::{Arc, Mutex};

  #[test]
  fn injected_value_arrives_first() {
    let out = Arc::new(Mutex::new(Vec::new()));
    let c_out = out.clone();

    signal::from_iter([2, 3])
      .start_with(1)
      .subscribe(move |v| c_out.lock().unwrap().push(v));

    assert_eq!(*out.lock().unwrap(), vec![1, 2, 3]);
  }

  #[test]
  fn works_on_subjects_too() {
    let subject = PassthroughSubject::<i32, Never>::new();
    let out = Arc::new(Mutex::new(Vec::new()));
    let c_out = out.clone();

    subject
      .clone()
      .start_with(0)
      .subscribe(move |v| c_out.lock().unwrap().push(v));
    subject.clone().next(5);

    assert_eq!(*out.lock().unwrap(), vec![0, 5]);
  }
}
