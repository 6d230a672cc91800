use crate::{
  observer::{BoxedObserver, Observer},
  signal::Signal,
  subscriber::Subscriber,
  type_hint::TypeHint,
};

/// Build a cold signal from a producer closure.
///
/// The closure runs once per observation. It receives a [`Subscriber`] to
/// drive: `next` values into it, then `complete` or `error` it. Delivery is
/// already gated on disposal, so a producer may simply stop polling
/// [`Subscriber::is_disposed`] when convenient.
///
/// ```
/// use rivulet::prelude::*;
/// use std::sync::{Arc, Mutex};
///
/// let out = Arc::new(Mutex::new(Vec::new()));
/// let c_out = out.clone();
/// signal::create(|mut subscriber: Subscriber<BoxedObserver<i32, Never>>| {
///   subscriber.next(1);
///   subscriber.next(2);
///   subscriber.complete();
/// })
/// .subscribe(move |v| c_out.lock().unwrap().push(v));
/// assert_eq!(*out.lock().unwrap(), vec![1, 2]);
/// ```
pub fn create<F, Item, Err>(producer: F) -> SignalFn<F, Item, Err>
where
  F: FnOnce(Subscriber<BoxedObserver<Item, Err>>),
{
  SignalFn { producer, _hint: TypeHint::new() }
}

#[derive(Clone)]
pub struct SignalFn<F, Item, Err> {
  producer: F,
  _hint: TypeHint<(Item, Err)>,
}

impl<F, Item, Err> Signal for SignalFn<F, Item, Err>
where
  F: FnOnce(Subscriber<BoxedObserver<Item, Err>>),
  Item: Send + 'static,
  Err: Send + 'static,
{
  type Item = Item;
  type Err = Err;

  fn actual_observe<O>(self, subscriber: Subscriber<O>)
  where
    O: Observer<Item, Err> + Send + 'static,
  {
    let Subscriber { observer, cancel } = subscriber;
    (self.producer)(Subscriber { observer: BoxedObserver::new(observer), cancel });
  }
}
