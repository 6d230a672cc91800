use crate::{
  event::Never, observer::Observer, signal::Signal, subscriber::Subscriber, type_hint::TypeHint,
};

/// Completes immediately without emitting.
pub fn empty<Item>() -> Empty<Item> { Empty { _hint: TypeHint::new() } }

/// Emits nothing and never terminates.
pub fn never<Item>() -> NeverSignal<Item> { NeverSignal { _hint: TypeHint::new() } }

/// Fails immediately with `err`.
pub fn throw<Item, Err>(err: Err) -> Throw<Item, Err> { Throw { err, _hint: TypeHint::new() } }

#[derive(Clone)]
pub struct Empty<Item> {
  _hint: TypeHint<Item>,
}

impl<Item> Signal for Empty<Item>
where
  Item: Send + 'static,
{
  type Item = Item;
  type Err = Never;

  fn actual_observe<O>(self, subscriber: Subscriber<O>)
  where
    O: Observer<Item, Never> + Send + 'static,
  {
    subscriber.complete();
  }
}

#[derive(Clone)]
pub struct NeverSignal<Item> {
  _hint: TypeHint<Item>,
}

impl<Item> Signal for NeverSignal<Item>
where
  Item: Send + 'static,
{
  type Item = Item;
  type Err = Never;

  fn actual_observe<O>(self, _subscriber: Subscriber<O>)
  where
    O: Observer<Item, Never> + Send + 'static,
  {
  }
}

#[derive(Clone)]
pub struct Throw<Item, Err> {
  err: Err,
  _hint: TypeHint<Item>,
}

impl<Item, Err> Signal for Throw<Item, Err>
where
  Item: Send + 'static,
  Err: Send + 'static,
{
  type Item = Item;
  type Err = Err;

  fn actual_observe<O>(self, subscriber: Subscriber<O>)
  where
    O: Observer<Item, Err> + Send + 'static,
  {
    subscriber.error(self.err);
  }
}

#[cfg(test)]
mod test {
  use crate::prelude::*;
  use std::sync::{Arc, Mutex};

  #[test]
  fn empty_only_completes() {
    let completed = Arc::new(Mutex::new(false));
    let c_completed = completed.clone();
    signal::empty::<i32>()
      .on_complete(move || *c_completed.lock().unwrap() = true)
      .subscribe(|_| panic!("empty emitted a value"));
    assert!(*completed.lock().unwrap());
  }

  #[test]
  fn never_stays_silent() {
    signal::never::<i32>()
      .on_complete(|| panic!("never completed"))
      .subscribe(|_| panic!("never emitted"));
  }

  #[test]
  fn throw_fails_immediately() {
    let got = Arc::new(Mutex::new(None));
    let c_got = got.clone();
    signal::throw::<i32, _>("boom")
      .on_error(move |e| *c_got.lock().unwrap() = Some(e))
      .subscribe(|_| {});
    assert_eq!(*got.lock().unwrap(), Some("boom"));
  }
}
