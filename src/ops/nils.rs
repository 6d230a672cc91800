//! Operators over optional elements: drop the `None`s or fill them in.

use crate::{
  complete_proxy_impl, error_proxy_impl, is_closed_proxy_impl,
  observer::Observer,
  signal::Signal,
  subscriber::Subscriber,
};

#[derive(Clone)]
pub struct IgnoreNilsOp<S> {
  pub(crate) source: S,
}

impl<S, U> Signal for IgnoreNilsOp<S>
where
  S: Signal<Item = Option<U>>,
  U: Send + 'static,
{
  type Item = U;
  type Err = S::Err;

  fn actual_observe<O>(self, subscriber: Subscriber<O>)
  where
    O: Observer<U, S::Err> + Send + 'static,
  {
    let Subscriber { observer, cancel } = subscriber;
    self
      .source
      .actual_observe(Subscriber { observer: IgnoreNilsObserver { observer }, cancel });
  }
}

pub struct IgnoreNilsObserver<O> {
  observer: O,
}

impl<U, Err, O> Observer<Option<U>, Err> for IgnoreNilsObserver<O>
where
  O: Observer<U, Err>,
{
  fn next(&mut self, value: Option<U>) {
    if let Some(v) = value {
      self.observer.next(v);
    }
  }

  error_proxy_impl!(Err, observer);
  complete_proxy_impl!(observer);
  is_closed_proxy_impl!(observer);
}

#[derive(Clone)]
pub struct ReplaceNilsOp<S, U> {
  pub(crate) source: S,
  pub(crate) default: U,
}

impl<S, U> Signal for ReplaceNilsOp<S, U>
where
  S: Signal<Item = Option<U>>,
  U: Clone + Send + 'static,
{
  type Item = U;
  type Err = S::Err;

  fn actual_observe<O>(self, subscriber: Subscriber<O>)
  where
    O: Observer<U, S::Err> + Send + 'static,
  {
    let ReplaceNilsOp { source, default } = self;
    let Subscriber { observer, cancel } = subscriber;
    source.actual_observe(Subscriber { observer: ReplaceNilsObserver { observer, default }, cancel });
  }
}

pub struct ReplaceNilsObserver<O, U> {
  observer: O,
  default: U,
}

impl<U, Err, O> Observer<Option<U>, Err> for ReplaceNilsObserver<O, U>
where
  O: Observer<U, Err>,
  U: Clone,
{
  fn next(&mut self, value: Option<U>) {
    let v = value.unwrap_or_else(|| self.default.clone());
    self.observer.next(v);
  }

  error_proxy_impl!(Err, observer);
  complete_proxy_impl!(observer);
  is_closed_proxy_impl!(observer);
}
