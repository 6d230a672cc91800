//! SuppressError operator: converts failure into completion.

use std::fmt::Debug;

use crate::{
  event::Never,
  is_closed_proxy_impl,
  observer::Observer,
  signal::Signal,
  subscriber::Subscriber,
};

#[derive(Clone)]
pub struct SuppressErrorOp<S> {
  pub(crate) source: S,
  pub(crate) log: bool,
}

impl<S> Signal for SuppressErrorOp<S>
where
  S: Signal,
  S::Err: Debug,
{
  type Item = S::Item;
  type Err = Never;

  fn actual_observe<O>(self, subscriber: Subscriber<O>)
  where
    O: Observer<S::Item, Never> + Send + 'static,
  {
    let SuppressErrorOp { source, log } = self;
    let Subscriber { observer, cancel } = subscriber;
    source.actual_observe(Subscriber { observer: SuppressErrorObserver { observer, log }, cancel });
  }
}

pub struct SuppressErrorObserver<O> {
  observer: O,
  log: bool,
}

impl<Item, Err, O> Observer<Item, Err> for SuppressErrorObserver<O>
where
  O: Observer<Item, Never>,
  Err: Debug,
{
  fn next(&mut self, value: Item) { self.observer.next(value); }

  fn error(self, err: Err) {
    if self.log {
      tracing::warn!(error = ?err, "suppressing signal failure");
    }
    self.observer.complete();
  }

  fn complete(self) { self.observer.complete(); }

  is_closed_proxy_impl!(observer);
}
