//! Scan and reduce: running and final left-folds over the upstream.

use crate::{
  complete_proxy_impl, error_proxy_impl, is_closed_proxy_impl,
  observer::Observer,
  signal::Signal,
  subscriber::Subscriber,
};

/// Emits the seed on subscription, then `f(prev, x)` for each upstream `x`,
/// where `prev` is the last emitted value. The seed emission happens before
/// any upstream event can arrive.
#[derive(Clone)]
pub struct ScanOp<S, B, F> {
  pub(crate) source: S,
  pub(crate) seed: B,
  pub(crate) func: F,
}

impl<S, B, F> Signal for ScanOp<S, B, F>
where
  S: Signal,
  B: Clone + Send + 'static,
  F: FnMut(B, S::Item) -> B + Send + 'static,
{
  type Item = B;
  type Err = S::Err;

  fn actual_observe<O>(self, subscriber: Subscriber<O>)
  where
    O: Observer<B, S::Err> + Send + 'static,
  {
    let ScanOp { source, seed, func } = self;
    let Subscriber { mut observer, cancel } = subscriber;
    // The seed goes straight downstream, before the source is started.
    if !cancel.is_disposed() {
      observer.next(seed.clone());
    }
    source.actual_observe(Subscriber { observer: ScanObserver { observer, acc: seed, func }, cancel });
  }
}

pub struct ScanObserver<O, B, F> {
  observer: O,
  acc: B,
  func: F,
}

impl<Item, Err, B, O, F> Observer<Item, Err> for ScanObserver<O, B, F>
where
  O: Observer<B, Err>,
  B: Clone,
  F: FnMut(B, Item) -> B,
{
  fn next(&mut self, value: Item) {
    self.acc = (self.func)(self.acc.clone(), value);
    self.observer.next(self.acc.clone());
  }

  error_proxy_impl!(Err, observer);
  complete_proxy_impl!(observer);
  is_closed_proxy_impl!(observer);
}

/// `scan` that keeps only the final fold, emitted on completion.
#[derive(Clone)]
pub struct ReduceOp<S, B, F> {
  pub(crate) source: S,
  pub(crate) seed: B,
  pub(crate) func: F,
}

impl<S, B, F> Signal for ReduceOp<S, B, F>
where
  S: Signal,
  B: Send + 'static,
  F: FnMut(B, S::Item) -> B + Send + 'static,
{
  type Item = B;
  type Err = S::Err;

  fn actual_observe<O>(self, subscriber: Subscriber<O>)
  where
    O: Observer<B, S::Err> + Send + 'static,
  {
    let ReduceOp { source, seed, func } = self;
    let Subscriber { observer, cancel } = subscriber;
    source.actual_observe(Subscriber {
      observer: ReduceObserver { observer, acc: Some(seed), func },
      cancel,
    });
  }
}

pub struct ReduceObserver<O, B, F> {
  observer: O,
  acc: Option<B>,
  func: F,
}

impl<Item, Err, B, O, F> Observer<Item, Err> for ReduceObserver<O, B, F>
where
  O: Observer<B, Err>,
  F: FnMut(B, Item) -> B,
{
  fn next(&mut self, value: Item) {
    if let Some(acc) = self.acc.take() {
      self.acc = Some((self.func)(acc, value));
    }
  }

  fn error(self, err: Err) { self.observer.error(err); }

  fn complete(mut self) {
    if let Some(acc) = self.acc.take() {
      self.observer.next(acc);
    }
    self.observer.complete();
  }

  is_closed_proxy_impl!(observer);
}
