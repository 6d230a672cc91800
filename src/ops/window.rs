//! Window operator: nested signals of up-to-`size` upstream values.

use crate::{
  is_closed_proxy_impl,
  observer::Observer,
  signal::Signal,
  subject::ReplaySubject,
  subscriber::Subscriber,
};

/// Emits one inner signal per `size` upstream values; each window is a
/// replay-`size` subject, so observers attaching to it later still see its
/// full contents. The outer signal completes when the upstream does, and a
/// failure propagates both into the current window and outward.
#[derive(Clone)]
pub struct WindowOp<S> {
  pub(crate) source: S,
  pub(crate) size: usize,
}

impl<S> Signal for WindowOp<S>
where
  S: Signal,
  S::Item: Clone,
  S::Err: Clone,
{
  type Item = ReplaySubject<S::Item, S::Err>;
  type Err = S::Err;

  fn actual_observe<O>(self, subscriber: Subscriber<O>)
  where
    O: Observer<ReplaySubject<S::Item, S::Err>, S::Err> + Send + 'static,
  {
    let WindowOp { source, size } = self;
    let Subscriber { observer, cancel } = subscriber;
    source.actual_observe(Subscriber {
      observer: WindowObserver { observer, current: None, filled: 0, size },
      cancel,
    });
  }
}

pub struct WindowObserver<O, Item, Err> {
  observer: O,
  current: Option<ReplaySubject<Item, Err>>,
  filled: usize,
  size: usize,
}

impl<Item, Err, O> Observer<Item, Err> for WindowObserver<O, Item, Err>
where
  O: Observer<ReplaySubject<Item, Err>, Err>,
  Item: Clone + Send + 'static,
  Err: Clone + Send + 'static,
{
  fn next(&mut self, value: Item) {
    if self.size == 0 {
      return;
    }
    if self.current.is_none() {
      let window = ReplaySubject::new(self.size);
      self.observer.next(window.clone());
      self.current = Some(window);
    }
    if let Some(window) = self.current.as_mut() {
      window.next(value);
    }
    self.filled += 1;
    if self.filled == self.size {
      self.filled = 0;
      if let Some(window) = self.current.take() {
        window.complete();
      }
    }
  }

  fn error(self, err: Err) {
    if let Some(window) = self.current {
      window.error(err.clone());
    }
    self.observer.error(err);
  }

  fn complete(self) {
    if let Some(window) = self.current {
      window.complete();
    }
    self.observer.complete();
  }

  is_closed_proxy_impl!(observer);
}
