//! The observer-plus-cancellation pair born at observation.

use crate::{cancellation::Cancellation, observer::Observer};

/// Couples the downstream observer with the subscription's cancellation.
///
/// Operators destructure the incoming subscriber, wrap its observer and pass
/// a new `Subscriber` upstream sharing the same cancellation; producers drive
/// the subscriber they finally receive. Delivery is gated on disposal: after
/// `dispose()` returns no event passes this point.
pub struct Subscriber<O> {
  pub observer: O,
  pub cancel: Cancellation,
}

impl<O> Subscriber<O> {
  pub fn new(observer: O, cancel: Cancellation) -> Self { Subscriber { observer, cancel } }

  pub fn is_disposed(&self) -> bool { self.cancel.is_disposed() }
}

impl<Item, Err, O> Observer<Item, Err> for Subscriber<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    if !self.cancel.is_disposed() {
      self.observer.next(value);
    }
  }

  fn error(self, err: Err) {
    if !self.cancel.is_disposed() {
      self.observer.error(err);
    }
  }

  fn complete(self) {
    if !self.cancel.is_disposed() {
      self.observer.complete();
    }
  }

  fn is_closed(&self) -> bool { self.cancel.is_disposed() || self.observer.is_closed() }
}

/// Outermost wrapper installed by `observe`: forwards events and releases
/// the subscription once a terminal has been delivered.
pub struct TerminalGuard<O> {
  pub(crate) observer: O,
  pub(crate) cancel: Cancellation,
}

impl<Item, Err, O> Observer<Item, Err> for TerminalGuard<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) { self.observer.next(value); }

  fn error(self, err: Err) {
    self.observer.error(err);
    self.cancel.dispose();
  }

  fn complete(self) {
    self.observer.complete();
    self.cancel.dispose();
  }

  fn is_closed(&self) -> bool { self.cancel.is_disposed() || self.observer.is_closed() }
}
