//! Finalize operator: one callback when the subscription ends, however it
//! ends.

use crate::{
  observer::Observer,
  signal::Signal,
  subscriber::Subscriber,
};

/// Runs `func` exactly once, whether the upstream terminates or the
/// subscription is disposed first.
#[derive(Clone)]
pub struct FinalizeOp<S, F> {
  pub(crate) source: S,
  pub(crate) func: F,
}

impl<S, F> Signal for FinalizeOp<S, F>
where
  S: Signal,
  F: FnOnce() + Send + 'static,
{
  type Item = S::Item;
  type Err = S::Err;

  fn actual_observe<O>(self, subscriber: Subscriber<O>)
  where
    O: Observer<S::Item, S::Err> + Send + 'static,
  {
    let FinalizeOp { source, func } = self;
    // Terminal delivery releases the subscription, so hooking the teardown
    // covers both endings and keeps the once-only guarantee in one place.
    subscriber.cancel.on_dispose(func);
    source.actual_observe(subscriber);
  }
}
