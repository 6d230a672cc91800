//! SubscribeOn operator: perform the subscription itself on a context.

use crate::{
  cancellation::Cancellation,
  context::ExecutionContext,
  observer::Observer,
  signal::Signal,
  subscriber::Subscriber,
};

/// Schedules the upstream subscription onto `ctx`; the teardown is also
/// scheduled there. Disposal still silences delivery synchronously: events
/// produced between `dispose()` and the scheduled teardown are dropped at
/// this operator's gate.
#[derive(Clone)]
pub struct SubscribeOnOp<S, C> {
  pub(crate) source: S,
  pub(crate) ctx: C,
}

impl<S, C> Signal for SubscribeOnOp<S, C>
where
  S: Signal + Send + 'static,
  C: ExecutionContext,
{
  type Item = S::Item;
  type Err = S::Err;

  fn actual_observe<O>(self, subscriber: Subscriber<O>)
  where
    O: Observer<S::Item, S::Err> + Send + 'static,
  {
    let SubscribeOnOp { source, ctx } = self;
    let Subscriber { observer, cancel } = subscriber;

    let upstream = Cancellation::default();
    {
      let ctx = ctx.clone();
      let upstream = upstream.clone();
      cancel.on_dispose(move || {
        ctx.schedule(Box::new(move || upstream.dispose()));
      });
    }

    let gate = GateObserver { observer, outer: cancel };
    ctx.schedule(Box::new(move || {
      source.actual_observe(Subscriber { observer: gate, cancel: upstream });
    }));
  }
}

pub struct GateObserver<O> {
  observer: O,
  outer: Cancellation,
}

impl<Item, Err, O> Observer<Item, Err> for GateObserver<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    if !self.outer.is_disposed() {
      self.observer.next(value);
    }
  }

  fn error(self, err: Err) {
    if !self.outer.is_disposed() {
      self.observer.error(err);
    }
  }

  fn complete(self) {
    if !self.outer.is_disposed() {
      self.observer.complete();
    }
  }

  fn is_closed(&self) -> bool { self.outer.is_disposed() || self.observer.is_closed() }
}
