//! Delay operator: shift every event by a fixed duration.

use std::time::Duration;

use crate::{
  context::ExecutionContext,
  event::Event,
  observer::Observer,
  rc::MutArc,
  signal::Signal,
  subscriber::Subscriber,
};

/// Re-emits every upstream event `duration` later on `ctx`. Relative order
/// is preserved on serial contexts, which schedule equal deadlines FIFO.
/// Disposal silences anything still in flight.
#[derive(Clone)]
pub struct DelayOp<S, C> {
  pub(crate) source: S,
  pub(crate) duration: Duration,
  pub(crate) ctx: C,
}

impl<S, C> Signal for DelayOp<S, C>
where
  S: Signal,
  C: ExecutionContext,
{
  type Item = S::Item;
  type Err = S::Err;

  fn actual_observe<O>(self, subscriber: Subscriber<O>)
  where
    O: Observer<S::Item, S::Err> + Send + 'static,
  {
    let DelayOp { source, duration, ctx } = self;
    let Subscriber { observer, cancel } = subscriber;
    let state = MutArc::from(Some(observer));
    {
      let state = state.clone();
      cancel.on_dispose(move || {
        state.rc_deref_mut().take();
      });
    }
    source.actual_observe(Subscriber {
      observer: DelayObserver { state, duration, ctx },
      cancel,
    });
  }
}

pub struct DelayObserver<St, C> {
  state: St,
  duration: Duration,
  ctx: C,
}

fn schedule_event<O, Item, Err, C>(
  state: MutArc<Option<O>>,
  ctx: &C,
  duration: Duration,
  event: Event<Item, Err>,
) where
  O: Observer<Item, Err> + Send + 'static,
  Item: Send + 'static,
  Err: Send + 'static,
  C: ExecutionContext,
{
  ctx.schedule_after(
    duration,
    Box::new(move || match event {
      Event::Next(v) => {
        if let Some(observer) = state.rc_deref_mut().as_mut() {
          observer.next(v);
        }
      }
      Event::Completed => {
        if let Some(observer) = state.rc_deref_mut().take() {
          observer.complete();
        }
      }
      Event::Failed(e) => {
        if let Some(observer) = state.rc_deref_mut().take() {
          observer.error(e);
        }
      }
    }),
  );
}

impl<Item, Err, O, C> Observer<Item, Err> for DelayObserver<MutArc<Option<O>>, C>
where
  O: Observer<Item, Err> + Send + 'static,
  Item: Send + 'static,
  Err: Send + 'static,
  C: ExecutionContext,
{
  fn next(&mut self, value: Item) {
    schedule_event(self.state.clone(), &self.ctx, self.duration, Event::Next(value));
  }

  fn error(self, err: Err) {
    schedule_event(self.state, &self.ctx, self.duration, Event::Failed(err));
  }

  fn complete(self) {
    schedule_event(self.state, &self.ctx, self.duration, Event::Completed);
  }

  fn is_closed(&self) -> bool { self.state.rc_deref().is_none() }
}
