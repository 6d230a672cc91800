//! Timeout operator: fail if the upstream goes quiet for too long.

use std::time::Duration;

use crate::{
  cancellation::Cancellation,
  context::ExecutionContext,
  observer::Observer,
  rc::MutArc,
  signal::Signal,
  subscriber::Subscriber,
};

/// Arms a timer on subscription and re-arms it on every value; if the timer
/// fires before a terminal, the signal fails with the given error. Timers
/// are disarmed by terminals and by disposal.
#[derive(Clone)]
pub struct TimeoutOp<S, E, C> {
  pub(crate) source: S,
  pub(crate) duration: Duration,
  pub(crate) err: E,
  pub(crate) ctx: C,
}

pub(crate) struct TimeoutState<O> {
  observer: Option<O>,
  generation: u64,
  timer: Option<Cancellation>,
}

impl<S, C> Signal for TimeoutOp<S, S::Err, C>
where
  S: Signal,
  S::Err: Clone,
  C: ExecutionContext,
{
  type Item = S::Item;
  type Err = S::Err;

  fn actual_observe<O>(self, subscriber: Subscriber<O>)
  where
    O: Observer<S::Item, S::Err> + Send + 'static,
  {
    let TimeoutOp { source, duration, err, ctx } = self;
    let Subscriber { observer, cancel } = subscriber;
    let state = MutArc::from(TimeoutState { observer: Some(observer), generation: 0, timer: None });
    {
      // Disposal silences the observer before teardown returns, so a timer
      // caught mid-flight can no longer deliver.
      let state = state.clone();
      cancel.on_dispose(move || {
        let timer = {
          let mut state = state.rc_deref_mut();
          state.observer = None;
          state.timer.take()
        };
        if let Some(timer) = timer {
          timer.dispose();
        }
      });
    }
    let timeout_observer =
      TimeoutObserver { state, duration, err, ctx, chain: cancel.clone() };
    timeout_observer.arm::<S::Item>();
    source.actual_observe(Subscriber { observer: timeout_observer, cancel });
  }
}

pub struct TimeoutObserver<St, E, C> {
  state: St,
  duration: Duration,
  err: E,
  ctx: C,
  chain: Cancellation,
}

impl<O, E, C> TimeoutObserver<MutArc<TimeoutState<O>>, E, C>
where
  C: ExecutionContext,
  E: Clone + Send + 'static,
  O: Send + 'static,
{
  fn arm<Item>(&self)
  where
    O: Observer<Item, E>,
  {
    let generation = self.state.rc_deref().generation;
    let state = self.state.clone();
    let chain = self.chain.clone();
    let err = self.err.clone();
    let timer = self.ctx.schedule_after(
      self.duration,
      Box::new(move || {
        let taken = {
          let mut state = state.rc_deref_mut();
          if state.generation != generation {
            return;
          }
          state.observer.take()
        };
        if let Some(observer) = taken {
          observer.error(err);
          chain.dispose();
        }
      }),
    );
    let mut state = self.state.rc_deref_mut();
    if state.generation == generation && state.observer.is_some() {
      state.timer = Some(timer);
    } else {
      drop(state);
      timer.dispose();
    }
  }
}

impl<Item, E, O, C> Observer<Item, E> for TimeoutObserver<MutArc<TimeoutState<O>>, E, C>
where
  O: Observer<Item, E> + Send + 'static,
  E: Clone + Send + 'static,
  C: ExecutionContext,
{
  fn next(&mut self, value: Item) {
    let stale = {
      let mut state = self.state.rc_deref_mut();
      let state = &mut *state;
      if state.observer.is_none() {
        return;
      }
      if let Some(observer) = state.observer.as_mut() {
        observer.next(value);
      }
      state.generation += 1;
      state.timer.take()
    };
    if let Some(stale) = stale {
      stale.dispose();
    }
    self.arm::<Item>();
  }

  fn error(self, err: E) {
    let (taken, timer) = {
      let mut state = self.state.rc_deref_mut();
      state.generation += 1;
      (state.observer.take(), state.timer.take())
    };
    if let Some(timer) = timer {
      timer.dispose();
    }
    if let Some(observer) = taken {
      observer.error(err);
    }
  }

  fn complete(self) {
    let (taken, timer) = {
      let mut state = self.state.rc_deref_mut();
      state.generation += 1;
      (state.observer.take(), state.timer.take())
    };
    if let Some(timer) = timer {
      timer.dispose();
    }
    if let Some(observer) = taken {
      observer.complete();
    }
  }

  fn is_closed(&self) -> bool { self.state.rc_deref().observer.is_none() }
}
