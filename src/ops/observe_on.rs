//! ObserveOn operator: shift event delivery onto an execution context.

use std::collections::VecDeque;

use crate::{
  cancellation::Cancellation,
  context::ExecutionContext,
  event::Event,
  observer::Observer,
  rc::MutArc,
  signal::Signal,
  subscriber::Subscriber,
};

/// Delivers every downstream event on `ctx`. Events are fed through a
/// per-subscription queue drained by one scheduled task at a time, so
/// intra-subscription order survives even on a concurrent pool.
#[derive(Clone)]
pub struct ObserveOnOp<S, C> {
  pub(crate) source: S,
  pub(crate) ctx: C,
}

pub(crate) struct ObserveOnState<O, Item, Err> {
  observer: Option<O>,
  queue: VecDeque<Event<Item, Err>>,
  draining: bool,
}

impl<S, C> Signal for ObserveOnOp<S, C>
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
    let ObserveOnOp { source, ctx } = self;
    let Subscriber { observer, cancel } = subscriber;
    let state = MutArc::from(ObserveOnState {
      observer: Some(observer),
      queue: VecDeque::new(),
      draining: false,
    });
    {
      let state = state.clone();
      cancel.on_dispose(move || {
        let mut state = state.rc_deref_mut();
        state.observer = None;
        state.queue.clear();
      });
    }
    source.actual_observe(Subscriber {
      observer: ObserveOnObserver { state, ctx, chain: cancel.clone() },
      cancel,
    });
  }
}

pub struct ObserveOnObserver<St, C> {
  state: St,
  ctx: C,
  chain: Cancellation,
}

impl<St: Clone, C: Clone> ObserveOnObserver<St, C> {
  fn fork(&self) -> (St, C) { (self.state.clone(), self.ctx.clone()) }
}

fn push_and_drain<O, Item, Err, C>(
  state: MutArc<ObserveOnState<O, Item, Err>>,
  ctx: C,
  event: Event<Item, Err>,
) where
  O: Observer<Item, Err> + Send + 'static,
  Item: Send + 'static,
  Err: Send + 'static,
  C: ExecutionContext,
{
  {
    let mut guard = state.rc_deref_mut();
    if guard.observer.is_none() {
      return;
    }
    guard.queue.push_back(event);
    if guard.draining {
      return;
    }
    guard.draining = true;
  }
  let task_state = state;
  ctx.schedule(Box::new(move || loop {
    let mut guard = task_state.rc_deref_mut();
    match guard.queue.pop_front() {
      None => {
        guard.draining = false;
        return;
      }
      Some(Event::Next(v)) => {
        if let Some(observer) = guard.observer.as_mut() {
          observer.next(v);
        }
      }
      Some(Event::Completed) => {
        if let Some(observer) = guard.observer.take() {
          drop(guard);
          observer.complete();
          continue;
        }
      }
      Some(Event::Failed(e)) => {
        if let Some(observer) = guard.observer.take() {
          drop(guard);
          observer.error(e);
          continue;
        }
      }
    }
  }));
}

impl<Item, Err, O, C> Observer<Item, Err> for ObserveOnObserver<MutArc<ObserveOnState<O, Item, Err>>, C>
where
  O: Observer<Item, Err> + Send + 'static,
  Item: Send + 'static,
  Err: Send + 'static,
  C: ExecutionContext,
{
  fn next(&mut self, value: Item) {
    let (state, ctx) = self.fork();
    push_and_drain(state, ctx, Event::Next(value));
  }

  fn error(self, err: Err) {
    push_and_drain(self.state, self.ctx, Event::Failed(err));
  }

  fn complete(self) {
    push_and_drain(self.state, self.ctx, Event::Completed);
  }

  fn is_closed(&self) -> bool {
    self.chain.is_disposed() || self.state.rc_deref().observer.is_none()
  }
}

#[cfg(test)]
mod test {
  use crate::context::{ThreadContext, VirtualContext};
  use crate::prelude::*;
  use std::sync::{mpsc, Arc, Mutex};
  use std::time::Duration;

  #[test]
  fn delivery_waits_for_the_context() {
    let ctx = VirtualContext::new();
    let out = Arc::new(Mutex::new(Vec::new()));
    let c_out = out.clone();

    signal::from_iter([1, 2, 3])
      .observe_on(ctx.clone())
      .subscribe(move |v| c_out.lock().unwrap().push(v));

    assert!(out.lock().unwrap().is_empty());
    ctx.run_tasks();
    assert_eq!(*out.lock().unwrap(), vec![1, 2, 3]);
  }

  #[test]
  fn order_is_preserved_across_the_hop() {
    let ctx = ThreadContext::new();
    let out = Arc::new(Mutex::new(Vec::new()));
    let (done_tx, done_rx) = mpsc::channel();
    let c_out = out.clone();

    signal::from_iter(0..100)
      .observe_on(ctx)
      .on_complete(move || done_tx.send(()).unwrap())
      .subscribe(move |v| c_out.lock().unwrap().push(v));

    done_rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(*out.lock().unwrap(), (0..100).collect::<Vec<_>>());
  }

  #[test]
  fn disposal_drops_queued_events() {
    let ctx = VirtualContext::new();
    let out = Arc::new(Mutex::new(Vec::new()));
    let c_out = out.clone();

    let subscription = signal::from_iter([1, 2, 3])
      .observe_on(ctx.clone())
      .subscribe(move |v| c_out.lock().unwrap().push(v));

    subscription.dispose();
    ctx.run_tasks();
    assert!(out.lock().unwrap().is_empty());
  }
}
