//! ConcatMap operator: inner signals drained strictly one at a time.

use std::collections::VecDeque;

use crate::{
  cancellation::Cancellation,
  observer::Observer,
  rc::MutArc,
  signal::Signal,
  subscriber::Subscriber,
};

/// Maps each upstream value to an inner signal and subscribes them in
/// order: the next inner starts only once the current one completes, with
/// pending inners buffered meanwhile.
#[derive(Clone)]
pub struct ConcatMapOp<S, F> {
  pub(crate) source: S,
  pub(crate) func: F,
}

pub(crate) struct ConcatMapState<O, S2> {
  observer: Option<O>,
  pending: VecDeque<S2>,
  inner_active: bool,
  outer_done: bool,
}

impl<S, S2, F> Signal for ConcatMapOp<S, F>
where
  S: Signal,
  S2: Signal<Err = S::Err> + Send + 'static,
  F: FnMut(S::Item) -> S2 + Send + 'static,
{
  type Item = S2::Item;
  type Err = S::Err;

  fn actual_observe<O>(self, subscriber: Subscriber<O>)
  where
    O: Observer<S2::Item, S::Err> + Send + 'static,
  {
    let ConcatMapOp { source, func } = self;
    let Subscriber { observer, cancel } = subscriber;
    let state = MutArc::from(ConcatMapState {
      observer: Some(observer),
      pending: VecDeque::new(),
      inner_active: false,
      outer_done: false,
    });
    source.actual_observe(Subscriber {
      observer: ConcatMapOuterObserver { state, func, chain: cancel.clone() },
      cancel,
    });
  }
}

fn subscribe_inner<O, S2>(
  state: MutArc<ConcatMapState<O, S2>>,
  inner: S2,
  chain: Cancellation,
) where
  S2: Signal + Send + 'static,
  O: Observer<S2::Item, S2::Err> + Send + 'static,
{
  inner.actual_observe(Subscriber {
    observer: ConcatMapInnerObserver { state, chain: chain.clone() },
    cancel: chain,
  });
}

pub struct ConcatMapOuterObserver<St, F> {
  state: St,
  func: F,
  chain: Cancellation,
}

impl<Item, Err, O, F, S2> Observer<Item, Err>
  for ConcatMapOuterObserver<MutArc<ConcatMapState<O, S2>>, F>
where
  F: FnMut(Item) -> S2,
  S2: Signal<Err = Err> + Send + 'static,
  O: Observer<S2::Item, Err> + Send + 'static,
  Err: Send + 'static,
{
  fn next(&mut self, value: Item) {
    let inner = (self.func)(value);
    let start = {
      let mut state = self.state.rc_deref_mut();
      if state.observer.is_none() {
        return;
      }
      if state.inner_active {
        state.pending.push_back(inner);
        None
      } else {
        state.inner_active = true;
        Some(inner)
      }
    };
    if let Some(inner) = start {
      subscribe_inner(self.state.clone(), inner, self.chain.clone());
    }
  }

  fn error(self, err: Err) {
    let taken = self.state.rc_deref_mut().observer.take();
    if let Some(observer) = taken {
      observer.error(err);
    }
    self.chain.dispose();
  }

  fn complete(self) {
    let taken = {
      let mut state = self.state.rc_deref_mut();
      state.outer_done = true;
      if state.inner_active || !state.pending.is_empty() {
        None
      } else {
        state.observer.take()
      }
    };
    if let Some(observer) = taken {
      observer.complete();
    }
  }

  fn is_closed(&self) -> bool { self.state.rc_deref().observer.is_none() }
}

pub struct ConcatMapInnerObserver<St> {
  state: St,
  chain: Cancellation,
}

impl<Item, Err, O, S2> Observer<Item, Err>
  for ConcatMapInnerObserver<MutArc<ConcatMapState<O, S2>>>
where
  O: Observer<Item, Err> + Send + 'static,
  S2: Signal<Item = Item, Err = Err> + Send + 'static,
{
  fn next(&mut self, value: Item) {
    if let Some(observer) = self.state.rc_deref_mut().observer.as_mut() {
      observer.next(value);
    }
  }

  fn error(self, err: Err) {
    let taken = self.state.rc_deref_mut().observer.take();
    if let Some(observer) = taken {
      observer.error(err);
    }
    self.chain.dispose();
  }

  fn complete(self) {
    enum Next<O, S2> {
      Start(S2),
      Finish(O),
      Wait,
    }
    let step = {
      let mut state = self.state.rc_deref_mut();
      match state.pending.pop_front() {
        Some(inner) => Next::Start(inner),
        None => {
          state.inner_active = false;
          if state.outer_done {
            match state.observer.take() {
              Some(observer) => Next::Finish(observer),
              None => Next::Wait,
            }
          } else {
            Next::Wait
          }
        }
      }
    };
    match step {
      Next::Start(inner) => subscribe_inner(self.state, inner, self.chain),
      Next::Finish(observer) => observer.complete(),
      Next::Wait => {}
    }
  }

  fn is_closed(&self) -> bool { self.state.rc_deref().observer.is_none() }
}
