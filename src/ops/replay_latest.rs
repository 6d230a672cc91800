//! ReplayLatest operator: re-emit the latest value on demand.

use crate::{
  cancellation::Cancellation,
  observer::Observer,
  rc::MutArc,
  signal::Signal,
  subscriber::Subscriber,
};

/// Emits the most recent upstream value each time `trigger` produces an
/// event, provided upstream has produced at least one. Completes when the
/// upstream completes; fails on the first failure from either side.
#[derive(Clone)]
pub struct ReplayLatestOp<S, T> {
  pub(crate) source: S,
  pub(crate) trigger: T,
}

pub(crate) struct ReplayLatestState<O, Item> {
  observer: Option<O>,
  latest: Option<Item>,
}

impl<S, T> Signal for ReplayLatestOp<S, T>
where
  S: Signal,
  S::Item: Clone,
  T: Signal<Err = S::Err>,
{
  type Item = S::Item;
  type Err = S::Err;

  fn actual_observe<O>(self, subscriber: Subscriber<O>)
  where
    O: Observer<S::Item, S::Err> + Send + 'static,
  {
    let ReplayLatestOp { source, trigger } = self;
    let Subscriber { observer, cancel } = subscriber;
    let state = MutArc::from(ReplayLatestState { observer: Some(observer), latest: None });

    trigger.actual_observe(Subscriber {
      observer: ReplayTriggerObserver { state: state.clone(), chain: cancel.clone() },
      cancel: cancel.clone(),
    });
    source.actual_observe(Subscriber {
      observer: ReplayLatestObserver { state, chain: cancel.clone() },
      cancel,
    });
  }
}

pub struct ReplayLatestObserver<St> {
  state: St,
  chain: Cancellation,
}

impl<Item, Err, O> Observer<Item, Err> for ReplayLatestObserver<MutArc<ReplayLatestState<O, Item>>>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) { self.state.rc_deref_mut().latest = Some(value); }

  fn error(self, err: Err) {
    let taken = self.state.rc_deref_mut().observer.take();
    if let Some(observer) = taken {
      observer.error(err);
    }
    self.chain.dispose();
  }

  fn complete(self) {
    let taken = self.state.rc_deref_mut().observer.take();
    if let Some(observer) = taken {
      observer.complete();
    }
    self.chain.dispose();
  }

  fn is_closed(&self) -> bool { self.state.rc_deref().observer.is_none() }
}

pub struct ReplayTriggerObserver<St> {
  state: St,
  chain: Cancellation,
}

impl<Item, TItem, Err, O> Observer<TItem, Err>
  for ReplayTriggerObserver<MutArc<ReplayLatestState<O, Item>>>
where
  O: Observer<Item, Err>,
  Item: Clone,
{
  fn next(&mut self, _value: TItem) {
    let mut state = self.state.rc_deref_mut();
    let state = &mut *state;
    if let Some(latest) = state.latest.clone() {
      if let Some(observer) = state.observer.as_mut() {
        observer.next(latest);
      }
    }
  }

  fn error(self, err: Err) {
    let taken = self.state.rc_deref_mut().observer.take();
    if let Some(observer) = taken {
      observer.error(err);
    }
    self.chain.dispose();
  }

  // A finished trigger simply stops requesting replays.
  fn complete(self) {}

  fn is_closed(&self) -> bool { self.state.rc_deref().observer.is_none() }
}
