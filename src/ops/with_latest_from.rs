//! WithLatestFrom operator: sample a secondary signal on primary events.

use crate::{
  cancellation::Cancellation,
  observer::Observer,
  rc::MutArc,
  signal::Signal,
  subscriber::Subscriber,
  type_hint::TypeHint,
};

/// Emits `(a, latest_b)` for each primary `a`, but only once the secondary
/// has produced at least one value; primary values before that are dropped.
/// Completes when the primary completes. Either side's failure terminates.
#[derive(Clone)]
pub struct WithLatestFromOp<A, B> {
  pub(crate) source: A,
  pub(crate) other: B,
}

pub(crate) struct WithLatestState<O, ItemB> {
  observer: Option<O>,
  latest: Option<ItemB>,
}

impl<A, B> Signal for WithLatestFromOp<A, B>
where
  A: Signal,
  B: Signal<Err = A::Err>,
  B::Item: Clone,
{
  type Item = (A::Item, B::Item);
  type Err = A::Err;

  fn actual_observe<O>(self, subscriber: Subscriber<O>)
  where
    O: Observer<(A::Item, B::Item), A::Err> + Send + 'static,
  {
    let WithLatestFromOp { source, other } = self;
    let Subscriber { observer, cancel } = subscriber;
    let state = MutArc::from(WithLatestState { observer: Some(observer), latest: None });

    other.actual_observe(Subscriber {
      observer: LatestSideObserver {
        state: state.clone(),
        chain: cancel.clone(),
        _hint: TypeHint::new(),
      },
      cancel: cancel.clone(),
    });
    source.actual_observe(Subscriber {
      observer: PrimaryObserver { state, chain: cancel.clone() },
      cancel,
    });
  }
}

pub struct PrimaryObserver<St> {
  state: St,
  chain: Cancellation,
}

pub struct LatestSideObserver<St, ItemA> {
  state: St,
  chain: Cancellation,
  _hint: TypeHint<ItemA>,
}

impl<ItemA, ItemB, Err, O> Observer<ItemA, Err>
  for PrimaryObserver<MutArc<WithLatestState<O, ItemB>>>
where
  O: Observer<(ItemA, ItemB), Err>,
  ItemB: Clone,
{
  fn next(&mut self, value: ItemA) {
    let mut state = self.state.rc_deref_mut();
    let state = &mut *state;
    if let Some(latest) = state.latest.clone() {
      if let Some(observer) = state.observer.as_mut() {
        observer.next((value, latest));
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

  fn complete(self) {
    let taken = self.state.rc_deref_mut().observer.take();
    if let Some(observer) = taken {
      observer.complete();
    }
    self.chain.dispose();
  }

  fn is_closed(&self) -> bool { self.state.rc_deref().observer.is_none() }
}

impl<ItemA, ItemB, Err, O> Observer<ItemB, Err>
  for LatestSideObserver<MutArc<WithLatestState<O, ItemB>>, ItemA>
where
  O: Observer<(ItemA, ItemB), Err>,
{
  fn next(&mut self, value: ItemB) { self.state.rc_deref_mut().latest = Some(value); }

  fn error(self, err: Err) {
    let taken = self.state.rc_deref_mut().observer.take();
    if let Some(observer) = taken {
      observer.error(err);
    }
    self.chain.dispose();
  }

  // The secondary completing only freezes the latest value.
  fn complete(self) {}

  fn is_closed(&self) -> bool { self.state.rc_deref().observer.is_none() }
}
