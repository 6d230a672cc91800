//! CombineLatest operator: the freshest value from each of two sources.
//!
//! Emits whenever either side produces, once both have produced at least
//! one value. Completes when both sides complete; fails on the first
//! failure from either, cancelling the other side.

use crate::{
  cancellation::Cancellation,
  observer::Observer,
  rc::MutArc,
  signal::Signal,
  subscriber::Subscriber,
};

#[derive(Clone)]
pub struct CombineLatestOp<A, B, F> {
  pub(crate) source_a: A,
  pub(crate) source_b: B,
  pub(crate) binary_op: F,
}

pub(crate) struct CombineLatestState<O, ItemA, ItemB, F> {
  observer: Option<O>,
  last_a: Option<ItemA>,
  last_b: Option<ItemB>,
  done_a: bool,
  done_b: bool,
  binary_op: F,
}

impl<A, B, F, Out> Signal for CombineLatestOp<A, B, F>
where
  A: Signal,
  B: Signal<Err = A::Err>,
  A::Item: Clone,
  B::Item: Clone,
  F: FnMut(A::Item, B::Item) -> Out + Send + 'static,
  Out: Send + 'static,
{
  type Item = Out;
  type Err = A::Err;

  fn actual_observe<O>(self, subscriber: Subscriber<O>)
  where
    O: Observer<Out, A::Err> + Send + 'static,
  {
    let CombineLatestOp { source_a, source_b, binary_op } = self;
    let Subscriber { observer, cancel } = subscriber;
    let state = MutArc::from(CombineLatestState {
      observer: Some(observer),
      last_a: None,
      last_b: None,
      done_a: false,
      done_b: false,
      binary_op,
    });

    source_b.actual_observe(Subscriber {
      observer: CombineLatestBObserver { state: state.clone(), chain: cancel.clone() },
      cancel: cancel.clone(),
    });
    source_a.actual_observe(Subscriber {
      observer: CombineLatestAObserver { state, chain: cancel.clone() },
      cancel,
    });
  }
}

pub struct CombineLatestAObserver<St> {
  state: St,
  chain: Cancellation,
}

pub struct CombineLatestBObserver<St> {
  state: St,
  chain: Cancellation,
}

impl<ItemA, ItemB, Err, O, F, Out> Observer<ItemA, Err>
  for CombineLatestAObserver<MutArc<CombineLatestState<O, ItemA, ItemB, F>>>
where
  O: Observer<Out, Err>,
  F: FnMut(ItemA, ItemB) -> Out,
  ItemA: Clone,
  ItemB: Clone,
{
  fn next(&mut self, value: ItemA) {
    let mut state = self.state.rc_deref_mut();
    let state = &mut *state;
    state.last_a = Some(value.clone());
    if let Some(b) = state.last_b.clone() {
      if let Some(observer) = state.observer.as_mut() {
        let out = (state.binary_op)(value, b);
        observer.next(out);
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
    let taken = {
      let mut state = self.state.rc_deref_mut();
      state.done_a = true;
      if state.done_b { state.observer.take() } else { None }
    };
    if let Some(observer) = taken {
      observer.complete();
    }
  }

  fn is_closed(&self) -> bool { self.state.rc_deref().observer.is_none() }
}

impl<ItemA, ItemB, Err, O, F, Out> Observer<ItemB, Err>
  for CombineLatestBObserver<MutArc<CombineLatestState<O, ItemA, ItemB, F>>>
where
  O: Observer<Out, Err>,
  F: FnMut(ItemA, ItemB) -> Out,
  ItemA: Clone,
  ItemB: Clone,
{
  fn next(&mut self, value: ItemB) {
    let mut state = self.state.rc_deref_mut();
    let state = &mut *state;
    state.last_b = Some(value.clone());
    if let Some(a) = state.last_a.clone() {
      if let Some(observer) = state.observer.as_mut() {
        let out = (state.binary_op)(a, value);
        observer.next(out);
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
    let taken = {
      let mut state = self.state.rc_deref_mut();
      state.done_b = true;
      if state.done_a { state.observer.take() } else { None }
    };
    if let Some(observer) = taken {
      observer.complete();
    }
  }

  fn is_closed(&self) -> bool { self.state.rc_deref().observer.is_none() }
}

#[cfg(test)]
mod test {
  use crate::prelude::*;
  use std::sync::{Arc, Mutex};

  #[test]
  fn pairs_latest_values() {
    let a = PassthroughSubject::<i32, Never>::new();
    let b = PassthroughSubject::<&'static str, Never>::new();
    let out = Arc::new(Mutex::new(Vec::new()));
    let c_out = out.clone();

    a.clone()
      .combine_latest(b.clone())
      .subscribe(move |pair| c_out.lock().unwrap().push(pair));

    a.clone().next(1);
    assert!(out.lock().unwrap().is_empty());

    b.clone().next("A");
    a.clone().next(2);
    b.clone().next("B");

    assert_eq!(*out.lock().unwrap(), vec![(1, "A"), (2, "A"), (2, "B")]);
  }

  #[test]
  fn completes_when_both_sides_complete() {
    let a = PassthroughSubject::<i32, Never>::new();
    let b = PassthroughSubject::<i32, Never>::new();
    let completed = Arc::new(Mutex::new(false));
    let c_completed = completed.clone();

    a.clone()
      .combine_latest(b.clone())
      .on_complete(move || *c_completed.lock().unwrap() = true)
      .subscribe(|_| {});

    a.clone().next(1);
    a.clone().complete();
    assert!(!*completed.lock().unwrap());

    b.clone().complete();
    assert!(*completed.lock().unwrap());
  }

  #[test]
  fn first_failure_wins_and_cancels_the_other_side() {
    let a = PassthroughSubject::<i32, &'static str>::new();
    let b = PassthroughSubject::<i32, &'static str>::new();
    let errors = Arc::new(Mutex::new(Vec::new()));
    let c_errors = errors.clone();

    a.clone()
      .combine_latest(b.clone())
      .on_error(move |e| c_errors.lock().unwrap().push(e))
      .subscribe(|_| {});

    b.clone().error("boom");
    a.clone().error("late");

    assert_eq!(*errors.lock().unwrap(), vec!["boom"]);
    assert_eq!(a.observer_count(), 0);
  }

  #[test]
  fn projection_variant_applies_the_closure() {
    let out = Arc::new(Mutex::new(0));
    let c_out = out.clone();

    signal::from_iter([1, 2])
      .combine_latest_with(signal::from_iter([10, 20]), |x, y| x + y)
      .subscribe(move |v| *c_out.lock().unwrap() += v);

    // The secondary side is subscribed first and drains fully, so the
    // pairs are (1,20) and (2,20).
    assert_eq!(*out.lock().unwrap(), 43);
  }
}
