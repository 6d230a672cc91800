//! FlatMap operator: map each value to a signal and merge them all.

use crate::{
  cancellation::Cancellation,
  observer::Observer,
  rc::MutArc,
  signal::Signal,
  subscriber::Subscriber,
};

/// For each upstream value, subscribes `func`'s inner signal and merges all
/// inner emissions downstream. Completes once the upstream and every inner
/// signal have completed; the first failure anywhere terminates everything.
#[derive(Clone)]
pub struct FlatMapOp<S, F> {
  pub(crate) source: S,
  pub(crate) func: F,
}

pub(crate) struct FlatMapState<O> {
  observer: Option<O>,
  active: usize,
  outer_done: bool,
}

impl<S, S2, F> Signal for FlatMapOp<S, F>
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
    let FlatMapOp { source, func } = self;
    let Subscriber { observer, cancel } = subscriber;
    let state = MutArc::from(FlatMapState { observer: Some(observer), active: 0, outer_done: false });
    source.actual_observe(Subscriber {
      observer: FlatMapOuterObserver { state, func, chain: cancel.clone() },
      cancel,
    });
  }
}

pub struct FlatMapOuterObserver<St, F> {
  state: St,
  func: F,
  chain: Cancellation,
}

impl<Item, Err, O, F, S2> Observer<Item, Err> for FlatMapOuterObserver<MutArc<FlatMapState<O>>, F>
where
  F: FnMut(Item) -> S2,
  S2: Signal<Err = Err> + Send + 'static,
  O: Observer<S2::Item, Err> + Send + 'static,
  Err: Send + 'static,
{
  fn next(&mut self, value: Item) {
    let inner = (self.func)(value);
    {
      let mut state = self.state.rc_deref_mut();
      if state.observer.is_none() {
        return;
      }
      state.active += 1;
    }
    inner.actual_observe(Subscriber {
      observer: FlatMapInnerObserver { state: self.state.clone(), chain: self.chain.clone() },
      cancel: self.chain.clone(),
    });
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
      if state.active == 0 { state.observer.take() } else { None }
    };
    if let Some(observer) = taken {
      observer.complete();
    }
  }

  fn is_closed(&self) -> bool { self.state.rc_deref().observer.is_none() }
}

pub struct FlatMapInnerObserver<St> {
  state: St,
  chain: Cancellation,
}

impl<Item, Err, O> Observer<Item, Err> for FlatMapInnerObserver<MutArc<FlatMapState<O>>>
where
  O: Observer<Item, Err>,
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
    let taken = {
      let mut state = self.state.rc_deref_mut();
      state.active -= 1;
      if state.outer_done && state.active == 0 { state.observer.take() } else { None }
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
  fn inner_signals_are_merged() {
    let out = Arc::new(Mutex::new(Vec::new()));
    let c_out = out.clone();

    signal::from_iter([1, 2, 3])
      .flat_map(|v| signal::from_iter([v * 10, v * 10 + 1]))
      .subscribe(move |v| c_out.lock().unwrap().push(v));

    assert_eq!(*out.lock().unwrap(), vec![10, 11, 20, 21, 30, 31]);
  }

  #[test]
  fn completes_after_outer_and_all_inners() {
    let outer = PassthroughSubject::<i32, Never>::new();
    let inner = PassthroughSubject::<i32, Never>::new();
    let completed = Arc::new(Mutex::new(false));
    let c_completed = completed.clone();
    let c_inner = inner.clone();

    outer
      .clone()
      .flat_map(move |_| c_inner.clone())
      .on_complete(move || *c_completed.lock().unwrap() = true)
      .subscribe(|_| {});

    outer.clone().next(1);
    outer.clone().complete();
    assert!(!*completed.lock().unwrap());

    inner.clone().complete();
    assert!(*completed.lock().unwrap());
  }

  #[test]
  fn inner_failure_terminates_the_whole_pipeline() {
    let got = Arc::new(Mutex::new(None));
    let c_got = got.clone();

    signal::create(|mut subscriber: Subscriber<_>| {
      subscriber.next(1);
      subscriber.next(2);
      subscriber.complete();
    })
    .flat_map(|v: i32| {
      signal::create(move |mut subscriber: Subscriber<_>| {
        if v == 2 {
          subscriber.error("boom");
        } else {
          subscriber.next(v);
          subscriber.complete();
        }
      })
    })
    .on_error(move |e: &'static str| *c_got.lock().unwrap() = Some(e))
    .subscribe(|_: i32| {});

    assert_eq!(*got.lock().unwrap(), Some("boom"));
  }
}
