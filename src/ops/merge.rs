//! Merge operator: interleaves two signals of the same element type.

use crate::{
  cancellation::Cancellation,
  observer::Observer,
  rc::MutArc,
  signal::Signal,
  subscriber::Subscriber,
};

/// Forwards events from both sides as they arrive. Completes when both
/// sides have completed; the first failure terminates everything.
#[derive(Clone)]
pub struct MergeOp<A, B> {
  pub(crate) source_a: A,
  pub(crate) source_b: B,
}

pub(crate) struct MergeState<O> {
  observer: Option<O>,
  live: usize,
}

impl<A, B> Signal for MergeOp<A, B>
where
  A: Signal,
  B: Signal<Item = A::Item, Err = A::Err>,
{
  type Item = A::Item;
  type Err = A::Err;

  fn actual_observe<O>(self, subscriber: Subscriber<O>)
  where
    O: Observer<A::Item, A::Err> + Send + 'static,
  {
    let MergeOp { source_a, source_b } = self;
    let Subscriber { observer, cancel } = subscriber;
    let state = MutArc::from(MergeState { observer: Some(observer), live: 2 });

    source_a.actual_observe(Subscriber {
      observer: MergeObserver { state: state.clone(), chain: cancel.clone() },
      cancel: cancel.clone(),
    });
    source_b.actual_observe(Subscriber {
      observer: MergeObserver { state, chain: cancel.clone() },
      cancel,
    });
  }
}

pub struct MergeObserver<St> {
  state: St,
  chain: Cancellation,
}

impl<Item, Err, O> Observer<Item, Err> for MergeObserver<MutArc<MergeState<O>>>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    // The state lock doubles as the per-subscription serializer when both
    // sides emit from different threads.
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
      state.live -= 1;
      if state.live == 0 { state.observer.take() } else { None }
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
  fn odd_even_merge() {
    let numbers = PassthroughSubject::<i32, Never>::new();
    let even = numbers.clone().filter(|v| v % 2 == 0);
    let odd = numbers.clone().filter(|v| v % 2 != 0);

    let out = Arc::new(Mutex::new(Vec::new()));
    let c_out = out.clone();
    even.merge(odd).subscribe(move |v| c_out.lock().unwrap().push(v));

    for v in 0..10 {
      numbers.clone().next(v);
    }

    assert_eq!(*out.lock().unwrap(), (0..10).collect::<Vec<_>>());
  }

  #[test]
  fn completes_only_when_both_sides_do() {
    let a = PassthroughSubject::<(), Never>::new();
    let b = PassthroughSubject::<(), Never>::new();
    let completed = Arc::new(Mutex::new(false));
    let c_completed = completed.clone();

    a.clone()
      .merge(b.clone())
      .on_complete(move || *c_completed.lock().unwrap() = true)
      .subscribe(|_| {});

    a.clone().complete();
    assert!(!*completed.lock().unwrap());
    b.clone().complete();
    assert!(*completed.lock().unwrap());
  }

  #[test]
  fn error_is_delivered_once() {
    let a = PassthroughSubject::<(), &'static str>::new();
    let b = PassthroughSubject::<(), &'static str>::new();
    let errors = Arc::new(Mutex::new(0));
    let completions = Arc::new(Mutex::new(0));
    let c_errors = errors.clone();
    let c_completions = completions.clone();

    a.clone()
      .merge(b.clone())
      .on_complete(move || *c_completions.lock().unwrap() += 1)
      .on_error(move |_| *c_errors.lock().unwrap() += 1)
      .subscribe(|_| {});

    b.clone().error("boom");
    a.clone().error("late");
    a.clone().complete();

    assert_eq!(*errors.lock().unwrap(), 1);
    assert_eq!(*completions.lock().unwrap(), 0);
  }

  #[test]
  fn unsubscribe_stops_both_sides() {
    let a = PassthroughSubject::<i32, Never>::new();
    let b = PassthroughSubject::<i32, Never>::new();

    a.clone()
      .merge(b.clone())
      .subscribe(|_| panic!("disposed subscriptions must stay silent"))
      .dispose();

    a.clone().next(1);
    b.clone().next(2);
  }
}
