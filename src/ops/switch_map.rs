//! SwitchMap operator: only the most recent inner signal is live.

use crate::{
  cancellation::Cancellation,
  observer::Observer,
  rc::MutArc,
  signal::Signal,
  subscriber::Subscriber,
};

/// On every upstream value, cancels the previous inner subscription and
/// subscribes the signal built from the new value. Inner events are only
/// forwarded for the current inner (stale generations are dropped).
/// Completes when the upstream has completed and the current inner does.
#[derive(Clone)]
pub struct SwitchMapOp<S, F> {
  pub(crate) source: S,
  pub(crate) func: F,
}

pub(crate) struct SwitchState<O> {
  observer: Option<O>,
  generation: u64,
  inner_active: bool,
  inner_cancel: Option<Cancellation>,
  outer_done: bool,
}

impl<S, S2, F> Signal for SwitchMapOp<S, F>
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
    let SwitchMapOp { source, func } = self;
    let Subscriber { observer, cancel } = subscriber;
    let state = MutArc::from(SwitchState {
      observer: Some(observer),
      generation: 0,
      inner_active: false,
      inner_cancel: None,
      outer_done: false,
    });
    {
      let state = state.clone();
      cancel.on_dispose(move || {
        let taken = state.rc_deref_mut().inner_cancel.take();
        if let Some(inner) = taken {
          inner.dispose();
        }
      });
    }
    source.actual_observe(Subscriber {
      observer: SwitchMapOuterObserver { state, func, chain: cancel.clone() },
      cancel,
    });
  }
}

pub struct SwitchMapOuterObserver<St, F> {
  state: St,
  func: F,
  chain: Cancellation,
}

impl<Item, Err, O, F, S2> Observer<Item, Err>
  for SwitchMapOuterObserver<MutArc<SwitchState<O>>, F>
where
  F: FnMut(Item) -> S2,
  S2: Signal<Err = Err> + Send + 'static,
  O: Observer<S2::Item, Err> + Send + 'static,
  Err: Send + 'static,
{
  fn next(&mut self, value: Item) {
    let inner = (self.func)(value);
    let inner_cancel = Cancellation::default();
    let (generation, stale) = {
      let mut state = self.state.rc_deref_mut();
      if state.observer.is_none() {
        return;
      }
      state.generation += 1;
      state.inner_active = true;
      let stale = state.inner_cancel.replace(inner_cancel.clone());
      (state.generation, stale)
    };
    if let Some(stale) = stale {
      stale.dispose();
    }
    inner.actual_observe(Subscriber {
      observer: SwitchMapInnerObserver {
        state: self.state.clone(),
        generation,
        chain: self.chain.clone(),
      },
      cancel: inner_cancel,
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
      if state.inner_active { None } else { state.observer.take() }
    };
    if let Some(observer) = taken {
      observer.complete();
    }
  }

  fn is_closed(&self) -> bool { self.state.rc_deref().observer.is_none() }
}

pub struct SwitchMapInnerObserver<St> {
  state: St,
  generation: u64,
  chain: Cancellation,
}

impl<Item, Err, O> Observer<Item, Err> for SwitchMapInnerObserver<MutArc<SwitchState<O>>>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    let mut state = self.state.rc_deref_mut();
    let state = &mut *state;
    if state.generation != self.generation {
      return;
    }
    if let Some(observer) = state.observer.as_mut() {
      observer.next(value);
    }
  }

  fn error(self, err: Err) {
    let taken = {
      let mut state = self.state.rc_deref_mut();
      if state.generation != self.generation {
        return;
      }
      state.observer.take()
    };
    if let Some(observer) = taken {
      observer.error(err);
    }
    self.chain.dispose();
  }

  fn complete(self) {
    let taken = {
      let mut state = self.state.rc_deref_mut();
      if state.generation != self.generation {
        return;
      }
      state.inner_active = false;
      state.inner_cancel = None;
      if state.outer_done { state.observer.take() } else { None }
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
  fn a_new_value_cancels_the_previous_inner() {
    let outer = PassthroughSubject::<usize, Never>::new();
    let inner_a = PassthroughSubject::<&'static str, Never>::new();
    let inner_b = PassthroughSubject::<&'static str, Never>::new();
    let out = Arc::new(Mutex::new(Vec::new()));
    let c_out = out.clone();
    let c_a = inner_a.clone();
    let c_b = inner_b.clone();

    outer
      .clone()
      .switch_map(move |i| if i == 0 { c_a.clone() } else { c_b.clone() })
      .subscribe(move |v| c_out.lock().unwrap().push(v));

    outer.clone().next(0);
    inner_a.clone().next("a1");
    outer.clone().next(1);
    inner_a.clone().next("a2");
    inner_b.clone().next("b1");

    assert_eq!(*out.lock().unwrap(), vec!["a1", "b1"]);
    assert_eq!(inner_a.observer_count(), 0);
  }

  #[test]
  fn completes_with_outer_and_current_inner() {
    let outer = PassthroughSubject::<i32, Never>::new();
    let inner = PassthroughSubject::<i32, Never>::new();
    let completed = Arc::new(Mutex::new(false));
    let c_completed = completed.clone();
    let c_inner = inner.clone();

    outer
      .clone()
      .switch_map(move |_| c_inner.clone())
      .on_complete(move || *c_completed.lock().unwrap() = true)
      .subscribe(|_| {});

    outer.clone().next(1);
    outer.clone().complete();
    assert!(!*completed.lock().unwrap());

    inner.clone().complete();
    assert!(*completed.lock().unwrap());
  }

  #[test]
  fn synchronous_inners_emit_in_sequence() {
    let out = Arc::new(Mutex::new(Vec::new()));
    let c_out = out.clone();

    signal::from_iter([1, 2, 3])
      .switch_map(|v| signal::of(v * 10))
      .subscribe(move |v| c_out.lock().unwrap().push(v));

    assert_eq!(*out.lock().unwrap(), vec![10, 20, 30]);
  }
}
