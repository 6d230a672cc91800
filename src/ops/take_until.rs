//! TakeUntil operator: a trigger signal ends the sequence.

use crate::{
  cancellation::Cancellation,
  observer::Observer,
  rc::MutArc,
  signal::Signal,
  subscriber::Subscriber,
  type_hint::TypeHint,
};

/// Pipes the source until `trigger` produces its first event (value or
/// terminal), at which point the signal completes and both subscriptions
/// are cancelled.
#[derive(Clone)]
pub struct TakeUntilOp<S, T> {
  pub(crate) source: S,
  pub(crate) trigger: T,
}

impl<S, T> Signal for TakeUntilOp<S, T>
where
  S: Signal,
  T: Signal<Err = S::Err>,
{
  type Item = S::Item;
  type Err = S::Err;

  fn actual_observe<O>(self, subscriber: Subscriber<O>)
  where
    O: Observer<S::Item, S::Err> + Send + 'static,
  {
    let TakeUntilOp { source, trigger } = self;
    let Subscriber { observer, cancel } = subscriber;
    let state = MutArc::from(Some(observer));

    trigger.actual_observe(Subscriber {
      observer: TriggerObserver {
        state: state.clone(),
        chain: cancel.clone(),
        _hint: TypeHint::new(),
      },
      cancel: cancel.clone(),
    });
    source.actual_observe(Subscriber {
      observer: TakeUntilObserver { state, chain: cancel.clone() },
      cancel,
    });
  }
}

pub struct TakeUntilObserver<St> {
  state: St,
  chain: Cancellation,
}

impl<Item, Err, O> Observer<Item, Err> for TakeUntilObserver<MutArc<Option<O>>>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    if let Some(observer) = self.state.rc_deref_mut().as_mut() {
      observer.next(value);
    }
  }

  fn error(self, err: Err) {
    let taken = self.state.rc_deref_mut().take();
    if let Some(observer) = taken {
      observer.error(err);
    }
    self.chain.dispose();
  }

  fn complete(self) {
    let taken = self.state.rc_deref_mut().take();
    if let Some(observer) = taken {
      observer.complete();
    }
    self.chain.dispose();
  }

  fn is_closed(&self) -> bool { self.state.rc_deref().is_none() }
}

pub struct TriggerObserver<St, Item, TItem> {
  state: St,
  chain: Cancellation,
  _hint: TypeHint<(Item, TItem)>,
}

impl<Item, TItem, Err, O> Observer<TItem, Err> for TriggerObserver<MutArc<Option<O>>, Item, TItem>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, _value: TItem) {
    let taken = self.state.rc_deref_mut().take();
    if let Some(observer) = taken {
      observer.complete();
    }
    self.chain.dispose();
  }

  fn error(self, err: Err) {
    let taken = self.state.rc_deref_mut().take();
    if let Some(observer) = taken {
      observer.error(err);
    }
    self.chain.dispose();
  }

  // A trigger that completes without ever firing never ends the source.
  fn complete(self) {}

  fn is_closed(&self) -> bool { self.state.rc_deref().is_none() }
}

#[cfg(test)]
mod test {
  use crate::prelude::*;
  use std::sync::{Arc, Mutex};

  #[test]
  fn trigger_event_ends_the_sequence_and_cancels_both_sides() {
    let source = PassthroughSubject::<i32, Never>::new();
    let trigger = PassthroughSubject::<(), Never>::new();
    let out = Arc::new(Mutex::new(Vec::new()));
    let completed = Arc::new(Mutex::new(false));
    let c_out = out.clone();
    let c_completed = completed.clone();

    source
      .clone()
      .take_until(trigger.clone())
      .on_complete(move || *c_completed.lock().unwrap() = true)
      .subscribe(move |v| c_out.lock().unwrap().push(v));

    source.clone().next(1);
    trigger.clone().next(());
    source.clone().next(2);

    assert_eq!(*out.lock().unwrap(), vec![1]);
    assert!(*completed.lock().unwrap());
    assert_eq!(source.observer_count(), 0);
    assert_eq!(trigger.observer_count(), 0);
  }
}
