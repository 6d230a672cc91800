//! Pausable operator: delivery gated by a boolean control signal.

use crate::{
  cancellation::Cancellation,
  observer::Observer,
  rc::{CellArc, MutArc},
  signal::Signal,
  subscriber::Subscriber,
  type_hint::TypeHint,
};

/// Gates downstream delivery by the latest boolean from `control`: `true`
/// pauses. Values arriving while paused are dropped, not buffered. The
/// signal starts unpaused, completes with the source, and fails on the
/// first failure from either side.
#[derive(Clone)]
pub struct PausableOp<S, G> {
  pub(crate) source: S,
  pub(crate) control: G,
}

impl<S, G> Signal for PausableOp<S, G>
where
  S: Signal,
  G: Signal<Item = bool, Err = S::Err>,
{
  type Item = S::Item;
  type Err = S::Err;

  fn actual_observe<O>(self, subscriber: Subscriber<O>)
  where
    O: Observer<S::Item, S::Err> + Send + 'static,
  {
    let PausableOp { source, control } = self;
    let Subscriber { observer, cancel } = subscriber;
    let state = MutArc::from(Some(observer));
    let paused = CellArc::from(false);

    control.actual_observe(Subscriber {
      observer: PauseControlObserver {
        state: state.clone(),
        paused: paused.clone(),
        chain: cancel.clone(),
        _hint: TypeHint::new(),
      },
      cancel: cancel.clone(),
    });
    source.actual_observe(Subscriber {
      observer: PausableObserver { state, paused, chain: cancel.clone() },
      cancel,
    });
  }
}

pub struct PausableObserver<St> {
  state: St,
  paused: CellArc<bool>,
  chain: Cancellation,
}

impl<Item, Err, O> Observer<Item, Err> for PausableObserver<MutArc<Option<O>>>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    if self.paused.get() {
      return;
    }
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

pub struct PauseControlObserver<St, Item> {
  state: St,
  paused: CellArc<bool>,
  chain: Cancellation,
  _hint: TypeHint<Item>,
}

impl<Item, Err, O> Observer<bool, Err> for PauseControlObserver<MutArc<Option<O>>, Item>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: bool) { self.paused.set(value); }

  fn error(self, err: Err) {
    let taken = self.state.rc_deref_mut().take();
    if let Some(observer) = taken {
      observer.error(err);
    }
    self.chain.dispose();
  }

  // The control completing just freezes the gate in its current position.
  fn complete(self) {}

  fn is_closed(&self) -> bool { self.state.rc_deref().is_none() }
}
