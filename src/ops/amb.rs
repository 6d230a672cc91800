//! Amb operator: two signals race, the first to produce wins.

use crate::{
  cancellation::Cancellation,
  observer::Observer,
  rc::MutArc,
  signal::Signal,
  subscriber::Subscriber,
};

/// Subscribes both sides; whichever delivers any event first becomes the
/// sole source and the other side is cancelled on the spot. A terminal can
/// win the race just like a value.
#[derive(Clone)]
pub struct AmbOp<A, B> {
  pub(crate) source_a: A,
  pub(crate) source_b: B,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Winner {
  Undecided,
  SideA,
  SideB,
}

pub(crate) struct AmbState<O> {
  observer: Option<O>,
  winner: Winner,
}

impl<A, B> Signal for AmbOp<A, B>
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
    let AmbOp { source_a, source_b } = self;
    let Subscriber { observer, cancel } = subscriber;
    let state = MutArc::from(AmbState { observer: Some(observer), winner: Winner::Undecided });

    let cancel_a = Cancellation::default();
    let cancel_b = Cancellation::default();
    cancel.add(cancel_a.clone());
    cancel.add(cancel_b.clone());

    source_a.actual_observe(Subscriber {
      observer: AmbObserver {
        state: state.clone(),
        side: Winner::SideA,
        other: cancel_b.clone(),
        chain: cancel.clone(),
      },
      cancel: cancel_a.clone(),
    });
    source_b.actual_observe(Subscriber {
      observer: AmbObserver { state, side: Winner::SideB, other: cancel_a, chain: cancel },
      cancel: cancel_b,
    });
  }
}

pub struct AmbObserver<St> {
  state: St,
  side: Winner,
  other: Cancellation,
  chain: Cancellation,
}

impl<Item, Err, O> Observer<Item, Err> for AmbObserver<MutArc<AmbState<O>>>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    {
      let mut state = self.state.rc_deref_mut();
      if state.winner == Winner::Undecided {
        state.winner = self.side;
      } else if state.winner != self.side {
        return;
      }
      if let Some(observer) = state.observer.as_mut() {
        observer.next(value);
      }
    }
    self.other.dispose();
  }

  fn error(self, err: Err) {
    let taken = {
      let mut state = self.state.rc_deref_mut();
      if state.winner == Winner::Undecided {
        state.winner = self.side;
      } else if state.winner != self.side {
        return;
      }
      state.observer.take()
    };
    self.other.dispose();
    if let Some(observer) = taken {
      observer.error(err);
    }
    self.chain.dispose();
  }

  fn complete(self) {
    let taken = {
      let mut state = self.state.rc_deref_mut();
      if state.winner == Winner::Undecided {
        state.winner = self.side;
      } else if state.winner != self.side {
        return;
      }
      state.observer.take()
    };
    self.other.dispose();
    if let Some(observer) = taken {
      observer.complete();
    }
    self.chain.dispose();
  }

  fn is_closed(&self) -> bool { self.state.rc_deref().observer.is_none() }
}
