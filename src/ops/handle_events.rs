//! HandleEvents operator: side effects at every lifecycle point.

use crate::{
  observer::Observer,
  rc::CellArc,
  signal::Signal,
  subscriber::Subscriber,
};

/// Runs a callback at each lifecycle point and forwards every event
/// unchanged: `on_subscribe` when the subscription starts, `on_next` for
/// each value, `on_terminal` with `None` (completed) or `Some(&err)`
/// (failed), and `on_cancel` only when the subscription is disposed before
/// any terminal.
#[derive(Clone)]
pub struct HandleEventsOp<S, FSub, FNext, FTerm, FCancel> {
  pub(crate) source: S,
  pub(crate) on_subscribe: FSub,
  pub(crate) on_next: FNext,
  pub(crate) on_terminal: FTerm,
  pub(crate) on_cancel: FCancel,
}

impl<S, FSub, FNext, FTerm, FCancel> Signal for HandleEventsOp<S, FSub, FNext, FTerm, FCancel>
where
  S: Signal,
  FSub: FnOnce() + Send + 'static,
  FNext: FnMut(&S::Item) + Send + 'static,
  FTerm: FnOnce(Option<&S::Err>) + Send + 'static,
  FCancel: FnOnce() + Send + 'static,
{
  type Item = S::Item;
  type Err = S::Err;

  fn actual_observe<O>(self, subscriber: Subscriber<O>)
  where
    O: Observer<S::Item, S::Err> + Send + 'static,
  {
    let HandleEventsOp { source, on_subscribe, on_next, on_terminal, on_cancel } = self;
    let Subscriber { observer, cancel } = subscriber;

    let terminated = CellArc::from(false);
    {
      let terminated = terminated.clone();
      cancel.on_dispose(move || {
        if !terminated.get() {
          on_cancel();
        }
      });
    }

    on_subscribe();
    source.actual_observe(Subscriber {
      observer: HandleEventsObserver {
        observer,
        on_next,
        on_terminal: Some(on_terminal),
        terminated,
      },
      cancel,
    });
  }
}

pub struct HandleEventsObserver<O, FNext, FTerm> {
  observer: O,
  on_next: FNext,
  on_terminal: Option<FTerm>,
  terminated: CellArc<bool>,
}

impl<Item, Err, O, FNext, FTerm> Observer<Item, Err> for HandleEventsObserver<O, FNext, FTerm>
where
  O: Observer<Item, Err>,
  FNext: FnMut(&Item),
  FTerm: FnOnce(Option<&Err>),
{
  fn next(&mut self, value: Item) {
    (self.on_next)(&value);
    self.observer.next(value);
  }

  fn error(mut self, err: Err) {
    self.terminated.set(true);
    if let Some(on_terminal) = self.on_terminal.take() {
      on_terminal(Some(&err));
    }
    self.observer.error(err);
  }

  fn complete(mut self) {
    self.terminated.set(true);
    if let Some(on_terminal) = self.on_terminal.take() {
      on_terminal(None);
    }
    self.observer.complete();
  }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}
