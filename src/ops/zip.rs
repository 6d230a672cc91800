//! Zip operator: pairs two signals by position.

use std::collections::VecDeque;

use crate::{
  cancellation::Cancellation,
  observer::Observer,
  rc::MutArc,
  signal::Signal,
  subscriber::Subscriber,
};

/// Emits `(a_k, b_k)` pairs. Each side queues values the other has not yet
/// matched; the signal completes as soon as a completed side's queue is
/// empty, because the next index can never be produced.
#[derive(Clone)]
pub struct ZipOp<A, B> {
  pub(crate) source_a: A,
  pub(crate) source_b: B,
}

pub(crate) struct ZipState<O, ItemA, ItemB> {
  observer: Option<O>,
  queue_a: VecDeque<ItemA>,
  queue_b: VecDeque<ItemB>,
  done_a: bool,
  done_b: bool,
}

impl<O, ItemA, ItemB> ZipState<O, ItemA, ItemB> {
  // A completed side with an empty queue can never pair again.
  fn exhausted(&self) -> bool {
    (self.done_a && self.queue_a.is_empty()) || (self.done_b && self.queue_b.is_empty())
  }
}

impl<A, B> Signal for ZipOp<A, B>
where
  A: Signal,
  B: Signal<Err = A::Err>,
{
  type Item = (A::Item, B::Item);
  type Err = A::Err;

  fn actual_observe<O>(self, subscriber: Subscriber<O>)
  where
    O: Observer<(A::Item, B::Item), A::Err> + Send + 'static,
  {
    let ZipOp { source_a, source_b } = self;
    let Subscriber { observer, cancel } = subscriber;
    let state = MutArc::from(ZipState {
      observer: Some(observer),
      queue_a: VecDeque::new(),
      queue_b: VecDeque::new(),
      done_a: false,
      done_b: false,
    });

    source_b.actual_observe(Subscriber {
      observer: ZipBObserver { state: state.clone(), chain: cancel.clone() },
      cancel: cancel.clone(),
    });
    source_a.actual_observe(Subscriber {
      observer: ZipAObserver { state, chain: cancel.clone() },
      cancel,
    });
  }
}

pub struct ZipAObserver<St> {
  state: St,
  chain: Cancellation,
}

pub struct ZipBObserver<St> {
  state: St,
  chain: Cancellation,
}

macro_rules! zip_side_impl {
  ($name:ident, $own_item:ident, $other_item:ident, $own_queue:ident, $other_queue:ident,
   $own_done:ident, $pair:expr) => {
    impl<ItemA, ItemB, Err, O> Observer<$own_item, Err>
      for $name<MutArc<ZipState<O, ItemA, ItemB>>>
    where
      O: Observer<(ItemA, ItemB), Err>,
    {
      fn next(&mut self, value: $own_item) {
        let taken = {
          let mut state = self.state.rc_deref_mut();
          let state = &mut *state;
          match state.$other_queue.pop_front() {
            Some(other) => {
              if let Some(observer) = state.observer.as_mut() {
                #[allow(clippy::redundant_closure_call)]
                observer.next(($pair)(value, other));
              }
            }
            None => state.$own_queue.push_back(value),
          }
          if state.exhausted() { state.observer.take() } else { None }
        };
        if let Some(observer) = taken {
          observer.complete();
          self.chain.dispose();
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
          state.$own_done = true;
          if state.exhausted() { state.observer.take() } else { None }
        };
        if let Some(observer) = taken {
          observer.complete();
          self.chain.dispose();
        }
      }

      fn is_closed(&self) -> bool { self.state.rc_deref().observer.is_none() }
    }
  };
}

zip_side_impl!(ZipAObserver, ItemA, ItemB, queue_a, queue_b, done_a, |a, b| (a, b));
zip_side_impl!(ZipBObserver, ItemB, ItemA, queue_b, queue_a, done_b, |b, a| (a, b));

#[cfg(test)]
mod test {
  use crate::prelude::*;
  use std::sync::{Arc, Mutex};

  #[test]
  fn pairs_by_position() {
    let a = PassthroughSubject::<i32, Never>::new();
    let b = PassthroughSubject::<&'static str, Never>::new();
    let out = Arc::new(Mutex::new(Vec::new()));
    let c_out = out.clone();

    a.clone()
      .zip(b.clone())
      .subscribe(move |pair| c_out.lock().unwrap().push(pair));

    a.clone().next(1);
    a.clone().next(2);
    b.clone().next("x");
    b.clone().next("y");
    a.clone().next(3);
    b.clone().next("z");

    assert_eq!(*out.lock().unwrap(), vec![(1, "x"), (2, "y"), (3, "z")]);
  }

  #[test]
  fn completes_when_an_exhausted_side_completes() {
    let a = PassthroughSubject::<i32, Never>::new();
    let b = PassthroughSubject::<i32, Never>::new();
    let completed = Arc::new(Mutex::new(false));
    let out = Arc::new(Mutex::new(Vec::new()));
    let c_completed = completed.clone();
    let c_out = out.clone();

    a.clone()
      .zip(b.clone())
      .on_complete(move || *c_completed.lock().unwrap() = true)
      .subscribe(move |pair| c_out.lock().unwrap().push(pair));

    a.clone().next(1);
    b.clone().next(10);
    a.clone().complete();

    // A is done with an empty queue: no further pair can exist.
    assert!(*completed.lock().unwrap());
    assert_eq!(*out.lock().unwrap(), vec![(1, 10)]);
  }

  #[test]
  fn a_completed_side_with_queued_values_still_pairs() {
    let a = PassthroughSubject::<i32, Never>::new();
    let b = PassthroughSubject::<i32, Never>::new();
    let completed = Arc::new(Mutex::new(false));
    let out = Arc::new(Mutex::new(Vec::new()));
    let c_completed = completed.clone();
    let c_out = out.clone();

    a.clone()
      .zip(b.clone())
      .on_complete(move || *c_completed.lock().unwrap() = true)
      .subscribe(move |pair| c_out.lock().unwrap().push(pair));

    a.clone().next(1);
    a.clone().next(2);
    a.clone().complete();
    assert!(!*completed.lock().unwrap());

    b.clone().next(10);
    b.clone().next(20);

    assert_eq!(*out.lock().unwrap(), vec![(1, 10), (2, 20)]);
    assert!(*completed.lock().unwrap());
  }
}
