use crate::{
  event::Event,
  observer::Observer,
  rc::MutArc,
  signal::Signal,
  subject::registry::{self, Registry},
  subscriber::Subscriber,
};

/// A hot multicast source: each event is delivered to every observer
/// attached at that moment, and late subscribers see only future events.
///
/// ```
/// use rivulet::prelude::*;
/// use std::sync::{Arc, Mutex};
///
/// let subject = PassthroughSubject::<i32, Never>::new();
/// let out = Arc::new(Mutex::new(Vec::new()));
/// let c_out = out.clone();
///
/// subject.clone().subscribe(move |v| c_out.lock().unwrap().push(v));
///
/// let mut input = subject.clone();
/// input.next(1);
/// input.next(2);
/// assert_eq!(*out.lock().unwrap(), vec![1, 2]);
/// ```
pub struct PassthroughSubject<Item, Err> {
  registry: MutArc<Registry<Item, Err>>,
}

impl<Item, Err> PassthroughSubject<Item, Err> {
  pub fn new() -> Self { PassthroughSubject { registry: MutArc::from(Registry::new(0)) } }

  /// Observers currently attached (excluding already-disposed ones).
  pub fn observer_count(&self) -> usize { self.registry.rc_deref().observer_count() }

  /// Whether a terminal event has sealed this subject.
  pub fn is_sealed(&self) -> bool { self.registry.rc_deref().is_sealed() }
}

impl<Item, Err> Default for PassthroughSubject<Item, Err> {
  fn default() -> Self { PassthroughSubject::new() }
}

impl<Item, Err> Clone for PassthroughSubject<Item, Err> {
  fn clone(&self) -> Self { PassthroughSubject { registry: self.registry.clone() } }
}

impl<Item, Err> Observer<Item, Err> for PassthroughSubject<Item, Err>
where
  Item: Clone + Send + 'static,
  Err: Clone + Send + 'static,
{
  fn next(&mut self, value: Item) { registry::emit(&self.registry, Event::Next(value)); }

  fn error(self, err: Err) { registry::emit(&self.registry, Event::Failed(err)); }

  fn complete(self) { registry::emit(&self.registry, Event::Completed); }

  fn is_closed(&self) -> bool { self.is_sealed() }
}

impl<Item, Err> Signal for PassthroughSubject<Item, Err>
where
  Item: Clone + Send + 'static,
  Err: Clone + Send + 'static,
{
  type Item = Item;
  type Err = Err;

  fn actual_observe<O>(self, subscriber: Subscriber<O>)
  where
    O: Observer<Item, Err> + Send + 'static,
  {
    registry::attach(&self.registry, subscriber, false);
  }
}

#[cfg(test)]
mod test {
  use crate::prelude::*;
  use std::sync::{Arc, Mutex};

  #[test]
  fn late_subscribers_see_only_future_events() {
    let subject = PassthroughSubject::<i32, Never>::new();
    let early = Arc::new(Mutex::new(Vec::new()));
    let late = Arc::new(Mutex::new(Vec::new()));

    let c_early = early.clone();
    subject.clone().subscribe(move |v| c_early.lock().unwrap().push(v));
    subject.clone().next(1);

    let c_late = late.clone();
    subject.clone().subscribe(move |v| c_late.lock().unwrap().push(v));
    subject.clone().next(2);

    assert_eq!(*early.lock().unwrap(), vec![1, 2]);
    assert_eq!(*late.lock().unwrap(), vec![2]);
  }

  #[test]
  fn detach_stops_delivery() {
    let subject = PassthroughSubject::<i32, Never>::new();
    let out = Arc::new(Mutex::new(Vec::new()));
    let c_out = out.clone();

    let subscription = subject.clone().subscribe(move |v| c_out.lock().unwrap().push(v));
    subject.clone().next(1);
    subscription.dispose();
    subject.clone().next(2);

    assert_eq!(*out.lock().unwrap(), vec![1]);
  }

  #[test]
  fn terminal_seals_the_subject() {
    let subject = PassthroughSubject::<i32, Never>::new();
    let out = Arc::new(Mutex::new(Vec::new()));
    let completions = Arc::new(Mutex::new(0));

    let c_out = out.clone();
    let c_completions = completions.clone();
    subject
      .clone()
      .on_complete(move || *c_completions.lock().unwrap() += 1)
      .subscribe(move |v| c_out.lock().unwrap().push(v));

    subject.clone().next(1);
    subject.clone().complete();
    subject.clone().next(2);

    assert_eq!(*out.lock().unwrap(), vec![1]);
    assert_eq!(*completions.lock().unwrap(), 1);
    assert!(subject.is_sealed());

    // A late observer is handed the terminal immediately.
    let late_completions = Arc::new(Mutex::new(0));
    let c_late = late_completions.clone();
    subject
      .clone()
      .on_complete(move || *c_late.lock().unwrap() += 1)
      .subscribe(|_| {});
    assert_eq!(*late_completions.lock().unwrap(), 1);
  }

  #[test]
  fn reentrant_emission_is_queued_not_interleaved() {
    let subject = PassthroughSubject::<i32, Never>::new();
    let out = Arc::new(Mutex::new(Vec::new()));

    let c_subject = subject.clone();
    let c_out = out.clone();
    subject.clone().subscribe(move |v| {
      c_out.lock().unwrap().push(v);
      if v == 1 {
        c_subject.clone().next(2);
      }
    });

    let c_out2 = out.clone();
    subject.clone().subscribe(move |v| c_out2.lock().unwrap().push(v * 10));

    subject.clone().next(1);

    // The nested emission runs after the first broadcast finishes.
    assert_eq!(*out.lock().unwrap(), vec![1, 10, 2, 20]);
  }
}
