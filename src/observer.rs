//! The observer contract: the sink side of every subscription.

use crate::event::Event;

/// A consumer of the events a signal produces.
///
/// `next` may be called any number of times; `error` and `complete` consume
/// the observer, so the type system rules out delivery after a terminal on
/// the typed path. Producers use [`is_closed`](Observer::is_closed) to stop
/// early when downstream no longer listens.
pub trait Observer<Item, Err> {
  fn next(&mut self, value: Item);
  fn error(self, err: Err);
  fn complete(self);
  fn is_closed(&self) -> bool;
}

#[doc(hidden)]
#[macro_export]
macro_rules! error_proxy_impl {
  ($err:ident, $field:ident) => {
    #[inline]
    fn error(self, err: $err) { self.$field.error(err); }
  };
}

#[doc(hidden)]
#[macro_export]
macro_rules! complete_proxy_impl {
  ($field:ident) => {
    #[inline]
    fn complete(self) { self.$field.complete(); }
  };
}

#[doc(hidden)]
#[macro_export]
macro_rules! is_closed_proxy_impl {
  ($field:ident) => {
    #[inline]
    fn is_closed(&self) -> bool { self.$field.is_closed() }
  };
}

/// Object-safe form of the observer contract: a single entry point accepting
/// an [`Event`]. Used wherever observers must be stored homogeneously, e.g.
/// in subject registries.
pub trait EventSink<Item, Err>: Send {
  fn on(&mut self, event: Event<Item, Err>);
  fn is_closed(&self) -> bool;
}

struct SinkObserver<O> {
  observer: Option<O>,
}

impl<Item, Err, O> EventSink<Item, Err> for SinkObserver<O>
where
  O: Observer<Item, Err> + Send,
{
  fn on(&mut self, event: Event<Item, Err>) {
    match event {
      Event::Next(v) => {
        if let Some(observer) = self.observer.as_mut() {
          observer.next(v);
        }
      }
      Event::Completed => {
        if let Some(observer) = self.observer.take() {
          observer.complete();
        }
      }
      Event::Failed(e) => {
        if let Some(observer) = self.observer.take() {
          observer.error(e);
        }
      }
    }
  }

  fn is_closed(&self) -> bool {
    self.observer.as_ref().map_or(true, |o| o.is_closed())
  }
}

/// A boxed observer. Events funnel through [`EventSink::on`]; anything
/// arriving after a terminal is dropped.
pub struct BoxedObserver<Item, Err> {
  sink: Box<dyn EventSink<Item, Err>>,
}

impl<Item, Err> BoxedObserver<Item, Err> {
  pub fn new<O>(observer: O) -> Self
  where
    O: Observer<Item, Err> + Send + 'static,
    Item: 'static,
    Err: 'static,
  {
    BoxedObserver { sink: Box::new(SinkObserver { observer: Some(observer) }) }
  }

  /// Feed one event through the boxed sink.
  pub fn on_event(&mut self, event: Event<Item, Err>) { self.sink.on(event); }
}

impl<Item, Err> Observer<Item, Err> for BoxedObserver<Item, Err> {
  fn next(&mut self, value: Item) { self.sink.on(Event::Next(value)); }

  fn error(mut self, err: Err) { self.sink.on(Event::Failed(err)); }

  fn complete(mut self) { self.sink.on(Event::Completed); }

  fn is_closed(&self) -> bool { self.sink.is_closed() }
}

/// Observer built from a `next` closure; terminals are discarded.
pub struct NextObserver<F>(pub(crate) F);

impl<Item, Err, F> Observer<Item, Err> for NextObserver<F>
where
  F: FnMut(Item),
{
  fn next(&mut self, value: Item) { (self.0)(value); }

  fn error(self, _err: Err) {}

  fn complete(self) {}

  fn is_closed(&self) -> bool { false }
}

#[cfg(test)]
mod test {
  use super::*;

  struct Recording {
    out: std::sync::Arc<std::sync::Mutex<Vec<String>>>,
  }

  impl Observer<i32, &'static str> for Recording {
    fn next(&mut self, value: i32) { self.out.lock().unwrap().push(format!("n{value}")); }

    fn error(self, err: &'static str) { self.out.lock().unwrap().push(format!("e{err}")); }

    fn complete(self) { self.out.lock().unwrap().push("c".into()); }

    fn is_closed(&self) -> bool { false }
  }

  #[test]
  fn boxed_observer_drops_events_after_terminal() {
    let out = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
    let mut boxed = BoxedObserver::new(Recording { out: out.clone() });

    boxed.on_event(Event::Next(1));
    boxed.on_event(Event::Completed);
    boxed.on_event(Event::Next(2));
    boxed.on_event(Event::Failed("late"));

    assert_eq!(*out.lock().unwrap(), vec!["n1", "c"]);
    assert!(boxed.is_closed());
  }
}
