//! The observer registry shared by all subject flavors.
//!
//! Invariants maintained here:
//! - emission is serialized: one drain loop at a time, feeding events in
//!   arrival order;
//! - an observer attached before `emit` returns sees that emission, one
//!   attached during a broadcast sees only later events (replay flavors see
//!   the buffer instead);
//! - a disposed attach-cancellation stops delivery immediately; the entry
//!   itself is swept on the next registry operation, so no ownership cycle
//!   forms between the subject and its observers;
//! - a sealed registry delivers its terminal to late observers immediately.

use std::collections::VecDeque;

use smallvec::SmallVec;

use crate::{
  cancellation::Cancellation,
  event::Event,
  observer::{BoxedObserver, Observer},
  rc::MutArc,
  subscriber::Subscriber,
};

pub(crate) struct Entry<Item, Err> {
  sink: BoxedObserver<Item, Err>,
  cancel: Cancellation,
}

enum Pending<Item, Err> {
  Emit(Event<Item, Err>),
  Attach(Entry<Item, Err>),
}

pub(crate) struct Registry<Item, Err> {
  sinks: SmallVec<[Entry<Item, Err>; 2]>,
  queue: VecDeque<Pending<Item, Err>>,
  broadcasting: bool,
  terminal: Option<Event<Item, Err>>,
  buffer: VecDeque<Item>,
  limit: usize,
}

impl<Item, Err> Registry<Item, Err> {
  pub(crate) fn new(limit: usize) -> Self {
    Registry {
      sinks: SmallVec::new(),
      queue: VecDeque::new(),
      broadcasting: false,
      terminal: None,
      buffer: VecDeque::new(),
      limit,
    }
  }

  pub(crate) fn with_initial(limit: usize, value: Item) -> Self {
    let mut registry = Registry::new(limit);
    registry.buffer.push_back(value);
    registry
  }

  pub(crate) fn is_sealed(&self) -> bool { self.terminal.is_some() }

  pub(crate) fn latest(&self) -> Option<&Item> { self.buffer.back() }

  pub(crate) fn observer_count(&self) -> usize {
    self.sinks.iter().filter(|e| !e.cancel.is_disposed()).count()
  }
}

/// Push one event into the registry. Either this thread becomes the drainer
/// or the event is left for the drain loop already running.
pub(crate) fn emit<Item, Err>(registry: &MutArc<Registry<Item, Err>>, event: Event<Item, Err>)
where
  Item: Clone + Send + 'static,
  Err: Clone + Send + 'static,
{
  {
    let mut reg = registry.rc_deref_mut();
    if reg.terminal.is_some() {
      return;
    }
    reg.queue.push_back(Pending::Emit(event));
    if reg.broadcasting {
      return;
    }
    reg.broadcasting = true;
  }
  drain(registry);
}

/// Attach a downstream subscriber. `replay` flavors receive the buffered
/// values first, in order, before any live event.
pub(crate) fn attach<Item, Err, O>(
  registry: &MutArc<Registry<Item, Err>>,
  subscriber: Subscriber<O>,
  replay: bool,
) where
  Item: Clone + Send + 'static,
  Err: Clone + Send + 'static,
  O: Observer<Item, Err> + Send + 'static,
{
  let cancel = subscriber.cancel.clone();
  let mut entry = Entry { sink: BoxedObserver::new(subscriber), cancel };

  if replay {
    {
      let mut reg = registry.rc_deref_mut();
      reg.queue.push_back(Pending::Attach(entry));
      if reg.broadcasting {
        return;
      }
      reg.broadcasting = true;
    }
    drain(registry);
    return;
  }

  let terminal = {
    let mut reg = registry.rc_deref_mut();
    match reg.terminal.clone() {
      None => {
        reg.sinks.push(entry);
        return;
      }
      Some(ev) => ev,
    }
  };
  entry.sink.on_event(terminal);
}

fn drain<Item, Err>(registry: &MutArc<Registry<Item, Err>>)
where
  Item: Clone + Send + 'static,
  Err: Clone + Send + 'static,
{
  loop {
    let pending = {
      let mut reg = registry.rc_deref_mut();
      match reg.queue.pop_front() {
        None => {
          reg.broadcasting = false;
          return;
        }
        Some(p) => {
          if let Pending::Emit(Event::Next(v)) = &p {
            if reg.limit > 0 {
              let buffered = v.clone();
              reg.buffer.push_back(buffered);
              while reg.buffer.len() > reg.limit {
                reg.buffer.pop_front();
              }
            }
          }
          p
        }
      }
    };

    match pending {
      Pending::Attach(mut entry) => {
        let (snapshot, terminal) = {
          let reg = registry.rc_deref();
          (reg.buffer.iter().cloned().collect::<Vec<_>>(), reg.terminal.clone())
        };
        for v in snapshot {
          if entry.cancel.is_disposed() {
            break;
          }
          entry.sink.on_event(Event::Next(v));
        }
        match terminal {
          Some(ev) => entry.sink.on_event(ev),
          None => {
            if !entry.cancel.is_disposed() {
              registry.rc_deref_mut().sinks.push(entry);
            }
          }
        }
      }
      Pending::Emit(Event::Next(v)) => {
        // Deliver with the registry unlocked so callbacks may attach,
        // detach or emit; those mutations are queued or merged back below.
        let mut sinks = std::mem::take(&mut registry.rc_deref_mut().sinks);
        for entry in sinks.iter_mut() {
          if !entry.cancel.is_disposed() {
            entry.sink.on_event(Event::Next(v.clone()));
          }
        }
        let mut reg = registry.rc_deref_mut();
        let added = std::mem::take(&mut reg.sinks);
        sinks.extend(added);
        sinks.retain(|e| !e.cancel.is_disposed());
        reg.sinks = sinks;
      }
      Pending::Emit(terminal) => {
        {
          let mut reg = registry.rc_deref_mut();
          reg.terminal = Some(terminal.clone());
          // Nothing may be emitted past a terminal, but attaches queued
          // behind it still deserve their replay-plus-terminal delivery.
          reg.queue.retain(|p| matches!(p, Pending::Attach(_)));
        }
        // Observers attaching while the terminal fans out still get it.
        loop {
          let batch = std::mem::take(&mut registry.rc_deref_mut().sinks);
          if batch.is_empty() {
            break;
          }
          for mut entry in batch {
            if !entry.cancel.is_disposed() {
              entry.sink.on_event(terminal.clone());
            }
          }
        }
      }
    }
  }
}
