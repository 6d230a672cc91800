use crate::{
  event::Event,
  observer::Observer,
  rc::MutArc,
  signal::Signal,
  subject::registry::{self, Registry},
  subscriber::Subscriber,
};

/// A multicast source that retains the last `limit` values plus any terminal
/// and replays them to every new observer before live delivery begins.
pub struct ReplaySubject<Item, Err> {
  registry: MutArc<Registry<Item, Err>>,
}

impl<Item, Err> ReplaySubject<Item, Err> {
  pub fn new(limit: usize) -> Self {
    ReplaySubject { registry: MutArc::from(Registry::new(limit)) }
  }

  pub fn observer_count(&self) -> usize { self.registry.rc_deref().observer_count() }

  pub fn is_sealed(&self) -> bool { self.registry.rc_deref().is_sealed() }
}

impl<Item, Err> Clone for ReplaySubject<Item, Err> {
  fn clone(&self) -> Self { ReplaySubject { registry: self.registry.clone() } }
}

impl<Item, Err> Observer<Item, Err> for ReplaySubject<Item, Err>
where
  Item: Clone + Send + 'static,
  Err: Clone + Send + 'static,
{
  fn next(&mut self, value: Item) { registry::emit(&self.registry, Event::Next(value)); }

  fn error(self, err: Err) { registry::emit(&self.registry, Event::Failed(err)); }

  fn complete(self) { registry::emit(&self.registry, Event::Completed); }

  fn is_closed(&self) -> bool { self.is_sealed() }
}

impl<Item, Err> Signal for ReplaySubject<Item, Err>
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
    registry::attach(&self.registry, subscriber, true);
  }
}
