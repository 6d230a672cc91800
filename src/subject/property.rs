use crate::{
  event::{Event, Never},
  observer::Observer,
  rc::MutArc,
  signal::Signal,
  subject::registry::{self, Registry},
  subscriber::Subscriber,
};

/// A replay-1 subject that always holds a current value and never fails or
/// terminates from the outside.
///
/// Observers receive the current value on attach, then every update. The
/// latest value can also be read synchronously with
/// [`value`](Property::value).
pub struct Property<Item> {
  registry: MutArc<Registry<Item, Never>>,
}

impl<Item> Property<Item>
where
  Item: Clone + Send + 'static,
{
  pub fn new(initial: Item) -> Self {
    Property { registry: MutArc::from(Registry::with_initial(1, initial)) }
  }

  /// Replace the current value and broadcast it.
  pub fn set(&self, value: Item) { registry::emit(&self.registry, Event::Next(value)); }

  /// The current value.
  pub fn value(&self) -> Item {
    self
      .registry
      .rc_deref()
      .latest()
      .cloned()
      .expect("a property always holds a value")
  }

  pub fn observer_count(&self) -> usize { self.registry.rc_deref().observer_count() }
}

impl<Item> Clone for Property<Item> {
  fn clone(&self) -> Self { Property { registry: self.registry.clone() } }
}

impl<Item> Signal for Property<Item>
where
  Item: Clone + Send + 'static,
{
  type Item = Item;
  type Err = Never;

  fn actual_observe<O>(self, subscriber: Subscriber<O>)
  where
    O: Observer<Item, Never> + Send + 'static,
  {
    registry::attach(&self.registry, subscriber, true);
  }
}
