//! The binding sink boundary: absorbing signals into owned mutable state.

use std::sync::Weak;

use crate::{
  cancellation::CancelBag,
  context::ExecutionContext,
  event::Never,
  observer::Observer,
  rc::MutArc,
};

/// An object that can absorb non-failing signals.
///
/// The target supplies the execution context bindings deliver on and a
/// [`CancelBag`] whose lifetime bounds every binding: when the bag (and
/// with it the target) goes away, all bindings are released.
pub trait BindingTarget: Send + Sync + 'static {
  type Ctx: ExecutionContext;

  fn binding_context(&self) -> Self::Ctx;

  fn cancellations(&self) -> &CancelBag;
}

/// Observer backing [`bind_to`](crate::signal::SignalExt::bind_to). Holds
/// the target weakly so a binding never keeps its target alive.
pub struct BindingObserver<T, F, C> {
  target: Weak<T>,
  update: MutArc<F>,
  ctx: C,
}

impl<T, F, C> BindingObserver<T, F, C> {
  pub(crate) fn new(target: Weak<T>, update: F, ctx: C) -> Self {
    BindingObserver { target, update: MutArc::from(update), ctx }
  }
}

impl<Item, T, F, C> Observer<Item, Never> for BindingObserver<T, F, C>
where
  T: BindingTarget,
  F: FnMut(&T, Item) + Send + 'static,
  C: ExecutionContext,
  Item: Send + 'static,
{
  fn next(&mut self, value: Item) {
    if let Some(target) = self.target.upgrade() {
      let update = self.update.clone();
      self.ctx.schedule(Box::new(move || {
        (update.rc_deref_mut())(&target, value);
      }));
    }
  }

  fn error(self, err: Never) { match err {} }

  fn complete(self) {}

  fn is_closed(&self) -> bool { self.target.upgrade().is_none() }
}

#[cfg(test)]
mod test {
  use crate::context::ImmediateContext;
  use crate::prelude::*;
  use std::sync::{Arc, Mutex};

  struct Label {
    text: Mutex<String>,
    cancellations: CancelBag,
  }

  impl Label {
    fn new() -> Arc<Self> {
      Arc::new(Label { text: Mutex::new(String::new()), cancellations: CancelBag::new() })
    }
  }

  impl BindingTarget for Label {
    type Ctx = ImmediateContext;

    fn binding_context(&self) -> ImmediateContext { ImmediateContext }

    fn cancellations(&self) -> &CancelBag { &self.cancellations }
  }

  #[test]
  fn updates_flow_into_the_target() {
    let label = Label::new();
    let property = Property::new("hello".to_owned());

    property
      .clone()
      .bind_to(&label, |target, value| *target.text.lock().unwrap() = value);

    assert_eq!(*label.text.lock().unwrap(), "hello");
    property.set("world".to_owned());
    assert_eq!(*label.text.lock().unwrap(), "world");
    assert_eq!(label.cancellations.len(), 1);
  }

  #[test]
  fn binding_dies_with_the_target() {
    let subject = PassthroughSubject::<i32, Never>::new();
    let binding = {
      let label = Label::new();
      subject
        .clone()
        .map(|v| v.to_string())
        .bind_to(&label, |target, value| *target.text.lock().unwrap() = value)
    };

    // Dropping the target dropped its bag, which released the binding.
    assert!(binding.is_disposed());
    subject.clone().next(1);
  }

  #[test]
  fn disposing_the_binding_stops_updates() {
    let label = Label::new();
    let property = Property::new(1);

    let binding = property
      .clone()
      .bind_to(&label, |target, value| {
        *target.text.lock().unwrap() = value.to_string()
      });

    property.set(2);
    binding.dispose();
    property.set(3);

    assert_eq!(*label.text.lock().unwrap(), "2");
  }
}
