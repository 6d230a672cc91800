//! The event protocol delivered to observers.

/// Marker for signals that cannot fail. `Event::Failed` is unconstructible
/// for `Err = Never`, so non-failing is enforced at the type level.
pub type Never = std::convert::Infallible;

/// A single notification produced by a signal.
///
/// The sequence delivered to any one observer is `Next* (Completed |
/// Failed)?`: after a terminal event, nothing follows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event<Item, Err> {
  /// An element of the sequence.
  Next(Item),
  /// Successful termination.
  Completed,
  /// Unsuccessful termination.
  Failed(Err),
}

impl<Item, Err> Event<Item, Err> {
  /// Whether this event ends the sequence.
  #[inline]
  pub fn is_terminal(&self) -> bool { !matches!(self, Event::Next(_)) }

  /// Map the element of a `Next` event, passing terminals through.
  pub fn map<B, F>(self, f: F) -> Event<B, Err>
  where
    F: FnOnce(Item) -> B,
  {
    match self {
      Event::Next(v) => Event::Next(f(v)),
      Event::Completed => Event::Completed,
      Event::Failed(e) => Event::Failed(e),
    }
  }

  /// Map the error of a `Failed` event, passing the rest through.
  pub fn map_err<E2, F>(self, f: F) -> Event<Item, E2>
  where
    F: FnOnce(Err) -> E2,
  {
    match self {
      Event::Next(v) => Event::Next(v),
      Event::Completed => Event::Completed,
      Event::Failed(e) => Event::Failed(f(e)),
    }
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn terminal_classification() {
    assert!(!Event::<i32, ()>::Next(1).is_terminal());
    assert!(Event::<i32, ()>::Completed.is_terminal());
    assert!(Event::<i32, ()>::Failed(()).is_terminal());
  }

  #[test]
  fn map_touches_only_next() {
    assert_eq!(Event::<i32, ()>::Next(2).map(|v| v * 2), Event::Next(4));
    assert_eq!(Event::<i32, ()>::Completed.map(|v| v * 2), Event::Completed);
    assert_eq!(
      Event::<i32, &str>::Failed("boom").map_err(|e| e.len()),
      Event::Failed(4)
    );
  }
}
