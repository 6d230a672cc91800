//! One-shot cancellation handles and bags of them.
//!
//! A [`Cancellation`] releases its resources exactly once; disposing it again
//! is a no-op. Handles compare and hash by identity so they can be stored in
//! sets. A [`CancelBag`] owns a set of cancellations and disposes them all
//! when it is disposed or dropped.

use std::{
  hash::{Hash, Hasher},
  mem,
  sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
  },
};

type Action = Box<dyn FnOnce() + Send>;

enum Teardown {
  None,
  Once(Action),
  Multi(Vec<Action>),
}

struct Inner {
  disposed: AtomicBool,
  teardown: Mutex<Teardown>,
}

/// A one-shot, idempotent release handle.
///
/// Cloning yields another handle to the same subscription; disposing any
/// clone disposes them all. Teardown actions attached with [`on_dispose`]
/// run exactly once, on the thread that first calls [`dispose`].
///
/// [`on_dispose`]: Cancellation::on_dispose
/// [`dispose`]: Cancellation::dispose
#[derive(Clone)]
pub struct Cancellation {
  inner: Arc<Inner>,
}

impl Default for Cancellation {
  /// An open handle with nothing to release yet. This doubles as the
  /// sentinel for subscriptions that hold no resource.
  fn default() -> Self {
    Cancellation {
      inner: Arc::new(Inner {
        disposed: AtomicBool::new(false),
        teardown: Mutex::new(Teardown::None),
      }),
    }
  }
}

impl Cancellation {
  /// A handle that runs `action` once when disposed.
  pub fn new<F>(action: F) -> Self
  where
    F: FnOnce() + Send + 'static,
  {
    let c = Cancellation::default();
    c.on_dispose(action);
    c
  }

  pub fn is_disposed(&self) -> bool { self.inner.disposed.load(Ordering::SeqCst) }

  /// Release the subscription. The disposed flag flips before any teardown
  /// runs, so producers polling [`is_disposed`](Cancellation::is_disposed)
  /// stop delivering as soon as this returns.
  pub fn dispose(&self) {
    if self.inner.disposed.swap(true, Ordering::SeqCst) {
      return;
    }
    let teardown = {
      let mut guard = self.inner.teardown.lock().unwrap();
      mem::replace(&mut *guard, Teardown::None)
    };
    // Run outside the lock: teardowns may dispose other handles.
    match teardown {
      Teardown::None => {}
      Teardown::Once(action) => action(),
      Teardown::Multi(actions) => actions.into_iter().for_each(|a| a()),
    }
  }

  /// Attach a teardown action. If the handle is already disposed the action
  /// runs immediately on the calling thread.
  pub fn on_dispose<F>(&self, action: F)
  where
    F: FnOnce() + Send + 'static,
  {
    let action: Action = Box::new(action);
    {
      let mut guard = self.inner.teardown.lock().unwrap();
      if !self.inner.disposed.load(Ordering::SeqCst) {
        let teardown = &mut *guard;
        match teardown {
          Teardown::None => *teardown = Teardown::Once(action),
          Teardown::Once(_) => {
            if let Teardown::Once(first) = mem::replace(teardown, Teardown::None) {
              *teardown = Teardown::Multi(vec![first, action]);
            }
          }
          Teardown::Multi(actions) => actions.push(action),
        }
        return;
      }
    }
    action();
  }

  /// Tie a child subscription to this one: disposing `self` disposes
  /// `child`. Adding to an already-disposed handle disposes the child
  /// immediately.
  pub fn add(&self, child: Cancellation) { self.on_dispose(move || child.dispose()); }
}

impl PartialEq for Cancellation {
  fn eq(&self, other: &Self) -> bool { Arc::ptr_eq(&self.inner, &other.inner) }
}

impl Eq for Cancellation {}

impl Hash for Cancellation {
  fn hash<H: Hasher>(&self, state: &mut H) {
    (Arc::as_ptr(&self.inner) as usize).hash(state);
  }
}

impl std::fmt::Debug for Cancellation {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Cancellation")
      .field("disposed", &self.is_disposed())
      .finish()
  }
}

struct BagInner {
  disposed: bool,
  items: Vec<Cancellation>,
}

impl Drop for BagInner {
  fn drop(&mut self) {
    for c in self.items.drain(..) {
      c.dispose();
    }
  }
}

/// An owning collection of cancellations.
///
/// Disposing the bag disposes every member; so does dropping the last handle
/// to it. Adding to a disposed bag disposes the newcomer immediately, which
/// makes bags safe to hand to subscriptions that may outlive their target.
#[derive(Clone, Default)]
pub struct CancelBag {
  inner: Arc<Mutex<BagInner>>,
}

impl Default for BagInner {
  fn default() -> Self { BagInner { disposed: false, items: Vec::new() } }
}

impl CancelBag {
  pub fn new() -> Self { CancelBag::default() }

  pub fn is_disposed(&self) -> bool { self.inner.lock().unwrap().disposed }

  pub fn add(&self, cancellation: Cancellation) {
    {
      let mut guard = self.inner.lock().unwrap();
      if !guard.disposed {
        if !guard.items.contains(&cancellation) {
          guard.items.push(cancellation);
        }
        return;
      }
    }
    cancellation.dispose();
  }

  pub fn dispose(&self) {
    let items = {
      let mut guard = self.inner.lock().unwrap();
      guard.disposed = true;
      mem::take(&mut guard.items)
    };
    for c in items {
      c.dispose();
    }
  }

  pub fn len(&self) -> usize { self.inner.lock().unwrap().items.len() }

  pub fn is_empty(&self) -> bool { self.inner.lock().unwrap().items.is_empty() }
}

#[cfg(test)]
mod test {
  use super::*;
  use std::collections::{hash_map::DefaultHasher, HashSet};
  use std::sync::atomic::AtomicUsize;

  fn identity_hash(c: &Cancellation) -> u64 {
    let mut h = DefaultHasher::new();
    c.hash(&mut h);
    h.finish()
  }

  #[test]
  fn dispose_is_idempotent() {
    let hits = Arc::new(AtomicUsize::new(0));
    let c_hits = hits.clone();
    let c = Cancellation::new(move || {
      c_hits.fetch_add(1, Ordering::SeqCst);
    });

    c.dispose();
    c.dispose();
    c.clone().dispose();

    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert!(c.is_disposed());
  }

  #[test]
  fn on_dispose_after_disposal_runs_immediately() {
    let c = Cancellation::default();
    c.dispose();

    let hits = Arc::new(AtomicUsize::new(0));
    let c_hits = hits.clone();
    c.on_dispose(move || {
      c_hits.fetch_add(1, Ordering::SeqCst);
    });

    assert_eq!(hits.load(Ordering::SeqCst), 1);
  }

  #[test]
  fn child_disposed_with_parent() {
    let parent = Cancellation::default();
    let child = Cancellation::default();
    parent.add(child.clone());

    parent.dispose();
    assert!(child.is_disposed());
  }

  #[test]
  fn identity_equality_and_hashing() {
    let a = Cancellation::default();
    let b = Cancellation::default();
    let a2 = a.clone();

    assert_eq!(a, a2);
    assert_ne!(a, b);
    assert_eq!(identity_hash(&a), identity_hash(&a2));

    let mut set = HashSet::new();
    set.insert(a.clone());
    set.insert(a2);
    set.insert(b);
    assert_eq!(set.len(), 2);
    assert!(set.contains(&a));
  }

  #[test]
  fn bag_disposes_members() {
    let bag = CancelBag::new();
    let a = Cancellation::default();
    let b = Cancellation::default();
    bag.add(a.clone());
    bag.add(b.clone());
    assert_eq!(bag.len(), 2);

    bag.dispose();
    assert!(a.is_disposed());
    assert!(b.is_disposed());

    // Adding to a disposed bag disposes the newcomer on the spot.
    let late = Cancellation::default();
    bag.add(late.clone());
    assert!(late.is_disposed());
  }

  #[test]
  fn bag_disposes_on_drop() {
    let a = Cancellation::default();
    {
      let bag = CancelBag::new();
      bag.add(a.clone());
    }
    assert!(a.is_disposed());
  }
}
