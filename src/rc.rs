//! Wrapper types for reference-counted shared mutable state.
//!
//! | Type | Backing | Use case |
//! |------|---------|----------|
//! | `MutArc<T>` | `Arc<Mutex<T>>` | Complex mutable operator state |
//! | `CellArc<T>` | `Arc<AtomicCell<T>>` | Simple `Copy` flags and counters |

use std::sync::{Mutex, MutexGuard};

use crossbeam_utils::atomic::AtomicCell;
use rclite::Arc;

/// Arc-based thread-safe mutable sharing.
pub struct MutArc<T>(Arc<Mutex<T>>);

impl<T> Clone for MutArc<T> {
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<T> From<T> for MutArc<T> {
  fn from(v: T) -> Self { Self(Arc::new(Mutex::new(v))) }
}

impl<T: Default> Default for MutArc<T> {
  fn default() -> Self { T::default().into() }
}

impl<T> MutArc<T> {
  pub fn rc_deref(&self) -> MutexGuard<'_, T> { self.0.lock().unwrap() }

  pub fn rc_deref_mut(&self) -> MutexGuard<'_, T> { self.0.lock().unwrap() }
}

/// Arc-based atomic cell for `Copy` types. Lock-free where the platform
/// allows, cheaper than `MutArc` for flags and counters.
pub struct CellArc<T>(Arc<AtomicCell<T>>);

impl<T: Copy> Clone for CellArc<T> {
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<T: Copy> From<T> for CellArc<T> {
  fn from(v: T) -> Self { Self(Arc::new(AtomicCell::new(v))) }
}

impl<T: Copy + Default> Default for CellArc<T> {
  fn default() -> Self { T::default().into() }
}

impl<T: Copy> CellArc<T> {
  pub fn get(&self) -> T { self.0.load() }

  pub fn set(&self, value: T) { self.0.store(value) }
}

impl<T: Copy + Eq> CellArc<T> {
  pub fn compare_exchange(&self, current: T, new: T) -> Result<T, T> {
    self.0.compare_exchange(current, new)
  }
}
