//! Execution contexts: where scheduled work runs.
//!
//! Operators never talk to threads or clocks directly; everything flows
//! through an [`ExecutionContext`]. The immediate context runs work inline,
//! the thread and pool contexts move it off-thread, and the virtual context
//! replaces time with a manually driven clock for deterministic tests.

use std::time::Duration;

use crate::cancellation::Cancellation;

/// A unit of scheduled work.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// A first-class scheduler handle.
///
/// `schedule` enqueues a task for future execution on the context's
/// thread(s); `schedule_after` delays it, returning a [`Cancellation`] that
/// disarms the timer. A timer must not fire after its cancellation has been
/// disposed.
pub trait ExecutionContext: Clone + Send + Sync + 'static {
  fn schedule(&self, task: Task);

  fn schedule_after(&self, delay: Duration, task: Task) -> Cancellation;
}

mod immediate;
pub use immediate::ImmediateContext;
mod thread;
pub use thread::ThreadContext;
mod pool;
pub use pool::PoolContext;
mod virtual_time;
pub use virtual_time::VirtualContext;
