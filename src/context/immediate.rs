use std::time::Duration;

use crate::{
  cancellation::Cancellation,
  context::{ExecutionContext, Task},
};

/// Runs tasks synchronously on the calling thread.
///
/// `schedule_after` blocks the caller for the delay; pipelines that need
/// real timers should use [`PoolContext`](crate::context::PoolContext) or
/// drive a [`VirtualContext`](crate::context::VirtualContext) instead.
#[derive(Clone, Copy, Default)]
pub struct ImmediateContext;

impl ExecutionContext for ImmediateContext {
  fn schedule(&self, task: Task) { task(); }

  fn schedule_after(&self, delay: Duration, task: Task) -> Cancellation {
    if !delay.is_zero() {
      std::thread::sleep(delay);
    }
    task();
    Cancellation::default()
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn runs_inline() {
    let flag = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(false));
    let c_flag = flag.clone();
    ImmediateContext.schedule(Box::new(move || {
      c_flag.store(true, std::sync::atomic::Ordering::SeqCst);
    }));
    assert!(flag.load(std::sync::atomic::Ordering::SeqCst));
  }
}
