use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crate::{
  cancellation::Cancellation,
  context::{ExecutionContext, Task},
  rc::CellArc,
};

/// A dedicated worker thread draining tasks in FIFO order.
///
/// All handles cloned from one `ThreadContext` feed the same worker; the
/// worker exits once every handle has been dropped. FIFO draining makes this
/// context serial by construction.
#[derive(Clone)]
pub struct ThreadContext {
  tx: mpsc::Sender<Task>,
}

impl ThreadContext {
  pub fn new() -> Self {
    let (tx, rx) = mpsc::channel::<Task>();
    thread::Builder::new()
      .name("rivulet-worker".into())
      .spawn(move || {
        for task in rx {
          task();
        }
      })
      .expect("failed to spawn rivulet worker thread");
    ThreadContext { tx }
  }
}

impl Default for ThreadContext {
  fn default() -> Self { ThreadContext::new() }
}

impl ExecutionContext for ThreadContext {
  fn schedule(&self, task: Task) {
    // A dead worker means every handle was dropped; nothing left to notify.
    let _ = self.tx.send(task);
  }

  fn schedule_after(&self, delay: Duration, task: Task) -> Cancellation {
    let cancelled = CellArc::from(false);
    let c_cancelled = cancelled.clone();
    let handle = self.clone();
    thread::spawn(move || {
      thread::sleep(delay);
      if !c_cancelled.get() {
        handle.schedule(task);
      }
    });
    Cancellation::new(move || cancelled.set(true))
  }
}
