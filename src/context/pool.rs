use std::time::Duration;

use futures::{
  executor::ThreadPool,
  future::{self, AbortHandle, Abortable},
};
use futures_timer::Delay;
use lazy_static::lazy_static;

use crate::{
  cancellation::Cancellation,
  context::{ExecutionContext, Task},
};

lazy_static! {
  static ref GLOBAL_POOL: ThreadPool = ThreadPool::builder()
    .name_prefix("rivulet-pool-")
    .create()
    .expect("failed to build the global thread pool");
}

/// A thread-pool context. Tasks may run concurrently; operators that shift
/// delivery here serialize per subscription themselves.
#[derive(Clone)]
pub struct PoolContext {
  pool: ThreadPool,
}

impl PoolContext {
  /// The process-wide shared pool.
  pub fn global() -> Self { PoolContext { pool: GLOBAL_POOL.clone() } }

  pub fn new(pool: ThreadPool) -> Self { PoolContext { pool } }
}

impl ExecutionContext for PoolContext {
  fn schedule(&self, task: Task) {
    self.pool.spawn_ok(future::lazy(move |_| task()));
  }

  fn schedule_after(&self, delay: Duration, task: Task) -> Cancellation {
    let (handle, registration) = AbortHandle::new_pair();
    let timed = Abortable::new(
      async move {
        Delay::new(delay).await;
        task();
      },
      registration,
    );
    self.pool.spawn_ok(async move {
      let _ = timed.await;
    });
    Cancellation::new(move || handle.abort())
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use std::sync::{
    atomic::{AtomicUsize, Ordering},
    mpsc, Arc,
  };

  #[test]
  fn runs_off_thread() {
    let (tx, rx) = mpsc::channel();
    PoolContext::global().schedule(Box::new(move || {
      tx.send(std::thread::current().name().map(str::to_owned)).unwrap();
    }));
    let name = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert!(name.unwrap_or_default().starts_with("rivulet-pool-"));
  }

  #[test]
  fn delayed_task_fires_after_the_delay() {
    let (tx, rx) = mpsc::channel();
    PoolContext::global().schedule_after(
      Duration::from_millis(10),
      Box::new(move || {
        tx.send(()).unwrap();
      }),
    );
    rx.recv_timeout(Duration::from_secs(5)).unwrap();
  }

  #[test]
  fn aborted_timer_stays_silent() {
    let hits = Arc::new(AtomicUsize::new(0));
    let c_hits = hits.clone();
    let timer = PoolContext::global().schedule_after(
      Duration::from_millis(30),
      Box::new(move || {
        c_hits.fetch_add(1, Ordering::SeqCst);
      }),
    );
    timer.dispose();
    std::thread::sleep(Duration::from_millis(100));
    assert_eq!(hits.load(Ordering::SeqCst), 0);
  }
}
