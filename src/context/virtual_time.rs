use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::{
  cancellation::Cancellation,
  context::{ExecutionContext, Task},
  rc::CellArc,
};

struct Scheduled {
  due: Duration,
  seq: u64,
  cancelled: CellArc<bool>,
  task: Task,
}

struct VirtualQueue {
  now: Duration,
  next_seq: u64,
  tasks: Vec<Scheduled>,
}

/// A manually driven clock for deterministic timing tests.
///
/// Nothing runs until the clock is advanced and [`run_tasks`] drains every
/// task whose deadline has passed, in deadline order (submission order on
/// ties). Tasks scheduled while draining are picked up in the same drain if
/// already due.
///
/// [`run_tasks`]: VirtualContext::run_tasks
#[derive(Clone)]
pub struct VirtualContext {
  queue: Arc<Mutex<VirtualQueue>>,
}

impl VirtualContext {
  pub fn new() -> Self {
    VirtualContext {
      queue: Arc::new(Mutex::new(VirtualQueue {
        now: Duration::ZERO,
        next_seq: 0,
        tasks: Vec::new(),
      })),
    }
  }

  /// The current virtual instant, as an offset from the context's creation.
  pub fn now(&self) -> Duration { self.queue.lock().unwrap().now }

  /// Move the clock forward without running anything.
  pub fn advance(&self, duration: Duration) {
    self.queue.lock().unwrap().now += duration;
  }

  /// Run every task whose deadline is at or before the current instant.
  pub fn run_tasks(&self) {
    loop {
      let task = {
        let mut queue = self.queue.lock().unwrap();
        queue.tasks.retain(|t| !t.cancelled.get());
        let due = queue
          .tasks
          .iter()
          .enumerate()
          .filter(|(_, t)| t.due <= queue.now)
          .min_by_key(|(_, t)| (t.due, t.seq))
          .map(|(i, _)| i);
        match due {
          Some(i) => queue.tasks.remove(i),
          None => return,
        }
      };
      (task.task)();
    }
  }

  /// `times` rounds of advancing by `duration` and draining.
  pub fn advance_and_run(&self, duration: Duration, times: usize) {
    for _ in 0..times {
      self.advance(duration);
      self.run_tasks();
    }
  }
}

impl Default for VirtualContext {
  fn default() -> Self { VirtualContext::new() }
}

impl ExecutionContext for VirtualContext {
  fn schedule(&self, task: Task) {
    self.schedule_after(Duration::ZERO, task);
  }

  fn schedule_after(&self, delay: Duration, task: Task) -> Cancellation {
    let cancelled = CellArc::from(false);
    let c_cancelled = cancelled.clone();
    let mut queue = self.queue.lock().unwrap();
    let due = queue.now + delay;
    let seq = queue.next_seq;
    queue.next_seq += 1;
    queue.tasks.push(Scheduled { due, seq, cancelled, task });
    Cancellation::new(move || c_cancelled.set(true))
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
  };

  #[test]
  fn tasks_wait_for_the_clock() {
    let ctx = VirtualContext::new();
    let hits = Arc::new(AtomicUsize::new(0));
    let c_hits = hits.clone();

    ctx.schedule_after(
      Duration::from_millis(100),
      Box::new(move || {
        c_hits.fetch_add(1, Ordering::SeqCst);
      }),
    );

    ctx.advance(Duration::from_millis(99));
    ctx.run_tasks();
    assert_eq!(hits.load(Ordering::SeqCst), 0);

    ctx.advance(Duration::from_millis(1));
    ctx.run_tasks();
    assert_eq!(hits.load(Ordering::SeqCst), 1);
  }

  #[test]
  fn ties_run_in_submission_order() {
    let ctx = VirtualContext::new();
    let out = Arc::new(Mutex::new(Vec::new()));

    for i in 0..3 {
      let c_out = out.clone();
      ctx.schedule_after(
        Duration::from_millis(10),
        Box::new(move || c_out.lock().unwrap().push(i)),
      );
    }

    ctx.advance_and_run(Duration::from_millis(10), 1);
    assert_eq!(*out.lock().unwrap(), vec![0, 1, 2]);
  }

  #[test]
  fn cancelled_tasks_are_skipped() {
    let ctx = VirtualContext::new();
    let hits = Arc::new(AtomicUsize::new(0));
    let c_hits = hits.clone();

    let timer = ctx.schedule_after(
      Duration::from_millis(10),
      Box::new(move || {
        c_hits.fetch_add(1, Ordering::SeqCst);
      }),
    );
    timer.dispose();

    ctx.advance_and_run(Duration::from_millis(10), 1);
    assert_eq!(hits.load(Ordering::SeqCst), 0);
  }

  #[test]
  fn rescheduling_inside_a_task_lands_in_the_same_drain_when_due() {
    let ctx = VirtualContext::new();
    let hits = Arc::new(AtomicUsize::new(0));
    let c_ctx = ctx.clone();
    let c_hits = hits.clone();

    ctx.schedule(Box::new(move || {
      c_hits.fetch_add(1, Ordering::SeqCst);
      let cc_hits = c_hits.clone();
      c_ctx.schedule(Box::new(move || {
        cc_hits.fetch_add(1, Ordering::SeqCst);
      }));
    }));

    ctx.run_tasks();
    assert_eq!(hits.load(Ordering::SeqCst), 2);
  }
}
