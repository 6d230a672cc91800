use std::ops::RangeFrom;
use std::time::Duration;

use crate::{
  cancellation::Cancellation,
  context::ExecutionContext,
  event::Never,
  observer::Observer,
  rc::MutArc,
  signal::Signal,
  subscriber::Subscriber,
};

/// Emits each element of `iter` with `period` between emissions on `ctx`;
/// the first element arrives after one full period.
pub fn from_iter_interval<I, C>(iter: I, period: Duration, ctx: C) -> FromIterInterval<I, C>
where
  I: IntoIterator,
  C: ExecutionContext,
{
  FromIterInterval { iter, period, ctx }
}

/// A monotone `u64` counter ticking every `period` on `ctx`.
pub fn interval<C>(period: Duration, ctx: C) -> FromIterInterval<RangeFrom<u64>, C>
where
  C: ExecutionContext,
{
  FromIterInterval { iter: 0u64.., period, ctx }
}

#[derive(Clone)]
pub struct FromIterInterval<I, C> {
  iter: I,
  period: Duration,
  ctx: C,
}

impl<I, C> Signal for FromIterInterval<I, C>
where
  I: IntoIterator,
  I::IntoIter: Send + 'static,
  I::Item: Send + 'static,
  C: ExecutionContext,
{
  type Item = I::Item;
  type Err = Never;

  fn actual_observe<O>(self, subscriber: Subscriber<O>)
  where
    O: Observer<I::Item, Never> + Send + 'static,
  {
    let FromIterInterval { iter, period, ctx } = self;
    // Only the timer for the upcoming tick is live; disposing the
    // subscription disarms it.
    let slot: MutArc<Option<Cancellation>> = MutArc::from(None);
    {
      let slot = slot.clone();
      subscriber.cancel.on_dispose(move || {
        if let Some(timer) = slot.rc_deref_mut().take() {
          timer.dispose();
        }
      });
    }
    schedule_tick(iter.into_iter(), subscriber, period, ctx, slot);
  }
}

fn schedule_tick<It, O, C>(
  mut iter: It,
  subscriber: Subscriber<O>,
  period: Duration,
  ctx: C,
  slot: MutArc<Option<Cancellation>>,
) where
  It: Iterator + Send + 'static,
  It::Item: Send + 'static,
  O: Observer<It::Item, Never> + Send + 'static,
  C: ExecutionContext,
{
  if subscriber.is_disposed() {
    return;
  }
  let tick_ctx = ctx.clone();
  let tick_slot = slot.clone();
  let timer = ctx.schedule_after(
    period,
    Box::new(move || match iter.next() {
      Some(v) => {
        let mut subscriber = subscriber;
        subscriber.next(v);
        schedule_tick(iter, subscriber, period, tick_ctx, tick_slot);
      }
      None => subscriber.complete(),
    }),
  );
  *slot.rc_deref_mut() = Some(timer);
}

#[cfg(test)]
mod test {
  use crate::context::VirtualContext;
  use crate::prelude::*;
  use std::sync::{Arc, Mutex};
  use std::time::Duration;

  #[test]
  fn elements_are_spaced_by_the_period() {
    let ctx = VirtualContext::new();
    let out = Arc::new(Mutex::new(Vec::new()));
    let c_out = out.clone();

    signal::from_iter_interval([10, 20, 30], Duration::from_millis(5), ctx.clone())
      .subscribe(move |v| c_out.lock().unwrap().push(v));

    assert!(out.lock().unwrap().is_empty());

    ctx.advance_and_run(Duration::from_millis(5), 1);
    assert_eq!(*out.lock().unwrap(), vec![10]);

    ctx.advance_and_run(Duration::from_millis(5), 2);
    assert_eq!(*out.lock().unwrap(), vec![10, 20, 30]);
  }

  #[test]
  fn interval_counts_up_until_disposed() {
    let ctx = VirtualContext::new();
    let out = Arc::new(Mutex::new(Vec::new()));
    let c_out = out.clone();

    let subscription = signal::interval(Duration::from_millis(1), ctx.clone())
      .subscribe(move |v| c_out.lock().unwrap().push(v));

    ctx.advance_and_run(Duration::from_millis(1), 3);
    subscription.dispose();
    ctx.advance_and_run(Duration::from_millis(1), 3);

    assert_eq!(*out.lock().unwrap(), vec![0, 1, 2]);
  }
}
