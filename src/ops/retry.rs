//! Retry operator: resubscribe the upstream after failures.

use std::time::Duration;

use crate::{
  cancellation::Cancellation,
  context::ExecutionContext,
  observer::Observer,
  signal::Signal,
  subscriber::Subscriber,
};

/// Retry policy: how many times, how long between attempts, and whether a
/// successful value resets the attempt counter.
#[derive(Clone, Default)]
pub struct RetryConfig {
  count: Option<usize>,
  delay: Option<Duration>,
  reset_on_success: bool,
}

impl RetryConfig {
  pub fn new() -> Self { RetryConfig::default() }

  /// Retry at most `count` times; `count + 1` subscriptions in total.
  /// Unset means retry forever.
  pub fn count(mut self, count: usize) -> Self {
    self.count = Some(count);
    self
  }

  /// Wait `delay` before each resubscription.
  pub fn delay(mut self, delay: Duration) -> Self {
    self.delay = Some(delay);
    self
  }

  /// A delivered value resets the attempt counter.
  pub fn reset_on_success(mut self) -> Self {
    self.reset_on_success = true;
    self
  }
}

/// On upstream failure, resubscribes according to the [`RetryConfig`], then
/// forwards the last failure once the budget is spent. Each attempt runs
/// on the configured context.
#[derive(Clone)]
pub struct RetryOp<S, C> {
  pub(crate) source: S,
  pub(crate) config: RetryConfig,
  pub(crate) ctx: C,
}

impl<S, C> Signal for RetryOp<S, C>
where
  S: Signal + Clone + Send + 'static,
  C: ExecutionContext,
{
  type Item = S::Item;
  type Err = S::Err;

  fn actual_observe<O>(self, subscriber: Subscriber<O>)
  where
    O: Observer<S::Item, S::Err> + Send + 'static,
  {
    let RetryOp { source, config, ctx } = self;
    let Subscriber { observer, cancel } = subscriber;
    subscribe_attempt(source, config, ctx, observer, cancel, 0, None);
  }
}

fn subscribe_attempt<S, O, C>(
  source: S,
  config: RetryConfig,
  ctx: C,
  observer: O,
  chain: Cancellation,
  retries_used: usize,
  delay: Option<Duration>,
) where
  S: Signal + Clone + Send + 'static,
  O: Observer<S::Item, S::Err> + Send + 'static,
  C: ExecutionContext,
{
  let task_chain = chain.clone();
  let task_ctx = ctx.clone();
  let task = Box::new(move || {
    if task_chain.is_disposed() {
      return;
    }
    let attempt = Cancellation::default();
    task_chain.add(attempt.clone());
    source.clone().actual_observe(Subscriber {
      observer: RetryObserver {
        source,
        config,
        ctx: task_ctx,
        observer,
        chain: task_chain,
        retries_used,
        attempt: attempt.clone(),
      },
      cancel: attempt,
    });
  });
  match delay {
    None => ctx.schedule(task),
    Some(d) => {
      let timer = ctx.schedule_after(d, task);
      chain.add(timer);
    }
  }
}

pub struct RetryObserver<S, O, C> {
  source: S,
  config: RetryConfig,
  ctx: C,
  observer: O,
  chain: Cancellation,
  retries_used: usize,
  attempt: Cancellation,
}

impl<Item, Err, S, O, C> Observer<Item, Err> for RetryObserver<S, O, C>
where
  S: Signal<Item = Item, Err = Err> + Clone + Send + 'static,
  O: Observer<Item, Err> + Send + 'static,
  C: ExecutionContext,
{
  fn next(&mut self, value: Item) {
    if self.retries_used > 0 && self.config.reset_on_success {
      self.retries_used = 0;
    }
    self.observer.next(value);
  }

  fn error(self, err: Err) {
    let RetryObserver { source, config, ctx, observer, chain, mut retries_used, attempt } = self;
    attempt.dispose();
    if chain.is_disposed() {
      return;
    }
    if config.count.map_or(true, |count| retries_used < count) {
      retries_used += 1;
      let delay = config.delay;
      subscribe_attempt(source, config, ctx, observer, chain, retries_used, delay);
    } else {
      observer.error(err);
    }
  }

  fn complete(self) { self.observer.complete(); }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}
