//! The signal abstraction and its combinator surface.

use std::sync::Arc;
use std::time::Duration;

use crate::{
  bind::{BindingObserver, BindingTarget},
  cancellation::Cancellation,
  connectable::{ConnectableSignal, RefCountSignal},
  context::ExecutionContext,
  event::Never,
  observer::{NextObserver, Observer},
  ops::{
    amb::AmbOp,
    buffer_count::BufferCountOp,
    collect::CollectOp,
    combine_latest::CombineLatestOp,
    concat::ConcatOp,
    concat_map::ConcatMapOp,
    default_if_empty::DefaultIfEmptyOp,
    delay::DelayOp,
    distinct_until_changed::DistinctUntilChangedOp,
    element_at::ElementAtOp,
    filter::FilterOp,
    filter_map::FilterMapOp,
    finalize::FinalizeOp,
    flat_map::FlatMapOp,
    flat_map_error::FlatMapErrorOp,
    handle_events::HandleEventsOp,
    ignore_elements::IgnoreElementsOp,
    map::MapOp,
    merge::MergeOp,
    nils::{IgnoreNilsOp, ReplaceNilsOp},
    observe_on::ObserveOnOp,
    on_complete::OnCompleteOp,
    on_error::OnErrorOp,
    pairwise::PairwiseOp,
    pausable::PausableOp,
    replace_error::ReplaceErrorOp,
    replay_latest::ReplayLatestOp,
    retry::{RetryConfig, RetryOp},
    scan::{ReduceOp, ScanOp},
    skip::SkipOp,
    skip_last::SkipLastOp,
    start_with::StartWithOp,
    subscribe_on::SubscribeOnOp,
    suppress_error::SuppressErrorOp,
    switch_map::SwitchMapOp,
    take::TakeOp,
    take_last::TakeLastOp,
    take_until::TakeUntilOp,
    tap::TapOp,
    timeout::TimeoutOp,
    window::WindowOp,
    with_latest_from::WithLatestFromOp,
    zip::ZipOp,
  },
  subject::{PassthroughSubject, ReplaySubject},
  subscriber::{Subscriber, TerminalGuard},
};

mod create;
pub use create::{create, SignalFn};
mod from_iter;
pub use from_iter::{from_iter, of, FromIter, Of};
mod trivial;
pub use trivial::{empty, never, throw, Empty, NeverSignal, Throw};
mod interval;
pub use interval::{from_iter_interval, interval, FromIterInterval};

/// A lazy description of an event producer.
///
/// A signal carries no state of its own; `actual_observe` starts production
/// into the given subscriber. Cold signals are `Clone` and run their producer
/// once per observation.
///
/// Delivery obligations on every implementation:
/// - events to one subscriber are serialized (no overlapping calls), and
/// - nothing is delivered after a terminal event or after the subscriber's
///   cancellation has been disposed.
pub trait Signal {
  type Item: Send + 'static;
  type Err: Send + 'static;

  fn actual_observe<O>(self, subscriber: Subscriber<O>)
  where
    O: Observer<Self::Item, Self::Err> + Send + 'static;
}

/// Combinators and entry points for every [`Signal`].
pub trait SignalExt: Signal + Sized {
  /// Start the producer, delivering events to `observer`. The returned
  /// [`Cancellation`] releases the subscription; it is disposed
  /// automatically once a terminal event has been delivered.
  fn observe<O>(self, observer: O) -> Cancellation
  where
    O: Observer<Self::Item, Self::Err> + Send + 'static,
  {
    let cancel = Cancellation::default();
    let guard = TerminalGuard { observer, cancel: cancel.clone() };
    self.actual_observe(Subscriber::new(guard, cancel.clone()));
    cancel
  }

  /// Observe with a `next` closure; terminal events are discarded. Pair
  /// with [`on_error`](SignalExt::on_error) /
  /// [`on_complete`](SignalExt::on_complete) to watch terminals.
  fn subscribe<F>(self, next: F) -> Cancellation
  where
    F: FnMut(Self::Item) + Send + 'static,
  {
    self.observe(NextObserver(next))
  }

  // ---------------- pure transformers ----------------

  /// Emits `f(x)` for each upstream value; terminals pass through.
  ///
  /// ```
  /// use rivulet::prelude::*;
  /// use std::sync::{Arc, Mutex};
  ///
  /// let out = Arc::new(Mutex::new(Vec::new()));
  /// let c_out = out.clone();
  /// signal::from_iter([1, 2, 3])
  ///   .map(|v| v * 2)
  ///   .subscribe(move |v| c_out.lock().unwrap().push(v));
  /// assert_eq!(*out.lock().unwrap(), vec![2, 4, 6]);
  /// ```
  fn map<B, F>(self, func: F) -> MapOp<Self, F>
  where
    F: FnMut(Self::Item) -> B,
  {
    MapOp { source: self, func }
  }

  /// Emits only the values satisfying `predicate`.
  fn filter<F>(self, predicate: F) -> FilterOp<Self, F>
  where
    F: FnMut(&Self::Item) -> bool,
  {
    FilterOp { source: self, predicate }
  }

  /// Map and filter in one pass: emits the `Some` results of `func`.
  fn filter_map<B, F>(self, func: F) -> FilterMapOp<Self, F>
  where
    F: FnMut(Self::Item) -> Option<B>,
  {
    FilterMapOp { source: self, func }
  }

  /// Swallows every value, forwarding only the terminal event.
  fn ignore_elements(self) -> IgnoreElementsOp<Self> { IgnoreElementsOp { source: self } }

  /// For optional elements, emits only the inner values of `Some`.
  fn ignore_nils<U>(self) -> IgnoreNilsOp<Self>
  where
    Self: Signal<Item = Option<U>>,
    U: Send + 'static,
  {
    IgnoreNilsOp { source: self }
  }

  /// For optional elements, substitutes `default` for each `None`.
  fn replace_nils<U>(self, default: U) -> ReplaceNilsOp<Self, U>
  where
    Self: Signal<Item = Option<U>>,
    U: Clone + Send + 'static,
  {
    ReplaceNilsOp { source: self, default }
  }

  /// Turns `Failed` into `Completed`, producing a non-failing signal.
  /// With `log` set, the dropped error is reported through `tracing`.
  fn suppress_error(self, log: bool) -> SuppressErrorOp<Self> {
    SuppressErrorOp { source: self, log }
  }

  /// Replaces `Failed` with `Next(value)` followed by `Completed`.
  fn replace_error(self, value: Self::Item) -> ReplaceErrorOp<Self, Self::Item> {
    ReplaceErrorOp { source: self, value }
  }

  // ---------------- scans and accumulators ----------------

  /// Emits `seed` on subscription, then a running fold of the upstream.
  fn scan<B, F>(self, seed: B, func: F) -> ScanOp<Self, B, F>
  where
    B: Clone,
    F: FnMut(B, Self::Item) -> B,
  {
    ScanOp { source: self, seed, func }
  }

  /// Emits only the final fold result, on upstream completion.
  fn reduce<B, F>(self, seed: B, func: F) -> ReduceOp<Self, B, F>
  where
    F: FnMut(B, Self::Item) -> B,
  {
    ReduceOp { source: self, seed, func }
  }

  /// Gathers every value into one `Vec`, emitted on completion.
  fn collect(self) -> CollectOp<Self> { CollectOp { source: self } }

  /// Emits `(previous, current)` pairs; `previous` is `None` for the first
  /// value.
  fn pairwise(self) -> PairwiseOp<Self> { PairwiseOp { source: self } }

  // ---------------- counting and positional ----------------

  /// Emits the first `count` values, then completes and cancels upstream.
  /// `count == 0` completes without subscribing upstream at all.
  fn take(self, count: usize) -> TakeOp<Self> { TakeOp { source: self, count } }

  /// Emits only the first value.
  fn first(self) -> TakeOp<Self> { self.take(1) }

  /// Buffers the last `count` values and emits them on completion.
  fn take_last(self, count: usize) -> TakeLastOp<Self> { TakeLastOp { source: self, count } }

  /// Emits only the final value, on completion.
  fn last(self) -> TakeLastOp<Self> { self.take_last(1) }

  /// Discards the first `count` values.
  fn skip(self, count: usize) -> SkipOp<Self> { SkipOp { source: self, count } }

  /// Suppresses the trailing `count` values.
  fn skip_last(self, count: usize) -> SkipLastOp<Self> { SkipLastOp { source: self, count } }

  /// Emits the value at zero-based `index`, then completes.
  fn element_at(self, index: usize) -> ElementAtOp<Self> { ElementAtOp { source: self, index } }

  /// Emits `Vec`s of exactly `size` values; a partial tail is dropped on
  /// completion.
  fn buffer_count(self, size: usize) -> BufferCountOp<Self> {
    BufferCountOp { source: self, size }
  }

  /// Emits nested signals, each carrying up to `size` upstream values.
  fn window(self, size: usize) -> WindowOp<Self> { WindowOp { source: self, size } }

  // ---------------- deduplication ----------------

  /// Suppresses consecutive structural duplicates.
  fn distinct_until_changed(
    self,
  ) -> DistinctUntilChangedOp<Self, fn(&Self::Item, &Self::Item) -> bool>
  where
    Self::Item: PartialEq,
  {
    let eq: fn(&Self::Item, &Self::Item) -> bool = |a, b| a == b;
    DistinctUntilChangedOp { source: self, comparer: eq }
  }

  /// Suppresses consecutive duplicates under `comparer`.
  fn distinct_until_changed_by<F>(self, comparer: F) -> DistinctUntilChangedOp<Self, F>
  where
    F: FnMut(&Self::Item, &Self::Item) -> bool,
  {
    DistinctUntilChangedOp { source: self, comparer }
  }

  // ---------------- injection ----------------

  /// Emits `value` synchronously on subscription, then pipes upstream.
  fn start_with(self, value: Self::Item) -> StartWithOp<Self, Self::Item> {
    StartWithOp { source: self, value }
  }

  /// On upstream completion, continues with `other`. A failure on either
  /// side terminates immediately.
  fn concat<S2>(self, other: S2) -> ConcatOp<Self, S2>
  where
    S2: Signal<Item = Self::Item, Err = Self::Err>,
  {
    ConcatOp { first: self, second: other }
  }

  /// If upstream completes without a value, emits `default` first.
  fn default_if_empty(self, default: Self::Item) -> DefaultIfEmptyOp<Self, Self::Item> {
    DefaultIfEmptyOp { source: self, default }
  }

  // ---------------- combinations over two signals ----------------

  /// Pairs the latest values of both sides once each has produced, emitting
  /// on every subsequent value from either.
  fn combine_latest<S2>(
    self,
    other: S2,
  ) -> CombineLatestOp<Self, S2, fn(Self::Item, S2::Item) -> (Self::Item, S2::Item)>
  where
    S2: Signal<Err = Self::Err>,
  {
    let pair: fn(Self::Item, S2::Item) -> (Self::Item, S2::Item) = |a, b| (a, b);
    CombineLatestOp { source_a: self, source_b: other, binary_op: pair }
  }

  /// `combine_latest` with a projection instead of tuples.
  fn combine_latest_with<S2, B, F>(self, other: S2, binary_op: F) -> CombineLatestOp<Self, S2, F>
  where
    S2: Signal<Err = Self::Err>,
    F: FnMut(Self::Item, S2::Item) -> B,
  {
    CombineLatestOp { source_a: self, source_b: other, binary_op }
  }

  /// Pairs values by position. Completes as soon as an exhausted side can
  /// no longer supply the next index.
  fn zip<S2>(self, other: S2) -> ZipOp<Self, S2>
  where
    S2: Signal<Err = Self::Err>,
  {
    ZipOp { source_a: self, source_b: other }
  }

  /// Interleaves both sides. Completes when both complete; fails on the
  /// first failure from either.
  fn merge<S2>(self, other: S2) -> MergeOp<Self, S2>
  where
    S2: Signal<Item = Self::Item, Err = Self::Err>,
  {
    MergeOp { source_a: self, source_b: other }
  }

  /// Races both sides: whichever delivers an event first wins, and the
  /// loser is cancelled.
  fn amb<S2>(self, other: S2) -> AmbOp<Self, S2>
  where
    S2: Signal<Item = Self::Item, Err = Self::Err>,
  {
    AmbOp { source_a: self, source_b: other }
  }

  /// Emits `(a, latest_b)` for each upstream `a`, once `other` has produced
  /// at least one value. Completes when the primary completes.
  fn with_latest_from<S2>(self, other: S2) -> WithLatestFromOp<Self, S2>
  where
    S2: Signal<Err = Self::Err>,
  {
    WithLatestFromOp { source: self, other }
  }

  // ---------------- higher-order and flattening ----------------

  /// Maps each value to an inner signal and merges all inner emissions.
  /// Completes when upstream and every inner signal have completed.
  fn flat_map<S2, F>(self, func: F) -> FlatMapOp<Self, F>
  where
    S2: Signal<Err = Self::Err>,
    F: FnMut(Self::Item) -> S2,
  {
    FlatMapOp { source: self, func }
  }

  /// Maps each value to an inner signal, cancelling the previous inner
  /// subscription on every new value.
  fn switch_map<S2, F>(self, func: F) -> SwitchMapOp<Self, F>
  where
    S2: Signal<Err = Self::Err>,
    F: FnMut(Self::Item) -> S2,
  {
    SwitchMapOp { source: self, func }
  }

  /// Maps each value to an inner signal and drains them strictly one after
  /// another, buffering pending values.
  fn concat_map<S2, F>(self, func: F) -> ConcatMapOp<Self, F>
  where
    S2: Signal<Err = Self::Err>,
    F: FnMut(Self::Item) -> S2,
  {
    ConcatMapOp { source: self, func }
  }

  /// On upstream failure, continues with the signal `func` builds from the
  /// error.
  fn flat_map_error<S2, F>(self, func: F) -> FlatMapErrorOp<Self, F>
  where
    S2: Signal<Item = Self::Item>,
    F: FnMut(Self::Err) -> S2,
  {
    FlatMapErrorOp { source: self, func }
  }

  // ---------------- timing and control ----------------

  /// Fails with `err` if no event arrives within `duration`. The timer is
  /// armed on subscription and re-armed on every value.
  fn timeout<C>(self, duration: Duration, err: Self::Err, ctx: C) -> TimeoutOp<Self, Self::Err, C>
  where
    C: ExecutionContext,
    Self::Err: Clone,
  {
    TimeoutOp { source: self, duration, err, ctx }
  }

  /// Gates delivery by the latest boolean from `control`: `true` pauses,
  /// and values arriving while paused are dropped.
  fn pausable<G>(self, control: G) -> PausableOp<Self, G>
  where
    G: Signal<Item = bool, Err = Self::Err>,
  {
    PausableOp { source: self, control }
  }

  /// Resubscribes on failure up to `count` times, then forwards the last
  /// failure; `count + 1` attempts in total.
  fn retry(self, count: usize) -> RetryOp<Self, crate::context::ImmediateContext>
  where
    Self: Clone,
  {
    RetryOp {
      source: self,
      config: RetryConfig::new().count(count),
      ctx: crate::context::ImmediateContext,
    }
  }

  /// `retry` driven by a [`RetryConfig`], rescheduling attempts on `ctx`.
  fn retry_with_config<C>(self, config: RetryConfig, ctx: C) -> RetryOp<Self, C>
  where
    Self: Clone,
    C: ExecutionContext,
  {
    RetryOp { source: self, config, ctx }
  }

  /// Runs a side effect at each lifecycle point, forwarding every event
  /// unchanged. `on_terminal` receives `Some(&err)` for failures and `None`
  /// for completion; `on_cancel` runs only if the subscription is disposed
  /// before a terminal.
  fn handle_events<FSub, FNext, FTerm, FCancel>(
    self,
    on_subscribe: FSub,
    on_next: FNext,
    on_terminal: FTerm,
    on_cancel: FCancel,
  ) -> HandleEventsOp<Self, FSub, FNext, FTerm, FCancel>
  where
    FSub: FnOnce(),
    FNext: FnMut(&Self::Item),
    FTerm: FnOnce(Option<&Self::Err>),
    FCancel: FnOnce(),
  {
    HandleEventsOp { source: self, on_subscribe, on_next, on_terminal, on_cancel }
  }

  /// Runs `func` on each value before forwarding it.
  fn tap<F>(self, func: F) -> TapOp<Self, F>
  where
    F: FnMut(&Self::Item),
  {
    TapOp { source: self, func }
  }

  /// Runs `func` when the upstream completes successfully.
  fn on_complete<F>(self, func: F) -> OnCompleteOp<Self, F>
  where
    F: FnOnce(),
  {
    OnCompleteOp { source: self, func }
  }

  /// Consumes upstream failures with `func`, yielding a non-failing signal.
  fn on_error<F>(self, func: F) -> OnErrorOp<Self, F>
  where
    F: FnOnce(Self::Err),
  {
    OnErrorOp { source: self, func }
  }

  /// Runs `func` exactly once when the subscription ends, terminal or not.
  fn finalize<F>(self, func: F) -> FinalizeOp<Self, F>
  where
    F: FnOnce(),
  {
    FinalizeOp { source: self, func }
  }

  /// Completes (and cancels both sides) on the first event from `trigger`.
  fn take_until<T>(self, trigger: T) -> TakeUntilOp<Self, T>
  where
    T: Signal<Err = Self::Err>,
  {
    TakeUntilOp { source: self, trigger }
  }

  /// Re-emits the latest upstream value on each `trigger` event, once
  /// upstream has produced. Completes when upstream completes.
  fn replay_latest<T>(self, trigger: T) -> ReplayLatestOp<Self, T>
  where
    T: Signal<Err = Self::Err>,
  {
    ReplayLatestOp { source: self, trigger }
  }

  // ---------------- scheduling ----------------

  /// Performs the upstream subscription (and its teardown) on `ctx`.
  fn subscribe_on<C>(self, ctx: C) -> SubscribeOnOp<Self, C>
  where
    C: ExecutionContext,
  {
    SubscribeOnOp { source: self, ctx }
  }

  /// Delivers every downstream event on `ctx`, preserving order even when
  /// the context is backed by multiple threads.
  fn observe_on<C>(self, ctx: C) -> ObserveOnOp<Self, C>
  where
    C: ExecutionContext,
  {
    ObserveOnOp { source: self, ctx }
  }

  /// Shifts every event by `duration` on `ctx`.
  fn delay<C>(self, duration: Duration, ctx: C) -> DelayOp<Self, C>
  where
    C: ExecutionContext,
  {
    DelayOp { source: self, duration, ctx }
  }

  // ---------------- multicast ----------------

  /// Wraps into a connectable signal backed by a passthrough subject:
  /// observers attach to the subject, and `connect()` subscribes the
  /// upstream exactly once.
  fn publish(self) -> ConnectableSignal<Self, PassthroughSubject<Self::Item, Self::Err>> {
    ConnectableSignal::new(self, PassthroughSubject::new())
  }

  /// Like `publish`, but late observers first receive the up-to-`limit`
  /// most recent values (and any terminal).
  fn replay(self, limit: usize) -> ConnectableSignal<Self, ReplaySubject<Self::Item, Self::Err>> {
    ConnectableSignal::new(self, ReplaySubject::new(limit))
  }

  /// Connectable multicast through a caller-supplied subject.
  fn multicast<Sub>(self, subject: Sub) -> ConnectableSignal<Self, Sub> {
    ConnectableSignal::new(self, subject)
  }

  /// `publish` with reference-counted auto-connect: the upstream is
  /// subscribed with the first observer and cancelled with the last.
  fn share(self) -> RefCountSignal<Self> {
    RefCountSignal::new(ConnectableSignal::new(self, PassthroughSubject::new()))
  }

  // ---------------- binding ----------------

  /// Absorb a non-failing signal into externally owned mutable state.
  ///
  /// Events are delivered on the target's binding context; the returned
  /// cancellation also joins the target's [`CancelBag`], tying the binding
  /// to the target's lifetime. The target is held weakly.
  ///
  /// [`CancelBag`]: crate::cancellation::CancelBag
  fn bind_to<T, F>(self, target: &Arc<T>, update: F) -> Cancellation
  where
    Self: Signal<Err = Never>,
    T: BindingTarget,
    F: FnMut(&T, Self::Item) + Send + 'static,
  {
    let ctx = target.binding_context();
    let cancel =
      self.observe(BindingObserver::new(Arc::downgrade(target), update, ctx));
    target.cancellations().add(cancel.clone());
    cancel
  }
}

impl<S: Signal> SignalExt for S {}
