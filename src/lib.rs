//! A composable reactive-streams engine.
//!
//! A [`Signal`](signal::Signal) is a lazy description of a producer of
//! [`Event`](event::Event)s. Observing a signal starts production and hands
//! back a [`Cancellation`](cancellation::Cancellation); operators wrap a
//! signal into another signal by injecting an intermediate observer upstream.
//! Subjects are hot, multicast fan-out points that are both observers and
//! signals.
//!
//! Everything is `Send + 'static`: pipelines may span threads, and every
//! subscription guarantees serialized, terminal-final event delivery.

pub mod bind;
pub mod cancellation;
pub mod connectable;
pub mod context;
pub mod error;
pub mod event;
pub mod observer;
pub mod ops;
pub mod rc;
pub mod signal;
pub mod subject;
pub mod subscriber;
pub mod type_hint;

pub mod prelude;
