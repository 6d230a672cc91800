//! Convenient glob import for the whole public surface.

pub use crate::bind::BindingTarget;
pub use crate::cancellation::{CancelBag, Cancellation};
pub use crate::connectable::{ConnectableSignal, RefCountSignal};
pub use crate::context::{
  ExecutionContext, ImmediateContext, PoolContext, ThreadContext, VirtualContext,
};
pub use crate::error::SignalError;
pub use crate::event::{Event, Never};
pub use crate::observer::{BoxedObserver, Observer};
pub use crate::ops::retry::RetryConfig;
pub use crate::signal;
pub use crate::signal::{Signal, SignalExt};
pub use crate::subject::{PassthroughSubject, Property, ReplaySubject};
pub use crate::subscriber::Subscriber;
