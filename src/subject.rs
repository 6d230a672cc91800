//! Hot, multicast sources.
//!
//! A subject is both an observer (events are pushed into it from outside)
//! and a signal (observers attach to it). All flavors share one registry
//! core that serializes emission: concurrent or re-entrant sends are queued
//! and drained in order by whichever thread is currently broadcasting, so a
//! subject never deadlocks on attach-during-emit and never interleaves two
//! broadcasts.

mod registry;

mod passthrough;
pub use passthrough::PassthroughSubject;
mod replay;
pub use replay::ReplaySubject;
mod property;
pub use property::Property;
