//! The operator runtime: one module per operator, each a small state
//! machine pairing an op struct (the wrapped signal) with an observer
//! wrapper (the per-subscription state).

pub mod amb;
pub mod buffer_count;
pub mod collect;
pub mod combine_latest;
pub mod concat;
pub mod concat_map;
pub mod default_if_empty;
pub mod delay;
pub mod distinct_until_changed;
pub mod element_at;
pub mod filter;
pub mod filter_map;
pub mod finalize;
pub mod flat_map;
pub mod flat_map_error;
pub mod handle_events;
pub mod ignore_elements;
pub mod map;
pub mod merge;
pub mod nils;
pub mod observe_on;
pub mod on_complete;
pub mod on_error;
pub mod pairwise;
pub mod pausable;
pub mod replace_error;
pub mod replay_latest;
pub mod retry;
pub mod scan;
pub mod skip;
pub mod skip_last;
pub mod start_with;
pub mod subscribe_on;
pub mod suppress_error;
pub mod switch_map;
pub mod take;
pub mod take_last;
pub mod take_until;
pub mod tap;
pub mod timeout;
pub mod window;
pub mod with_latest_from;
pub mod zip;
