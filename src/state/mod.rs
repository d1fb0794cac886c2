//! Shared runtime state.
//!
//! Holds the per-scope prefix overrides that may change while the engine is
//! dispatching on many tasks at once.

mod dashmap_ext;
mod prefix;

pub use dashmap_ext::DashMapExt;
pub use prefix::PrefixStore;
