//! Capability levels and the authority that assigns them.
//!
//! Every command declares a minimum [`AccessLevel`]. Before a command is
//! tokenized, the pipeline asks the configured [`AccessAuthority`] for the
//! sender's level; a sender below the required level never reaches a handler.

mod authority;
mod level;

pub use authority::{AccessAuthority, StaticAuthority};
pub use level::AccessLevel;
