//! Message dispatch: events, listeners and the pipeline that ties the
//! tokenizer, resolver and handlers together.

mod event;
mod listener;
mod pipeline;

pub use event::{ChannelId, CommandEvent, IncomingMessage, ScopeId, UserId};
pub use listener::{CommandListener, LoggingListener, MetricsListener};
pub use pipeline::{CommandEngine, DispatchOutcome};
