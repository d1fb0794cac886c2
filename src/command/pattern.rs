//! Patterns: an ordered argument shape plus the handler it routes to.

use super::spec::ArgumentSpec;
use crate::dispatch::CommandEvent;
use crate::error::{HandlerResult, PatternError};
use async_trait::async_trait;
use chatcmd_syntax::{Argument, ArgumentType, Options};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Everything a handler receives for one invocation.
///
/// `event` and `options` are only populated when the pattern asked for them.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub event: Option<Arc<CommandEvent>>,
    pub options: Option<Options>,
    pub arguments: Vec<Argument>,
}

impl Invocation {
    /// Argument at `index`, in pattern order.
    pub fn arg(&self, index: usize) -> Option<&Argument> {
        self.arguments.get(index)
    }
}

/// Code run when a pattern is selected.
#[async_trait]
pub trait PatternHandler: Send + Sync {
    async fn handle(&self, invocation: Invocation) -> HandlerResult;
}

/// Adapter that lets an async closure act as a [`PatternHandler`].
pub struct FnHandler<F>(F);

#[async_trait]
impl<F, Fut> PatternHandler for FnHandler<F>
where
    F: Fn(Invocation) -> Fut + Send + Sync,
    Fut: Future<Output = HandlerResult> + Send,
{
    async fn handle(&self, invocation: Invocation) -> HandlerResult {
        (self.0)(invocation).await
    }
}

/// Wrap an async closure as a shareable handler.
pub fn handler_fn<F, Fut>(f: F) -> Arc<dyn PatternHandler>
where
    F: Fn(Invocation) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    Arc::new(FnHandler(f))
}

/// A registered argument shape of a command.
#[derive(Clone)]
pub struct Pattern {
    args: Vec<ArgumentSpec>,
    wants_event: bool,
    wants_options: bool,
    handler: Arc<dyn PatternHandler>,
}

impl Pattern {
    /// Build a pattern, checking that the shape is deliverable.
    pub fn new(
        args: Vec<ArgumentSpec>,
        wants_event: bool,
        wants_options: bool,
        handler: Arc<dyn PatternHandler>,
    ) -> Result<Self, PatternError> {
        if let Some(pos) = args.iter().position(ArgumentSpec::is_variadic) {
            if pos + 1 != args.len() {
                return Err(PatternError::VariadicNotLast);
            }
        }
        if !wants_event && (wants_options || !args.is_empty()) {
            return Err(PatternError::MissingEvent);
        }
        Ok(Self {
            args,
            wants_event,
            wants_options,
            handler,
        })
    }

    #[inline]
    pub fn args(&self) -> &[ArgumentSpec] {
        &self.args
    }

    #[inline]
    pub fn wants_event(&self) -> bool {
        self.wants_event
    }

    #[inline]
    pub fn wants_options(&self) -> bool {
        self.wants_options
    }

    #[inline]
    pub fn handler(&self) -> &Arc<dyn PatternHandler> {
        &self.handler
    }

    /// Whether the last slot absorbs the remaining tokens.
    pub fn is_variadic(&self) -> bool {
        self.args.last().is_some_and(ArgumentSpec::is_variadic)
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pattern")
            .field("args", &self.args)
            .field("wants_event", &self.wants_event)
            .field("wants_options", &self.wants_options)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, spec) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", spec)?;
        }
        Ok(())
    }
}

enum Slot {
    Descriptor(String),
    Spec(ArgumentSpec),
}

/// Declarative description of a pattern, resolved when its command is built.
///
/// ```ignore
/// PatternDescriptor::new(handler)
///     .with_event()
///     .args(["'add'", "STRING", "USER"])
/// ```
pub struct PatternDescriptor {
    slots: Vec<Slot>,
    wants_event: bool,
    wants_options: bool,
    handler: Arc<dyn PatternHandler>,
}

impl PatternDescriptor {
    pub fn new(handler: Arc<dyn PatternHandler>) -> Self {
        Self {
            slots: Vec::new(),
            wants_event: false,
            wants_options: false,
            handler,
        }
    }

    /// Deliver the command event to the handler.
    pub fn with_event(mut self) -> Self {
        self.wants_event = true;
        self
    }

    /// Deliver the option map to the handler.
    pub fn with_options(mut self) -> Self {
        self.wants_options = true;
        self
    }

    /// Append one slot in descriptor syntax.
    pub fn arg(mut self, descriptor: impl Into<String>) -> Self {
        self.slots.push(Slot::Descriptor(descriptor.into()));
        self
    }

    /// Append slots in descriptor syntax.
    pub fn args<I, S>(mut self, descriptors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.slots
            .extend(descriptors.into_iter().map(|d| Slot::Descriptor(d.into())));
        self
    }

    /// Append an already-built slot.
    pub fn spec(mut self, spec: ArgumentSpec) -> Self {
        self.slots.push(Slot::Spec(spec));
        self
    }

    /// Descriptor text, for error reports.
    pub(crate) fn describe(&self) -> String {
        self.slots
            .iter()
            .map(|slot| match slot {
                Slot::Descriptor(text) => text.clone(),
                Slot::Spec(spec) => spec.to_string(),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Resolve descriptors against the known types and build the pattern.
    pub(crate) fn resolve(self, custom: &[ArgumentType]) -> Result<Pattern, PatternError> {
        let args = self
            .slots
            .into_iter()
            .map(|slot| match slot {
                Slot::Descriptor(text) => ArgumentSpec::parse(&text, custom),
                Slot::Spec(spec) => Ok(spec),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Pattern::new(args, self.wants_event, self.wants_options, self.handler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> Arc<dyn PatternHandler> {
        handler_fn(|_| async { Ok(()) })
    }

    #[test]
    fn test_variadic_must_be_last() {
        let err = PatternDescriptor::new(noop())
            .with_event()
            .args(["WORD*", "INTEGER"])
            .resolve(&[])
            .unwrap_err();
        assert_eq!(err, PatternError::VariadicNotLast);
    }

    #[test]
    fn test_arguments_require_event() {
        let err = PatternDescriptor::new(noop())
            .arg("STRING")
            .resolve(&[])
            .unwrap_err();
        assert_eq!(err, PatternError::MissingEvent);

        let err = PatternDescriptor::new(noop())
            .with_options()
            .resolve(&[])
            .unwrap_err();
        assert_eq!(err, PatternError::MissingEvent);

        assert!(PatternDescriptor::new(noop()).resolve(&[]).is_ok());
    }

    #[test]
    fn test_display_and_describe() {
        let descriptor = PatternDescriptor::new(noop())
            .with_event()
            .args(["'add'", "string"])
            .spec(ArgumentSpec::variadic(ArgumentType::Word));
        assert_eq!(descriptor.describe(), "'add' string WORD*");

        let pattern = descriptor.resolve(&[]).unwrap();
        assert_eq!(pattern.to_string(), "'add' STRING WORD*");
        assert!(pattern.is_variadic());
    }

    #[tokio::test]
    async fn test_handler_fn_runs_closure() {
        let handler = handler_fn(|inv: Invocation| async move {
            if inv.arguments.is_empty() {
                Err(crate::error::ExecutionError::msg("empty"))
            } else {
                Ok(())
            }
        });
        let inv = Invocation {
            event: None,
            options: None,
            arguments: vec![],
        };
        assert!(handler.handle(inv).await.is_err());
    }
}
