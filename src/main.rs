//! chatcmd - line-driven demo bot.
//!
//! Reads one message per stdin line in the form
//!
//! ```text
//! <sender-id> <channel-id> <scope-id|-> <text>
//! ```
//!
//! and dispatches it through the engine. Replies go to stdout, logs to stderr.

use anyhow::Context;
use chatcmd::config::{self, Config, LogFormat, LoggingConfig};
use chatcmd::{
    AccessLevel, Argument, ChannelId, Command, CommandEngine, CommandRegistry, ExecutionError,
    IncomingMessage, Invocation, LoggingListener, MetricsListener, PatternDescriptor, ScopeId,
    SettingsSource, UserId, handler_fn,
};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args().nth(1);
    let config = match &config_path {
        Some(path) => {
            Config::load(path).with_context(|| format!("failed to load config from {}", path))?
        }
        None => Config::default(),
    };

    init_tracing(&config.logging);

    if config_path.is_none() {
        warn!("no config file given, using built-in defaults");
    }
    if let Err(errors) = config::validate(&config) {
        for e in &errors {
            error!(error = %e, code = e.error_code(), "invalid configuration");
        }
        anyhow::bail!("configuration has {} error(s)", errors.len());
    }

    if config.metrics.enabled {
        chatcmd::metrics::init();
    }

    let registry = build_registry().context("failed to register commands")?;
    let mut engine = CommandEngine::new(registry).with_listener(Arc::new(LoggingListener));
    if config.metrics.enabled {
        engine = engine.with_listener(Arc::new(MetricsListener));
    }
    let settings: &dyn SettingsSource = &config;
    engine.configure(Some(settings));
    let engine = Arc::new(engine);

    info!(
        commands = engine.registry().len(),
        prefix = %engine.prefixes().default_prefix(),
        "chatcmd ready, reading messages from stdin"
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut tasks = JoinSet::new();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let Some(message) = parse_line(&line) else {
            warn!(line = %line, "expected: <sender-id> <channel-id> <scope-id|-> <text>");
            continue;
        };
        let engine = engine.clone();
        tasks.spawn(async move {
            if let Some(outcome) = engine.handle_message(message).await {
                debug!(outcome = outcome.label(), "message handled");
            }
        });
    }

    while let Some(joined) = tasks.join_next().await {
        if let Err(e) = joined {
            error!(error = %e, "dispatch task failed");
        }
    }

    info!("stdin closed, shutting down");
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);
    match logging.format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn parse_line(line: &str) -> Option<IncomingMessage> {
    let mut parts = line.trim_start().splitn(4, ' ');
    let sender = parts.next()?.parse().ok()?;
    let channel = parts.next()?.parse().ok()?;
    let scope = match parts.next()? {
        "-" => None,
        raw => Some(ScopeId(raw.parse().ok()?)),
    };
    let content = parts.next()?;

    let mut message = IncomingMessage::new(UserId(sender), ChannelId(channel), content);
    message.scope = scope;
    Some(message)
}

fn reply(invocation: &Invocation, text: impl std::fmt::Display) {
    match &invocation.event {
        Some(event) => println!("[{}] <@{}> {}", event.channel(), event.sender(), text),
        None => println!("{}", text),
    }
}

fn build_registry() -> Result<CommandRegistry, chatcmd::RegistrationError> {
    let mut registry = CommandRegistry::builder();

    registry.register(
        Command::builder("ping")
            .short_description("Check that the bot is alive.")
            .pattern(PatternDescriptor::new(handler_fn(|inv| async move {
                reply(&inv, "pong");
                Ok(())
            }))
            .with_event()),
    )?;

    registry.register(
        Command::builder("echo")
            .alias("say")
            .description("Repeat the given words. --name prefixes them with a speaker.")
            .option_names(["NAME", "SILENT"])
            .pattern(
                PatternDescriptor::new(handler_fn(|inv| async move {
                    let options = inv.options.clone().unwrap_or_default();
                    if options.has_name("silent") {
                        return Ok(());
                    }
                    let words = inv.arg(0).map(ToString::to_string).unwrap_or_default();
                    match options.value(&chatcmd::OptionKind::NAME) {
                        Some(speaker) => reply(&inv, format!("{}: {}", speaker, words)),
                        None => reply(&inv, words),
                    }
                    Ok(())
                }))
                .with_event()
                .with_options()
                .arg("STRING+"),
            ),
    )?;

    registry.register(
        Command::builder("greet")
            .alias("hi")
            .pattern(
                PatternDescriptor::new(handler_fn(|inv| async move {
                    if let Some(user) = inv.arg(0).and_then(Argument::as_user) {
                        reply(&inv, format!("hello, {}!", user));
                    }
                    Ok(())
                }))
                .with_event()
                .arg("USER"),
            )
            .pattern(
                PatternDescriptor::new(handler_fn(|inv| async move {
                    reply(&inv, "hello, everyone!");
                    Ok(())
                }))
                .with_event(),
            ),
    )?;

    registry.register(
        Command::builder("sum")
            .short_description("Add integers.")
            .pattern(
                PatternDescriptor::new(handler_fn(|inv| async move {
                    let total = inv
                        .arg(0)
                        .and_then(Argument::as_list)
                        .unwrap_or_default()
                        .iter()
                        .filter_map(Argument::as_integer)
                        .try_fold(0i64, i64::checked_add);
                    match total {
                        Some(total) => {
                            reply(&inv, total);
                            Ok(())
                        }
                        None => Err(ExecutionError::msg("sum overflows a 64-bit integer")),
                    }
                }))
                .with_event()
                .arg("INTEGER+"),
            ),
    )?;

    registry.register(
        Command::builder("metrics")
            .access_level(AccessLevel::Creator)
            .short_description("Dump Prometheus metrics.")
            .pattern(
                PatternDescriptor::new(handler_fn(|inv| async move {
                    reply(&inv, chatcmd::metrics::gather());
                    Ok(())
                }))
                .with_event(),
            ),
    )?;

    Ok(registry.build())
}
