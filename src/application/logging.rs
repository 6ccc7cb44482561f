//! # Logging
//!
//! Sets up the `tracing` subscriber with three sinks (Console, File, Remote).
//! Each sink has its own level from [`LogLevels`]; module loggers are further capped by
//! the runtime mode (`NODE_ENV`, `SILLY`, `NO_SILLY`).

use anyhow::{Context, Result};
use chrono::Local;
use std::fmt;
use tokio::sync::mpsc;
use tracing::{Event, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::{Context as LayerContext, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

use crate::domain::config::AppOptions;
use crate::domain::env::{Environment, RuntimeMode};
use crate::domain::paths;

/// Target under which built-in modules log.
pub const MODULES_TARGET: &str = "canni::interface::modules";

/// Log lines buffered for the remote sink before the chat connection is up.
const REMOTE_BUFFER: usize = 256;

/// Third-party crates that are too chatty at our levels.
const QUIET_DEPENDENCIES: &str =
    "matrix_sdk=warn,matrix_sdk_base=warn,matrix_sdk_crypto=error,ruma=warn,hyper=warn";

pub type RemoteLogs = mpsc::Receiver<String>;

/// Keeps the file writer alive and hands out the remote log stream once.
pub struct Logging {
    _file_guard: WorkerGuard,
    remote: Option<RemoteLogs>,
}

impl Logging {
    pub fn take_remote(&mut self) -> Option<RemoteLogs> {
        self.remote.take()
    }
}

/// Minimum level for module loggers.
///
/// Production logs `info` unless `SILLY` is set; development logs everything
/// unless `NO_SILLY` is set.
pub fn module_level(runtime: RuntimeMode, silly: bool, no_silly: bool) -> LevelFilter {
    if runtime.is_production() {
        if silly { LevelFilter::TRACE } else { LevelFilter::INFO }
    } else if no_silly {
        LevelFilter::DEBUG
    } else {
        LevelFilter::TRACE
    }
}

/// `EnvFilter` directives for a sink.
pub fn directives(sink: LevelFilter, modules: LevelFilter) -> String {
    let name = |level: LevelFilter| level.to_string().to_lowercase();
    format!(
        "{},{}={},{}",
        name(sink),
        MODULES_TARGET,
        name(sink.min(modules)),
        QUIET_DEPENDENCIES
    )
}

/// Formats timestamps with a chrono pattern.
#[derive(Debug, Clone)]
pub struct LogTimer(pub String);

impl FormatTime for LogTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        write!(w, "{}", Local::now().format(&self.0))
    }
}

pub fn init(options: &AppOptions, env: &Environment) -> Result<Logging> {
    std::fs::create_dir_all(&options.log_dir)
        .with_context(|| format!("Failed to create log directory {}", options.log_dir.display()))?;

    let modules = module_level(env.runtime, env.silly, env.no_silly);
    let levels = options.log_levels;
    let timer = LogTimer(options.log_format.clone());

    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(directives(levels.console, modules)));
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_timer(timer.clone())
        .with_filter(console_filter);

    let file_appender = tracing_appender::rolling::daily(&options.log_dir, paths::LOG_FILE_PREFIX);
    let (non_blocking, file_guard) = tracing_appender::non_blocking(file_appender);
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_timer(timer.clone())
        .with_filter(EnvFilter::new(directives(levels.file, modules)));

    // The chat adapter itself never feeds the remote sink, or every forwarded
    // line would log another one.
    let (tx, rx) = mpsc::channel(REMOTE_BUFFER);
    let remote_layer = RemoteLogLayer { tx, timer }.with_filter(EnvFilter::new(format!(
        "{},canni::infrastructure=off",
        directives(levels.remote, modules)
    )));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .with(remote_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(Logging {
        _file_guard: file_guard,
        remote: Some(rx),
    })
}

/// Forwards formatted events into a bounded channel drained by the chat connection.
/// Lines are dropped when the channel is full or nobody listens.
pub struct RemoteLogLayer {
    tx: mpsc::Sender<String>,
    timer: LogTimer,
}

impl<S> Layer<S> for RemoteLogLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: LayerContext<'_, S>) {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let line = format_remote_line(
            &Local::now().format(&self.timer.0).to_string(),
            event.metadata().level(),
            event.metadata().target(),
            &visitor.message,
        );
        let _ = self.tx.try_send(line);
    }
}

pub fn format_remote_line(
    timestamp: &str,
    level: &tracing::Level,
    target: &str,
    message: &str,
) -> String {
    format!("`{timestamp}` **{level}** {target}: {message}")
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
}

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        }
    }
}
