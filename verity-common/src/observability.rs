//! Shared observability helpers for binaries and integration tests.
//!
//! [`init_logging`] installs one `tracing` subscriber: a rolling daily file
//! sink, plus an optional stderr copy in the same encoding. Call it once near
//! process start; later callers are no-ops and receive the resolved log path.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::Context;
use chrono::Local;
use serde::Deserialize;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();
static LOG_PATH: OnceLock<PathBuf> = OnceLock::new();

const LOG_DIR_ENV: &str = "VERITY_LOG_DIR";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Output encoding for structured logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format: {other}")),
        }
    }
}

/// The `logging` section of the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log directory. When unset, `VERITY_LOG_DIR` is consulted, then the
    /// platform data dir (`~/.local/share/<app>` on Linux).
    pub dir: Option<PathBuf>,
    pub format: LogFormat,
    /// Copy every event to stderr as well as the file.
    pub emit_stderr: bool,
    /// Filter used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            dir: None,
            format: LogFormat::Text,
            emit_stderr: false,
            filter: "info".to_string(),
        }
    }
}

/// Initialise the global `tracing` subscriber for `app_name`.
///
/// Returns the concrete log file path for the current day. Subsequent calls
/// hand back the originally resolved location without touching the subscriber.
pub fn init_logging(app_name: &str, settings: &LoggingSettings) -> anyhow::Result<PathBuf> {
    if let Some(path) = LOG_PATH.get() {
        return Ok(path.clone());
    }

    let dir = resolve_log_dir(app_name, settings.dir.as_deref());
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create log directory: {}", dir.display()))?;

    let file_name = format!("{app_name}.log");
    let today = Local::now().format("%Y-%m-%d");
    let full_path = dir.join(format!("{file_name}.{today}"));

    let (writer, guard) = tracing_appender::non_blocking(rolling::daily(&dir, &file_name));
    let _ = LOG_GUARD.set(guard);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.filter));

    tracing_subscriber::registry()
        .with(sink_layers(settings.format, settings.emit_stderr, writer))
        .with(env_filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("tracing setup failed: {e}"))?;

    let _ = LOG_PATH.set(full_path.clone());
    Ok(full_path)
}

/// File sink first, then the optional stderr copy; both share one encoding.
fn sink_layers<W>(format: LogFormat, emit_stderr: bool, file: W) -> Vec<BoxedLayer>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let file = fmt::layer().with_writer(file).with_ansi(false);
    let mut layers = vec![match format {
        LogFormat::Text => file.boxed(),
        LogFormat::Json => file.json().boxed(),
    }];

    if emit_stderr {
        let stderr = fmt::layer().with_writer(std::io::stderr);
        layers.push(match format {
            LogFormat::Text => stderr.boxed(),
            LogFormat::Json => stderr.json().boxed(),
        });
    }
    layers
}

fn resolve_log_dir(app_name: &str, explicit: Option<&Path>) -> PathBuf {
    if let Some(dir) = explicit {
        return expand_home(dir);
    }

    if let Ok(env_dir) = std::env::var(LOG_DIR_ENV) {
        return expand_home(Path::new(&env_dir));
    }

    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(app_name)
}

fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}
