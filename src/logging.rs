//! Structured logging setup.
//!
//! Two outputs:
//! - **Compact to stderr** for humans, always on
//! - **JSONL to file** (optional) for tooling, through a non-blocking writer
//!
//! The library itself only emits `tracing` events; installing a subscriber is
//! the host's job. The CLI calls [`init`].
//!
//! ```rust,ignore
//! let _guard = hotkeys::logging::init();
//! tracing::info!(hotkey = "Mod+S", "registered");
//! ```

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info";

const LOG_FILE_NAME: &str = "hotkeys.jsonl";

/// Keep alive for the program's lifetime; dropping it flushes the file log.
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

fn stderr_layer<S>() -> impl Layer<S>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(false)
        .compact()
}

/// Install the stderr subscriber.
///
/// A second call is a no-op; the first subscriber stays installed.
pub fn init() -> LoggingGuard {
    let installed = tracing_subscriber::registry()
        .with(env_filter())
        .with(stderr_layer())
        .try_init();

    if installed.is_ok() {
        tracing::debug!(event_type = "logging", action = "started", "Logging initialized");
    }

    LoggingGuard { _file_guard: None }
}

/// Install stderr plus a JSONL file layer writing to `path`.
///
/// Falls back to stderr only when the file cannot be opened.
pub fn init_with_file(path: &Path) -> LoggingGuard {
    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            eprintln!("[LOGGING] Failed to create log directory: {}", e);
        }
    }

    let file = match OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("[LOGGING] Failed to open log file {}: {}", path.display(), e);
            return init();
        }
    };

    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file);

    let json_layer = fmt::layer()
        .json()
        .with_writer(non_blocking_file)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_target(true)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false)
        .with_span_events(FmtSpan::NONE);

    let installed = tracing_subscriber::registry()
        .with(env_filter())
        .with(json_layer)
        .with(stderr_layer())
        .try_init();

    if installed.is_ok() {
        tracing::info!(
            event_type = "logging",
            action = "started",
            log_path = %path.display(),
            "Logging initialized"
        );
    }

    LoggingGuard {
        _file_guard: Some(file_guard),
    }
}

/// Per-user log directory.
pub fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("hotkeys").join("logs"))
        .unwrap_or_else(|| std::env::temp_dir().join("hotkeys-logs"))
}

/// Default JSONL log path under [`log_dir`].
pub fn log_path() -> PathBuf {
    log_dir().join(LOG_FILE_NAME)
}
