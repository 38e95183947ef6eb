//! Structured logging and tracing for tariff-check
//!
//! Console output goes to stderr (JSON lines by default), with an optional
//! daily-rotated log file. The level is INFO, or DEBUG when `global.debug`
//! is set; `logging.level` and `RUST_LOG` take precedence in that order.

use crate::config::LoggingConfig;
use crate::error::{Result, TariffError};
use once_cell::sync::OnceCell;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Once;
use tracing::{Level, debug, error, info, trace, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

// Keep the non-blocking worker guard alive for the entire process lifetime
static LOG_GUARD: OnceCell<WorkerGuard> = OnceCell::new();
static INIT_ONCE: Once = Once::new();
static INIT_ERROR: OnceCell<String> = OnceCell::new();

/// Initialize logging system based on configuration
pub fn init_logging(config: &LoggingConfig, debug: bool) -> Result<()> {
    INIT_ONCE.call_once(|| {
        let init_result = (|| -> Result<()> {
            let level = resolve_level(config, debug)?;
            let filter = build_env_filter(level);

            let console_layer = config.console_output.then(|| {
                let base = fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_file(false);
                if config.json_format {
                    base.json().boxed()
                } else {
                    base.boxed()
                }
            });

            let file_layer = match config.file.as_deref() {
                Some(file) if !should_use_console_only() => {
                    let appender = rolling::Builder::new()
                        .rotation(rolling::Rotation::DAILY)
                        .filename_prefix("ttc")
                        .filename_suffix("log")
                        .max_log_files(config.backup_count.max(1) as usize)
                        .build(log_directory(file))
                        .map_err(|e| {
                            TariffError::io(format!("Failed to create log file appender: {}", e))
                        })?;
                    let (writer, guard) = non_blocking(appender);
                    let _ = LOG_GUARD.set(guard);

                    let base = fmt::layer()
                        .with_writer(writer)
                        .with_ansi(false)
                        .with_target(false)
                        .with_thread_ids(false)
                        .with_file(false);
                    Some(if config.json_format {
                        base.json().boxed()
                    } else {
                        base.boxed()
                    })
                }
                _ => None,
            };

            tracing_subscriber::registry()
                .with(filter)
                .with(console_layer)
                .with(file_layer)
                .try_init()
                .map_err(|e| TariffError::config(format!("Failed to install subscriber: {}", e)))?;

            info!(
                "Logging initialized - level: {:?}, json: {}, file: {}",
                level,
                config.json_format,
                config.file.as_deref().unwrap_or("-")
            );
            Ok(())
        })();

        if let Err(e) = init_result {
            let _ = INIT_ERROR.set(e.to_string());
        }
    });

    if let Some(err) = INIT_ERROR.get() {
        return Err(TariffError::config(err.clone()));
    }
    Ok(())
}

/// Level from `logging.level` if set, otherwise from the debug flag
pub fn resolve_level(config: &LoggingConfig, debug: bool) -> Result<Level> {
    match config.level.as_deref() {
        Some(level) => parse_log_level(level),
        None if debug => Ok(Level::DEBUG),
        None => Ok(Level::INFO),
    }
}

fn build_env_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("tariff_check={},ttc={}", level, level).into())
}

fn should_use_console_only() -> bool {
    cfg!(test) || std::env::var_os("TTC_DISABLE_FILE_LOG").is_some()
}

// A path with an extension names a file; its parent directory holds the rotated logs
fn log_directory(file: &str) -> &Path {
    let p = Path::new(file);
    if p.extension().is_some() {
        p.parent().unwrap_or(p)
    } else {
        p
    }
}

/// Parse log level string to tracing Level
pub fn parse_log_level(level_str: &str) -> Result<Level> {
    match level_str.to_uppercase().as_str() {
        "TRACE" => Ok(Level::TRACE),
        "DEBUG" => Ok(Level::DEBUG),
        "INFO" => Ok(Level::INFO),
        "WARN" | "WARNING" => Ok(Level::WARN),
        "ERROR" => Ok(Level::ERROR),
        _ => Err(TariffError::config(format!(
            "Invalid log level: {}",
            level_str
        ))),
    }
}

/// Context information for log messages
#[derive(Debug, Clone)]
pub struct LogContext {
    /// Component name (e.g., "evcc", "homeassistant", "checker")
    pub component: String,

    /// Additional context fields, emitted in key order
    pub extra_fields: BTreeMap<String, String>,
}

impl LogContext {
    /// Create a new log context
    pub fn new(component: &str) -> Self {
        Self {
            component: component.to_string(),
            extra_fields: BTreeMap::new(),
        }
    }

    /// Add extra field
    pub fn with_field(mut self, key: &str, value: String) -> Self {
        self.extra_fields.insert(key.to_string(), value);
        self
    }
}

/// Structured logger with context
#[derive(Debug, Clone)]
pub struct StructuredLogger {
    context: LogContext,
}

impl StructuredLogger {
    /// Create a new structured logger with context
    pub const fn new(context: LogContext) -> Self {
        Self { context }
    }

    pub fn info(&self, message: &str) {
        let fields = self.format_fields();
        info!(%fields, "{}", message);
    }

    pub fn warn(&self, message: &str) {
        let fields = self.format_fields();
        warn!(%fields, "{}", message);
    }

    pub fn error(&self, message: &str) {
        let fields = self.format_fields();
        error!(%fields, "{}", message);
    }

    pub fn debug(&self, message: &str) {
        let fields = self.format_fields();
        debug!(%fields, "{}", message);
    }

    pub fn trace(&self, message: &str) {
        let fields = self.format_fields();
        trace!(%fields, "{}", message);
    }

    fn format_fields(&self) -> String {
        let mut fields = vec![format!("component={}", self.context.component)];
        for (key, value) in &self.context.extra_fields {
            fields.push(format!("{}={}", key, value));
        }
        fields.join(",")
    }
}

/// Create a logger for a specific component
pub fn get_logger(component: &str) -> StructuredLogger {
    StructuredLogger::new(LogContext::new(component))
}

/// Create a logger with full context
pub const fn get_logger_with_context(context: LogContext) -> StructuredLogger {
    StructuredLogger::new(context)
}
