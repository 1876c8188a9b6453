//! Logging bootstrap.
//!
//! # Responsibility
//! - Install the `log` facade backend exactly once per page.
//! - Route records to the browser console (stderr on native targets).
//!
//! # Invariants
//! - Init is idempotent for the same level.
//! - Re-initialization with a different level is rejected.
//! - Initialization never panics.
//! - Records carry metadata only (`event=... module=... status=...`, ids,
//!   counts); note text is never logged.

use log::{info, Level, LevelFilter, Log, Metadata, Record};
use once_cell::sync::OnceCell;

static LOGGING_STATE: OnceCell<&'static str> = OnceCell::new();
static CONSOLE_LOGGER: ConsoleLogger = ConsoleLogger;

struct ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!("[{}] {}: {}", record.level(), record.target(), record.args());
        write_line(record.level(), &line);
    }

    fn flush(&self) {}
}

#[cfg(target_arch = "wasm32")]
fn write_line(level: Level, line: &str) {
    let msg = wasm_bindgen::JsValue::from_str(line);
    match level {
        Level::Error => web_sys::console::error_1(&msg),
        Level::Warn => web_sys::console::warn_1(&msg),
        Level::Info => web_sys::console::info_1(&msg),
        Level::Debug | Level::Trace => web_sys::console::debug_1(&msg),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn write_line(_level: Level, line: &str) {
    eprintln!("{line}");
}

/// Installs the console logger at `level`.
///
/// # Errors
/// - Returns an error when `level` is unsupported.
/// - Returns an error when logging is already active at another level.
/// - Returns an error when another `log` backend was installed first.
pub fn init_logging(level: &str) -> Result<(), String> {
    let (normalized, filter) = normalize_level(level)?;

    let active = LOGGING_STATE.get_or_try_init(|| -> Result<&'static str, String> {
        log::set_logger(&CONSOLE_LOGGER)
            .map_err(|err| format!("failed to install logger: {err}"))?;
        log::set_max_level(filter);

        info!(
            "event=app_start module=core status=ok version={} level={}",
            env!("CARGO_PKG_VERSION"),
            normalized
        );
        Ok(normalized)
    })?;

    if *active != normalized {
        return Err(format!(
            "logging already initialized with level `{active}`; refusing to switch to `{normalized}`"
        ));
    }
    Ok(())
}

/// Returns the active level, or `None` before [`init_logging`].
pub fn logging_status() -> Option<&'static str> {
    LOGGING_STATE.get().copied()
}

/// `debug` for debug builds, `info` for release builds.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn normalize_level(level: &str) -> Result<(&'static str, LevelFilter), String> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok(("trace", LevelFilter::Trace)),
        "debug" => Ok(("debug", LevelFilter::Debug)),
        "info" => Ok(("info", LevelFilter::Info)),
        "warn" => Ok(("warn", LevelFilter::Warn)),
        "error" => Ok(("error", LevelFilter::Error)),
        other => Err(format!("unsupported log level `{other}`")),
    }
}
