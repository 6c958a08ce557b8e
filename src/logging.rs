//! Structured logging for the assistant's two workflows.
//!
//! Spans are opened around `analyze_symptoms`, `summarize_report` and every
//! `gemini_generate` call, so a subscriber installed here shows which
//! workflow a request belongs to. Symptom text and report bytes are never
//! logged; only lengths, MIME types and the derived specialty are.

use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable whose filter overrides the level passed to [`init_logging`].
pub const LOG_ENV_VAR: &str = "SMART_HEALTH_LOG";

/// How much of the workflows to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Failed API calls and rejected workflows
    Error,
    /// Adds unparseable Gemini replies
    Warn,
    /// Adds workflow start/finish, classification outcome and matched specialty
    Info,
    /// Adds request URLs, prompt lengths and state transitions
    Debug,
    /// Adds raw model replies and the HTTP client's own events
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Level {
        match self {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

/// Filter directives used when [`LOG_ENV_VAR`] is not set.
///
/// Only this crate's events pass, except at `Trace`, where `reqwest`
/// connection events are let through too.
pub fn default_filter(level: LogLevel) -> String {
    let own = format!("smart_health={}", level.to_tracing_level());
    match level {
        LogLevel::Trace => format!("{},reqwest=debug", own),
        _ => own,
    }
}

/// Install a global subscriber at `level`.
///
/// [`LOG_ENV_VAR`] takes precedence over `level`:
///
/// ```bash
/// SMART_HEALTH_LOG=smart_health::report=debug cargo run --example smart_assistant
/// ```
///
/// Returns `false` if a global subscriber was already installed, in which
/// case the existing one is left alone.
///
/// # Examples
///
/// ```no_run
/// use smart_health::logging::{init_logging, LogLevel};
///
/// init_logging(LogLevel::Info);
/// ```
pub fn init_logging(level: LogLevel) -> bool {
    let env_filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(default_filter(level)));

    let installed = install(env_filter);
    if installed {
        tracing::info!(?level, "Smart health logging initialized");
    }
    installed
}

/// Install a global subscriber with explicit filter directives.
///
/// An unparseable filter falls back to `smart_health=info`.
///
/// ```no_run
/// use smart_health::logging::init_logging_with_filter;
///
/// init_logging_with_filter("smart_health::symptom=debug,smart_health::backend=trace");
/// ```
pub fn init_logging_with_filter(filter: &str) -> bool {
    let (env_filter, valid) = match EnvFilter::try_new(filter) {
        Ok(env_filter) => (env_filter, true),
        Err(_) => (EnvFilter::new(default_filter(LogLevel::Info)), false),
    };

    let installed = install(env_filter);
    if installed && !valid {
        tracing::warn!(filter, "Invalid log filter, using smart_health=info");
    } else if installed {
        tracing::info!(filter, "Smart health logging initialized");
    }
    installed
}

fn install(env_filter: EnvFilter) -> bool {
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(env_filter)
        .try_init()
        .is_ok()
}
