//! Process-wide default logger
//!
//! A shared root logger for package-level logging. It starts disabled
//! with no sink, at Debug level, on the shared default namespace
//! store; loggers cloned from it inherit that store.

use super::builder::FieldBuilder;
use super::field::FieldValue;
use super::handler::Handler;
use super::level::Severity;
use super::logger::Logger;
use super::record::Style;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use std::time::Duration;

static DEFAULT_LOGGER: Lazy<Logger> = Lazy::new(Logger::root);

/// The default logger itself, for configuration not covered by the
/// module-level functions.
pub fn default_logger() -> &'static Logger {
    &DEFAULT_LOGGER
}

/// Install the default logger's sink.
pub fn set_handler(handler: impl Handler + 'static) -> &'static Logger {
    DEFAULT_LOGGER.set_handler(handler)
}

/// Set the default logger's minimum severity.
pub fn set_level(level: Severity) -> &'static Logger {
    DEFAULT_LOGGER.set_level(level)
}

pub fn enable() -> &'static Logger {
    DEFAULT_LOGGER.enable()
}

pub fn disable() -> &'static Logger {
    DEFAULT_LOGGER.disable()
}

pub fn set_style(style: Style) -> &'static Logger {
    DEFAULT_LOGGER.set_style(style)
}

/// Enable a namespace subtree in the shared default store.
pub fn namespace_enable(path: &str) -> &'static Logger {
    DEFAULT_LOGGER.namespace_enable(path)
}

/// Disable a namespace subtree in the shared default store.
pub fn namespace_disable(path: &str) -> &'static Logger {
    DEFAULT_LOGGER.namespace_disable(path)
}

pub fn set_rate_limit(level: Severity, max_count: u64, interval: Duration) -> &'static Logger {
    DEFAULT_LOGGER.set_rate_limit(level, max_count, interval)
}

pub fn set_sampling(level: Severity, rate: f64) -> &'static Logger {
    DEFAULT_LOGGER.set_sampling(level, rate)
}

pub fn debug(message: impl Into<String>) {
    DEFAULT_LOGGER.debug(message);
}

pub fn info(message: impl Into<String>) {
    DEFAULT_LOGGER.info(message);
}

pub fn warn(message: impl Into<String>) {
    DEFAULT_LOGGER.warn(message);
}

pub fn error(message: impl Into<String>) {
    DEFAULT_LOGGER.error(message);
}

/// Error-level emission with a captured stack trace.
pub fn stack(message: impl Into<String>) {
    DEFAULT_LOGGER.stack(message);
}

/// Raw emission with no level tag and no trailing newline.
pub fn print(message: impl Into<String>) {
    DEFAULT_LOGGER.print(message);
}

/// Start a fluent field chain on the default logger.
pub fn fields<I>(pairs: I) -> FieldBuilder<'static>
where
    I: IntoIterator,
    I::Item: Into<FieldValue>,
{
    DEFAULT_LOGGER.fields(pairs)
}

/// Start a fluent field chain from pre-paired entries.
pub fn field<I, K, V>(entries: I) -> FieldBuilder<'static>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<FieldValue>,
{
    DEFAULT_LOGGER.field(entries)
}

/// New logger with the default logger's configuration and an
/// independent context.
pub fn clone_default() -> Logger {
    DEFAULT_LOGGER.clone()
}

/// Run `f`, log its duration at Info level, and return it.
pub fn measure<F: FnOnce()>(f: F) -> Duration {
    DEFAULT_LOGGER.measure(f)
}

/// Run `f` and log start/end/duration fields at Info level.
pub fn timed<F: FnOnce()>(f: F) {
    DEFAULT_LOGGER.timed(f);
}

/// Log the time elapsed since `start` at Info level.
pub fn benchmark(start: DateTime<Utc>) {
    DEFAULT_LOGGER.benchmark(start);
}
