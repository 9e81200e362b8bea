//! Main logger implementation
//!
//! A [`Logger`] owns its configuration and drives the emission
//! pipeline: enabled/level gate, namespace gate, sampling, rate
//! limiting, record allocation, context merge, middleware, and sink
//! dispatch. Loggers are cheap to derive and safe to share across
//! threads; derived loggers share the namespace store, the sink, and
//! the rate-limit/sampling state, while each owns a private context.

use super::builder::{Conditional, FieldBuilder};
use super::field::{FieldList, FieldValue};
use super::handler::Handler;
use super::level::Severity;
use super::middleware::Middleware;
use super::namespace::{NamespaceStore, SEPARATOR};
use super::rate_limit::RateLimiter;
use super::record::{Class, Record, Style};
use super::sampling::Sampler;
use crate::handlers::TextHandler;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Default capacity for captured stack text; longer captures are
/// truncated, never grown.
pub const DEFAULT_STACK_BUFFER_SIZE: usize = 4096;

#[derive(Clone)]
struct LoggerConfig {
    context: FieldList,
    style: Style,
    prefix: Option<String>,
    indent: usize,
    stack_buffer_size: usize,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            context: FieldList::new(),
            style: Style::Flat,
            prefix: None,
            indent: 0,
            stack_buffer_size: DEFAULT_STACK_BUFFER_SIZE,
        }
    }
}

/// The user-facing emitter.
pub struct Logger {
    enabled: AtomicBool,
    min_level: AtomicU8,
    path: String,
    namespaces: Arc<NamespaceStore>,
    handler: RwLock<Option<Arc<dyn Handler>>>,
    config: RwLock<LoggerConfig>,
    middleware: RwLock<Vec<Arc<dyn Middleware>>>,
    limits: Arc<RateLimiter>,
    sampler: Arc<Sampler>,
}

impl Logger {
    /// Create a logger under `namespace` with a text sink on stdout.
    ///
    /// New loggers start disabled at Debug level and share the
    /// process-wide default namespace store; call
    /// [`enable`](Self::enable) to start emitting.
    pub fn new(namespace: impl Into<String>) -> Self {
        Logger {
            path: namespace.into(),
            handler: RwLock::new(Some(Arc::new(TextHandler::stdout()))),
            ..Self::root()
        }
    }

    /// Bare root logger: empty path, no sink, disabled, Debug level.
    pub(crate) fn root() -> Self {
        Self {
            enabled: AtomicBool::new(false),
            min_level: AtomicU8::new(Severity::Debug as u8),
            path: String::new(),
            namespaces: NamespaceStore::shared(),
            handler: RwLock::new(None),
            config: RwLock::new(LoggerConfig::default()),
            middleware: RwLock::new(Vec::new()),
            limits: Arc::new(RateLimiter::new()),
            sampler: Arc::new(Sampler::new()),
        }
    }

    // ------------------------------------------------------------------
    // Derivation
    // ------------------------------------------------------------------

    /// Derive a child logger one namespace segment deeper.
    ///
    /// The child shares the namespace store, sink, middleware stages and
    /// rate-limit/sampling state; its context starts empty.
    pub fn namespace(&self, name: &str) -> Logger {
        let path = if self.path.is_empty() {
            name.to_string()
        } else {
            format!("{}{}{}", self.path, SEPARATOR, name)
        };

        let config = self.config.read();
        Logger {
            enabled: AtomicBool::new(self.enabled.load(Ordering::Relaxed)),
            min_level: AtomicU8::new(self.min_level.load(Ordering::Relaxed)),
            path,
            namespaces: Arc::clone(&self.namespaces),
            handler: RwLock::new(self.handler.read().clone()),
            config: RwLock::new(LoggerConfig {
                context: FieldList::new(),
                ..config.clone()
            }),
            middleware: RwLock::new(self.middleware.read().clone()),
            limits: Arc::clone(&self.limits),
            sampler: Arc::clone(&self.sampler),
        }
    }

    // ------------------------------------------------------------------
    // Configuration (chainable)
    // ------------------------------------------------------------------

    pub fn enable(&self) -> &Self {
        self.enabled.store(true, Ordering::Relaxed);
        self
    }

    pub fn disable(&self) -> &Self {
        self.enabled.store(false, Ordering::Relaxed);
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Set the minimum severity required for emission.
    pub fn set_level(&self, level: Severity) -> &Self {
        self.min_level.store(level as u8, Ordering::Relaxed);
        self
    }

    pub fn level(&self) -> Severity {
        Severity::from_u8(self.min_level.load(Ordering::Relaxed))
    }

    pub fn set_style(&self, style: Style) -> &Self {
        self.config.write().style = style;
        self
    }

    pub fn style(&self) -> Style {
        self.config.read().style
    }

    /// Prepend `prefix` to every emitted message.
    pub fn set_prefix(&self, prefix: impl Into<String>) -> &Self {
        self.config.write().prefix = Some(prefix.into());
        self
    }

    /// Indent every emitted message by `2 * count` spaces.
    pub fn set_indent(&self, count: usize) -> &Self {
        self.config.write().indent = count;
        self
    }

    /// Cap for captured stack text in bytes.
    pub fn set_stack_buffer_size(&self, bytes: usize) -> &Self {
        self.config.write().stack_buffer_size = bytes;
        self
    }

    /// Install the sink receiving this logger's records.
    pub fn set_handler(&self, handler: impl Handler + 'static) -> &Self {
        self.set_shared_handler(Arc::new(handler))
    }

    /// Install an already-shared sink.
    pub fn set_shared_handler(&self, handler: Arc<dyn Handler>) -> &Self {
        *self.handler.write() = Some(handler);
        self
    }

    /// Append a middleware stage; stages run in installation order.
    pub fn add_middleware(&self, middleware: impl Middleware + 'static) -> &Self {
        self.middleware.write().push(Arc::new(middleware));
        self
    }

    /// Explicitly enable a namespace subtree in the shared store.
    pub fn namespace_enable(&self, path: &str) -> &Self {
        self.namespaces.set_explicit(path, true);
        self
    }

    /// Explicitly disable a namespace subtree in the shared store.
    pub fn namespace_disable(&self, path: &str) -> &Self {
        self.namespaces.set_explicit(path, false);
        self
    }

    /// Admit at most `max_count` records per `interval` at `level`.
    ///
    /// The state is shared with loggers derived from this one.
    pub fn set_rate_limit(&self, level: Severity, max_count: u64, interval: Duration) -> &Self {
        self.limits.set(level, max_count, interval);
        self
    }

    /// Set the sampling admit probability for `level` (shared with
    /// derived loggers).
    pub fn set_sampling(&self, level: Severity, rate: f64) -> &Self {
        self.sampler.set(level, rate);
        self
    }

    /// Merge fields into this logger's context; new values overwrite
    /// existing keys with the same name.
    pub fn add_context<I, K, V>(&self, fields: I) -> &Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        let mut config = self.config.write();
        for (key, value) in fields {
            let key = key.into();
            let value = value.into();
            let rebuilt: FieldList = config
                .context
                .iter()
                .filter(|f| f.key != key)
                .cloned()
                .collect();
            config.context = rebuilt;
            config.context.push(key, value);
        }
        self
    }

    pub(crate) fn replace_context(&self, context: FieldList) {
        self.config.write().context = context;
    }

    /// Current namespace path; empty string is the root.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The namespace store this logger consults.
    pub fn namespaces(&self) -> Arc<NamespaceStore> {
        Arc::clone(&self.namespaces)
    }

    // ------------------------------------------------------------------
    // Builders
    // ------------------------------------------------------------------

    /// Start a fluent field chain from a flat pair sequence.
    ///
    /// Misuse (odd pair count, non-string key) becomes a synthetic
    /// `error` field rather than an error return.
    pub fn fields<I>(&self, pairs: I) -> FieldBuilder<'_>
    where
        I: IntoIterator,
        I::Item: Into<FieldValue>,
    {
        FieldBuilder::new(self, Some(FieldList::from_pairs(pairs)))
    }

    /// Start a fluent field chain from pre-paired entries.
    pub fn field<I, K, V>(&self, entries: I) -> FieldBuilder<'_>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        FieldBuilder::new(self, Some(FieldList::from_entries(entries)))
    }

    /// Conditional shim: emission no-ops when `condition` is false.
    pub fn when(&self, condition: bool) -> Conditional<'_> {
        Conditional::new(self, condition)
    }

    // ------------------------------------------------------------------
    // Emission
    // ------------------------------------------------------------------

    /// Emit at an explicit severity. `Fatal` here only emits; the
    /// process-exit behavior belongs to [`fatal`](Self::fatal).
    pub fn log(&self, level: Severity, message: impl Into<String>) {
        let class = if level == Severity::None {
            Class::Raw
        } else {
            Class::Text
        };
        self.emit(level, class, message.into(), None, false);
    }

    pub fn debug(&self, message: impl Into<String>) {
        self.emit(Severity::Debug, Class::Text, message.into(), None, false);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.emit(Severity::Info, Class::Text, message.into(), None, false);
    }

    pub fn warn(&self, message: impl Into<String>) {
        self.emit(Severity::Warn, Class::Text, message.into(), None, false);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.emit(Severity::Error, Class::Text, message.into(), None, false);
    }

    /// Error-level emission with a captured stack trace.
    pub fn stack(&self, message: impl Into<String>) {
        self.emit(Severity::Error, Class::Text, message.into(), None, true);
    }

    /// Fatal emission with a captured stack, then process exit code 1.
    pub fn fatal(&self, message: impl Into<String>) -> ! {
        self.emit(Severity::Fatal, Class::Text, message.into(), None, true);
        std::process::exit(1);
    }

    /// Fatal emission with a captured stack, then a panic carrying the
    /// message.
    pub fn panic(&self, message: impl Into<String>) -> ! {
        let message = message.into();
        self.emit(Severity::Fatal, Class::Text, message.clone(), None, true);
        panic!("{}", message);
    }

    /// Raw emission: no level tag, no trailing newline in text sinks.
    pub fn print(&self, message: impl Into<String>) {
        self.emit(Severity::None, Class::Raw, message.into(), None, false);
    }

    /// Emit a hex+ASCII dump of `data` at Debug level.
    pub fn dump(&self, data: &[u8]) {
        self.emit(Severity::Debug, Class::Dump, hex_dump(data), None, false);
    }

    /// Emit the `{:#?}` rendering of `value` at Debug level.
    pub fn inspect<T: fmt::Debug>(&self, value: &T) {
        self.emit(
            Severity::Debug,
            Class::Inspect,
            format!("{:#?}", value),
            None,
            false,
        );
    }

    /// Run `f` and log its wall-clock duration at Info level.
    pub fn measure<F: FnOnce()>(&self, f: F) -> Duration {
        let start = std::time::Instant::now();
        f();
        let duration = start.elapsed();
        self.fields([FieldValue::from("duration"), FieldValue::from(duration)])
            .info("function executed");
        duration
    }

    /// Run `f` and log start/end/duration fields at Info level.
    pub fn timed<F: FnOnce()>(&self, f: F) {
        let start = Utc::now();
        f();
        self.log_span("timed", start, Utc::now());
    }

    /// Log the time elapsed since `start` at Info level.
    pub fn benchmark(&self, start: DateTime<Utc>) {
        self.log_span("benchmark", start, Utc::now());
    }

    fn log_span(&self, message: &str, start: DateTime<Utc>, end: DateTime<Utc>) {
        let fields = FieldList::from_entries([
            ("start", FieldValue::String(start.to_rfc3339())),
            ("end", FieldValue::String(end.to_rfc3339())),
            (
                "duration",
                FieldValue::String(format!("{}ms", (end - start).num_milliseconds())),
            ),
        ]);
        self.emit(
            Severity::Info,
            Class::Text,
            message.to_string(),
            Some(fields),
            false,
        );
    }

    /// The single pipeline entry point.
    ///
    /// Stage order is fixed: enabled/level gate, namespace gate,
    /// sampling, rate limiting, stack capture, record allocation with
    /// prefix/indent, context merge, middleware chain, sink dispatch.
    /// Nothing past the gates is observable to the caller; sink and
    /// middleware errors are swallowed here.
    pub(crate) fn emit(
        &self,
        level: Severity,
        class: Class,
        message: String,
        fields: Option<FieldList>,
        capture_stack: bool,
    ) {
        if !self.should_emit(level) {
            return;
        }

        let mut fields = fields.unwrap_or_default();
        let mut stack_bytes = None;
        let config = self.config.read();

        if capture_stack {
            let text = capture_stack_text(config.stack_buffer_size);
            stack_bytes = Some(text.clone().into_bytes());
            fields.push("stack", text);
        }

        let mut message = message;
        if let Some(prefix) = &config.prefix {
            message = format!("{}{}", prefix, message);
        }
        if config.indent > 0 {
            message = format!("{}{}", "  ".repeat(config.indent), message);
        }

        let mut record = Record {
            timestamp: Utc::now(),
            level,
            class,
            style: config.style,
            namespace: self.path.clone(),
            message,
            fields,
            stack: stack_bytes,
        };

        record.fields.merge_missing(&config.context);
        drop(config);

        let middleware = self.middleware.read().clone();
        for stage in &middleware {
            if stage.handle(&mut record).is_err() {
                return;
            }
        }

        let handler = self.handler.read().clone();
        if let Some(handler) = handler {
            let _ = handler.handle(&record);
        }
    }

    /// Gates 1-4: cheap atomic reads first, then the namespace cache,
    /// then the stochastic gates.
    fn should_emit(&self, level: Severity) -> bool {
        if !self.enabled.load(Ordering::Relaxed)
            || (level as u8) < self.min_level.load(Ordering::Relaxed)
        {
            return false;
        }
        if !self.namespaces.is_enabled(&self.path) {
            return false;
        }
        if !self.sampler.allow(level) {
            return false;
        }
        self.limits.allow(level)
    }
}

impl Clone for Logger {
    /// Copy-on-write duplicate: same path and configuration, deep copy
    /// of the context, shared namespace store, sink and gate state.
    fn clone(&self) -> Self {
        Self {
            enabled: AtomicBool::new(self.enabled.load(Ordering::Relaxed)),
            min_level: AtomicU8::new(self.min_level.load(Ordering::Relaxed)),
            path: self.path.clone(),
            namespaces: Arc::clone(&self.namespaces),
            handler: RwLock::new(self.handler.read().clone()),
            config: RwLock::new(self.config.read().clone()),
            middleware: RwLock::new(self.middleware.read().clone()),
            limits: Arc::clone(&self.limits),
            sampler: Arc::clone(&self.sampler),
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("path", &self.path)
            .field("enabled", &self.is_enabled())
            .field("level", &self.level())
            .finish()
    }
}

/// Render a 16-byte-per-row hex+ASCII dump.
fn hex_dump(data: &[u8]) -> String {
    let mut out = String::new();
    for (row, chunk) in data.chunks(16).enumerate() {
        out.push_str(&format!("{:08x}  ", row * 16));
        for i in 0..16 {
            match chunk.get(i) {
                Some(byte) => out.push_str(&format!("{:02x} ", byte)),
                None => out.push_str("   "),
            }
            if i == 7 {
                out.push(' ');
            }
        }
        out.push_str(" |");
        for byte in chunk {
            out.push(if byte.is_ascii_graphic() || *byte == b' ' {
                *byte as char
            } else {
                '.'
            });
        }
        out.push_str("|\n");
    }
    out
}

/// Snapshot the current stack, truncated to `limit` bytes at a char
/// boundary.
fn capture_stack_text(limit: usize) -> String {
    let mut text = std::backtrace::Backtrace::force_capture().to_string();
    if text.len() > limit {
        let mut end = limit;
        while end > 0 && !text.is_char_boundary(end) {
            end -= 1;
        }
        text.truncate(end);
    }
    text
}
