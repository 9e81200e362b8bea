//! # Namespace Logger
//!
//! A hierarchical, middleware-driven structured logging framework with
//! composable sinks.
//!
//! ## Features
//!
//! - **Hierarchical Namespaces**: Per-path enable/disable with cached
//!   evaluation; a child path can re-enable under a disabled subtree
//! - **Structured Fields**: Ordered key/value fields with context
//!   inheritance that never clobbers per-emission data
//! - **Middleware**: Record-transforming stages, plus built-in
//!   per-severity rate limiting and sampling
//! - **Composable Sinks**: Fan-out, buffered/async, deduplicating and
//!   rotating wrappers over text, JSON and colorized outputs
//! - **Thread Safe**: Every logger is callable from any thread; the
//!   hot-path gates are lock-free atomic reads
//!
//! ## Example
//!
//! ```
//! use namespace_logger::prelude::*;
//! use namespace_logger::handlers::MemoryHandler;
//! use std::sync::Arc;
//!
//! let sink = Arc::new(MemoryHandler::new());
//! let logger = Logger::new("app");
//! logger.enable().set_shared_handler(sink.clone());
//!
//! let db = logger.namespace("db");
//! db.fields(["query", "SELECT 1", "rows", "1"]).info("executed");
//!
//! assert_eq!(sink.records()[0].namespace, "app/db");
//! ```

pub mod core;
pub mod handlers;
pub mod macros;

pub mod prelude {
    pub use crate::core::{
        Class, Conditional, Field, FieldBuilder, FieldList, FieldValue, Handler, Logger,
        LoggerError, Middleware, NamespaceStore, RateLimiter, Record, Result, Sampler, Severity,
        Style, SwapOutput,
    };
    pub use crate::handlers::{
        Buffered, Buffering, ColorizedHandler, Dedup, JsonHandler, MultiHandler, Rotating,
        TextHandler,
    };
}

pub use crate::core::{
    global, Class, Conditional, Field, FieldBuilder, FieldList, FieldValue, Handler, Logger,
    LoggerError, Middleware, NamespaceStore, RateLimiter, Record, Result, Sampler, Severity,
    Style, SwapOutput, DEFAULT_STACK_BUFFER_SIZE,
};
pub use crate::handlers::{
    buffer_stage, dedup_stage, pipe, rotating_file_source, Buffered, Buffering, ColorizedHandler,
    Dedup, JsonHandler, MemoryHandler, MultiHandler, OverflowCallback, RotateSource, Rotating,
    TextHandler, Wrap,
};
