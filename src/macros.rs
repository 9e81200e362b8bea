//! Logging macros for ergonomic message formatting.
//!
//! These macros provide a convenient interface for logging with
//! automatic string formatting, similar to `println!` and `format!`.
//!
//! # Examples
//!
//! ```
//! use namespace_logger::prelude::*;
//! use namespace_logger::info;
//!
//! let logger = Logger::new("app");
//! logger.enable();
//!
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//! ```

/// Log a message at an explicit severity with automatic formatting.
///
/// ```
/// # use namespace_logger::prelude::*;
/// # let logger = Logger::new("app");
/// use namespace_logger::log;
/// log!(logger, Severity::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, format!($($arg)+))
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $logger.debug(format!($($arg)+))
    };
}

/// Log an info-level message.
///
/// ```
/// # use namespace_logger::prelude::*;
/// # let logger = Logger::new("app");
/// use namespace_logger::info;
/// info!(logger, "Processing {} items", 100);
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $logger.info(format!($($arg)+))
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $logger.warn(format!($($arg)+))
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $logger.error(format!($($arg)+))
    };
}

/// Log an error-level message with a captured stack trace.
#[macro_export]
macro_rules! stack {
    ($logger:expr, $($arg:tt)+) => {
        $logger.stack(format!($($arg)+))
    };
}
