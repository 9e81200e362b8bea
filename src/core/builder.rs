//! Fluent field builder and conditional shim

use super::field::{FieldList, FieldValue};
use super::logger::Logger;
use super::record::Class;
use super::level::Severity;
use std::fmt;

/// Accumulates fields for one emission.
///
/// Terminal methods hand the accumulated list to the owning logger. A
/// builder produced by a false [`Conditional`] carries no list and
/// no-ops on every terminal, including [`fatal`](Self::fatal) and
/// [`panic`](Self::panic).
pub struct FieldBuilder<'a> {
    logger: &'a Logger,
    fields: Option<FieldList>,
}

impl<'a> FieldBuilder<'a> {
    pub(crate) fn new(logger: &'a Logger, fields: Option<FieldList>) -> Self {
        Self { logger, fields }
    }

    /// Append more pairs with the same parsing rules as
    /// [`Logger::fields`].
    #[must_use]
    pub fn merge<I>(mut self, pairs: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<FieldValue>,
    {
        if let Some(fields) = &mut self.fields {
            for field in FieldList::from_pairs(pairs) {
                fields.push(field.key, field.value);
            }
        }
        self
    }

    /// Store `error` under the `error` key.
    #[must_use]
    pub fn err(mut self, error: impl fmt::Display) -> Self {
        if let Some(fields) = &mut self.fields {
            fields.push("error", error.to_string());
        }
        self
    }

    /// Fresh logger whose context is seeded with the accumulated
    /// fields; used for context-capture patterns.
    pub fn logger(self) -> Logger {
        let logger = self.logger.clone();
        logger.replace_context(self.fields.unwrap_or_default());
        logger
    }

    pub fn debug(self, message: impl Into<String>) {
        self.emit(Severity::Debug, message.into(), false);
    }

    pub fn info(self, message: impl Into<String>) {
        self.emit(Severity::Info, message.into(), false);
    }

    pub fn warn(self, message: impl Into<String>) {
        self.emit(Severity::Warn, message.into(), false);
    }

    pub fn error(self, message: impl Into<String>) {
        self.emit(Severity::Error, message.into(), false);
    }

    /// Error-level emission with a captured stack trace.
    pub fn stack(self, message: impl Into<String>) {
        self.emit(Severity::Error, message.into(), true);
    }

    /// Fatal emission with a captured stack, then process exit code 1.
    /// A dead builder skips both the emission and the exit.
    pub fn fatal(self, message: impl Into<String>) {
        let Some(fields) = self.fields else { return };
        self.logger
            .emit(Severity::Fatal, Class::Text, message.into(), Some(fields), true);
        std::process::exit(1);
    }

    /// Fatal emission with a captured stack, then a panic carrying the
    /// message. A dead builder skips both.
    pub fn panic(self, message: impl Into<String>) {
        let Some(fields) = self.fields else { return };
        let message = message.into();
        self.logger
            .emit(Severity::Fatal, Class::Text, message.clone(), Some(fields), true);
        panic!("{}", message);
    }

    fn emit(self, level: Severity, message: String, capture_stack: bool) {
        let Some(fields) = self.fields else { return };
        self.logger
            .emit(level, Class::Text, message, Some(fields), capture_stack);
    }
}

/// Boolean gate over a logger's fluent surface.
pub struct Conditional<'a> {
    logger: &'a Logger,
    condition: bool,
}

impl<'a> Conditional<'a> {
    pub(crate) fn new(logger: &'a Logger, condition: bool) -> Self {
        Self { logger, condition }
    }

    /// Pair-sequence builder; dead when the condition is false.
    pub fn fields<I>(&self, pairs: I) -> FieldBuilder<'a>
    where
        I: IntoIterator,
        I::Item: Into<FieldValue>,
    {
        if self.condition {
            self.logger.fields(pairs)
        } else {
            FieldBuilder::new(self.logger, None)
        }
    }

    /// Entry-list builder; dead when the condition is false.
    pub fn field<I, K, V>(&self, entries: I) -> FieldBuilder<'a>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        if self.condition {
            self.logger.field(entries)
        } else {
            FieldBuilder::new(self.logger, None)
        }
    }

    pub fn debug(&self, message: impl Into<String>) {
        if self.condition {
            self.logger.debug(message);
        }
    }

    pub fn info(&self, message: impl Into<String>) {
        if self.condition {
            self.logger.info(message);
        }
    }

    pub fn warn(&self, message: impl Into<String>) {
        if self.condition {
            self.logger.warn(message);
        }
    }

    pub fn error(&self, message: impl Into<String>) {
        if self.condition {
            self.logger.error(message);
        }
    }

    pub fn stack(&self, message: impl Into<String>) {
        if self.condition {
            self.logger.stack(message);
        }
    }

    /// Fatal emission then process exit code 1 when the condition is
    /// true; a complete no-op otherwise.
    pub fn fatal(&self, message: impl Into<String>) {
        if self.condition {
            self.logger.fatal(message);
        }
    }

    /// Fatal emission then a panic carrying the message when the
    /// condition is true; a complete no-op otherwise.
    pub fn panic(&self, message: impl Into<String>) {
        if self.condition {
            self.logger.panic(message);
        }
    }
}
