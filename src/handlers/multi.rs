//! Fan-out handler

use crate::core::{Handler, LoggerError, Record, Result};
use std::sync::Arc;

/// Delivers each record to an ordered list of child handlers.
///
/// Children are called in registration order, each exactly once per
/// record, with no parallelism; a failing child never prevents later
/// children from running. Errors are collected and folded into one.
pub struct MultiHandler {
    handlers: Vec<Arc<dyn Handler>>,
}

impl MultiHandler {
    pub fn new(handlers: Vec<Arc<dyn Handler>>) -> Self {
        Self { handlers }
    }

    pub fn empty() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Append a child handler at the end of the delivery order.
    #[must_use]
    pub fn with(mut self, handler: impl Handler + 'static) -> Self {
        self.handlers.push(Arc::new(handler));
        self
    }

    #[must_use]
    pub fn with_shared(mut self, handler: Arc<dyn Handler>) -> Self {
        self.handlers.push(handler);
        self
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl Handler for MultiHandler {
    fn handle(&self, record: &Record) -> Result<()> {
        let mut errors = Vec::new();
        for (index, handler) in self.handlers.iter().enumerate() {
            if let Err(err) = handler.handle(record) {
                errors.push(LoggerError::handler(index, err));
            }
        }
        LoggerError::join(errors)
    }
}
