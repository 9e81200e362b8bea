//! Handler pipeline composer
//!
//! `pipe` applies wrapper stages left to right so the first stage in
//! source order sits closest to the base handler:
//!
//! ```
//! use namespace_logger::handlers::{pipe, dedup_stage, buffer_stage, MemoryHandler};
//! use namespace_logger::Buffering;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let handler = pipe(
//!     Arc::new(MemoryHandler::new()),
//!     vec![
//!         dedup_stage(Duration::from_secs(2)), // innermost
//!         buffer_stage(Buffering::new().with_batch_size(10)),
//!     ],
//! );
//! # drop(handler);
//! ```

use super::buffered::{Buffered, Buffering};
use super::dedup::Dedup;
use crate::core::Handler;
use std::sync::Arc;
use std::time::Duration;

/// One composable wrapper stage.
pub type Wrap = Box<dyn FnOnce(Arc<dyn Handler>) -> Arc<dyn Handler> + Send>;

/// Compose `base` with `wraps`, first wrapper innermost.
pub fn pipe(base: Arc<dyn Handler>, wraps: Vec<Wrap>) -> Arc<dyn Handler> {
    wraps.into_iter().fold(base, |handler, wrap| wrap(handler))
}

/// Deduplication stage with the given TTL.
pub fn dedup_stage(ttl: Duration) -> Wrap {
    Box::new(move |next| Arc::new(Dedup::from_shared(next, ttl)))
}

/// Buffering stage with the given configuration.
pub fn buffer_stage(config: Buffering) -> Wrap {
    Box::new(move |next| Arc::new(Buffered::from_shared(next, config)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Record, Result, Severity};
    use crate::handlers::MemoryHandler;
    use parking_lot::Mutex;

    /// Tags records with its label so delivery order is observable.
    struct Tagging {
        label: &'static str,
        next: Arc<dyn Handler>,
        seen: Arc<Mutex<Vec<&'static str>>>,
    }

    impl Handler for Tagging {
        fn handle(&self, record: &Record) -> Result<()> {
            self.seen.lock().push(self.label);
            self.next.handle(record)
        }
    }

    fn tagging_stage(
        label: &'static str,
        seen: Arc<Mutex<Vec<&'static str>>>,
    ) -> Wrap {
        Box::new(move |next| {
            Arc::new(Tagging {
                label,
                next,
                seen,
            })
        })
    }

    #[test]
    fn test_first_stage_is_innermost() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::new(MemoryHandler::new());
        let handler = pipe(
            sink.clone(),
            vec![
                tagging_stage("inner", seen.clone()),
                tagging_stage("outer", seen.clone()),
            ],
        );

        handler.handle(&Record::new(Severity::Info, "m")).unwrap();

        // Outermost runs first on the way in
        assert_eq!(*seen.lock(), vec!["outer", "inner"]);
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_no_stages_returns_base() {
        let sink = Arc::new(MemoryHandler::new());
        let handler = pipe(sink.clone(), Vec::new());
        handler.handle(&Record::new(Severity::Info, "m")).unwrap();
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_dedup_then_buffer_composition() {
        let sink = Arc::new(MemoryHandler::new());
        let handler = pipe(
            sink.clone(),
            vec![
                dedup_stage(Duration::from_secs(5)),
                buffer_stage(Buffering::new().with_batch_size(1)),
            ],
        );

        for _ in 0..3 {
            let _ = handler.handle(&Record::new(Severity::Info, "dup"));
        }
        // Dropping the pipeline closes the buffered stage and drains it
        drop(handler);

        assert_eq!(sink.len(), 1);
    }
}
