//! Buffered (asynchronous) handler
//!
//! Wraps any handler behind a bounded queue drained by a dedicated
//! worker thread. Enqueueing never blocks: when the queue is full the
//! overflow callback fires, a flush is nudged, and the caller gets an
//! overflow error (which the logger boundary swallows).

use crate::core::{Handler, LoggerError, Record, Result};
use crossbeam_channel::{bounded, select, tick, Receiver, Sender, TrySendError};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Called with the current queued count when the buffer overflows.
pub type OverflowCallback = Arc<dyn Fn(usize) + Send + Sync>;

/// Configuration for [`Buffered`].
#[derive(Clone)]
pub struct Buffering {
    /// Flush when this many records are batched (default 100)
    pub batch_size: usize,
    /// Maximum time between flushes (default 10s)
    pub flush_interval: Duration,
    /// Queue capacity before enqueues start failing (default 1000)
    pub max_buffer: usize,
    /// Invoked on overflow with the queued count
    pub on_overflow: OverflowCallback,
}

impl Default for Buffering {
    fn default() -> Self {
        Self {
            batch_size: 100,
            flush_interval: Duration::from_secs(10),
            max_buffer: 1000,
            on_overflow: Arc::new(|count| {
                eprintln!("[LOGGER WARNING] log buffer overflow: {} records queued", count);
            }),
        }
    }
}

impl Buffering {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    #[must_use]
    pub fn with_flush_interval(mut self, interval: Duration) -> Self {
        self.flush_interval = interval;
        self
    }

    #[must_use]
    pub fn with_max_buffer(mut self, size: usize) -> Self {
        self.max_buffer = size;
        self
    }

    #[must_use]
    pub fn with_overflow_callback(mut self, callback: impl Fn(usize) + Send + Sync + 'static) -> Self {
        self.on_overflow = Arc::new(callback);
        self
    }

    /// Clamp to sane values: batch at least 1, buffer at least the
    /// batch size (raised to ten batches when smaller), a positive
    /// flush interval.
    fn sanitized(mut self) -> Self {
        if self.batch_size < 1 {
            self.batch_size = 1;
        }
        if self.max_buffer < self.batch_size {
            self.max_buffer = self.batch_size * 10;
        }
        if self.flush_interval.is_zero() {
            self.flush_interval = Duration::from_secs(10);
        }
        self
    }
}

/// Bounded-queue asynchronous wrapper around a downstream handler.
///
/// The worker delivers records downstream in enqueue order. Dropping
/// the wrapper closes it; [`close`](Self::close) is idempotent and
/// drains every queued record before returning.
pub struct Buffered {
    entries: Sender<Record>,
    flush_signal: Sender<()>,
    shutdown: Sender<()>,
    worker: Mutex<Option<JoinHandle<()>>>,
    closed: AtomicBool,
    config: Buffering,
}

impl Buffered {
    pub fn new(handler: impl Handler + 'static, config: Buffering) -> Self {
        Self::from_shared(Arc::new(handler), config)
    }

    pub fn with_defaults(handler: impl Handler + 'static) -> Self {
        Self::new(handler, Buffering::default())
    }

    pub fn from_shared(handler: Arc<dyn Handler>, config: Buffering) -> Self {
        let config = config.sanitized();
        let (entries_tx, entries_rx) = bounded(config.max_buffer);
        let (flush_tx, flush_rx) = bounded(1);
        let (shutdown_tx, shutdown_rx) = bounded(1);

        let batch_size = config.batch_size;
        let flush_interval = config.flush_interval;
        let handle = thread::spawn(move || {
            worker_loop(handler, entries_rx, flush_rx, shutdown_rx, batch_size, flush_interval);
        });

        Self {
            entries: entries_tx,
            flush_signal: flush_tx,
            shutdown: shutdown_tx,
            worker: Mutex::new(Some(handle)),
            closed: AtomicBool::new(false),
            config,
        }
    }

    pub fn config(&self) -> &Buffering {
        &self.config
    }

    /// Number of records currently queued.
    pub fn queued(&self) -> usize {
        self.entries.len()
    }

    /// Ask the worker to flush the in-flight batch and drain the queue.
    ///
    /// Gives up after 100ms when a flush is already pending so callers
    /// never deadlock behind one another.
    pub fn flush(&self) {
        let _ = self
            .flush_signal
            .send_timeout((), Duration::from_millis(100));
    }

    /// Stop the worker after draining everything queued. Idempotent.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        let _ = self.shutdown.try_send(());
        if let Some(handle) = self.worker.lock().take() {
            if handle.join().is_err() {
                eprintln!("[LOGGER ERROR] buffered worker panicked during shutdown");
            }
        }
    }
}

impl Handler for Buffered {
    fn handle(&self, record: &Record) -> Result<()> {
        match self.entries.try_send(record.clone()) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                let queued = self.entries.len();
                (self.config.on_overflow)(queued);
                let _ = self.flush_signal.try_send(());
                Err(LoggerError::BufferOverflow { queued })
            }
            // Worker already gone; the record is dropped silently
            Err(TrySendError::Disconnected(_)) => Ok(()),
        }
    }
}

impl Drop for Buffered {
    fn drop(&mut self) {
        self.close();
    }
}

fn worker_loop(
    handler: Arc<dyn Handler>,
    entries: Receiver<Record>,
    flush_signal: Receiver<()>,
    shutdown: Receiver<()>,
    batch_size: usize,
    flush_interval: Duration,
) {
    let ticker = tick(flush_interval);
    let mut batch: Vec<Record> = Vec::with_capacity(batch_size);

    loop {
        select! {
            recv(entries) -> msg => {
                if let Ok(record) = msg {
                    batch.push(record);
                    if batch.len() >= batch_size {
                        flush_batch(&handler, &mut batch);
                    }
                }
            }
            recv(ticker) -> _ => {
                if !batch.is_empty() {
                    flush_batch(&handler, &mut batch);
                }
            }
            recv(flush_signal) -> msg => {
                if msg.is_ok() {
                    flush_batch(&handler, &mut batch);
                    drain_remaining(&handler, &entries);
                }
            }
            recv(shutdown) -> _ => {
                flush_batch(&handler, &mut batch);
                drain_remaining(&handler, &entries);
                return;
            }
        }
    }
}

/// Submit each batched record downstream; a downstream error is
/// reported on stderr but never aborts the batch.
fn flush_batch(handler: &Arc<dyn Handler>, batch: &mut Vec<Record>) {
    for record in batch.drain(..) {
        if let Err(err) = handler.handle(&record) {
            eprintln!("[LOGGER ERROR] log flush error: {}", err);
        }
    }
}

fn drain_remaining(handler: &Arc<dyn Handler>, entries: &Receiver<Record>) {
    while let Ok(record) = entries.try_recv() {
        if let Err(err) = handler.handle(&record) {
            eprintln!("[LOGGER ERROR] log drain error: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Severity;
    use crate::handlers::MemoryHandler;
    use std::sync::atomic::AtomicUsize;

    fn record(message: &str) -> Record {
        Record::new(Severity::Info, message)
    }

    #[test]
    fn test_defaults() {
        let buffered = Buffered::with_defaults(MemoryHandler::new());
        assert_eq!(buffered.config().batch_size, 100);
        assert_eq!(buffered.config().flush_interval, Duration::from_secs(10));
        assert_eq!(buffered.config().max_buffer, 1000);
        buffered.close();
    }

    #[test]
    fn test_config_clamping() {
        let buffered = Buffered::new(
            MemoryHandler::new(),
            Buffering::new()
                .with_batch_size(0)
                .with_flush_interval(Duration::ZERO)
                .with_max_buffer(0),
        );
        assert_eq!(buffered.config().batch_size, 1);
        assert_eq!(buffered.config().flush_interval, Duration::from_secs(10));
        assert_eq!(buffered.config().max_buffer, 10);
        buffered.close();
    }

    #[test]
    fn test_small_max_buffer_raised_to_batch_multiple() {
        let buffered = Buffered::new(
            MemoryHandler::new(),
            Buffering::new().with_batch_size(10).with_max_buffer(5),
        );
        assert!(buffered.config().max_buffer >= buffered.config().batch_size);
        buffered.close();
    }

    #[test]
    fn test_batch_flush() {
        let sink = Arc::new(MemoryHandler::new());
        let buffered = Buffered::from_shared(
            sink.clone(),
            Buffering::new()
                .with_batch_size(2)
                .with_flush_interval(Duration::from_secs(10)),
        );

        buffered.handle(&record("one")).unwrap();
        buffered.handle(&record("two")).unwrap();

        // Two records fill the batch; the worker flushes without the
        // interval firing.
        let deadline = std::time::Instant::now() + Duration::from_secs(2);
        while sink.len() < 2 && std::time::Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(sink.len(), 2);
        buffered.close();
    }

    #[test]
    fn test_interval_flush() {
        let sink = Arc::new(MemoryHandler::new());
        let buffered = Buffered::from_shared(
            sink.clone(),
            Buffering::new()
                .with_batch_size(100)
                .with_flush_interval(Duration::from_millis(30)),
        );

        buffered.handle(&record("lonely")).unwrap();

        let deadline = std::time::Instant::now() + Duration::from_secs(2);
        while sink.is_empty() && std::time::Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(sink.len(), 1);
        buffered.close();
    }

    #[test]
    fn test_close_drains_pending_records() {
        let sink = Arc::new(MemoryHandler::new());
        let buffered = Buffered::from_shared(
            sink.clone(),
            Buffering::new()
                .with_batch_size(100)
                .with_flush_interval(Duration::from_secs(10)),
        );

        buffered.handle(&record("a")).unwrap();
        buffered.handle(&record("b")).unwrap();
        buffered.handle(&record("c")).unwrap();
        buffered.close();

        assert_eq!(sink.len(), 3);
    }

    #[test]
    fn test_close_is_idempotent() {
        let sink = Arc::new(MemoryHandler::new());
        let buffered = Buffered::from_shared(sink.clone(), Buffering::default());
        buffered.handle(&record("once")).unwrap();
        buffered.close();
        buffered.close();
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_drop_acts_as_close() {
        let sink = Arc::new(MemoryHandler::new());
        {
            let buffered = Buffered::from_shared(sink.clone(), Buffering::default());
            buffered.handle(&record("finalized")).unwrap();
        }
        assert_eq!(sink.len(), 1);
    }

    /// Downstream handler that parks until released, used to wedge the
    /// worker so the queue can be filled deterministically.
    struct GatedHandler {
        started: Sender<()>,
        release: Receiver<()>,
    }

    impl Handler for GatedHandler {
        fn handle(&self, _record: &Record) -> Result<()> {
            let _ = self.started.send(());
            let _ = self.release.recv_timeout(Duration::from_secs(5));
            Ok(())
        }
    }

    #[test]
    fn test_overflow_reports_and_errors() {
        let (started_tx, started_rx) = bounded(16);
        let (release_tx, release_rx) = bounded::<()>(16);
        let overflowed = Arc::new(AtomicUsize::new(0));
        let overflowed_cb = Arc::clone(&overflowed);

        let buffered = Buffered::new(
            GatedHandler {
                started: started_tx,
                release: release_rx,
            },
            Buffering::new()
                .with_batch_size(1)
                .with_max_buffer(2)
                .with_flush_interval(Duration::from_secs(10))
                .with_overflow_callback(move |_| {
                    overflowed_cb.fetch_add(1, Ordering::SeqCst);
                }),
        );

        // First record wedges the worker inside the downstream handle
        buffered.handle(&record("wedge")).unwrap();
        started_rx.recv_timeout(Duration::from_secs(2)).unwrap();

        // Queue capacity is 2; both fill while the worker is stuck
        buffered.handle(&record("q1")).unwrap();
        buffered.handle(&record("q2")).unwrap();

        let err = buffered.handle(&record("spill")).unwrap_err();
        assert!(matches!(err, LoggerError::BufferOverflow { .. }));
        assert_eq!(overflowed.load(Ordering::SeqCst), 1);

        // Unblock and shut down
        for _ in 0..8 {
            let _ = release_tx.try_send(());
        }
        buffered.close();
    }

    #[test]
    fn test_concurrent_producers_all_delivered() {
        let sink = Arc::new(MemoryHandler::new());
        let buffered = Arc::new(Buffered::from_shared(
            sink.clone(),
            Buffering::new()
                .with_batch_size(100)
                .with_flush_interval(Duration::from_millis(10))
                .with_max_buffer(2000),
        ));

        let mut handles = Vec::new();
        for t in 0..4 {
            let buffered = Arc::clone(&buffered);
            handles.push(thread::spawn(move || {
                for i in 0..50 {
                    buffered
                        .handle(&record(&format!("t{}-{}", t, i)))
                        .unwrap();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        buffered.close();
        assert_eq!(sink.len(), 200);
    }
}
