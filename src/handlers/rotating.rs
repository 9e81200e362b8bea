//! Rotating output wrapper
//!
//! Counts the bytes a wrapped handler writes and, once a threshold is
//! crossed, swaps in a fresh writer pulled from an injected rotation
//! source. What "rotate" means (numbered backups, date-stamped files,
//! a remote stream) is entirely the source's business.

use crate::core::{Handler, LoggerError, Record, Result, SwapOutput};
use parking_lot::Mutex;
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Produces the next output writer each time the wrapper rotates.
pub trait RotateSource: Send + Sync {
    fn next_writer(&self) -> std::io::Result<Box<dyn Write + Send>>;
}

impl<F> RotateSource for F
where
    F: Fn() -> std::io::Result<Box<dyn Write + Send>> + Send + Sync,
{
    fn next_writer(&self) -> std::io::Result<Box<dyn Write + Send>> {
        self()
    }
}

/// Counts bytes flowing into the wrapped writer.
struct CountingWriter {
    inner: Box<dyn Write + Send>,
    written: Arc<AtomicU64>,
}

impl Write for CountingWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.written.fetch_add(n as u64, Ordering::Relaxed);
        Ok(n)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

/// Byte-threshold rotation wrapper around an output-owning handler.
pub struct Rotating<H> {
    inner: H,
    max_bytes: u64,
    written: Arc<AtomicU64>,
    source: Box<dyn RotateSource>,
    rotate_guard: Mutex<()>,
}

impl<H: Handler + SwapOutput> Rotating<H> {
    /// Wrap `handler`, installing the source's first writer.
    pub fn new(
        handler: H,
        max_bytes: u64,
        source: impl RotateSource + 'static,
    ) -> Result<Self> {
        let written = Arc::new(AtomicU64::new(0));
        let writer = source
            .next_writer()
            .map_err(|e| LoggerError::rotation(e.to_string()))?;
        handler.swap_output(Box::new(CountingWriter {
            inner: writer,
            written: Arc::clone(&written),
        }));

        Ok(Self {
            inner: handler,
            max_bytes,
            written,
            source: Box::new(source),
            rotate_guard: Mutex::new(()),
        })
    }

    /// Bytes written to the current output.
    pub fn current_size(&self) -> u64 {
        self.written.load(Ordering::Relaxed)
    }

    fn rotate(&self) -> Result<()> {
        let _guard = self.rotate_guard.lock();
        // Another thread may have rotated while we waited
        if self.written.load(Ordering::Relaxed) <= self.max_bytes {
            return Ok(());
        }
        let writer = self
            .source
            .next_writer()
            .map_err(|e| LoggerError::rotation(e.to_string()))?;
        self.written.store(0, Ordering::Relaxed);
        self.inner.swap_output(Box::new(CountingWriter {
            inner: writer,
            written: Arc::clone(&self.written),
        }));
        Ok(())
    }
}

impl<H: Handler + SwapOutput> Handler for Rotating<H> {
    fn handle(&self, record: &Record) -> Result<()> {
        if self.written.load(Ordering::Relaxed) > self.max_bytes {
            if let Err(err) = self.rotate() {
                // Keep writing to the old output rather than losing
                // the record; the size check fires again next time.
                eprintln!("[LOGGER WARNING] log rotation failed: {}", err);
            }
        }
        self.inner.handle(record)
    }
}

/// Rotation source writing numbered files under a base path:
/// `app.log`, then `app.log.1`, `app.log.2`, ...
pub fn rotating_file_source(base_path: impl Into<PathBuf>) -> impl RotateSource {
    let base_path = base_path.into();
    let generation = AtomicU64::new(0);
    move || -> std::io::Result<Box<dyn Write + Send>> {
        let generation = generation.fetch_add(1, Ordering::SeqCst);
        let path = if generation == 0 {
            base_path.clone()
        } else {
            let mut path = base_path.clone().into_os_string();
            path.push(format!(".{}", generation));
            PathBuf::from(path)
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        Ok(Box::new(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Severity;
    use crate::handlers::TextHandler;
    use tempfile::tempdir;

    fn record(message: &str) -> Record {
        Record::new(Severity::Info, message)
    }

    #[test]
    fn test_rotates_when_threshold_exceeded() {
        let dir = tempdir().unwrap();
        let base = dir.path().join("rotation.log");

        let rotating = Rotating::new(
            TextHandler::stdout(),
            64,
            rotating_file_source(base.clone()),
        )
        .unwrap();

        for i in 0..20 {
            rotating.handle(&record(&format!("entry number {}", i))).unwrap();
        }

        assert!(base.exists());
        assert!(base.with_file_name("rotation.log.1").exists());
    }

    #[test]
    fn test_counts_written_bytes() {
        let dir = tempdir().unwrap();
        let base = dir.path().join("count.log");

        let rotating = Rotating::new(
            TextHandler::stdout(),
            1024 * 1024,
            rotating_file_source(base),
        )
        .unwrap();

        assert_eq!(rotating.current_size(), 0);
        rotating.handle(&record("hello")).unwrap();
        assert!(rotating.current_size() > 0);
    }

    #[test]
    fn test_all_records_survive_rotation() {
        let dir = tempdir().unwrap();
        let base = dir.path().join("survive.log");

        let rotating = Rotating::new(
            TextHandler::stdout(),
            80,
            rotating_file_source(base.clone()),
        )
        .unwrap();

        for i in 0..30 {
            rotating.handle(&record(&format!("msg {}", i))).unwrap();
        }
        drop(rotating);

        let mut combined = String::new();
        for entry in std::fs::read_dir(dir.path()).unwrap() {
            combined.push_str(&std::fs::read_to_string(entry.unwrap().path()).unwrap());
        }
        for i in 0..30 {
            assert!(combined.contains(&format!("msg {}", i)), "missing msg {}", i);
        }
    }
}
