//! In-memory record collector

use crate::core::{Handler, Record, Result};
use parking_lot::Mutex;

/// Stores every record it receives; meant for tests and in-process
/// inspection.
#[derive(Debug, Default)]
pub struct MemoryHandler {
    records: Mutex<Vec<Record>>,
}

impl MemoryHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the collected records.
    pub fn records(&self) -> Vec<Record> {
        self.records.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

impl Handler for MemoryHandler {
    fn handle(&self, record: &Record) -> Result<()> {
        self.records.lock().push(record.clone());
        Ok(())
    }
}
