//! Handler trait for record consumers

use super::error::Result;
use super::record::Record;
use std::io::Write;

/// A sink for records.
///
/// Handlers must tolerate concurrent invocation and must not retain a
/// reference to the record past return; the pipeline may reuse or drop
/// it immediately afterwards.
pub trait Handler: Send + Sync {
    fn handle(&self, record: &Record) -> Result<()>;
}

/// Implemented by handlers that own a swappable output resource.
///
/// The rotating composer uses this to install a fresh writer when the
/// byte threshold is crossed.
pub trait SwapOutput {
    fn swap_output(&self, writer: Box<dyn Write + Send>);
}
