//! Record-transforming middleware stages
//!
//! A middleware sees each record after context merge and before the
//! sink. Stages run first-installed-first; an `Err` return drops the
//! record and stops the chain. The error value itself is never
//! surfaced to the emitting caller, so a drop and a failure look the
//! same from the outside.

use super::error::Result;
use super::record::Record;

/// A pipeline stage applied to each record before sink dispatch.
///
/// Implementations may mutate the record's message and fields but must
/// not retain a reference past the call. Stages holding state must be
/// internally synchronized; emissions arrive from any thread.
pub trait Middleware: Send + Sync {
    /// Process a record; `Err` drops it.
    fn handle(&self, record: &mut Record) -> Result<()>;
}

impl<F> Middleware for F
where
    F: Fn(&mut Record) -> Result<()> + Send + Sync,
{
    fn handle(&self, record: &mut Record) -> Result<()> {
        self(record)
    }
}
