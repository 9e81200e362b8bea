//! Core pipeline types and traits

pub mod builder;
pub mod error;
pub mod field;
pub mod global;
pub mod handler;
pub mod level;
pub mod logger;
pub mod middleware;
pub mod namespace;
pub mod rate_limit;
pub mod record;
pub mod sampling;

pub use builder::{Conditional, FieldBuilder};
pub use error::{LoggerError, Result};
pub use field::{Field, FieldList, FieldValue};
pub use handler::{Handler, SwapOutput};
pub use level::Severity;
pub use logger::{Logger, DEFAULT_STACK_BUFFER_SIZE};
pub use middleware::Middleware;
pub use namespace::NamespaceStore;
pub use rate_limit::RateLimiter;
pub use record::{Class, Record, Style};
pub use sampling::Sampler;
