//! Record sinks and sink composers

pub mod buffered;
pub mod colorized;
pub mod dedup;
pub mod json;
pub mod memory;
pub mod multi;
pub mod pipe;
pub mod rotating;
pub mod text;

pub use buffered::{Buffered, Buffering, OverflowCallback};
pub use colorized::ColorizedHandler;
pub use dedup::Dedup;
pub use json::JsonHandler;
pub use memory::MemoryHandler;
pub use multi::MultiHandler;
pub use pipe::{buffer_stage, dedup_stage, pipe, Wrap};
pub use rotating::{rotating_file_source, RotateSource, Rotating};
pub use text::TextHandler;
