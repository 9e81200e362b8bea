//! Sink composition example
//!
//! Builds a dedup -> buffered -> fan-out pipeline over text and JSON
//! outputs.
//!
//! Run with: cargo run --example sink_pipeline

use namespace_logger::handlers::{buffer_stage, dedup_stage, pipe};
use namespace_logger::prelude::*;
use std::sync::Arc;
use std::time::Duration;

fn main() {
    println!("=== Namespace Logger - Sink Pipeline Example ===\n");

    // Fan out to stdout as text and stderr as JSON
    let base: Arc<dyn Handler> = Arc::new(
        MultiHandler::empty()
            .with(TextHandler::stdout())
            .with(JsonHandler::new(std::io::stderr())),
    );

    // Dedup sits innermost, buffering outermost
    let handler = pipe(
        base,
        vec![
            dedup_stage(Duration::from_secs(2)),
            buffer_stage(
                Buffering::new()
                    .with_batch_size(8)
                    .with_flush_interval(Duration::from_millis(100)),
            ),
        ],
    );

    let logger = Logger::new("pipeline");
    logger.enable().set_shared_handler(handler);

    for attempt in 0..3 {
        logger
            .fields(["attempt", &attempt.to_string()[..]])
            .info("distinct records pass through");
    }

    // These three collapse into one downstream record
    for _ in 0..3 {
        logger.warn("identical warning inside the dedup window");
    }

    // Let the interval flush fire; dropping the logger at the end of
    // main closes the buffered stage and drains anything left.
    std::thread::sleep(Duration::from_millis(200));

    println!("\n=== Example completed ===");
}
