//! Basic logger usage example
//!
//! Demonstrates namespaced logging, levels, styles and structured fields.
//!
//! Run with: cargo run --example basic_usage

use namespace_logger::prelude::*;

fn main() {
    println!("=== Namespace Logger - Basic Usage Example ===\n");

    let logger = Logger::new("app");
    logger.enable();

    println!("1. Logging at different levels:");
    logger.debug("This is a debug message");
    logger.info("This is an info message");
    logger.warn("This is a warning message");
    logger.error("This is an error message");

    println!("\n2. Structured fields:");
    logger
        .fields(["user", "alice", "attempt", "3"])
        .info("login succeeded");

    println!("\n3. Derived namespaces:");
    let db = logger.namespace("db");
    db.info("connection established");
    db.namespace("query").info("SELECT 1");

    println!("\n4. Nested path style:");
    logger.set_style(Style::Nested);
    db.set_style(Style::Nested);
    db.namespace("pool").warn("running low on connections");

    println!("\n5. Namespace gating:");
    logger.namespace_disable("app/db");
    db.info("this one is suppressed");
    logger.namespace_enable("app/db/query");
    db.namespace("query").info("but the re-enabled child still logs");

    println!("\n6. Conditional logging:");
    let verbose = false;
    logger.when(verbose).info("only in verbose mode");
    logger.when(!verbose).info("condition was true");

    println!("\n=== Example completed ===");
}
