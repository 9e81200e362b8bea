//! ANSI-colored text handler

use crate::core::{Class, Handler, Record, Result, Severity, Style, SwapOutput};
use colored::Colorize;
use parking_lot::Mutex;
use std::io::Write;

/// The text layout with severity, namespace and field-key coloring.
pub struct ColorizedHandler {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl ColorizedHandler {
    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }

    fn render(record: &Record) -> String {
        let mut out = String::new();

        if !record.namespace.is_empty() {
            match record.style {
                Style::Nested => {
                    let mut first = true;
                    for segment in record.namespace.split('/') {
                        if !first {
                            out.push_str(" → ");
                        }
                        first = false;
                        out.push_str(&format!("[{}]", segment).bright_black().to_string());
                    }
                    out.push_str(": ");
                }
                Style::Flat => {
                    out.push_str(
                        &format!("[{}] ", record.namespace).bright_black().to_string(),
                    );
                }
            }
        }

        out.push_str(
            &record
                .level
                .to_str()
                .color(record.level.color_code())
                .to_string(),
        );
        out.push_str(": ");

        out.push_str(&record.message);

        if !record.fields.is_empty() {
            out.push_str(" [");
            for (i, field) in record.fields.iter().enumerate() {
                if i > 0 {
                    out.push(' ');
                }
                out.push_str(&field.key.blue().to_string());
                out.push('=');
                out.push_str(&field.value.to_string());
            }
            out.push(']');
        }

        if record.level != Severity::None {
            out.push('\n');
        }

        out
    }
}

impl Handler for ColorizedHandler {
    fn handle(&self, record: &Record) -> Result<()> {
        let mut writer = self.writer.lock();
        match record.class {
            Class::Raw => {
                writer.write_all(record.message.as_bytes())?;
            }
            Class::Dump => {
                writer.write_all(b"---- BEGIN DUMP ----\n")?;
                writer.write_all(record.message.as_bytes())?;
                writer.write_all(b"---- END DUMP ----\n")?;
            }
            _ => {
                writer.write_all(Self::render(record).as_bytes())?;
            }
        }
        Ok(())
    }
}

impl SwapOutput for ColorizedHandler {
    fn swap_output(&self, writer: Box<dyn Write + Send>) {
        *self.writer.lock() = writer;
    }
}
