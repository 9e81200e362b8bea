//! JSON lines handler

use crate::core::{Class, Handler, Record, Result, SwapOutput};
use parking_lot::Mutex;
use std::io::Write;

/// Writes each record as a single-line JSON object (JSONL).
///
/// Compatible with log aggregation tooling; `Json`-class records carry
/// an already-serialized payload and are written as-is.
pub struct JsonHandler {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonHandler {
    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }

    fn to_json(record: &Record) -> serde_json::Value {
        let mut object = serde_json::Map::new();
        object.insert(
            "timestamp".to_string(),
            serde_json::Value::String(
                record
                    .timestamp
                    .to_rfc3339_opts(chrono::SecondsFormat::Nanos, true),
            ),
        );
        object.insert(
            "level".to_string(),
            serde_json::Value::String(record.level.to_str().to_string()),
        );
        object.insert(
            "message".to_string(),
            serde_json::Value::String(record.message.clone()),
        );
        object.insert(
            "namespace".to_string(),
            serde_json::Value::String(record.namespace.clone()),
        );
        for field in record.fields.iter() {
            object.insert(field.key.clone(), field.value.to_json_value());
        }
        serde_json::Value::Object(object)
    }
}

impl Handler for JsonHandler {
    fn handle(&self, record: &Record) -> Result<()> {
        let mut writer = self.writer.lock();
        if record.class == Class::Json {
            writer.write_all(record.message.as_bytes())?;
            writer.write_all(b"\n")?;
            return Ok(());
        }

        let data = serde_json::to_vec(&Self::to_json(record))?;
        writer.write_all(&data)?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

impl SwapOutput for JsonHandler {
    fn swap_output(&self, writer: Box<dyn Write + Send>) {
        *self.writer.lock() = writer;
    }
}
