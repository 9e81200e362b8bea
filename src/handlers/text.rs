//! Plain-text handler

use crate::core::{Class, Handler, Record, Result, Severity, Style, SwapOutput};
use parking_lot::Mutex;
use std::io::Write;

/// Renders records as plain text.
///
/// Flat style: `[parent/child] LEVEL: message [k=v]`. Nested style
/// replaces the bracket group with `[parent] → [child]: `. Raw records
/// are written verbatim, Dump records are framed by BEGIN/END markers,
/// and the `None` severity suppresses the trailing newline.
pub struct TextHandler {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl TextHandler {
    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }

    pub fn stderr() -> Self {
        Self::new(std::io::stderr())
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
                        out.push('[');
                        out.push_str(segment);
                        out.push(']');
                    }
                    out.push_str(": ");
                }
                Style::Flat => {
                    out.push('[');
                    out.push_str(&record.namespace);
                    out.push_str("] ");
                }
            }
        }

        out.push_str(record.level.to_str());
        out.push_str(": ");

        out.push_str(&record.message);

        if !record.fields.is_empty() {
            out.push_str(" [");
            for (i, field) in record.fields.iter().enumerate() {
                if i > 0 {
                    out.push(' ');
                }
                out.push_str(&field.key);
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

impl Handler for TextHandler {
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

impl SwapOutput for TextHandler {
    fn swap_output(&self, writer: Box<dyn Write + Send>) {
        *self.writer.lock() = writer;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FieldList;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().clone()).unwrap()
        }
    }

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn record(level: Severity, namespace: &str, message: &str) -> Record {
        Record::new(level, message).with_namespace(namespace)
    }

    #[test]
    fn test_flat_rendering() {
        let buf = SharedBuf::default();
        let handler = TextHandler::new(buf.clone());
        let mut rec = record(Severity::Info, "app/db", "query ran");
        rec.fields = FieldList::from_entries([("rows", 3)]);

        handler.handle(&rec).unwrap();
        assert_eq!(buf.contents(), "[app/db] INFO: query ran [rows=3]\n");
    }

    #[test]
    fn test_nested_rendering() {
        let buf = SharedBuf::default();
        let handler = TextHandler::new(buf.clone());
        let mut rec = record(Severity::Warn, "app/db/pool", "slow");
        rec.style = Style::Nested;

        handler.handle(&rec).unwrap();
        assert_eq!(buf.contents(), "[app] → [db] → [pool]: WARN: slow\n");
    }

    #[test]
    fn test_empty_namespace_has_no_brackets() {
        let buf = SharedBuf::default();
        let handler = TextHandler::new(buf.clone());
        handler.handle(&record(Severity::Info, "", "rootless")).unwrap();
        assert_eq!(buf.contents(), "INFO: rootless\n");
    }

    #[test]
    fn test_fields_render_in_insertion_order() {
        let buf = SharedBuf::default();
        let handler = TextHandler::new(buf.clone());
        let mut rec = record(Severity::Info, "t", "m");
        rec.fields = FieldList::from_entries([("z", 1), ("a", 2)]);

        handler.handle(&rec).unwrap();
        assert_eq!(buf.contents(), "[t] INFO: m [z=1 a=2]\n");
    }

    #[test]
    fn test_raw_class_writes_verbatim() {
        let buf = SharedBuf::default();
        let handler = TextHandler::new(buf.clone());
        let mut rec = record(Severity::None, "t", "no decoration");
        rec.class = Class::Raw;

        handler.handle(&rec).unwrap();
        assert_eq!(buf.contents(), "no decoration");
    }

    #[test]
    fn test_none_severity_drops_only_the_newline() {
        let buf = SharedBuf::default();
        let handler = TextHandler::new(buf.clone());
        handler.handle(&record(Severity::None, "", "bare")).unwrap();
        assert_eq!(buf.contents(), ": bare");
    }

    #[test]
    fn test_dump_class_is_framed() {
        let buf = SharedBuf::default();
        let handler = TextHandler::new(buf.clone());
        let mut rec = record(Severity::Debug, "t", "00000000  68 69\n");
        rec.class = Class::Dump;

        handler.handle(&rec).unwrap();
        let out = buf.contents();
        assert!(out.starts_with("---- BEGIN DUMP ----\n"));
        assert!(out.ends_with("---- END DUMP ----\n"));
    }

    #[test]
    fn test_swap_output_redirects() {
        let first = SharedBuf::default();
        let second = SharedBuf::default();
        let handler = TextHandler::new(first.clone());

        handler.handle(&record(Severity::Info, "", "one")).unwrap();
        handler.swap_output(Box::new(second.clone()));
        handler.handle(&record(Severity::Info, "", "two")).unwrap();

        assert_eq!(first.contents(), "INFO: one\n");
        assert_eq!(second.contents(), "INFO: two\n");
    }
}
