//! Log record structure

use super::field::FieldList;
use super::level::Severity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How sinks render the namespace path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Style {
    /// Single bracketed slash-joined path: `[parent/child]`
    #[default]
    Flat,
    /// Bracketed segments joined by an arrow: `[parent] → [child]`
    Nested,
}

/// Kind of record content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Class {
    /// Ordinary formatted message
    #[default]
    Text,
    /// Message bytes are written verbatim, no decoration
    Raw,
    /// Message is a pre-rendered hex dump
    Dump,
    /// Message is pre-serialized JSON
    Json,
    /// Message is a pretty-printed value inspection
    Inspect,
}

/// One structured log event.
///
/// Created at emission and immutable once the middleware chain has run;
/// sinks receive it by reference and must not retain it past return.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub timestamp: DateTime<Utc>,
    pub level: Severity,
    pub class: Class,
    pub style: Style,
    /// Namespace path, segments joined by `/`; empty string is the root.
    pub namespace: String,
    pub message: String,
    pub fields: FieldList,
    /// Raw stack snapshot when the emission requested one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<Vec<u8>>,
}

impl Record {
    pub fn new(level: Severity, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            class: Class::Text,
            style: Style::Flat,
            namespace: String::new(),
            message: message.into(),
            fields: FieldList::new(),
            stack: None,
        }
    }

    #[must_use]
    pub fn with_class(mut self, class: Class) -> Self {
        self.class = class;
        self
    }

    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    #[must_use]
    pub fn with_fields(mut self, fields: FieldList) -> Self {
        self.fields = fields;
        self
    }
}
