use crate::formatter::LineFormatter;
use crate::record::{FieldValue, Level, LogEntry};
use chrono::Utc;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::{FormatEvent, FormatFields, Writer};
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::registry::LookupSpan;

/// Collects the fields of a `tracing` event into [`FieldValue`]s, pulling
/// the implicit `message` field out as the entry message.
pub struct FieldVisitor<'a> {
    pub fields: &'a mut BTreeMap<String, FieldValue>,
    pub message: &'a mut String,
}

impl<'a> Visit for FieldVisitor<'a> {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            *self.message = value.to_string();
        } else {
            self.fields.insert(field.name().to_string(), FieldValue::from(value));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.fields.insert(field.name().to_string(), FieldValue::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.fields.insert(field.name().to_string(), FieldValue::from(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.fields.insert(field.name().to_string(), FieldValue::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.fields.insert(field.name().to_string(), FieldValue::from(value));
    }

    fn record_error(&mut self, field: &Field, value: &(dyn Error + 'static)) {
        self.fields.insert(field.name().to_string(), FieldValue::failure(value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            *self.message = format!("{:?}", value);
        } else {
            self.fields.insert(field.name().to_string(), FieldValue::Other(format!("{:?}", value)));
        }
    }
}

impl LogEntry {
    /// Snapshot a `tracing` event as an entry stamped with the current time.
    pub fn from_event(event: &Event<'_>) -> Self {
        let mut fields = BTreeMap::new();
        let mut message = String::new();

        let mut visitor = FieldVisitor { fields: &mut fields, message: &mut message };
        event.record(&mut visitor);

        LogEntry {
            timestamp: Some(Utc::now()),
            level: Some(Level::from(*event.metadata().level())),
            message,
            fields,
        }
    }
}

/// Lets a [`LineFormatter`] serve as the event format of a
/// `tracing_subscriber::fmt` subscriber. Span context is not rendered; only
/// the event's own fields end up on the line.
impl<S, N> FormatEvent<S, N> for LineFormatter
where
    S: Subscriber + for<'span> LookupSpan<'span>,
    N: for<'w> FormatFields<'w> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let entry = LogEntry::from_event(event);
        self.write_entry(&mut writer, &entry)
    }
}
