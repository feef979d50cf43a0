use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;

/// Severity of a [`LogEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
    Panic,
}

impl Level {
    /// Uppercase name used in the `log_level=` slot.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Fatal => "FATAL",
            Level::Panic => "PANIC",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<tracing::Level> for Level {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::TRACE => Level::Trace,
            tracing::Level::DEBUG => Level::Debug,
            tracing::Level::INFO => Level::Info,
            tracing::Level::WARN => Level::Warn,
            tracing::Level::ERROR => Level::Error,
        }
    }
}

/// Value attached to a field of a [`LogEntry`].
///
/// The variant decides how the value is rendered: `Text` and `Failure` are
/// quoted only when their content is unsafe to emit bare, `Absent` renders as
/// `<nil>` and `Other` is always emitted as-is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FieldValue {
    Text(String),
    /// Message text extracted from an error value.
    Failure(String),
    Absent,
    /// Default textual rendering of any other kind (numbers, booleans, ...).
    Other(String),
}

impl FieldValue {
    pub fn failure(err: &(dyn Error + 'static)) -> Self {
        FieldValue::Failure(err.to_string())
    }

    pub fn other(value: impl fmt::Display) -> Self {
        FieldValue::Other(value.to_string())
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

macro_rules! other_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for FieldValue {
                fn from(value: $ty) -> Self {
                    FieldValue::Other(value.to_string())
                }
            }
        )*
    };
}

other_from!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, char);

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Absent, Into::into)
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => FieldValue::Absent,
            serde_json::Value::String(s) => FieldValue::Text(s),
            other => FieldValue::Other(other.to_string()),
        }
    }
}

/// One structured log record, as handed over by the producing pipeline.
///
/// `timestamp` and `level` are optional so that a partially assembled entry
/// can still be formatted; the formatter substitutes the Unix epoch and
/// `UNKNOWN` respectively.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LogEntry {
    pub timestamp: Option<DateTime<Utc>>,
    pub level: Option<Level>,
    pub message: String,
    pub fields: BTreeMap<String, FieldValue>,
}

impl LogEntry {
    /// Build an entry, normalizing `timestamp` to UTC.
    pub fn new<Tz: TimeZone>(
        timestamp: DateTime<Tz>,
        level: Level,
        message: impl Into<String>,
    ) -> Self {
        LogEntry {
            timestamp: Some(timestamp.with_timezone(&Utc)),
            level: Some(level),
            message: message.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert_field(key, value);
        self
    }

    pub fn insert_field(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(key.into(), value.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn level_names_are_uppercase() {
        assert_eq!(Level::Info.to_string(), "INFO");
        assert_eq!(Level::Warn.to_string(), "WARN");
        assert_eq!(Level::from(tracing::Level::ERROR), Level::Error);
    }

    #[test]
    fn new_normalizes_to_utc() {
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let local = offset.with_ymd_and_hms(2021, 1, 2, 17, 4, 5).unwrap();
        let entry = LogEntry::new(local, Level::Info, "hello");
        let expected = Utc.with_ymd_and_hms(2021, 1, 2, 15, 4, 5).unwrap();
        assert_eq!(entry.timestamp, Some(expected));
    }

    #[test]
    fn conversions_pick_the_right_kind() {
        assert_eq!(FieldValue::from("x"), FieldValue::Text("x".into()));
        assert_eq!(FieldValue::from(56), FieldValue::Other("56".into()));
        assert_eq!(FieldValue::from(true), FieldValue::Other("true".into()));
        assert_eq!(FieldValue::from(None::<i32>), FieldValue::Absent);
        assert_eq!(FieldValue::from(Some("y")), FieldValue::Text("y".into()));
    }

    #[test]
    fn json_values_map_onto_kinds() {
        assert_eq!(FieldValue::from(serde_json::Value::Null), FieldValue::Absent);
        assert_eq!(FieldValue::from(serde_json::json!("q")), FieldValue::Text("q".into()));
        assert_eq!(FieldValue::from(serde_json::json!(200)), FieldValue::Other("200".into()));
        assert_eq!(
            FieldValue::from(serde_json::json!({"a": 1})),
            FieldValue::Other(r#"{"a":1}"#.into())
        );
    }

    #[test]
    fn failure_keeps_the_error_message() {
        let err = std::io::Error::new(std::io::ErrorKind::Other, "connection reset");
        assert_eq!(FieldValue::failure(&err), FieldValue::Failure("connection reset".into()));
    }
}
