use crate::config::FormatterConfig;
use crate::error::ConfigError;
use crate::record::{FieldValue, LogEntry};
use chrono::{DateTime, Utc};
use std::fmt::{self, Write};

/// Timestamp pattern for the `time=` slot: ISO-8601, millisecond precision,
/// literal `Z` (the instant is always rendered in UTC).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Rendered in the `log_level=` slot when an entry carries no level.
pub const UNKNOWN_LEVEL: &str = "UNKNOWN";

/// Formats a [`LogEntry`] as a single `key=value` line:
///
/// ```text
/// AS:worker time="2021-01-02T15:04:05.123Z" log_level=INFO msg='''hello''' total_time=56 remote="host:9010"
/// ```
///
/// The formatter only holds its two identifiers, so one instance can be
/// shared between threads and reused for every entry of a pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineFormatter {
    project_name: String,
    component_name: String,
}

impl LineFormatter {
    /// Build a formatter for `project_name:component_name`.
    ///
    /// **Returns**
    /// - `Err(ConfigError::EmptyProjectName)` if `project_name` is empty
    ///   (checked first, whatever `component_name` is).
    /// - `Err(ConfigError::EmptyComponentName)` if `component_name` is empty.
    pub fn new(
        project_name: impl Into<String>,
        component_name: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let project_name = project_name.into();
        let component_name = component_name.into();

        if project_name.is_empty() {
            tracing::warn!("rejecting line formatter without a project name");
            return Err(ConfigError::EmptyProjectName);
        }
        if component_name.is_empty() {
            tracing::warn!(project = %project_name, "rejecting line formatter without a component name");
            return Err(ConfigError::EmptyComponentName);
        }

        tracing::debug!(project = %project_name, component = %component_name, "line formatter ready");
        Ok(LineFormatter { project_name, component_name })
    }

    pub fn from_config(config: &FormatterConfig) -> Result<Self, ConfigError> {
        Self::new(config.project_name.as_str(), config.component_name.as_str())
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn component_name(&self) -> &str {
        &self.component_name
    }

    /// Format `entry` into a freshly allocated, newline-terminated line.
    pub fn format(&self, entry: &LogEntry) -> Vec<u8> {
        let mut buf = String::with_capacity(128 + entry.message.len() + 32 * entry.fields.len());
        self.format_into(entry, &mut buf);
        buf.into_bytes()
    }

    /// Append the formatted line to `buf`, letting callers reuse one buffer
    /// across entries. Existing content of `buf` is kept.
    pub fn format_into(&self, entry: &LogEntry, buf: &mut String) {
        // `fmt::Write` for `String` never fails.
        let _ = self.write_entry(buf, entry);
    }

    /// Write the line for `entry` into any `fmt::Write` destination.
    ///
    /// Only fails when `out` itself fails.
    pub fn write_entry<W: Write + ?Sized>(&self, out: &mut W, entry: &LogEntry) -> fmt::Result {
        let timestamp: DateTime<Utc> = entry.timestamp.unwrap_or_default();
        let level = entry.level.map_or(UNKNOWN_LEVEL, |l| l.as_str());

        write!(
            out,
            "{}:{} time=\"{}\" log_level={} msg='''{}''' ",
            self.project_name,
            self.component_name,
            timestamp.format(TIMESTAMP_FORMAT),
            level,
            entry.message,
        )?;
        for (key, value) in &entry.fields {
            encode_field(out, key, value)?;
        }
        out.write_char('\n')
    }
}

impl TryFrom<FormatterConfig> for LineFormatter {
    type Error = ConfigError;

    fn try_from(config: FormatterConfig) -> Result<Self, Self::Error> {
        Self::new(config.project_name, config.component_name)
    }
}

/// Write `<normalized key>=<value> ` to `out`.
pub fn encode_field<W: Write + ?Sized>(out: &mut W, key: &str, value: &FieldValue) -> fmt::Result {
    write_normalized_key(out, key)?;
    out.write_char('=')?;
    match value {
        FieldValue::Text(text) | FieldValue::Failure(text) => write_text(out, text)?,
        FieldValue::Absent => out.write_str("<nil>")?,
        FieldValue::Other(rendered) => out.write_str(rendered)?,
    }
    out.write_char(' ')
}

/// Whether `text` has to be double-quoted to stay a single bare token.
///
/// Empty text is quoted, as is anything containing a character outside
/// `[A-Za-z0-9-._/@^+]`; this covers double quotes, whitespace and
/// non-printable characters as well as separators such as `:` and `=`.
pub fn needs_quoting(text: &str) -> bool {
    text.is_empty() || !text.chars().all(is_bare_safe)
}

/// Replace every `.` in a field key with `_`.
pub fn normalize_key(key: &str) -> String {
    key.replace('.', "_")
}

fn is_bare_safe(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '-' | '.' | '_' | '/' | '@' | '^' | '+')
}

fn write_normalized_key<W: Write + ?Sized>(out: &mut W, key: &str) -> fmt::Result {
    for ch in key.chars() {
        out.write_char(if ch == '.' { '_' } else { ch })?;
    }
    Ok(())
}

fn write_text<W: Write + ?Sized>(out: &mut W, text: &str) -> fmt::Result {
    if needs_quoting(text) {
        // `str`'s Debug output is a quoted literal with `"`, `\` and
        // control characters backslash-escaped.
        write!(out, "{:?}", text)
    } else {
        out.write_str(text)
    }
}
