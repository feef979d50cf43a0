pub mod config;
pub mod error;
pub mod event;
pub mod formatter;
pub mod record;

pub use config::FormatterConfig;
pub use error::ConfigError;
pub use formatter::{encode_field, needs_quoting, normalize_key, LineFormatter, TIMESTAMP_FORMAT};
pub use record::{FieldValue, Level, LogEntry};
