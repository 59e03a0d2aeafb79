use tracing::field::{Field, Visit};
use tracing::level_filters::LevelFilter;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LoggingConfig;
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Map, Value};

/// Event fields whose values are credentials and never reach the log output.
const REDACTED_FIELDS: &[&str] = &["access_token", "refresh_token", "token"];

/// Collects event fields as JSON, masking credential fields.
#[derive(Default)]
struct EventFields(Map<String, Value>);

impl EventFields {
    fn put(&mut self, field: &Field, value: impl Into<Value>) {
        self.put_named(field.name(), value);
    }

    fn put_named(&mut self, name: &str, value: impl Into<Value>) {
        let value = if REDACTED_FIELDS.contains(&name) {
            Value::from("[redacted]")
        } else {
            value.into()
        };
        self.0.insert(name.to_string(), value);
    }
}

impl Visit for EventFields {
    fn record_i64(&mut self, field: &Field, value: i64) {
        self.put(field, value);
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.put(field, value);
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.put(field, value);
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.put(field, value);
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.put(field, value);
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.put(field, format!("{:?}", value));
    }
}

/// OpenTelemetry severity number for a tracing level.
fn severity_number(level: &Level) -> u8 {
    match *level {
        Level::TRACE => 1,
        Level::DEBUG => 5,
        Level::INFO => 9,
        Level::WARN => 13,
        Level::ERROR => 17,
    }
}

/// Service identity stamped on every JSON log record.
#[derive(Clone)]
struct SessionJsonFormatter {
    service_name: String,
    service_version: String,
}

impl SessionJsonFormatter {
    /// Build one log record after the OpenTelemetry log data model.
    fn record(
        &self,
        level: &Level,
        target: &str,
        line: Option<u32>,
        fields: EventFields,
    ) -> Value {
        let mut attributes = fields.0;
        let body = match attributes.remove("message") {
            Some(Value::String(message)) => message,
            Some(other) => other.to_string(),
            None => String::new(),
        };
        attributes.insert("code.target".into(), target.into());
        if let Some(line) = line {
            attributes.insert("code.lineno".into(), line.into());
        }

        json!({
            "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            "severity_text": level.as_str(),
            "severity_number": severity_number(level),
            "body": body,
            "resource": {
                "service.name": self.service_name,
                "service.version": self.service_version,
            },
            "attributes": attributes,
        })
    }
}

impl<S, N> FormatEvent<S, N> for SessionJsonFormatter
where
    S: Subscriber + for<'lookup> LookupSpan<'lookup>,
    N: for<'writer> FormatFields<'writer> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let metadata = event.metadata();
        let mut fields = EventFields::default();
        event.record(&mut fields);

        let record = self.record(
            metadata.level(),
            metadata.target(),
            metadata.line(),
            fields,
        );
        writeln!(writer, "{}", record)
    }
}

/// Parse a configured level name.
pub fn parse_level(level: &str) -> Result<LevelFilter, String> {
    match level.trim().to_lowercase().as_str() {
        "trace" => Ok(LevelFilter::TRACE),
        "debug" => Ok(LevelFilter::DEBUG),
        "info" => Ok(LevelFilter::INFO),
        "warn" => Ok(LevelFilter::WARN),
        "error" => Ok(LevelFilter::ERROR),
        other => Err(format!(
            "Invalid logging.level '{}'. Valid values: trace, debug, info, warn, error",
            other
        )),
    }
}

/// Install the global subscriber described by `logging_config`.
pub fn init_logging(logging_config: &LoggingConfig) -> Result<(), String> {
    let level_filter = parse_level(&logging_config.level)?;

    // RUST_LOG still wins for individual targets
    let filter_layer = EnvFilter::builder()
        .with_default_directive(level_filter.into())
        .from_env_lossy();

    let result = match logging_config.format.to_lowercase().as_str() {
        "json" => tracing_subscriber::registry()
            .with(filter_layer)
            .with(fmt::layer().event_format(SessionJsonFormatter {
                service_name: logging_config.service_name.clone(),
                service_version: logging_config.service_version.clone(),
            }))
            .try_init(),
        // Anything else falls back to the human readable console output
        _ => tracing_subscriber::registry()
            .with(filter_layer)
            .with(fmt::layer().pretty())
            .try_init(),
    };

    result.map_err(|e| format!("Failed to install tracing subscriber: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level_accepts_known_names() {
        assert_eq!(parse_level("info"), Ok(LevelFilter::INFO));
        assert_eq!(parse_level(" DEBUG "), Ok(LevelFilter::DEBUG));
    }

    #[test]
    fn test_parse_level_rejects_unknown_names() {
        assert!(parse_level("verbose").is_err());
    }

    #[test]
    fn test_init_logging_rejects_invalid_level() {
        let config = LoggingConfig {
            level: "loud".to_string(),
            ..LoggingConfig::default()
        };
        assert!(init_logging(&config).is_err());
    }

    #[test]
    fn test_json_record_layout() {
        let formatter = SessionJsonFormatter {
            service_name: "sessionkit".to_string(),
            service_version: "0.1.0".to_string(),
        };
        let mut fields = EventFields::default();
        fields.put_named("message", "Session bootstrap finished");
        fields.put_named("authenticated", true);

        let record = formatter.record(&Level::WARN, "sessionkit::auth", Some(42), fields);

        assert_eq!(record["severity_text"], "WARN");
        assert_eq!(record["severity_number"], 13);
        assert_eq!(record["body"], "Session bootstrap finished");
        assert_eq!(record["resource"]["service.name"], "sessionkit");
        assert_eq!(record["attributes"]["authenticated"], true);
        assert_eq!(record["attributes"]["code.target"], "sessionkit::auth");
        assert_eq!(record["attributes"]["code.lineno"], 42);
        assert!(record["attributes"].get("message").is_none());
    }

    #[test]
    fn test_credential_fields_are_redacted() {
        let mut fields = EventFields::default();
        fields.put_named("access_token", "eyJhbGciOi.abc.def");
        fields.put_named("path", "/api/auth/refresh");

        assert_eq!(fields.0["access_token"], "[redacted]");
        assert_eq!(fields.0["path"], "/api/auth/refresh");
    }
}
