//! Structured JSON logger
//!
//! - One log line = one event
//! - `event` and `severity` first, then fields sorted by key
//! - Synchronous, no buffering
//! - Silent unless enabled

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use super::events::Event;

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Debug-level detail
    Trace = 0,
    /// Normal operations
    Info = 1,
    /// Refused operations
    Warn = 2,
}

impl Severity {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// In-memory destination for log lines
///
/// Clones share one buffer, so a caller can keep a handle while a logger
/// writes into it.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines written so far, each without its trailing newline
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }

    fn push(&self, line: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line.trim_end_matches('\n').to_string());
        }
    }
}

impl PartialEq for MemorySink {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.lines, &other.lines)
    }
}

impl Eq for MemorySink {}

/// A structured logger that outputs JSON lines
///
/// Warnings go to stderr, everything else to stdout, unless a memory sink
/// is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Logger {
    enabled: bool,
    min_severity: Severity,
    sink: Option<MemorySink>,
}

impl Default for Logger {
    fn default() -> Self {
        Self::disabled()
    }
}

impl Logger {
    /// Logger emitting events at or above `min_severity`
    pub fn new(min_severity: Severity) -> Self {
        Self {
            enabled: true,
            min_severity,
            sink: None,
        }
    }

    /// Logger that never emits
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            min_severity: Severity::Warn,
            sink: None,
        }
    }

    /// Redirect output into `sink` instead of stdout/stderr
    pub fn with_sink(mut self, sink: MemorySink) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Whether an event at `severity` would be written
    pub fn is_enabled_for(&self, severity: Severity) -> bool {
        self.enabled && severity >= self.min_severity
    }

    /// Log an event at its own severity
    pub fn event(&self, event: Event, fields: &[(&str, &str)]) {
        let severity = event.severity();
        if !self.is_enabled_for(severity) {
            return;
        }

        let line = render(severity, event.as_str(), fields);
        if let Some(sink) = &self.sink {
            sink.push(&line);
            return;
        }
        // Logging failures never affect specification semantics
        let _ = if severity >= Severity::Warn {
            write_line(&mut io::stderr(), &line)
        } else {
            write_line(&mut io::stdout(), &line)
        };
    }
}

fn write_line<W: Write>(writer: &mut W, line: &str) -> io::Result<()> {
    writer.write_all(line.as_bytes())?;
    writer.flush()
}

/// Render one JSON log line, newline terminated
pub fn render(severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
    let mut output = String::with_capacity(128);

    output.push_str("{\"event\":\"");
    escape_json_string(&mut output, event);
    output.push_str("\",\"severity\":\"");
    output.push_str(severity.as_str());
    output.push('"');

    let mut sorted_fields: Vec<_> = fields.iter().collect();
    sorted_fields.sort_by_key(|(k, _)| *k);

    for (key, value) in sorted_fields {
        output.push_str(",\"");
        escape_json_string(&mut output, key);
        output.push_str("\":\"");
        escape_json_string(&mut output, value);
        output.push('"');
    }

    output.push_str("}\n");
    output
}

fn escape_json_string(output: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '"' => output.push_str("\\\""),
            '\\' => output.push_str("\\\\"),
            '\n' => output.push_str("\\n"),
            '\r' => output.push_str("\\r"),
            '\t' => output.push_str("\\t"),
            c if c.is_control() => output.push_str(&format!("\\u{:04x}", c as u32)),
            c => output.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Trace < Severity::Info);
        assert!(Severity::Info < Severity::Warn);
    }

    #[test]
    fn test_render_json_format() {
        let output = render(Severity::Info, "SPEC_REGISTERED", &[("id", "OrderRule::Paid")]);

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["event"], "SPEC_REGISTERED");
        assert_eq!(parsed["severity"], "INFO");
        assert_eq!(parsed["id"], "OrderRule::Paid");
    }

    #[test]
    fn test_render_deterministic_ordering() {
        let a = render(Severity::Info, "TEST", &[("zebra", "1"), ("apple", "2")]);
        let b = render(Severity::Info, "TEST", &[("apple", "2"), ("zebra", "1")]);
        assert_eq!(a, b);
        assert!(a.find("apple").unwrap() < a.find("zebra").unwrap());
    }

    #[test]
    fn test_render_escapes_special_chars() {
        let output = render(Severity::Warn, "TEST", &[("message", "a \"b\"\nc")]);
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["message"], "a \"b\"\nc");
        assert_eq!(output.matches('\n').count(), 1);
    }

    #[test]
    fn test_disabled_logger_filters_everything() {
        let logger = Logger::disabled();
        assert!(!logger.is_enabled_for(Severity::Warn));
        assert_eq!(Logger::default(), logger);
    }

    #[test]
    fn test_min_severity_filter() {
        let logger = Logger::new(Severity::Warn);
        assert!(!logger.is_enabled_for(Severity::Info));
        assert!(logger.is_enabled_for(Severity::Warn));
    }

    #[test]
    fn test_sink_receives_filtered_events() {
        let sink = MemorySink::new();
        let logger = Logger::new(Severity::Info).with_sink(sink.clone());

        logger.event(Event::SpecBuilt, &[("spec", "Specification{subject=Order}")]);
        logger.event(Event::SpecRegistered, &[("id", "OrderRule::Paid")]);

        let lines = sink.lines();
        assert_eq!(lines.len(), 1);
        let parsed: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(parsed["event"], "SPEC_REGISTERED");
        assert_eq!(parsed["id"], "OrderRule::Paid");
    }

    #[test]
    fn test_disabled_logger_leaves_sink_empty() {
        let sink = MemorySink::new();
        let logger = Logger::disabled().with_sink(sink.clone());
        logger.event(Event::SpecUniquenessRejected, &[]);
        assert!(sink.lines().is_empty());
    }

    #[test]
    fn test_severity_serde_names() {
        let json = serde_json::to_string(&Severity::Warn).unwrap();
        assert_eq!(json, "\"WARN\"");
        let parsed: Severity = serde_json::from_str("\"TRACE\"").unwrap();
        assert_eq!(parsed, Severity::Trace);
    }
}
