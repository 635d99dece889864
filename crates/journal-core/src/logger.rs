//! Diagnostic logging capability
//!
//! The store reports diagnostics as named events with a small key/value
//! context, through an injected `EventLogger`. Logging never changes
//! control flow.

use std::sync::Mutex;

use tracing::{error, info, warn};

/// Namespace attached to every event emitted by the default logger
pub const DEFAULT_NAMESPACE: &str = "community-log";

/// Severity of a diagnostic event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Error,
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
        }
    }
}

/// Sink for diagnostic events
pub trait EventLogger: Send + Sync {
    /// Record `event` at `level` with its context
    fn log(&self, level: Level, event: &str, context: &[(&str, String)]);

    fn info(&self, event: &str, context: &[(&str, String)]) {
        self.log(Level::Info, event, context);
    }

    fn warn(&self, event: &str, context: &[(&str, String)]) {
        self.log(Level::Warn, event, context);
    }

    fn error(&self, event: &str, context: &[(&str, String)]) {
        self.log(Level::Error, event, context);
    }
}

/// Forwards events to `tracing`
#[derive(Debug, Clone)]
pub struct TracingLogger {
    namespace: String,
}

impl TracingLogger {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }
}

impl Default for TracingLogger {
    fn default() -> Self {
        Self::new(DEFAULT_NAMESPACE)
    }
}

impl EventLogger for TracingLogger {
    fn log(&self, level: Level, event: &str, context: &[(&str, String)]) {
        let context = format_context(context);
        let namespace = self.namespace.as_str();
        match level {
            Level::Info => info!(namespace, event, context = %context),
            Level::Warn => warn!(namespace, event, context = %context),
            Level::Error => error!(namespace, event, context = %context),
        }
    }
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl EventLogger for NoopLogger {
    fn log(&self, _level: Level, _event: &str, _context: &[(&str, String)]) {}
}

/// An event captured by `MemoryLogger`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggedEvent {
    pub level: Level,
    pub event: String,
    pub context: Vec<(String, String)>,
}

impl LoggedEvent {
    /// Look up a context value by key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.context
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Records events in memory so they can be inspected afterwards
#[derive(Debug, Default)]
pub struct MemoryLogger {
    events: Mutex<Vec<LoggedEvent>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything logged so far
    pub fn events(&self) -> Vec<LoggedEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl EventLogger for MemoryLogger {
    fn log(&self, level: Level, event: &str, context: &[(&str, String)]) {
        let logged = LoggedEvent {
            level,
            event: event.to_string(),
            context: context
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        };
        match self.events.lock() {
            Ok(mut events) => events.push(logged),
            Err(poisoned) => poisoned.into_inner().push(logged),
        }
    }
}

/// Render context pairs as `key=value` separated by spaces
fn format_context(context: &[(&str, String)]) -> String {
    context
        .iter()
        .map(|(k, v)| format!("{}={:?}", k, v))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_logger_records_in_order() {
        let logger = MemoryLogger::new();
        logger.info("first", &[]);
        logger.warn("second", &[("error", "bad".to_string())]);
        logger.error("third", &[]);

        let events = logger.events();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].level, Level::Info);
        assert_eq!(events[1].event, "second");
        assert_eq!(events[1].get("error"), Some("bad"));
        assert_eq!(events[2].level, Level::Error);
    }

    #[test]
    fn test_format_context() {
        let ctx = [("a", "1".to_string()), ("b", "two words".to_string())];
        assert_eq!(format_context(&ctx), "a=\"1\" b=\"two words\"");
        assert_eq!(format_context(&[]), "");
    }

    #[test]
    fn test_tracing_logger_without_subscriber_is_silent() {
        let logger = TracingLogger::default();
        logger.warn("storage.load_failed", &[("error", "x".to_string())]);
    }

    #[test]
    fn test_level_names() {
        assert_eq!(Level::Info.as_str(), "info");
        assert_eq!(Level::Warn.as_str(), "warn");
        assert_eq!(Level::Error.as_str(), "error");
    }
}
