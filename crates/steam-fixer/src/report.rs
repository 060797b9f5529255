//! Progress reporting for long-running operations.
//!
//! Operations take a `&mut dyn Reporter` instead of reaching for a global
//! logger, so callers decide where messages go. The binary uses
//! [`LogReporter`]; tests record messages with [`MemoryReporter`].

/// Sink for user-facing progress messages.
pub trait Reporter {
    fn heading(&mut self, message: &str);
    fn info(&mut self, message: &str);
    fn success(&mut self, message: &str);
    fn debug(&mut self, message: &str);
    fn warn(&mut self, message: &str);
    fn error(&mut self, message: &str);
}

/// Forwards every message to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn heading(&mut self, message: &str) {
        log::info!("=== {message} ===");
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn success(&mut self, message: &str) {
        log::info!("OK: {message}");
    }

    fn debug(&mut self, message: &str) {
        log::debug!("{message}");
    }

    fn warn(&mut self, message: &str) {
        log::warn!("{message}");
    }

    fn error(&mut self, message: &str) {
        log::error!("{message}");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Heading,
    Info,
    Success,
    Debug,
    Warn,
    Error,
}

/// Keeps every message in memory, in order.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    pub messages: Vec<(Level, String)>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages recorded at `level`.
    pub fn at(&self, level: Level) -> Vec<&str> {
        self.messages
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.as_str())
            .collect()
    }

    fn push(&mut self, level: Level, message: &str) {
        self.messages.push((level, message.to_string()));
    }
}

impl Reporter for MemoryReporter {
    fn heading(&mut self, message: &str) {
        self.push(Level::Heading, message);
    }

    fn info(&mut self, message: &str) {
        self.push(Level::Info, message);
    }

    fn success(&mut self, message: &str) {
        self.push(Level::Success, message);
    }

    fn debug(&mut self, message: &str) {
        self.push(Level::Debug, message);
    }

    fn warn(&mut self, message: &str) {
        self.push(Level::Warn, message);
    }

    fn error(&mut self, message: &str) {
        self.push(Level::Error, message);
    }
}
