use crate::library::logger::interface::Logger;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Clone, PartialEq)]
pub enum LogLevel {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct LogLine {
    pub level: LogLevel,
    pub namespace: Option<String>,
    pub message: String,
}

/// Keeps every line in memory so tests can assert on what was logged.
#[derive(Clone, Default)]
pub struct LoggerFake {
    namespace: Option<String>,
    lines: Arc<Mutex<Vec<LogLine>>>,
}

impl LoggerFake {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<LogLine> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn errors(&self) -> Vec<LogLine> {
        self.lines()
            .into_iter()
            .filter(|line| line.level == LogLevel::Error)
            .collect()
    }

    fn push(&self, level: LogLevel, message: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(LogLine {
                level,
                namespace: self.namespace.clone(),
                message: message.to_string(),
            });
    }
}

impl Logger for LoggerFake {
    fn info(&self, message: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.push(LogLevel::Info, message);
        Ok(())
    }

    fn error(&self, message: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.push(LogLevel::Error, message);
        Ok(())
    }

    fn with_namespace(&self, namespace: &str) -> Arc<dyn Logger + Send + Sync> {
        let new_namespace = match &self.namespace {
            Some(current) => format!("{}:{}", current, namespace),
            None => namespace.to_string(),
        };

        Arc::new(LoggerFake {
            namespace: Some(new_namespace),
            lines: Arc::clone(&self.lines),
        })
    }
}

#[cfg(test)]
mod logger_fake_test {
    use super::*;

    #[test]
    fn test_namespaces_share_lines() {
        let logger = LoggerFake::new();
        let child = logger.with_namespace("camera").with_namespace("fake");

        child.info("Starting camera...").unwrap();
        child.error("camera unplugged").unwrap();

        let lines = logger.lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].namespace.as_deref(), Some("camera:fake"));
        assert_eq!(logger.errors().len(), 1);
        assert_eq!(logger.errors()[0].message, "camera unplugged");
    }
}
