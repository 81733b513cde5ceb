// Logger
//
// Reporting channel of an export run. Advisories arrive at `Warn`, failed
// passes at `Error`, finished passes at `Info` and pipeline decisions at
// `Debug`. `ConsoleLogger` hands everything to the `log` facade so the host
// binary picks the backend.

/// Severity of a message, ordered from most to least verbose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug = 0,
    Info = 1,
    Warn = 2,
    Error = 3,
}

impl LogLevel {
    fn to_log(self) -> log::Level {
        match self {
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Info => log::Level::Info,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Error => log::Level::Error,
        }
    }
}

pub trait Logger {
    fn level(&self) -> LogLevel;
    fn debug(&self, msg: &str);
    fn info(&self, msg: &str);
    fn warn(&self, msg: &str);
    fn error(&self, msg: &str);
    fn is_enabled(&self, level: LogLevel) -> bool {
        level >= self.level()
    }
}

/// Discards every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLogger;

impl Logger for NullLogger {
    fn level(&self) -> LogLevel {
        LogLevel::Error
    }
    fn debug(&self, _msg: &str) {}
    fn info(&self, _msg: &str) {}
    fn warn(&self, _msg: &str) {}
    fn error(&self, _msg: &str) {}
}

pub const DEFAULT_TARGET: &str = "binding_exporter";

/// Forwards messages at or above its level to the `log` facade under a fixed
/// target.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleLogger {
    level: LogLevel,
    target: &'static str,
}

impl ConsoleLogger {
    pub fn new(level: LogLevel) -> Self {
        Self {
            level,
            target: DEFAULT_TARGET,
        }
    }

    pub fn with_target(mut self, target: &'static str) -> Self {
        self.target = target;
        self
    }

    fn forward(&self, level: LogLevel, msg: &str) {
        if self.is_enabled(level) {
            log::log!(target: self.target, level.to_log(), "{}", msg);
        }
    }
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        Self::new(LogLevel::Warn)
    }
}

impl Logger for ConsoleLogger {
    fn level(&self) -> LogLevel {
        self.level
    }
    fn debug(&self, msg: &str) {
        self.forward(LogLevel::Debug, msg);
    }
    fn info(&self, msg: &str) {
        self.forward(LogLevel::Info, msg);
    }
    fn warn(&self, msg: &str) {
        self.forward(LogLevel::Warn, msg);
    }
    fn error(&self, msg: &str) {
        self.forward(LogLevel::Error, msg);
    }
}
