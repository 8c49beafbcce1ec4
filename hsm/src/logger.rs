//! Encapsulates how the engine emits diagnostic tracing. Routed through the
//! `log` crate so a host application's chosen backend (env_logger, tracing's
//! log bridge, ...) decides what actually gets printed; `log_level_allowed`
//! only gates what this engine *attempts* to emit, independent of whatever
//! the global max level happens to be.
use log::{log, Level, LevelFilter};

#[derive(Clone)]
pub struct HSMLogger {
    pub(crate) log_level_allowed: LevelFilter,
}

impl Default for HSMLogger {
    fn default() -> Self {
        Self {
            log_level_allowed: LevelFilter::Info,
        }
    }
}

impl HSMLogger {
    /// # Params
    /// level_allowed - The level of logs this engine instance will attempt
    /// to emit via the `log` crate.
    pub fn new(level_allowed: LevelFilter) -> Self {
        Self {
            log_level_allowed: level_allowed,
        }
    }

    fn log_msg(&self, level: Level, function_logging: &str, msg: &str) {
        if level <= self.log_level_allowed {
            log!(target: "hsm", level, "[{}] {}", function_logging, msg);
        }
    }

    pub(crate) fn log_info(&self, function_logging: &str, msg: &str) {
        self.log_msg(Level::Info, function_logging, msg)
    }

    pub(crate) fn log_error(&self, function_logging: &str, msg: &str) {
        self.log_msg(Level::Error, function_logging, msg)
    }

    #[allow(dead_code)]
    pub(crate) fn log_debug(&self, function_logging: &str, msg: &str) {
        self.log_msg(Level::Debug, function_logging, msg)
    }

    pub(crate) fn log_trace(&self, function_logging: &str, msg: &str) {
        self.log_msg(Level::Trace, function_logging, msg)
    }
}

impl From<LevelFilter> for HSMLogger {
    fn from(level: LevelFilter) -> Self {
        HSMLogger::new(level)
    }
}
