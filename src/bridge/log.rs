// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::sync::Arc;

use crate::Level;
use crate::Logger;
use crate::record::Record;

/// The default environment variable for filtering records of the `log` crate.
pub const DEFAULT_FILTER_ENV: &str = "RUST_LOG";

/// Forward records of the [`log`] crate to a [`Logger`].
///
/// [`log::Level::Trace`] and [`log::Level::Debug`] both map to [`Level::Debug`]; the logger's own
/// threshold applies after the optional `env_filter` directives.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use logrota::Logger;
/// use logrota::bridge::LogBridge;
/// use logrota::sink::Stdout;
///
/// let logger = Arc::new(Logger::builder("app").sink(Stdout::default()).build());
/// LogBridge::new(logger).filter("info").apply().unwrap();
///
/// log::info!("This is an info message.");
/// ```
#[derive(Debug)]
pub struct LogBridge {
    logger: Arc<Logger>,
    filter: Option<env_filter::Filter>,
}

impl LogBridge {
    /// Create a bridge forwarding every record to `logger`.
    pub fn new(logger: Arc<Logger>) -> Self {
        Self {
            logger,
            filter: None,
        }
    }

    /// Filter records by `env_logger` style directives, such as `info,my_crate::db=debug`.
    #[must_use]
    pub fn filter(mut self, directives: &str) -> Self {
        self.filter = Some(env_filter::Builder::new().parse(directives).build());
        self
    }

    /// Filter records by the directives in the environment variable `key`, if it is set.
    #[must_use]
    pub fn filter_from_env(mut self, key: &str) -> Self {
        if let Ok(directives) = std::env::var(key) {
            self = self.filter(&directives);
        }
        self
    }

    /// Filter records by the directives in `RUST_LOG`, if it is set.
    #[must_use]
    pub fn filter_from_default_env(self) -> Self {
        self.filter_from_env(DEFAULT_FILTER_ENV)
    }

    /// The target logger.
    pub fn logger(&self) -> &Arc<Logger> {
        &self.logger
    }

    /// Install this bridge as the `log` crate global logger.
    ///
    /// This function will set the global maximum log level to `Trace`. To override this, call
    /// [`log::set_max_level`] after this function.
    ///
    /// # Errors
    ///
    /// Return an error if the log crate global logger has already been set.
    pub fn apply(self) -> Result<(), log::SetLoggerError> {
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(log::LevelFilter::Trace);
        Ok(())
    }
}

impl log::Log for LogBridge {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        if let Some(filter) = &self.filter {
            if !filter.enabled(metadata) {
                return false;
            }
        }
        self.logger.enabled(metadata.level().into())
    }

    fn log(&self, record: &log::Record) {
        if let Some(filter) = &self.filter {
            if !filter.matches(record) {
                return;
            }
        }

        let level = Level::from(record.level());
        if !self.logger.enabled(level) {
            return;
        }

        let message = record.args().to_string();
        let record = Record::builder()
            .logger(self.logger.name())
            .level(level)
            .message(&message)
            .file(record.file())
            .line(record.line())
            .build();
        self.logger.log_record(&record);
    }

    fn flush(&self) {
        self.logger.flush();
    }
}

#[cfg(test)]
mod tests {
    use log::Log;

    use super::*;
    use crate::layout::TemplateLayout;
    use crate::sink::Testing;

    fn bridge(level: Level) -> (LogBridge, Testing) {
        let sink = Testing::default();
        let logger = Logger::builder("bridge")
            .level(level)
            .layout(TemplateLayout::new("{level} {name} {message} {file}:{line}"))
            .sink(sink.clone())
            .build();
        (LogBridge::new(Arc::new(logger)), sink)
    }

    fn record<'a>(
        level: log::Level,
        target: &'a str,
        args: std::fmt::Arguments<'a>,
    ) -> log::Record<'a> {
        log::Record::builder()
            .level(level)
            .target(target)
            .args(args)
            .file(Some("src/db.rs"))
            .line(Some(7))
            .build()
    }

    #[test]
    fn test_forward_with_location() {
        let (bridge, sink) = bridge(Level::Debug);
        bridge.log(&record(log::Level::Warn, "app", format_args!("disk {}% full", 93)));
        bridge.log(&record(log::Level::Trace, "app", format_args!("tick")));
        assert_eq!(
            sink.lines(),
            vec![
                "WARNING bridge disk 93% full src/db.rs:7".to_string(),
                "DEBUG bridge tick src/db.rs:7".to_string(),
            ]
        );
    }

    #[test]
    fn test_logger_threshold() {
        let (bridge, sink) = bridge(Level::Error);
        let metadata = log::Metadata::builder().level(log::Level::Warn).build();
        assert!(!bridge.enabled(&metadata));
        bridge.log(&record(log::Level::Warn, "app", format_args!("dropped")));
        assert!(sink.lines().is_empty());
    }

    #[test]
    fn test_directives() {
        let (bridge, sink) = bridge(Level::Debug);
        let bridge = bridge.filter("warn,app::db=debug");

        bridge.log(&record(log::Level::Info, "app::net", format_args!("skipped")));
        bridge.log(&record(log::Level::Debug, "app::db", format_args!("query")));
        bridge.log(&record(log::Level::Error, "app::net", format_args!("refused")));

        assert_eq!(
            sink.lines(),
            vec![
                "DEBUG bridge query src/db.rs:7".to_string(),
                "ERROR bridge refused src/db.rs:7".to_string(),
            ]
        );
    }
}
