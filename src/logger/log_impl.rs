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

use std::fmt;
use std::fmt::Write;
use std::sync::RwLock;
use std::sync::RwLockReadGuard;
use std::sync::RwLockWriteGuard;
use std::sync::atomic::AtomicU8;
use std::sync::atomic::Ordering;

use crate::Error;
use crate::Layout;
use crate::Level;
use crate::Sink;
use crate::Trap;
use crate::logger::LoggerBuilder;
use crate::record::Location;
use crate::record::Record;

/// A named logger that filters records by level and fans them out to its sinks.
///
/// A logging call never fails and never panics: sink failures are handed to the logger's
/// [`Trap`] and delivery continues with the remaining sinks.
///
/// # Examples
///
/// ```
/// use logrota::Level;
/// use logrota::Logger;
/// use logrota::sink::Stdout;
///
/// let logger = Logger::builder("app")
///     .level(Level::Debug)
///     .sink(Stdout::default())
///     .build();
///
/// logger.debug("starting");
/// logger.set_level(Level::Warning);
/// logger.info("not delivered");
/// ```
pub struct Logger {
    name: String,
    level: AtomicU8,
    layout: Box<dyn Layout>,
    sinks: RwLock<Vec<Box<dyn Sink>>>,
    trap: Box<dyn Trap>,
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("level", &self.level())
            .field("layout", &self.layout)
            .field("sinks", &*self.sinks())
            .field("trap", &self.trap)
            .finish()
    }
}

impl Logger {
    pub(super) fn new(
        name: String,
        level: Level,
        layout: Box<dyn Layout>,
        sinks: Vec<Box<dyn Sink>>,
        trap: Box<dyn Trap>,
    ) -> Self {
        Self {
            name,
            level: AtomicU8::new(level as u8),
            layout,
            sinks: RwLock::new(sinks),
            trap,
        }
    }

    /// Create a new [`LoggerBuilder`].
    pub fn builder(name: impl Into<String>) -> LoggerBuilder {
        LoggerBuilder::new(name)
    }

    /// The name of this logger.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The level threshold of this logger.
    pub fn level(&self) -> Level {
        Level::from_u8(self.level.load(Ordering::Acquire)).unwrap_or(Level::Info)
    }

    /// Replace the level threshold.
    ///
    /// The new threshold applies to subsequent logging calls.
    pub fn set_level(&self, level: Level) {
        self.level.store(level as u8, Ordering::Release);
    }

    /// Whether a record of `level` would be delivered.
    pub fn enabled(&self, level: Level) -> bool {
        level >= self.level()
    }

    /// Append a sink.
    ///
    /// The sink receives only records logged after it is added.
    pub fn add_sink(&self, sink: impl Into<Box<dyn Sink>>) {
        self.sinks_mut().push(sink.into());
    }

    /// The number of attached sinks.
    pub fn sink_count(&self) -> usize {
        self.sinks().len()
    }

    /// Log a message at `level`, with an optional source location.
    pub fn log(&self, level: Level, message: impl fmt::Display, location: Option<Location<'_>>) {
        if !self.enabled(level) {
            return;
        }

        let message = message.to_string();
        let record = Record::builder()
            .logger(&self.name)
            .level(level)
            .message(&message)
            .location(location)
            .build();
        self.deliver(&record);
    }

    /// Log a prepared record.
    ///
    /// The record is filtered by this logger's threshold like any other call.
    pub fn log_record(&self, record: &Record) {
        if self.enabled(record.level()) {
            self.deliver(record);
        }
    }

    /// Log a message at [`Level::Debug`].
    #[track_caller]
    pub fn debug(&self, message: impl fmt::Display) {
        self.log(Level::Debug, message, Some(Location::caller()));
    }

    /// Log a message at [`Level::Info`].
    #[track_caller]
    pub fn info(&self, message: impl fmt::Display) {
        self.log(Level::Info, message, Some(Location::caller()));
    }

    /// Log a message at [`Level::Warning`].
    #[track_caller]
    pub fn warning(&self, message: impl fmt::Display) {
        self.log(Level::Warning, message, Some(Location::caller()));
    }

    /// Log a message at [`Level::Error`].
    #[track_caller]
    pub fn error(&self, message: impl fmt::Display) {
        self.log(Level::Error, message, Some(Location::caller()));
    }

    /// Log a message at [`Level::Critical`].
    #[track_caller]
    pub fn critical(&self, message: impl fmt::Display) {
        self.log(Level::Critical, message, Some(Location::caller()));
    }

    /// Log a message at [`Level::Error`] together with an error and its chain of sources.
    ///
    /// The error chain is appended to the message on the same line:
    ///
    /// ```text
    /// <message>: <error>; caused by: <source>; caused by: <source of source>
    /// ```
    ///
    /// Without an error, this is identical to [`Logger::error`].
    #[track_caller]
    pub fn exception(
        &self,
        message: impl fmt::Display,
        error: Option<&(dyn std::error::Error + 'static)>,
    ) {
        let location = Some(Location::caller());
        if !self.enabled(Level::Error) {
            return;
        }

        let Some(error) = error else {
            self.log(Level::Error, message, location);
            return;
        };

        let mut text = message.to_string();
        let _ = write!(&mut text, ": {error}");
        let mut source = error.source();
        while let Some(cause) = source {
            let _ = write!(&mut text, "; caused by: {cause}");
            source = cause.source();
        }
        self.log(Level::Error, text, location);
    }

    /// Flush all sinks.
    pub fn flush(&self) {
        for sink in self.sinks().iter() {
            if let Err(err) = sink.flush() {
                self.trap.trap(&err);
            }
        }
    }

    /// Close all sinks.
    ///
    /// Later records are still rendered and offered to the sinks, which reject or drop them.
    pub fn close(&self) {
        for sink in self.sinks().iter() {
            if let Err(err) = sink.close() {
                self.trap.trap(&err);
            }
        }
    }

    fn deliver(&self, record: &Record) {
        let line = self.layout.format(record);
        for (index, sink) in self.sinks().iter().enumerate() {
            if let Err(err) = sink.write(&line) {
                let err = Error::new(err.kind(), "failed to deliver log record")
                    .with_context("logger", &self.name)
                    .with_context("sink", index)
                    .with_source(err);
                self.trap.trap(&err);
            }
        }
    }

    fn sinks(&self) -> RwLockReadGuard<'_, Vec<Box<dyn Sink>>> {
        self.sinks.read().unwrap_or_else(|e| e.into_inner())
    }

    fn sinks_mut(&self) -> RwLockWriteGuard<'_, Vec<Box<dyn Sink>>> {
        self.sinks.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::Arc;
    use std::sync::Mutex;

    use super::*;
    use crate::ErrorKind;
    use crate::layout::TemplateLayout;
    use crate::sink::Testing;

    #[derive(Debug, Clone, Default)]
    struct CapturingTrap(Arc<Mutex<Vec<(ErrorKind, String)>>>);

    impl Trap for CapturingTrap {
        fn trap(&self, err: &Error) {
            let mut errors = self.0.lock().unwrap();
            errors.push((err.kind(), err.to_string()));
        }
    }

    impl CapturingTrap {
        fn errors(&self) -> Vec<(ErrorKind, String)> {
            self.0.lock().unwrap().clone()
        }
    }

    fn logger(level: Level, sink: &Testing) -> Logger {
        Logger::builder("MyProject")
            .level(level)
            .layout(TemplateLayout::new("{name} - {level} - {message}"))
            .sink(sink.clone())
            .build()
    }

    #[test]
    fn test_threshold() {
        let sink = Testing::default();
        let logger = logger(Level::Warning, &sink);

        logger.debug("a");
        logger.info("b");
        assert!(sink.lines().is_empty());

        logger.warning("c");
        logger.error("d");
        logger.critical("e");
        assert_eq!(
            sink.lines(),
            vec![
                "MyProject - WARNING - c".to_string(),
                "MyProject - ERROR - d".to_string(),
                "MyProject - CRITICAL - e".to_string(),
            ]
        );
    }

    #[test]
    fn test_fan_out_renders_once() {
        let first = Testing::default();
        let second = Testing::default();
        let logger = Logger::builder("app")
            .level(Level::Warning)
            .layout(TemplateLayout::new("{level}:{message}"))
            .sink(first.clone())
            .sink(second.clone())
            .build();

        logger.info("skipped");
        logger.error("disk full");

        assert_eq!(first.lines(), vec!["ERROR:disk full".to_string()]);
        assert_eq!(first.lines(), second.lines());
    }

    #[test]
    fn test_set_level() {
        let sink = Testing::default();
        let logger = logger(Level::Info, &sink);
        assert!(!logger.enabled(Level::Debug));

        logger.set_level(Level::Debug);
        assert_eq!(logger.level(), Level::Debug);
        logger.debug("now visible");

        logger.set_level(Level::Critical);
        logger.error("hidden");
        assert_eq!(sink.lines(), vec!["MyProject - DEBUG - now visible".to_string()]);
    }

    #[test]
    fn test_add_sink_without_replay() {
        let first = Testing::default();
        let logger = logger(Level::Debug, &first);
        logger.info("one");
        logger.info("two");

        let second = Testing::default();
        logger.add_sink(second.clone());
        assert_eq!(logger.sink_count(), 2);
        assert!(second.lines().is_empty());

        logger.info("three");
        assert_eq!(first.lines().len(), 3);
        assert_eq!(second.lines(), vec!["MyProject - INFO - three".to_string()]);
    }

    #[test]
    fn test_zero_sinks() {
        let logger = Logger::builder("silent").build();
        assert_eq!(logger.sink_count(), 0);
        logger.critical("nowhere to go");
        logger.flush();
        logger.close();
    }

    #[test]
    fn test_sink_failure_is_contained() {
        let broken = Testing::default();
        let healthy = Testing::default();
        let trap = CapturingTrap::default();
        let logger = Logger::builder("app")
            .layout(TemplateLayout::new("{message}"))
            .sink(broken.clone())
            .sink(healthy.clone())
            .trap(trap.clone())
            .build();

        broken.set_failing(true);
        logger.info("first");
        broken.set_failing(false);
        logger.info("second");

        assert_eq!(broken.lines(), vec!["second".to_string()]);
        assert_eq!(healthy.lines(), vec!["first".to_string(), "second".to_string()]);

        let errors = trap.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].0, ErrorKind::SinkWrite);
        assert!(errors[0].1.contains("failed to deliver log record"), "{}", errors[0].1);
        assert!(errors[0].1.contains("injected failure"), "{}", errors[0].1);
    }

    #[test]
    fn test_closed_sink_is_trapped() {
        let sink = Testing::default();
        let trap = CapturingTrap::default();
        let logger = Logger::builder("app").sink(sink.clone()).trap(trap.clone()).build();

        logger.close();
        logger.info("after close");

        assert!(sink.lines().is_empty());
        assert_eq!(trap.errors().len(), 1);
    }

    #[test]
    fn test_exception() {
        #[derive(Debug)]
        struct ConnectError(io::Error);

        impl std::fmt::Display for ConnectError {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("cannot connect to db")
            }
        }

        impl std::error::Error for ConnectError {
            fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
                Some(&self.0)
            }
        }

        let sink = Testing::default();
        let logger = logger(Level::Info, &sink);

        let err = ConnectError(io::Error::new(io::ErrorKind::ConnectionRefused, "refused"));
        logger.exception("query failed", Some(&err));
        logger.exception("no details", None);

        assert_eq!(
            sink.lines(),
            vec![
                "MyProject - ERROR - query failed: cannot connect to db; caused by: refused"
                    .to_string(),
                "MyProject - ERROR - no details".to_string(),
            ]
        );
    }

    #[test]
    fn test_location() {
        let sink = Testing::default();
        let logger = Logger::builder("app")
            .layout(TemplateLayout::new("{file}:{line} {message}"))
            .sink(sink.clone())
            .build();

        let line = line!() + 1;
        logger.info("here");
        logger.log(Level::Info, "anywhere", None);

        assert_eq!(
            sink.lines(),
            vec![format!("{}:{line} here", file!()), ":0 anywhere".to_string()]
        );
    }
}
