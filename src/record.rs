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

use jiff::Timestamp;

use crate::Level;

/// The source location of a logging call.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Location<'a> {
    file: &'a str,
    line: u32,
}

impl<'a> Location<'a> {
    /// Create a new location.
    pub const fn new(file: &'a str, line: u32) -> Self {
        Self { file, line }
    }

    /// Capture the location of the caller.
    #[track_caller]
    pub fn caller() -> Location<'static> {
        Location::from(std::panic::Location::caller())
    }

    /// The source file.
    pub fn file(&self) -> &'a str {
        self.file
    }

    /// The source line.
    pub fn line(&self) -> u32 {
        self.line
    }
}

impl From<&'static std::panic::Location<'static>> for Location<'static> {
    fn from(location: &'static std::panic::Location<'static>) -> Self {
        Location::new(location.file(), location.line())
    }
}

/// The payload of a log message.
///
/// A record is created per logging call and discarded once it has been rendered.
#[derive(Clone, Debug)]
pub struct Record<'a> {
    // the observed time
    time: Timestamp,

    // the metadata
    logger: &'a str,
    level: Level,
    file: Option<&'a str>,
    line: Option<u32>,

    // the payload
    message: &'a str,
}

impl<'a> Record<'a> {
    /// Returns a new builder.
    pub fn builder() -> RecordBuilder<'a> {
        RecordBuilder::default()
    }

    /// The observed time.
    pub fn time(&self) -> Timestamp {
        self.time
    }

    /// The name of the logger that created the record.
    pub fn logger(&self) -> &'a str {
        self.logger
    }

    /// The severity of the message.
    pub fn level(&self) -> Level {
        self.level
    }

    /// The message body.
    pub fn message(&self) -> &'a str {
        self.message
    }

    /// The source file containing the message.
    pub fn file(&self) -> Option<&'a str> {
        self.file
    }

    /// The line containing the message.
    pub fn line(&self) -> Option<u32> {
        self.line
    }
}

/// Builder for [`Record`].
#[derive(Debug)]
pub struct RecordBuilder<'a> {
    record: Record<'a>,
}

impl Default for RecordBuilder<'_> {
    fn default() -> Self {
        RecordBuilder {
            record: Record {
                time: Timestamp::now(),
                logger: "",
                level: Level::Info,
                file: None,
                line: None,
                message: "",
            },
        }
    }
}

impl<'a> RecordBuilder<'a> {
    /// Set [`time`](Record::time).
    pub fn time(mut self, time: Timestamp) -> Self {
        self.record.time = time;
        self
    }

    /// Set [`logger`](Record::logger).
    pub fn logger(mut self, logger: &'a str) -> Self {
        self.record.logger = logger;
        self
    }

    /// Set [`level`](Record::level).
    pub fn level(mut self, level: Level) -> Self {
        self.record.level = level;
        self
    }

    /// Set [`message`](Record::message).
    pub fn message(mut self, message: &'a str) -> Self {
        self.record.message = message;
        self
    }

    /// Set [`file`](Record::file).
    pub fn file(mut self, file: Option<&'a str>) -> Self {
        self.record.file = file;
        self
    }

    /// Set [`line`](Record::line).
    pub fn line(mut self, line: Option<u32>) -> Self {
        self.record.line = line;
        self
    }

    /// Set both [`file`](Record::file) and [`line`](Record::line).
    pub fn location(self, location: Option<Location<'a>>) -> Self {
        match location {
            Some(location) => self.file(Some(location.file)).line(Some(location.line)),
            None => self.file(None).line(None),
        }
    }

    /// Invoke the builder and return a `Record`
    pub fn build(self) -> Record<'a> {
        self.record
    }
}
