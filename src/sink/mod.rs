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

//! Sinks that durably record rendered log lines.

use std::fmt;
use std::sync::Arc;

use jiff::Timestamp;

use crate::Error;
use crate::ErrorKind;

pub mod rolling_file;
mod stdio;
mod testing;

pub use self::rolling_file::RollingFile;
pub use self::stdio::Stderr;
pub use self::stdio::Stdout;
pub use self::testing::Testing;

/// A destination for rendered log lines.
///
/// Any type that can write a line qualifies as a sink. The line passed to [`Sink::write`] has no
/// trailing newline; the sink terminates each line itself.
pub trait Sink: fmt::Debug + Send + Sync + 'static {
    /// Write one rendered line.
    fn write(&self, line: &str) -> Result<(), Error>;

    /// Flush any buffered lines.
    ///
    /// Default to a no-op.
    fn flush(&self) -> Result<(), Error> {
        Ok(())
    }

    /// Release the resources held by this sink.
    ///
    /// Default to [`Sink::flush`].
    fn close(&self) -> Result<(), Error> {
        self.flush()
    }

    /// Report the current health of this sink.
    ///
    /// Default to [`SinkHealth::Healthy`].
    fn health(&self) -> SinkHealth {
        SinkHealth::Healthy
    }
}

impl<T: Sink> From<T> for Box<dyn Sink> {
    fn from(value: T) -> Self {
        Box::new(value)
    }
}

impl<T: Sink + ?Sized> Sink for Arc<T> {
    fn write(&self, line: &str) -> Result<(), Error> {
        (**self).write(line)
    }

    fn flush(&self) -> Result<(), Error> {
        (**self).flush()
    }

    fn close(&self) -> Result<(), Error> {
        (**self).close()
    }

    fn health(&self) -> SinkHealth {
        (**self).health()
    }
}

/// The health of a sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkHealth {
    /// The sink accepts writes.
    Healthy,
    /// The sink failed and drops writes until it is reopened.
    Degraded(Fault),
    /// The sink has been closed.
    Closed,
}

impl SinkHealth {
    /// Whether the sink accepts writes.
    pub fn is_healthy(&self) -> bool {
        matches!(self, SinkHealth::Healthy)
    }
}

/// A failure recorded on a sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
    kind: ErrorKind,
    message: String,
    time: Timestamp,
}

impl Fault {
    pub(crate) fn new(err: &Error, time: Timestamp) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
            time,
        }
    }

    /// The kind of the error that degraded the sink.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The rendered error that degraded the sink.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// When the error happened.
    pub fn time(&self) -> Timestamp {
        self.time
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.time, self.message)
    }
}
