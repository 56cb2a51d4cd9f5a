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

use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::MutexGuard;

use jiff::Timestamp;
use jiff::tz::TimeZone;

use crate::Error;
use crate::sink::Fault;
use crate::sink::Sink;
use crate::sink::SinkHealth;
use crate::sink::rolling_file::Interval;
use crate::sink::rolling_file::Rotation;
use crate::sink::rolling_file::clock::Clock;
use crate::sink::rolling_file::rolling::RollingFileWriter;

/// A builder for configuring [`RollingFile`].
#[must_use = "call `build` to open the rolling file"]
#[derive(Debug)]
pub struct RollingFileBuilder {
    path: PathBuf,
    rotation: Rotation,
    backup_count: usize,
    tz: Option<TimeZone>,
    clock: Clock,
}

impl RollingFileBuilder {
    /// Create a new builder writing to `path`.
    ///
    /// Default to rotating at midnight and keeping 5 backups.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            rotation: Rotation::Time(Interval::Midnight),
            backup_count: 5,
            tz: None,
            clock: Clock::DefaultClock,
        }
    }

    /// Sets the rotation rule.
    pub fn rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    /// Sets the maximum number of backups to keep.
    ///
    /// With zero backups, rotation truncates the file instead of archiving it.
    pub fn backup_count(mut self, n: usize) -> Self {
        self.backup_count = n;
        self
    }

    /// Sets the time zone of time-based rotation boundaries and backup names.
    ///
    /// Default to the system time zone.
    pub fn timezone(mut self, tz: TimeZone) -> Self {
        self.tz = Some(tz);
        self
    }

    #[cfg(test)]
    pub(crate) fn clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Open the file and build the [`RollingFile`].
    ///
    /// # Errors
    ///
    /// Return a [`Config`](crate::ErrorKind::Config) error if either:
    ///
    /// * The size limit of a size rotation is zero.
    /// * The path does not name a file, or names a directory.
    /// * The log directory or the log file cannot be created.
    pub fn build(self) -> Result<RollingFile, Error> {
        let RollingFileBuilder {
            path,
            rotation,
            backup_count,
            tz,
            clock,
        } = self;
        let tz = tz.unwrap_or_else(TimeZone::system);
        let writer = RollingFileWriter::open(path, rotation, backup_count, tz, clock)?;
        Ok(RollingFile {
            state: Mutex::new(State {
                writer,
                status: Status::Open,
                dropped: 0,
            }),
        })
    }
}

/// A sink that writes log lines to a file, rotating it by size or by time.
///
/// All writes, rotations and state changes of one sink are serialized, so concurrent writers
/// never observe a half-rotated file and a boundary crossing rotates exactly once.
///
/// A write or rotation failure degrades the sink: the failing write returns the error, and
/// later writes are dropped silently until [`RollingFile::reopen`] succeeds.
#[derive(Debug)]
pub struct RollingFile {
    state: Mutex<State>,
}

#[derive(Debug)]
struct State {
    writer: RollingFileWriter,
    status: Status,
    dropped: u64,
}

#[derive(Debug)]
enum Status {
    Open,
    Degraded(Fault),
    Closed,
}

impl RollingFile {
    /// Create a new [`RollingFileBuilder`] writing to `path`.
    pub fn builder(path: impl Into<PathBuf>) -> RollingFileBuilder {
        RollingFileBuilder::new(path)
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// The path of the current log file.
    pub fn path(&self) -> PathBuf {
        self.state().writer.path().to_path_buf()
    }

    /// The number of bytes in the current log file.
    pub fn current_size(&self) -> u64 {
        self.state().writer.current_size()
    }

    /// The retained backups, oldest first.
    pub fn retained(&self) -> Vec<PathBuf> {
        self.state().writer.retained().to_vec()
    }

    /// The number of lines dropped while the sink was degraded.
    pub fn dropped(&self) -> u64 {
        self.state().dropped
    }

    /// The error that degraded the sink, if any.
    pub fn last_error(&self) -> Option<Fault> {
        match &self.state().status {
            Status::Degraded(fault) => Some(fault.clone()),
            _ => None,
        }
    }

    /// Reopen the log file after a failure or after [`Sink::close`].
    ///
    /// On success the sink accepts writes again. On failure it stays (or becomes) degraded.
    pub fn reopen(&self) -> Result<(), Error> {
        let mut state = self.state();
        match state.writer.reopen() {
            Ok(()) => {
                state.status = Status::Open;
                Ok(())
            }
            Err(err) => {
                state.status = Status::Degraded(Fault::new(&err, Timestamp::now()));
                Err(err)
            }
        }
    }
}

impl Sink for RollingFile {
    fn write(&self, line: &str) -> Result<(), Error> {
        let mut state = self.state();
        match state.status {
            Status::Open => {}
            Status::Degraded(_) => {
                state.dropped += 1;
                return Ok(());
            }
            Status::Closed => return Err(Error::sink_write("sink is closed")),
        }

        if let Err(err) = state.writer.write_line(line) {
            state.status = Status::Degraded(Fault::new(&err, Timestamp::now()));
            return Err(err);
        }
        Ok(())
    }

    fn flush(&self) -> Result<(), Error> {
        self.state().writer.flush()
    }

    fn close(&self) -> Result<(), Error> {
        let mut state = self.state();
        state.status = Status::Closed;
        state.writer.close()
    }

    fn health(&self) -> SinkHealth {
        match &self.state().status {
            Status::Open => SinkHealth::Healthy,
            Status::Degraded(fault) => SinkHealth::Degraded(fault.clone()),
            Status::Closed => SinkHealth::Closed,
        }
    }
}
