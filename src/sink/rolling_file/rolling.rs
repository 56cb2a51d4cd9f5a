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

use std::fs;
use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use jiff::Timestamp;
use jiff::Zoned;
use jiff::tz::TimeZone;

use crate::Error;
use crate::sink::rolling_file::Rotation;
use crate::sink::rolling_file::clock::Clock;

/// The file-level state machine behind [`RollingFile`](super::RollingFile).
///
/// The writer is not synchronized; the owning sink serializes all calls.
#[derive(Debug)]
pub(crate) struct RollingFileWriter {
    path: PathBuf,
    log_dir: PathBuf,
    log_filename: String,
    rotation: Rotation,
    backup_count: usize,
    tz: TimeZone,
    clock: Clock,

    file: Option<File>,
    current_size: u64,
    anchor: Zoned,
    next_rollover: Option<Zoned>,
    // oldest first
    retained: Vec<PathBuf>,
}

impl RollingFileWriter {
    pub(crate) fn open(
        path: PathBuf,
        rotation: Rotation,
        backup_count: usize,
        tz: TimeZone,
        clock: Clock,
    ) -> Result<Self, Error> {
        rotation.validate()?;

        let log_filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(str::to_string)
            .ok_or_else(|| {
                Error::config("log file path must end with a UTF-8 file name")
                    .with_context("path", path.display())
            })?;
        let log_dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        if path.is_dir() {
            return Err(Error::config("log file path is a directory")
                .with_context("path", path.display()));
        }
        fs::create_dir_all(&log_dir).map_err(|err| {
            Error::config("failed to create log directory")
                .with_context("dir", log_dir.display())
                .with_source(err)
        })?;

        let now = clock.now().to_zoned(tz.clone());
        let mut writer = RollingFileWriter {
            path,
            log_dir,
            log_filename,
            rotation,
            backup_count,
            tz,
            clock,
            file: None,
            current_size: 0,
            anchor: now.clone(),
            next_rollover: rotation.next_boundary(&now),
            retained: vec![],
        };

        writer.retained = writer.list_backups()?;
        writer.prune(backup_count)?;
        writer
            .open_current()
            .map_err(|err| Error::config("failed to open log file").with_source(err))?;
        Ok(writer)
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn current_size(&self) -> u64 {
        self.current_size
    }

    pub(crate) fn retained(&self) -> &[PathBuf] {
        &self.retained
    }

    pub(crate) fn is_open(&self) -> bool {
        self.file.is_some()
    }

    /// Write one line, rotating first if the line triggers the rotation rule.
    pub(crate) fn write_line(&mut self, line: &str) -> Result<(), Error> {
        let mut bytes = Vec::with_capacity(line.len() + 1);
        bytes.extend_from_slice(line.as_bytes());
        bytes.push(b'\n');
        let len = bytes.len() as u64;

        let now = self.now();
        if self.should_rollover(&now, len) {
            self.rotate(&now)?;
        }

        let file = self
            .file
            .as_mut()
            .ok_or_else(|| Error::sink_write("log file is not open"))?;
        file.write_all(&bytes).map_err(|err| {
            Error::sink_write("failed to write log file")
                .with_context("path", self.path.display())
                .with_source(err)
        })?;
        self.current_size += len;
        Ok(())
    }

    pub(crate) fn flush(&mut self) -> Result<(), Error> {
        match self.file.as_mut() {
            Some(file) => file.flush().map_err(Error::from_io_error),
            None => Ok(()),
        }
    }

    /// Flush and release the current file handle.
    pub(crate) fn close(&mut self) -> Result<(), Error> {
        let result = self.flush();
        self.file = None;
        result
    }

    /// Reopen the current file after a failure, keeping the rotation schedule.
    pub(crate) fn reopen(&mut self) -> Result<(), Error> {
        self.file = None;
        self.retained = self.list_backups()?;
        self.prune(self.backup_count)?;
        self.open_current()
    }

    fn now(&self) -> Zoned {
        self.clock.now().to_zoned(self.tz.clone())
    }

    fn should_rollover(&self, now: &Zoned, len: u64) -> bool {
        match self.rotation {
            // an empty file is never rotated, even if a single line exceeds the limit
            Rotation::Size { max_bytes } => {
                self.current_size > 0 && self.current_size + len > max_bytes
            }
            Rotation::Time(_) => self
                .next_rollover
                .as_ref()
                .is_some_and(|next| now.timestamp() >= next.timestamp()),
        }
    }

    /// Open (or create) the file at the target path in append mode.
    fn open_current(&mut self) -> Result<(), Error> {
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .map_err(|err| {
                Error::rotation("failed to open log file")
                    .with_context("path", self.path.display())
                    .with_source(err)
            })?;
        let metadata = file.metadata().map_err(|err| {
            Error::rotation("failed to read log file metadata")
                .with_context("path", self.path.display())
                .with_source(err)
        })?;

        self.current_size = metadata.len();
        if self.current_size > 0 {
            // continue the period of the existing file
            if let Some(mtime) = metadata
                .modified()
                .ok()
                .and_then(|mtime| Timestamp::try_from(mtime).ok())
            {
                self.anchor = mtime.to_zoned(self.tz.clone());
                self.next_rollover = self.rotation.next_boundary(&self.anchor);
            }
        }
        self.file = Some(file);
        Ok(())
    }

    fn rotate(&mut self, now: &Zoned) -> Result<(), Error> {
        if let Some(mut file) = self.file.take() {
            if let Err(err) = file.flush() {
                return Err(Error::rotation("failed to flush log file before rotation")
                    .with_context("path", self.path.display())
                    .with_source(err));
            }
        }

        if self.backup_count == 0 {
            File::create(&self.path).map_err(|err| {
                Error::rotation("failed to truncate log file")
                    .with_context("path", self.path.display())
                    .with_source(err)
            })?;
        } else {
            let archive = match self.rotation {
                Rotation::Size { .. } => self.shift_backups()?,
                Rotation::Time(interval) => {
                    let stamp = jiff::fmt::strtime::format(interval.suffix_format(), &self.anchor)
                        .map_err(|err| {
                            Error::rotation("failed to format backup suffix").with_source(err)
                        })?;
                    self.free_backup_name(&stamp)
                }
            };
            fs::rename(&self.path, &archive).map_err(|err| {
                Error::rotation("failed to archive log file")
                    .with_context("from", self.path.display())
                    .with_context("to", archive.display())
                    .with_source(err)
            })?;
            self.retained.push(archive);
        }

        self.open_current()?;
        self.current_size = 0;
        self.anchor = now.clone();
        self.next_rollover = self.rotation.next_boundary(now);

        // the oldest backup goes only once the new one is in place
        self.prune(self.backup_count)
    }

    /// Rename `<path>.<n>` to `<path>.<n+1>` for every retained backup and return `<path>.1`.
    fn shift_backups(&mut self) -> Result<PathBuf, Error> {
        // oldest (highest sequence) first, so no rename overwrites a retained file
        for backup in self.retained.iter_mut() {
            let Some(seq) = sequence_of(&self.log_filename, backup) else {
                continue;
            };
            let next = self.log_dir.join(format!("{}.{}", self.log_filename, seq + 1));
            fs::rename(&*backup, &next).map_err(|err| {
                Error::rotation("failed to shift log backup")
                    .with_context("from", backup.display())
                    .with_context("to", next.display())
                    .with_source(err)
            })?;
            *backup = next;
        }
        Ok(self.log_dir.join(format!("{}.1", self.log_filename)))
    }

    fn free_backup_name(&self, stamp: &str) -> PathBuf {
        let base = self.log_dir.join(format!("{}.{stamp}", self.log_filename));
        if !base.exists() {
            return base;
        }
        (1..)
            .map(|n| self.log_dir.join(format!("{}.{stamp}.{n}", self.log_filename)))
            .find(|candidate| !candidate.exists())
            .unwrap_or(base)
    }

    /// Delete the oldest backups until at most `keep` remain.
    fn prune(&mut self, keep: usize) -> Result<(), Error> {
        while self.retained.len() > keep {
            let oldest = self.retained.remove(0);
            match fs::remove_file(&oldest) {
                Ok(()) => {}
                Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                Err(err) => {
                    let err = Error::rotation("failed to remove old log backup")
                        .with_context("path", oldest.display())
                        .with_source(err);
                    self.retained.insert(0, oldest);
                    return Err(err);
                }
            }
        }
        Ok(())
    }

    /// List the backups of the current file in the log directory, oldest first.
    fn list_backups(&self) -> Result<Vec<PathBuf>, Error> {
        let read_dir = fs::read_dir(&self.log_dir).map_err(|err| {
            Error::rotation("failed to read log dir")
                .with_context("dir", self.log_dir.display())
                .with_source(err)
        })?;

        let prefix = format!("{}.", self.log_filename);
        let mut files = read_dir
            .filter_map(|entry| {
                let entry = entry.ok()?;
                // the sink only creates files, not directories or symlinks
                if !entry.file_type().ok()?.is_file() {
                    return None;
                }

                let filename = entry.file_name();
                // if the filename is not a UTF-8 string, skip it.
                let filename = filename.to_str()?;
                let rest = filename.strip_prefix(&prefix)?;
                let key = match self.rotation {
                    Rotation::Size { .. } => {
                        let seq = parse_sequence(rest).filter(|&n| n > 0)?;
                        // higher sequence is older
                        (String::new(), usize::MAX - seq)
                    }
                    Rotation::Time(interval) => {
                        let format = interval.suffix_format();
                        let (stamp, n) = match rest.rsplit_once('.') {
                            Some((stamp, n)) if n.bytes().all(|b| b.is_ascii_digit()) => {
                                (stamp, parse_sequence(n)?)
                            }
                            _ => (rest, 0),
                        };
                        jiff::fmt::strtime::parse(format, stamp).ok()?;
                        (stamp.to_string(), n)
                    }
                };
                Some((key, entry.path()))
            })
            .collect::<Vec<_>>();

        files.sort();
        Ok(files.into_iter().map(|(_, path)| path).collect())
    }
}

fn sequence_of(log_filename: &str, backup: &Path) -> Option<usize> {
    let filename = backup.file_name()?.to_str()?;
    let rest = filename.strip_prefix(log_filename)?.strip_prefix('.')?;
    parse_sequence(rest)
}

// only the canonical spelling counts, so `app.log.01` never aliases `app.log.1`
fn parse_sequence(s: &str) -> Option<usize> {
    let n = s.parse::<usize>().ok()?;
    (n.to_string() == s).then_some(n)
}
