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
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use crate::Error;
use crate::sink::Sink;
use crate::sink::SinkHealth;

/// A sink that keeps log lines in memory so that tests can assert on them.
///
/// Clones share the same buffer: keep one clone and hand the other to a logger.
///
/// # Examples
///
/// ```
/// use logrota::sink::Sink;
/// use logrota::sink::Testing;
///
/// let sink = Testing::default();
/// sink.clone().write("hello").unwrap();
/// assert_eq!(sink.lines(), vec!["hello".to_string()]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Testing {
    lines: Arc<Mutex<Vec<String>>>,
    failing: Arc<AtomicBool>,
    closed: Arc<AtomicBool>,
}

impl Testing {
    /// The lines written so far, oldest first.
    pub fn lines(&self) -> Vec<String> {
        self.buffer().clone()
    }

    /// Remove and return the lines written so far.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.buffer())
    }

    /// Make subsequent writes fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::Release);
    }

    fn buffer(&self) -> MutexGuard<'_, Vec<String>> {
        self.lines.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Sink for Testing {
    fn write(&self, line: &str) -> Result<(), Error> {
        if self.closed.load(Ordering::Acquire) {
            return Err(Error::sink_write("sink is closed"));
        }
        if self.failing.load(Ordering::Acquire) {
            return Err(Error::sink_write("injected failure"));
        }
        self.buffer().push(line.to_string());
        Ok(())
    }

    fn close(&self) -> Result<(), Error> {
        self.closed.store(true, Ordering::Release);
        Ok(())
    }

    fn health(&self) -> SinkHealth {
        if self.closed.load(Ordering::Acquire) {
            SinkHealth::Closed
        } else {
            SinkHealth::Healthy
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_take_drains_shared_buffer() {
        let sink = Testing::default();
        let handle = sink.clone();
        sink.write("one").unwrap();
        sink.write("two").unwrap();

        assert_eq!(handle.take(), vec!["one".to_string(), "two".to_string()]);
        assert!(sink.lines().is_empty());

        sink.write("three").unwrap();
        assert_eq!(handle.lines(), vec!["three".to_string()]);
    }

    #[test]
    fn test_failing_and_closed() {
        let sink = Testing::default();
        sink.set_failing(true);
        assert_eq!(sink.write("lost").unwrap_err().kind(), ErrorKind::SinkWrite);
        sink.set_failing(false);
        sink.write("kept").unwrap();

        sink.close().unwrap();
        assert_eq!(sink.health(), SinkHealth::Closed);
        assert!(sink.write("late").is_err());
        assert_eq!(sink.take(), vec!["kept".to_string()]);
    }
}
