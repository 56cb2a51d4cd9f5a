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

use std::io;
use std::io::Write;

use crate::Error;
use crate::sink::Sink;

/// A sink that prints log lines to stdout.
///
/// Each line is flushed immediately so that it interleaves correctly with other writers of the
/// stream.
///
/// # Examples
///
/// ```
/// use logrota::sink::Stdout;
///
/// let stdout_sink = Stdout::default();
/// ```
#[derive(Debug, Default)]
#[non_exhaustive]
pub struct Stdout {}

impl Sink for Stdout {
    fn write(&self, line: &str) -> Result<(), Error> {
        write_line(&mut io::stdout().lock(), line)
    }

    fn flush(&self) -> Result<(), Error> {
        io::stdout().flush().map_err(Error::from_io_error)
    }
}

/// A sink that prints log lines to stderr.
///
/// # Examples
///
/// ```
/// use logrota::sink::Stderr;
///
/// let stderr_sink = Stderr::default();
/// ```
#[derive(Debug, Default)]
#[non_exhaustive]
pub struct Stderr {}

impl Sink for Stderr {
    fn write(&self, line: &str) -> Result<(), Error> {
        write_line(&mut io::stderr().lock(), line)
    }

    fn flush(&self) -> Result<(), Error> {
        io::stderr().flush().map_err(Error::from_io_error)
    }
}

fn write_line(w: &mut impl Write, line: &str) -> Result<(), Error> {
    w.write_all(line.as_bytes())
        .and_then(|()| w.write_all(b"\n"))
        .and_then(|()| w.flush())
        .map_err(|err| Error::sink_write("failed to write to console").with_source(err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[derive(Default)]
    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "stream closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_line_appends_newline() {
        let mut buf = Vec::new();
        write_line(&mut buf, "hello").unwrap();
        write_line(&mut buf, "world").unwrap();
        assert_eq!(buf, b"hello\nworld\n");
    }

    #[test]
    fn test_write_line_reports_closed_stream() {
        let err = write_line(&mut Broken, "hello").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SinkWrite);
        assert!(err.to_string().contains("stream closed"));
    }
}
