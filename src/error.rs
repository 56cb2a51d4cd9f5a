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
use std::io;

/// The category of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Invalid configuration detected while constructing a logger or a sink.
    ///
    /// The logger or sink is not usable.
    Config,
    /// An I/O failure while writing a single line to a sink.
    SinkWrite,
    /// A failure to rename, delete or reopen files while rotating.
    Rotation,
}

impl ErrorKind {
    /// Return the string representation of the `ErrorKind`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Config => "ConfigurationError",
            ErrorKind::SinkWrite => "SinkWriteError",
            ErrorKind::Rotation => "RotationError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The error struct of logrota.
pub struct Error {
    kind: ErrorKind,
    message: String,
    sources: Vec<anyhow::Error>,
    context: Vec<(&'static str, String)>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)?;

        for (i, (key, value)) in self.context.iter().enumerate() {
            let sep = if i == 0 { ", context: { " } else { ", " };
            write!(f, "{sep}{key}: {value}")?;
        }
        if !self.context.is_empty() {
            f.write_str(" }")?;
        }

        for (i, source) in self.sources.iter().enumerate() {
            let sep = if i == 0 { ", sources: [" } else { ", " };
            write!(f, "{sep}{source}")?;
        }
        if !self.sources.is_empty() {
            f.write_str("]")?;
        }

        Ok(())
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            return f
                .debug_struct("Error")
                .field("kind", &self.kind)
                .field("message", &self.message)
                .field("context", &self.context)
                .field("sources", &self.sources)
                .finish();
        }

        writeln!(f, "{}: {}", self.kind, self.message)?;
        if !self.context.is_empty() {
            writeln!(f, "\nContext:")?;
            for (key, value) in &self.context {
                writeln!(f, "   {key}: {value}")?;
            }
        }
        if !self.sources.is_empty() {
            writeln!(f, "\nSources:")?;
            for source in &self.sources {
                writeln!(f, "   {source:#}")?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.sources.first().map(|v| v.as_ref())
    }
}

impl Error {
    /// Create an error of `kind`.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            sources: vec![],
            context: vec![],
        }
    }

    /// Create a new [`ErrorKind::Config`] error.
    pub fn config(message: impl Into<String>) -> Self {
        Error::new(ErrorKind::Config, message)
    }

    /// Create a new [`ErrorKind::SinkWrite`] error.
    pub fn sink_write(message: impl Into<String>) -> Self {
        Error::new(ErrorKind::SinkWrite, message)
    }

    /// Create a new [`ErrorKind::Rotation`] error.
    pub fn rotation(message: impl Into<String>) -> Self {
        Error::new(ErrorKind::Rotation, message)
    }

    /// Attach a key/value pair describing where the error happened.
    pub fn with_context(mut self, key: &'static str, value: impl ToString) -> Self {
        self.context.push((key, value.to_string()));
        self
    }

    /// Attach an underlying cause.
    pub fn with_source(mut self, src: impl Into<anyhow::Error>) -> Self {
        self.sources.push(src.into());
        self
    }

    /// Return the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Return the message of this error.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The attached causes, in the order they were added.
    pub fn sources(&self) -> impl ExactSizeIterator<Item = &(dyn std::error::Error + 'static)> {
        self.sources.iter().map(|v| v.as_ref())
    }

    /// A [`ErrorKind::SinkWrite`] error caused by `err`.
    pub fn from_io_error(err: io::Error) -> Error {
        Error::sink_write("failed to perform io").with_source(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_kind_context_and_sources() {
        let err = Error::rotation("failed to archive log")
            .with_context("path", "logs/app.log")
            .with_source(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));

        assert_eq!(err.kind(), ErrorKind::Rotation);
        assert_eq!(
            err.to_string(),
            "RotationError: failed to archive log, context: { path: logs/app.log }, sources: [denied]"
        );
        assert_eq!(err.sources().len(), 1);
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_display_without_context() {
        let err = Error::config("empty logger name");
        assert_eq!(err.to_string(), "ConfigurationError: empty logger name");
        assert!(std::error::Error::source(&err).is_none());
    }
}
