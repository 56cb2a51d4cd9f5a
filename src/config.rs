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

//! Declarative logger configuration.
//!
//! # Examples
//!
//! ```no_run
//! use logrota::Level;
//! use logrota::config::FileConfig;
//! use logrota::config::LoggerConfig;
//! use logrota::config::RotationConfig;
//!
//! let mut config = LoggerConfig::new("AdvancedProject");
//! config.level = Level::Info;
//! config.format = "{time} - {name} - [{level}] - {message} - ({file}:{line})".to_string();
//! config.file = Some(FileConfig {
//!     path: Some("logs/custom_log.log".into()),
//!     rotation: RotationConfig::Size {
//!         max_bytes: 1_048_576,
//!         backup_count: 3,
//!     },
//! });
//!
//! let logger = config.build().unwrap();
//! logger.info("configured");
//! ```

use std::path::Path;
use std::path::PathBuf;

use jiff::Zoned;

use crate::Error;
use crate::Level;
use crate::Logger;
use crate::layout::TemplateLayout;
use crate::sink::RollingFile;
use crate::sink::Stdout;
use crate::sink::rolling_file::Interval;
use crate::sink::rolling_file::Rotation;

/// The configuration of a [`Logger`] with an optional rotating file sink and an optional console
/// sink.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LoggerConfig {
    /// The logger name.
    pub name: String,
    /// The level threshold.
    pub level: Level,
    /// The [`TemplateLayout`] template.
    pub format: String,
    /// The rotating file sink; `None` disables file output.
    pub file: Option<FileConfig>,
    /// Whether to mirror records to stdout.
    pub console: bool,
}

/// The configuration of the rotating file sink.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FileConfig {
    /// The log file; default to `logs/<name>_<YYYYMMDD>.log`.
    pub path: Option<PathBuf>,
    /// The rotation rule and retention.
    pub rotation: RotationConfig,
}

/// The rotation rule of the file sink together with the number of backups to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum RotationConfig {
    /// Rotate when the file would exceed `max_bytes`.
    Size {
        /// The maximum size of the current file in bytes.
        max_bytes: u64,
        /// The maximum number of backups to keep.
        backup_count: usize,
    },
    /// Rotate at every boundary of `interval`.
    Time {
        /// The rotation interval.
        interval: Interval,
        /// The maximum number of backups to keep.
        backup_count: usize,
    },
}

impl RotationConfig {
    /// The default size limit of size rotation: 5 MiB.
    pub const DEFAULT_MAX_BYTES: u64 = 5 * 1024 * 1024;

    /// The default number of backups.
    pub const DEFAULT_BACKUP_COUNT: usize = 5;

    /// The rotation rule.
    pub fn rotation(&self) -> Rotation {
        match *self {
            RotationConfig::Size { max_bytes, .. } => Rotation::size(max_bytes),
            RotationConfig::Time { interval, .. } => Rotation::time(interval),
        }
    }

    /// The maximum number of backups to keep.
    pub fn backup_count(&self) -> usize {
        match *self {
            RotationConfig::Size { backup_count, .. } => backup_count,
            RotationConfig::Time { backup_count, .. } => backup_count,
        }
    }
}

impl Default for RotationConfig {
    fn default() -> Self {
        RotationConfig::Time {
            interval: Interval::Midnight,
            backup_count: Self::DEFAULT_BACKUP_COUNT,
        }
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        LoggerConfig::new("app")
    }
}

impl LoggerConfig {
    /// Create a configuration with default settings for the logger `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level: Level::Info,
            format: TemplateLayout::DEFAULT_TEMPLATE.to_string(),
            file: Some(FileConfig::default()),
            console: true,
        }
    }

    /// The path of the log file, if file output is enabled.
    ///
    /// Without an explicit path, this is `logs/<name>_<YYYYMMDD>.log` for the current local
    /// date.
    pub fn file_path(&self) -> Option<PathBuf> {
        let file = self.file.as_ref()?;
        Some(match &file.path {
            Some(path) => path.clone(),
            None => default_file_path(&self.name, &Zoned::now()),
        })
    }

    /// Check the configuration without touching the filesystem.
    ///
    /// # Errors
    ///
    /// Return a [`Config`](crate::ErrorKind::Config) error if the name is empty or cannot be used
    /// in the default file name, or if the rotation rule is invalid.
    pub fn validate(&self) -> Result<(), Error> {
        if self.name.trim().is_empty() {
            return Err(Error::config("logger name must not be empty"));
        }

        if let Some(file) = &self.file {
            file.rotation.rotation().validate()?;
            let default_path = file.path.is_none();
            if default_path && self.name.contains(['/', '\\']) {
                return Err(Error::config("logger name cannot be used as a file name")
                    .with_context("name", &self.name));
            }
            if file.path.as_deref().is_some_and(|path| path.as_os_str().is_empty()) {
                return Err(Error::config("log file path must not be empty"));
            }
        }

        Ok(())
    }

    /// Build the configured [`Logger`].
    ///
    /// The file sink comes first, followed by the console sink.
    ///
    /// # Errors
    ///
    /// Return a [`Config`](crate::ErrorKind::Config) error if the configuration is invalid or the
    /// log file cannot be opened.
    pub fn build(&self) -> Result<Logger, Error> {
        self.validate()?;

        let mut builder = Logger::builder(&self.name)
            .level(self.level)
            .layout(TemplateLayout::new(&self.format));

        if let (Some(file), Some(path)) = (&self.file, self.file_path()) {
            let sink = RollingFile::builder(path)
                .rotation(file.rotation.rotation())
                .backup_count(file.rotation.backup_count())
                .build()?;
            builder = builder.sink(sink);
        }

        if self.console {
            builder = builder.sink(Stdout::default());
        }

        Ok(builder.build())
    }
}

fn default_file_path(name: &str, today: &Zoned) -> PathBuf {
    Path::new("logs").join(format!("{name}_{}.log", today.strftime("%Y%m%d")))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_defaults() {
        let config = LoggerConfig::default();
        assert_eq!(config.name, "app");
        assert_eq!(config.level, Level::Info);
        assert_eq!(config.format, "{time} - {name} - {level} - {message}");
        assert!(config.console);

        let file = config.file.unwrap();
        assert_eq!(file.path, None);
        assert_eq!(file.rotation.rotation(), Rotation::time(Interval::Midnight));
        assert_eq!(file.rotation.backup_count(), 5);
    }

    #[test]
    fn test_default_file_path() {
        let today: Zoned = "2024-08-10T17:12:52+08:00[+08:00]".parse().unwrap();
        assert_eq!(
            default_file_path("MyProject", &today),
            Path::new("logs").join("MyProject_20240810.log")
        );
    }

    #[test]
    fn test_validate() {
        let mut config = LoggerConfig::new("  ");
        assert_eq!(config.validate().unwrap_err().kind(), ErrorKind::Config);

        config.name = "a/b".to_string();
        assert_eq!(config.validate().unwrap_err().kind(), ErrorKind::Config);
        config.file.as_mut().unwrap().path = Some("logs/ab.log".into());
        assert!(config.validate().is_ok());

        config.file.as_mut().unwrap().rotation = RotationConfig::Size {
            max_bytes: 0,
            backup_count: 1,
        };
        assert_eq!(config.validate().unwrap_err().kind(), ErrorKind::Config);
    }

    #[test]
    fn test_build_with_file_and_console() {
        let dir = TempDir::new().expect("failed to create a temporary directory");
        let path = dir.path().join("custom_log.log");

        let mut config = LoggerConfig::new("AdvancedProject");
        config.level = Level::Debug;
        config.format = "[{level}] {message}".to_string();
        config.file = Some(FileConfig {
            path: Some(path.clone()),
            rotation: RotationConfig::Size {
                max_bytes: 1024,
                backup_count: 3,
            },
        });

        let logger = config.build().unwrap();
        assert_eq!(logger.name(), "AdvancedProject");
        assert_eq!(logger.level(), Level::Debug);
        assert_eq!(logger.sink_count(), 2);

        logger.debug("to file and console");
        logger.flush();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "[DEBUG] to file and console\n"
        );
    }

    #[test]
    fn test_build_without_sinks() {
        let mut config = LoggerConfig::new("quiet");
        config.file = None;
        config.console = false;
        let logger = config.build().unwrap();
        assert_eq!(logger.sink_count(), 0);
        logger.critical("discarded");
    }

    #[test]
    fn test_build_fails_on_directory_path() {
        let dir = TempDir::new().expect("failed to create a temporary directory");
        let mut config = LoggerConfig::new("app");
        config.console = false;
        config.file = Some(FileConfig {
            path: Some(dir.path().to_path_buf()),
            rotation: RotationConfig::default(),
        });
        assert_eq!(config.build().unwrap_err().kind(), ErrorKind::Config);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize() {
        let config: LoggerConfig = serde_json::from_str(
            r#"{
                "name": "svc",
                "level": "WARNING",
                "file": {
                    "path": "logs/svc.log",
                    "rotation": { "time": { "interval": "hour", "backup_count": 24 } }
                },
                "console": false
            }"#,
        )
        .unwrap();

        assert_eq!(config.name, "svc");
        assert_eq!(config.level, Level::Warning);
        assert_eq!(config.format, TemplateLayout::DEFAULT_TEMPLATE);
        assert!(!config.console);
        let file = config.file.unwrap();
        assert_eq!(file.path, Some(PathBuf::from("logs/svc.log")));
        assert_eq!(file.rotation.rotation(), Rotation::time(Interval::Hour));
        assert_eq!(file.rotation.backup_count(), 24);
    }
}
