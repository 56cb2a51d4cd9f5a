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

//! Logrota provides named loggers that render each record once and fan it out to a console sink
//! and a rotating file sink.
//!
//! # Overview
//!
//! A [`Logger`] has a name, a [`Level`] threshold, a [`Layout`] and any number of [`Sink`]s.
//! Records below the threshold are discarded without rendering. Sink failures never reach the
//! caller; they are handed to the logger's [`Trap`].
//!
//! The [`RollingFile`](sink::RollingFile) sink rotates its file by size or by time and keeps a
//! bounded number of backups.
//!
//! # Examples
//!
//! Simple setup with a stdout sink:
//!
//! ```
//! use logrota::Level;
//! use logrota::Logger;
//! use logrota::sink::Stdout;
//!
//! let logger = Logger::builder("MyProject")
//!     .level(Level::Debug)
//!     .sink(Stdout::default())
//!     .build();
//!
//! logger.info("This is an info message.");
//! ```
//!
//! Setup from a configuration with size-based rotation:
//!
//! ```no_run
//! use logrota::config::FileConfig;
//! use logrota::config::LoggerConfig;
//! use logrota::config::RotationConfig;
//!
//! let mut config = LoggerConfig::new("AdvancedProject");
//! config.file = Some(FileConfig {
//!     path: Some("logs/custom_log.log".into()),
//!     rotation: RotationConfig::Size {
//!         max_bytes: 1_048_576,
//!         backup_count: 3,
//!     },
//! });
//!
//! let logger = config.build().unwrap();
//! logger.error("This is an error message.");
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod bridge;
pub mod config;
pub mod layout;
pub mod sink;
pub mod trap;

mod error;
mod level;
mod logger;
mod record;

pub use self::config::LoggerConfig;
pub use self::error::Error;
pub use self::error::ErrorKind;
pub use self::layout::Layout;
pub use self::level::Level;
pub use self::logger::Logger;
pub use self::logger::LoggerBuilder;
pub use self::logger::Registry;
pub use self::record::Location;
pub use self::record::Record;
pub use self::record::RecordBuilder;
pub use self::sink::Sink;
pub use self::trap::Trap;
