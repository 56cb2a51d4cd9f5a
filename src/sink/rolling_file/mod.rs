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

//! Sink for writing log lines to a file that is rotated by size or by time.
//!
//! # Example
//!
//! ```no_run
//! use logrota::sink::rolling_file::Interval;
//! use logrota::sink::rolling_file::RollingFile;
//! use logrota::sink::rolling_file::Rotation;
//!
//! let sink = RollingFile::builder("logs/app.log")
//!     .rotation(Rotation::time(Interval::Midnight))
//!     .backup_count(7)
//!     .build()
//!     .unwrap();
//!
//! let logger = logrota::Logger::builder("app").sink(sink).build();
//! logger.info("This line will be written to a rotated file.");
//! ```

pub use append::RollingFile;
pub use append::RollingFileBuilder;
pub use rotation::Interval;
pub use rotation::Rotation;

mod append;
mod clock;
mod rolling;
mod rotation;
