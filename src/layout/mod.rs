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

//! Layouts for rendering log records into lines.

use std::fmt;

use crate::record::Record;

mod template;

pub use self::template::TemplateLayout;

/// A layout renders a log record into a single line of text.
///
/// Rendering never fails: a layout must produce some output for any record. The returned line
/// does not include the trailing newline; sinks add it.
pub trait Layout: fmt::Debug + Send + Sync + 'static {
    /// Formats a log record.
    fn format(&self, record: &Record) -> String;
}

impl<T: Layout> From<T> for Box<dyn Layout> {
    fn from(value: T) -> Self {
        Box::new(value)
    }
}
