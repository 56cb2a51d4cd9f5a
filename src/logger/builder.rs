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

use crate::Layout;
use crate::Level;
use crate::Logger;
use crate::Sink;
use crate::Trap;
use crate::layout::TemplateLayout;
use crate::trap::DefaultTrap;

/// A builder for configuring a [`Logger`].
///
/// # Examples
///
/// ```
/// use logrota::Level;
/// use logrota::Logger;
/// use logrota::layout::TemplateLayout;
/// use logrota::sink::Stderr;
///
/// let logger = Logger::builder("worker")
///     .level(Level::Warning)
///     .layout(TemplateLayout::new("[{level}] {name}: {message}"))
///     .sink(Stderr::default())
///     .build();
/// ```
#[must_use = "call `build` to construct the logger"]
#[derive(Debug)]
pub struct LoggerBuilder {
    name: String,
    level: Level,
    layout: Box<dyn Layout>,
    sinks: Vec<Box<dyn Sink>>,
    trap: Box<dyn Trap>,
}

impl LoggerBuilder {
    /// Create a new builder for a logger named `name`.
    ///
    /// Default to [`Level::Info`], [`TemplateLayout::default`], no sinks, and [`DefaultTrap`].
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level: Level::Info,
            layout: Box::new(TemplateLayout::default()),
            sinks: vec![],
            trap: Box::new(DefaultTrap::default()),
        }
    }

    /// Set the level threshold.
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Set the layout shared by all sinks.
    pub fn layout(mut self, layout: impl Into<Box<dyn Layout>>) -> Self {
        self.layout = layout.into();
        self
    }

    /// Append a sink. Sinks receive records in the order they are added.
    pub fn sink(mut self, sink: impl Into<Box<dyn Sink>>) -> Self {
        self.sinks.push(sink.into());
        self
    }

    /// Set the trap for handling sink errors.
    pub fn trap(mut self, trap: impl Into<Box<dyn Trap>>) -> Self {
        self.trap = trap.into();
        self
    }

    /// Construct the [`Logger`].
    ///
    /// A logger without sinks is valid and discards every record.
    pub fn build(self) -> Logger {
        let LoggerBuilder {
            name,
            level,
            layout,
            sinks,
            trap,
        } = self;
        Logger::new(name, level, layout, sinks, trap)
    }
}
