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

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::RwLock;
use std::sync::RwLockReadGuard;
use std::sync::RwLockWriteGuard;

use crate::Error;
use crate::Logger;
use crate::config::LoggerConfig;

/// A set of loggers addressed by name.
///
/// The registry is an ordinary value owned by the application: create it at start-up, hand
/// references (or the loggers it returns) to the components that log, and call
/// [`Registry::shutdown`] before exit to flush and close every sink.
///
/// # Examples
///
/// ```
/// use logrota::Logger;
/// use logrota::Registry;
///
/// let registry = Registry::new();
/// let logger = registry.register(Logger::builder("app").build()).unwrap();
/// assert!(registry.get("app").is_some());
///
/// logger.info("hello");
/// registry.shutdown();
/// ```
#[derive(Debug, Default)]
pub struct Registry {
    loggers: RwLock<HashMap<String, Arc<Logger>>>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a logger under its name.
    ///
    /// # Errors
    ///
    /// Return a [`Config`](crate::ErrorKind::Config) error if a logger with the same name is
    /// already registered.
    pub fn register(&self, logger: Logger) -> Result<Arc<Logger>, Error> {
        let mut loggers = self.write();
        if loggers.contains_key(logger.name()) {
            return Err(Error::config("logger already registered")
                .with_context("name", logger.name()));
        }
        let logger = Arc::new(logger);
        loggers.insert(logger.name().to_string(), logger.clone());
        Ok(logger)
    }

    /// Return the logger registered under `name`.
    pub fn get(&self, name: &str) -> Option<Arc<Logger>> {
        self.read().get(name).cloned()
    }

    /// Return the logger named by `config`, building and registering it first if absent.
    ///
    /// An existing logger is returned unchanged; `config` is only used to build a new one.
    pub fn get_or_build(&self, config: &LoggerConfig) -> Result<Arc<Logger>, Error> {
        if let Some(logger) = self.get(&config.name) {
            return Ok(logger);
        }

        let mut loggers = self.write();
        // another thread may have registered the name in between
        if let Some(logger) = loggers.get(&config.name) {
            return Ok(logger.clone());
        }
        let logger = Arc::new(config.build()?);
        loggers.insert(config.name.clone(), logger.clone());
        Ok(logger)
    }

    /// Remove and return the logger registered under `name`.
    ///
    /// The logger's sinks stay open until it is closed or dropped.
    pub fn remove(&self, name: &str) -> Option<Arc<Logger>> {
        self.write().remove(name)
    }

    /// The names of all registered loggers, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names = self.read().keys().cloned().collect::<Vec<_>>();
        names.sort();
        names
    }

    /// Remove every logger, flushing and closing its sinks.
    pub fn shutdown(&self) {
        let loggers = std::mem::take(&mut *self.write());
        for logger in loggers.values() {
            logger.flush();
            logger.close();
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Arc<Logger>>> {
        self.loggers.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Arc<Logger>>> {
        self.loggers.write().unwrap_or_else(|e| e.into_inner())
    }
}
