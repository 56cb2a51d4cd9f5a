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

use std::collections::BTreeMap;

use logrota::Level;
use logrota::Registry;
use logrota::config::FileConfig;
use logrota::config::LoggerConfig;
use logrota::config::RotationConfig;
use logrota::sink::rolling_file::Interval;

#[derive(Debug)]
struct LimitExceeded(f64);

impl std::fmt::Display for LimitExceeded {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "amount {} exceeds maximum limit", self.0)
    }
}

impl std::error::Error for LimitExceeded {}

fn process(amount: f64) -> Result<(), LimitExceeded> {
    if amount > 1000.0 {
        return Err(LimitExceeded(amount));
    }
    Ok(())
}

fn main() {
    let registry = Registry::new();

    let mut config = LoggerConfig::new("TestApp");
    config.level = Level::Debug;
    config.format = "{time} - {name} - [{level}] - {message} - ({file}:{line})".to_string();
    config.file = Some(FileConfig {
        path: Some("logs/test_app.log".into()),
        rotation: RotationConfig::Time {
            interval: Interval::Midnight,
            backup_count: 5,
        },
    });
    let logger = registry.get_or_build(&config).unwrap();

    logger.info("Starting test application...");
    logger.debug("This is a debug message - useful for troubleshooting");
    logger.info("This is an info message - normal application flow");
    logger.warning("This is a warning - something might be wrong");

    let user_data = BTreeMap::from([("user_id", "12345"), ("action", "purchase")]);
    logger.debug(format_args!("Received user data: {user_data:?}"));
    for amount in [99.99, 1500.0] {
        match process(amount) {
            Ok(()) => logger.info(format_args!("Processed amount {amount}")),
            Err(err) => logger.exception("Error processing user data", Some(&err)),
        }
    }

    registry.shutdown();
}
