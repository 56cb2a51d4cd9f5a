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

use std::thread;
use std::time::Duration;

use logrota::Level;
use logrota::config::FileConfig;
use logrota::config::LoggerConfig;
use logrota::config::RotationConfig;
use logrota::sink::rolling_file::Interval;

fn main() {
    let mut by_size = LoggerConfig::new("AdvancedTest");
    by_size.level = Level::Debug;
    by_size.format = "{time} - [{level}] - {message} - ({file}:{line})".to_string();
    by_size.file = Some(FileConfig {
        path: Some("logs/advanced_test.log".into()),
        rotation: RotationConfig::Size {
            max_bytes: 1024,
            backup_count: 3,
        },
    });
    let by_size = by_size.build().unwrap();

    let mut by_time = LoggerConfig::new("EverySecond");
    by_time.console = false;
    by_time.file = Some(FileConfig {
        path: Some("logs/every_second.log".into()),
        rotation: RotationConfig::Time {
            interval: Interval::Second,
            backup_count: 3,
        },
    });
    let by_time = by_time.build().unwrap();

    by_size.info("Starting advanced logging test...");
    for i in 1..=10 {
        by_size.info(format_args!(
            "Test log message {i} with some extended content to increase log size"
        ));
        by_time.info(format_args!("tick {i}"));
        thread::sleep(Duration::from_millis(500));
    }

    by_size.close();
    by_time.close();
}
