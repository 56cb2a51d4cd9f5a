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

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::thread;

use logrota::Level;
use logrota::Logger;
use logrota::config::FileConfig;
use logrota::config::LoggerConfig;
use logrota::config::RotationConfig;
use logrota::layout::TemplateLayout;
use logrota::sink::RollingFile;
use logrota::sink::rolling_file::Rotation;
use tempfile::TempDir;

fn log_files(dir: &Path, prefix: &str) -> Vec<String> {
    let mut files = fs::read_dir(dir)
        .unwrap()
        .filter_map(|entry| {
            let filename = entry.ok()?.file_name().to_str()?.to_string();
            filename.starts_with(prefix).then_some(filename)
        })
        .collect::<Vec<_>>();
    files.sort();
    files
}

#[test]
fn test_file_count_limit() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let path = temp_dir.path().join("test_prefix.log");
    let backup_count = 3;

    let sink = Arc::new(
        RollingFile::builder(&path)
            .rotation(Rotation::size(100))
            .backup_count(backup_count)
            .build()
            .unwrap(),
    );
    let logger = Logger::builder("limit")
        .layout(TemplateLayout::new("{message}"))
        .sink(sink.clone())
        .build();

    for i in 0..50 {
        logger.info(format_args!("Log entry {i}: {}", "A".repeat(50)));
    }
    logger.flush();

    let files = log_files(temp_dir.path(), "test_prefix");
    assert_eq!(
        files,
        vec![
            "test_prefix.log".to_string(),
            "test_prefix.log.1".to_string(),
            "test_prefix.log.2".to_string(),
            "test_prefix.log.3".to_string(),
        ]
    );
    assert_eq!(sink.retained().len(), backup_count);

    // every line is larger than half the limit, so each file holds exactly one line
    let newest = fs::read_to_string(&path).unwrap();
    assert_eq!(newest, format!("Log entry 49: {}\n", "A".repeat(50)));
    let oldest = fs::read_to_string(temp_dir.path().join("test_prefix.log.3")).unwrap();
    assert_eq!(oldest, format!("Log entry 46: {}\n", "A".repeat(50)));
}

#[test]
fn test_reopen_existing_file() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let path = temp_dir.path().join("app.log");
    fs::write(&path, "0123456789\n").unwrap();
    fs::write(temp_dir.path().join("app.log.1"), "old\n").unwrap();
    fs::write(temp_dir.path().join("app.log.2"), "older\n").unwrap();
    fs::write(temp_dir.path().join("app.log.3"), "oldest\n").unwrap();

    let sink = RollingFile::builder(&path)
        .rotation(Rotation::size(20))
        .backup_count(2)
        .build()
        .unwrap();

    assert_eq!(sink.current_size(), 11);
    assert_eq!(log_files(temp_dir.path(), "app.log").len(), 3);
    assert!(!temp_dir.path().join("app.log.3").exists());

    let logger = Logger::builder("app")
        .layout(TemplateLayout::new("{message}"))
        .sink(sink)
        .build();
    logger.info("appended");
    logger.info("rotated");
    logger.flush();

    assert_eq!(fs::read_to_string(&path).unwrap(), "rotated\n");
    assert_eq!(
        fs::read_to_string(temp_dir.path().join("app.log.1")).unwrap(),
        "0123456789\nappended\n"
    );
    assert_eq!(
        fs::read_to_string(temp_dir.path().join("app.log.2")).unwrap(),
        "old\n"
    );
}

#[test]
fn test_concurrent_logging_keeps_lines_whole() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let path = temp_dir.path().join("concurrent.log");

    let mut config = LoggerConfig::new("concurrent");
    config.level = Level::Debug;
    config.format = "{name} {level} {message}".to_string();
    config.console = false;
    config.file = Some(FileConfig {
        path: Some(path.clone()),
        rotation: RotationConfig::Size {
            max_bytes: 4096,
            backup_count: 100,
        },
    });
    let logger = Arc::new(config.build().unwrap());

    let handles = (0..4)
        .map(|t| {
            let logger = logger.clone();
            thread::spawn(move || {
                for i in 0..200 {
                    logger.debug(format_args!("thread-{t} line-{i:03}"));
                }
            })
        })
        .collect::<Vec<_>>();
    for handle in handles {
        handle.join().unwrap();
    }
    logger.close();

    let mut lines = vec![];
    for name in log_files(temp_dir.path(), "concurrent.log") {
        let content = fs::read_to_string(temp_dir.path().join(name)).unwrap();
        assert!(content.len() <= 4096);
        lines.extend(content.lines().map(str::to_string));
    }
    assert_eq!(lines.len(), 800);
    for line in &lines {
        assert!(line.starts_with("concurrent DEBUG thread-"), "{line}");
        assert_eq!(line.len(), "concurrent DEBUG thread-0 line-000".len(), "{line}");
    }
}
