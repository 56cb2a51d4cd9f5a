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

use jiff::Timestamp;

/// The time source of a rolling file.
#[derive(Debug)]
pub(crate) enum Clock {
    DefaultClock,
    #[cfg(test)]
    ManualClock(ManualClock),
}

impl Clock {
    pub(crate) fn now(&self) -> Timestamp {
        match self {
            Clock::DefaultClock => Timestamp::now(),
            #[cfg(test)]
            Clock::ManualClock(clock) => clock.now(),
        }
    }

    #[cfg(test)]
    pub(crate) fn set_now(&mut self, now: Timestamp) {
        if let Clock::ManualClock(clock) = self {
            clock.set_now(now);
        }
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same time, so a test can keep one handle and move the time of a sink that
/// owns the other.
#[cfg(test)]
#[derive(Debug, Clone)]
pub(crate) struct ManualClock {
    now: std::sync::Arc<std::sync::Mutex<Timestamp>>,
}

#[cfg(test)]
impl ManualClock {
    pub(crate) fn new(now: Timestamp) -> ManualClock {
        ManualClock {
            now: std::sync::Arc::new(std::sync::Mutex::new(now)),
        }
    }

    pub(crate) fn now(&self) -> Timestamp {
        *self.now.lock().unwrap()
    }

    pub(crate) fn set_now(&self, now: Timestamp) {
        *self.now.lock().unwrap() = now;
    }

    pub(crate) fn advance(&self, span: jiff::Span) {
        let mut now = self.now.lock().unwrap();
        *now = now.checked_add(span).unwrap();
    }
}
