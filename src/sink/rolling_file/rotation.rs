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

use std::fmt;
use std::str::FromStr;

use jiff::Span;
use jiff::Zoned;

use crate::Error;

/// The calendar unit of a time-based rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Interval {
    /// Rotate one second after the current file was opened.
    Second,
    /// Rotate one minute after the current file was opened.
    Minute,
    /// Rotate one hour after the current file was opened.
    Hour,
    /// Rotate one calendar day after the current file was opened.
    Day,
    /// Rotate at the first local midnight after the current file was opened.
    Midnight,
}

impl Interval {
    /// Return the string representation of the `Interval`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Second => "second",
            Interval::Minute => "minute",
            Interval::Hour => "hour",
            Interval::Day => "day",
            Interval::Midnight => "midnight",
        }
    }

    /// Compute the first rotation boundary after `anchor`.
    ///
    /// Calendar arithmetic happens in the time zone of `anchor`, so a daylight saving transition
    /// lengthens or shortens `Day` and `Midnight` periods rather than moving their boundary off
    /// the local calendar. Returns `None` if the boundary is not representable.
    pub fn next_boundary(&self, anchor: &Zoned) -> Option<Zoned> {
        match self {
            Interval::Second => anchor.checked_add(Span::new().seconds(1)).ok(),
            Interval::Minute => anchor.checked_add(Span::new().minutes(1)).ok(),
            Interval::Hour => anchor.checked_add(Span::new().hours(1)).ok(),
            Interval::Day => anchor.checked_add(Span::new().days(1)).ok(),
            Interval::Midnight => {
                let tomorrow = anchor.date().tomorrow().ok()?;
                tomorrow.to_zoned(anchor.time_zone().clone()).ok()
            }
        }
    }

    /// The `strftime` format of the backup suffix.
    pub(crate) fn suffix_format(&self) -> &'static str {
        match self {
            Interval::Second => "%Y-%m-%d_%H-%M-%S",
            Interval::Minute => "%Y-%m-%d_%H-%M",
            Interval::Hour => "%Y-%m-%d_%H",
            Interval::Day | Interval::Midnight => "%Y-%m-%d",
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = Error;

    fn from_str(s: &str) -> Result<Interval, Self::Err> {
        for (names, interval) in [
            (["second", "s"], Interval::Second),
            (["minute", "m"], Interval::Minute),
            (["hour", "h"], Interval::Hour),
            (["day", "d"], Interval::Day),
            (["midnight", "midnight"], Interval::Midnight),
        ] {
            if names.iter().any(|name| s.trim().eq_ignore_ascii_case(name)) {
                return Ok(interval);
            }
        }

        Err(Error::config(format!("malformed rotation interval: {s:?}")))
    }
}

/// The rule that decides when a rolling file is rotated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rotation {
    /// Rotate before a write that would grow the current file beyond `max_bytes`.
    ///
    /// Backups are named `<path>.1` (newest) to `<path>.N` (oldest).
    Size {
        /// The maximum size of the current file in bytes, newline terminators included.
        max_bytes: u64,
    },
    /// Rotate before the first write at or after the next boundary of the interval.
    ///
    /// Backups are named `<path>.<time>`, where `<time>` is the start of the period the backup
    /// covers.
    Time(Interval),
}

impl Rotation {
    /// Rotate by size.
    pub fn size(max_bytes: u64) -> Self {
        Rotation::Size { max_bytes }
    }

    /// Rotate by time.
    pub fn time(interval: Interval) -> Self {
        Rotation::Time(interval)
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        match self {
            Rotation::Size { max_bytes: 0 } => Err(Error::config(
                "size rotation requires a positive max_bytes",
            )),
            _ => Ok(()),
        }
    }

    pub(crate) fn next_boundary(&self, anchor: &Zoned) -> Option<Zoned> {
        match self {
            Rotation::Size { .. } => None,
            Rotation::Time(interval) => interval.next_boundary(anchor),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zoned(s: &str) -> Zoned {
        s.parse().unwrap()
    }

    #[test]
    fn test_next_boundary_is_anchor_relative() {
        let anchor = zoned("2024-08-10T17:12:52+08:00[+08:00]");

        assert_eq!(
            Interval::Second.next_boundary(&anchor),
            Some(zoned("2024-08-10T17:12:53+08:00[+08:00]"))
        );
        assert_eq!(
            Interval::Minute.next_boundary(&anchor),
            Some(zoned("2024-08-10T17:13:52+08:00[+08:00]"))
        );
        assert_eq!(
            Interval::Hour.next_boundary(&anchor),
            Some(zoned("2024-08-10T18:12:52+08:00[+08:00]"))
        );
        assert_eq!(
            Interval::Day.next_boundary(&anchor),
            Some(zoned("2024-08-11T17:12:52+08:00[+08:00]"))
        );
        assert_eq!(
            Interval::Midnight.next_boundary(&anchor),
            Some(zoned("2024-08-11T00:00:00+08:00[+08:00]"))
        );
    }

    #[test]
    fn test_midnight_follows_local_calendar_across_dst() {
        use jiff::civil::date;
        use jiff::tz::TimeZone;
        use jiff::tz::offset;

        // US eastern rules; 2024-03-10 is 23 hours long.
        let tz = TimeZone::posix("EST5EDT,M3.2.0,M11.1.0").unwrap();
        let anchor = date(2024, 3, 9).at(12, 0, 0, 0).to_zoned(tz).unwrap();

        let next = Interval::Midnight.next_boundary(&anchor).unwrap();
        assert_eq!(next.datetime(), date(2024, 3, 10).at(0, 0, 0, 0));
        assert_eq!(next.offset(), offset(-5));

        let next = Interval::Midnight.next_boundary(&next).unwrap();
        assert_eq!(next.datetime(), date(2024, 3, 11).at(0, 0, 0, 0));
        assert_eq!(next.offset(), offset(-4));

        let day = Interval::Day.next_boundary(&anchor).unwrap();
        assert_eq!(day.datetime(), date(2024, 3, 10).at(12, 0, 0, 0));
        assert_eq!(day.offset(), offset(-4));
    }

    #[test]
    fn test_size_rotation_has_no_boundary() {
        let anchor = zoned("2024-08-10T17:12:52+08:00[+08:00]");
        assert_eq!(Rotation::size(50).next_boundary(&anchor), None);
        assert!(Rotation::size(0).validate().is_err());
        assert!(Rotation::size(1).validate().is_ok());
    }

    #[test]
    fn test_parse_interval() {
        assert_eq!("S".parse::<Interval>().unwrap(), Interval::Second);
        assert_eq!("minute".parse::<Interval>().unwrap(), Interval::Minute);
        assert_eq!("H".parse::<Interval>().unwrap(), Interval::Hour);
        assert_eq!("d".parse::<Interval>().unwrap(), Interval::Day);
        assert_eq!("MIDNIGHT".parse::<Interval>().unwrap(), Interval::Midnight);
        assert!("weekly".parse::<Interval>().is_err());
    }
}
