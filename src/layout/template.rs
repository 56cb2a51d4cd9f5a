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

use std::fmt::Write;

use jiff::tz::TimeZone;

use crate::layout::Layout;
use crate::record::Record;

/// A layout that renders log records through a template string.
///
/// Recognized placeholders:
///
/// | placeholder | value |
/// |---|---|
/// | `{time}` | the record time, see [`TemplateLayout::time_format`] |
/// | `{name}` | the logger name |
/// | `{level}` | the level name, e.g. `WARNING` |
/// | `{message}` | the message |
/// | `{file}` | the source file, empty if unknown |
/// | `{line}` | the source line, `0` if unknown |
///
/// `{{` and `}}` render a literal brace. Any other text, including unknown or unterminated
/// placeholders, is copied verbatim.
///
/// The default template is:
///
/// ```text
/// {time} - {name} - {level} - {message}
/// ```
///
/// which renders as:
///
/// ```text
/// 2024-08-11 22:44:57,172 - app - INFO - Hello info!
/// ```
///
/// # Examples
///
/// ```
/// use logrota::layout::TemplateLayout;
///
/// let layout = TemplateLayout::new("[{level}] {message} ({file}:{line})");
/// ```
#[derive(Debug, Clone)]
pub struct TemplateLayout {
    template: String,
    segments: Vec<Segment>,
    time_format: String,
    tz: Option<TimeZone>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Time,
    Name,
    Level,
    Message,
    File,
    Line,
}

impl Default for TemplateLayout {
    fn default() -> Self {
        TemplateLayout::new(TemplateLayout::DEFAULT_TEMPLATE)
    }
}

impl TemplateLayout {
    /// The default template.
    pub const DEFAULT_TEMPLATE: &'static str = "{time} - {name} - {level} - {message}";

    /// The default `strftime` format of the `{time}` placeholder.
    pub const DEFAULT_TIME_FORMAT: &'static str = "%Y-%m-%d %H:%M:%S,%3f";

    /// Creates a layout rendering the given template.
    pub fn new(template: impl Into<String>) -> Self {
        let template = template.into();
        let segments = parse(&template);
        Self {
            template,
            segments,
            time_format: Self::DEFAULT_TIME_FORMAT.to_string(),
            tz: None,
        }
    }

    /// Sets the `strftime` format of the `{time}` placeholder.
    ///
    /// If the format cannot be applied to a record time, the time is rendered in RFC 3339 form
    /// instead.
    pub fn time_format(mut self, format: impl Into<String>) -> Self {
        self.time_format = format.into();
        self
    }

    /// Sets the timezone of the `{time}` placeholder.
    ///
    /// Default to the system timezone.
    pub fn timezone(mut self, tz: TimeZone) -> Self {
        self.tz = Some(tz);
        self
    }

    /// The template this layout renders.
    pub fn template(&self) -> &str {
        &self.template
    }

    fn format_time(&self, record: &Record) -> String {
        let tz = self.tz.clone().unwrap_or_else(TimeZone::system);
        let time = record.time().to_zoned(tz);
        jiff::fmt::strtime::format(self.time_format.as_str(), &time)
            .unwrap_or_else(|_| time.timestamp().to_string())
    }
}

impl Layout for TemplateLayout {
    fn format(&self, record: &Record) -> String {
        let mut text = String::with_capacity(self.template.len() + record.message().len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(s) => text.push_str(s),
                Segment::Time => text.push_str(&self.format_time(record)),
                Segment::Name => text.push_str(record.logger()),
                Segment::Level => text.push_str(record.level().as_str()),
                Segment::Message => text.push_str(record.message()),
                Segment::File => text.push_str(record.file().unwrap_or_default()),
                Segment::Line => {
                    let _ = write!(&mut text, "{}", record.line().unwrap_or_default());
                }
            }
        }
        text
    }
}

fn placeholder(name: &str) -> Option<Segment> {
    match name {
        "time" => Some(Segment::Time),
        "name" => Some(Segment::Name),
        "level" => Some(Segment::Level),
        "message" => Some(Segment::Message),
        "file" => Some(Segment::File),
        "line" => Some(Segment::Line),
        _ => None,
    }
}

fn parse(template: &str) -> Vec<Segment> {
    let mut segments = vec![];
    let mut literal = String::new();
    let mut rest = template;

    while let Some(pos) = rest.find(['{', '}']) {
        literal.push_str(&rest[..pos]);
        rest = &rest[pos..];

        if rest.starts_with("{{") {
            literal.push('{');
            rest = &rest[2..];
        } else if rest.starts_with("}}") {
            literal.push('}');
            rest = &rest[2..];
        } else if rest.starts_with('}') {
            literal.push('}');
            rest = &rest[1..];
        } else {
            // rest starts with a single '{'
            let field = rest[1..]
                .find(['{', '}'])
                .filter(|&end| rest[1 + end..].starts_with('}'))
                .and_then(|end| placeholder(&rest[1..1 + end]).map(|seg| (seg, end)));
            match field {
                Some((segment, end)) => {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(segment);
                    rest = &rest[end + 2..];
                }
                None => {
                    literal.push('{');
                    rest = &rest[1..];
                }
            }
        }
    }

    literal.push_str(rest);
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    segments
}
