//! Log line grammar and the line parser.
//!
//! A log line records one timed activity:
//!
//! ```text
//! Week 1 (Thursday) 9:30 AM - 11:30 AM : direct language
//! ```
//!
//! The direct/indirect token is captured but classification always comes
//! from the [`CategoryRegistry`].

use std::sync::LazyLock;

use chrono::NaiveTime;
use regex::Regex;
use thiserror::Error;

use crate::event::ServiceEvent;
use crate::registry::{CategoryRegistry, ServiceClass};

/// Default line grammar.
pub const DEFAULT_PATTERN: &str = r"^Week (?P<week>\d+) \((?P<day>\w+)\) (?P<start>\d{1,2}:\d{2} [AP]M)\s*-\s*(?P<end>\d{1,2}:\d{2} [AP]M) : (?P<class>direct|indirect) (?P<category>\w+)\s*$";

/// Capture groups every grammar must define.
pub const REQUIRED_GROUPS: [&str; 3] = ["start", "end", "category"];

const TIME_FORMAT: &str = "%I:%M %p";

static DEFAULT_GRAMMAR: LazyLock<Grammar> = LazyLock::new(|| Grammar::new(DEFAULT_PATTERN).unwrap());

/// Errors raised while compiling a grammar.
#[derive(Debug, Error)]
pub enum GrammarError {
    #[error("invalid line pattern: {0}")]
    Regex(#[from] regex::Error),

    #[error("line pattern is missing the named capture group `{group}`")]
    MissingGroup { group: &'static str },
}

/// Errors raised while parsing a single line. Each carries the raw line.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The line does not match the grammar.
    #[error("line does not match the expected format: {line:?}")]
    MalformedLine { line: String },

    /// The week number matched but does not fit a `u32`.
    #[error("invalid week number {value:?} in line: {line:?}")]
    InvalidWeek { line: String, value: String },

    /// A time token matched but is not a valid 12-hour time of day.
    #[error("invalid time {value:?} in line: {line:?}")]
    InvalidTime {
        line: String,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// The category is in neither registry set.
    #[error("unknown category {category:?} in line: {line:?}")]
    UnknownCategory { line: String, category: String },

    /// The end time is not after the start time.
    #[error("end time {end} is not after start time {start} in line: {line:?}")]
    NegativeDuration {
        line: String,
        start: NaiveTime,
        end: NaiveTime,
    },
}

impl ParseError {
    /// The offending line text.
    pub fn line(&self) -> &str {
        match self {
            Self::MalformedLine { line }
            | Self::InvalidWeek { line, .. }
            | Self::InvalidTime { line, .. }
            | Self::UnknownCategory { line, .. }
            | Self::NegativeDuration { line, .. } => line,
        }
    }
}

/// A compiled line grammar.
///
/// Custom patterns must define the named groups `start`, `end` and
/// `category`. The groups `week`, `day` and `class` are picked up when present.
/// A match must span the whole line, whether or not the pattern is anchored.
#[derive(Debug, Clone)]
pub struct Grammar {
    pattern: String,
    /// `pattern` wrapped in `^(?:...)$`.
    regex: Regex,
}

impl Grammar {
    pub fn new(pattern: &str) -> Result<Self, GrammarError> {
        let regex = Regex::new(&format!("^(?:{pattern})$"))?;
        for group in REQUIRED_GROUPS {
            if !regex.capture_names().flatten().any(|name| name == group) {
                return Err(GrammarError::MissingGroup { group });
            }
        }
        Ok(Self {
            pattern: pattern.to_string(),
            regex,
        })
    }

    /// The pattern as written.
    pub fn as_str(&self) -> &str {
        &self.pattern
    }
}

impl Default for Grammar {
    fn default() -> Self {
        DEFAULT_GRAMMAR.clone()
    }
}

/// Turns raw log lines into [`ServiceEvent`]s.
///
/// Parsing is pure: the parser only reads its own grammar and registry.
#[derive(Debug, Clone, Default)]
pub struct LineParser {
    registry: CategoryRegistry,
    grammar: Grammar,
}

impl LineParser {
    pub const fn new(registry: CategoryRegistry, grammar: Grammar) -> Self {
        Self { registry, grammar }
    }

    pub const fn registry(&self) -> &CategoryRegistry {
        &self.registry
    }

    pub const fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn parse_line(&self, line: &str) -> Result<ServiceEvent, ParseError> {
        let trimmed = line.trim_end();
        let malformed = || ParseError::MalformedLine {
            line: trimmed.to_string(),
        };

        let caps = self.grammar.regex.captures(trimmed).ok_or_else(malformed)?;
        let group = |name: &str| caps.name(name).map(|m| m.as_str());

        let (Some(start_text), Some(end_text), Some(category)) =
            (group("start"), group("end"), group("category"))
        else {
            return Err(malformed());
        };

        let week = group("week")
            .map(|value| {
                value.parse::<u32>().map_err(|_| ParseError::InvalidWeek {
                    line: trimmed.to_string(),
                    value: value.to_string(),
                })
            })
            .transpose()?;
        let weekday = group("day").map(ToString::to_string);
        let stated_class = group("class").and_then(|c| c.to_lowercase().parse::<ServiceClass>().ok());

        let start = parse_time(trimmed, start_text)?;
        let end = parse_time(trimmed, end_text)?;

        let task_type = category.to_lowercase();
        let Some(class) = self.registry.classify(&task_type).class() else {
            return Err(ParseError::UnknownCategory {
                line: trimmed.to_string(),
                category: task_type,
            });
        };

        let mut event = ServiceEvent::new(task_type, class, start, end).ok_or_else(|| {
            ParseError::NegativeDuration {
                line: trimmed.to_string(),
                start,
                end,
            }
        })?;
        event.week = week;
        event.weekday = weekday;
        event.stated_class = stated_class;
        Ok(event)
    }
}

/// Parses a line with the default grammar and built-in categories.
pub fn parse_line(line: &str) -> Result<ServiceEvent, ParseError> {
    LineParser::default().parse_line(line)
}

fn parse_time(line: &str, value: &str) -> Result<NaiveTime, ParseError> {
    NaiveTime::parse_from_str(value.trim(), TIME_FORMAT).map_err(|source| {
        ParseError::InvalidTime {
            line: line.to_string(),
            value: value.to_string(),
            source,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn parses_direct_line() {
        let event = parse_line("Week 1 (Thursday) 9:30 AM - 11:30 AM : direct language").unwrap();
        assert_eq!(event.task_type, "language");
        assert!(event.is_direct());
        assert_eq!(event.start(), time(9, 30));
        assert_eq!(event.end(), time(11, 30));
        assert_eq!(event.week, Some(1));
        assert_eq!(event.weekday.as_deref(), Some("Thursday"));
        assert_eq!(event.stated_class, Some(ServiceClass::Direct));
    }

    #[test]
    fn parses_indirect_line_in_afternoon() {
        let event = parse_line("Week 1 (Monday) 1:00 PM - 1:45 PM : indirect documentation").unwrap();
        assert_eq!(event.class, ServiceClass::Indirect);
        assert_eq!(event.start(), time(13, 0));
        assert_eq!(event.end(), time(13, 45));
        assert!((event.hours() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn noon_and_midnight_hours() {
        let event = parse_line("Week 2 (Tuesday) 11:45 AM - 12:15 PM : direct voice").unwrap();
        assert_eq!(event.start(), time(11, 45));
        assert_eq!(event.end(), time(12, 15));

        let event = parse_line("Week 2 (Tuesday) 12:00 AM - 12:30 AM : direct voice").unwrap();
        assert_eq!(event.start(), time(0, 0));
        assert_eq!(event.end(), time(0, 30));
    }

    #[test]
    fn tolerates_whitespace_around_dash_and_line_endings() {
        let event = parse_line("Week 3 (Friday) 8:00 AM-9:00 AM : direct fluency\r\n").unwrap();
        assert_eq!(event.task_type, "fluency");

        let event = parse_line("Week 3 (Friday) 8:00 AM   -  9:00 AM : direct fluency").unwrap();
        assert_eq!(event.end(), time(9, 0));
    }

    #[test]
    fn category_is_lowercased() {
        let event = parse_line("Week 1 (Monday) 8:00 AM - 9:00 AM : indirect Scheduling").unwrap();
        assert_eq!(event.task_type, "scheduling");
    }

    #[test]
    fn classification_ignores_stated_token() {
        let event = parse_line("Week 1 (Monday) 8:00 AM - 9:00 AM : indirect articulation").unwrap();
        assert!(event.is_direct());
        assert!(event.class_mismatch());
    }

    #[test]
    fn malformed_line_carries_text() {
        let err = parse_line("Week 1 Thursday 9:30-11:30 language").unwrap_err();
        assert!(matches!(err, ParseError::MalformedLine { .. }));
        assert_eq!(err.line(), "Week 1 Thursday 9:30-11:30 language");
    }

    #[test]
    fn blank_line_is_malformed() {
        assert!(matches!(
            parse_line(""),
            Err(ParseError::MalformedLine { .. })
        ));
    }

    #[test]
    fn literal_tokens_are_case_sensitive() {
        assert!(matches!(
            parse_line("week 1 (Monday) 8:00 AM - 9:00 AM : direct voice"),
            Err(ParseError::MalformedLine { .. })
        ));
        assert!(matches!(
            parse_line("Week 1 (Monday) 8:00 am - 9:00 am : direct voice"),
            Err(ParseError::MalformedLine { .. })
        ));
        assert!(matches!(
            parse_line("Week 1 (Monday) 8:00 AM - 9:00 AM : Direct voice"),
            Err(ParseError::MalformedLine { .. })
        ));
    }

    #[test]
    fn trailing_text_is_malformed() {
        assert!(matches!(
            parse_line("Week 1 (Monday) 8:00 AM - 9:00 AM : direct voice therapy"),
            Err(ParseError::MalformedLine { .. })
        ));
    }

    #[test]
    fn out_of_range_times_are_invalid() {
        let err = parse_line("Week 1 (Monday) 13:00 PM - 2:00 PM : direct voice").unwrap_err();
        match err {
            ParseError::InvalidTime { value, .. } => assert_eq!(value, "13:00 PM"),
            other => panic!("expected InvalidTime, got {other:?}"),
        }

        assert!(matches!(
            parse_line("Week 1 (Monday) 9:00 AM - 9:60 AM : direct voice"),
            Err(ParseError::InvalidTime { .. })
        ));
        assert!(matches!(
            parse_line("Week 1 (Monday) 0:30 AM - 1:00 AM : direct voice"),
            Err(ParseError::InvalidTime { .. })
        ));
    }

    #[test]
    fn unknown_category() {
        let err = parse_line("Week 1 (Friday) 2:00 PM - 3:00 PM : direct juggling").unwrap_err();
        match &err {
            ParseError::UnknownCategory { category, .. } => assert_eq!(category, "juggling"),
            other => panic!("expected UnknownCategory, got {other:?}"),
        }
        assert!(err.to_string().contains("juggling"));
    }

    #[test]
    fn end_must_follow_start() {
        let err = parse_line("Week 1 (Friday) 3:00 PM - 2:00 PM : direct voice").unwrap_err();
        assert!(matches!(err, ParseError::NegativeDuration { .. }));

        assert!(matches!(
            parse_line("Week 1 (Friday) 3:00 PM - 3:00 PM : direct voice"),
            Err(ParseError::NegativeDuration { .. })
        ));

        // Crossing midnight is not supported.
        assert!(matches!(
            parse_line("Week 1 (Friday) 11:00 PM - 1:00 AM : direct voice"),
            Err(ParseError::NegativeDuration { .. })
        ));
    }

    #[test]
    fn parsing_is_repeatable() {
        let line = "Week 4 (Wednesday) 10:15 AM - 11:00 AM : indirect research";
        assert_eq!(parse_line(line).unwrap(), parse_line(line).unwrap());
    }

    #[test]
    fn custom_registry_vocabulary() {
        let registry = CategoryRegistry::new(["feeding"], ["billing"]).unwrap();
        let parser = LineParser::new(registry, Grammar::default());

        let event = parser
            .parse_line("Week 1 (Monday) 8:00 AM - 9:00 AM : direct feeding")
            .unwrap();
        assert!(event.is_direct());

        assert!(matches!(
            parser.parse_line("Week 1 (Monday) 8:00 AM - 9:00 AM : direct language"),
            Err(ParseError::UnknownCategory { .. })
        ));
    }

    #[test]
    fn custom_grammar() {
        let grammar =
            Grammar::new(r"^(?P<start>\d{1,2}:\d{2} [AP]M) to (?P<end>\d{1,2}:\d{2} [AP]M) (?P<category>\w+)$")
                .unwrap();
        let parser = LineParser::new(CategoryRegistry::default(), grammar);

        let event = parser.parse_line("9:00 AM to 10:30 AM staffing").unwrap();
        assert_eq!(event.task_type, "staffing");
        assert_eq!(event.week, None);
        assert_eq!(event.stated_class, None);
        assert!((event.hours() - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn custom_grammar_must_match_whole_line() {
        let grammar = Grammar::new(
            r"(?P<start>\d{1,2}:\d{2} [AP]M) - (?P<end>\d{1,2}:\d{2} [AP]M) (?P<category>\w+)",
        )
        .unwrap();
        let parser = LineParser::new(CategoryRegistry::default(), grammar);

        assert!(parser.parse_line("8:00 AM - 9:00 AM voice").is_ok());
        for line in [
            "garbage 8:00 AM - 9:00 AM voice more garbage",
            "garbage 8:00 AM - 9:00 AM voice",
            "8:00 AM - 9:00 AM voice more garbage",
        ] {
            let err = parser.parse_line(line).unwrap_err();
            assert!(
                matches!(err, ParseError::MalformedLine { .. }),
                "{line:?} gave {err:?}"
            );
            assert_eq!(err.line(), line);
        }
    }

    #[test]
    fn oversized_week_number() {
        let line = "Week 99999999999 (Monday) 8:00 AM - 9:00 AM : direct voice";
        let err = parse_line(line).unwrap_err();
        match &err {
            ParseError::InvalidWeek { value, .. } => assert_eq!(value, "99999999999"),
            other => panic!("expected InvalidWeek, got {other:?}"),
        }
        assert_eq!(err.line(), line);
    }

    #[test]
    fn grammar_requires_named_groups() {
        let err = Grammar::new(r"(?P<start>\S+) (?P<end>\S+)").unwrap_err();
        assert!(matches!(err, GrammarError::MissingGroup { group: "category" }));

        assert!(matches!(Grammar::new("(unclosed"), Err(GrammarError::Regex(_))));
    }

    #[test]
    fn default_grammar_compiles() {
        assert_eq!(Grammar::default().as_str(), DEFAULT_PATTERN);
        assert!(Grammar::new(DEFAULT_PATTERN).is_ok());
    }
}
