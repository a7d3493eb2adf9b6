//! Service events: one timed activity parsed from a log line.

use chrono::{NaiveTime, TimeDelta};
use serde::Serialize;

use crate::registry::ServiceClass;

const SECONDS_PER_HOUR: f64 = 3600.0;

/// A single timed activity.
///
/// Duration is derived from the two times on demand. The times are private and
/// [`ServiceEvent::new`] guarantees `end` is strictly after `start`, so
/// [`ServiceEvent::hours`] is always positive.
///
/// ```compile_fail
/// use chrono::NaiveTime;
/// use fh_core::{ServiceClass, ServiceEvent};
///
/// let event = ServiceEvent {
///     task_type: "voice".to_string(),
///     class: ServiceClass::Direct,
///     start: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
///     end: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
///     week: None,
///     weekday: None,
///     stated_class: None,
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceEvent {
    /// Lowercased category name, a member of exactly one registry set.
    pub task_type: String,
    /// Class derived from registry membership.
    pub class: ServiceClass,
    start: NaiveTime,
    end: NaiveTime,
    /// Week number from the line, when the grammar captures it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub week: Option<u32>,
    /// Weekday label from the line, as written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekday: Option<String>,
    /// The direct/indirect token written on the line. Not used for classification.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stated_class: Option<ServiceClass>,
}

impl ServiceEvent {
    /// Creates an event, or returns `None` when `end` is not after `start`.
    pub fn new(
        task_type: impl Into<String>,
        class: ServiceClass,
        start: NaiveTime,
        end: NaiveTime,
    ) -> Option<Self> {
        (end > start).then(|| Self {
            task_type: task_type.into(),
            class,
            start,
            end,
            week: None,
            weekday: None,
            stated_class: None,
        })
    }

    pub const fn start(&self) -> NaiveTime {
        self.start
    }

    pub const fn end(&self) -> NaiveTime {
        self.end
    }

    pub fn is_direct(&self) -> bool {
        self.class == ServiceClass::Direct
    }

    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    /// Duration in fractional hours.
    #[allow(clippy::cast_precision_loss)]
    pub fn hours(&self) -> f64 {
        self.duration().num_seconds() as f64 / SECONDS_PER_HOUR
    }

    /// True when the line stated a class that disagrees with the registry.
    pub fn class_mismatch(&self) -> bool {
        self.stated_class.is_some_and(|stated| stated != self.class)
    }
}
