//! Hour aggregation.
//!
//! Folds parsed lines into per-category hour totals, split by service class.
//! Aggregation is all-or-nothing: the first bad line aborts the whole batch
//! and no partial report is returned.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use crate::event::ServiceEvent;
use crate::parser::{LineParser, ParseError};
use crate::registry::{CategoryRegistry, ServiceClass};

/// A line failed to parse during aggregation.
#[derive(Debug, Error)]
#[error("line {line_number}: {source}")]
pub struct AggregateError {
    /// 1-based position of the offending line in the input.
    pub line_number: usize,
    #[source]
    pub source: ParseError,
}

/// Hour totals per category, split into direct and indirect service.
///
/// Every registry category is present, starting at zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub direct: BTreeMap<String, f64>,
    pub indirect: BTreeMap<String, f64>,
}

impl Report {
    /// A report with every registry category at 0.0 hours.
    pub fn empty(registry: &CategoryRegistry) -> Self {
        let zeroed = |class: ServiceClass| -> BTreeMap<String, f64> {
            registry
                .categories(class)
                .map(|name| (name.to_string(), 0.0))
                .collect()
        };
        Self {
            direct: zeroed(ServiceClass::Direct),
            indirect: zeroed(ServiceClass::Indirect),
        }
    }

    const fn class_totals(&self, class: ServiceClass) -> &BTreeMap<String, f64> {
        match class {
            ServiceClass::Direct => &self.direct,
            ServiceClass::Indirect => &self.indirect,
        }
    }

    fn class_totals_mut(&mut self, class: ServiceClass) -> &mut BTreeMap<String, f64> {
        match class {
            ServiceClass::Direct => &mut self.direct,
            ServiceClass::Indirect => &mut self.indirect,
        }
    }

    /// Adds an event's duration to its category total.
    pub fn record(&mut self, event: &ServiceEvent) {
        *self
            .class_totals_mut(event.class)
            .entry(event.task_type.clone())
            .or_insert(0.0) += event.hours();
    }

    /// Hours recorded for one category, or `None` if the category is not in this report.
    pub fn hours(&self, class: ServiceClass, category: &str) -> Option<f64> {
        self.class_totals(class).get(category).copied()
    }

    /// Categories of one class with their hours, in sorted order.
    pub fn categories(&self, class: ServiceClass) -> impl Iterator<Item = (&str, f64)> {
        self.class_totals(class)
            .iter()
            .map(|(name, hours)| (name.as_str(), *hours))
    }

    pub fn total(&self, class: ServiceClass) -> f64 {
        self.class_totals(class).values().sum()
    }

    pub fn grand_total(&self) -> f64 {
        self.total(ServiceClass::Direct) + self.total(ServiceClass::Indirect)
    }

    /// Adds another report's totals into this one, category by category.
    pub fn merge(&mut self, other: &Self) {
        for class in ServiceClass::ALL {
            let totals = self.class_totals_mut(class);
            for (name, hours) in other.class_totals(class) {
                *totals.entry(name.clone()).or_insert(0.0) += hours;
            }
        }
    }
}

/// Parses lines and folds them into a [`Report`].
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    parser: LineParser,
}

impl Aggregator {
    pub const fn new(parser: LineParser) -> Self {
        Self { parser }
    }

    pub const fn parser(&self) -> &LineParser {
        &self.parser
    }

    /// Aggregates lines in input order, stopping at the first line that fails to parse.
    pub fn aggregate<I, S>(&self, lines: I) -> Result<Report, AggregateError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut report = Report::empty(self.parser.registry());

        for (index, line) in lines.into_iter().enumerate() {
            let line_number = index + 1;
            let event = self
                .parser
                .parse_line(line.as_ref())
                .map_err(|source| AggregateError {
                    line_number,
                    source,
                })?;

            if event.class_mismatch() {
                tracing::warn!(
                    line_number,
                    category = %event.task_type,
                    class = %event.class,
                    "stated service class disagrees with category; using category"
                );
            }

            tracing::debug!(
                line_number,
                category = %event.task_type,
                hours = event.hours(),
                "recorded event"
            );
            report.record(&event);
        }

        Ok(report)
    }
}

/// Aggregates lines with the default grammar and built-in categories.
pub fn aggregate<I, S>(lines: I) -> Result<Report, AggregateError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Aggregator::default().aggregate(lines)
}
