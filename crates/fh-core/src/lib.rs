//! Core domain logic for fieldwork hour tracking.
//!
//! This crate contains:
//! - Category registry: the direct/indirect service vocabulary
//! - Line parsing: turning weekly log lines into service events
//! - Aggregation: summing event durations into per-category hour totals

pub mod event;
pub mod parser;
pub mod registry;
mod report;

pub use event::ServiceEvent;
pub use parser::{DEFAULT_PATTERN, Grammar, GrammarError, LineParser, ParseError, parse_line};
pub use registry::{
    CategoryRegistry, CategorySets, Classification, RegistryError, ServiceClass,
    UnknownServiceClass,
};
pub use report::{AggregateError, Aggregator, Report, aggregate};
