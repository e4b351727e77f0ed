//! Batch compliance validation for corpus delivery files.
//!
//! The validator reads finished JSONL batches — whether or not this
//! pipeline produced them — checks every record against the delivery
//! contract (structural schema, text-hygiene rules, PII rules, cross-record
//! uniqueness), and writes per-file and aggregate reports. It never
//! rewrites a record.

pub mod engine;
pub mod report;
pub mod rules;
pub mod structure;

pub use engine::{BatchReport, FileReport, Validator};
pub use report::{render_aggregate_report, render_file_report, report_path_for, write_reports};
pub use rules::Ruleset;
pub use structure::check_structure;
