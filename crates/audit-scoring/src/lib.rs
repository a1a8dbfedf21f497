//! Audit questionnaire scoring: record intake, answer tracking, scoring rules,
//! category/global aggregation, and compliance evaluation.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
